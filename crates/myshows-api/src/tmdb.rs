pub mod client;
pub mod error;
pub mod types;

pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::TmdbError;
