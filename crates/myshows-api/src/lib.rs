//! Remote catalog access for MyShows.
//!
//! [`traits`] holds the service-agnostic interface; [`tmdb`] is the
//! The Movie Database implementation of it.

pub mod tmdb;
pub mod traits;
