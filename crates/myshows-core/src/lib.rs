pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod storage;
pub mod view_state;
