use std::future::Future;

use myshows_core::models::{WatchlistDelete, WatchlistEntry};

/// Persistent watchlist. Every mutation answers with the full list as it
/// stands afterwards, ordered by title.
pub trait WatchlistStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Entries whose title contains `filter`; an empty filter matches all.
    fn find_matching(
        &self,
        filter: &str,
    ) -> impl Future<Output = Result<Vec<WatchlistEntry>, Self::Error>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<WatchlistDelete, Self::Error>> + Send;

    /// Insert or replace by id.
    fn upsert(
        &self,
        entry: &WatchlistEntry,
    ) -> impl Future<Output = Result<Vec<WatchlistEntry>, Self::Error>> + Send;
}
