pub mod show;
pub mod watchlist;

pub use show::{filter_by_title, ShowDetail, ShowSummary, NOT_AVAILABLE};
pub use watchlist::{WatchlistDelete, WatchlistEntry};
