use serde::{Deserialize, Serialize};

use super::show::{ShowDetail, ShowSummary};

/// A show saved to the user's watchlist.
///
/// Carries every detail field, so opening a saved show never needs the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub summary: String,
    pub genre: String,
    pub is_movie: bool,
    pub rating: String,
    pub release: String,
    pub trailer_key: Option<String>,
    pub trailer_name: Option<String>,
}

impl WatchlistEntry {
    pub fn summary_view(&self) -> ShowSummary {
        ShowSummary {
            id: self.id,
            poster_path: self.poster_path.clone(),
            title: self.title.clone(),
            rating: self.rating.clone(),
            release: self.release.clone(),
            is_movie: self.is_movie,
        }
    }

    pub fn detail_view(&self) -> ShowDetail {
        ShowDetail {
            id: self.id,
            poster_path: self.poster_path.clone(),
            title: self.title.clone(),
            rating: self.rating.clone(),
            release: self.release.clone(),
            is_movie: self.is_movie,
            summary: self.summary.clone(),
            genre: self.genre.clone(),
            trailer_key: self.trailer_key.clone(),
            trailer_name: self.trailer_name.clone(),
        }
    }
}

impl From<&ShowDetail> for WatchlistEntry {
    fn from(show: &ShowDetail) -> Self {
        Self {
            id: show.id,
            title: show.title.clone(),
            poster_path: show.poster_path.clone(),
            summary: show.summary.clone(),
            genre: show.genre.clone(),
            is_movie: show.is_movie,
            rating: show.rating.clone(),
            release: show.release.clone(),
            trailer_key: show.trailer_key.clone(),
            trailer_name: show.trailer_name.clone(),
        }
    }
}

/// Result of deleting from the watchlist: whether a row went away, plus the
/// fresh full list read back afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WatchlistDelete {
    pub removed: bool,
    pub entries: Vec<WatchlistEntry>,
}
