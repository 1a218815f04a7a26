use serde::{Deserialize, Serialize};

use myshows_api::traits::{CatalogItem, MediaKind, ShowDetails};

/// Poster base for list thumbnails.
pub const THUMBNAIL_URL: &str = "http://image.tmdb.org/t/p/w92";
/// Poster base for the full-size detail image.
pub const IMAGE_URL: &str = "http://image.tmdb.org/t/p/original";
/// Watch page base for YouTube trailer keys.
pub const YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=";

/// Placeholder for text fields the provider left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// A catalog entry as shown in result lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub id: i64,
    pub poster_path: Option<String>,
    pub title: String,
    pub rating: String,
    pub release: String,
    pub is_movie: bool,
}

impl ShowSummary {
    /// Small poster URL for list rows.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.poster_path.as_ref().map(|p| format!("{THUMBNAIL_URL}{p}"))
    }

    /// Build a summary from a search hit.
    ///
    /// Non-show hits (people) still convert; filtering them is the caller's call.
    pub fn from_catalog_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            poster_path: item.poster_path.clone(),
            title: item
                .title
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: item
                .vote_average
                .map(format_rating)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            release: item
                .release_date
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            is_movie: item.kind == MediaKind::Movie,
        }
    }
}

/// A show with its detail payload merged in, as shown on the detail screen.
///
/// Keeps the summary fields it was composed from so it can be saved to the
/// watchlist without another lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetail {
    pub id: i64,
    pub poster_path: Option<String>,
    pub title: String,
    pub rating: String,
    pub release: String,
    pub is_movie: bool,
    pub summary: String,
    pub genre: String,
    pub trailer_key: Option<String>,
    pub trailer_name: Option<String>,
}

impl ShowDetail {
    /// Merge a fetched detail payload into the summary it was requested for.
    ///
    /// Title, rating, release and kind come from the summary; the payload only
    /// contributes overview, genre and trailer.
    pub fn compose(show: &ShowSummary, details: &ShowDetails) -> Self {
        let trailer = details.youtube_trailer();
        Self {
            id: show.id,
            poster_path: show.poster_path.clone(),
            title: show.title.clone(),
            rating: show.rating.clone(),
            release: show.release.clone(),
            is_movie: show.is_movie,
            summary: details
                .overview
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            genre: details
                .genres
                .first()
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            trailer_key: trailer.map(|v| v.key.clone()),
            trailer_name: trailer.map(|v| v.name.clone()),
        }
    }

    /// Full-size poster URL.
    pub fn image_url(&self) -> Option<String> {
        self.poster_path.as_ref().map(|p| format!("{IMAGE_URL}{p}"))
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key.as_ref().map(|k| format!("{YOUTUBE_URL}{k}"))
    }

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
}

fn format_rating(vote: f64) -> String {
    format!("{vote:.1}")
}

/// Case-insensitive title filter, the same match the watchlist screen applies
/// while the user types.
pub fn filter_by_title<'a>(shows: &'a [ShowSummary], filter: &str) -> Vec<&'a ShowSummary> {
    let needle = filter.to_lowercase();
    shows
        .iter()
        .filter(|s| needle.is_empty() || s.title.to_lowercase().contains(&needle))
        .collect()
}
