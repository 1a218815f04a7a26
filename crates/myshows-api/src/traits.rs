//! Trait definitions for remote show catalogs.
//!
//! The TMDb client implements [`CatalogService`]; the coordinator runtime only
//! ever talks to the trait, so tests can swap in an in-process catalog.

use std::future::Future;

/// A searchable, paginated movie/TV catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search the catalog by keyword. `page` is 1-based.
    fn search(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send;

    /// Fetch the detail payload (with videos) for a movie.
    fn movie_details(&self, id: i64)
        -> impl Future<Output = Result<ShowDetails, Self::Error>> + Send;

    /// Fetch the detail payload (with videos) for a TV show.
    fn tv_details(&self, id: i64) -> impl Future<Output = Result<ShowDetails, Self::Error>> + Send;
}

/// One page of catalog search results.
///
/// `results` may contain entries that are not shows at all (people); callers
/// decide what to keep.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<CatalogItem>,
}

/// What kind of entity a catalog search hit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
    Other,
}

impl MediaKind {
    /// Movies and TV shows are shows; everything else is noise for a watchlist.
    pub fn is_show(self) -> bool {
        matches!(self, Self::Movie | Self::Tv)
    }
}

/// A single search hit, normalized across movie and TV payloads.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub kind: MediaKind,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

/// Detail payload for a movie or TV show.
///
/// The payload carries no rating or release date; those come from the search
/// hit the detail was requested for.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ShowDetails {
    pub id: i64,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub videos: Vec<Video>,
}

/// A video attached to a detail payload (trailers, teasers, clips).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    pub kind: String,
}

impl ShowDetails {
    /// The first YouTube trailer, if any.
    pub fn youtube_trailer(&self) -> Option<&Video> {
        self.videos
            .iter()
            .find(|v| v.site == "YouTube" && v.kind == "Trailer")
    }
}
