use serde::Deserialize;

use crate::traits::{CatalogItem, MediaKind, SearchPage, ShowDetails, Video};

// ── search/multi ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    pub page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<TmdbMultiResult>,
}

/// A `search/multi` hit. Movies and TV shows name the same things differently
/// (`title`/`name`, `release_date`/`first_air_date`), so the tag decides the shape.
#[derive(Debug, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum TmdbMultiResult {
    Movie(TmdbMovieResult),
    Tv(TmdbTvResult),
    Person(TmdbPersonResult),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieResult {
    pub id: i64,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbTvResult {
    pub id: i64,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbPersonResult {
    pub id: i64,
    pub name: Option<String>,
}

// ── movie/{id} and tv/{id} ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbDetailResponse {
    pub id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub videos: Option<TmdbVideos>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// ── Conversions to shared trait types ───────────────────────────

/// TMDb sends `""` for unknown dates and paths as often as it omits them.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl TmdbMultiResult {
    pub fn into_catalog_item(self) -> Option<CatalogItem> {
        let item = match self {
            Self::Movie(m) => CatalogItem {
                id: m.id,
                kind: MediaKind::Movie,
                title: non_empty(m.title),
                poster_path: non_empty(m.poster_path),
                release_date: non_empty(m.release_date),
                vote_average: m.vote_average,
            },
            Self::Tv(t) => CatalogItem {
                id: t.id,
                kind: MediaKind::Tv,
                title: non_empty(t.name),
                poster_path: non_empty(t.poster_path),
                release_date: non_empty(t.first_air_date),
                vote_average: t.vote_average,
            },
            Self::Person(p) => CatalogItem {
                id: p.id,
                kind: MediaKind::Person,
                title: non_empty(p.name),
                poster_path: None,
                release_date: None,
                vote_average: None,
            },
            Self::Unknown => return None,
        };
        Some(item)
    }
}

impl TmdbSearchResponse {
    pub fn into_search_page(self) -> SearchPage {
        SearchPage {
            page: self.page,
            total_pages: self.total_pages,
            results: self
                .results
                .into_iter()
                .filter_map(TmdbMultiResult::into_catalog_item)
                .collect(),
        }
    }
}

impl TmdbDetailResponse {
    pub fn into_show_details(self) -> ShowDetails {
        ShowDetails {
            id: self.id,
            title: non_empty(self.title.or(self.name)),
            poster_path: non_empty(self.poster_path),
            overview: non_empty(self.overview),
            genres: self
                .genres
                .map(|g| g.into_iter().map(|x| x.name).collect())
                .unwrap_or_default(),
            videos: self
                .videos
                .map(|v| {
                    v.results
                        .into_iter()
                        .map(|x| Video {
                            key: x.key,
                            name: x.name,
                            site: x.site,
                            kind: x.kind,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
