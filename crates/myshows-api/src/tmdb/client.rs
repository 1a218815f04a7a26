use std::time::Duration;

use reqwest::Client;

use super::error::TmdbError;
use super::types::{TmdbDetailResponse, TmdbSearchResponse};
use crate::traits::{CatalogService, SearchPage, ShowDetails};

pub const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default connect/read timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// The Movie Database (TMDb) API v3 client.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: Option<String>,
    http: Client,
}

impl TmdbClient {
    pub fn builder(api_key: String) -> TmdbClientBuilder {
        TmdbClientBuilder {
            api_key,
            base_url: BASE_URL.to_string(),
            language: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TMDb API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }

    fn common_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(lang) = &self.language {
            params.push(("language", lang.clone()));
        }
        params
    }

    async fn get_details(&self, path: &str) -> Result<ShowDetails, TmdbError> {
        let mut params = self.common_query();
        params.push(("append_to_response", "videos".to_string()));

        let resp = self
            .http
            .get(format!("{}/{path}", self.base_url))
            .query(&params)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let details: TmdbDetailResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(details.into_show_details())
    }
}

/// Builder for [`TmdbClient`]; lets config override the endpoint and timeouts.
pub struct TmdbClientBuilder {
    api_key: String,
    base_url: String,
    language: Option<String>,
    timeout: Duration,
}

impl TmdbClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<TmdbClient, TmdbError> {
        if self.api_key.trim().is_empty() {
            return Err(TmdbError::MissingApiKey);
        }
        let http = Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()?;
        Ok(TmdbClient {
            api_key: self.api_key,
            base_url: self.base_url,
            language: self.language,
            http,
        })
    }
}

impl CatalogService for TmdbClient {
    type Error = TmdbError;

    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError> {
        tracing::debug!(query, page, "TMDb multi search");
        let mut params = self.common_query();
        params.push(("query", query.to_string()));
        params.push(("page", page.to_string()));

        let resp = self
            .http
            .get(format!("{}/search/multi", self.base_url))
            .query(&params)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let search: TmdbSearchResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(search.into_search_page())
    }

    async fn movie_details(&self, id: i64) -> Result<ShowDetails, TmdbError> {
        tracing::debug!(id, "TMDb movie details");
        self.get_details(&format!("movie/{id}")).await
    }

    async fn tv_details(&self, id: i64) -> Result<ShowDetails, TmdbError> {
        tracing::debug!(id, "TMDb tv details");
        self.get_details(&format!("tv/{id}")).await
    }
}
