mod db;
mod driver;
mod presenter;
mod store;

use std::sync::Arc;
use std::time::Duration;

use myshows_api::tmdb::TmdbClient;
use myshows_api::traits::CatalogService;
use myshows_core::config::AppConfig;
use myshows_core::view_state::Presenter;

pub use db::DbHandle;
pub use driver::CoordinatorHandle;
pub use presenter::{ChannelPresenter, UiEvent};
pub use store::WatchlistStore;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("api error: {0}")]
    Api(String),
}

/// The catalog and watchlist a coordinator runs against.
pub struct Runtime<C = TmdbClient, S = DbHandle> {
    catalog: Arc<C>,
    store: Arc<S>,
}

impl Runtime {
    /// Build the TMDb client and open the watchlist database described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, RuntimeError> {
        let catalog = TmdbClient::builder(config.tmdb.api_key.clone())
            .base_url(config.tmdb.base_url.as_str())
            .language(config.tmdb.language.clone())
            .timeout(Duration::from_secs(config.tmdb.timeout_secs))
            .build()
            .map_err(|e| RuntimeError::Api(e.to_string()))?;

        let db_path = config
            .ensure_db_path()
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        tracing::info!(path = %db_path.display(), "Opening watchlist database");
        let store = DbHandle::open(&db_path).map_err(|e| RuntimeError::Database(e.to_string()))?;

        Ok(Self::new(catalog, store))
    }
}

impl<C, S> Runtime<C, S>
where
    C: CatalogService + 'static,
    S: WatchlistStore + 'static,
{
    pub fn new(catalog: C, store: S) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Spawn a coordinator that reports to `presenter`. It immediately loads
    /// the watchlist.
    pub fn start<P>(&self, presenter: P) -> (CoordinatorHandle, tokio::task::JoinHandle<()>)
    where
        P: Presenter + Send + 'static,
    {
        driver::spawn(Arc::clone(&self.catalog), Arc::clone(&self.store), presenter)
    }
}
