use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use myshows_core::error::MyShowsError;
use myshows_core::models::{WatchlistDelete, WatchlistEntry};
use myshows_core::storage::Storage;

use crate::store::WatchlistStore;

/// Async handle to the SQLite connection, which lives on its own thread.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

enum DbCommand {
    FindMatching {
        filter: String,
        reply: oneshot::Sender<Result<Vec<WatchlistEntry>, MyShowsError>>,
    },
    Delete {
        id: i64,
        reply: oneshot::Sender<Result<WatchlistDelete, MyShowsError>>,
    },
    Upsert {
        entry: Box<WatchlistEntry>,
        reply: oneshot::Sender<Result<Vec<WatchlistEntry>, MyShowsError>>,
    },
}

impl DbHandle {
    pub fn open(path: &Path) -> Result<Self, MyShowsError> {
        let storage = Storage::open(path).inspect_err(|e| {
            tracing::error!("Failed to open database: {e}");
        })?;
        Self::spawn(storage)
    }

    /// Actor over an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, MyShowsError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, MyShowsError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))
            .inspect_err(|e| tracing::error!("Failed to spawn DB thread: {e}"))?;

        Ok(Self { tx })
    }
}

impl WatchlistStore for DbHandle {
    type Error = MyShowsError;

    async fn find_matching(&self, filter: &str) -> Result<Vec<WatchlistEntry>, MyShowsError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::FindMatching {
            filter: filter.to_string(),
            reply,
        });
        rx.await.unwrap_or(Err(MyShowsError::ActorClosed))
    }

    async fn delete(&self, id: i64) -> Result<WatchlistDelete, MyShowsError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::Delete { id, reply });
        rx.await.unwrap_or(Err(MyShowsError::ActorClosed))
    }

    async fn upsert(&self, entry: &WatchlistEntry) -> Result<Vec<WatchlistEntry>, MyShowsError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::Upsert {
            entry: Box::new(entry.clone()),
            reply,
        });
        rx.await.unwrap_or(Err(MyShowsError::ActorClosed))
    }
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::FindMatching { filter, reply } => {
                let _ = reply.send(storage.find_matching(&filter));
            }
            DbCommand::Delete { id, reply } => {
                let result = storage.delete_entry(id);
                if let Err(e) = &result {
                    tracing::warn!(id, "Failed to delete watchlist entry: {e}");
                }
                let _ = reply.send(result);
            }
            DbCommand::Upsert { entry, reply } => {
                let result = storage.upsert_entry(&entry);
                if let Err(e) = &result {
                    tracing::warn!(id = entry.id, "Failed to save watchlist entry: {e}");
                }
                let _ = reply.send(result);
            }
        }
    }
    tracing::debug!("DB actor stopped");
}
