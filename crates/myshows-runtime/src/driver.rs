use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use myshows_api::traits::CatalogService;
use myshows_core::coordinator::{Command, Coordinator, Message};
use myshows_core::view_state::Presenter;

use crate::store::WatchlistStore;

/// Sends user intents to a running coordinator.
///
/// Intents sent after the coordinator stopped are dropped.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl CoordinatorHandle {
    fn send(&self, message: Message) {
        if self.tx.send(message).is_err() {
            tracing::debug!("Coordinator already stopped");
        }
    }

    pub fn search_shows(&self, query: impl Into<String>, submit: bool) {
        self.send(Message::SearchShows {
            query: query.into(),
            submit,
        });
    }

    pub fn load_next_shows(&self) {
        self.send(Message::LoadNextShows);
    }

    pub fn refresh(&self) {
        self.send(Message::Refresh);
    }

    pub fn display_show_list(&self) {
        self.send(Message::DisplayShowList);
    }

    pub fn display_watchlist(&self) {
        self.send(Message::DisplayWatchlist);
    }

    pub fn select_show(&self, id: i64, from_catalog: bool) {
        self.send(Message::SelectShow { id, from_catalog });
    }

    pub fn toggle_watch(&self) {
        self.send(Message::ToggleWatch);
    }

    pub fn delete_from_watchlist(&self, id: i64) {
        self.send(Message::DeleteFromWatchlist { id });
    }

    pub fn exit_detail(&self) {
        self.send(Message::ExitDetail);
    }

    /// Stop the coordinator and abort its in-flight work. Safe to call twice.
    pub fn dispose(&self) {
        self.send(Message::Dispose);
    }
}

/// Spawn the coordinator loop on the current tokio runtime.
pub fn spawn<C, S, P>(
    catalog: Arc<C>,
    store: Arc<S>,
    presenter: P,
) -> (CoordinatorHandle, tokio::task::JoinHandle<()>)
where
    C: CatalogService + 'static,
    S: WatchlistStore + 'static,
    P: Presenter + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(catalog, store, presenter, rx));
    (CoordinatorHandle { tx }, task)
}

async fn run<C, S, P>(
    catalog: Arc<C>,
    store: Arc<S>,
    presenter: P,
    mut intents: mpsc::UnboundedReceiver<Message>,
) where
    C: CatalogService + 'static,
    S: WatchlistStore + 'static,
    P: Presenter,
{
    let (results_tx, mut results) = mpsc::unbounded_channel();
    let mut tasks = JoinSet::new();

    let (mut coordinator, command) = Coordinator::new(presenter);
    execute(command, &catalog, &store, &results_tx, &mut tasks);

    loop {
        let message = tokio::select! {
            intent = intents.recv() => match intent {
                Some(message) => message,
                // Every handle is gone; nobody can see the screen any more.
                None => Message::Dispose,
            },
            Some(result) = results.recv() => result,
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        tracing::error!("Coordinator task panicked: {e}");
                    }
                }
                continue;
            }
        };

        let dispose = matches!(message, Message::Dispose);
        let command = coordinator.update(message);
        if dispose {
            break;
        }
        execute(command, &catalog, &store, &results_tx, &mut tasks);
    }

    tasks.abort_all();
    tracing::debug!(in_flight = tasks.len(), "Coordinator loop stopped");
}

/// Start the I/O a command asks for. The outcome comes back on `results`.
fn execute<C, S>(
    command: Command,
    catalog: &Arc<C>,
    store: &Arc<S>,
    results: &mpsc::UnboundedSender<Message>,
    tasks: &mut JoinSet<()>,
) where
    C: CatalogService + 'static,
    S: WatchlistStore + 'static,
{
    let results = results.clone();
    match command {
        Command::None => {}
        Command::LoadWatchlist { filter } => {
            let store = Arc::clone(store);
            tasks.spawn(async move {
                let result = store
                    .find_matching(&filter)
                    .await
                    .map_err(|e| store_error("load", e));
                let _ = results.send(Message::WatchlistLoaded(result));
            });
        }
        Command::Search {
            base_filter,
            filter,
            page,
        } => {
            let catalog = Arc::clone(catalog);
            tasks.spawn(async move {
                let result = catalog.search(&filter, page).await.map_err(|e| {
                    tracing::warn!(query = %filter, page, "Catalog search failed: {e}");
                    e.to_string()
                });
                let _ = results.send(Message::ShowsLoaded {
                    base_filter,
                    filter,
                    page,
                    result,
                });
            });
        }
        Command::Details(show) => {
            let catalog = Arc::clone(catalog);
            tasks.spawn(async move {
                let result = if show.is_movie {
                    catalog.movie_details(show.id).await
                } else {
                    catalog.tv_details(show.id).await
                };
                let result = result.map_err(|e| {
                    tracing::warn!(id = show.id, "Details lookup failed: {e}");
                    e.to_string()
                });
                let _ = results.send(Message::DetailsLoaded { show, result });
            });
        }
        Command::Delete { id } => {
            let store = Arc::clone(store);
            tasks.spawn(async move {
                let result = store.delete(id).await.map_err(|e| store_error("delete", e));
                let _ = results.send(Message::WatchlistDeleted(result));
            });
        }
        Command::Add(entry) => {
            let store = Arc::clone(store);
            tasks.spawn(async move {
                let result = store.upsert(&entry).await.map_err(|e| store_error("add", e));
                let _ = results.send(Message::WatchlistAdded(result));
            });
        }
    }
}

fn store_error(op: &str, e: impl std::fmt::Display) -> String {
    tracing::warn!(op, "Watchlist store failed: {e}");
    e.to_string()
}
