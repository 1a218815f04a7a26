use serde::Serialize;

use crate::models::{ShowDetail, ShowSummary};

/// A partial screen update. `None` fields leave the screen's current value alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewState {
    pub shows: Option<Vec<ShowSummary>>,
    /// Set when `show` carries a new selection, including the switch back to
    /// the list (`show == None`).
    pub selection_changed: bool,
    pub show: Option<ShowDetail>,
    pub has_more: Option<bool>,
    pub filter: Option<String>,
    pub in_catalog: Option<bool>,
    pub has_watchlist: Option<bool>,
    pub watch_listed: Option<bool>,
}

/// User-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    #[error("Please type something to search for")]
    InvalidFilter,
    #[error("No shows found")]
    NoResults,
    #[error("There are no more shows to load")]
    NoMoreShows,
    #[error("Show not found")]
    ShowNotFound,
    #[error("Your watchlist is empty")]
    NoWatchlist,
    #[error("No show is selected")]
    ShowNotSelected,
    #[error("Could not load your watchlist")]
    LoadFailed,
    #[error("Could not retrieve data from the server")]
    RetrieveFailed,
    #[error("Could not remove the show from your watchlist")]
    DeleteFailed,
    #[error("Could not add the show to your watchlist")]
    AddFailed,
}

impl ErrorKind {
    /// Stable key for looking the message up in a translation table.
    pub fn message_key(self) -> &'static str {
        match self {
            Self::InvalidFilter => "error_invalid_filter",
            Self::NoResults => "error_no_results",
            Self::NoMoreShows => "error_no_more_shows",
            Self::ShowNotFound => "error_show_not_found",
            Self::NoWatchlist => "error_no_watchlist",
            Self::ShowNotSelected => "error_show_not_selected",
            Self::LoadFailed => "error_loading_data",
            Self::RetrieveFailed => "error_retrieving_data",
            Self::DeleteFailed => "error_delete_watchlist",
            Self::AddFailed => "error_add_watchlist",
        }
    }
}

/// The display side of the coordinator. Three independent signals: state
/// snapshots, the busy indicator and errors.
pub trait Presenter {
    fn update_state(&mut self, state: ViewState);
    fn show_loading(&mut self, loading: bool);
    fn show_error(&mut self, kind: ErrorKind, detail: Option<String>);
}
