//! The browsing state machine.
//!
//! [`Coordinator`] owns every piece of screen state and never performs I/O
//! itself. Each call to [`Coordinator::update`] applies one [`Message`], pushes
//! signals to the [`Presenter`], and returns the [`Command`] the runtime must
//! execute next. The runtime feeds the command's outcome back as another message.

use myshows_api::traits::{SearchPage, ShowDetails};

use crate::models::{ShowDetail, ShowSummary, WatchlistDelete, WatchlistEntry};
use crate::view_state::{ErrorKind, Presenter, ViewState};

/// Which list the user is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    Catalog,
    Watchlist,
}

/// Inputs to the coordinator: user intents and completed I/O.
#[derive(Debug, Clone)]
pub enum Message {
    SearchShows { query: String, submit: bool },
    LoadNextShows,
    Refresh,
    DisplayShowList,
    DisplayWatchlist,
    SelectShow { id: i64, from_catalog: bool },
    ToggleWatch,
    DeleteFromWatchlist { id: i64 },
    ExitDetail,
    Dispose,

    WatchlistLoaded(Result<Vec<WatchlistEntry>, String>),
    ShowsLoaded {
        /// Filter of the accumulator this page extends; empty for a new search.
        base_filter: String,
        filter: String,
        page: u32,
        result: Result<SearchPage, String>,
    },
    DetailsLoaded {
        show: ShowSummary,
        result: Result<ShowDetails, String>,
    },
    WatchlistDeleted(Result<WatchlistDelete, String>),
    WatchlistAdded(Result<Vec<WatchlistEntry>, String>),
}

/// I/O the runtime should start on the coordinator's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    LoadWatchlist {
        filter: String,
    },
    Search {
        base_filter: String,
        filter: String,
        page: u32,
    },
    /// Fetch movie or TV details, depending on `is_movie`.
    Details(ShowSummary),
    Delete {
        id: i64,
    },
    Add(WatchlistEntry),
}

pub struct Coordinator<P> {
    presenter: P,
    mode: BrowseMode,
    shows: Vec<ShowSummary>,
    watchlist: Vec<WatchlistEntry>,
    page: u32,
    max_pages: u32,
    show_filter: String,
    watch_filter: String,
    selected: Option<ShowDetail>,
    disposed: bool,
}

impl<P: Presenter> Coordinator<P> {
    /// Create the coordinator and the initial watchlist load.
    pub fn new(mut presenter: P) -> (Self, Command) {
        presenter.show_loading(true);
        let coordinator = Self {
            presenter,
            mode: BrowseMode::Catalog,
            shows: Vec::new(),
            watchlist: Vec::new(),
            page: 0,
            max_pages: 0,
            show_filter: String::new(),
            watch_filter: String::new(),
            selected: None,
            disposed: false,
        };
        let command = Command::LoadWatchlist {
            filter: String::new(),
        };
        (coordinator, command)
    }

    pub fn update(&mut self, message: Message) -> Command {
        if self.disposed {
            tracing::trace!(?message, "Coordinator disposed, dropping message");
            return Command::None;
        }

        match message {
            Message::SearchShows { query, submit } => self.search_shows(query, submit),
            Message::LoadNextShows => self.load_next_shows(),
            Message::Refresh => self.search_shows(self.show_filter.clone(), true),
            Message::DisplayShowList => {
                self.display_show_list();
                Command::None
            }
            Message::DisplayWatchlist => {
                self.display_watchlist();
                Command::None
            }
            Message::SelectShow { id, from_catalog } => self.select_show(id, from_catalog),
            Message::ToggleWatch => self.toggle_watch(),
            Message::DeleteFromWatchlist { id } => {
                self.presenter.show_loading(true);
                Command::Delete { id }
            }
            Message::ExitDetail => {
                self.selected = None;
                self.emit(ViewState {
                    selection_changed: true,
                    watch_listed: Some(false),
                    ..Default::default()
                });
                Command::None
            }
            Message::Dispose => {
                tracing::debug!("Coordinator disposed");
                self.disposed = true;
                Command::None
            }

            Message::WatchlistLoaded(result) => {
                self.watchlist_loaded(result);
                Command::None
            }
            Message::ShowsLoaded {
                base_filter,
                filter,
                page,
                result,
            } => self.shows_loaded(base_filter, filter, page, result),
            Message::DetailsLoaded { show, result } => {
                match result {
                    Ok(details) => self.select(ShowDetail::compose(&show, &details)),
                    Err(e) => self.fail(ErrorKind::RetrieveFailed, Some(e)),
                }
                Command::None
            }
            Message::WatchlistDeleted(result) => {
                self.watchlist_deleted(result);
                Command::None
            }
            Message::WatchlistAdded(result) => {
                self.watchlist_added(result);
                Command::None
            }
        }
    }

    // ── Intents ─────────────────────────────────────────────────

    fn search_shows(&mut self, query: String, submit: bool) -> Command {
        match self.mode {
            BrowseMode::Catalog if submit => {
                if query.is_empty() {
                    self.presenter.show_error(ErrorKind::InvalidFilter, None);
                    return Command::None;
                }
                tracing::debug!(query = %query, "New catalog search");
                self.presenter.show_loading(true);
                Command::Search {
                    base_filter: String::new(),
                    filter: query,
                    page: 1,
                }
            }
            BrowseMode::Catalog => Command::None,
            BrowseMode::Watchlist => {
                self.watch_filter = query.clone();
                self.emit(ViewState {
                    filter: Some(query),
                    ..Default::default()
                });
                Command::None
            }
        }
    }

    fn load_next_shows(&mut self) -> Command {
        if self.show_filter.is_empty() {
            self.presenter.show_error(ErrorKind::InvalidFilter, None);
            return Command::None;
        }
        self.presenter.show_loading(true);
        Command::Search {
            base_filter: self.show_filter.clone(),
            filter: self.show_filter.clone(),
            page: self.page + 1,
        }
    }

    fn display_show_list(&mut self) {
        self.mode = BrowseMode::Catalog;
        self.emit(ViewState {
            shows: Some(self.shows.clone()),
            in_catalog: Some(true),
            has_more: Some(self.page < self.max_pages),
            filter: Some(self.show_filter.clone()),
            ..Default::default()
        });
    }

    fn display_watchlist(&mut self) {
        if self.watchlist.is_empty() {
            self.presenter.show_error(ErrorKind::NoWatchlist, None);
            return;
        }
        self.mode = BrowseMode::Watchlist;
        self.emit(ViewState {
            shows: Some(self.watchlist_summaries()),
            in_catalog: Some(false),
            has_more: Some(false),
            filter: Some(self.watch_filter.clone()),
            ..Default::default()
        });
    }

    fn select_show(&mut self, id: i64, from_catalog: bool) -> Command {
        self.presenter.show_loading(true);
        if from_catalog {
            match self.shows.iter().find(|s| s.id == id) {
                Some(show) => Command::Details(show.clone()),
                None => {
                    self.fail(ErrorKind::ShowNotFound, None);
                    Command::None
                }
            }
        } else {
            match self.watchlist.iter().find(|e| e.id == id) {
                Some(entry) => {
                    let detail = entry.detail_view();
                    self.select(detail);
                }
                None => self.fail(ErrorKind::ShowNotFound, None),
            }
            Command::None
        }
    }

    fn toggle_watch(&mut self) -> Command {
        self.presenter.show_loading(true);
        let Some(selected) = &self.selected else {
            self.fail(ErrorKind::ShowNotSelected, None);
            return Command::None;
        };

        let id = selected.id;
        if self.watchlist.iter().any(|e| e.id == id) {
            self.emit(ViewState {
                watch_listed: Some(false),
                ..Default::default()
            });
            Command::Delete { id }
        } else {
            let entry = WatchlistEntry::from(selected);
            self.emit(ViewState {
                watch_listed: Some(true),
                ..Default::default()
            });
            Command::Add(entry)
        }
    }

    // ── Results ─────────────────────────────────────────────────

    fn watchlist_loaded(&mut self, result: Result<Vec<WatchlistEntry>, String>) {
        let in_catalog = Some(self.mode == BrowseMode::Catalog);
        match result {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "Watchlist loaded");
                self.watchlist = entries;
                self.emit(ViewState {
                    in_catalog,
                    has_more: Some(false),
                    has_watchlist: Some(!self.watchlist.is_empty()),
                    ..Default::default()
                });
                self.presenter.show_loading(false);
            }
            Err(e) => {
                self.emit(ViewState {
                    in_catalog,
                    has_more: Some(false),
                    has_watchlist: Some(false),
                    ..Default::default()
                });
                self.fail(ErrorKind::LoadFailed, Some(e));
            }
        }
    }

    fn shows_loaded(
        &mut self,
        base_filter: String,
        filter: String,
        page: u32,
        result: Result<SearchPage, String>,
    ) -> Command {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.fail(ErrorKind::RetrieveFailed, Some(e));
                return Command::None;
            }
        };

        let total_pages = result.total_pages;
        let found: Vec<ShowSummary> = result
            .results
            .iter()
            .filter(|item| item.kind.is_show())
            .map(ShowSummary::from_catalog_item)
            .collect();

        if found.is_empty() {
            if total_pages <= 1 {
                self.fail(ErrorKind::NoResults, None);
                return Command::None;
            }
            if page >= total_pages {
                self.fail(ErrorKind::NoMoreShows, None);
                return Command::None;
            }
            // Skipped pages advance the cursor only for a continuation. A new
            // search deliberately departs from always advancing: it keeps the
            // previous cursor until it lands on a usable page.
            if filter == base_filter {
                self.page = page;
                self.max_pages = total_pages;
            }
            tracing::debug!(page, total_pages, "Empty page, skipping ahead");
            return Command::Search {
                base_filter,
                filter,
                page: page + 1,
            };
        }

        if filter != base_filter {
            self.shows = found;
        } else {
            self.shows.extend(found);
        }
        self.page = page;
        self.max_pages = total_pages;
        self.show_filter = filter;
        tracing::debug!(
            page,
            total_pages,
            count = self.shows.len(),
            "Catalog page merged"
        );

        self.emit(ViewState {
            shows: Some(self.shows.clone()),
            has_more: Some(self.page < self.max_pages),
            filter: Some(self.show_filter.clone()),
            ..Default::default()
        });
        self.presenter.show_loading(false);
        Command::None
    }

    fn watchlist_deleted(&mut self, result: Result<WatchlistDelete, String>) {
        match result {
            Ok(WatchlistDelete { removed, entries }) => {
                self.watchlist = entries;
                let watch_listed = self.selection_watch_listed();
                let has_watchlist = Some(!self.watchlist.is_empty());

                if self.mode == BrowseMode::Catalog {
                    self.emit(ViewState {
                        has_watchlist,
                        watch_listed,
                        ..Default::default()
                    });
                } else if self.watchlist.is_empty() {
                    self.mode = BrowseMode::Catalog;
                    self.emit(ViewState {
                        shows: Some(self.shows.clone()),
                        in_catalog: Some(true),
                        filter: Some(self.show_filter.clone()),
                        has_more: Some(self.page < self.max_pages),
                        has_watchlist,
                        watch_listed,
                        ..Default::default()
                    });
                } else {
                    self.emit(ViewState {
                        shows: Some(self.watchlist_summaries()),
                        has_more: Some(false),
                        has_watchlist,
                        watch_listed,
                        ..Default::default()
                    });
                }

                if removed {
                    self.presenter.show_loading(false);
                } else {
                    self.fail(ErrorKind::ShowNotFound, None);
                }
            }
            Err(e) => {
                self.resync_watch_state();
                self.fail(ErrorKind::DeleteFailed, Some(e));
            }
        }
    }

    fn watchlist_added(&mut self, result: Result<Vec<WatchlistEntry>, String>) {
        match result {
            Ok(entries) => {
                self.watchlist = entries;
                self.resync_watch_state();
                self.presenter.show_loading(false);
            }
            Err(e) => {
                self.resync_watch_state();
                self.fail(ErrorKind::AddFailed, Some(e));
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn select(&mut self, detail: ShowDetail) {
        let watch_listed = self.watchlist.iter().any(|e| e.id == detail.id);
        tracing::debug!(id = detail.id, watch_listed, "Show selected");
        self.selected = Some(detail.clone());
        self.emit(ViewState {
            selection_changed: true,
            show: Some(detail),
            watch_listed: Some(watch_listed),
            ..Default::default()
        });
        self.presenter.show_loading(false);
    }

    /// Re-emit everything derived from the watchlist cache.
    fn resync_watch_state(&mut self) {
        let watch_listed = self.selection_watch_listed();
        let has_watchlist = Some(!self.watchlist.is_empty());
        let shows = match self.mode {
            BrowseMode::Catalog => None,
            BrowseMode::Watchlist => Some(self.watchlist_summaries()),
        };
        let has_more = shows.as_ref().map(|_| false);
        self.emit(ViewState {
            shows,
            has_more,
            has_watchlist,
            watch_listed,
            ..Default::default()
        });
    }

    fn selection_watch_listed(&self) -> Option<bool> {
        self.selected
            .as_ref()
            .map(|s| self.watchlist.iter().any(|e| e.id == s.id))
    }

    fn watchlist_summaries(&self) -> Vec<ShowSummary> {
        self.watchlist.iter().map(WatchlistEntry::summary_view).collect()
    }

    fn emit(&mut self, state: ViewState) {
        self.presenter.update_state(state);
    }

    /// Raise an error and close the loading indicator.
    fn fail(&mut self, kind: ErrorKind, detail: Option<String>) {
        tracing::debug!(key = kind.message_key(), ?detail, "Coordinator error");
        self.presenter.show_error(kind, detail);
        self.presenter.show_loading(false);
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn shows(&self) -> &[ShowSummary] {
        &self.shows
    }

    pub fn watchlist(&self) -> &[WatchlistEntry] {
        &self.watchlist
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn show_filter(&self) -> &str {
        &self.show_filter
    }

    pub fn watch_filter(&self) -> &str {
        &self.watch_filter
    }

    pub fn selected(&self) -> Option<&ShowDetail> {
        self.selected.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myshows_api::traits::{CatalogItem, MediaKind, Video};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        State(ViewState),
        Loading(bool),
        Error(ErrorKind, Option<String>),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Presenter for Recorder {
        fn update_state(&mut self, state: ViewState) {
            self.events.push(Event::State(state));
        }
        fn show_loading(&mut self, loading: bool) {
            self.events.push(Event::Loading(loading));
        }
        fn show_error(&mut self, kind: ErrorKind, detail: Option<String>) {
            self.events.push(Event::Error(kind, detail));
        }
    }

    impl Recorder {
        fn take(&mut self) -> Vec<Event> {
            std::mem::take(&mut self.events)
        }

        fn errors(&self) -> Vec<ErrorKind> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Error(kind, _) => Some(*kind),
                    _ => None,
                })
                .collect()
        }

        fn last_state(&self) -> Option<&ViewState> {
            self.events.iter().rev().find_map(|e| match e {
                Event::State(s) => Some(s),
                _ => None,
            })
        }

        fn loading_balanced(&self) -> bool {
            let on = self
                .events
                .iter()
                .filter(|e| **e == Event::Loading(true))
                .count();
            let off = self
                .events
                .iter()
                .filter(|e| **e == Event::Loading(false))
                .count();
            on == off
        }
    }

    fn movie(id: i64, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            kind: MediaKind::Movie,
            title: Some(title.into()),
            poster_path: Some(format!("/{id}.jpg")),
            release_date: Some("2005-06-15".into()),
            vote_average: Some(7.7),
        }
    }

    fn person(id: i64) -> CatalogItem {
        CatalogItem {
            id,
            kind: MediaKind::Person,
            title: Some("Somebody".into()),
            poster_path: None,
            release_date: None,
            vote_average: None,
        }
    }

    fn page_of(items: Vec<CatalogItem>, page: u32, total_pages: u32) -> SearchPage {
        SearchPage {
            page,
            total_pages,
            results: items,
        }
    }

    fn movies(range: std::ops::Range<i64>) -> Vec<CatalogItem> {
        range.map(|i| movie(i, &format!("Show {i}"))).collect()
    }

    fn entry(id: i64, title: &str) -> WatchlistEntry {
        WatchlistEntry {
            id,
            title: title.into(),
            poster_path: None,
            summary: "N/A".into(),
            genre: "N/A".into(),
            is_movie: true,
            rating: "7.7".into(),
            release: "2005-06-15".into(),
            trailer_key: None,
            trailer_name: None,
        }
    }

    /// A coordinator whose initial watchlist load already completed.
    fn ready(watchlist: Vec<WatchlistEntry>) -> Coordinator<Recorder> {
        let (mut c, cmd) = Coordinator::new(Recorder::default());
        assert_eq!(
            cmd,
            Command::LoadWatchlist {
                filter: String::new()
            }
        );
        c.update(Message::WatchlistLoaded(Ok(watchlist)));
        c.presenter_mut().take();
        c
    }

    /// Run a search command to completion against a fixed set of pages.
    fn drive(c: &mut Coordinator<Recorder>, mut cmd: Command, pages: &[SearchPage]) {
        while let Command::Search {
            base_filter,
            filter,
            page,
        } = cmd
        {
            let result = pages[(page - 1) as usize].clone();
            cmd = c.update(Message::ShowsLoaded {
                base_filter,
                filter,
                page,
                result: Ok(result),
            });
        }
        assert_eq!(cmd, Command::None);
    }

    fn search(c: &mut Coordinator<Recorder>, query: &str, pages: &[SearchPage]) {
        let cmd = c.update(Message::SearchShows {
            query: query.into(),
            submit: true,
        });
        drive(c, cmd, pages);
    }

    #[test]
    fn test_initial_load() {
        let (mut c, _) = Coordinator::new(Recorder::default());
        c.update(Message::WatchlistLoaded(Ok(vec![entry(1, "Lost")])));
        assert_eq!(
            c.presenter().events,
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    in_catalog: Some(true),
                    has_more: Some(false),
                    has_watchlist: Some(true),
                    ..Default::default()
                }),
                Event::Loading(false),
            ]
        );
        assert_eq!(c.watchlist().len(), 1);
    }

    #[test]
    fn test_initial_load_failure() {
        let (mut c, _) = Coordinator::new(Recorder::default());
        c.update(Message::WatchlistLoaded(Err("disk gone".into())));
        assert_eq!(
            c.presenter().events,
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    in_catalog: Some(true),
                    has_more: Some(false),
                    has_watchlist: Some(false),
                    ..Default::default()
                }),
                Event::Error(ErrorKind::LoadFailed, Some("disk gone".into())),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_empty_submit_is_invalid() {
        let mut c = ready(vec![]);
        let cmd = c.update(Message::SearchShows {
            query: String::new(),
            submit: true,
        });
        assert_eq!(cmd, Command::None);
        assert_eq!(
            c.presenter().events,
            vec![Event::Error(ErrorKind::InvalidFilter, None)]
        );
    }

    #[test]
    fn test_typing_in_catalog_does_nothing() {
        let mut c = ready(vec![]);
        let cmd = c.update(Message::SearchShows {
            query: "bat".into(),
            submit: false,
        });
        assert_eq!(cmd, Command::None);
        assert!(c.presenter().events.is_empty());
    }

    #[test]
    fn test_search_keeps_filter_and_drops_people() {
        let mut c = ready(vec![]);
        let mut items = movies(0..3);
        items.insert(1, person(99));
        search(&mut c, "matrix", &[page_of(items, 1, 2)]);

        assert_eq!(c.show_filter(), "matrix");
        assert_eq!(c.page(), 1);
        assert_eq!(c.max_pages(), 2);
        let state = c.presenter().last_state().unwrap();
        let shows = state.shows.as_ref().unwrap();
        assert_eq!(shows.len(), 3);
        assert!(shows.iter().all(|s| s.id != 99));
        assert_eq!(state.has_more, Some(true));
        assert_eq!(state.filter.as_deref(), Some("matrix"));
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_batman_scenario() {
        let mut c = ready(vec![]);
        let mut items = movies(0..8);
        items.push(person(100));
        items.push(person(101));
        search(&mut c, "batman", &[page_of(items, 1, 1)]);

        let state = c.presenter().last_state().unwrap();
        assert_eq!(state.shows.as_ref().map(Vec::len), Some(8));
        assert_eq!(state.has_more, Some(false));
        assert!(c.presenter().errors().is_empty());
    }

    #[test]
    fn test_load_next_appends() {
        let mut c = ready(vec![]);
        let pages = [
            page_of(movies(0..10), 1, 3),
            page_of(movies(10..20), 2, 3),
            page_of(movies(20..30), 3, 3),
        ];
        search(&mut c, "show", &pages);
        let cmd = c.update(Message::LoadNextShows);
        assert_eq!(
            cmd,
            Command::Search {
                base_filter: "show".into(),
                filter: "show".into(),
                page: 2
            }
        );
        drive(&mut c, cmd, &pages);
        let cmd = c.update(Message::LoadNextShows);
        drive(&mut c, cmd, &pages);

        assert_eq!(c.shows().len(), 30);
        assert_eq!(c.page(), 3);
        let state = c.presenter().last_state().unwrap();
        assert_eq!(state.has_more, Some(false));

        // A fresh search replaces the accumulator.
        search(&mut c, "show", &pages);
        assert_eq!(c.shows().len(), 10);
        assert_eq!(c.page(), 1);
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_refresh_restarts_search() {
        let mut c = ready(vec![]);
        let pages = [page_of(movies(0..10), 1, 2), page_of(movies(10..20), 2, 2)];
        search(&mut c, "show", &pages);
        let cmd = c.update(Message::LoadNextShows);
        drive(&mut c, cmd, &pages);
        assert_eq!(c.shows().len(), 20);

        let cmd = c.update(Message::Refresh);
        assert_eq!(
            cmd,
            Command::Search {
                base_filter: String::new(),
                filter: "show".into(),
                page: 1
            }
        );
        drive(&mut c, cmd, &pages);
        assert_eq!(c.shows().len(), 10);
        assert_eq!(c.page(), 1);
    }

    #[test]
    fn test_load_next_without_search() {
        let mut c = ready(vec![]);
        assert_eq!(c.update(Message::LoadNextShows), Command::None);
        assert_eq!(c.presenter().errors(), vec![ErrorKind::InvalidFilter]);
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_empty_pages_are_skipped() {
        let mut c = ready(vec![]);
        let pages = [
            page_of(vec![person(1)], 1, 3),
            page_of(vec![], 2, 3),
            page_of(movies(0..5), 3, 3),
        ];
        search(&mut c, "obscure", &pages);

        assert_eq!(c.page(), 3);
        assert_eq!(c.max_pages(), 3);
        assert_eq!(c.shows().len(), 5);
        let events = &c.presenter().events;
        assert!(c.presenter().errors().is_empty());
        assert_eq!(
            events.iter().filter(|e| **e == Event::Loading(true)).count(),
            1
        );
        assert_eq!(events.last(), Some(&Event::Loading(false)));
    }

    #[test]
    fn test_next_page_skips_empty_pages() {
        let mut c = ready(vec![]);
        let pages = [
            page_of(movies(0..5), 1, 4),
            page_of(vec![person(90), person(91)], 2, 4),
            page_of(vec![], 3, 4),
            page_of(movies(5..8), 4, 4),
        ];
        search(&mut c, "show", &pages);
        c.presenter_mut().take();

        let cmd = c.update(Message::LoadNextShows);
        assert_eq!(
            cmd,
            Command::Search {
                base_filter: "show".into(),
                filter: "show".into(),
                page: 2,
            }
        );
        let cmd = c.update(Message::ShowsLoaded {
            base_filter: "show".into(),
            filter: "show".into(),
            page: 2,
            result: Ok(pages[1].clone()),
        });
        assert_eq!(c.page(), 2);
        assert_eq!(
            cmd,
            Command::Search {
                base_filter: "show".into(),
                filter: "show".into(),
                page: 3,
            }
        );
        drive(&mut c, cmd, &pages);

        assert_eq!(c.page(), 4);
        assert_eq!(c.max_pages(), 4);
        assert_eq!(c.shows().len(), 8);
        assert_eq!(c.shows()[7].id, 7);
        assert!(c.presenter().errors().is_empty());
        assert!(c.presenter().loading_balanced());
        assert_eq!(c.presenter().last_state().unwrap().has_more, Some(false));
    }

    #[test]
    fn test_new_search_running_out_keeps_old_results() {
        let mut c = ready(vec![]);
        search(&mut c, "first", &[page_of(movies(0..10), 1, 5)]);
        c.presenter_mut().take();

        let pages = [page_of(vec![person(1)], 1, 2), page_of(vec![], 2, 2)];
        search(&mut c, "second", &pages);

        assert_eq!(c.presenter().errors(), vec![ErrorKind::NoMoreShows]);
        assert_eq!(c.page(), 1);
        assert_eq!(c.max_pages(), 5);
        assert_eq!(c.show_filter(), "first");
        assert_eq!(c.shows().len(), 10);
        assert!(c.presenter().last_state().is_none());
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_no_results_leaves_cursor() {
        let mut c = ready(vec![]);
        let pages = [page_of(movies(0..10), 1, 4)];
        search(&mut c, "first", &pages);
        c.presenter_mut().take();

        search(&mut c, "nothing", &[page_of(vec![person(5)], 1, 1)]);
        assert_eq!(c.presenter().errors(), vec![ErrorKind::NoResults]);
        assert_eq!(c.page(), 1);
        assert_eq!(c.max_pages(), 4);
        assert_eq!(c.show_filter(), "first");
        assert_eq!(c.shows().len(), 10);
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_no_more_shows_leaves_cursor() {
        let mut c = ready(vec![]);
        let pages = [page_of(movies(0..10), 1, 2), page_of(vec![], 2, 2)];
        search(&mut c, "show", &pages);
        c.presenter_mut().take();

        let cmd = c.update(Message::LoadNextShows);
        drive(&mut c, cmd, &pages);
        assert_eq!(c.presenter().errors(), vec![ErrorKind::NoMoreShows]);
        assert_eq!(c.page(), 1);
        assert_eq!(c.max_pages(), 2);
        assert_eq!(c.shows().len(), 10);
        assert!(c.presenter().loading_balanced());
    }

    #[test]
    fn test_gateway_fault() {
        let mut c = ready(vec![]);
        let cmd = c.update(Message::SearchShows {
            query: "x".into(),
            submit: true,
        });
        let Command::Search {
            base_filter,
            filter,
            page,
        } = cmd
        else {
            panic!("expected a search");
        };
        c.update(Message::ShowsLoaded {
            base_filter,
            filter,
            page,
            result: Err("timed out".into()),
        });
        assert_eq!(
            c.presenter().events,
            vec![
                Event::Loading(true),
                Event::Error(ErrorKind::RetrieveFailed, Some("timed out".into())),
                Event::Loading(false),
            ]
        );
        assert_eq!(c.show_filter(), "");
    }

    #[test]
    fn test_display_show_list_is_idempotent() {
        let mut c = ready(vec![]);
        search(&mut c, "show", &[page_of(movies(0..4), 1, 2)]);
        c.presenter_mut().take();

        c.update(Message::DisplayShowList);
        c.update(Message::DisplayShowList);
        let events = c.presenter_mut().take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
        let Event::State(state) = &events[0] else {
            panic!("expected a state");
        };
        assert_eq!(state.in_catalog, Some(true));
        assert_eq!(state.has_more, Some(true));
        assert_eq!(state.filter.as_deref(), Some("show"));
        assert_eq!(state.shows.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn test_display_empty_watchlist() {
        let mut c = ready(vec![]);
        c.update(Message::DisplayWatchlist);
        assert_eq!(c.presenter().errors(), vec![ErrorKind::NoWatchlist]);
        assert_eq!(c.mode(), BrowseMode::Catalog);
    }

    #[test]
    fn test_watchlist_filter_is_local() {
        let mut c = ready(vec![entry(1, "Lost"), entry(2, "Luther")]);
        c.update(Message::DisplayWatchlist);
        assert_eq!(c.mode(), BrowseMode::Watchlist);
        let state = c.presenter().last_state().unwrap();
        assert_eq!(state.in_catalog, Some(false));
        assert_eq!(state.shows.as_ref().map(Vec::len), Some(2));
        c.presenter_mut().take();

        for submit in [false, true] {
            let cmd = c.update(Message::SearchShows {
                query: "lu".into(),
                submit,
            });
            assert_eq!(cmd, Command::None);
        }
        assert_eq!(c.watch_filter(), "lu");
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::State(ViewState {
                    filter: Some("lu".into()),
                    ..Default::default()
                });
                2
            ]
        );

        c.update(Message::DisplayShowList);
        c.update(Message::DisplayWatchlist);
        let state = c.presenter().last_state().unwrap();
        assert_eq!(state.filter.as_deref(), Some("lu"));
    }

    #[test]
    fn test_select_from_catalog() {
        let mut c = ready(vec![]);
        search(&mut c, "show", &[page_of(movies(0..3), 1, 1)]);
        c.presenter_mut().take();

        let cmd = c.update(Message::SelectShow {
            id: 1,
            from_catalog: true,
        });
        let Command::Details(show) = cmd else {
            panic!("expected a details fetch");
        };
        assert!(show.is_movie);
        let details = ShowDetails {
            id: 1,
            overview: Some("Plot.".into()),
            genres: vec!["Drama".into()],
            videos: vec![Video {
                key: "abc".into(),
                name: "Trailer".into(),
                site: "YouTube".into(),
                kind: "Trailer".into(),
            }],
            ..Default::default()
        };
        c.update(Message::DetailsLoaded {
            show: show.clone(),
            result: Ok(details.clone()),
        });

        let expected = ShowDetail::compose(&show, &details);
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    selection_changed: true,
                    show: Some(expected.clone()),
                    watch_listed: Some(false),
                    ..Default::default()
                }),
                Event::Loading(false),
            ]
        );
        assert_eq!(c.selected(), Some(&expected));

        c.update(Message::ExitDetail);
        assert!(c.selected().is_none());
        assert_eq!(
            c.presenter_mut().take(),
            vec![Event::State(ViewState {
                selection_changed: true,
                watch_listed: Some(false),
                ..Default::default()
            })]
        );
    }

    #[test]
    fn test_select_details_fault() {
        let mut c = ready(vec![]);
        search(&mut c, "show", &[page_of(movies(0..3), 1, 1)]);
        let Command::Details(show) = c.update(Message::SelectShow {
            id: 2,
            from_catalog: true,
        }) else {
            panic!("expected a details fetch");
        };
        c.presenter_mut().take();
        c.update(Message::DetailsLoaded {
            show,
            result: Err("404".into()),
        });
        assert_eq!(c.presenter().errors(), vec![ErrorKind::RetrieveFailed]);
        assert!(c.selected().is_none());
    }

    #[test]
    fn test_select_from_watchlist_and_missing() {
        let mut c = ready(vec![entry(5, "Fargo")]);
        assert_eq!(
            c.update(Message::SelectShow {
                id: 5,
                from_catalog: false
            }),
            Command::None
        );
        let state = c.presenter().last_state().unwrap();
        assert_eq!(state.watch_listed, Some(true));
        assert_eq!(state.show.as_ref().map(|s| s.title.as_str()), Some("Fargo"));
        c.presenter_mut().take();

        c.update(Message::SelectShow {
            id: 6,
            from_catalog: true,
        });
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::Error(ErrorKind::ShowNotFound, None),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_toggle_without_selection() {
        let mut c = ready(vec![]);
        assert_eq!(c.update(Message::ToggleWatch), Command::None);
        assert_eq!(
            c.presenter().events,
            vec![
                Event::Loading(true),
                Event::Error(ErrorKind::ShowNotSelected, None),
                Event::Loading(false),
            ]
        );
    }

    fn select_catalog_show(c: &mut Coordinator<Recorder>, id: i64) {
        search(c, "show", &[page_of(movies(0..3), 1, 1)]);
        let Command::Details(show) = c.update(Message::SelectShow {
            id,
            from_catalog: true,
        }) else {
            panic!("expected a details fetch");
        };
        c.update(Message::DetailsLoaded {
            show,
            result: Ok(ShowDetails::default()),
        });
        c.presenter_mut().take();
    }

    #[test]
    fn test_toggle_adds_selection() {
        let mut c = ready(vec![]);
        select_catalog_show(&mut c, 1);

        let Command::Add(added) = c.update(Message::ToggleWatch) else {
            panic!("expected an add");
        };
        assert_eq!(added.id, 1);
        let stored = vec![added.clone(), entry(9, "Zodiac")];
        c.update(Message::WatchlistAdded(Ok(stored.clone())));

        assert_eq!(c.watchlist(), stored.as_slice());
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    watch_listed: Some(true),
                    ..Default::default()
                }),
                Event::State(ViewState {
                    has_watchlist: Some(true),
                    watch_listed: Some(true),
                    ..Default::default()
                }),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_toggle_add_fault_corrects_flag() {
        let mut c = ready(vec![]);
        select_catalog_show(&mut c, 1);

        c.update(Message::ToggleWatch);
        c.update(Message::WatchlistAdded(Err("readonly".into())));
        assert!(c.watchlist().is_empty());
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    watch_listed: Some(true),
                    ..Default::default()
                }),
                Event::State(ViewState {
                    has_watchlist: Some(false),
                    watch_listed: Some(false),
                    ..Default::default()
                }),
                Event::Error(ErrorKind::AddFailed, Some("readonly".into())),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_toggle_removes_selection() {
        let mut c = ready(vec![entry(1, "Show 1")]);
        select_catalog_show(&mut c, 1);
        assert_eq!(c.update(Message::ToggleWatch), Command::Delete { id: 1 });
        c.update(Message::WatchlistDeleted(Ok(WatchlistDelete {
            removed: true,
            entries: vec![],
        })));
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    watch_listed: Some(false),
                    ..Default::default()
                }),
                Event::State(ViewState {
                    has_watchlist: Some(false),
                    watch_listed: Some(false),
                    ..Default::default()
                }),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_toggle_delete_fault_corrects_flag() {
        let mut c = ready(vec![entry(1, "Show 1")]);
        select_catalog_show(&mut c, 1);
        c.update(Message::ToggleWatch);
        c.update(Message::WatchlistDeleted(Err("locked".into())));
        let events = c.presenter_mut().take();
        assert_eq!(
            events[2],
            Event::State(ViewState {
                has_watchlist: Some(true),
                watch_listed: Some(true),
                ..Default::default()
            })
        );
        assert_eq!(
            events[3],
            Event::Error(ErrorKind::DeleteFailed, Some("locked".into()))
        );
        assert_eq!(c.watchlist().len(), 1);
    }

    #[test]
    fn test_delete_in_watchlist_mode() {
        let mut c = ready(vec![entry(1, "Lost"), entry(2, "Luther")]);
        c.update(Message::DisplayWatchlist);
        c.presenter_mut().take();

        assert_eq!(
            c.update(Message::DeleteFromWatchlist { id: 1 }),
            Command::Delete { id: 1 }
        );
        c.update(Message::WatchlistDeleted(Ok(WatchlistDelete {
            removed: true,
            entries: vec![entry(2, "Luther")],
        })));
        assert_eq!(c.mode(), BrowseMode::Watchlist);
        assert_eq!(
            c.presenter_mut().take(),
            vec![
                Event::Loading(true),
                Event::State(ViewState {
                    shows: Some(vec![entry(2, "Luther").summary_view()]),
                    has_more: Some(false),
                    has_watchlist: Some(true),
                    ..Default::default()
                }),
                Event::Loading(false),
            ]
        );
    }

    #[test]
    fn test_delete_last_entry_returns_to_catalog() {
        let mut c = ready(vec![entry(1, "Lost")]);
        search(&mut c, "show", &[page_of(movies(0..2), 1, 3)]);
        c.update(Message::DisplayWatchlist);
        c.presenter_mut().take();

        c.update(Message::DeleteFromWatchlist { id: 42 });
        c.update(Message::WatchlistDeleted(Ok(WatchlistDelete {
            removed: false,
            entries: vec![],
        })));

        assert_eq!(c.mode(), BrowseMode::Catalog);
        let events = c.presenter_mut().take();
        assert_eq!(
            events[1],
            Event::State(ViewState {
                shows: Some(c.shows().to_vec()),
                in_catalog: Some(true),
                filter: Some("show".into()),
                has_more: Some(true),
                has_watchlist: Some(false),
                ..Default::default()
            })
        );
        assert!(!events.contains(&Event::Error(ErrorKind::NoWatchlist, None)));
        assert!(events.contains(&Event::Error(ErrorKind::ShowNotFound, None)));
        assert_eq!(events.last(), Some(&Event::Loading(false)));
    }

    #[test]
    fn test_dispose_silences_everything() {
        let (mut c, _) = Coordinator::new(Recorder::default());
        c.presenter_mut().take();
        assert_eq!(c.update(Message::Dispose), Command::None);
        assert_eq!(c.update(Message::Dispose), Command::None);
        assert!(c.is_disposed());

        c.update(Message::WatchlistLoaded(Ok(vec![entry(1, "Lost")])));
        let cmd = c.update(Message::SearchShows {
            query: "x".into(),
            submit: true,
        });
        assert_eq!(cmd, Command::None);
        assert!(c.presenter().events.is_empty());
        assert!(c.watchlist().is_empty());
    }
}
