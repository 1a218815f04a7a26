use std::fmt::Write;

use myshows_core::models::{filter_by_title, ShowDetail, ShowSummary};
use myshows_core::view_state::ViewState;

/// What the terminal currently shows, rebuilt from partial [`ViewState`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub shows: Vec<ShowSummary>,
    pub show: Option<ShowDetail>,
    pub has_more: bool,
    pub filter: String,
    pub in_catalog: bool,
    pub has_watchlist: bool,
    pub watch_listed: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            shows: Vec::new(),
            show: None,
            has_more: false,
            filter: String::new(),
            in_catalog: true,
            has_watchlist: false,
            watch_listed: false,
        }
    }
}

impl Screen {
    /// Merge a snapshot; absent fields keep their value.
    pub fn apply(&mut self, state: ViewState) {
        if let Some(shows) = state.shows {
            self.shows = shows;
        }
        if state.selection_changed {
            self.show = state.show;
        }
        if let Some(has_more) = state.has_more {
            self.has_more = has_more;
        }
        if let Some(filter) = state.filter {
            self.filter = filter;
        }
        if let Some(in_catalog) = state.in_catalog {
            self.in_catalog = in_catalog;
        }
        if let Some(has_watchlist) = state.has_watchlist {
            self.has_watchlist = has_watchlist;
        }
        if let Some(watch_listed) = state.watch_listed {
            self.watch_listed = watch_listed;
        }
    }

    pub fn title(&self) -> &str {
        if !self.filter.is_empty() {
            &self.filter
        } else if self.in_catalog {
            "MyShows"
        } else {
            "Watchlist"
        }
    }

    pub fn can_go_to_watchlist(&self) -> bool {
        self.in_catalog && self.has_watchlist
    }

    pub fn can_go_to_shows(&self) -> bool {
        !self.in_catalog
    }

    /// Rows as listed: the watchlist is narrowed by the typed filter.
    pub fn visible_shows(&self) -> Vec<&ShowSummary> {
        if self.in_catalog {
            self.shows.iter().collect()
        } else {
            filter_by_title(&self.shows, &self.filter)
        }
    }

    /// 1-based row lookup.
    pub fn row(&self, n: usize) -> Option<&ShowSummary> {
        n.checked_sub(1)
            .and_then(|i| self.visible_shows().get(i).copied())
    }

    pub fn render(&self) -> String {
        match &self.show {
            Some(show) => self.render_detail(show),
            None => self.render_list(),
        }
    }

    fn render_list(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.title());
        let rows = self.visible_shows();
        if rows.is_empty() {
            let _ = writeln!(out, "  (nothing here yet)");
        }
        for (i, show) in rows.iter().enumerate() {
            let kind = if show.is_movie { "movie" } else { "tv" };
            let _ = writeln!(
                out,
                "{:>3}. {} ({}) rating {} [{kind}]",
                i + 1,
                show.title,
                show.release,
                show.rating
            );
        }

        let mut hints = Vec::new();
        if self.has_more {
            hints.push("next");
        }
        if self.can_go_to_watchlist() {
            hints.push("watchlist");
        }
        if self.can_go_to_shows() {
            hints.push("shows");
        }
        if !hints.is_empty() {
            let _ = writeln!(out, "  more: {}", hints.join(", "));
        }
        out
    }

    fn render_detail(&self, show: &ShowDetail) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", show.title);
        let mark = if self.watch_listed {
            "in watchlist"
        } else {
            "not in watchlist"
        };
        let _ = writeln!(out, "  [{mark}]");
        let _ = writeln!(out, "  Rating:  {}", show.rating);
        let _ = writeln!(out, "  Release: {}", show.release);
        let _ = writeln!(out, "  Genre:   {}", show.genre);
        if let Some(url) = show.image_url() {
            let _ = writeln!(out, "  Poster:  {url}");
        }
        if let (Some(url), Some(name)) = (show.trailer_url(), &show.trailer_name) {
            let _ = writeln!(out, "  Trailer: {name} {url}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", show.summary);
        out
    }
}
