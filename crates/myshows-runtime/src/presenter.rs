use tokio::sync::mpsc;

use myshows_core::view_state::{ErrorKind, Presenter, ViewState};

/// One presenter signal, in the order the coordinator raised it.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    State(ViewState),
    Loading(bool),
    Error {
        kind: ErrorKind,
        detail: Option<String>,
    },
}

/// Forwards presenter signals to whatever task renders them.
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("UI receiver dropped");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn update_state(&mut self, state: ViewState) {
        self.send(UiEvent::State(state));
    }

    fn show_loading(&mut self, loading: bool) {
        self.send(UiEvent::Loading(loading));
    }

    fn show_error(&mut self, kind: ErrorKind, detail: Option<String>) {
        self.send(UiEvent::Error { kind, detail });
    }
}
