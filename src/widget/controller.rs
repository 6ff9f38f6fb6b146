//! Render step and intent handling
//!
//! The controller is the only owner of the cursor and the presentation
//! handles. It receives every published state in order, applies each one to
//! the views and the snapshot store, and resolves intents against the cached
//! current state.

use super::{InputField, Intent, LinkOpener, ListView, StatusView};
use crate::storage::SnapshotStore;
use crate::suggest::{Cursor, SuggestState, Suggestion};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub(crate) struct Views {
    pub input: Box<dyn InputField>,
    pub status: Box<dyn StatusView>,
    pub list: Box<dyn ListView>,
    pub opener: Box<dyn LinkOpener>,
}

pub(crate) struct Controller {
    views: Views,
    snapshots: SnapshotStore,
    min_length: usize,
    current: SuggestState,
    cursor: Cursor,
}

impl Controller {
    pub(crate) fn new(views: Views, snapshots: SnapshotStore, min_length: usize) -> Self {
        Self {
            views,
            snapshots,
            min_length,
            current: SuggestState::default(),
            cursor: Cursor::new(),
        }
    }

    pub(crate) async fn run(
        mut self,
        initial: SuggestState,
        mut states: mpsc::UnboundedReceiver<SuggestState>,
        mut intents: mpsc::UnboundedReceiver<Intent>,
    ) {
        // The starting value is either empty or a restored snapshot; showing
        // it must not re-stamp or delete that snapshot.
        self.current = initial;
        self.render();

        loop {
            tokio::select! {
                state = states.recv() => match state {
                    Some(state) => self.apply(state),
                    None => break,
                },
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle(intent),
                    None => break,
                },
            }
        }
        debug!("Controller stopped");
    }

    fn apply(&mut self, state: SuggestState) {
        self.cursor.reset();
        self.current = state;
        self.render();

        match &self.current {
            SuggestState::Done { term, items } if !items.is_empty() => {
                self.snapshots.save(term, items);
            }
            SuggestState::Idle { term, .. } if term.chars().count() < self.min_length => {
                self.snapshots.clear();
            }
            SuggestState::Idle { .. }
            | SuggestState::Loading { .. }
            | SuggestState::Done { .. }
            | SuggestState::Error { .. } => {}
        }
    }

    fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::MoveDown => {
                self.cursor.move_down(self.current.items().len());
                self.render_list();
            }
            Intent::MoveUp => {
                self.cursor.move_up();
                self.render_list();
            }
            Intent::Escape => {
                self.cursor.reset();
                self.views.input.blur();
                self.render_list();
            }
            Intent::Activate => {
                let Some(item) = self.cursor.selected().and_then(|i| self.item(i)) else {
                    return;
                };
                if let Some(url) = item.url() {
                    if let Err(e) = self.views.opener.open(url) {
                        warn!("Could not open {}: {}", url, e);
                    }
                }
                self.select(&item);
            }
            Intent::Click(index) => match self.item(index) {
                Some(item) => self.select(&item),
                None => debug!("Click on row {} outside the current list", index),
            },
        }
    }

    fn item(&self, index: usize) -> Option<Suggestion> {
        self.current.items().get(index).cloned()
    }

    /// Adopt `item` as the query and remember the list under its title
    fn select(&mut self, item: &Suggestion) {
        self.views.input.set_text(item.title());
        self.snapshots.save(item.title(), self.current.items());
    }

    fn render(&mut self) {
        self.views.status.set_status(&self.current.status_text());
        self.render_list();
    }

    fn render_list(&mut self) {
        self.views
            .list
            .render(self.current.items(), self.cursor.selected());
    }
}
