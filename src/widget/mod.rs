//! Suggestion widget
//!
//! Wires the debouncer, the state machine and the render step together
//! behind presentation traits. A frontend supplies the input, status and list
//! handles, forwards raw text changes with [`Widget::input`] and user actions
//! with [`Widget::send`].

mod controller;

use crate::config::SuggestSettings;
use crate::provider::SearchProvider;
use crate::storage::{MemoryStore, SnapshotStore};
use crate::suggest::{Debouncer, SuggestState, Suggestion, SuggestionMachine};
use controller::{Controller, Views};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Text field the user types into
pub trait InputField: Send {
    fn set_text(&mut self, text: &str);
    fn blur(&mut self);
}

/// Single-line status label
pub trait StatusView: Send {
    fn set_status(&mut self, text: &str);
}

/// Suggestion list, with the highlighted row if any
pub trait ListView: Send {
    fn render(&mut self, items: &[Suggestion], selected: Option<usize>);
}

/// Opens a link without replacing the current view
pub trait LinkOpener: Send {
    fn open(&mut self, url: &str) -> std::io::Result<()>;
}

/// Opens links with the platform's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&mut self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }
}

/// User actions that read the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveDown,
    MoveUp,
    Escape,
    Activate,
    /// A rendered row was clicked
    Click(usize),
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("required element missing: {0}")]
    MissingElement(&'static str),
    #[error("invalid widget configuration: {0}")]
    InvalidConfig(String),
}

pub struct WidgetBuilder {
    provider: Arc<dyn SearchProvider>,
    settings: SuggestSettings,
    input: Option<Box<dyn InputField>>,
    status: Option<Box<dyn StatusView>>,
    list: Option<Box<dyn ListView>>,
    opener: Box<dyn LinkOpener>,
    snapshots: Option<SnapshotStore>,
}

impl WidgetBuilder {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            settings: SuggestSettings::default(),
            input: None,
            status: None,
            list: None,
            opener: Box::new(SystemOpener),
            snapshots: None,
        }
    }

    pub fn settings(mut self, settings: SuggestSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn input(mut self, input: impl InputField + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn status(mut self, status: impl StatusView + 'static) -> Self {
        self.status = Some(Box::new(status));
        self
    }

    pub fn list(mut self, list: impl ListView + 'static) -> Self {
        self.list = Some(Box::new(list));
        self
    }

    pub fn opener(mut self, opener: impl LinkOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn snapshots(mut self, snapshots: SnapshotStore) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Validate, restore the last snapshot and start the pipeline.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(self) -> Result<Widget, WidgetError> {
        let mut input = self.input.ok_or(WidgetError::MissingElement("input"))?;
        let status = self.status.ok_or(WidgetError::MissingElement("status"))?;
        let list = self.list.ok_or(WidgetError::MissingElement("list"))?;
        self.settings
            .validate()
            .map_err(|e| WidgetError::InvalidConfig(e.to_string()))?;

        let snapshots = self.snapshots.unwrap_or_else(|| {
            SnapshotStore::new(Arc::new(MemoryStore::new()), Duration::from_secs(30 * 60))
        });

        let restored = snapshots.load();
        if let Some(snapshot) = &restored {
            debug!("Restoring {} suggestions for {:?}", snapshot.items.len(), snapshot.term);
            input.set_text(&snapshot.term);
        }
        let initial = SuggestState::initial(restored.map(|s| (s.term, s.items)));

        let mut machine =
            SuggestionMachine::new(self.provider, &self.settings, initial.clone());
        let states = machine.subscribe();
        let updates = machine.notify();

        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (terms, debounce_task) = Debouncer::new(self.settings.debounce()).spawn(raw_rx);
        let machine_task = machine.spawn(terms);

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let views = Views {
            input,
            status,
            list,
            opener: self.opener,
        };
        let controller = Controller::new(views, snapshots, self.settings.min_length);
        let controller_task = tokio::spawn(controller.run(initial, updates, intent_rx));

        info!(
            "Widget mounted (min_length={}, debounce={}ms, limit={})",
            self.settings.min_length, self.settings.debounce_ms, self.settings.limit
        );

        Ok(Widget {
            raw: raw_tx,
            intents: intent_tx,
            states,
            tasks: vec![debounce_task, machine_task, controller_task],
        })
    }
}

/// A mounted widget; dropping it stops the pipeline as well
pub struct Widget {
    raw: mpsc::UnboundedSender<String>,
    intents: mpsc::UnboundedSender<Intent>,
    states: watch::Receiver<SuggestState>,
    tasks: Vec<JoinHandle<()>>,
}

impl Widget {
    /// Report the input field's full text after a change
    pub fn input(&self, text: impl Into<String>) {
        if self.raw.send(text.into()).is_err() {
            debug!("Input after shutdown ignored");
        }
    }

    pub fn send(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            debug!("Intent after shutdown ignored");
        }
    }

    /// Follow the state; the receiver starts at the latest value
    pub fn subscribe(&self) -> watch::Receiver<SuggestState> {
        self.states.clone()
    }

    pub fn state(&self) -> SuggestState {
        self.states.borrow().clone()
    }

    /// Stop every task. Once this returns nothing renders or persists again.
    pub async fn dispose(mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        for task in &tasks {
            task.abort();
        }
        join_all(tasks).await;
        info!("Widget disposed");
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
