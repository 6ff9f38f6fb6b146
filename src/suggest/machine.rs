//! Suggestion state machine
//!
//! Consumes settled terms and keeps one authoritative [`SuggestState`] in a
//! `watch` channel for replay. Observers that must see every state in order
//! register with [`SuggestionMachine::notify`].
//!
//! Searches are switch-latest: every dispatched lookup is tagged with a
//! generation number and a completion is applied only if its generation is
//! still the current one. The superseded task is aborted too, which drops its
//! HTTP request early.

use super::models::{SuggestState, Suggestion};
use crate::config::SuggestSettings;
use crate::provider::{ProviderResponse, SearchProvider};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outcome of one dispatched search, reported back to the machine loop
struct Completion {
    generation: u64,
    term: String,
    outcome: Result<Vec<Suggestion>, String>,
}

/// The search currently allowed to produce state
struct Pending {
    generation: u64,
    previous: Vec<Suggestion>,
    task: JoinHandle<()>,
}

pub struct SuggestionMachine {
    provider: Arc<dyn SearchProvider>,
    min_length: usize,
    limit: u32,
    state: watch::Sender<SuggestState>,
    listeners: Vec<mpsc::UnboundedSender<SuggestState>>,
}

impl SuggestionMachine {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        settings: &SuggestSettings,
        initial: SuggestState,
    ) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            provider,
            min_length: settings.min_length,
            limit: settings.limit,
            state,
            listeners: Vec::new(),
        }
    }

    /// Observe the state; the receiver starts at the latest value
    pub fn subscribe(&self) -> watch::Receiver<SuggestState> {
        self.state.subscribe()
    }

    /// Receive every state published from now on, in publish order
    pub fn notify(&mut self) -> mpsc::UnboundedReceiver<SuggestState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    pub fn spawn(self, terms: mpsc::UnboundedReceiver<String>) -> JoinHandle<()> {
        tokio::spawn(self.run(terms))
    }

    /// Process settled terms until the term source closes
    pub async fn run(mut self, mut terms: mpsc::UnboundedReceiver<String>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut generation: u64 = 0;
        let mut pending: Option<Pending> = None;

        loop {
            tokio::select! {
                term = terms.recv() => {
                    let Some(term) = term else { break };
                    generation += 1;

                    if let Some(stale) = pending.take() {
                        debug!("Superseding search #{}", stale.generation);
                        stale.task.abort();
                    }

                    if term.chars().count() < self.min_length {
                        self.publish(SuggestState::Idle { term, items: Vec::new() });
                        continue;
                    }

                    let previous = self.state.borrow().items().to_vec();
                    self.publish(SuggestState::Loading {
                        term: term.clone(),
                        items: previous.clone(),
                    });

                    let task = self.dispatch(generation, term, done_tx.clone());
                    pending = Some(Pending { generation, previous, task });
                }

                Some(done) = done_rx.recv() => {
                    if pending.as_ref().map(|p| p.generation) != Some(done.generation) {
                        debug!("Discarding stale result for {:?}", done.term);
                        continue;
                    }
                    let Some(current) = pending.take() else { continue };

                    let state = match done.outcome {
                        Ok(items) => {
                            info!("{} suggestions for {:?}", items.len(), done.term);
                            SuggestState::Done { term: done.term, items }
                        }
                        Err(message) => {
                            warn!("Search for {:?} failed: {}", done.term, message);
                            SuggestState::Error {
                                term: done.term,
                                items: current.previous,
                                message,
                            }
                        }
                    };
                    self.publish(state);
                }
            }
        }

        if let Some(stale) = pending.take() {
            stale.task.abort();
        }
        debug!("Suggestion machine stopped");
    }

    fn dispatch(
        &self,
        generation: u64,
        term: String,
        done: mpsc::UnboundedSender<Completion>,
    ) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let limit = self.limit;
        debug!("Dispatching search #{} for {:?} via {}", generation, term, provider.name());

        tokio::spawn(async move {
            let outcome = provider
                .search(&term, limit)
                .await
                .map(ProviderResponse::into_suggestions)
                .map_err(|e| e.to_string());

            // The machine may already be gone; nothing to report to then.
            let _ = done.send(Completion {
                generation,
                term,
                outcome,
            });
        })
    }

    fn publish(&mut self, state: SuggestState) {
        debug!("State -> {:?}", state);
        self.listeners.retain(|tx| tx.send(state.clone()).is_ok());
        self.state.send_replace(state);
    }
}
