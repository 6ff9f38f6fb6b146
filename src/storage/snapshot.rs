//! Last-result snapshot codec

use super::KeyValueStore;
use crate::suggest::Suggestion;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fixed key holding the single snapshot
pub const SNAPSHOT_KEY: &str = "suggest:last";

/// Persisted `{ term, items, savedAt }` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSuggestions {
    pub term: String,
    pub items: Vec<Suggestion>,
    /// Epoch milliseconds
    pub saved_at: i64,
}

/// Reads and writes the snapshot, swallowing every store failure
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn KeyValueStore>,
    retention: Duration,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn KeyValueStore>, retention: Duration) -> Self {
        Self { store, retention }
    }

    pub fn load(&self) -> Option<PersistedSuggestions> {
        self.load_at(Utc::now().timestamp_millis())
    }

    /// Read the snapshot as seen at `now` (epoch millis).
    ///
    /// Corrupt or expired records read as absent; expired ones and ones
    /// stamped after `now` are deleted.
    pub fn load_at(&self, now: i64) -> Option<PersistedSuggestions> {
        let raw = match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!("Snapshot read failed: {}", e);
                return None;
            }
        };

        let Some(snapshot) = decode(&raw) else {
            debug!("Ignoring malformed snapshot");
            return None;
        };

        if snapshot.saved_at > now {
            debug!("Snapshot for {:?} is stamped in the future", snapshot.term);
            self.clear();
            return None;
        }

        let age = now - snapshot.saved_at;
        if age > self.retention.as_millis() as i64 {
            debug!("Snapshot for {:?} expired ({} ms old)", snapshot.term, age);
            self.clear();
            return None;
        }

        Some(snapshot)
    }

    pub fn save(&self, term: &str, items: &[Suggestion]) {
        self.save_at(term, items, Utc::now().timestamp_millis());
    }

    /// Replace the snapshot with `(term, items)` stamped at `now`
    pub fn save_at(&self, term: &str, items: &[Suggestion], now: i64) {
        let snapshot = PersistedSuggestions {
            term: term.to_string(),
            items: items.to_vec(),
            saved_at: now,
        };
        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(e) => {
                debug!("Snapshot encode failed: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(SNAPSHOT_KEY, &encoded) {
            debug!("Snapshot write failed: {}", e);
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.delete(SNAPSHOT_KEY) {
            debug!("Snapshot delete failed: {}", e);
        }
    }
}

fn decode(raw: &str) -> Option<PersistedSuggestions> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let term = value.get("term")?.as_str()?.to_string();
    let items = value
        .get("items")?
        .as_array()?
        .iter()
        .filter_map(|item| serde_json::from_value::<Suggestion>(item.clone()).ok())
        .filter(Suggestion::is_valid)
        .collect();
    let saved_at = value
        .get("savedAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))?;

    Some(PersistedSuggestions {
        term,
        items,
        saved_at,
    })
}
