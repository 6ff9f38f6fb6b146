//! Turns raw keystrokes into distinct, settled search terms

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Input debouncer
///
/// A term settles once the raw source has been quiet for `quiet`, and is
/// forwarded only when it differs from the previously settled term. Text is
/// trimmed before both the comparison and the emission.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    quiet: Duration,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Start debouncing `raw` on a new task.
    ///
    /// Each call is independent, so the same debouncer can be restarted on a
    /// fresh source.
    pub fn spawn(
        &self,
        raw: mpsc::UnboundedReceiver<String>,
    ) -> (mpsc::UnboundedReceiver<String>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(raw, tx));
        (rx, handle)
    }

    /// Drive the debounce loop until either side of the pipe closes
    pub async fn run(
        self,
        mut raw: mpsc::UnboundedReceiver<String>,
        settled: mpsc::UnboundedSender<String>,
    ) {
        let mut pending: Option<(String, Instant)> = None;
        let mut last: Option<String> = None;

        loop {
            let deadline = pending.as_ref().map(|(_, at)| *at);

            tokio::select! {
                biased;

                event = raw.recv() => match event {
                    Some(text) => {
                        let term = text.trim().to_string();
                        pending = Some((term, Instant::now() + self.quiet));
                    }
                    None => break,
                },

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let Some((term, _)) = pending.take() else {
                        continue;
                    };
                    if last.as_deref() == Some(term.as_str()) {
                        debug!("Term {:?} unchanged, not emitting", term);
                        continue;
                    }
                    debug!("Term settled: {:?}", term);
                    last = Some(term.clone());
                    if settled.send(term).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, sleep};

    fn start(quiet_ms: u64) -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (settled, _handle) = Debouncer::new(Duration::from_millis(quiet_ms)).spawn(raw_rx);
        (raw_tx, settled)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_once_with_last_value() {
        let (raw, mut settled) = start(500);

        for text in ["c", "ca", "cat"] {
            raw.send(text.to_string()).unwrap();
            sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(settled.recv().await.as_deref(), Some("cat"));
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_period() {
        let (raw, mut settled) = start(500);

        raw.send("dog".to_string()).unwrap();
        sleep(Duration::from_millis(499)).await;
        assert!(settled.try_recv().is_err());

        advance(Duration::from_millis(2)).await;
        assert_eq!(settled.recv().await.as_deref(), Some("dog"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trims_and_drops_repeats() {
        let (raw, mut settled) = start(50);

        raw.send("  cat ".to_string()).unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("cat"));

        raw.send("cat  ".to_string()).unwrap();
        sleep(Duration::from_millis(200)).await;
        assert!(settled.try_recv().is_err());

        raw.send("cats".to_string()).unwrap();
        assert_eq!(settled.recv().await.as_deref(), Some("cats"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ends_when_source_closes() {
        let (raw, mut settled) = start(50);
        raw.send("pending".to_string()).unwrap();
        drop(raw);

        assert_eq!(settled.recv().await, None);
    }
}
