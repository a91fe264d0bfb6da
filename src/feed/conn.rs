use tokio::sync::{mpsc, watch};

use super::ws::StreamFeed;
use super::StreamMode;
use crate::event::{AppEvent, FeedStatus};

/// Owns at most one live subscription at a time and tracks its health.
///
/// Each open bumps a generation counter; the watch sender is the teardown
/// handle for the task running that generation. Callbacks from a generation
/// that is no longer current (or whose handle was dropped by `close`) are
/// rejected by `is_current`, so a stale subscription can never mutate state
/// that now belongs to its successor.
#[derive(Debug)]
pub struct Connection {
    ws_url: String,
    events_tx: mpsc::Sender<AppEvent>,
    status: FeedStatus,
    generation: u64,
    shutdown: Option<watch::Sender<bool>>,
}

impl Connection {
    pub fn new(ws_url: &str, events_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            ws_url: ws_url.to_string(),
            events_tx,
            status: FeedStatus::Disconnected,
            generation: 0,
            shutdown: None,
        }
    }

    /// Open a subscription for `mode`, tearing down any existing one first.
    /// State resets to `connecting`; the spawned task reports `live` or
    /// `disconnected` under the new generation. Returns that generation.
    pub fn open(&mut self, mode: StreamMode) -> u64 {
        self.close();
        self.generation += 1;
        self.status = FeedStatus::Connecting;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        match StreamFeed::new(&self.ws_url, mode, self.generation) {
            Ok(feed) => {
                self.shutdown = Some(shutdown_tx);
                tokio::spawn(feed.run(self.events_tx.clone(), shutdown_rx));
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot open stream subscription");
                self.status = FeedStatus::Disconnected;
            }
        }
        self.generation
    }

    /// Terminate the active subscription. Idempotent; always leaves the
    /// connection `disconnected` and cancels interest in the old task's
    /// future callbacks.
    pub fn close(&mut self) {
        if let Some(shutdown_tx) = self.shutdown.take() {
            let _ = shutdown_tx.send(true);
        }
        self.status = FeedStatus::Disconnected;
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a callback tagged with `generation` belongs to the live
    /// subscription. False for anything pre-dating the last open, and for
    /// everything once `close` has run.
    pub fn is_current(&self, generation: u64) -> bool {
        self.shutdown.is_some() && generation == self.generation
    }

    /// Apply a status report from the transport task; stale generations are
    /// dropped. Returns whether the report was accepted.
    pub fn apply_status(&mut self, generation: u64, status: FeedStatus) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(generation, current = self.generation, "Dropping stale status report");
            return false;
        }
        self.status = status;
        true
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
