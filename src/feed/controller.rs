use tokio::sync::mpsc;

use super::buffer::TickBuffer;
use super::conn::Connection;
use super::StreamMode;
use crate::event::{AppEvent, FeedStatus};
use crate::model::tick::Tick;

/// Coordinates the active data mode, the live subscription, and the tick
/// window. Mode switches are atomic from the consumer's point of view: the
/// buffer is cleared and the subscription replaced before control returns,
/// and the generation check rejects any tick of the old mode that was still
/// in flight.
#[derive(Debug)]
pub struct FeedController {
    mode: StreamMode,
    conn: Connection,
    buffer: TickBuffer,
}

impl FeedController {
    pub fn new(ws_url: &str, mode: StreamMode, events_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            mode,
            conn: Connection::new(ws_url, events_tx),
            buffer: TickBuffer::default(),
        }
    }

    /// Open the initial subscription for the configured mode.
    pub fn start(&mut self) {
        self.conn.open(self.mode);
    }

    /// Switch data modes. No-op when `mode` is already active. Otherwise the
    /// buffer is cleared and the subscription reopened under a new
    /// generation, so no tick of the prior mode can appear afterwards.
    /// Returns whether a switch happened.
    pub fn set_mode(&mut self, mode: StreamMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.buffer.clear();
        self.conn.close();
        self.conn.open(mode);
        tracing::info!(mode = %mode, "Stream mode switched");
        true
    }

    /// Manual reconnect in the current mode. The window is kept: already
    /// buffered ticks stay visible while the new subscription comes up.
    pub fn reconnect(&mut self) {
        self.conn.open(self.mode);
    }

    /// Tear down the subscription for good (app shutdown).
    pub fn shutdown(&mut self) {
        self.conn.close();
    }

    /// Apply a tick from the transport. Ticks from a stale generation are
    /// dropped without touching the buffer. Returns whether it was buffered.
    pub fn on_tick(&mut self, generation: u64, tick: Tick) -> bool {
        if !self.conn.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.conn.generation(),
                "Dropping tick from stale subscription"
            );
            return false;
        }
        self.buffer.append(tick);
        true
    }

    /// Apply a status report from the transport, generation-checked.
    pub fn on_status(&mut self, generation: u64, status: FeedStatus) -> bool {
        self.conn.apply_status(generation, status)
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    pub fn status(&self) -> FeedStatus {
        self.conn.status()
    }

    pub fn generation(&self) -> u64 {
        self.conn.generation()
    }

    pub fn buffer(&self) -> &TickBuffer {
        &self.buffer
    }
}
