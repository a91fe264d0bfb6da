use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite;
use url::Url;

use super::StreamMode;
use crate::event::{AppEvent, FeedStatus};
use crate::model::tick::Tick;

/// One live subscription to the stream endpoint, tagged with the generation
/// that opened it. The task runs until the server closes, the transport
/// errors, or the owning connection signals shutdown. There is no automatic
/// reconnect; recovery is an explicit reopen by the caller.
pub struct StreamFeed {
    url: String,
    generation: u64,
}

impl StreamFeed {
    pub fn new(ws_url: &str, mode: StreamMode, generation: u64) -> Result<Self> {
        let mut url = Url::parse(ws_url)
            .with_context(|| format!("invalid stream endpoint '{}'", ws_url))?;
        url.query_pairs_mut().append_pair("mode", mode.as_str());
        Ok(Self {
            url: url.into(),
            generation,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Connect once and pump ticks into `events_tx` until closed. Every event
    /// carries this subscription's generation so the consumer can drop late
    /// callbacks after a teardown.
    pub async fn run(self, events_tx: mpsc::Sender<AppEvent>, mut shutdown: watch::Receiver<bool>) {
        let generation = self.generation;

        let (ws_stream, _resp) = match tokio_tungstenite::connect_async(&self.url).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(generation, url = %self.url, error = %e, "Stream connect failed");
                let _ = events_tx
                    .send(AppEvent::FeedStatus {
                        generation,
                        status: FeedStatus::Disconnected,
                    })
                    .await;
                return;
            }
        };

        tracing::info!(generation, url = %self.url, "Stream connected");
        if events_tx
            .send(AppEvent::FeedStatus {
                generation,
                status: FeedStatus::Live,
            })
            .await
            .is_err()
        {
            return;
        }

        let (_write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(tungstenite::Message::Text(text))) => {
                            // Parse-or-discard: a malformed payload is logged and
                            // skipped, it never tears the connection down.
                            match serde_json::from_str::<Tick>(&text) {
                                Ok(tick) => {
                                    if events_tx
                                        .send(AppEvent::FeedTick { generation, tick })
                                        .await
                                        .is_err()
                                    {
                                        return;
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!(generation, error = %e, "Discarding malformed stream payload");
                                }
                            }
                        }
                        Some(Ok(tungstenite::Message::Ping(_))) => {
                            // tokio-tungstenite answers pings automatically
                        }
                        Some(Ok(tungstenite::Message::Close(_))) | None => {
                            tracing::info!(generation, "Stream closed by server");
                            let _ = events_tx
                                .send(AppEvent::FeedStatus {
                                    generation,
                                    status: FeedStatus::Disconnected,
                                })
                                .await;
                            return;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(generation, error = %e, "Stream read error");
                            let _ = events_tx
                                .send(AppEvent::FeedStatus {
                                    generation,
                                    status: FeedStatus::Disconnected,
                                })
                                .await;
                            return;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    tracing::debug!(generation, "Stream shutdown requested");
                    return;
                }
            }
        }
    }
}
