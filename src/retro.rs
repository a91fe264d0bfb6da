use tokio::sync::mpsc;

use crate::error::AppError;
use crate::event::AppEvent;
use crate::model::retro::{RetroResponse, RetroSummary};

/// One-shot client for the retrospective backtest endpoint, independent of
/// the live stream.
#[derive(Debug, Clone)]
pub struct RetroClient {
    http: reqwest::Client,
    api_base: String,
}

impl RetroClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub async fn run(&self) -> Result<RetroSummary, AppError> {
        let url = format!("{}/api/retro", self.api_base);
        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let msg = resp.text().await.unwrap_or_default();
            return Err(AppError::Api { status, msg });
        }

        let body: RetroResponse = resp.json().await?;
        Ok(body.summary)
    }

    /// Fire the request in the background; the outcome arrives on the event
    /// channel. Failures are reported, never propagated.
    pub fn spawn(&self, events_tx: mpsc::Sender<AppEvent>) {
        let client = self.clone();
        tokio::spawn(async move {
            match client.run().await {
                Ok(summary) => {
                    let _ = events_tx.send(AppEvent::RetroFinished(summary)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Retro request failed");
                    let _ = events_tx.send(AppEvent::RetroFailed(e.to_string())).await;
                }
            }
        });
    }
}

/// Loading/result state for the retro action button. A failed run keeps the
/// previous summary; the only visible effect is `loading` going back to
/// false.
#[derive(Debug, Default)]
pub struct RetroState {
    loading: bool,
    summary: Option<RetroSummary>,
}

impl RetroState {
    /// Mark a request as in flight. Returns false when one already is, in
    /// which case the caller should not issue another.
    pub fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    pub fn finish(&mut self, summary: RetroSummary) {
        self.summary = Some(summary);
        self.loading = false;
    }

    pub fn fail(&mut self) {
        self.loading = false;
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn summary(&self) -> Option<&RetroSummary> {
        self.summary.as_ref()
    }
}
