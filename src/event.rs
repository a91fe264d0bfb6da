use crate::model::retro::RetroSummary;
use crate::model::tick::Tick;

/// Health of the live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Live,
    Disconnected,
}

impl FeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedStatus::Connecting => "connecting",
            FeedStatus::Live => "live",
            FeedStatus::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events delivered to the single consumer loop. Feed events carry the
/// generation of the subscription that produced them; the controller drops
/// anything whose generation is no longer current.
#[derive(Debug, Clone)]
pub enum AppEvent {
    FeedTick { generation: u64, tick: Tick },
    FeedStatus { generation: u64, status: FeedStatus },
    RetroFinished(RetroSummary),
    RetroFailed(String),
    LogMessage(String),
}
