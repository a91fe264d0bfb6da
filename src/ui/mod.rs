pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::{AppEvent, FeedStatus};
use crate::feed::controller::FeedController;
use crate::retro::RetroState;

use dashboard::{KeybindBar, LogPanel, MetricsPanel, RetroPanel, StatusBar, TicksPanel};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub feed: FeedController,
    pub retro: RetroState,
    pub tick_count: u64,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(feed: FeedController) -> Self {
        Self {
            feed,
            retro: RetroState::default(),
            tick_count: 0,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::FeedTick { generation, tick } => {
                if self.feed.on_tick(generation, tick) {
                    self.tick_count += 1;
                }
            }
            AppEvent::FeedStatus { generation, status } => {
                if self.feed.on_status(generation, status) {
                    match status {
                        FeedStatus::Live => self.push_log("Stream live".to_string()),
                        FeedStatus::Disconnected => {
                            self.push_log("[WARN] Stream disconnected".to_string())
                        }
                        FeedStatus::Connecting => {}
                    }
                }
            }
            AppEvent::RetroFinished(summary) => {
                self.retro.finish(summary);
                self.push_log(format!(
                    "Retro done: strategy {:.2} vs buy&hold {:.2} (delta {:.2})",
                    summary.strategy_pnl, summary.baseline_buyhold_pnl, summary.delta_vs_buyhold
                ));
            }
            AppEvent::RetroFailed(msg) => {
                self.retro.fail();
                self.push_log(format!("[ERR] Retro failed: {}", msg));
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // status bar
            Constraint::Min(10),    // metrics + recent ticks
            Constraint::Length(5),  // retro panel
            Constraint::Length(6),  // system log
            Constraint::Length(1),  // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            mode: state.feed.mode(),
            status: state.feed.status(),
            tick_count: state.tick_count,
            window_len: state.feed.buffer().len(),
            window_capacity: state.feed.buffer().capacity(),
        },
        outer[0],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(50)])
        .split(outer[1]);

    frame.render_widget(MetricsPanel::new(state.feed.buffer().latest()), main_area[0]);
    frame.render_widget(TicksPanel::new(state.feed.buffer()), main_area[1]);
    frame.render_widget(RetroPanel::new(&state.retro), outer[2]);
    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);
    frame.render_widget(KeybindBar, outer[4]);
}
