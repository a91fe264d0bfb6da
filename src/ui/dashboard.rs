use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::event::FeedStatus;
use crate::feed::buffer::TickBuffer;
use crate::feed::StreamMode;
use crate::model::tick::{Signal, Tick};
use crate::retro::RetroState;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "--".to_string(),
    }
}

fn pnl_color(value: f64) -> Color {
    if value > 0.0 {
        Color::Green
    } else if value < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

fn signal_color(signal: &Signal) -> Color {
    match signal {
        Signal::Buy => Color::Green,
        Signal::Sell => Color::Red,
        Signal::Hold => Color::White,
        Signal::Other(_) => Color::Magenta,
    }
}

pub struct StatusBar {
    pub mode: StreamMode,
    pub status: FeedStatus,
    pub tick_count: u64,
    pub window_len: usize,
    pub window_capacity: usize,
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status_span = match self.status {
            FeedStatus::Live => Span::styled("LIVE", Style::default().fg(Color::Green)),
            FeedStatus::Connecting => Span::styled("CONNECTING", Style::default().fg(Color::Yellow)),
            FeedStatus::Disconnected => Span::styled("DISCONNECTED", Style::default().fg(Color::Red)),
        };

        let line = Line::from(vec![
            Span::styled(
                " gridarb ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("mode: {}", self.mode),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            status_span,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("window: {}/{}", self.window_len, self.window_capacity),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct MetricsPanel<'a> {
    latest: Option<&'a Tick>,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(latest: Option<&'a Tick>) -> Self {
        Self { latest }
    }
}

impl Widget for MetricsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);

        let lines = match self.latest {
            Some(tick) => vec![
                Line::from(vec![
                    Span::styled("Spot      ", label),
                    Span::styled(format!("${:.2}", tick.spot_price), value),
                ]),
                Line::from(vec![
                    Span::styled("Forecast  ", label),
                    Span::styled(format!("${:.2}", tick.forecast_price), value),
                ]),
                Line::from(vec![
                    Span::styled("Signal    ", label),
                    Span::styled(
                        tick.signal.as_str().to_string(),
                        Style::default().fg(signal_color(&tick.signal)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Inventory ", label),
                    Span::styled(format!("{:.2} MWh", tick.inventory_mwh), value),
                ]),
                Line::from(vec![
                    Span::styled("Cash      ", label),
                    Span::styled(format!("${:.0}", tick.cash), value),
                ]),
                Line::from(vec![
                    Span::styled("PnL       ", label),
                    Span::styled(
                        format!("${:.2}", tick.pnl),
                        Style::default().fg(pnl_color(tick.pnl)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Grid load ", label),
                    Span::styled(format!("{:.0} MW", tick.grid_load_mw), value),
                ]),
                Line::from(vec![
                    Span::styled("Traffic   ", label),
                    Span::styled(format!("{:.0} / 100", tick.traffic_index), value),
                ]),
                Line::from(vec![
                    Span::styled("Temp      ", label),
                    Span::styled(format!("{:.1} C", tick.temp_c), value),
                ]),
                Line::from(vec![
                    Span::styled("Target inv", label),
                    Span::styled(
                        format!(" {}", fmt_opt(tick.target_inventory_mwh, 2)),
                        value,
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Phys share", label),
                    Span::styled(
                        match tick.physical_share {
                            Some(share) => format!(" {:.0}%", share * 100.0),
                            None => " --".to_string(),
                        },
                        value,
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Forward   ", label),
                    Span::styled(
                        match tick.forward_price {
                            Some(price) => format!("${:.2}", price),
                            None => "--".to_string(),
                        },
                        value,
                    ),
                ]),
            ],
            None => vec![Line::from(Span::styled("No data", label))],
        };

        let block = Block::default()
            .title(" Latest ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct TicksPanel<'a> {
    ticks: &'a TickBuffer,
}

impl<'a> TicksPanel<'a> {
    pub fn new(ticks: &'a TickBuffer) -> Self {
        Self { ticks }
    }
}

impl Widget for TicksPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(vec![
            "Time", "Spot", "Fcst", "Fwd", "Signal", "PnL", "Inv", "Load", "Mode",
        ])
        .style(Style::default().fg(Color::DarkGray));

        // Buffer order is newest-last; the table shows newest first.
        let rows: Vec<Row> = self
            .ticks
            .iter()
            .rev()
            .map(|tick| {
                Row::new(vec![
                    Span::styled(tick.display_time(), Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("{:.2}", tick.spot_price)),
                    Span::raw(format!("{:.2}", tick.forecast_price)),
                    Span::raw(fmt_opt(tick.forward_price, 2)),
                    Span::styled(
                        tick.signal.as_str().to_string(),
                        Style::default().fg(signal_color(&tick.signal)),
                    ),
                    Span::styled(
                        format!("{:.2}", tick.pnl),
                        Style::default().fg(pnl_color(tick.pnl)),
                    ),
                    Span::raw(format!("{:.2}", tick.inventory_mwh)),
                    Span::raw(format!("{:.0}", tick.grid_load_mw)),
                    Span::raw(tick.mode.clone().unwrap_or_else(|| "--".to_string())),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(5),
        ];

        let block = Block::default()
            .title(format!(" Recent Ticks ({}) ", self.ticks.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Table::new(rows, widths).header(header).block(block).render(area, buf);
    }
}

pub struct RetroPanel<'a> {
    retro: &'a RetroState,
}

impl<'a> RetroPanel<'a> {
    pub fn new(retro: &'a RetroState) -> Self {
        Self { retro }
    }
}

impl Widget for RetroPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = Style::default().fg(Color::DarkGray);

        let lines = if self.retro.loading() {
            vec![Line::from(Span::styled(
                "Running...",
                Style::default().fg(Color::Yellow),
            ))]
        } else {
            match self.retro.summary() {
                Some(summary) => vec![
                    Line::from(vec![
                        Span::styled("Strategy PnL   ", label),
                        Span::styled(
                            format!("${:.2}", summary.strategy_pnl),
                            Style::default().fg(pnl_color(summary.strategy_pnl)),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("Buy & hold PnL ", label),
                        Span::styled(
                            format!("${:.2}", summary.baseline_buyhold_pnl),
                            Style::default().fg(pnl_color(summary.baseline_buyhold_pnl)),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("Delta          ", label),
                        Span::styled(
                            format!("${:.2}", summary.delta_vs_buyhold),
                            Style::default()
                                .fg(pnl_color(summary.delta_vs_buyhold))
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                ],
                None => vec![Line::from(Span::styled(
                    "No retro yet, press [r] to run one",
                    label,
                ))],
            }
        };

        let block = Block::default()
            .title(" Retrospective ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);

        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let style = if msg.starts_with("[ERR]") {
                    Style::default().fg(Color::Red)
                } else if msg.starts_with("[WARN]") {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(msg.as_str(), style))
            })
            .collect();

        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[M]", Style::default().fg(Color::Yellow)),
            Span::styled("ode  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("etro  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[C]", Style::default().fg(Color::Yellow)),
            Span::styled("onnect  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
