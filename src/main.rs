use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event;
use tokio::sync::mpsc;

use gridarb::config::Config;
use gridarb::event::AppEvent;
use gridarb::feed::controller::FeedController;
use gridarb::input::{parse_main_command, UiCommand};
use gridarb::retro::RetroClient;
use gridarb::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("gridarb.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        ws_url = %config.stream.ws_url,
        api_base = %config.stream.api_base,
        "Starting gridarb"
    );

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);

    let initial_mode = config.stream.default_mode()?;
    let mut feed = FeedController::new(&config.stream.ws_url, initial_mode, app_tx.clone());
    feed.start();

    let retro_client = RetroClient::new(&config.stream.api_base);

    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(feed);
    app_state.push_log(format!("gridarb started | mode {}", initial_mode));

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if let Some(cmd) = parse_main_command(&key.code) {
                    match cmd {
                        UiCommand::Quit => {
                            tracing::info!("User quit");
                            break;
                        }
                        UiCommand::SwitchMode => {
                            let next = app_state.feed.mode().toggle();
                            if app_state.feed.set_mode(next) {
                                app_state.push_log(format!("Mode switched to {}", next));
                            }
                        }
                        UiCommand::RunRetro => {
                            if app_state.retro.begin() {
                                retro_client.spawn(app_tx.clone());
                                app_state.push_log("Retro requested".to_string());
                            } else {
                                app_state.push_log("[WARN] Retro already running".to_string());
                            }
                        }
                        UiCommand::Reconnect => {
                            app_state.feed.reconnect();
                            app_state.push_log("Reconnecting".to_string());
                        }
                    }
                }
            }
        }

        // Drain events from channel
        while let Ok(event) = app_rx.try_recv() {
            app_state.apply(event);
        }
    }

    app_state.feed.shutdown();
    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check gridarb.log for details.");
    Ok(())
}
