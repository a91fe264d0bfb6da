use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::feed::StreamMode;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stream: StreamConfig,
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub ws_url: String,
    pub api_base: String,
    pub default_mode: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8000/ws/stream".to_string(),
            api_base: "http://localhost:8000".to_string(),
            default_mode: "sim".to_string(),
        }
    }
}

impl StreamConfig {
    pub fn default_mode(&self) -> Result<StreamMode> {
        self.default_mode
            .parse()
            .context("stream.default_mode is invalid")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_dir: String,
    pub tick_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            data_dir: "data".to_string(),
            tick_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `config/default.toml` when present, falling back to built-in
    /// defaults, then apply environment overrides (`GRIDARB_WS_URL`,
    /// `GRIDARB_API_BASE`, `GRIDARB_BIND_ADDR`, `GRIDARB_DATA_DIR`).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let mut config = if config_path.exists() {
            let config_str = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&config_str).context("failed to parse config/default.toml")?
        } else {
            Config::default()
        };

        if let Ok(ws_url) = std::env::var("GRIDARB_WS_URL") {
            config.stream.ws_url = ws_url;
        }
        if let Ok(api_base) = std::env::var("GRIDARB_API_BASE") {
            config.stream.api_base = api_base;
        }
        if let Ok(bind_addr) = std::env::var("GRIDARB_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        if let Ok(data_dir) = std::env::var("GRIDARB_DATA_DIR") {
            config.server.data_dir = data_dir;
        }

        config.stream.default_mode()?;

        Ok(config)
    }
}
