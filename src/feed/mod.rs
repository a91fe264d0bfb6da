pub mod buffer;
pub mod conn;
pub mod controller;
pub mod ws;

use std::str::FromStr;

use crate::error::AppError;

/// Named data source configuration the live subscription is parameterized
/// by: CSV-driven simulation or externally sourced live prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Sim,
    Live,
}

impl StreamMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Sim => "sim",
            StreamMode::Live => "live",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            StreamMode::Sim => StreamMode::Live,
            StreamMode::Live => StreamMode::Sim,
        }
    }
}

impl std::fmt::Display for StreamMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sim" => Ok(StreamMode::Sim),
            "live" => Ok(StreamMode::Live),
            other => Err(AppError::Config(format!(
                "unknown stream mode '{}', expected 'sim' or 'live'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("sim".parse::<StreamMode>().unwrap(), StreamMode::Sim);
        assert_eq!(" LIVE ".parse::<StreamMode>().unwrap(), StreamMode::Live);
        assert!("paper".parse::<StreamMode>().is_err());
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(StreamMode::Sim.toggle(), StreamMode::Live);
        assert_eq!(StreamMode::Live.toggle(), StreamMode::Sim);
    }
}
