use serde::{Deserialize, Serialize};

/// Result of the retrospective backtest: strategy PnL against a simple
/// buy-and-hold baseline over the same dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetroSummary {
    pub strategy_pnl: f64,
    pub baseline_buyhold_pnl: f64,
    pub delta_vs_buyhold: f64,
}

/// Wire envelope for `GET /api/retro`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetroResponse {
    pub summary: RetroSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_retro_response() {
        let json = r#"{"summary":{"strategy_pnl":100.0,"baseline_buyhold_pnl":80.0,"delta_vs_buyhold":20.0}}"#;
        let resp: RetroResponse = serde_json::from_str(json).unwrap();
        assert!((resp.summary.strategy_pnl - 100.0).abs() < f64::EPSILON);
        assert!((resp.summary.baseline_buyhold_pnl - 80.0).abs() < f64::EPSILON);
        assert!((resp.summary.delta_vs_buyhold - 20.0).abs() < f64::EPSILON);
    }
}
