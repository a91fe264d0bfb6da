use serde::{Deserialize, Serialize};

/// Trading signal attached to every stream tick. The tag set is open-ended:
/// servers may emit signals this client does not know about, and those are
/// carried through verbatim instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    #[serde(untagged)]
    Other(String),
}

impl Signal {
    pub fn as_str(&self) -> &str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
            Signal::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stream message: a timestamped snapshot of market, strategy, and
/// environment state. Immutable once received.
///
/// The optional tail fields are only present in richer server configurations
/// (hedged live mode). Absence is distinct from zero and is rendered as "--".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: String,
    pub spot_price: f64,
    pub forecast_price: f64,
    pub signal: Signal,
    pub inventory_mwh: f64,
    pub cash: f64,
    pub pnl: f64,
    pub grid_load_mw: f64,
    pub traffic_index: f64,
    pub temp_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_inventory_mwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_physical_mwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_contract_mwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_spot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl Tick {
    /// Tick timestamp formatted for display, falling back to the raw
    /// serialized form when it is not RFC 3339.
    pub fn display_time(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_tick() {
        let json = r#"{
            "timestamp": "2024-01-01T00:00:00Z",
            "spot_price": 42.5,
            "forecast_price": 43.1,
            "signal": "buy",
            "inventory_mwh": 1.0,
            "cash": 99957.5,
            "pnl": 0.6,
            "grid_load_mw": 710.0,
            "traffic_index": 55.0,
            "temp_c": 12.5
        }"#;
        let tick: Tick = serde_json::from_str(json).unwrap();
        assert_eq!(tick.signal, Signal::Buy);
        assert!((tick.spot_price - 42.5).abs() < f64::EPSILON);
        assert!(tick.target_inventory_mwh.is_none());
        assert!(tick.forward_price.is_none());
        assert!(tick.mode.is_none());
    }

    #[test]
    fn deserialize_enriched_tick() {
        let json = r#"{
            "timestamp": "2024-01-01T01:00:00Z",
            "spot_price": 40.0,
            "forecast_price": 39.0,
            "signal": "sell",
            "inventory_mwh": 0.0,
            "cash": 100040.0,
            "pnl": 40.0,
            "grid_load_mw": 650.0,
            "traffic_index": 47.0,
            "temp_c": 18.0,
            "target_inventory_mwh": 0.0,
            "target_physical_mwh": 0.0,
            "target_contract_mwh": 0.0,
            "physical_share": 0.6,
            "forward_price": null,
            "baseline_spot": 41.2,
            "mode": "live"
        }"#;
        let tick: Tick = serde_json::from_str(json).unwrap();
        // target_inventory_mwh: 0.0 is present, not absent
        assert_eq!(tick.target_inventory_mwh, Some(0.0));
        assert_eq!(tick.physical_share, Some(0.6));
        // JSON null collapses to absent
        assert!(tick.forward_price.is_none());
        assert_eq!(tick.mode.as_deref(), Some("live"));
    }

    #[test]
    fn unknown_signal_passes_through() {
        let json = r#""rebalance""#;
        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal, Signal::Other("rebalance".to_string()));
        assert_eq!(signal.as_str(), "rebalance");

        let round_tripped = serde_json::to_string(&signal).unwrap();
        assert_eq!(round_tripped, r#""rebalance""#);
    }

    #[test]
    fn display_time_falls_back_to_raw() {
        let mut tick: Tick = serde_json::from_str(
            r#"{
                "timestamp": "row-17",
                "spot_price": 1.0,
                "forecast_price": 1.0,
                "signal": "hold",
                "inventory_mwh": 0.0,
                "cash": 0.0,
                "pnl": 0.0,
                "grid_load_mw": 0.0,
                "traffic_index": 0.0,
                "temp_c": 0.0
            }"#,
        )
        .unwrap();
        assert_eq!(tick.display_time(), "row-17");

        tick.timestamp = "2024-06-01T09:30:05+00:00".to_string();
        assert_eq!(tick.display_time(), "09:30:05");
    }
}
