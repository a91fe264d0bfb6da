use std::collections::VecDeque;

use super::dataset::{Dataset, GridRow, TrafficRow, WeatherRow};
use crate::feed::StreamMode;
use crate::model::retro::RetroSummary;
use crate::model::tick::{Signal, Tick};

const PRICE_WINDOW: usize = 14;
const POSITION_SIZE_MWH: f64 = 1.0;
const STARTING_CASH: f64 = 100_000.0;

/// One stream session's strategy state: a short moving-average window over
/// spot, a virtual plant inventory, and a running cash balance. Each
/// connection gets a fresh session, replayed row by row from the dataset.
#[derive(Debug)]
pub struct SimulationSession {
    mode: StreamMode,
    prices: VecDeque<f64>,
    cash: f64,
    inventory_mwh: f64,
    starting_equity: f64,
    first_spot: Option<f64>,
}

impl SimulationSession {
    pub fn new(mode: StreamMode) -> Self {
        Self {
            mode,
            prices: VecDeque::with_capacity(PRICE_WINDOW),
            cash: STARTING_CASH,
            inventory_mwh: 0.0,
            starting_equity: STARTING_CASH,
            first_spot: None,
        }
    }

    /// Advance the strategy one row and produce the outgoing tick. `live`
    /// mode carries the richer hedging fields; `sim` emits the basic set.
    pub fn step(&mut self, grid: &GridRow, weather: &WeatherRow, traffic: &TrafficRow) -> Tick {
        let spot_price = grid.spot_price;
        let grid_load = grid.grid_load_mw;
        let traffic_index = traffic.congestion_index;
        let temp_c = weather.temp_c;

        if self.first_spot.is_none() {
            self.first_spot = Some(spot_price);
        }

        let forecast_price = self.forecast_price(spot_price, grid_load, traffic_index, temp_c);
        let signal = self.decide(spot_price, forecast_price);

        let equity = self.cash + self.inventory_mwh * spot_price;
        let pnl = equity - self.starting_equity;

        let mut tick = Tick {
            timestamp: grid.timestamp.clone(),
            spot_price: round2(spot_price),
            forecast_price: round2(forecast_price),
            signal,
            inventory_mwh: round3(self.inventory_mwh),
            cash: round2(self.cash),
            pnl: round2(pnl),
            grid_load_mw: round2(grid_load),
            traffic_index: round2(traffic_index),
            temp_c: round2(temp_c),
            target_inventory_mwh: None,
            target_physical_mwh: None,
            target_contract_mwh: None,
            physical_share: None,
            forward_price: None,
            baseline_spot: None,
            mode: None,
        };

        if self.mode == StreamMode::Live {
            let spread = forecast_price / spot_price - 1.0;
            let physical_share = (0.5 + 25.0 * spread).clamp(0.0, 1.0);
            let target_inventory = self.inventory_mwh;
            tick.target_inventory_mwh = Some(round3(target_inventory));
            tick.target_physical_mwh = Some(round3(target_inventory * physical_share));
            tick.target_contract_mwh = Some(round3(target_inventory * (1.0 - physical_share)));
            tick.physical_share = Some(round3(physical_share));
            tick.forward_price = Some(round2(2.0 * forecast_price - spot_price));
            tick.baseline_spot = self.first_spot.map(round2);
            tick.mode = Some(self.mode.as_str().to_string());
        }

        tick
    }

    // Mildly reactive model: demand (traffic, grid load) lifts price, cooler
    // temps lift heating load.
    fn forecast_price(&self, spot_price: f64, grid_load: f64, traffic_index: f64, temp_c: f64) -> f64 {
        let demand_lift = 0.003 * (traffic_index - 50.0) / 50.0 + 0.002 * (grid_load - 700.0) / 300.0;
        let weather_lift = 0.002 * (18.0 - temp_c).max(0.0) / 10.0;
        spot_price * (1.0 + demand_lift + weather_lift)
    }

    // Threshold strategy: lean into forecast spread and short-term mean
    // reversion.
    fn decide(&mut self, spot_price: f64, forecast_price: f64) -> Signal {
        if self.prices.len() == PRICE_WINDOW {
            self.prices.pop_front();
        }
        self.prices.push_back(spot_price);
        let moving_avg = self.prices.iter().sum::<f64>() / self.prices.len() as f64;

        let bullish = forecast_price > moving_avg * 1.004;
        let bearish = forecast_price < moving_avg * 0.996;

        if bullish {
            self.inventory_mwh += POSITION_SIZE_MWH;
            self.cash -= spot_price * POSITION_SIZE_MWH;
            return Signal::Buy;
        }
        if bearish && self.inventory_mwh > 0.0 {
            self.inventory_mwh -= POSITION_SIZE_MWH;
            self.cash += spot_price * POSITION_SIZE_MWH;
            return Signal::Sell;
        }
        Signal::Hold
    }
}

/// Replay the whole dataset through a fresh session and compare the strategy
/// against buying `starting_cash / first_spot` MWh at the first spot price
/// and holding to the last.
pub fn run_retro(dataset: &Dataset) -> RetroSummary {
    let mut session = SimulationSession::new(StreamMode::Sim);
    let mut strategy_pnl = 0.0;
    for idx in 0..dataset.len() {
        let tick = session.step(&dataset.grid[idx], &dataset.weather[idx], &dataset.traffic[idx]);
        strategy_pnl = tick.pnl;
    }

    let baseline_buyhold_pnl = match (
        dataset.grid.first().map(|row| row.spot_price),
        dataset.grid.get(dataset.len().saturating_sub(1)).map(|row| row.spot_price),
    ) {
        (Some(first_spot), Some(last_spot)) if first_spot > 0.0 => {
            let qty_mwh = STARTING_CASH / first_spot;
            round2(qty_mwh * (last_spot - first_spot))
        }
        _ => 0.0,
    };

    RetroSummary {
        strategy_pnl,
        baseline_buyhold_pnl,
        delta_vs_buyhold: round2(strategy_pnl - baseline_buyhold_pnl),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
