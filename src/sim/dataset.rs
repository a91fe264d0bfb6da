use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRow {
    pub timestamp: String,
    pub spot_price: f64,
    pub grid_load_mw: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRow {
    pub timestamp: String,
    pub temp_c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRow {
    pub timestamp: String,
    pub congestion_index: f64,
}

/// The three CSV feeds the simulation replays. The effective length is the
/// shortest of the three; rows beyond it are ignored.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub grid: Vec<GridRow>,
    pub weather: Vec<WeatherRow>,
    pub traffic: Vec<TrafficRow>,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        std::fs::metadata(dir)?;

        let dataset = Self {
            grid: load_rows(&dir.join("grid.csv"))?,
            weather: load_rows(&dir.join("weather.csv"))?,
            traffic: load_rows(&dir.join("traffic.csv"))?,
        };
        if dataset.is_empty() {
            return Err(AppError::Dataset(format!(
                "no overlapping rows in {}",
                dir.display()
            )));
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.grid
            .len()
            .min(self.weather.len())
            .min(self.traffic.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect::<Result<Vec<T>, _>>().map_err(AppError::from)
}
