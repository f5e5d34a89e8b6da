//! Readings from the backend's simulated sensors.

use serde::{Deserialize, Serialize};

/// Response of `GET /temperature`, in degrees Celsius.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub temperature: f64,
}

impl TemperatureReading {
    pub fn display(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }
}
