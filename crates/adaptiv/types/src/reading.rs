//! Sensor readings consumed by the health pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AssetId;

fn default_omega() -> f64 {
    100.0
}

fn default_load() -> f64 {
    500.0
}

/// A single vibration measurement with its operating conditions.
///
/// Produced once per assessment request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Asset the reading belongs to.
    pub asset_id: AssetId,

    /// Measured RMS vibration [mm/s].
    pub vib_rms: f64,

    /// Spindle speed [rad/s].
    #[serde(default = "default_omega")]
    pub omega: f64,

    /// Cutting load [N].
    #[serde(default = "default_load")]
    pub load: f64,

    /// Estimated wear fraction [0-1].
    #[serde(default)]
    pub wear: f64,

    /// Time of measurement.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl SensorReading {
    /// Create a reading taken now with default operating conditions.
    pub fn new(asset_id: impl Into<AssetId>, vib_rms: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            vib_rms,
            omega: default_omega(),
            load: default_load(),
            wear: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Set the operating conditions.
    pub fn with_conditions(mut self, omega: f64, load: f64) -> Self {
        self.omega = omega;
        self.load = load;
        self
    }

    /// Set the wear fraction, clamped to [0, 1].
    pub fn with_wear(mut self, wear: f64) -> Self {
        self.wear = wear.clamp(0.0, 1.0);
        self
    }

    /// Set the measurement timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_defaults_from_json() {
        let reading: SensorReading =
            serde_json::from_str(r#"{"asset_id": "milling-01", "vib_rms": 1.4}"#).unwrap();

        assert_eq!(reading.asset_id.as_str(), "milling-01");
        assert_eq!(reading.omega, 100.0);
        assert_eq!(reading.load, 500.0);
        assert_eq!(reading.wear, 0.0);
    }

    #[test]
    fn test_reading_builder() {
        let reading = SensorReading::new("milling-01", 2.0)
            .with_conditions(150.0, 320.0)
            .with_wear(1.7);

        assert_eq!(reading.omega, 150.0);
        assert_eq!(reading.load, 320.0);
        assert_eq!(reading.wear, 1.0);
    }
}
