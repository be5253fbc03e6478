use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use crate::antenna::AntennaConfig;
use crate::config::{ensure, ConfigError};
use crate::orbit::OrbitalElementSet;
use crate::station::StationConfig;

/// Radio parameters of one end of the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkParameters {
    pub tx_frequency_hz: f64,
    pub rx_frequency_hz: f64,
    #[serde(default)]
    pub tx_power_dbm: f64,
    pub tx_antenna: AntennaConfig,
    pub rx_antenna: AntennaConfig,
    #[serde(default)]
    pub noise_figure_db: f64,
    #[serde(default = "default_noise_temperature")]
    pub noise_temperature_k: f64,
    pub rx_bandwidth_hz: f64,
}

fn default_noise_temperature() -> f64 {
    290.0
}

impl LinkParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure("tx_frequency_hz", self.tx_frequency_hz, "> 0", |v| v > 0.0)?;
        ensure("rx_frequency_hz", self.rx_frequency_hz, "> 0", |v| v > 0.0)?;
        ensure("tx_power_dbm", self.tx_power_dbm, "finite", |_| true)?;
        ensure("noise_figure_db", self.noise_figure_db, ">= 0", |v| v >= 0.0)?;
        ensure("noise_temperature_k", self.noise_temperature_k, ">= 0", |v| {
            v >= 0.0
        })?;
        ensure("rx_bandwidth_hz", self.rx_bandwidth_hz, "> 0", |v| v > 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub tle: OrbitalElementSet,
    pub link: LinkParameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundConfig {
    #[serde(flatten)]
    pub site: StationConfig,
    pub link: LinkParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ObservationWindow {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Which end transmits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkDirection {
    /// Ground station to satellite.
    Uplink,
    /// Satellite to ground station.
    #[default]
    Downlink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    pub satellite: SatelliteConfig,
    pub ground_station: GroundConfig,
    pub observation: ObservationWindow,
    pub time_resolution_us: u64,
    #[serde(default)]
    pub direction: LinkDirection,
}
