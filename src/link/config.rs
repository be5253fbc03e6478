use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use crate::config::{ensure, ConfigError};

/// What the channel emits while the satellite is below the visibility threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HorizonPolicy {
    #[default]
    Mute,
    PassThrough,
}

/// Selects which impairments are applied and the weather they see.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpairmentModeConfig {
    pub free_space_path_loss: bool,
    pub pointing_loss: bool,
    pub doppler: bool,
    pub atmospheric_gases: bool,
    pub precipitation: bool,
    pub link_margin: bool,
    pub rain_rate_mm_h: f64,
    pub water_vapour_density_g_m3: f64,
    pub temperature_c: f64,
    /// Overrides the latitude-derived rain height.
    pub rain_height_km: Option<f64>,
    pub required_snr_db: f64,
    pub below_horizon: HorizonPolicy,
}

impl Default for ImpairmentModeConfig {
    fn default() -> Self {
        Self {
            free_space_path_loss: true,
            pointing_loss: true,
            doppler: true,
            atmospheric_gases: false,
            precipitation: false,
            link_margin: false,
            rain_rate_mm_h: 0.0,
            water_vapour_density_g_m3: 7.5,
            temperature_c: 15.0,
            rain_height_km: None,
            required_snr_db: 10.0,
            below_horizon: HorizonPolicy::Mute,
        }
    }
}

impl ImpairmentModeConfig {
    /// Every impairment off; the channel passes samples through untouched.
    pub fn disabled() -> Self {
        Self {
            free_space_path_loss: false,
            pointing_loss: false,
            doppler: false,
            atmospheric_gases: false,
            precipitation: false,
            link_margin: false,
            below_horizon: HorizonPolicy::PassThrough,
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        !(self.free_space_path_loss
            || self.pointing_loss
            || self.doppler
            || self.atmospheric_gases
            || self.precipitation
            || self.link_margin)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure("rain_rate_mm_h", self.rain_rate_mm_h, ">= 0", |v| v >= 0.0)?;
        ensure(
            "water_vapour_density_g_m3",
            self.water_vapour_density_g_m3,
            ">= 0",
            |v| v >= 0.0,
        )?;
        ensure("temperature_c", self.temperature_c, "[-100, 100]", |v| {
            (-100.0..=100.0).contains(&v)
        })?;
        if let Some(height) = self.rain_height_km {
            ensure("rain_height_km", height, ">= 0", |v| v >= 0.0)?;
        }
        ensure("required_snr_db", self.required_snr_db, "finite", |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mode: ImpairmentModeConfig =
            serde_yaml::from_str("precipitation: true\nrain_rate_mm_h: 25\nbelow_horizon: pass_through\n")
                .unwrap();
        assert!(mode.precipitation);
        assert!(mode.free_space_path_loss);
        assert_eq!(mode.rain_rate_mm_h, 25.0);
        assert_eq!(mode.below_horizon, HorizonPolicy::PassThrough);
        assert!(mode.validate().is_ok());
    }

    #[test]
    fn disabled_is_identity() {
        assert!(ImpairmentModeConfig::disabled().is_identity());
        assert!(!ImpairmentModeConfig::default().is_identity());
    }

    #[test]
    fn rejects_negative_rain() {
        let mode = ImpairmentModeConfig {
            rain_rate_mm_h: -1.0,
            ..ImpairmentModeConfig::default()
        };
        assert!(mode.validate().is_err());
    }
}
