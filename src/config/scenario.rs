use std::path::Path;

use serde::Deserialize;

use super::error::ConfigError;
use crate::channel::ChannelConfig;
use crate::link::ImpairmentModeConfig;
use crate::tracker::TrackerConfig;

/// A complete emulation run: geometry, impairments and stream settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub impairments: ImpairmentModeConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Range checks that do not need the orbit. Window and frequency
    /// alignment are checked when the tracker is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.satellite.link.validate()?;
        self.tracker.ground_station.link.validate()?;
        self.impairments.validate()?;
        self.channel.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antenna::AntennaKind;
    use crate::link::HorizonPolicy;
    use crate::tracker::LinkDirection;

    const SCENARIO: &str = r#"
tracker:
  satellite:
    tle: |
      ISS (ZARYA)
      1 25544U 98067A   18268.52547184  .00016717  00000-0  10270-3 0  9019
      2 25544  51.6373 238.6885 0003885 206.9748 153.1203 15.53729445 14114
    link:
      tx_frequency_hz: 435.0e6
      rx_frequency_hz: 145.8e6
      tx_power_dbm: 30.0
      tx_antenna:
        family: quadrifilar_helix
        boresight: nadir
      rx_antenna:
        family: dipole
      rx_bandwidth_hz: 10.0e3
  ground_station:
    latitude_deg: 35.3333
    longitude_deg: 25.1833
    altitude_m: 1.0
    link:
      tx_frequency_hz: 145.8e6
      rx_frequency_hz: 435.0e6
      tx_antenna:
        family: yagi
        boom_length_m: 3.0
      rx_antenna:
        family: yagi
        boom_length_m: 1.5
        pointing_error_deg: 1.0
      noise_figure_db: 1.5
      rx_bandwidth_hz: 10.0e3
  observation:
    start: 2018-09-25T15:48:25Z
    end: 2018-09-25T15:58:35Z
  time_resolution_us: 10000000
impairments:
  atmospheric_gases: true
  below_horizon: pass_through
channel:
  sample_rate_hz: 48000.0
  noise_seed: 7
"#;

    #[test]
    fn parses_full_scenario() {
        let scenario = Scenario::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.tracker.direction, LinkDirection::Downlink);
        assert_eq!(scenario.tracker.satellite.tle.norad_id(), 25544);
        assert_eq!(scenario.tracker.ground_station.site.location.latitude_deg, 35.3333);
        assert!(matches!(
            scenario.tracker.ground_station.link.rx_antenna.kind,
            AntennaKind::Yagi { boom_length_m } if boom_length_m == 1.5
        ));
        assert!(scenario.impairments.atmospheric_gases);
        assert!(scenario.impairments.free_space_path_loss);
        assert_eq!(scenario.impairments.below_horizon, HorizonPolicy::PassThrough);
        assert_eq!(scenario.channel.sample_rate_hz, 48e3);
        assert_eq!(scenario.channel.noise_seed, Some(7));
    }

    #[test]
    fn rejects_negative_rain_rate() {
        let yaml = SCENARIO.replace(
            "  atmospheric_gases: true",
            "  atmospheric_gases: true\n  rain_rate_mm_h: -4.0",
        );
        assert!(matches!(
            Scenario::from_str(&yaml),
            Err(ConfigError::OutOfRange {
                parameter: "rain_rate_mm_h",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_tle() {
        let yaml = SCENARIO.replace("0  9019", "0  9018");
        assert!(matches!(Scenario::from_str(&yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Scenario::from_file("/nonexistent/scenario.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
