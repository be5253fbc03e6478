use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::ImpairmentModeConfig;
use super::gases::gas_attenuation_db;
use super::rain::{rain_attenuation_db, rain_height_km, RainPath};
use crate::antenna::SPEED_OF_LIGHT_M_S;
use crate::config::ConfigError;
use crate::station::GeodeticPoint;
use crate::tracker::{ResolvedLink, TrackPoint, Tracker};

pub const BOLTZMANN_J_K: f64 = 1.380_649e-23;
pub const REFERENCE_TEMPERATURE_K: f64 = 290.0;
const MIN_RANGE_M: f64 = 1.0;

/// Link state at one update instant.
///
/// Loss fields hold the contribution actually applied, zero when that
/// impairment is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpairmentSample {
    pub timestamp: DateTime<Utc>,
    pub available: bool,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub path_loss_db: f64,
    /// Physical Doppler shift of the carrier.
    pub doppler_hz: f64,
    pub satellite_pointing_loss_db: f64,
    pub tracker_pointing_loss_db: f64,
    pub gas_attenuation_db: f64,
    pub rain_attenuation_db: f64,
    pub total_loss_db: f64,
    pub amplitude_gain: f64,
    /// Frequency shift applied to the samples.
    pub frequency_offset_hz: f64,
    pub cn_db: Option<f64>,
    pub link_margin_db: Option<f64>,
}

impl ImpairmentSample {
    /// Sentinel for a satellite below the visibility threshold.
    pub fn unavailable(point: &TrackPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            available: false,
            elevation_deg: point.geometry.elevation_deg,
            range_km: point.geometry.range_km,
            path_loss_db: f64::INFINITY,
            doppler_hz: 0.0,
            satellite_pointing_loss_db: 0.0,
            tracker_pointing_loss_db: 0.0,
            gas_attenuation_db: 0.0,
            rain_attenuation_db: 0.0,
            total_loss_db: f64::INFINITY,
            amplitude_gain: 0.0,
            frequency_offset_hz: 0.0,
            cn_db: None,
            link_margin_db: None,
        }
    }

    /// Power gain applied to the signal, linear.
    pub fn power_gain(&self) -> f64 {
        self.amplitude_gain * self.amplitude_gain
    }

    pub fn csv_header() -> &'static str {
        "timestamp,available,elevation_deg,range_km,path_loss_db,doppler_hz,\
         satellite_pointing_loss_db,tracker_pointing_loss_db,gas_attenuation_db,\
         rain_attenuation_db,total_loss_db,amplitude_gain,frequency_offset_hz,cn_db,link_margin_db"
    }

    pub fn to_csv_row(&self) -> String {
        let optional = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_default();
        format!(
            "{},{},{:.4},{:.3},{:.3},{:.3},{:.3},{:.3},{:.4},{:.4},{:.3},{:.6e},{:.3},{},{}",
            self.timestamp.to_rfc3339(),
            self.available,
            self.elevation_deg,
            self.range_km,
            self.path_loss_db,
            self.doppler_hz,
            self.satellite_pointing_loss_db,
            self.tracker_pointing_loss_db,
            self.gas_attenuation_db,
            self.rain_attenuation_db,
            self.total_loss_db,
            self.amplitude_gain,
            self.frequency_offset_hz,
            optional(self.cn_db),
            optional(self.link_margin_db),
        )
    }
}

/// Free-space path loss in dB, with the range floored at one metre.
pub fn free_space_path_loss_db(range_km: f64, frequency_hz: f64) -> f64 {
    let range_m = (range_km * 1000.0).max(MIN_RANGE_M);
    20.0 * (4.0 * PI * range_m * frequency_hz / SPEED_OF_LIGHT_M_S).log10()
}

/// Doppler shift in Hz; positive while the range closes.
pub fn doppler_shift_hz(range_rate_km_s: f64, frequency_hz: f64) -> f64 {
    -(range_rate_km_s * 1000.0 / SPEED_OF_LIGHT_M_S) * frequency_hz
}

/// Receiver system noise temperature from antenna temperature and noise figure.
pub fn system_noise_temperature_k(antenna_temperature_k: f64, noise_figure_db: f64) -> f64 {
    antenna_temperature_k + REFERENCE_TEMPERATURE_K * (10f64.powf(noise_figure_db / 10.0) - 1.0)
}

/// Thermal noise power `kTB` in dBm.
pub fn noise_power_dbm(system_temperature_k: f64, bandwidth_hz: f64) -> f64 {
    10.0 * (BOLTZMANN_J_K * system_temperature_k * bandwidth_hz).log10() + 30.0
}

/// Turns a tracked geometry into the impairments to apply.
#[derive(Debug, Clone)]
pub struct LinkBudgetModel {
    link: ResolvedLink,
    mode: ImpairmentModeConfig,
    rain_path: RainPath,
    noise_power_dbm: f64,
}

impl LinkBudgetModel {
    pub fn new(
        link: &ResolvedLink,
        station: &GeodeticPoint,
        mode: &ImpairmentModeConfig,
    ) -> Result<Self, ConfigError> {
        mode.validate()?;
        let rain_path = RainPath {
            latitude_deg: station.latitude_deg,
            station_altitude_km: station.altitude_km(),
            rain_height_km: mode
                .rain_height_km
                .unwrap_or_else(|| rain_height_km(station.latitude_deg)),
        };
        let system_temperature =
            system_noise_temperature_k(link.noise_temperature_k, link.noise_figure_db);
        Ok(Self {
            link: *link,
            mode: *mode,
            rain_path,
            noise_power_dbm: noise_power_dbm(system_temperature, link.bandwidth_hz),
        })
    }

    pub fn for_tracker(tracker: &Tracker, mode: &ImpairmentModeConfig) -> Result<Self, ConfigError> {
        Self::new(tracker.link(), tracker.station().location(), mode)
    }

    pub fn mode(&self) -> &ImpairmentModeConfig {
        &self.mode
    }

    pub fn link(&self) -> &ResolvedLink {
        &self.link
    }

    pub fn noise_power_dbm(&self) -> f64 {
        self.noise_power_dbm
    }

    pub fn evaluate(&self, point: &TrackPoint) -> ImpairmentSample {
        let geometry = &point.geometry;
        if !geometry.visible {
            return ImpairmentSample::unavailable(point);
        }

        let mode = &self.mode;
        let frequency_hz = self.link.frequency_hz;
        let elevation_deg = geometry.elevation_deg;

        let fspl = free_space_path_loss_db(geometry.range_km, frequency_hz);
        let doppler_hz = doppler_shift_hz(geometry.range_rate_km_s, frequency_hz);

        let path_loss_db = if mode.free_space_path_loss { fspl } else { 0.0 };
        let (satellite_pointing_loss_db, tracker_pointing_loss_db) = if mode.pointing_loss {
            (point.satellite_pointing_loss_db, point.tracker_pointing_loss_db)
        } else {
            (0.0, 0.0)
        };
        let gas_attenuation_db = if mode.atmospheric_gases {
            gas_attenuation_db(
                frequency_hz,
                elevation_deg,
                mode.water_vapour_density_g_m3,
                mode.temperature_c,
            )
        } else {
            0.0
        };
        let rain_attenuation_db = if mode.precipitation {
            rain_attenuation_db(
                &self.rain_path,
                frequency_hz,
                elevation_deg,
                self.link.rx_polarization,
                mode.rain_rate_mm_h,
            )
        } else {
            0.0
        };

        let total_loss_db = path_loss_db
            + satellite_pointing_loss_db
            + tracker_pointing_loss_db
            + gas_attenuation_db
            + rain_attenuation_db;

        let (cn_db, link_margin_db) = if mode.link_margin {
            let peak_gains = point.satellite_antenna_gain_dbi
                + point.satellite_pointing_loss_db
                + point.tracker_antenna_gain_dbi
                + point.tracker_pointing_loss_db;
            let received_dbm = self.link.tx_power_dbm + peak_gains
                - fspl
                - satellite_pointing_loss_db
                - tracker_pointing_loss_db
                - gas_attenuation_db
                - rain_attenuation_db;
            let cn = received_dbm - self.noise_power_dbm;
            (Some(cn), Some(cn - mode.required_snr_db))
        } else {
            (None, None)
        };

        ImpairmentSample {
            timestamp: point.timestamp,
            available: true,
            elevation_deg,
            range_km: geometry.range_km,
            path_loss_db,
            doppler_hz,
            satellite_pointing_loss_db,
            tracker_pointing_loss_db,
            gas_attenuation_db,
            rain_attenuation_db,
            total_loss_db,
            amplitude_gain: 10f64.powf(-total_loss_db / 20.0),
            frequency_offset_hz: if mode.doppler { doppler_hz } else { 0.0 },
            cn_db,
            link_margin_db,
        }
    }
}
