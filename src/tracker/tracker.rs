use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::config::{LinkDirection, ObservationWindow, TrackerConfig};
use super::error::TrackerError;
use super::passes::{find_passes, Pass};
use super::sample::{PointingSnapshot, TrackPoint};
use crate::antenna::{Antenna, Boresight, Polarization};
use crate::config::{ensure, ConfigError};
use crate::orbit::Propagator;
use crate::station::{GroundStation, TopocentricGeometry};

const FREQUENCY_TOLERANCE_HZ: f64 = 1e-3;

/// Carrier and receiver parameters for the configured direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLink {
    pub direction: LinkDirection,
    pub frequency_hz: f64,
    pub tx_power_dbm: f64,
    pub noise_figure_db: f64,
    pub noise_temperature_k: f64,
    pub bandwidth_hz: f64,
    pub tx_polarization: Polarization,
    pub rx_polarization: Polarization,
}

/// Which end of the link an antenna is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mount {
    Satellite,
    Ground,
}

pub struct Tracker {
    name: String,
    propagator: Propagator,
    station: GroundStation,
    window: ObservationWindow,
    resolution_us: u64,
    satellite_antenna: Antenna,
    ground_antenna: Antenna,
    link: ResolvedLink,
}

impl Tracker {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let window = config.observation;
        if window.end <= window.start {
            return Err(TrackerError::InvalidWindow {
                start: window.start,
                end: window.end,
            });
        }
        ensure(
            "time_resolution_us",
            config.time_resolution_us as f64,
            "> 0",
            |v| v > 0.0,
        )?;

        let sat = &config.satellite.link;
        let gnd = &config.ground_station.link;
        sat.validate()?;
        gnd.validate()?;

        let direction = config.direction;
        let (tx, rx) = match direction {
            LinkDirection::Downlink => (sat, gnd),
            LinkDirection::Uplink => (gnd, sat),
        };
        if (tx.tx_frequency_hz - rx.rx_frequency_hz).abs() > FREQUENCY_TOLERANCE_HZ {
            return Err(ConfigError::Invalid(format!(
                "{} transmit frequency {} Hz does not match receive frequency {} Hz",
                direction, tx.tx_frequency_hz, rx.rx_frequency_hz
            ))
            .into());
        }
        let frequency_hz = tx.tx_frequency_hz;

        let (satellite_antenna, ground_antenna) = match direction {
            LinkDirection::Downlink => (
                Antenna::build(&sat.tx_antenna, frequency_hz)?,
                Antenna::build(&gnd.rx_antenna, frequency_hz)?,
            ),
            LinkDirection::Uplink => (
                Antenna::build(&sat.rx_antenna, frequency_hz)?,
                Antenna::build(&gnd.tx_antenna, frequency_hz)?,
            ),
        };
        let (tx_antenna, rx_antenna) = match direction {
            LinkDirection::Downlink => (&satellite_antenna, &ground_antenna),
            LinkDirection::Uplink => (&ground_antenna, &satellite_antenna),
        };

        let link = ResolvedLink {
            direction,
            frequency_hz,
            tx_power_dbm: tx.tx_power_dbm,
            noise_figure_db: rx.noise_figure_db,
            noise_temperature_k: rx.noise_temperature_k,
            bandwidth_hz: rx.rx_bandwidth_hz,
            tx_polarization: tx_antenna.polarization(),
            rx_polarization: rx_antenna.polarization(),
        };

        let station = GroundStation::from_config(&config.ground_station.site)?;
        let propagator = Propagator::new(config.satellite.tle.clone())?;
        let name = propagator.elements().name();

        log::info!(
            "tracking {} ({}) at {:.3} MHz from {} to {} every {} us",
            name,
            direction,
            frequency_hz / 1e6,
            window.start,
            window.end,
            config.time_resolution_us
        );

        Ok(Self {
            name,
            propagator,
            station,
            window,
            resolution_us: config.time_resolution_us,
            satellite_antenna,
            ground_antenna,
            link,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    pub fn window(&self) -> ObservationWindow {
        self.window
    }

    pub fn resolution_us(&self) -> u64 {
        self.resolution_us
    }

    pub fn resolution(&self) -> Duration {
        Duration::microseconds(self.resolution_us as i64)
    }

    pub fn link(&self) -> &ResolvedLink {
        &self.link
    }

    /// Antenna on the satellite used by the configured direction.
    pub fn satellite_antenna(&self) -> &Antenna {
        &self.satellite_antenna
    }

    /// Antenna on the ground station used by the configured direction.
    pub fn ground_antenna(&self) -> &Antenna {
        &self.ground_antenna
    }

    pub fn pointing_snapshot(&self) -> PointingSnapshot {
        PointingSnapshot {
            satellite_deg: self.satellite_antenna.pointing_error_deg(),
            ground_deg: self.ground_antenna.pointing_error_deg(),
        }
    }

    /// Number of points produced by [`Tracker::track`].
    pub fn steps(&self) -> u64 {
        let span_us = (self.window.end - self.window.start)
            .num_microseconds()
            .unwrap_or(i64::MAX) as u64;
        span_us / self.resolution_us + 1
    }

    pub fn track(&self) -> TrackIter<'_> {
        TrackIter {
            tracker: self,
            next: 0,
            count: self.steps(),
        }
    }

    pub fn geometry_at(&self, timestamp: DateTime<Utc>) -> Result<TopocentricGeometry, TrackerError> {
        self.check_window(timestamp)?;
        let state = self.propagator.propagate(timestamp)?;
        Ok(self.station.observe(&state))
    }

    /// Random-access query using the live pointing errors.
    pub fn state_at(&self, timestamp: DateTime<Utc>) -> Result<TrackPoint, TrackerError> {
        self.state_with_pointing(timestamp, &self.pointing_snapshot())
    }

    pub fn state_with_pointing(
        &self,
        timestamp: DateTime<Utc>,
        pointing: &PointingSnapshot,
    ) -> Result<TrackPoint, TrackerError> {
        let geometry = self.geometry_at(timestamp)?;

        let sat_off = off_boresight_deg(self.satellite_antenna.boresight(), Mount::Satellite, &geometry);
        let gnd_off = off_boresight_deg(self.ground_antenna.boresight(), Mount::Ground, &geometry);
        let satellite_gain = self.satellite_antenna.gain_db(sat_off, pointing.satellite_deg);
        let tracker_gain = self.ground_antenna.gain_db(gnd_off, pointing.ground_deg);

        Ok(TrackPoint {
            timestamp,
            geometry,
            satellite_antenna_gain_dbi: satellite_gain,
            tracker_antenna_gain_dbi: tracker_gain,
            satellite_pointing_loss_db: self.satellite_antenna.peak_gain_dbi() - satellite_gain,
            tracker_pointing_loss_db: self.ground_antenna.peak_gain_dbi() - tracker_gain,
        })
    }

    /// Passes inside the observation window, scanned every `step`.
    pub fn passes(&self, step: Duration) -> Result<Vec<Pass>, TrackerError> {
        let passes = find_passes(self, step)?;
        log::info!(
            "{} pass(es) of {} between {} and {}",
            passes.len(),
            self.name,
            self.window.start,
            self.window.end
        );
        Ok(passes)
    }

    fn check_window(&self, timestamp: DateTime<Utc>) -> Result<(), TrackerError> {
        if self.window.contains(timestamp) {
            Ok(())
        } else {
            Err(TrackerError::OutOfWindow {
                timestamp,
                start: self.window.start,
                end: self.window.end,
            })
        }
    }
}

fn off_boresight_deg(boresight: Boresight, mount: Mount, geometry: &TopocentricGeometry) -> f64 {
    let angle = match (boresight, mount) {
        (Boresight::Tracking, _) => 0.0,
        (Boresight::Nadir, Mount::Satellite) => geometry.off_nadir_deg,
        (Boresight::Zenith, Mount::Satellite) => 180.0 - geometry.off_nadir_deg,
        (Boresight::Zenith, Mount::Ground) => 90.0 - geometry.elevation_deg,
        (Boresight::Nadir, Mount::Ground) => 90.0 + geometry.elevation_deg,
    };
    angle.clamp(0.0, 180.0)
}

/// Lazy walk over the observation window at the tracker's resolution.
///
/// Each call to [`Tracker::track`] starts a fresh, independent walk.
pub struct TrackIter<'a> {
    tracker: &'a Tracker,
    next: u64,
    count: u64,
}

impl Iterator for TrackIter<'_> {
    type Item = Result<TrackPoint, TrackerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let offset_us = self.next.saturating_mul(self.tracker.resolution_us);
        self.next += 1;
        let timestamp = self.tracker.window.start + Duration::microseconds(offset_us as i64);
        Some(self.tracker.state_at(timestamp))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrackIter<'_> {}
