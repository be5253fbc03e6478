use serde::{Deserialize, Serialize};

use super::geodetic::GeodeticPoint;
use crate::config::{ensure, ConfigError};
use crate::orbit::StateVector;

/// Satellite position seen from the station's local horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopocentricGeometry {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    /// Positive while the satellite recedes.
    pub range_rate_km_s: f64,
    /// Angle at the satellite between nadir and the station.
    pub off_nadir_deg: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    #[serde(flatten)]
    pub location: GeodeticPoint,
    #[serde(default)]
    pub min_elevation_deg: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GroundStation {
    location: GeodeticPoint,
    min_elevation_deg: f64,
    ecef_km: [f64; 3],
}

impl GroundStation {
    pub fn new(location: GeodeticPoint, min_elevation_deg: f64) -> Result<Self, ConfigError> {
        location.validate()?;
        ensure("min_elevation_deg", min_elevation_deg, "[-90, 90]", |v| {
            v.abs() <= 90.0
        })?;
        Ok(Self {
            location,
            min_elevation_deg,
            ecef_km: location.to_ecef_km(),
        })
    }

    pub fn from_config(config: &StationConfig) -> Result<Self, ConfigError> {
        Self::new(config.location, config.min_elevation_deg)
    }

    pub fn location(&self) -> &GeodeticPoint {
        &self.location
    }

    pub fn min_elevation_deg(&self) -> f64 {
        self.min_elevation_deg
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        self.ecef_km
    }

    pub fn observe(&self, state: &StateVector) -> TopocentricGeometry {
        let sat = state.position_ecef_km;
        let sta = self.ecef_km;
        let dr = sub(sat, sta);
        let range_km = norm(dr);

        let (east, north, up) =
            ecef_to_enu(dr, self.location.lat_rad(), self.location.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
        } else {
            90.0
        };

        // Both positions are ECEF, so the station is at rest in this frame.
        let range_rate_km_s = if range_km > 0.0 {
            dot(state.velocity_ecef_km_s, dr) / range_km
        } else {
            0.0
        };

        let sat_radius = norm(sat);
        let off_nadir_deg = if range_km > 0.0 && sat_radius > 0.0 {
            let cos = -dot(sat, sub(sta, sat)) / (sat_radius * range_km);
            cos.clamp(-1.0, 1.0).acos().to_degrees()
        } else {
            0.0
        };

        TopocentricGeometry {
            azimuth_deg,
            elevation_deg,
            range_km,
            range_rate_km_s,
            off_nadir_deg,
            visible: elevation_deg >= self.min_elevation_deg,
        }
    }

    /// ECEF position of the point at the given look angles and range.
    pub fn look_to_ecef_km(&self, azimuth_deg: f64, elevation_deg: f64, range_km: f64) -> [f64; 3] {
        let az = azimuth_deg.to_radians();
        let el = elevation_deg.to_radians();
        let east = range_km * el.cos() * az.sin();
        let north = range_km * el.cos() * az.cos();
        let up = range_km * el.sin();

        let (sin_lat, cos_lat) = self.location.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.location.lon_rad().sin_cos();
        let sta = self.ecef_km;
        [
            sta[0] - sin_lon * east - sin_lat * cos_lon * north + cos_lat * cos_lon * up,
            sta[1] + cos_lon * east - sin_lat * sin_lon * north + cos_lat * sin_lon * up,
            sta[2] + cos_lat * north + sin_lat * up,
        ]
    }
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    fn station() -> GroundStation {
        GroundStation::new(GeodeticPoint::new(35.3333, 25.1833, 1.0).unwrap(), 0.0).unwrap()
    }

    fn state_at(position: [f64; 3], velocity: [f64; 3]) -> StateVector {
        StateVector {
            timestamp: Utc::now(),
            position_teme_km: position,
            velocity_teme_km_s: velocity,
            position_ecef_km: position,
            velocity_ecef_km_s: velocity,
        }
    }

    #[test]
    fn zenith_pass_geometry() {
        let gs = station();
        let target = gs.look_to_ecef_km(0.0, 90.0, 500.0);
        let geo = gs.observe(&state_at(target, [0.0; 3]));
        assert_abs_diff_eq!(geo.elevation_deg, 90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(geo.range_km, 500.0, epsilon = 1e-9);
        assert!(geo.visible);
        // Geodetic and geocentric verticals differ slightly away from the equator.
        assert!(geo.off_nadir_deg < 0.5);
    }

    #[test]
    fn topocentric_round_trip_recovers_point() {
        let gs = station();
        let target = GeodeticPoint::new(37.9, 23.7, 550_000.0).unwrap();
        let geo = gs.observe(&state_at(target.to_ecef_km(), [0.0; 3]));
        let ecef = gs.look_to_ecef_km(geo.azimuth_deg, geo.elevation_deg, geo.range_km);
        let back = GeodeticPoint::from_ecef_km(ecef);
        assert_abs_diff_eq!(back.latitude_deg, target.latitude_deg, epsilon = 1e-8);
        assert_abs_diff_eq!(back.longitude_deg, target.longitude_deg, epsilon = 1e-8);
        assert_abs_diff_eq!(back.altitude_m, target.altitude_m, epsilon = 1e-3);
    }

    #[test]
    fn below_horizon_is_not_visible() {
        let gs = station();
        let target = gs.look_to_ecef_km(120.0, -5.0, 2000.0);
        let geo = gs.observe(&state_at(target, [0.0; 3]));
        assert_abs_diff_eq!(geo.azimuth_deg, 120.0, epsilon = 1e-6);
        assert!(!geo.visible);
    }

    #[test]
    fn range_rate_sign_follows_motion() {
        let gs = station();
        let target = gs.look_to_ecef_km(45.0, 30.0, 1000.0);
        let los = sub(target, gs.position_ecef_km());
        let unit = [los[0] / 1000.0, los[1] / 1000.0, los[2] / 1000.0];
        let receding = gs.observe(&state_at(target, [unit[0] * 5.0, unit[1] * 5.0, unit[2] * 5.0]));
        let closing = gs.observe(&state_at(target, [-unit[0] * 5.0, -unit[1] * 5.0, -unit[2] * 5.0]));
        assert_abs_diff_eq!(receding.range_rate_km_s, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(closing.range_rate_km_s, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_point_in_earth_frame_has_no_range_rate() {
        let gs = station();
        let target = gs.look_to_ecef_km(120.0, 20.0, 1500.0);
        let geo = gs.observe(&state_at(target, [0.0, 0.0, 0.0]));
        assert_abs_diff_eq!(geo.range_rate_km_s, 0.0, epsilon = 1e-12);
    }
}
