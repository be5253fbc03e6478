use serde::{Deserialize, Serialize};

use crate::config::{ensure, ConfigError};

// WGS-84
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.006_694_379_990_14;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl GeodeticPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Result<Self, ConfigError> {
        let point = Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure("latitude_deg", self.latitude_deg, "[-90, 90]", |v| v.abs() <= 90.0)?;
        ensure("longitude_deg", self.longitude_deg, "[-180, 180]", |v| {
            v.abs() <= 180.0
        })?;
        ensure("altitude_m", self.altitude_m, "finite", |_| true)
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_m / 1000.0
    }

    pub fn to_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_km();
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }

    /// Inverse of [`GeodeticPoint::to_ecef_km`], by fixed-point iteration on latitude.
    pub fn from_ecef_km(ecef: [f64; 3]) -> Self {
        let [x, y, z] = ecef;
        let p = (x * x + y * y).sqrt();
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - WGS84_E2));
        let mut alt_km = 0.0;
        for _ in 0..12 {
            let sin_lat = lat.sin();
            let cos_lat = lat.cos();
            let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
            alt_km = if cos_lat.abs() > 1e-10 {
                p / cos_lat - n
            } else {
                z.abs() - n * (1.0 - WGS84_E2)
            };
            lat = z.atan2(p * (1.0 - WGS84_E2 * n / (n + alt_km)));
        }

        Self {
            latitude_deg: lat.to_degrees(),
            longitude_deg: lon.to_degrees(),
            altitude_m: alt_km * 1000.0,
        }
    }
}
