//! Rain attenuation: ITU-R P.838-3 specific attenuation, P.839 rain height
//! and the P.618 slant-path reduction.

use crate::antenna::Polarization;

use super::{clamp_attenuation, elevation_floor_rad, EFFECTIVE_EARTH_RADIUS_KM};

/// P.838-3 is defined from 1 GHz upwards.
const MIN_FREQUENCY_GHZ: f64 = 1.0;

struct Regression {
    terms: &'static [[f64; 3]],
    slope: f64,
    intercept: f64,
}

impl Regression {
    fn eval(&self, log_f: f64) -> f64 {
        self.terms
            .iter()
            .map(|[a, b, c]| a * (-((log_f - b) / c).powi(2)).exp())
            .sum::<f64>()
            + self.slope * log_f
            + self.intercept
    }
}

const LOG_KH: Regression = Regression {
    terms: &[
        [-5.33980, -0.10008, 1.13098],
        [-0.35351, 1.26970, 0.45400],
        [-0.23789, 0.86036, 0.15354],
        [-0.94158, 0.64552, 0.16817],
    ],
    slope: -0.18961,
    intercept: 0.71147,
};

const ALPHA_H: Regression = Regression {
    terms: &[
        [-0.14318, 1.82442, -0.55187],
        [0.29591, 0.77564, 0.19822],
        [0.32177, 0.63773, 0.13164],
        [-5.37610, -0.96230, 1.47828],
        [16.1721, -3.29980, 3.43990],
    ],
    slope: 0.67849,
    intercept: -1.95537,
};

const LOG_KV: Regression = Regression {
    terms: &[
        [-3.80595, 0.56934, 0.81061],
        [-3.44965, -0.22911, 0.51059],
        [-0.39902, 0.73042, 0.11899],
        [0.50167, 1.07319, 0.27195],
    ],
    slope: -0.16398,
    intercept: 0.63297,
};

const ALPHA_V: Regression = Regression {
    terms: &[
        [-0.07771, 2.33840, -0.76284],
        [0.56727, 0.95545, 0.54039],
        [-0.20238, 1.14520, 0.26809],
        [-48.2991, 0.791669, 0.116226],
        [48.5833, 0.791459, 0.116479],
    ],
    slope: -0.053739,
    intercept: 0.83433,
};

/// Polarization tilt angle relative to horizontal, in degrees.
fn tilt_deg(polarization: Polarization) -> f64 {
    match polarization {
        Polarization::LinearHorizontal => 0.0,
        Polarization::LinearVertical => 90.0,
        Polarization::Rhcp | Polarization::Lhcp => 45.0,
    }
}

/// P.838-3 `(k, alpha)` for the path elevation and polarization.
pub fn specific_coefficients(
    frequency_hz: f64,
    elevation_deg: f64,
    polarization: Polarization,
) -> (f64, f64) {
    let log_f = (frequency_hz / 1e9).max(MIN_FREQUENCY_GHZ).log10();
    let kh = 10f64.powf(LOG_KH.eval(log_f));
    let kv = 10f64.powf(LOG_KV.eval(log_f));
    let ah = ALPHA_H.eval(log_f);
    let av = ALPHA_V.eval(log_f);

    let theta = elevation_floor_rad(elevation_deg);
    let mix = theta.cos().powi(2) * (2.0 * tilt_deg(polarization).to_radians()).cos();
    let k = (kh + kv + (kh - kv) * mix) / 2.0;
    let alpha = (kh * ah + kv * av + (kh * ah - kv * av) * mix) / (2.0 * k);
    (k, alpha)
}

/// Specific attenuation in dB/km.
pub fn specific_attenuation_db_km(
    frequency_hz: f64,
    elevation_deg: f64,
    polarization: Polarization,
    rain_rate_mm_h: f64,
) -> f64 {
    if rain_rate_mm_h <= 0.0 {
        return 0.0;
    }
    let (k, alpha) = specific_coefficients(frequency_hz, elevation_deg, polarization);
    k * rain_rate_mm_h.powf(alpha)
}

/// Mean 0 degC isotherm height above sea level for a latitude, in km.
pub fn isotherm_height_km(latitude_deg: f64) -> f64 {
    if latitude_deg >= 23.0 {
        (5.0 - 0.075 * (latitude_deg - 23.0)).max(0.0)
    } else if latitude_deg >= -21.0 {
        5.0
    } else if latitude_deg >= -71.0 {
        5.0 + 0.1 * (latitude_deg + 21.0)
    } else {
        0.0
    }
}

/// Rain height: isotherm plus 0.36 km.
pub fn rain_height_km(latitude_deg: f64) -> f64 {
    isotherm_height_km(latitude_deg) + 0.36
}

/// Inputs describing the station end of the slant path.
#[derive(Debug, Clone, Copy)]
pub struct RainPath {
    pub latitude_deg: f64,
    pub station_altitude_km: f64,
    pub rain_height_km: f64,
}

/// Attenuation exceeded for 0.01 % of an average year at the given rain rate, in dB.
pub fn rain_attenuation_db(
    path: &RainPath,
    frequency_hz: f64,
    elevation_deg: f64,
    polarization: Polarization,
    rain_rate_mm_h: f64,
) -> f64 {
    let height = path.rain_height_km - path.station_altitude_km;
    if height <= 0.0 || rain_rate_mm_h <= 0.0 {
        return 0.0;
    }

    let theta = elevation_floor_rad(elevation_deg);
    let theta_deg = theta.to_degrees();
    let sin = theta.sin();
    let f_ghz = (frequency_hz / 1e9).max(MIN_FREQUENCY_GHZ);

    let slant_km = if theta_deg >= 5.0 {
        height / sin
    } else {
        2.0 * height / ((sin * sin + 2.0 * height / EFFECTIVE_EARTH_RADIUS_KM).sqrt() + sin)
    };
    let horizontal_km = slant_km * theta.cos();

    let gamma = specific_attenuation_db_km(frequency_hz, elevation_deg, polarization, rain_rate_mm_h);

    let horizontal_reduction = 1.0
        / (1.0 + 0.78 * (horizontal_km * gamma / f_ghz).sqrt()
            - 0.38 * (1.0 - (-2.0 * horizontal_km).exp()));

    let zeta_deg = (height / (horizontal_km * horizontal_reduction)).atan().to_degrees();
    let adjusted_km = if zeta_deg > theta_deg {
        horizontal_km * horizontal_reduction / theta.cos()
    } else {
        height / sin
    };

    let chi = if path.latitude_deg.abs() < 36.0 {
        36.0 - path.latitude_deg.abs()
    } else {
        0.0
    };
    let vertical_adjustment = 1.0
        / (1.0
            + sin.sqrt()
                * (31.0 * (1.0 - (-(theta_deg / (1.0 + chi))).exp()) * (adjusted_km * gamma).sqrt()
                    / (f_ghz * f_ghz)
                    - 0.45));

    let effective_km = adjusted_km * vertical_adjustment;
    clamp_attenuation(gamma * effective_km)
}
