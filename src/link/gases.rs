//! Atmospheric gas absorption after Ippolito's regression model.
//!
//! Valid between 1 and 12 GHz; outside that range the nearest table row is used.

use super::{clamp_attenuation, elevation_floor_rad, EFFECTIVE_EARTH_RADIUS_KM};

/// (f GHz, a, b, c): specific attenuation `a + b*rho - c*T` in dB/km.
const SPECIFIC_COEFFICIENTS: [(f64, f64, f64, f64); 4] = [
    (1.0, 0.00588, 0.0000178, 0.0000517),
    (4.0, 0.00802, 0.000141, 0.0000850),
    (6.0, 0.00824, 0.000300, 0.0000895),
    (12.0, 0.00898, 0.00137, 0.000108),
];

/// (f GHz, alpha, beta, xi): zenith attenuation `alpha + beta*rho - xi*T` in dB.
const ZENITH_COEFFICIENTS: [(f64, f64, f64, f64); 4] = [
    (1.0, 0.0334, 0.00000276, 0.000112),
    (4.0, 0.0397, 0.000276, 0.000176),
    (6.0, 0.0404, 0.000651, 0.000196),
    (12.0, 0.0436, 0.00318, 0.000315),
];

/// Log-log interpolation of a coefficient table at `f_ghz`.
fn coefficients(table: &[(f64, f64, f64, f64)], f_ghz: f64) -> (f64, f64, f64) {
    let first = table[0];
    let last = table[table.len() - 1];
    if f_ghz <= first.0 {
        return (first.1, first.2, first.3);
    }
    if f_ghz >= last.0 {
        return (last.1, last.2, last.3);
    }

    let upper = table.iter().position(|row| row.0 >= f_ghz).unwrap_or(table.len() - 1);
    let (lo, hi) = (table[upper - 1], table[upper]);
    let interp = |y1: f64, y2: f64| {
        let m = (y1 / y2).log10() / (lo.0 / hi.0).log10();
        10f64.powf(m * f_ghz.log10() + y2.log10() - m * hi.0.log10())
    };
    (interp(lo.1, hi.1), interp(lo.2, hi.2), interp(lo.3, hi.3))
}

/// Slant-path gas attenuation in dB.
pub fn gas_attenuation_db(
    frequency_hz: f64,
    elevation_deg: f64,
    water_vapour_density_g_m3: f64,
    temperature_c: f64,
) -> f64 {
    let f_ghz = frequency_hz / 1e9;
    let (a, b, c) = coefficients(&SPECIFIC_COEFFICIENTS, f_ghz);
    let (alpha, beta, xi) = coefficients(&ZENITH_COEFFICIENTS, f_ghz);

    let specific = a + b * water_vapour_density_g_m3 - c * temperature_c;
    let zenith = alpha + beta * water_vapour_density_g_m3 - xi * temperature_c;
    if specific <= 0.0 || zenith <= 0.0 {
        return 0.0;
    }
    let scale_height_km = zenith / specific;

    let theta = elevation_floor_rad(elevation_deg);
    let sin = theta.sin();
    let attenuation = if theta.to_degrees() >= 10.0 {
        zenith / sin
    } else {
        2.0 * zenith / ((sin * sin + 2.0 * scale_height_km / EFFECTIVE_EARTH_RADIUS_KM).sqrt() + sin)
    };
    clamp_attenuation(attenuation)
}
