mod budget;
mod config;
mod gases;
mod rain;

pub use budget::{
    doppler_shift_hz, free_space_path_loss_db, noise_power_dbm, system_noise_temperature_k,
    ImpairmentSample, LinkBudgetModel, BOLTZMANN_J_K, REFERENCE_TEMPERATURE_K,
};
pub use config::{HorizonPolicy, ImpairmentModeConfig};
pub use gases::gas_attenuation_db;
pub use rain::{
    isotherm_height_km, rain_attenuation_db, rain_height_km, specific_attenuation_db_km,
    specific_coefficients, RainPath,
};

/// Effective Earth radius (4/3 model) used in low-elevation path factors.
pub const EFFECTIVE_EARTH_RADIUS_KM: f64 = 8500.0;

/// Slant-path factors never see an elevation below this.
pub const MIN_ELEVATION_DEG: f64 = 0.1;

fn elevation_floor_rad(elevation_deg: f64) -> f64 {
    elevation_deg.max(MIN_ELEVATION_DEG).to_radians()
}

/// Floors attenuation at zero and caps it finite. NaN is a model fault and is
/// never turned into a clean link.
fn clamp_attenuation(db: f64) -> f64 {
    debug_assert!(!db.is_nan(), "attenuation evaluated to NaN");
    if db < 0.0 {
        0.0
    } else if db > f64::MAX {
        f64::MAX
    } else {
        db
    }
}
