mod elements;
mod error;
mod frames;
mod propagator;

pub use elements::{parse_catalog, OrbitalElementSet};
pub use error::OrbitError;
pub use frames::{gmst_rad, teme_to_ecef_position, teme_to_ecef_velocity, EARTH_ROTATION_RAD_S};
pub use propagator::{Propagator, StateVector};
