mod antenna;
mod directional;
mod pattern;

pub use antenna::{
    Antenna, AntennaConfig, AntennaKind, Boresight, PointingError, Polarization,
    SPEED_OF_LIGHT_M_S,
};
pub use directional::{Helix, ParabolicReflector, Yagi};
pub use pattern::{
    sinc_rolloff_db, AntennaPattern, Custom, Dipole, Isotropic, Monopole, QuadrifilarHelix,
    PATTERN_FLOOR_DB,
};
