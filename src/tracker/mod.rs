mod config;
mod error;
mod passes;
mod sample;
mod tracker;

pub use config::{
    GroundConfig, LinkDirection, LinkParameters, ObservationWindow, SatelliteConfig,
    TrackerConfig,
};
pub use error::TrackerError;
pub use passes::{find_passes, Pass};
pub use sample::{PointingSnapshot, TrackPoint};
pub use tracker::{ResolvedLink, TrackIter, Tracker};
