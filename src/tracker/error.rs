use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::ConfigError;
use crate::orbit::OrbitError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("observation window must end after it starts ({start} .. {end})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("{timestamp} is outside the observation window {start} .. {end}")]
    OutOfWindow {
        timestamp: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("orbit error: {0}")]
    Orbit(#[from] OrbitError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
