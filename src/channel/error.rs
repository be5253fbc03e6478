use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::ConfigError;
use crate::tracker::TrackerError;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("stream cursor {cursor} ran past the observation window end {end}")]
    WindowExhausted {
        cursor: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
