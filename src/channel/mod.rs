mod config;
mod error;
mod model;
mod report;

pub use config::{ChannelConfig, ChannelControl};
pub use error::ChannelError;
pub use model::{ChannelModel, ChannelState};
pub use report::{ImpairmentReport, ProcessedBlock};
