use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ensure, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_rate_hz: f64,
    /// Fixed seed for reproducible noise; drawn from the OS when absent.
    pub noise_seed: Option<u64>,
    /// Emit an impairment report at every update.
    pub report: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1e6,
            noise_seed: None,
            report: true,
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sample_rate(self.sample_rate_hz)
    }
}

fn validate_sample_rate(hz: f64) -> Result<(), ConfigError> {
    ensure("sample_rate_hz", hz, "> 0", |v| v > 0.0)
}

/// Handle for tuning a running channel from another thread.
///
/// Changes are picked up at the start of the next block.
#[derive(Debug, Clone)]
pub struct ChannelControl {
    sample_rate_bits: Arc<AtomicU64>,
}

impl ChannelControl {
    pub(crate) fn new(sample_rate_hz: f64) -> Result<Self, ConfigError> {
        validate_sample_rate(sample_rate_hz)?;
        Ok(Self {
            sample_rate_bits: Arc::new(AtomicU64::new(sample_rate_hz.to_bits())),
        })
    }

    pub fn sample_rate_hz(&self) -> f64 {
        f64::from_bits(self.sample_rate_bits.load(Ordering::Acquire))
    }

    pub fn set_sample_rate(&self, hz: f64) -> Result<(), ConfigError> {
        validate_sample_rate(hz)?;
        self.sample_rate_bits.store(hz.to_bits(), Ordering::Release);
        Ok(())
    }
}
