mod error;
mod scenario;

pub use error::{ensure, ConfigError};
pub use scenario::Scenario;
