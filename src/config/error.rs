use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{parameter} = {value} out of range (expected {expected})")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Fails with `OutOfRange` unless `value` is finite and `accept` holds.
pub fn ensure(
    parameter: &'static str,
    value: f64,
    expected: &'static str,
    accept: impl FnOnce(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && accept(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter,
            value,
            expected,
        })
    }
}
