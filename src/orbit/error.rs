use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("invalid tle format: {0}")]
    InvalidTleFormat(String),
    #[error("invalid tle: {0}")]
    InvalidElements(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("propagation error at {timestamp}: {message}")]
    Propagation { timestamp: String, message: String },
}
