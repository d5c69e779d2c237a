//! Observability utilities for logging and metrics

pub mod logging;
pub mod metrics;

pub use logging::*;
pub use metrics::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Logging setup error: {0}")]
    Logging(String),
}

pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
