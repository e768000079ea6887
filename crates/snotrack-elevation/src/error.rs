//! Elevation lookup failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("elevation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("elevation service returned HTTP {0}")]
    Status(u16),

    #[error("elevation service returned {got} samples for {expected} coordinates")]
    SampleCount { expected: usize, got: usize },

    #[error("elevation service error: {0}")]
    Service(String),
}
