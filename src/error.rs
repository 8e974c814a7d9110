//! Configuration-time errors.
//!
//! Evaluation never fails: out-of-range physical inputs are clamped and the
//! two degenerate cases (absent depletion field, zero-sum composition) have
//! defined fallbacks. Everything that can go wrong is caught here, once,
//! before the first point is evaluated.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{key}: expected 1 or {expected} entries, got {actual}")]
    LengthMismatch {
        key: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{key} = {value} is out of bounds: must be {requirement}")]
    OutOfBounds {
        key: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("{key} must be a finite number")]
    NonFinite { key: &'static str },

    #[error("{key}: mask entries must be true/false or 0/1, got {value}")]
    InvalidMaskEntry { key: &'static str, value: i64 },

    #[error("Compositional field listed more than once: {0}")]
    DuplicateField(String),

    #[error("Unknown heating model: {0}")]
    UnknownModel(String),

    #[error("Heating model registered twice: {0}")]
    DuplicateModel(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
