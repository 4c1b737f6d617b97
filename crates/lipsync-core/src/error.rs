//! Error types for the lip-sync pipeline

use thiserror::Error;

/// Core LIPSYNC errors
///
/// Only structural validation failures surface here. Unknown phonemes,
/// missing dictionary entries and degenerate timing are resolved locally by
/// fallbacks and never become errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LipsyncError {
    #[error("Invalid duration: {0} (must be finite and round to at least 1 ms)")]
    InvalidDuration(f64),

    #[error("Invalid word span '{word}': start {start}, end {end}")]
    InvalidWordSpan { word: String, start: f64, end: f64 },

    #[error("Invalid smoothing config: {0}")]
    InvalidSmoothing(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Result type for LIPSYNC operations
pub type LipsyncResult<T> = Result<T, LipsyncError>;
