//! Time and precision primitives
//!
//! Track times are seconds as `f64`, rounded to milliseconds on output.
//! Channel values are `f32`, rounded to hundredths on output.

use crate::{LipsyncError, LipsyncResult};

/// Decimals kept on keyframe times
pub const TIME_DECIMALS: u32 = 3;

/// Decimals kept on channel values
pub const VALUE_DECIMALS: u32 = 2;

/// Round a time value (seconds) to `decimals` places
#[inline]
pub fn round_time(seconds: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    // + 0.0 folds negative zero
    (seconds * factor).round() / factor + 0.0
}

/// Round a channel value to `decimals` places
#[inline]
pub fn round_value(value: f32, decimals: u32) -> f32 {
    let factor = 10f64.powi(decimals as i32);
    ((value as f64 * factor).round() / factor) as f32 + 0.0
}

/// Validate an utterance duration at the pipeline boundary.
///
/// The duration must survive rounding to the millisecond grid: anything
/// below half a millisecond rounds to 0, and anything whose millisecond
/// count overflows rounds to infinity.
pub fn validate_duration(seconds: f64) -> LipsyncResult<f64> {
    let factor = 10f64.powi(TIME_DECIMALS as i32);
    let rounded = round_time(seconds, TIME_DECIMALS);
    if seconds.is_finite() && (seconds * factor).is_finite() && rounded > 0.0 {
        Ok(seconds)
    } else {
        Err(LipsyncError::InvalidDuration(seconds))
    }
}
