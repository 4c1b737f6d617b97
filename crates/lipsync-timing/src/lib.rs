//! LIPSYNC Timing
//!
//! Assigns a start and duration to every phoneme of an utterance.
//!
//! Two modes:
//! - Nominal: lay phonemes end to end using per-class nominal durations,
//!   then rescale the whole sequence to the measured audio duration.
//! - Word timestamps: take word spans from the transcriber and split each
//!   word evenly across its syllables.
//!
//! Durations come from outside (audio measurement, transcriber timestamps).
//! Nothing here touches audio.

pub mod estimator;
pub mod words;

pub use estimator::*;
pub use words::*;
