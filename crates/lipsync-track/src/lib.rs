//! LIPSYNC Track - from timed phonemes to an animation track
//!
//! This crate turns timed phonemes into a keyframe track a facial rig can
//! play back:
//! - Synthesis: peak, sustain, anticipation and transition keyframes per
//!   phoneme, or per syllable when word timestamps are known
//! - Smoothing: eased intermediate frames and a Gaussian pass
//! - Sampling: pose at an arbitrary playback time
//!
//! `LipsyncEngine` wires the stages together behind one entry point.

pub mod jaw;
pub mod keyframe;
pub mod pipeline;
pub mod sample;
pub mod smoothing;
pub mod synth;

pub use jaw::*;
pub use keyframe::*;
pub use pipeline::*;
pub use sample::*;
pub use smoothing::*;
pub use synth::*;
