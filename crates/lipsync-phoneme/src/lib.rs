//! LIPSYNC Phoneme Layer
//!
//! Turns raw phonetic symbols into facial targets.
//!
//! # Flow
//!
//! raw IPA symbol → PhonemeNormalizer → canonical token → FacialTargetTable → FacialPose
//!
//! Both stages are total: any input string yields a usable token and a
//! fully-populated pose. Unknown symbols degrade to fallbacks, never errors.
//!
//! The table is built once and only read afterwards, so a single instance
//! can be shared by reference across concurrent pipeline runs.

pub mod class;
pub mod normalizer;
pub mod table;

pub use class::*;
pub use normalizer::*;
pub use table::*;
