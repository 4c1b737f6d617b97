//! LIPSYNC Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the lip-sync pipeline:
//! - 3-component channel vectors (Vec3)
//! - The facial channel schema and its tagged values (Channel, ChannelValue)
//! - The full facial pose (FacialPose)
//! - Time and precision helpers
//! - The error type used at crate boundaries

pub mod vector;
pub mod channel;
pub mod pose;
pub mod time;
pub mod error;

pub use vector::*;
pub use channel::*;
pub use pose::*;
pub use time::*;
pub use error::*;
