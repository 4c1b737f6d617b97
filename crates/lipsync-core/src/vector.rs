//! Three-component channel vectors
//!
//! Jaw, teeth and tongue offsets are carried as small x/y/z vectors in rig
//! space. They are NOT positions in a scene; they are control values.

use serde::{Deserialize, Serialize};

use crate::round_value;

/// Three-component rig control vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Vector with only the vertical component set
    pub fn vertical(y: f32) -> Self {
        Self { x: 0.0, y, z: 0.0 }
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Sum of absolute components
    pub fn abs_sum(&self) -> f32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }

    /// Does this vector carry any displacement at all?
    pub fn is_nonzero(&self) -> bool {
        self.abs_sum() > 0.0
    }

    /// Apply a function to every component
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Vec3 {
        Vec3 {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }

    /// Combine componentwise with another vector
    pub fn zip(&self, other: &Vec3, f: impl Fn(f32, f32) -> f32) -> Vec3 {
        Vec3 {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
            z: f(self.z, other.z),
        }
    }

    /// Round every component to a fixed number of decimals
    pub fn rounded(&self, decimals: u32) -> Vec3 {
        self.map(|v| round_value(v, decimals))
    }
}
