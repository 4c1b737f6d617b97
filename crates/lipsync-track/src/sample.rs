//! Playback sampling
//!
//! The rig samples the track every frame: find the two keyframes around
//! the playback time, ease the blend factor and interpolate every channel.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lipsync_core::FacialPose;

use crate::KeyframeTrack;

/// Easing applied to the blend factor between two keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// `t²(3 − 2t)`
    Smoothstep,
    /// `1 − (1 − t)³`
    EaseOutCubic,
}

impl Easing {
    /// Ease a blend factor; input is clamped to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Ok(Easing::Linear),
            "smoothstep" | "smooth" => Ok(Easing::Smoothstep),
            "ease_out_cubic" | "cubic" => Ok(Easing::EaseOutCubic),
            other => Err(format!("unknown easing '{other}'")),
        }
    }
}

impl KeyframeTrack {
    /// Pose at playback time `time`.
    ///
    /// Before the first keyframe the first pose is held, after the last
    /// keyframe the last pose. An empty track yields the neutral pose.
    pub fn sample(&self, time: f64, easing: Easing) -> FacialPose {
        let idx = self.keyframes.partition_point(|k| k.time <= time);

        let (before, after) = match (idx.checked_sub(1), self.keyframes.get(idx)) {
            (Some(b), Some(a)) => (&self.keyframes[b], a),
            (Some(b), None) => return self.keyframes[b].pose,
            (None, Some(a)) => return a.pose,
            (None, None) => return FacialPose::neutral(),
        };

        let range = after.time - before.time;
        let alpha = if range > 0.0 {
            ((time - before.time) / range) as f32
        } else {
            0.0
        };

        let mut pose = before.pose.lerp(&after.pose, easing.apply(alpha));
        pose.pin_jaw();
        pose
    }

    /// Has playback passed the last keyframe?
    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.duration()
    }
}
