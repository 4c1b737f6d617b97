//! Facial Pose - the complete set of facial control channels
//!
//! A pose is NOT a sparse override. Every pose carries every channel of the
//! schema, defaulting to zero, and `jaw.x` is always pinned to zero.

use serde::{Deserialize, Serialize};

use crate::{round_value, Channel, ChannelValue, Vec3};

/// Full facial pose
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacialPose {
    #[serde(rename = "jawValue")]
    pub jaw: Vec3,
    pub funnel_right_up: f32,
    pub funnel_right_down: f32,
    pub funnel_left_up: f32,
    pub funnel_left_down: f32,
    pub purse_right_up: f32,
    pub purse_right_down: f32,
    pub purse_left_up: f32,
    pub purse_left_down: f32,
    pub corner_pull_right: f32,
    pub corner_pull_left: f32,
    #[serde(rename = "teethUpperValue")]
    pub teeth_upper: Vec3,
    #[serde(rename = "teethLowerValue")]
    pub teeth_lower: Vec3,
    #[serde(rename = "tongueValue")]
    pub tongue: Vec3,
    pub tongue_in_out: f32,
    pub press_right_up: f32,
    pub press_right_down: f32,
    pub press_left_up: f32,
    pub press_left_down: f32,
    pub towards_right_up: f32,
    pub towards_right_down: f32,
    pub towards_left_up: f32,
    pub towards_left_down: f32,
}

impl FacialPose {
    /// All channels at zero
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build a pose from sparse overrides on top of the neutral pose
    pub fn from_overrides(overrides: &[(Channel, ChannelValue)]) -> Self {
        let mut pose = Self::neutral();
        pose.apply(overrides);
        pose
    }

    /// Read one channel
    pub fn get(&self, channel: Channel) -> ChannelValue {
        match channel {
            Channel::Jaw => self.jaw.into(),
            Channel::TeethUpper => self.teeth_upper.into(),
            Channel::TeethLower => self.teeth_lower.into(),
            Channel::Tongue => self.tongue.into(),
            _ => self.scalar(channel).copied().unwrap_or(0.0).into(),
        }
    }

    /// Write one channel. A value of the wrong shape is ignored.
    pub fn set(&mut self, channel: Channel, value: ChannelValue) {
        match (channel, value) {
            (Channel::Jaw, ChannelValue::Vector3(v)) => {
                self.jaw = v;
                self.jaw.x = 0.0;
            }
            (Channel::TeethUpper, ChannelValue::Vector3(v)) => self.teeth_upper = v,
            (Channel::TeethLower, ChannelValue::Vector3(v)) => self.teeth_lower = v,
            (Channel::Tongue, ChannelValue::Vector3(v)) => self.tongue = v,
            (_, ChannelValue::Scalar(v)) => {
                if let Some(slot) = self.scalar_mut(channel) {
                    *slot = v;
                }
            }
            _ => {}
        }
    }

    fn scalar(&self, channel: Channel) -> Option<&f32> {
        Some(match channel {
            Channel::FunnelRightUp => &self.funnel_right_up,
            Channel::FunnelRightDown => &self.funnel_right_down,
            Channel::FunnelLeftUp => &self.funnel_left_up,
            Channel::FunnelLeftDown => &self.funnel_left_down,
            Channel::PurseRightUp => &self.purse_right_up,
            Channel::PurseRightDown => &self.purse_right_down,
            Channel::PurseLeftUp => &self.purse_left_up,
            Channel::PurseLeftDown => &self.purse_left_down,
            Channel::CornerPullRight => &self.corner_pull_right,
            Channel::CornerPullLeft => &self.corner_pull_left,
            Channel::TongueInOut => &self.tongue_in_out,
            Channel::PressRightUp => &self.press_right_up,
            Channel::PressRightDown => &self.press_right_down,
            Channel::PressLeftUp => &self.press_left_up,
            Channel::PressLeftDown => &self.press_left_down,
            Channel::TowardsRightUp => &self.towards_right_up,
            Channel::TowardsRightDown => &self.towards_right_down,
            Channel::TowardsLeftUp => &self.towards_left_up,
            Channel::TowardsLeftDown => &self.towards_left_down,
            Channel::Jaw | Channel::TeethUpper | Channel::TeethLower | Channel::Tongue => {
                return None
            }
        })
    }

    fn scalar_mut(&mut self, channel: Channel) -> Option<&mut f32> {
        Some(match channel {
            Channel::FunnelRightUp => &mut self.funnel_right_up,
            Channel::FunnelRightDown => &mut self.funnel_right_down,
            Channel::FunnelLeftUp => &mut self.funnel_left_up,
            Channel::FunnelLeftDown => &mut self.funnel_left_down,
            Channel::PurseRightUp => &mut self.purse_right_up,
            Channel::PurseRightDown => &mut self.purse_right_down,
            Channel::PurseLeftUp => &mut self.purse_left_up,
            Channel::PurseLeftDown => &mut self.purse_left_down,
            Channel::CornerPullRight => &mut self.corner_pull_right,
            Channel::CornerPullLeft => &mut self.corner_pull_left,
            Channel::TongueInOut => &mut self.tongue_in_out,
            Channel::PressRightUp => &mut self.press_right_up,
            Channel::PressRightDown => &mut self.press_right_down,
            Channel::PressLeftUp => &mut self.press_left_up,
            Channel::PressLeftDown => &mut self.press_left_down,
            Channel::TowardsRightUp => &mut self.towards_right_up,
            Channel::TowardsRightDown => &mut self.towards_right_down,
            Channel::TowardsLeftUp => &mut self.towards_left_up,
            Channel::TowardsLeftDown => &mut self.towards_left_down,
            Channel::Jaw | Channel::TeethUpper | Channel::TeethLower | Channel::Tongue => {
                return None
            }
        })
    }

    /// Overwrite every listed channel unconditionally
    pub fn apply(&mut self, overrides: &[(Channel, ChannelValue)]) {
        for (channel, value) in overrides {
            self.set(*channel, *value);
        }
    }

    /// Overwrite only the listed channels whose value is non-zero
    pub fn apply_nonzero(&mut self, overrides: &[(Channel, ChannelValue)]) {
        for (channel, value) in overrides {
            if value.is_nonzero() {
                self.set(*channel, *value);
            }
        }
    }

    /// Apply a function to every numeric leaf
    pub fn map(&self, f: impl Fn(f32) -> f32) -> FacialPose {
        let mut out = *self;
        for channel in Channel::ALL {
            out.set(channel, self.get(channel).map(&f));
        }
        out
    }

    /// Combine leafwise with another pose
    pub fn zip(&self, other: &FacialPose, f: impl Fn(f32, f32) -> f32) -> FacialPose {
        let mut out = *self;
        for channel in Channel::ALL {
            out.set(channel, self.get(channel).zip(&other.get(channel), &f));
        }
        out
    }

    /// Weighted blend: `self * (1 - weight) + other * weight`
    pub fn blend(&self, other: &FacialPose, weight: f32) -> FacialPose {
        let inv = 1.0 - weight;
        self.zip(other, |a, b| a * inv + b * weight)
    }

    /// Interpolate between two poses, `t` clamped to [0, 1]
    pub fn lerp(&self, other: &FacialPose, t: f32) -> FacialPose {
        self.blend(other, t.clamp(0.0, 1.0))
    }

    /// Reduce jaw opening and tongue protrusion for a more natural motion
    pub fn damped(&self, jaw_factor: f32, tongue_factor: f32) -> FacialPose {
        let mut out = *self;
        out.jaw.y *= jaw_factor;
        out.jaw.x = 0.0;
        out.tongue_in_out *= tongue_factor;
        out
    }

    /// Round every channel to a fixed number of decimals
    pub fn rounded(&self, decimals: u32) -> FacialPose {
        self.map(|v| round_value(v, decimals))
    }

    /// Force the jaw's lateral component back to zero
    pub fn pin_jaw(&mut self) {
        self.jaw.x = 0.0;
    }

    /// Does moving from `self` to `other` change jaw opening or lip rounding
    /// by more than `threshold`?
    pub fn differs_noticeably(&self, other: &FacialPose, threshold: f32) -> bool {
        if (self.jaw.y - other.jaw.y).abs() > threshold {
            return true;
        }
        Channel::LIP_SHAPE
            .iter()
            .any(|c| self.get(*c).max_abs_diff(&other.get(*c)) > threshold)
    }

    /// Largest leaf difference across all channels
    pub fn max_abs_diff(&self, other: &FacialPose) -> f32 {
        Channel::ALL
            .iter()
            .map(|c| self.get(*c).max_abs_diff(&other.get(*c)))
            .fold(0.0, f32::max)
    }
}
