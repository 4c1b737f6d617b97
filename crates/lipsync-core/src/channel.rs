//! Facial channel schema
//!
//! Every facial pose carries the same fixed set of channels. A channel is
//! either a scalar (lip shape weights, tongue protrusion) or a 3-component
//! vector (jaw, teeth, tongue offsets). `ChannelValue` is the tagged union
//! used wherever channels are handled generically.

use crate::Vec3;

/// Facial channel identifier, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Jaw,
    FunnelRightUp,
    FunnelRightDown,
    FunnelLeftUp,
    FunnelLeftDown,
    PurseRightUp,
    PurseRightDown,
    PurseLeftUp,
    PurseLeftDown,
    CornerPullRight,
    CornerPullLeft,
    TeethUpper,
    TeethLower,
    Tongue,
    TongueInOut,
    PressRightUp,
    PressRightDown,
    PressLeftUp,
    PressLeftDown,
    TowardsRightUp,
    TowardsRightDown,
    TowardsLeftUp,
    TowardsLeftDown,
}

impl Channel {
    /// All channels in schema order
    pub const ALL: [Channel; 23] = [
        Channel::Jaw,
        Channel::FunnelRightUp,
        Channel::FunnelRightDown,
        Channel::FunnelLeftUp,
        Channel::FunnelLeftDown,
        Channel::PurseRightUp,
        Channel::PurseRightDown,
        Channel::PurseLeftUp,
        Channel::PurseLeftDown,
        Channel::CornerPullRight,
        Channel::CornerPullLeft,
        Channel::TeethUpper,
        Channel::TeethLower,
        Channel::Tongue,
        Channel::TongueInOut,
        Channel::PressRightUp,
        Channel::PressRightDown,
        Channel::PressLeftUp,
        Channel::PressLeftDown,
        Channel::TowardsRightUp,
        Channel::TowardsRightDown,
        Channel::TowardsLeftUp,
        Channel::TowardsLeftDown,
    ];

    /// Lip rounding channels used for coarticulation decisions
    pub const LIP_SHAPE: [Channel; 8] = [
        Channel::FunnelRightUp,
        Channel::FunnelRightDown,
        Channel::FunnelLeftUp,
        Channel::FunnelLeftDown,
        Channel::PurseRightUp,
        Channel::PurseRightDown,
        Channel::PurseLeftUp,
        Channel::PurseLeftDown,
    ];

    /// Number of channels
    pub fn count() -> usize {
        Self::ALL.len()
    }

    /// Is this a 3-component channel?
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            Channel::Jaw | Channel::TeethUpper | Channel::TeethLower | Channel::Tongue
        )
    }

    /// Field name used by the rig on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            Channel::Jaw => "jawValue",
            Channel::FunnelRightUp => "funnelRightUp",
            Channel::FunnelRightDown => "funnelRightDown",
            Channel::FunnelLeftUp => "funnelLeftUp",
            Channel::FunnelLeftDown => "funnelLeftDown",
            Channel::PurseRightUp => "purseRightUp",
            Channel::PurseRightDown => "purseRightDown",
            Channel::PurseLeftUp => "purseLeftUp",
            Channel::PurseLeftDown => "purseLeftDown",
            Channel::CornerPullRight => "cornerPullRight",
            Channel::CornerPullLeft => "cornerPullLeft",
            Channel::TeethUpper => "teethUpperValue",
            Channel::TeethLower => "teethLowerValue",
            Channel::Tongue => "tongueValue",
            Channel::TongueInOut => "tongueInOut",
            Channel::PressRightUp => "pressRightUp",
            Channel::PressRightDown => "pressRightDown",
            Channel::PressLeftUp => "pressLeftUp",
            Channel::PressLeftDown => "pressLeftDown",
            Channel::TowardsRightUp => "towardsRightUp",
            Channel::TowardsRightDown => "towardsRightDown",
            Channel::TowardsLeftUp => "towardsLeftUp",
            Channel::TowardsLeftDown => "towardsLeftDown",
        }
    }

    /// Look up a channel by its wire name
    pub fn from_wire_name(name: &str) -> Option<Channel> {
        Self::ALL.iter().copied().find(|c| c.wire_name() == name)
    }
}

/// Value carried by one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelValue {
    Scalar(f32),
    Vector3(Vec3),
}

impl ChannelValue {
    /// Zero value of the right shape for `channel`
    pub fn zero_for(channel: Channel) -> ChannelValue {
        if channel.is_vector() {
            ChannelValue::Vector3(Vec3::zero())
        } else {
            ChannelValue::Scalar(0.0)
        }
    }

    /// Merge rule: a vector counts when the sum of its absolute components
    /// is positive, a scalar when it is not exactly zero.
    pub fn is_nonzero(&self) -> bool {
        match self {
            ChannelValue::Scalar(v) => *v != 0.0,
            ChannelValue::Vector3(v) => v.is_nonzero(),
        }
    }

    /// Apply a function to every numeric leaf
    pub fn map(&self, f: impl Fn(f32) -> f32) -> ChannelValue {
        match self {
            ChannelValue::Scalar(v) => ChannelValue::Scalar(f(*v)),
            ChannelValue::Vector3(v) => ChannelValue::Vector3(v.map(f)),
        }
    }

    /// Combine leafwise with a value of the same shape.
    /// Shapes never differ for the same channel; if they do, `self` wins.
    pub fn zip(&self, other: &ChannelValue, f: impl Fn(f32, f32) -> f32) -> ChannelValue {
        match (self, other) {
            (ChannelValue::Scalar(a), ChannelValue::Scalar(b)) => ChannelValue::Scalar(f(*a, *b)),
            (ChannelValue::Vector3(a), ChannelValue::Vector3(b)) => {
                ChannelValue::Vector3(a.zip(b, f))
            }
            _ => *self,
        }
    }

    /// Largest absolute leaf difference to another value
    pub fn max_abs_diff(&self, other: &ChannelValue) -> f32 {
        match self.zip(other, |a, b| (a - b).abs()) {
            ChannelValue::Scalar(d) => d,
            ChannelValue::Vector3(d) => d.x.max(d.y).max(d.z),
        }
    }
}

impl From<f32> for ChannelValue {
    fn from(v: f32) -> Self {
        ChannelValue::Scalar(v)
    }
}

impl From<Vec3> for ChannelValue {
    fn from(v: Vec3) -> Self {
        ChannelValue::Vector3(v)
    }
}
