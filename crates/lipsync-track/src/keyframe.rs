//! Keyframes and keyframe tracks
//!
//! A keyframe is a complete facial pose at an absolute time. The track is
//! what the rig consumes: time-ordered, unique times, bracketed by the rest
//! pose. On the wire every keyframe carries `time` plus every pose channel.

use serde::{Deserialize, Serialize};

use lipsync_core::{round_time, FacialPose, LipsyncError, LipsyncResult};

/// Why a keyframe exists. In memory only; not serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyframeKind {
    /// Neutral boundary
    Rest,
    /// Slightly ahead of a phoneme, mostly the previous shape
    Anticipation,
    /// Main shape of a phoneme
    #[default]
    Peak,
    /// Shape held through a long phoneme
    Sustain,
    /// Halfway toward the next phoneme
    Transition,
    /// Inserted by smoothing
    Intermediate,
    /// Sub-keyframe within a syllable
    Syllable,
}

/// Debug label for keyframes built from word timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyframeLabel {
    pub word: String,
    pub syllable: usize,
}

/// Pose at an absolute time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time (seconds)
    pub time: f64,

    #[serde(skip)]
    pub kind: KeyframeKind,

    #[serde(flatten)]
    pub pose: FacialPose,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<KeyframeLabel>,
}

impl Keyframe {
    pub fn new(time: f64, kind: KeyframeKind, pose: FacialPose) -> Self {
        Self {
            time,
            kind,
            pose,
            label: None,
        }
    }

    /// Neutral boundary keyframe
    pub fn rest(time: f64, pose: FacialPose) -> Self {
        Self::new(time, KeyframeKind::Rest, pose)
    }

    pub fn with_label(mut self, word: impl Into<String>, syllable: usize) -> Self {
        self.label = Some(KeyframeLabel {
            word: word.into(),
            syllable,
        });
        self
    }

    /// Round time and channels, keep the jaw pinned
    pub fn round(&mut self, time_decimals: u32, value_decimals: u32) {
        self.time = round_time(self.time, time_decimals);
        self.pose = self.pose.rounded(value_decimals);
        self.pose.pin_jaw();
    }
}

/// Ordered sequence of keyframes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    pub keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self { keyframes }
    }

    pub fn push(&mut self, keyframe: Keyframe) {
        self.keyframes.push(keyframe);
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    /// Time of the last keyframe
    pub fn duration(&self) -> f64 {
        self.last().map(|k| k.time).unwrap_or(0.0)
    }

    pub fn times(&self) -> Vec<f64> {
        self.keyframes.iter().map(|k| k.time).collect()
    }

    pub fn count_kind(&self, kind: KeyframeKind) -> usize {
        self.keyframes.iter().filter(|k| k.kind == kind).count()
    }

    /// Round every leaf, stable-sort by time and drop later keyframes
    /// whose rounded time collides with an earlier one.
    pub fn clean(&mut self, time_decimals: u32, value_decimals: u32) {
        for keyframe in &mut self.keyframes {
            keyframe.round(time_decimals, value_decimals);
        }
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.keyframes.dedup_by(|later, earlier| later.time == earlier.time);
    }

    /// Strictly increasing times?
    pub fn is_strictly_ordered(&self) -> bool {
        self.keyframes.windows(2).all(|w| w[0].time < w[1].time)
    }

    pub fn to_json(&self) -> LipsyncResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LipsyncError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> LipsyncResult<Self> {
        serde_json::from_str(json).map_err(|e| LipsyncError::Serialization(e.to_string()))
    }
}
