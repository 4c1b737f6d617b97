//! Track invariants
//!
//! Every generated track must satisfy these, whatever the input:
//! - first keyframe at 0, last at the rounded duration
//! - strictly increasing times
//! - rest pose at both ends
//! - jaw never moves sideways
//! - times on the millisecond grid, channels on the hundredth grid

use thiserror::Error;

use lipsync_core::{round_time, FacialPose, TIME_DECIMALS, VALUE_DECIMALS};
use lipsync_track::KeyframeTrack;

/// A broken track invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackViolation {
    #[error("track has no keyframes")]
    Empty,

    #[error("first keyframe at {0}, expected 0")]
    FirstNotAtZero(f64),

    #[error("last keyframe at {actual}, expected {expected}")]
    LastNotAtDuration { expected: f64, actual: f64 },

    #[error("keyframe {index} at {time} does not follow {previous}")]
    NotIncreasing { index: usize, previous: f64, time: f64 },

    #[error("keyframe {index} should be the rest pose")]
    BoundaryNotRest { index: usize },

    #[error("keyframe {index} has lateral jaw {x}")]
    JawNotPinned { index: usize, x: f32 },

    #[error("keyframe {index} time {time} is not rounded")]
    TimeNotRounded { index: usize, time: f64 },

    #[error("keyframe {index} has unrounded channel values")]
    ValueNotRounded { index: usize },
}

/// Collect every violation of the track invariants
pub fn check_track(track: &KeyframeTrack, duration: f64, rest: &FacialPose) -> Vec<TrackViolation> {
    let mut violations = Vec::new();

    let (first, last) = match (track.first(), track.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return vec![TrackViolation::Empty],
    };

    if first.time != 0.0 {
        violations.push(TrackViolation::FirstNotAtZero(first.time));
    }
    let expected = round_time(duration, TIME_DECIMALS);
    if last.time != expected {
        violations.push(TrackViolation::LastNotAtDuration {
            expected,
            actual: last.time,
        });
    }
    if first.pose != *rest {
        violations.push(TrackViolation::BoundaryNotRest { index: 0 });
    }
    if last.pose != *rest {
        violations.push(TrackViolation::BoundaryNotRest {
            index: track.len() - 1,
        });
    }

    for (index, pair) in track.keyframes.windows(2).enumerate() {
        if pair[1].time <= pair[0].time {
            violations.push(TrackViolation::NotIncreasing {
                index: index + 1,
                previous: pair[0].time,
                time: pair[1].time,
            });
        }
    }

    for (index, keyframe) in track.keyframes.iter().enumerate() {
        if keyframe.pose.jaw.x != 0.0 {
            violations.push(TrackViolation::JawNotPinned {
                index,
                x: keyframe.pose.jaw.x,
            });
        }
        if round_time(keyframe.time, TIME_DECIMALS) != keyframe.time {
            violations.push(TrackViolation::TimeNotRounded {
                index,
                time: keyframe.time,
            });
        }
        if keyframe.pose.rounded(VALUE_DECIMALS) != keyframe.pose {
            violations.push(TrackViolation::ValueNotRounded { index });
        }
    }

    violations
}

/// Panic with every violation listed
pub fn assert_track_valid(track: &KeyframeTrack, duration: f64, rest: &FacialPose) {
    let violations = check_track(track, duration, rest);
    if !violations.is_empty() {
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("track invariants violated:\n  {}", report.join("\n  "));
    }
}
