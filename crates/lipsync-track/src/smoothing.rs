//! Track smoothing
//!
//! Two passes, both leaving the synthesized timestamps untouched:
//! - eased intermediate frames between keyframes that are far apart
//! - a Gaussian moving average over each keyframe's index neighbourhood
//!
//! The first and last keyframes are held exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use lipsync_core::{
    round_time, FacialPose, LipsyncError, LipsyncResult, TIME_DECIMALS, VALUE_DECIMALS,
};

use crate::{Easing, Keyframe, KeyframeKind, KeyframeTrack};

/// Widest Gaussian kernel accepted, in keyframes
pub const MAX_WINDOW: usize = 101;

/// Smoothing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Run smoothing at all
    pub enabled: bool,
    /// Frames inserted between two keyframes that are far enough apart
    pub intermediate_frames: usize,
    /// Pairs closer than this are left alone (seconds)
    pub min_gap: f64,
    /// Easing of the inserted frames
    pub easing: Easing,
    /// Gaussian kernel standard deviation, in keyframes
    pub sigma: f32,
    /// Kernel width in keyframes; odd, centred on the smoothed frame
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intermediate_frames: 1,
            min_gap: 0.015,
            easing: Easing::Smoothstep,
            sigma: 1.5,
            window: 5,
        }
    }
}

impl SmoothingConfig {
    /// Smoothing switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LipsyncResult<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(LipsyncError::InvalidSmoothing(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if self.window % 2 == 0 || self.window > MAX_WINDOW {
            return Err(LipsyncError::InvalidSmoothing(format!(
                "window must be odd and at most {MAX_WINDOW}, got {}",
                self.window
            )));
        }
        if !(self.min_gap.is_finite() && self.min_gap >= 0.0) {
            return Err(LipsyncError::InvalidSmoothing(format!(
                "min_gap must be non-negative, got {}",
                self.min_gap
            )));
        }
        Ok(())
    }

    /// Kernel weights for offsets `-half..=half`
    fn kernel(&self) -> Vec<f32> {
        let half = (self.window / 2) as i64;
        let denom = 2.0 * self.sigma * self.sigma;
        (-half..=half)
            .map(|k| (-((k * k) as f32) / denom).exp())
            .collect()
    }
}

/// Applies the smoothing passes to a track
#[derive(Debug, Clone, Default)]
pub struct TrackSmoother {
    config: SmoothingConfig,
}

impl TrackSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Intermediate insertion followed by the Gaussian pass
    pub fn smooth(&self, track: &KeyframeTrack) -> KeyframeTrack {
        let expanded = self.insert_intermediates(track);
        let smoothed = self.gaussian_smooth(&expanded);
        debug!(before = track.len(), after = smoothed.len(), "smoothed track");
        smoothed
    }

    /// Insert eased frames between keyframes more than `min_gap` apart.
    ///
    /// Inserted times are rounded; any that would land on or before the
    /// previous frame, or on the next keyframe, are skipped.
    pub fn insert_intermediates(&self, track: &KeyframeTrack) -> KeyframeTrack {
        let n = self.config.intermediate_frames;
        if n == 0 || track.len() < 2 {
            return track.clone();
        }

        // Gaps are compared on the millisecond grid of the keyframe times
        let min_gap = round_time(self.config.min_gap, TIME_DECIMALS);
        let mut out = Vec::with_capacity(track.len() * (n + 1));
        for pair in track.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            out.push(a.clone());

            let gap = round_time(b.time - a.time, TIME_DECIMALS);
            if gap <= min_gap {
                continue;
            }

            for k in 1..=n {
                let fraction = k as f64 / (n + 1) as f64;
                let time = round_time(a.time + fraction * gap, TIME_DECIMALS);
                let after_prev = out.last().map_or(true, |p: &Keyframe| time > p.time);
                if !after_prev || time >= b.time {
                    continue;
                }

                let eased = self.config.easing.apply(fraction as f32);
                let mut pose = a.pose.lerp(&b.pose, eased).rounded(VALUE_DECIMALS);
                pose.pin_jaw();
                out.push(Keyframe::new(time, KeyframeKind::Intermediate, pose));
            }
        }
        if let Some(last) = track.last() {
            out.push(last.clone());
        }

        KeyframeTrack::new(out)
    }

    /// Gaussian moving average over keyframe indices; endpoints held
    pub fn gaussian_smooth(&self, track: &KeyframeTrack) -> KeyframeTrack {
        let len = track.len();
        if len < 3 {
            return track.clone();
        }

        let kernel = self.config.kernel();
        let half = (kernel.len() / 2) as isize;
        let frames = &track.keyframes;

        let mut out = track.clone();
        for i in 1..len - 1 {
            let mut acc = FacialPose::neutral();
            let mut total = 0.0f32;

            for (offset, weight) in (-half..=half).zip(kernel.iter().copied()) {
                let j = i as isize + offset;
                if j < 0 || j >= len as isize {
                    continue;
                }
                let neighbour = &frames[j as usize].pose;
                acc = acc.zip(neighbour, |sum, v| sum + v * weight);
                total += weight;
            }

            let mut pose = acc.map(|v| v / total).rounded(VALUE_DECIMALS);
            pose.pin_jaw();
            out.keyframes[i].pose = pose;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipsync_core::Vec3;

    fn pose(y: f32) -> FacialPose {
        let mut p = FacialPose::neutral();
        p.jaw = Vec3::vertical(y);
        p.purse_left_up = y;
        p
    }

    fn track() -> KeyframeTrack {
        KeyframeTrack::new(vec![
            Keyframe::rest(0.0, pose(0.1)),
            Keyframe::new(0.1, KeyframeKind::Peak, pose(0.6)),
            Keyframe::new(0.11, KeyframeKind::Transition, pose(0.2)),
            Keyframe::new(0.3, KeyframeKind::Peak, pose(0.8)),
            Keyframe::rest(0.5, pose(0.1)),
        ])
    }

    #[test]
    fn test_validate() {
        assert!(SmoothingConfig::default().validate().is_ok());

        let bad_sigma = SmoothingConfig {
            sigma: 0.0,
            ..SmoothingConfig::default()
        };
        assert!(matches!(bad_sigma.validate(), Err(LipsyncError::InvalidSmoothing(_))));

        let bad_window = SmoothingConfig {
            window: 0,
            ..SmoothingConfig::default()
        };
        assert!(matches!(bad_window.validate(), Err(LipsyncError::InvalidSmoothing(_))));

        for window in [4, MAX_WINDOW + 2, usize::MAX] {
            let config = SmoothingConfig {
                window,
                ..SmoothingConfig::default()
            };
            assert!(config.validate().is_err(), "window {window} accepted");
        }
        let widest = SmoothingConfig {
            window: MAX_WINDOW,
            ..SmoothingConfig::default()
        };
        assert!(widest.validate().is_ok());

        let nan_sigma = SmoothingConfig {
            sigma: f32::NAN,
            ..SmoothingConfig::default()
        };
        assert!(nan_sigma.validate().is_err());
    }

    #[test]
    fn test_kernel_shape() {
        let kernel = SmoothingConfig::default().kernel();
        assert_eq!(kernel.len(), 5);
        assert_eq!(kernel[2], 1.0);
        assert_eq!(kernel[0], kernel[4]);
        assert!(kernel[1] > kernel[0]);
    }

    #[test]
    fn test_intermediates_only_in_wide_gaps() {
        let smoother = TrackSmoother::default();
        let expanded = smoother.insert_intermediates(&track());

        // 0.10 → 0.11 is 10 ms apart and stays untouched
        assert_eq!(
            expanded.times(),
            vec![0.0, 0.05, 0.1, 0.11, 0.205, 0.3, 0.4, 0.5]
        );
        assert_eq!(expanded.count_kind(KeyframeKind::Intermediate), 3);

        // Smoothstep at the midpoint is the plain midpoint
        let mid = &expanded.keyframes[1];
        assert!((mid.pose.jaw.y - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_exact_min_gap_pairs_untouched() {
        let smoother = TrackSmoother::default();
        for (start, end) in [(0.1, 0.115), (0.3, 0.315), (0.585, 0.6), (1.2, 1.215), (0.7, 0.715)] {
            let pair = KeyframeTrack::new(vec![
                Keyframe::rest(start, pose(0.1)),
                Keyframe::rest(end, pose(0.6)),
            ]);
            assert_eq!(smoother.insert_intermediates(&pair).times(), vec![start, end]);
        }

        let wider = KeyframeTrack::new(vec![
            Keyframe::rest(0.3, pose(0.1)),
            Keyframe::rest(0.316, pose(0.6)),
        ]);
        assert_eq!(smoother.insert_intermediates(&wider).len(), 3);
    }

    #[test]
    fn test_multiple_intermediates_eased() {
        let smoother = TrackSmoother::new(SmoothingConfig {
            intermediate_frames: 3,
            ..SmoothingConfig::default()
        });
        let track = KeyframeTrack::new(vec![
            Keyframe::rest(0.0, pose(0.0)),
            Keyframe::rest(1.0, pose(1.0)),
        ]);
        let expanded = smoother.insert_intermediates(&track);

        assert_eq!(expanded.times(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        // smoothstep(0.25) = 0.15625 → rounded 0.16
        assert!((expanded.keyframes[1].pose.jaw.y - 0.16).abs() < 1e-6);
        assert!((expanded.keyframes[3].pose.jaw.y - 0.84).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_holds_endpoints_and_times() {
        let input = track();
        let smoothed = TrackSmoother::default().gaussian_smooth(&input);

        assert_eq!(smoothed.times(), input.times());
        assert_eq!(smoothed.first().unwrap().pose, input.first().unwrap().pose);
        assert_eq!(smoothed.last().unwrap().pose, input.last().unwrap().pose);

        // Peaks are pulled toward their neighbours
        assert!(smoothed.keyframes[1].pose.jaw.y < 0.6);
        assert!(smoothed.keyframes[2].pose.jaw.y > 0.2);
        assert!(smoothed.keyframes.iter().all(|k| k.pose.jaw.x == 0.0));
    }

    #[test]
    fn test_gaussian_constant_track_unchanged() {
        let input = KeyframeTrack::new(
            (0..6)
                .map(|i| Keyframe::new(i as f64 * 0.1, KeyframeKind::Peak, pose(0.4)))
                .collect(),
        );
        let smoothed = TrackSmoother::default().gaussian_smooth(&input);
        for k in &smoothed.keyframes {
            assert!((k.pose.jaw.y - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn test_window_one_is_identity() {
        let smoother = TrackSmoother::new(SmoothingConfig {
            window: 1,
            ..SmoothingConfig::default()
        });
        let input = track();
        assert_eq!(smoother.gaussian_smooth(&input), input);
    }

    #[test]
    fn test_short_tracks_untouched() {
        let two = KeyframeTrack::new(vec![
            Keyframe::rest(0.0, pose(0.1)),
            Keyframe::rest(0.01, pose(0.1)),
        ]);
        assert_eq!(TrackSmoother::default().smooth(&two), two);
    }
}
