//! Keyframe Synthesizer - timed phonemes to raw keyframes
//!
//! Each phoneme contributes a peak keyframe, a sustain keyframe when it is
//! long, and anticipation/transition keyframes around noticeable shape
//! changes. Every pose is damped before it is compared or blended. The
//! result is bracketed by the rest pose at 0 and at the total duration.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use lipsync_core::{round_time, FacialPose, TIME_DECIMALS, VALUE_DECIMALS};
use lipsync_phoneme::{FacialTargetTable, PhonemeNormalizer};
use lipsync_timing::{PhonemeTiming, SyllableSpan};

use crate::{JawTrack, Keyframe, KeyframeKind, KeyframeTrack};

/// Synthesis constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Jaw opening multiplier applied to every phoneme pose
    pub jaw_damping: f32,
    /// Tongue protrusion multiplier applied to every phoneme pose
    pub tongue_damping: f32,
    /// Jaw or lip-shape change that counts as noticeable
    pub change_threshold: f32,
    /// Anticipation lead before the phoneme start (seconds)
    pub anticipation_lead: f64,
    /// Share of the upcoming pose in an anticipation keyframe
    pub anticipation_weight: f32,
    /// Peak position as a fraction of the phoneme
    pub peak_offset: f64,
    /// Phonemes longer than this get a sustain keyframe (seconds)
    pub sustain_min_duration: f64,
    pub sustain_offset: f64,
    pub transition_offset: f64,
    /// Share of the next pose in a transition keyframe
    pub transition_weight: f32,
    /// Sub-keyframe position for a one-phoneme syllable
    pub syllable_single_offset: f64,
    /// Sub-keyframe positions for a two-phoneme syllable
    pub syllable_pair_offsets: [f64; 2],
    /// Range over which longer syllables spread their sub-keyframes
    pub syllable_spread: (f64, f64),
    /// Syllable transition position as a fraction of the syllable
    pub syllable_transition_offset: f64,
    /// Multiplier applied to the syllable transition pose
    pub syllable_transition_damping: f32,
    pub time_decimals: u32,
    pub value_decimals: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            jaw_damping: 0.7,
            tongue_damping: 0.4,
            change_threshold: 0.2,
            anticipation_lead: 0.015,
            anticipation_weight: 0.1,
            peak_offset: 0.2,
            sustain_min_duration: 0.15,
            sustain_offset: 0.4,
            transition_offset: 0.7,
            transition_weight: 0.5,
            syllable_single_offset: 0.4,
            syllable_pair_offsets: [0.3, 0.7],
            syllable_spread: (0.2, 0.8),
            syllable_transition_offset: 0.9,
            syllable_transition_damping: 0.7,
            time_decimals: TIME_DECIMALS,
            value_decimals: VALUE_DECIMALS,
        }
    }
}

impl SynthesisConfig {
    /// Fractional positions of the sub-keyframes within a syllable
    pub fn syllable_offsets(&self, phonemes: usize) -> Vec<f64> {
        match phonemes {
            0 => Vec::new(),
            1 => vec![self.syllable_single_offset],
            2 => self.syllable_pair_offsets.to_vec(),
            n => {
                let (lo, hi) = self.syllable_spread;
                let step = (hi - lo) / (n - 1) as f64;
                (0..n).map(|k| lo + step * k as f64).collect()
            }
        }
    }
}

/// Builds keyframe tracks from timed phonemes or syllables
#[derive(Debug, Clone, Default)]
pub struct KeyframeSynthesizer {
    config: SynthesisConfig,
}

impl KeyframeSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    fn damp(&self, pose: &FacialPose) -> FacialPose {
        pose.damped(self.config.jaw_damping, self.config.tongue_damping)
    }

    /// Track from phoneme timings rescaled to `total` seconds
    pub fn synthesize(
        &self,
        table: &FacialTargetTable,
        timings: &[PhonemeTiming],
        total: f64,
    ) -> KeyframeTrack {
        let cfg = &self.config;
        let poses: Vec<FacialPose> = timings
            .iter()
            .map(|t| self.damp(&table.get_pose(&t.phoneme)))
            .collect();

        let mut interior = Vec::with_capacity(timings.len() * 4);

        for (i, timing) in timings.iter().enumerate() {
            let current = &poses[i];
            let at = |fraction: f64| timing.start + fraction * timing.duration;

            if let Some(prev) = i.checked_sub(1).map(|p| &poses[p]) {
                if current.differs_noticeably(prev, cfg.change_threshold) {
                    interior.push(Keyframe::new(
                        timing.start - cfg.anticipation_lead,
                        KeyframeKind::Anticipation,
                        prev.blend(current, cfg.anticipation_weight),
                    ));
                }
            }

            interior.push(Keyframe::new(at(cfg.peak_offset), KeyframeKind::Peak, *current));

            if timing.duration > cfg.sustain_min_duration {
                interior.push(Keyframe::new(
                    at(cfg.sustain_offset),
                    KeyframeKind::Sustain,
                    *current,
                ));
            }

            if let Some(next) = poses.get(i + 1) {
                if next.differs_noticeably(current, cfg.change_threshold) {
                    interior.push(Keyframe::new(
                        at(cfg.transition_offset),
                        KeyframeKind::Transition,
                        current.blend(next, cfg.transition_weight),
                    ));
                }
            }
        }

        self.bracket(interior, table.rest_pose(), total)
    }

    /// Track from syllable spans, optionally driving the jaw from audio
    pub fn synthesize_syllables(
        &self,
        table: &FacialTargetTable,
        spans: &[SyllableSpan],
        jaw: Option<&JawTrack>,
        total: f64,
    ) -> KeyframeTrack {
        let cfg = &self.config;
        let normalizer = PhonemeNormalizer::new(table);
        let mut interior = Vec::new();

        for span in spans {
            if span.phonemes.is_empty() {
                trace!(word = %span.word, index = span.index, "syllable without phonemes");
                continue;
            }

            let offsets = cfg.syllable_offsets(span.phonemes.len());
            let mut last = FacialPose::neutral();

            for (raw, offset) in span.phonemes.iter().zip(offsets) {
                let time = span.at(offset);
                let mut pose = self.damp(&table.get_pose(&normalizer.simplify(raw)));
                if let Some(opening) = jaw.and_then(|j| j.nearest(time)) {
                    pose.jaw.y = opening;
                }
                interior.push(
                    Keyframe::new(time, KeyframeKind::Syllable, pose)
                        .with_label(span.word.as_str(), span.index),
                );
                last = pose;
            }

            interior.push(
                Keyframe::new(
                    span.at(cfg.syllable_transition_offset),
                    KeyframeKind::Transition,
                    last.damped(cfg.syllable_transition_damping, 1.0),
                )
                .with_label(span.word.as_str(), span.index),
            );
        }

        self.bracket(interior, table.rest_pose(), total)
    }

    /// Two rest keyframes, at 0 and at `total`
    pub fn rest_track(&self, table: &FacialTargetTable, total: f64) -> KeyframeTrack {
        self.bracket(Vec::new(), table.rest_pose(), total)
    }

    /// Round, drop interior keyframes outside the track, add rest brackets,
    /// sort and de-duplicate.
    fn bracket(&self, interior: Vec<Keyframe>, rest: FacialPose, total: f64) -> KeyframeTrack {
        let (td, vd) = (self.config.time_decimals, self.config.value_decimals);
        let end = round_time(total, td);
        let generated = interior.len();

        let mut keyframes = Vec::with_capacity(generated + 2);
        keyframes.push(Keyframe::rest(0.0, rest));
        keyframes.extend(
            interior
                .into_iter()
                .map(|mut k| {
                    k.round(td, vd);
                    k
                })
                .filter(|k| k.time > 0.0 && k.time < end),
        );
        let kept = keyframes.len() - 1;
        keyframes.push(Keyframe::rest(end, rest));

        if kept < generated {
            trace!(dropped = generated - kept, "keyframes outside the track dropped");
        }

        let mut track = KeyframeTrack::new(keyframes);
        track.clean(td, vd);
        debug!(keyframes = track.len(), duration = end, "synthesized track");
        track
    }
}
