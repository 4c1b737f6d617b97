//! Nominal timing layout and rescale
//!
//! Phonemes are laid out end to end from zero using nominal per-class
//! durations, then every start and duration is scaled so the sequence
//! ends exactly at the measured audio duration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use lipsync_phoneme::PhonemeClass;

/// Nominal duration per phoneme class, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalDurations {
    pub vowel: f64,
    pub stressed_vowel: f64,
    pub long_vowel: f64,
    pub diphthong: f64,
    pub stop: f64,
    pub fricative: f64,
    pub nasal: f64,
    pub liquid: f64,
    pub glide: f64,
    pub compound: f64,
    pub word_shape: f64,
    /// Anything that matched no class
    pub default: f64,
}

impl Default for NominalDurations {
    fn default() -> Self {
        Self {
            vowel: 0.12,
            stressed_vowel: 0.15,
            long_vowel: 0.17,
            diphthong: 0.19,
            stop: 0.07,
            fricative: 0.10,
            nasal: 0.09,
            liquid: 0.08,
            glide: 0.07,
            compound: 0.13,
            word_shape: 0.22,
            default: 0.09,
        }
    }
}

impl NominalDurations {
    /// Nominal duration of a class
    pub fn for_class(&self, class: PhonemeClass) -> f64 {
        match class {
            PhonemeClass::WordShape => self.word_shape,
            PhonemeClass::Compound => self.compound,
            PhonemeClass::Diphthong => self.diphthong,
            PhonemeClass::LongVowel => self.long_vowel,
            PhonemeClass::StressedVowel => self.stressed_vowel,
            PhonemeClass::Vowel => self.vowel,
            PhonemeClass::Stop => self.stop,
            PhonemeClass::Fricative => self.fricative,
            PhonemeClass::Nasal => self.nasal,
            PhonemeClass::Liquid => self.liquid,
            PhonemeClass::Glide => self.glide,
            PhonemeClass::Other => self.default,
        }
    }

    /// Nominal duration of a canonical token
    pub fn for_token(&self, token: &str) -> f64 {
        self.for_class(PhonemeClass::classify(token))
    }
}

/// One phoneme placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeTiming {
    pub phoneme: String,
    /// Start time (seconds)
    pub start: f64,
    /// Duration (seconds)
    pub duration: f64,
}

impl PhonemeTiming {
    pub fn new(phoneme: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            phoneme: phoneme.into(),
            start,
            duration,
        }
    }

    /// End time (seconds)
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Lays phonemes out on the timeline
#[derive(Debug, Clone, Default)]
pub struct TimingEstimator {
    durations: NominalDurations,
}

impl TimingEstimator {
    pub fn new(durations: NominalDurations) -> Self {
        Self { durations }
    }

    pub fn durations(&self) -> &NominalDurations {
        &self.durations
    }

    /// Consecutive layout from zero using nominal durations
    pub fn layout<S: AsRef<str>>(&self, phonemes: &[S]) -> Vec<PhonemeTiming> {
        let mut cursor = 0.0;
        phonemes
            .iter()
            .map(|p| {
                let token = p.as_ref();
                let duration = self.durations.for_token(token);
                let timing = PhonemeTiming::new(token, cursor, duration);
                cursor += duration;
                timing
            })
            .collect()
    }

    /// End of the last phoneme, 0 for an empty layout
    pub fn estimated_total(timings: &[PhonemeTiming]) -> f64 {
        timings.last().map(PhonemeTiming::end).unwrap_or(0.0)
    }

    /// Scale all starts and durations so the layout ends at `target`.
    ///
    /// Returns the factor used. A zero-length layout is left as is.
    pub fn rescale(timings: &mut [PhonemeTiming], target: f64) -> f64 {
        let estimated = Self::estimated_total(timings);
        let scale = if estimated > 0.0 {
            target / estimated
        } else {
            1.0
        };

        for timing in timings.iter_mut() {
            timing.start *= scale;
            timing.duration *= scale;
        }

        debug!(estimated, target, scale, count = timings.len(), "rescaled phoneme timing");
        scale
    }

    /// Layout then rescale to `total` seconds
    pub fn estimate<S: AsRef<str>>(&self, phonemes: &[S], total: f64) -> Vec<PhonemeTiming> {
        let mut timings = self.layout(phonemes);
        Self::rescale(&mut timings, total);
        timings
    }
}
