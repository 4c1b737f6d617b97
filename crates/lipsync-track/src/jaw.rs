//! Amplitude-derived jaw track
//!
//! Jaw opening measured from the audio envelope, computed outside this
//! crate. The syllable synthesizer looks up the sample nearest in time.

use serde::{Deserialize, Serialize};

/// Jaw opening at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JawSample {
    pub time: f64,
    pub value: f32,
}

/// Time-sorted jaw samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<JawSample>", into = "Vec<JawSample>")]
pub struct JawTrack {
    samples: Vec<JawSample>,
}

impl JawTrack {
    /// Build from samples in any order; non-finite times are dropped
    pub fn new(mut samples: Vec<JawSample>) -> Self {
        samples.retain(|s| s.time.is_finite());
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { samples }
    }

    pub fn samples(&self) -> &[JawSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of the sample closest to `time`; ties go to the earlier sample
    pub fn nearest(&self, time: f64) -> Option<f32> {
        let idx = self.samples.partition_point(|s| s.time < time);
        let after = self.samples.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.samples.get(i));

        match (before, after) {
            (Some(b), Some(a)) => {
                if time - b.time <= a.time - time {
                    Some(b.value)
                } else {
                    Some(a.value)
                }
            }
            (Some(b), None) => Some(b.value),
            (None, Some(a)) => Some(a.value),
            (None, None) => None,
        }
    }
}

impl From<Vec<JawSample>> for JawTrack {
    fn from(samples: Vec<JawSample>) -> Self {
        Self::new(samples)
    }
}

impl From<JawTrack> for Vec<JawSample> {
    fn from(track: JawTrack) -> Self {
        track.samples
    }
}
