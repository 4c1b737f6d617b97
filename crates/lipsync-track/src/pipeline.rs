//! Generation pipeline
//!
//! `LipsyncEngine` owns the table and every stage's configuration. It is
//! built once and shared by reference; each request is validated up front
//! and then runs without touching shared state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lipsync_core::{validate_duration, LipsyncResult};
use lipsync_phoneme::{FacialTargetTable, PhonemeNormalizer};
use lipsync_timing::{
    syllable_spans, validate_word_spans, NominalDurations, PronunciationSource, TimingEstimator,
    WordSpan,
};

use crate::{
    JawTrack, KeyframeSynthesizer, KeyframeTrack, SmoothingConfig, SynthesisConfig, TrackSmoother,
};

/// Configuration for every stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub timing: NominalDurations,
    pub synthesis: SynthesisConfig,
    pub smoothing: SmoothingConfig,
}

/// One utterance to animate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceRequest {
    /// Raw phoneme symbols, one per phoneme
    #[serde(default)]
    pub phonemes: Vec<String>,
    /// Audio duration (seconds)
    pub duration: f64,
    /// Word timestamps, when the transcriber provides them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<WordSpan>,
}

impl UtteranceRequest {
    pub fn new<S: Into<String>>(phonemes: impl IntoIterator<Item = S>, duration: f64) -> Self {
        Self {
            phonemes: phonemes.into_iter().map(Into::into).collect(),
            duration,
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<WordSpan>) -> Self {
        self.words = words;
        self
    }
}

/// Lip-sync generator
#[derive(Debug, Clone)]
pub struct LipsyncEngine {
    table: FacialTargetTable,
    config: PipelineConfig,
    estimator: TimingEstimator,
    synthesizer: KeyframeSynthesizer,
    smoother: TrackSmoother,
}

impl Default for LipsyncEngine {
    fn default() -> Self {
        Self::new(FacialTargetTable::standard(), PipelineConfig::default())
    }
}

impl LipsyncEngine {
    pub fn new(table: FacialTargetTable, config: PipelineConfig) -> Self {
        Self {
            estimator: TimingEstimator::new(config.timing),
            synthesizer: KeyframeSynthesizer::new(config.synthesis.clone()),
            smoother: TrackSmoother::new(config.smoothing),
            table,
            config,
        }
    }

    pub fn table(&self) -> &FacialTargetTable {
        &self.table
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check everything a request depends on; returns the duration
    fn validate(&self, request: &UtteranceRequest) -> LipsyncResult<f64> {
        let total = validate_duration(request.duration)?;
        validate_word_spans(&request.words)?;
        self.config.smoothing.validate()?;
        Ok(total)
    }

    fn finish(&self, track: KeyframeTrack) -> KeyframeTrack {
        if self.config.smoothing.enabled {
            self.smoother.smooth(&track)
        } else {
            track
        }
    }

    /// Track from phonemes laid out over the whole duration
    pub fn generate(&self, request: &UtteranceRequest) -> LipsyncResult<KeyframeTrack> {
        let total = self.validate(request)?;

        if request.phonemes.is_empty() {
            debug!(duration = total, "no phonemes, rest-only track");
            return Ok(self.synthesizer.rest_track(&self.table, total));
        }

        let tokens = PhonemeNormalizer::new(&self.table).simplify_all(&request.phonemes);
        let timings = self.estimator.estimate(&tokens, total);
        let track = self.finish(self.synthesizer.synthesize(&self.table, &timings, total));

        info!(
            phonemes = tokens.len(),
            keyframes = track.len(),
            duration = total,
            "generated lip-sync track"
        );
        Ok(track)
    }

    /// Track from word timestamps, split into syllables.
    ///
    /// Falls back to [`generate`](Self::generate) when the request carries
    /// no words.
    pub fn generate_from_words(
        &self,
        request: &UtteranceRequest,
        pronunciations: &dyn PronunciationSource,
        jaw: Option<&JawTrack>,
    ) -> LipsyncResult<KeyframeTrack> {
        let total = self.validate(request)?;

        if request.words.is_empty() {
            debug!("no word timestamps, using phoneme timing");
            return self.generate(request);
        }

        let spans = syllable_spans(&request.words, pronunciations);
        let raw = self
            .synthesizer
            .synthesize_syllables(&self.table, &spans, jaw, total);
        let track = self.finish(raw);

        info!(
            words = request.words.len(),
            syllables = spans.len(),
            keyframes = track.len(),
            duration = total,
            "generated lip-sync track from words"
        );
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipsync_core::{Channel, LipsyncError};
    use lipsync_timing::{NoPronunciations, PronunciationDictionary};

    use crate::KeyframeKind;

    fn unsmoothed() -> LipsyncEngine {
        LipsyncEngine::new(
            FacialTargetTable::standard(),
            PipelineConfig {
                smoothing: SmoothingConfig::disabled(),
                ..PipelineConfig::default()
            },
        )
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LipsyncEngine>();
    }

    #[test]
    fn test_generate_hello() {
        let engine = unsmoothed();
        let track = engine
            .generate(&UtteranceRequest::new(["h", "ɛ", "l", "oʊ"], 1.0))
            .unwrap();

        assert_eq!(track.first().unwrap().time, 0.0);
        assert_eq!(track.last().unwrap().time, 1.0);
        assert!(track.count_kind(KeyframeKind::Peak) >= 4);
        assert!(track.is_strictly_ordered());
    }

    #[test]
    fn test_generate_smoothed_keeps_brackets() {
        let engine = LipsyncEngine::default();
        let track = engine
            .generate(&UtteranceRequest::new(["h", "ɛ", "l", "oʊ"], 1.0))
            .unwrap();
        let rest = engine.table().rest_pose();

        assert_eq!(track.first().unwrap().pose, rest);
        assert_eq!(track.last().unwrap().pose, rest);
        assert_eq!(track.last().unwrap().time, 1.0);
        assert!(track.count_kind(KeyframeKind::Intermediate) > 0);
        assert!(track.is_strictly_ordered());
    }

    #[test]
    fn test_empty_sequence_two_rests() {
        let engine = LipsyncEngine::default();
        let empty: [&str; 0] = [];
        let track = engine.generate(&UtteranceRequest::new(empty, 2.0)).unwrap();

        assert_eq!(track.times(), vec![0.0, 2.0]);
        assert!(track.keyframes.iter().all(|k| k.pose == engine.table().rest_pose()));
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let engine = LipsyncEngine::default();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 0.0004, 1e306] {
            let result = engine.generate(&UtteranceRequest::new(["a"], bad));
            assert!(matches!(result, Err(LipsyncError::InvalidDuration(_))));
        }

        // Shortest accepted duration still brackets with two rest frames
        let empty: [&str; 0] = [];
        let track = engine.generate(&UtteranceRequest::new(empty, 0.0005)).unwrap();
        assert_eq!(track.times(), vec![0.0, 0.001]);
    }

    #[test]
    fn test_invalid_word_span_rejected() {
        let engine = LipsyncEngine::default();
        let request = UtteranceRequest::new(["a"], 1.0)
            .with_words(vec![WordSpan::new("oops", 0.8, 0.2)]);

        assert!(matches!(
            engine.generate(&request),
            Err(LipsyncError::InvalidWordSpan { .. })
        ));
        assert!(matches!(
            engine.generate_from_words(&request, &NoPronunciations, None),
            Err(LipsyncError::InvalidWordSpan { .. })
        ));
    }

    #[test]
    fn test_invalid_smoothing_rejected() {
        let engine = LipsyncEngine::new(
            FacialTargetTable::standard(),
            PipelineConfig {
                smoothing: SmoothingConfig {
                    sigma: -1.0,
                    ..SmoothingConfig::default()
                },
                ..PipelineConfig::default()
            },
        );
        assert!(matches!(
            engine.generate(&UtteranceRequest::new(["a"], 1.0)),
            Err(LipsyncError::InvalidSmoothing(_))
        ));
    }

    #[test]
    fn test_unknown_phoneme_full_pose() {
        let engine = LipsyncEngine::default();
        let track = engine
            .generate(&UtteranceRequest::new(["x", "?", "ʔ"], 0.5))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&track.to_json().unwrap()).unwrap();

        for frame in json["keyframes"].as_array().unwrap() {
            for channel in Channel::ALL {
                assert!(frame.get(channel.wire_name()).is_some());
            }
        }
    }

    #[test]
    fn test_generate_from_words() {
        let engine = unsmoothed();
        let mut dict = PronunciationDictionary::new();
        dict.insert("hello", vec![vec!["h", "ə"], vec!["l", "oʊ"]]);

        let request = UtteranceRequest::new(Vec::<String>::new(), 1.0).with_words(vec![
            WordSpan::new("hello", 0.1, 0.5),
            WordSpan::new("world", 0.5, 0.9),
        ]);
        let track = engine.generate_from_words(&request, &dict, None).unwrap();

        assert_eq!(track.first().unwrap().time, 0.0);
        assert_eq!(track.last().unwrap().time, 1.0);
        // hello: 2 + 2 sub-keyframes, world: 1 syllable of 5 letters
        assert_eq!(track.count_kind(KeyframeKind::Syllable), 9);
        assert_eq!(track.count_kind(KeyframeKind::Transition), 3);
        assert!(track
            .keyframes
            .iter()
            .filter(|k| k.kind == KeyframeKind::Syllable)
            .all(|k| k.label.is_some()));
    }

    #[test]
    fn test_generate_from_words_without_words() {
        let engine = unsmoothed();
        let request = UtteranceRequest::new(["a", "b"], 0.4);

        let from_words = engine.generate_from_words(&request, &NoPronunciations, None).unwrap();
        assert_eq!(from_words, engine.generate(&request).unwrap());
    }

    #[test]
    fn test_request_deserialize() {
        let request: UtteranceRequest = serde_json::from_str(
            r#"{"phonemes": ["h", "ɛ"], "duration": 0.5,
                "words": [{"word": "heh", "start": 0.0, "end": 0.5}]}"#,
        )
        .unwrap();
        assert_eq!(request.phonemes.len(), 2);
        assert_eq!(request.words[0].word, "heh");

        let bare: UtteranceRequest = serde_json::from_str(r#"{"duration": 1.0}"#).unwrap();
        assert!(bare.phonemes.is_empty());
        assert!(bare.words.is_empty());
    }
}
