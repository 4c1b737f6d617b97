//! Canned inputs

use lipsync_phoneme::FacialTargetTable;
use lipsync_timing::{PronunciationDictionary, WordSpan};
use lipsync_track::{
    JawSample, JawTrack, LipsyncEngine, PipelineConfig, SmoothingConfig, UtteranceRequest,
};

/// "hello" as a phonemizer emits it
pub const HELLO: [&str; 4] = ["h", "ɛ", "l", "oʊ"];

/// "the quick brown fox jumps over the lazy dog"
pub const PANGRAM: [&str; 31] = [
    "ð", "ə", "k", "w", "ˈɪ", "k", "b", "ɹ", "ˈaʊ", "n", "f", "ˈɑː", "k", "s", "dʒ", "ˈʌ",
    "m", "p", "s", "ˈoʊ", "v", "ɚ", "ð", "ə", "l", "ˈeɪ", "z", "i", "d", "ˈɔ", "ɡ",
];

pub fn hello_request(duration: f64) -> UtteranceRequest {
    UtteranceRequest::new(HELLO, duration)
}

pub fn pangram_request(duration: f64) -> UtteranceRequest {
    UtteranceRequest::new(PANGRAM, duration)
}

/// "hello world" with word timestamps over 1.2 s of audio
pub fn hello_world_words() -> UtteranceRequest {
    UtteranceRequest::new(Vec::<String>::new(), 1.2).with_words(vec![
        WordSpan::new("hello", 0.05, 0.55),
        WordSpan::new("world", 0.6, 1.1),
    ])
}

/// Dictionary knowing "hello" only
pub fn hello_dictionary() -> PronunciationDictionary {
    let mut dict = PronunciationDictionary::new();
    dict.insert("hello", vec![vec!["h", "ə"], vec!["l", "ˈoʊ"]]);
    dict
}

/// Jaw opening rising linearly from 0 to `peak` over `duration`
pub fn ramp_jaw(duration: f64, step: f64, peak: f32) -> JawTrack {
    let count = (duration / step).round() as usize;
    let samples = (0..=count)
        .map(|i| {
            let time = i as f64 * step;
            JawSample {
                time,
                value: peak * (time / duration) as f32,
            }
        })
        .collect();
    JawTrack::new(samples)
}

/// Engine with the standard table and smoothing switched off
pub fn unsmoothed_engine() -> LipsyncEngine {
    LipsyncEngine::new(
        FacialTargetTable::standard(),
        PipelineConfig {
            smoothing: SmoothingConfig::disabled(),
            ..PipelineConfig::default()
        },
    )
}
