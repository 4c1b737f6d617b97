//! End-to-end scenarios through the public engine API

use lipsync_core::{Channel, LipsyncError};
use lipsync_phoneme::FacialTargetTable;
use lipsync_test::*;
use lipsync_timing::NoPronunciations;
use lipsync_track::{Easing, KeyframeKind, KeyframeTrack, LipsyncEngine, UtteranceRequest};

fn rest() -> lipsync_core::FacialPose {
    FacialTargetTable::standard().rest_pose()
}

#[test]
fn hello_track_has_peaks_and_rounded_vowel() {
    let engine = unsmoothed_engine();
    let track = engine.generate(&hello_request(1.0)).unwrap();

    assert_track_valid(&track, 1.0, &rest());
    assert!(track.count_kind(KeyframeKind::Peak) >= 4);

    // The oʊ peak keeps full lip rounding after damping
    let peak = track
        .keyframes
        .iter()
        .filter(|k| k.kind == KeyframeKind::Peak)
        .last()
        .unwrap();
    assert_eq!(peak.pose.funnel_right_up, 1.0);
    assert_eq!(peak.pose.purse_left_down, 0.7);
}

#[test]
fn hello_track_smoothed_still_valid() {
    let engine = LipsyncEngine::default();
    let track = engine.generate(&hello_request(1.0)).unwrap();

    assert_track_valid(&track, 1.0, &rest());
    assert!(track.count_kind(KeyframeKind::Intermediate) > 0);
}

#[test]
fn empty_sequence_gives_two_rests() {
    let engine = LipsyncEngine::default();
    let track = engine
        .generate(&UtteranceRequest::new(Vec::<String>::new(), 2.0))
        .unwrap();

    assert_eq!(track.len(), 2);
    assert_eq!(track.times(), vec![0.0, 2.0]);
    assert_track_valid(&track, 2.0, &rest());
}

#[test]
fn non_positive_duration_rejected() {
    let engine = LipsyncEngine::default();
    for duration in [0.0, -0.5] {
        let err = engine.generate(&hello_request(duration)).unwrap_err();
        assert_eq!(err, LipsyncError::InvalidDuration(duration));
    }
}

#[test]
fn unresolvable_phonemes_fully_populated() {
    let engine = LipsyncEngine::default();
    let request = UtteranceRequest::new(["x", "h", "x", "ʔʔ", "x"], 0.8);
    let track = engine.generate(&request).unwrap();
    assert_track_valid(&track, 0.8, &rest());

    let json: serde_json::Value = serde_json::from_str(&track.to_json().unwrap()).unwrap();
    for frame in json["keyframes"].as_array().unwrap() {
        let object = frame.as_object().unwrap();
        assert_eq!(object.len(), Channel::count() + 1);
        for channel in Channel::ALL {
            let value = &object[channel.wire_name()];
            if channel.is_vector() {
                assert!(value["x"].is_number() && value["y"].is_number() && value["z"].is_number());
            } else {
                assert!(value.is_number());
            }
        }
    }
}

#[test]
fn pangram_track_valid() {
    let engine = LipsyncEngine::default();
    let track = engine.generate(&pangram_request(2.7)).unwrap();
    assert_track_valid(&track, 2.7, &rest());
    assert!(track.count_kind(KeyframeKind::Peak) > 20);
}

#[test]
fn words_with_dictionary_and_jaw() {
    let engine = unsmoothed_engine();
    let jaw = ramp_jaw(1.2, 0.01, 0.8);
    let track = engine
        .generate_from_words(&hello_world_words(), &hello_dictionary(), Some(&jaw))
        .unwrap();

    assert_track_valid(&track, 1.2, &rest());

    let labelled: Vec<_> = track.keyframes.iter().filter_map(|k| k.label.as_ref()).collect();
    assert!(labelled.iter().any(|l| l.word == "hello" && l.syllable == 1));
    assert!(labelled.iter().any(|l| l.word == "world" && l.syllable == 0));

    // Later syllables open the jaw wider on a rising ramp
    let syllables: Vec<_> = track
        .keyframes
        .iter()
        .filter(|k| k.kind == KeyframeKind::Syllable)
        .collect();
    assert!(syllables.last().unwrap().pose.jaw.y > syllables[0].pose.jaw.y);
}

#[test]
fn words_split_evenly_without_dictionary() {
    let engine = unsmoothed_engine();
    let track = engine
        .generate_from_words(&hello_world_words(), &NoPronunciations, None)
        .unwrap();

    assert_track_valid(&track, 1.2, &rest());
    // hello → he|llo, world → world: one transition per syllable
    assert_eq!(track.count_kind(KeyframeKind::Transition), 3);
}

#[test]
fn playback_reaches_rest() {
    let engine = LipsyncEngine::default();
    let track = engine.generate(&hello_request(1.0)).unwrap();

    assert_eq!(track.sample(-0.1, Easing::Smoothstep), rest());
    assert_eq!(track.sample(1.5, Easing::EaseOutCubic), rest());
    assert!(track.is_finished(1.0));
    assert!(!track.is_finished(0.5));

    let mid = track.sample(0.7, Easing::Linear);
    assert!(mid.funnel_right_up > 0.0);
}

#[test]
fn track_json_roundtrip() {
    let engine = LipsyncEngine::default();
    let track = engine.generate(&hello_request(0.9)).unwrap();
    let parsed = KeyframeTrack::from_json(&track.to_json().unwrap()).unwrap();

    assert_eq!(parsed.times(), track.times());
    for (a, b) in parsed.keyframes.iter().zip(&track.keyframes) {
        assert_eq!(a.pose, b.pose);
    }
}
