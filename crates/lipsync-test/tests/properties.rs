//! Property tests over arbitrary phoneme sequences and durations

use proptest::prelude::*;

use lipsync_core::{round_time, round_value, Channel, TIME_DECIMALS, VALUE_DECIMALS};
use lipsync_phoneme::{FacialTargetTable, PhonemeNormalizer, COMPOUNDS};
use lipsync_test::*;
use lipsync_timing::TimingEstimator;
use lipsync_track::{Easing, LipsyncEngine, SmoothingConfig, TrackSmoother, UtteranceRequest};

/// Symbols a phonemizer might emit, plus some junk
fn symbol() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "a", "ɛ", "ˈɪ", "iː", "oʊ", "aɪ", "tʃ", "dʒ", "juː", "kʊd", "θ", "ð", "ŋ", "ɹ", "ʃ",
            "p", "b", "m", "s", "z", "l", "w", "j", "h", "ə", "ˈa", "ɜː", "rest",
        ])
        .prop_map(String::from),
        "[a-zæɑɛɪɔʊʌəˈː?!-]{0,4}",
    ]
}

fn phoneme_seq() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(symbol(), 0..24)
}

proptest! {
    #[test]
    fn generated_tracks_hold_invariants(
        phonemes in phoneme_seq(),
        duration in 0.05f64..12.0,
        smooth in any::<bool>(),
    ) {
        let engine = if smooth { LipsyncEngine::default() } else { unsmoothed_engine() };
        let rest = engine.table().rest_pose();
        let track = engine
            .generate(&UtteranceRequest::new(phonemes, duration))
            .unwrap();

        let violations = check_track(&track, duration, &rest);
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn normalizer_total_and_deterministic(raw in "\\PC{0,6}") {
        let table = FacialTargetTable::standard();
        let normalizer = PhonemeNormalizer::new(&table);
        let a = normalizer.simplify(&raw);
        let b = normalizer.simplify(&raw);

        prop_assert!(!a.is_empty());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn compounds_win_over_later_rules(prefix in "[bdkm]{0,2}", index in 0usize..COMPOUNDS.len()) {
        let table = FacialTargetTable::standard();
        let normalizer = PhonemeNormalizer::new(&table);
        let compound = COMPOUNDS[index];
        let raw = format!("{prefix}{compound}");

        // An exact table entry takes precedence; the earliest listed
        // compound contained in the symbol wins otherwise
        let simple = normalizer.simplify(&raw);
        if !table.contains(&raw) {
            let expected = COMPOUNDS.iter().find(|c| raw.contains(*c)).unwrap();
            prop_assert_eq!(simple, expected.to_string());
        }
    }

    #[test]
    fn table_total(token in "\\PC{0,5}") {
        let table = FacialTargetTable::standard();
        let pose = table.get_pose(&token);
        prop_assert_eq!(pose.jaw.x, 0.0);
        for channel in Channel::ALL {
            let _ = pose.get(channel);
        }
    }

    #[test]
    fn rescale_matches_duration(
        phonemes in prop::collection::vec(symbol(), 1..30),
        total in 0.01f64..60.0,
    ) {
        let table = FacialTargetTable::standard();
        let tokens = PhonemeNormalizer::new(&table).simplify_all(&phonemes);
        let timings = TimingEstimator::default().estimate(&tokens, total);

        let end = TimingEstimator::estimated_total(&timings);
        prop_assert!((end - total).abs() < 1e-6 * total.max(1.0));
        for pair in timings.windows(2) {
            prop_assert!((pair[0].end() - pair[1].start).abs() < 1e-9 * total.max(1.0));
        }
    }

    #[test]
    fn rounding_idempotent(t in -100.0f64..100.0, v in -10.0f32..10.0) {
        let once = round_time(t, 3);
        prop_assert_eq!(round_time(once, 3), once);
        let once = round_value(v, 2);
        prop_assert_eq!(round_value(once, 2), once);
    }

    #[test]
    fn recleaning_generated_track_is_noop(
        phonemes in phoneme_seq(),
        duration in 0.05f64..8.0,
        smooth in any::<bool>(),
    ) {
        let engine = if smooth { LipsyncEngine::default() } else { unsmoothed_engine() };
        let track = engine
            .generate(&UtteranceRequest::new(phonemes, duration))
            .unwrap();

        let mut recleaned = track.clone();
        recleaned.clean(TIME_DECIMALS, VALUE_DECIMALS);
        prop_assert_eq!(recleaned, track);
    }

    #[test]
    fn smoothing_keeps_boundaries_and_times(
        phonemes in prop::collection::vec(symbol(), 1..16),
        duration in 0.2f64..5.0,
        sigma in 0.3f32..4.0,
        window in (0usize..5).prop_map(|half| 2 * half + 1),
    ) {
        let engine = unsmoothed_engine();
        let raw = engine.generate(&UtteranceRequest::new(phonemes, duration)).unwrap();
        let smoother = TrackSmoother::new(SmoothingConfig {
            sigma,
            window,
            ..SmoothingConfig::default()
        });

        let smoothed = smoother.gaussian_smooth(&raw);
        prop_assert_eq!(smoothed.times(), raw.times());
        prop_assert_eq!(smoothed.first().unwrap().pose, raw.first().unwrap().pose);
        prop_assert_eq!(smoothed.last().unwrap().pose, raw.last().unwrap().pose);

        let expanded = smoother.insert_intermediates(&raw);
        let times = expanded.times();
        for t in raw.times() {
            prop_assert!(times.contains(&t));
        }
        prop_assert!(expanded.is_strictly_ordered());
    }

    #[test]
    fn sampling_stays_between_neighbours(
        phonemes in prop::collection::vec(symbol(), 1..12),
        duration in 0.2f64..4.0,
        at in 0.0f64..1.0,
    ) {
        let engine = LipsyncEngine::default();
        let track = engine.generate(&UtteranceRequest::new(phonemes, duration)).unwrap();
        let time = at * duration;
        let pose = track.sample(time, Easing::Smoothstep);

        let idx = track.keyframes.partition_point(|k| k.time <= time);
        let before = &track.keyframes[idx.saturating_sub(1)].pose;
        let after = &track.keyframes[idx.min(track.len() - 1)].pose;
        let (lo, hi) = (before.jaw.y.min(after.jaw.y), before.jaw.y.max(after.jaw.y));
        prop_assert!(pose.jaw.y >= lo - 1e-5 && pose.jaw.y <= hi + 1e-5);
    }
}
