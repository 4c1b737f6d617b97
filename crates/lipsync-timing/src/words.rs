//! Word-timestamp timing
//!
//! When the transcriber supplies word spans, each word's duration is
//! known. Its syllables come from a pronunciation source; words the
//! source does not know are split heuristically at vowel runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lipsync_core::{LipsyncError, LipsyncResult};

/// Orthographic vowels used by the syllable heuristic
pub const ORTHOGRAPHIC_VOWELS: &str = "aeiouy";

/// A word and where it sits in the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSpan {
    pub word: String,
    /// Start time (seconds)
    pub start: f64,
    /// End time (seconds)
    pub end: f64,
}

impl WordSpan {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Finite, non-negative start and an end no earlier than the start
    pub fn validate(&self) -> LipsyncResult<()> {
        let ok = self.start.is_finite()
            && self.end.is_finite()
            && self.start >= 0.0
            && self.end >= self.start;
        if ok {
            Ok(())
        } else {
            Err(LipsyncError::InvalidWordSpan {
                word: self.word.clone(),
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// Validate every span, reporting the first bad one
pub fn validate_word_spans(words: &[WordSpan]) -> LipsyncResult<()> {
    words.iter().try_for_each(WordSpan::validate)
}

/// Syllabified pronunciations for words
pub trait PronunciationSource {
    /// Syllables of `word`, each a list of phoneme symbols.
    /// `None` when the word is unknown.
    fn syllables(&self, word: &str) -> Option<Vec<Vec<String>>>;
}

/// Source that knows no words; every word takes the heuristic path
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPronunciations;

impl PronunciationSource for NoPronunciations {
    fn syllables(&self, _word: &str) -> Option<Vec<Vec<String>>> {
        None
    }
}

/// In-memory pronunciation dictionary, keyed case-insensitively
#[derive(Debug, Clone, Default)]
pub struct PronunciationDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl PronunciationDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<W, S>(&mut self, word: W, syllables: Vec<Vec<S>>)
    where
        W: AsRef<str>,
        S: Into<String>,
    {
        let syllables = syllables
            .into_iter()
            .map(|syl| syl.into_iter().map(Into::into).collect())
            .collect();
        self.entries.insert(word.as_ref().to_lowercase(), syllables);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronunciationSource for PronunciationDictionary {
    fn syllables(&self, word: &str) -> Option<Vec<Vec<String>>> {
        self.entries.get(&word.to_lowercase()).cloned()
    }
}

fn letters(word: &str) -> Vec<char> {
    word.to_lowercase().chars().filter(|c| c.is_alphabetic()).collect()
}

fn is_vowel(c: char) -> bool {
    ORTHOGRAPHIC_VOWELS.contains(c)
}

/// Number of vowel runs in the word's letters, at least 1
pub fn count_syllables(word: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in letters(word) {
        let vowel = is_vowel(c);
        if vowel && !in_run {
            runs += 1;
        }
        in_run = vowel;
    }
    runs.max(1)
}

/// Split a word's letters into syllables at vowel-run ends.
///
/// Consonants between two vowel runs open the next syllable; trailing
/// consonants stay with the last one. Each letter becomes one symbol.
pub fn heuristic_syllables(word: &str) -> Vec<Vec<String>> {
    let letters = letters(word);
    let total_runs = count_syllables(word);

    let mut syllables: Vec<Vec<String>> = Vec::with_capacity(total_runs);
    let mut current = Vec::new();
    let mut runs_closed = 0;

    for (i, c) in letters.iter().enumerate() {
        current.push(c.to_string());
        let run_ends = is_vowel(*c) && letters.get(i + 1).map_or(true, |n| !is_vowel(*n));
        if run_ends {
            runs_closed += 1;
            if runs_closed < total_runs {
                syllables.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() || syllables.is_empty() {
        syllables.push(current);
    }
    syllables
}

/// One syllable placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllableSpan {
    pub word: String,
    /// Position within the word, from 0
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub phonemes: Vec<String>,
}

impl SyllableSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Time at a fraction of the way through the syllable
    pub fn at(&self, fraction: f64) -> f64 {
        self.start + fraction * self.duration()
    }
}

/// Split every word span equally across its syllables
pub fn syllable_spans(words: &[WordSpan], source: &dyn PronunciationSource) -> Vec<SyllableSpan> {
    let mut spans = Vec::new();

    for word in words {
        let syllables = match source.syllables(&word.word) {
            Some(found) if !found.is_empty() => found,
            _ => {
                debug!(word = %word.word, "no pronunciation entry, splitting at vowel runs");
                heuristic_syllables(&word.word)
            }
        };

        let share = word.duration() / syllables.len() as f64;
        for (index, phonemes) in syllables.into_iter().enumerate() {
            let start = word.start + share * index as f64;
            spans.push(SyllableSpan {
                word: word.word.clone(),
                index,
                start,
                end: start + share,
                phonemes,
            });
        }
    }

    spans
}
