//! Phoneme classes
//!
//! Coarse articulatory classes used for timing. Classification works on
//! canonical tokens and follows a fixed precedence; the first class whose
//! test matches wins.

use serde::{Deserialize, Serialize};

/// Lexicalized whole-word shapes
pub const WORD_SHAPES: [&str; 2] = ["juː", "kʊd"];

/// Lexicalized consonant compounds (affricates and clusters)
pub const CLUSTERS: [&str; 6] = ["tʃ", "dʒ", "pl", "tr", "st", "nt"];

/// Diphthongs, matched by containment
pub const DIPHTHONGS: [&str; 4] = ["aɪ", "eɪ", "oʊ", "aʊ"];

/// Vowel letters used for classification
pub const VOWEL_LETTERS: &str = "aeiouɑæɛɪɔʊʌɐɒ";

const STOPS: &str = "pbtdkg";
const FRICATIVES: &str = "fvszʃʒθð";
const NASALS: &str = "mnŋ";
const LIQUIDS: &str = "lr";
const GLIDES: &str = "wj";

/// Primary stress marker
pub const PRIMARY_STRESS: char = 'ˈ';

/// Secondary stress marker
pub const SECONDARY_STRESS: char = 'ˌ';

/// Length marker
pub const LENGTH_MARK: char = 'ː';

/// Articulatory class of a canonical phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonemeClass {
    WordShape,
    Compound,
    Diphthong,
    LongVowel,
    StressedVowel,
    Vowel,
    Stop,
    Fricative,
    Nasal,
    Liquid,
    Glide,
    Other,
}

impl PhonemeClass {
    /// Classify a canonical token
    pub fn classify(token: &str) -> PhonemeClass {
        let has_any = |set: &str| token.chars().any(|c| set.contains(c));

        if WORD_SHAPES.contains(&token) {
            PhonemeClass::WordShape
        } else if CLUSTERS.contains(&token) {
            PhonemeClass::Compound
        } else if DIPHTHONGS.iter().any(|d| token.contains(d)) {
            PhonemeClass::Diphthong
        } else if token.contains(LENGTH_MARK) {
            PhonemeClass::LongVowel
        } else if token.contains(PRIMARY_STRESS) && has_any(VOWEL_LETTERS) {
            PhonemeClass::StressedVowel
        } else if has_any(VOWEL_LETTERS) {
            PhonemeClass::Vowel
        } else if has_any(STOPS) {
            PhonemeClass::Stop
        } else if has_any(FRICATIVES) {
            PhonemeClass::Fricative
        } else if has_any(NASALS) {
            PhonemeClass::Nasal
        } else if has_any(LIQUIDS) {
            PhonemeClass::Liquid
        } else if has_any(GLIDES) {
            PhonemeClass::Glide
        } else {
            PhonemeClass::Other
        }
    }

    /// Does this class carry a syllable nucleus?
    pub fn is_vocalic(&self) -> bool {
        matches!(
            self,
            PhonemeClass::WordShape
                | PhonemeClass::Diphthong
                | PhonemeClass::LongVowel
                | PhonemeClass::StressedVowel
                | PhonemeClass::Vowel
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(PhonemeClass::classify("juː"), PhonemeClass::WordShape);
        assert_eq!(PhonemeClass::classify("tʃ"), PhonemeClass::Compound);
        assert_eq!(PhonemeClass::classify("oʊ"), PhonemeClass::Diphthong);
        assert_eq!(PhonemeClass::classify("ˈiː"), PhonemeClass::LongVowel);
        assert_eq!(PhonemeClass::classify("ˈa"), PhonemeClass::StressedVowel);
        assert_eq!(PhonemeClass::classify("ɛ"), PhonemeClass::Vowel);
        assert_eq!(PhonemeClass::classify("k"), PhonemeClass::Stop);
        assert_eq!(PhonemeClass::classify("s"), PhonemeClass::Fricative);
        assert_eq!(PhonemeClass::classify("m"), PhonemeClass::Nasal);
        assert_eq!(PhonemeClass::classify("l"), PhonemeClass::Liquid);
        assert_eq!(PhonemeClass::classify("w"), PhonemeClass::Glide);
        assert_eq!(PhonemeClass::classify("h"), PhonemeClass::Other);
        assert_eq!(PhonemeClass::classify("x"), PhonemeClass::Other);
    }

    #[test]
    fn test_classify_by_containment() {
        // Any stop letter makes the token a stop, ahead of later classes
        assert_eq!(PhonemeClass::classify("th"), PhonemeClass::Stop);
        assert_eq!(PhonemeClass::classify("ng"), PhonemeClass::Stop);
        assert_eq!(PhonemeClass::classify("sh"), PhonemeClass::Fricative);
        // Diphthong inside a longer symbol
        assert_eq!(PhonemeClass::classify("ˈaɪ"), PhonemeClass::Diphthong);
    }

    #[test]
    fn test_vocalic() {
        assert!(PhonemeClass::classify("a").is_vocalic());
        assert!(!PhonemeClass::classify("t").is_vocalic());
    }
}
