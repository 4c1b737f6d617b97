//! Phoneme Normalizer - raw phonetic symbols to canonical tokens
//!
//! Phonemizers emit IPA with stress and length markers, affricates written
//! as two letters, and whole-word chunks. The normalizer collapses all of
//! that into tokens the facial target table understands.
//!
//! Matching is by plain substring containment with fixed priority, so a
//! concatenated symbol such as `"kst"` resolves to `"st"`. Inputs are
//! expected to be one phoneme per symbol.

use tracing::trace;

use crate::{FacialTargetTable, DIPHTHONGS, LENGTH_MARK, PRIMARY_STRESS};

/// Lexicalized compounds, checked in this order; first match wins
pub const COMPOUNDS: [&str; 8] = ["tʃ", "dʒ", "juː", "kʊd", "pl", "tr", "st", "nt"];

/// Vowels that may carry a stressed table entry, checked in this order
const STRESSABLE_VOWELS: [char; 12] = ['i', 'ɪ', 'e', 'ɛ', 'a', 'æ', 'ɑ', 'ɒ', 'o', 'ɔ', 'u', 'ʊ'];

/// IPA symbol → canonical spelling, applied in order
const ALIASES: [(char, &str); 20] = [
    ('ə', "a"),
    ('ɑ', "a"),
    ('æ', "a"),
    ('ɛ', "e"),
    ('ɪ', "i"),
    ('ɔ', "o"),
    ('ʊ', "u"),
    ('ʌ', "a"),
    ('ː', ""),
    ('ˈ', ""),
    ('ˌ', ""),
    ('ɐ', "a"),
    ('ɒ', "o"),
    ('θ', "th"),
    ('ð', "th"),
    ('ʃ', "sh"),
    ('ʒ', "zh"),
    ('ŋ', "ng"),
    ('ɹ', "r"),
    ('j', "y"),
];

/// IPA symbols kept after alias substitution
const RETAINED_IPA: &str = "ɑæɛɪɔʊʌɐɒθðʃʒŋɹj";

/// Token returned when nothing survives normalization
pub const FALLBACK: &str = "x";

/// Maps raw symbols onto the canonical tokens of a table
#[derive(Debug, Clone, Copy)]
pub struct PhonemeNormalizer<'t> {
    table: &'t FacialTargetTable,
}

impl<'t> PhonemeNormalizer<'t> {
    pub fn new(table: &'t FacialTargetTable) -> Self {
        Self { table }
    }

    /// Canonical token for a raw symbol. Never empty.
    pub fn simplify(&self, raw: &str) -> String {
        if self.table.contains(raw) {
            return raw.to_string();
        }

        if let Some(compound) = COMPOUNDS.iter().find(|c| raw.contains(*c)) {
            return compound.to_string();
        }

        if raw.contains(PRIMARY_STRESS) {
            let stressed = STRESSABLE_VOWELS
                .iter()
                .map(|v| format!("{PRIMARY_STRESS}{v}"))
                .find(|s| raw.contains(s.as_str()) && self.table.contains(s));
            if let Some(stressed) = stressed {
                return stressed;
            }
        }

        if let Some(diphthong) = DIPHTHONGS.iter().find(|d| raw.contains(*d)) {
            return diphthong.to_string();
        }

        let simple = Self::strip(raw);
        if simple.is_empty() {
            trace!(raw, "no usable symbols, using fallback");
            FALLBACK.to_string()
        } else {
            simple
        }
    }

    /// Normalize a whole sequence
    pub fn simplify_all<S: AsRef<str>>(&self, raws: &[S]) -> Vec<String> {
        raws.iter().map(|r| self.simplify(r.as_ref())).collect()
    }

    /// Lowercase, drop length marks, apply aliases, drop foreign characters
    fn strip(raw: &str) -> String {
        let mut simple: String = raw.to_lowercase().chars().filter(|c| *c != LENGTH_MARK).collect();

        for (ipa, replacement) in ALIASES {
            if simple.contains(ipa) {
                simple = simple.replace(ipa, replacement);
            }
        }

        simple
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || RETAINED_IPA.contains(*c))
            .collect()
    }
}
