//! Facial Target Table - canonical phoneme to facial pose
//!
//! Each entry is a SPARSE override on top of the neutral pose. Lookups always
//! return a full pose; tokens missing from the table fall back through:
//!
//! 1. exact entry
//! 2. per-character merge (last non-zero value wins, in character order)
//! 3. base vowel `a` for anything vowel-like
//! 4. a generic consonant jaw opening (or the neutral pose)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use lipsync_core::{Channel, ChannelValue, FacialPose, Vec3};

/// Reserved token for the neutral boundary pose
pub const REST: &str = "rest";

/// Characters that make a token vowel-like
pub const VOWELS: &str = "aeiouəɑæɛɪɔʊʌɐɒ";

/// Token used for the vowel fallback
const BASE_VOWEL: &str = "a";

/// Table configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Jaw opening for unresolvable consonant-like tokens.
    /// `None` selects the all-neutral fallback.
    pub consonant_jaw: Option<f32>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            consonant_jaw: Some(0.3),
        }
    }
}

impl TableConfig {
    /// Neutral fallback, no jaw opening for unknown consonants
    pub fn neutral() -> Self {
        Self {
            consonant_jaw: None,
        }
    }
}

/// Which branch of the fallback chain produced a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseSource {
    /// Token has its own entry
    Exact,
    /// Merged from the entries of the token's characters
    Characters,
    /// Vowel-like token mapped to the base vowel
    VowelFallback,
    /// Generic consonant jaw opening
    ConsonantFallback,
    /// Nothing matched
    Neutral,
}

/// Sparse pose override
pub type PoseOverride = Vec<(Channel, ChannelValue)>;

/// Builder for sparse table entries
#[derive(Debug, Default)]
struct Entry(PoseOverride);

impl Entry {
    fn jaw(mut self, y: f32) -> Self {
        self.0.push((Channel::Jaw, Vec3::vertical(y).into()));
        self
    }

    fn teeth(self, upper: f32, lower: f32) -> Self {
        self.teeth_upper(upper).teeth_lower(lower)
    }

    fn teeth_upper(mut self, y: f32) -> Self {
        self.0.push((Channel::TeethUpper, Vec3::vertical(y).into()));
        self
    }

    fn teeth_lower(mut self, y: f32) -> Self {
        self.0.push((Channel::TeethLower, Vec3::vertical(y).into()));
        self
    }

    fn tongue(mut self, y: f32) -> Self {
        self.0.push((Channel::Tongue, Vec3::vertical(y).into()));
        self
    }

    fn tongue_in_out(mut self, v: f32) -> Self {
        self.0.push((Channel::TongueInOut, ChannelValue::Scalar(v)));
        self
    }

    fn corner_pull(mut self, v: f32) -> Self {
        self.0.push((Channel::CornerPullRight, ChannelValue::Scalar(v)));
        self.0.push((Channel::CornerPullLeft, ChannelValue::Scalar(v)));
        self
    }

    fn funnel(mut self, v: f32) -> Self {
        for channel in &Channel::LIP_SHAPE[..4] {
            self.0.push((*channel, ChannelValue::Scalar(v)));
        }
        self
    }

    fn purse(mut self, v: f32) -> Self {
        for channel in &Channel::LIP_SHAPE[4..] {
            self.0.push((*channel, ChannelValue::Scalar(v)));
        }
        self
    }
}

fn entry() -> Entry {
    Entry::default()
}

/// Immutable phoneme → pose table
#[derive(Debug, Clone)]
pub struct FacialTargetTable {
    entries: HashMap<String, PoseOverride>,
    config: TableConfig,
}

impl Default for FacialTargetTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl FacialTargetTable {
    /// Empty table, useful for building custom inventories
    pub fn empty(config: TableConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// The standard English inventory with the default fallback
    pub fn standard() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// The standard English inventory
    pub fn with_config(config: TableConfig) -> Self {
        let rounded = || entry().jaw(0.4).funnel(1.0).purse(0.7).teeth(0.4, -0.4);
        let closed_round = || entry().jaw(0.4).funnel(1.0).purse(1.0).teeth(0.4, -0.4);
        let spread = || entry().jaw(0.3).corner_pull(0.4).teeth(-0.4, 0.4);
        let bilabial = || entry().jaw(0.2).teeth_lower(-0.2);
        let labiodental = || entry().jaw(0.3).funnel(0.8).teeth_upper(-0.3);
        let dental = || entry().jaw(0.3).tongue_in_out(-0.3).teeth(-0.3, 0.1);
        let sibilant = || entry().jaw(0.4).teeth(-0.27, 0.1);
        let postalveolar = || entry().jaw(0.4).teeth(-0.3, 0.3).funnel(0.4);
        let alveolar_stop = || entry().jaw(0.4).tongue(0.5).teeth(-0.2, 0.2);
        let velar_stop = || entry().jaw(0.4).tongue(0.5).teeth(-0.1, 0.1);
        let nasal = || entry().jaw(0.3).tongue(0.7);

        let inventory: Vec<(&str, Entry)> = vec![
            // Vowels
            ("a", entry().jaw(0.5)),
            ("ɑ", entry().jaw(0.5)),
            ("e", entry().jaw(0.3).teeth(-0.2, 0.2)),
            ("ɛ", entry().jaw(0.3).corner_pull(0.2).teeth(-0.2, 0.2)),
            ("i", entry().jaw(0.3).teeth(-0.1, 0.1)),
            ("ɪ", spread()),
            ("o", rounded()),
            ("ɔ", rounded()),
            ("u", closed_round()),
            ("ʊ", closed_round()),
            ("aw", entry().jaw(0.6).purse(0.2).teeth(0.4, -0.4)),
            ("ay", spread()),
            // Consonants
            ("b", bilabial()),
            ("p", bilabial()),
            ("m", entry().jaw(0.1).teeth_lower(-0.2)),
            ("f", labiodental()),
            ("v", labiodental()),
            ("th", entry().jaw(0.3).tongue_in_out(-0.3).teeth(-0.2, 0.1)),
            ("ð", dental()),
            ("θ", dental()),
            ("s", sibilant()),
            ("z", sibilant()),
            ("sh", postalveolar()),
            ("ʃ", postalveolar()),
            ("t", alveolar_stop()),
            ("d", alveolar_stop()),
            ("k", velar_stop()),
            ("g", velar_stop()),
            ("l", velar_stop().tongue_in_out(0.5)),
            ("r", velar_stop().tongue_in_out(0.2)),
            ("w", entry().jaw(0.8).funnel(1.0).purse(0.8)),
            ("y", spread()),
            ("h", entry().jaw(0.3)),
            ("n", nasal()),
            ("ng", nasal()),
            // Diphthongs
            ("aɪ", entry().jaw(0.3).teeth(-0.3, 0.3)),
            ("eɪ", entry().jaw(0.5).teeth(-0.3, 0.3)),
            ("oʊ", rounded()),
            // Clusters and affricates
            ("pl", entry().jaw(0.2).funnel(0.2).teeth_upper(-0.2).tongue(0.2)),
            ("tr", entry().jaw(0.3).tongue(0.4).teeth(-0.2, 0.2)),
            ("st", sibilant()),
            ("nt", entry().jaw(0.3).tongue(0.6).teeth(-0.2, 0.2)),
            ("tʃ", entry().jaw(0.4).tongue(0.3).teeth(-0.3, 0.3).funnel(0.5)),
            ("dʒ", entry().jaw(0.3).tongue(0.5).teeth(-0.3, 0.3).funnel(0.3)),
            // Stressed vowels
            ("ˈɪ", entry().jaw(0.35).corner_pull(0.35).teeth(-0.3, 0.3)),
            ("ˈiː", entry().jaw(0.3).corner_pull(0.5).teeth(-0.4, 0.4)),
            ("ˈɒ", entry().jaw(0.4).funnel(1.0).purse(0.8)),
            ("ˈa", entry().jaw(0.6)),
            // Whole-word shapes
            ("juː", entry().jaw(0.3).funnel(0.9).purse(0.7).teeth(0.2, -0.2)),
            ("kʊd", entry().jaw(0.3).tongue(0.4).funnel(0.7).purse(0.5)),
            // Listening / boundary pose
            (REST, entry().jaw(0.1)),
        ];

        let mut table = Self::empty(config);
        for (token, e) in inventory {
            table.insert(token, e.0);
        }
        table
    }

    /// Add or replace an entry. Only meaningful before the table is shared.
    pub fn insert(&mut self, token: impl Into<String>, overrides: PoseOverride) {
        let overrides = overrides
            .into_iter()
            .map(|(channel, value)| match (channel, value) {
                (Channel::Jaw, ChannelValue::Vector3(mut v)) => {
                    v.x = 0.0;
                    (channel, ChannelValue::Vector3(v))
                }
                _ => (channel, value),
            })
            .collect();
        self.entries.insert(token.into(), overrides);
    }

    /// Table configuration
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Is `token` a canonical entry?
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Sparse override for a canonical token
    pub fn entry(&self, token: &str) -> Option<&[(Channel, ChannelValue)]> {
        self.entries.get(token).map(|e| e.as_slice())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All canonical tokens, sorted
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        tokens.sort_unstable();
        tokens
    }

    /// The neutral boundary pose
    pub fn rest_pose(&self) -> FacialPose {
        self.entry(REST)
            .map(FacialPose::from_overrides)
            .unwrap_or_default()
    }

    /// Full pose for any token
    pub fn get_pose(&self, token: &str) -> FacialPose {
        self.resolve(token).0
    }

    /// Full pose for any token, with the fallback branch that produced it
    pub fn resolve(&self, token: &str) -> (FacialPose, PoseSource) {
        if let Some(overrides) = self.entry(token) {
            return (FacialPose::from_overrides(overrides), PoseSource::Exact);
        }

        if token.chars().count() > 1 {
            let mut pose = FacialPose::neutral();
            let mut matched = false;
            let mut buf = [0u8; 4];

            // Order matters: later characters overwrite earlier ones
            for c in token.chars() {
                if let Some(overrides) = self.entry(c.encode_utf8(&mut buf)) {
                    pose.apply_nonzero(overrides);
                    matched = true;
                }
            }

            if matched {
                return (pose, PoseSource::Characters);
            }
        }

        if token.chars().any(|c| VOWELS.contains(c)) {
            if let Some(overrides) = self.entry(BASE_VOWEL) {
                trace!(token, "vowel fallback");
                return (FacialPose::from_overrides(overrides), PoseSource::VowelFallback);
            }
        }

        match self.config.consonant_jaw {
            Some(y) => {
                trace!(token, "consonant fallback");
                let pose = FacialPose::from_overrides(&[(Channel::Jaw, Vec3::vertical(y).into())]);
                (pose, PoseSource::ConsonantFallback)
            }
            None => (FacialPose::neutral(), PoseSource::Neutral),
        }
    }
}
