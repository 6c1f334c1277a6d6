//! Ordered filter and normalization stages over merged tags.
//!
//! After merging, tags pass through a fixed chain: single-character tags
//! and tags with no letters are dropped, the remaining texts run through
//! dictionary spell correction, and the equipment flag is resolved from
//! the final text. Stage order is part of the contract; correction only
//! ever sees tags that survived the cheap filters.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::config::{ConfigValidatorExt, SpellConfig};
use crate::core::errors::PipelineResult;
use crate::domain::tag::{TagGroup, resolve_is_equipment_tag};
use crate::processors::spell::SpellDictionary;

/// Characters stripped from word ends before dictionary lookup.
const STRIP_CHARS: &[char] = &['(', ')', '{', '}', '[', ']', '\\', '/'];

/// Cleaned words shorter than this are never corrected.
const MIN_CORRECTION_CHARS: usize = 3;

/// Drawing note identifiers such as `E01` or `(E12)`, which look like
/// misspellings to the dictionary but must never be altered.
static NOTE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[()\[\]/\\]*E\d{2}[()\[\]/\\]*$")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// The ordered filter chain applied to merged tags.
pub struct TagFilterPipeline {
    config: SpellConfig,
    dictionary: Arc<SpellDictionary>,
}

impl TagFilterPipeline {
    /// Creates the filter chain with validated configuration and a shared
    /// dictionary.
    pub fn new(config: SpellConfig, dictionary: Arc<SpellDictionary>) -> PipelineResult<Self> {
        Ok(Self {
            config: config.validate_and_wrap()?,
            dictionary,
        })
    }

    /// Runs every stage in order and resolves equipment flags.
    ///
    /// Applying the chain to its own output changes nothing.
    pub fn apply(&self, groups: Vec<TagGroup>) -> Vec<TagGroup> {
        let input = groups.len();
        let groups = drop_single_character_tags(groups);
        let groups = drop_numeric_only_tags(groups);
        let mut groups = self.spell_check_tags(groups);
        for group in &mut groups {
            group.tag.equipment_tag = resolve_is_equipment_tag(&group.tag.text);
        }
        debug!(input, output = groups.len(), "tag filter chain complete");
        groups
    }

    /// Corrects tag texts in place against the dictionary.
    fn spell_check_tags(&self, mut groups: Vec<TagGroup>) -> Vec<TagGroup> {
        for group in &mut groups {
            if let Some(corrected) = self.correct_text(&group.tag.text) {
                debug!(from = %group.tag.text, to = %corrected, "spell-corrected tag");
                group.tag.text = corrected;
            }
        }
        groups
    }

    /// Returns corrected text, or `None` when no word changed.
    ///
    /// Hyphenated texts are equipment identifier candidates and are never
    /// corrected; neither are texts without a single letter.
    fn correct_text(&self, text: &str) -> Option<String> {
        if text.contains('-') || !text.chars().any(char::is_alphabetic) {
            return None;
        }
        let mut changed = false;
        let corrected: Vec<String> = text
            .split_whitespace()
            .map(|word| match self.correct_word(word) {
                Some(replacement) => {
                    changed = true;
                    replacement
                }
                None => word.to_string(),
            })
            .collect();
        changed.then(|| corrected.join(" "))
    }

    /// Returns a replacement for one word, or `None` to keep it.
    fn correct_word(&self, word: &str) -> Option<String> {
        let cleaned = word.trim_matches(STRIP_CHARS);
        if cleaned.chars().count() < MIN_CORRECTION_CHARS
            || !cleaned.chars().any(char::is_alphabetic)
            || NOTE_IDENTIFIER.is_match(word)
        {
            return None;
        }
        let suggestion = self
            .dictionary
            .best_correction(cleaned, self.config.max_edit_distance)?;
        (suggestion != cleaned).then(|| suggestion.to_string())
    }
}

/// Drops tags whose text is exactly one character long.
pub fn drop_single_character_tags(groups: Vec<TagGroup>) -> Vec<TagGroup> {
    groups
        .into_iter()
        .filter(|g| g.tag.text.chars().count() != 1)
        .collect()
}

/// Drops tags with no alphabetic character at all, such as bare
/// measurements and punctuation runs.
pub fn drop_numeric_only_tags(groups: Vec<TagGroup>) -> Vec<TagGroup> {
    groups
        .into_iter()
        .filter(|g| g.tag.text.chars().any(char::is_alphabetic))
        .collect()
}
