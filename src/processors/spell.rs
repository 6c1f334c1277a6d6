//! Dictionary-backed spell correction for recognized text.
//!
//! The dictionary is a JSON object mapping terms to corpus frequencies,
//! built offline from the vocabulary of previously verified drawings.
//! Loading is the expensive part, so a process may hold one shared
//! instance in the global cell; lookups are read-only scans ranked by
//! edit distance, then frequency.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::core::errors::PipelineResult;

static GLOBAL_DICTIONARY: OnceCell<Arc<SpellDictionary>> = OnceCell::new();

/// One dictionary entry with its precomputed comparison key.
#[derive(Debug, Clone)]
struct DictionaryTerm {
    term: String,
    term_upper: String,
    term_chars: usize,
    frequency: u64,
}

/// A read-only word-frequency dictionary.
#[derive(Debug)]
pub struct SpellDictionary {
    terms: Vec<DictionaryTerm>,
}

impl SpellDictionary {
    /// Builds a dictionary from term and frequency pairs.
    pub fn from_terms<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut terms: Vec<DictionaryTerm> = entries
            .into_iter()
            .map(|(term, frequency)| {
                let term = term.into();
                DictionaryTerm {
                    term_upper: term.to_uppercase(),
                    term_chars: term.chars().count(),
                    term,
                    frequency,
                }
            })
            .collect();
        // Term order breaks remaining ties so ranking is deterministic.
        terms.sort_by(|a, b| a.term.cmp(&b.term));
        Self { terms }
    }

    /// Loads a dictionary from a JSON word-frequency file.
    ///
    /// The file holds a single object mapping each term to its frequency,
    /// for example `{"VALVE": 812, "PUMP": 407}`.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)?;
        let frequencies: HashMap<String, u64> = serde_json::from_reader(BufReader::new(file))?;
        info!(
            terms = frequencies.len(),
            path = %path.display(),
            "loaded spell dictionary"
        );
        Ok(Self::from_terms(frequencies))
    }

    /// Returns the process-wide dictionary, loading it on first use.
    ///
    /// The first caller's `path` wins; later calls return the cached
    /// instance regardless of the path they pass.
    pub fn global(path: &Path) -> PipelineResult<Arc<SpellDictionary>> {
        let dictionary =
            GLOBAL_DICTIONARY.get_or_try_init(|| Self::from_file(path).map(Arc::new))?;
        Ok(Arc::clone(dictionary))
    }

    /// Number of terms in the dictionary.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `word` is a dictionary term, compared case-insensitively.
    pub fn contains(&self, word: &str) -> bool {
        let upper = word.to_uppercase();
        self.terms.iter().any(|t| t.term_upper == upper)
    }

    /// Finds the best correction for `word` within `max_edit_distance`.
    ///
    /// Candidates are ranked by edit distance, then by higher frequency,
    /// then by term order. Distances are measured case-insensitively and
    /// the suggestion keeps the dictionary's casing. Returns `None` when
    /// no term is close enough.
    pub fn best_correction(&self, word: &str, max_edit_distance: usize) -> Option<&str> {
        let upper = word.to_uppercase();
        let word_chars = upper.chars().count();
        let mut best: Option<(usize, &DictionaryTerm)> = None;
        for term in &self.terms {
            // Edit distance is at least the length difference.
            if term.term_chars.abs_diff(word_chars) > max_edit_distance {
                continue;
            }
            let distance = strsim::levenshtein(&upper, &term.term_upper);
            if distance > max_edit_distance {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_distance, best_term)) => {
                    distance < best_distance
                        || (distance == best_distance && term.frequency > best_term.frequency)
                }
            };
            if better {
                best = Some((distance, term));
            }
        }
        best.map(|(_, term)| term.term.as_str())
    }
}
