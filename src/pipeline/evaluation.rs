//! Recall evaluation of extracted tags against verified truth labels.

use std::collections::HashSet;

use crate::domain::tag::Tag;

/// Fraction of `truth` labels found among the extracted tags.
///
/// Both sides are trimmed and uppercased before comparison, so casing and
/// stray whitespace never count against the extraction. An empty truth
/// set scores 1.0.
pub fn tag_recall<S: AsRef<str>>(truth: &[S], tags: &[Tag]) -> f32 {
    if truth.is_empty() {
        return 1.0;
    }
    let extracted: HashSet<String> = tags.iter().map(|tag| normalize(&tag.text)).collect();
    let hits = truth
        .iter()
        .filter(|label| extracted.contains(&normalize(label.as_ref())))
        .count();
    hits as f32 / truth.len() as f32
}

fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}
