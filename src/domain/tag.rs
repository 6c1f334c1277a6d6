//! Tags assembled from merged detections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::processors::geometry::Rect;

use super::detection::Detection;

/// Identifier of a source document, assigned by the embedding system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logical label assembled from one or more detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Member texts joined top-to-bottom with single spaces.
    pub text: String,
    /// Rectangle spanning every member polygon point, in document space.
    pub bbox: Rect,
    /// Minimum confidence over the member detections.
    pub confidence: f32,
    /// Whether the text looks like an equipment identifier.
    pub equipment_tag: bool,
}

/// A tag together with the detections it was assembled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagGroup {
    /// The assembled tag.
    pub tag: Tag,
    /// Member detections, ordered top-to-bottom.
    pub members: Vec<Detection>,
}

/// Whether `text` looks like an equipment identifier.
///
/// A text qualifies when it contains at least one letter, at least one
/// decimal digit, and at least one hyphen, as in `P-101A` or `HV-2031`.
pub fn resolve_is_equipment_tag(text: &str) -> bool {
    let has_letter = text.chars().any(char::is_alphabetic);
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit && text.contains('-')
}
