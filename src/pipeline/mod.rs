//! The document pipeline module.
//!
//! This module provides the orchestration that drives a drawing document
//! through region extraction, recognition, merging, and tag filtering,
//! plus the recall evaluation used to track extraction quality.

pub mod document;
pub mod evaluation;
pub mod postprocess;

// Re-export the main pipeline components for easier access
pub use document::{DocumentPipeline, DocumentSummary};
pub use evaluation::tag_recall;
pub use postprocess::{TagFilterPipeline, drop_numeric_only_tags, drop_single_character_tags};
