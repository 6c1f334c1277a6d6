//! Collaborator traits at the edges of the pipeline.
//!
//! Text recognition and tag persistence live behind narrow traits so that
//! embedders can plug in a real OCR model and datastore while tests use
//! lightweight stand-ins. Both collaborators are shared across page-level
//! parallelism and must be callable from multiple threads.

use std::sync::Arc;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::core::errors::PipelineResult;
use crate::domain::{DocumentId, TagGroup};
use crate::processors::geometry::Polygon;

/// A raw text line returned by recognition, in coordinates local to the
/// raster it was recognized on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Outline of the recognized line in raster-local pixels.
    pub polygon: Polygon,
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Text recognition over a raster.
///
/// Implementations return one entry per recognized text line, or an empty
/// vector when the raster holds no readable text. Recognition errors are
/// reported through the result; callers decide whether a failed crop fails
/// the page.
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text lines on `raster`.
    fn recognize(&self, raster: &GrayImage) -> PipelineResult<Vec<RawDetection>>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for Arc<T> {
    fn recognize(&self, raster: &GrayImage) -> PipelineResult<Vec<RawDetection>> {
        (**self).recognize(raster)
    }
}

/// Persistence of extracted tags, keyed by document.
///
/// `replace_document_tags` must be atomic with respect to readers: a
/// concurrent reader observes either the previous tag set or the new one in
/// full, never an empty or partial intermediate state. Repeating a
/// replacement with the same groups must leave the store unchanged.
pub trait TagStore: Send + Sync {
    /// Atomically replaces every tag stored for `document` with `groups`.
    fn replace_document_tags(
        &self,
        document: DocumentId,
        groups: Vec<TagGroup>,
    ) -> PipelineResult<()>;
}

impl<T: TagStore + ?Sized> TagStore for Arc<T> {
    fn replace_document_tags(
        &self,
        document: DocumentId,
        groups: Vec<TagGroup>,
    ) -> PipelineResult<()> {
        (**self).replace_document_tags(document, groups)
    }
}
