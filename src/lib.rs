//! # drawtag
//!
//! A Rust library that extracts identification tags from rendered
//! engineering drawings. Pages are segmented into a schematic figure and
//! its adjoining table, recognized text is mapped back into document
//! coordinates, and multi-line labels are merged, filtered, and corrected
//! into the tags that get persisted.
//!
//! ## Features
//!
//! - Contour-based localization of the figure boundary and table area
//! - Whole-page fallback when a drawing has no usable border
//! - Detection merging by bounding-box connectivity for multi-line labels
//! - Filter chain with dictionary spell correction over recognized text
//! - Per-document atomic tag replacement, so reprocessing supersedes
//! - Parallel page processing for multi-page documents
//!
//! ## Components
//!
//! - **Region Extraction**: Locate the figure and table on each page
//! - **Coordinate Mapping**: Reconcile crop, page, and document space
//! - **Detection Merging**: Assemble stacked detections into tags
//! - **Tag Filtering**: Drop noise and spell-correct the survivors
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, and collaborator traits
//! * [`domain`] - Domain types for pages, regions, detections, and tags
//! * [`pipeline`] - Document orchestration, tag filtering, and evaluation
//! * [`processors`] - Segmentation, merging, and correction algorithms
//! * [`storage`] - In-memory tag storage
//! * [`utils`] - Image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use drawtag::prelude::*;
//!
//! struct MyEngine;
//!
//! impl OcrEngine for MyEngine {
//!     fn recognize(
//!         &self,
//!         _raster: &image::GrayImage,
//!     ) -> PipelineResult<Vec<RawDetection>> {
//!         // Call into your OCR model here.
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dictionary = SpellDictionary::global(Path::new("dictionary.json"))?;
//! let pipeline = DocumentPipeline::new(
//!     PipelineConfig::default(),
//!     MyEngine,
//!     InMemoryTagStore::new(),
//!     dictionary,
//! )?;
//!
//! let pages = load_gray_images(&["page_1.png", "page_2.png"])?;
//! let summary = pipeline.process_document(DocumentId(7), pages)?;
//! println!("{} tags from {} pages", summary.tags, summary.pages_processed);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;

pub mod pipeline;
pub mod processors;
pub mod storage;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use drawtag::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - Pipeline (`DocumentPipeline`, `DocumentSummary`, `PipelineConfig`)
/// - Collaborator traits (`OcrEngine`, `TagStore`, `RawDetection`)
/// - Domain types (`DocumentId`, `Tag`, `TagGroup`, `Detection`)
/// - Essential error and result types (`PipelineError`, `PipelineResult`)
/// - Dictionary and storage (`SpellDictionary`, `InMemoryTagStore`)
/// - Basic image loading (`load_gray_image`, `load_gray_images`)
///
/// For tuning and the individual algorithm stages, import directly from
/// the respective modules (e.g., `drawtag::processors`,
/// `drawtag::pipeline::evaluation`).
pub mod prelude {
    // Pipeline (essential)
    pub use crate::pipeline::{DocumentPipeline, DocumentSummary, TagFilterPipeline};

    // Configuration
    pub use crate::core::{PipelineConfig, RegionConfig, SpellConfig};

    // Collaborator traits
    pub use crate::core::{OcrEngine, RawDetection, TagStore};

    // Domain types
    pub use crate::domain::{Detection, DetectionSource, DocumentId, Tag, TagGroup};

    // Error Handling (essential)
    pub use crate::core::{PipelineError, PipelineResult};

    // Dictionary and storage
    pub use crate::processors::SpellDictionary;
    pub use crate::storage::InMemoryTagStore;

    // Image Utility (minimal)
    pub use crate::utils::{load_gray_image, load_gray_images};
}
