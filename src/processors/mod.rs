//! Processing algorithms for locating and assembling tags.
//!
//! This module provides the algorithmic stages of the extraction
//! pipeline: segmenting a page into figure and table regions, mapping
//! coordinates between crop, page, and document space, merging detections
//! into tags, and correcting recognized text against a dictionary.
//!
//! # Modules
//!
//! * `contours` - Contour discovery and selection for boundary detection
//! * `coordinate` - Coordinate mapping between crop and document space
//! * `geometry` - Geometric primitives shared across the pipeline
//! * `merge` - Merging detections into tags by bounding-box connectivity
//! * `region_extract` - Figure and table localization on prepared pages
//! * `spell` - Dictionary-backed spell correction

pub mod contours;
pub mod coordinate;
pub mod geometry;
pub mod merge;
pub mod region_extract;
pub mod spell;

pub use contours::*;
pub use coordinate::*;
pub use geometry::*;
pub use merge::*;
pub use region_extract::*;
pub use spell::*;
