//! Domain-level values flowing through the extraction pipeline.
//!
//! This module groups the types that represent a drawing as it is
//! processed: prepared page rasters, regions located on them, the
//! detections recognized inside those regions, and the tags assembled
//! from the detections.

pub mod detection;
pub mod page;
pub mod region;
pub mod tag;

pub use detection::*;
pub use page::*;
pub use region::*;
pub use tag::*;
