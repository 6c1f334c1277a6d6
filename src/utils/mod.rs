//! Utility functions for the extraction pipeline.
//!
//! This module provides the image loading helpers used to feed page
//! rasters into the pipeline.

pub mod image;

// Re-export image loading functions
pub use image::{dynamic_to_gray, load_gray_image, load_gray_images};
