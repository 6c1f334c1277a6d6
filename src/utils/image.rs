//! Utility functions for loading page rasters.
//!
//! This module provides functions for loading rendered page images and
//! converting them to the grayscale format the pipeline works in. It
//! includes single and batch loading, with parallel loading when a batch
//! is large enough to benefit.

use image::{DynamicImage, GrayImage};

use crate::core::errors::{PipelineError, PipelineResult};

/// Batches larger than this are loaded in parallel.
const PARALLEL_LOAD_THRESHOLD: usize = 4;

/// Converts a DynamicImage to a GrayImage.
///
/// This function takes a DynamicImage (which can be in any format) and converts
/// it to a GrayImage (8-bit grayscale format).
///
/// # Arguments
///
/// * `img` - The DynamicImage to convert
///
/// # Returns
///
/// * `GrayImage` - The converted grayscale image
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path and converts it to GrayImage.
///
/// # Arguments
///
/// * `path` - A reference to the path of the image file to load
///
/// # Errors
///
/// This function will return a `PipelineError::ImageLoad` error if the
/// image cannot be loaded from the specified path.
pub fn load_gray_image(path: &std::path::Path) -> PipelineResult<GrayImage> {
    let img = image::open(path).map_err(PipelineError::ImageLoad)?;
    Ok(dynamic_to_gray(img))
}

/// Loads a batch of page images from file paths.
///
/// Page order follows path order. Batches beyond the parallel threshold
/// are loaded concurrently; a single unreadable file fails the whole
/// batch, since a document with a missing page cannot be processed
/// meaningfully.
///
/// # Arguments
///
/// * `paths` - A slice of paths to the image files to load
///
/// # Errors
///
/// This function will return a `PipelineError` if any image cannot be
/// loaded from its specified path.
pub fn load_gray_images<P: AsRef<std::path::Path> + Send + Sync>(
    paths: &[P],
) -> PipelineResult<Vec<GrayImage>> {
    if paths.len() > PARALLEL_LOAD_THRESHOLD {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_gray_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_gray_image(p.as_ref())).collect()
    }
}
