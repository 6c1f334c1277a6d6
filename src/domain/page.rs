//! Page rasters and their preparation for processing.
//!
//! Engineering drawings are landscape documents; rasters arriving in
//! portrait orientation are rotated a quarter turn before any region is
//! located or any detection produced, never after. Rasters are also padded
//! so both dimensions are multiples of the detector stride, with black
//! fill on the right and bottom edges only, so page coordinates of the
//! original content are unaffected.

use image::{GrayImage, imageops};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{PipelineError, PipelineResult};

/// Rotation applied to a page raster during landscape normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRotation {
    /// The raster was already landscape and was left untouched.
    Upright,
    /// The raster was portrait and was rotated 90 degrees counter-clockwise.
    QuarterTurn,
}

/// A page raster normalized for processing, with the applied rotation
/// recorded.
#[derive(Debug, Clone)]
pub struct PageImage {
    raster: GrayImage,
    rotation: PageRotation,
}

impl PageImage {
    /// Wraps a rendered page raster, rotating portrait pages to landscape.
    ///
    /// # Arguments
    ///
    /// * `raster` - The grayscale page raster as rendered.
    ///
    /// # Returns
    ///
    /// A landscape-normalized page, or an error for a zero-sized raster.
    pub fn from_raster(raster: GrayImage) -> PipelineResult<Self> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::invalid_input(
                "page raster has zero width or height",
            ));
        }
        if height > width {
            debug!(width, height, "rotating portrait page to landscape");
            Ok(Self {
                raster: imageops::rotate270(&raster),
                rotation: PageRotation::QuarterTurn,
            })
        } else {
            Ok(Self {
                raster,
                rotation: PageRotation::Upright,
            })
        }
    }

    /// Pads the raster with black so both dimensions are multiples of
    /// `stride`.
    ///
    /// Content keeps its position; only the right and bottom edges grow.
    /// A raster already aligned to `stride` is returned unchanged.
    pub fn padded_to_multiple_of(self, stride: u32) -> Self {
        if stride == 0 {
            return self;
        }
        let (width, height) = self.raster.dimensions();
        let padded_width = width.next_multiple_of(stride);
        let padded_height = height.next_multiple_of(stride);
        if padded_width == width && padded_height == height {
            return self;
        }
        debug!(
            width,
            height, padded_width, padded_height, "padding page raster to stride"
        );
        let mut padded = GrayImage::new(padded_width, padded_height);
        imageops::replace(&mut padded, &self.raster, 0, 0);
        Self {
            raster: padded,
            rotation: self.rotation,
        }
    }

    /// Width of the prepared raster.
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height of the prepared raster.
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The prepared raster.
    pub fn raster(&self) -> &GrayImage {
        &self.raster
    }

    /// The rotation applied during normalization.
    pub fn rotation(&self) -> PageRotation {
        self.rotation
    }

    /// Consumes the page and returns the raster.
    pub fn into_raster(self) -> GrayImage {
        self.raster
    }
}
