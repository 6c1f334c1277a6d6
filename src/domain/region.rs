//! Regions located on a page and the outcome of boundary detection.

use image::GrayImage;

use crate::processors::geometry::PixelRect;

/// The kind of sub-region extracted from a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// The schematic figure inside the innermost page border.
    Figure,
    /// The tabular area to the right of the figure.
    Table,
}

impl RegionKind {
    /// Returns the region kind as a string.
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Figure => "figure",
            RegionKind::Table => "table",
        }
    }
}

/// An extracted sub-region of a page.
///
/// Regions are ephemeral: they live for one page's processing call and are
/// never persisted. The crop may be tighter than `bbox` when padding was
/// applied or the bounds were clamped to the page.
#[derive(Debug, Clone)]
pub struct Region {
    /// What the region contains.
    pub kind: RegionKind,
    /// Bounding box of the region in page space, before crop padding.
    pub bbox: PixelRect,
    /// The cropped raster handed to text recognition.
    pub crop: GrayImage,
    /// Top-left corner of the crop in page space, after padding and
    /// clamping.
    pub offset: (u32, u32),
}

/// How the figure boundary was found, if at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryOutcome {
    /// The innermost contour of the primary candidate group.
    InnerBoundary {
        /// Enclosed area of the selected contour in pixels.
        area: f32,
    },
    /// No primary candidate group formed; the largest surviving contour
    /// was used instead.
    LargestContour {
        /// Enclosed area of the selected contour in pixels.
        area: f32,
    },
    /// No usable contour at all; callers should recognize the whole page.
    NotFound,
}

impl BoundaryOutcome {
    /// Whether any boundary was selected.
    pub fn is_found(&self) -> bool {
        !matches!(self, BoundaryOutcome::NotFound)
    }

    /// Whether the outcome used the degraded largest-contour fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, BoundaryOutcome::LargestContour { .. })
    }
}

/// The result of region extraction over one page.
#[derive(Debug, Clone)]
pub struct RegionExtraction {
    /// The figure region, if a usable crop was produced.
    pub figure: Option<Region>,
    /// The table region, if a usable crop was produced.
    pub table: Option<Region>,
    /// How the figure boundary was selected.
    pub boundary: BoundaryOutcome,
}

impl RegionExtraction {
    /// An extraction with no regions and no boundary.
    pub fn not_found() -> Self {
        Self {
            figure: None,
            table: None,
            boundary: BoundaryOutcome::NotFound,
        }
    }

    /// Whether the caller must fall back to recognizing the whole page.
    pub fn needs_full_page_fallback(&self) -> bool {
        self.figure.is_none() && self.table.is_none()
    }

    /// Iterates over the regions that produced a crop, figure first.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.figure.iter().chain(self.table.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_needs_fallback() {
        let extraction = RegionExtraction::not_found();
        assert!(extraction.needs_full_page_fallback());
        assert!(!extraction.boundary.is_found());
        assert_eq!(extraction.regions().count(), 0);
    }

    #[test]
    fn test_single_region_does_not_need_fallback() {
        let extraction = RegionExtraction {
            figure: None,
            table: Some(Region {
                kind: RegionKind::Table,
                bbox: PixelRect::new(10, 10, 20, 20),
                crop: GrayImage::new(20, 20),
                offset: (10, 10),
            }),
            boundary: BoundaryOutcome::InnerBoundary { area: 400.0 },
        };
        assert!(!extraction.needs_full_page_fallback());
        assert_eq!(extraction.regions().count(), 1);
    }

    #[test]
    fn test_boundary_outcome_flags() {
        assert!(BoundaryOutcome::InnerBoundary { area: 1.0 }.is_found());
        assert!(!BoundaryOutcome::InnerBoundary { area: 1.0 }.is_degraded());
        assert!(BoundaryOutcome::LargestContour { area: 1.0 }.is_degraded());
        assert!(!BoundaryOutcome::NotFound.is_found());
    }
}
