//! Figure and table localization on prepared pages.
//!
//! A drawing page carries the schematic figure inside a family of nested
//! rectangular borders, with a tabular legend occupying the remaining
//! width to the right. The extractor binarizes the page, selects the
//! figure boundary from the traced contours, derives the table bounds from
//! the figure, and produces padded crops for recognition. Either region
//! can be absent; the caller decides what a partial result means.

use image::{GrayImage, imageops};
use tracing::debug;

use crate::core::config::{ConfigValidatorExt, RegionConfig};
use crate::core::errors::PipelineResult;
use crate::domain::page::PageImage;
use crate::domain::region::{BoundaryOutcome, Region, RegionExtraction, RegionKind};
use crate::processors::contours::{
    ContourData, binarize, filter_artifacts, innermost, primary_group_len, sort_by_area_desc,
    trace_contours, whole_image_contour,
};
use crate::processors::geometry::PixelRect;

/// Locates the schematic figure and the adjoining table on a page.
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    config: RegionConfig,
}

impl RegionExtractor {
    /// Creates an extractor with validated configuration.
    pub fn new(config: RegionConfig) -> PipelineResult<Self> {
        Ok(Self {
            config: config.validate_and_wrap()?,
        })
    }

    /// Runs boundary detection and cropping over a prepared page.
    ///
    /// The returned extraction always reports how the boundary was chosen.
    /// A figure boundary that cannot be found leaves both regions empty;
    /// a found boundary may still yield partial crops when the derived
    /// bounds are degenerate.
    pub fn extract(&self, page: &PageImage) -> RegionExtraction {
        let (width, height) = (page.width(), page.height());
        let binary = binarize(page.raster(), self.config.binarize_threshold);

        let mut contours = trace_contours(&binary);
        if contours.is_empty() {
            debug!("no contours traced, substituting whole-image contour");
            contours.push(whole_image_contour(width, height));
        }
        let surviving = filter_artifacts(
            contours,
            width,
            height,
            self.config.min_area_ratio,
            self.config.edge_margin_ratio,
        );

        let (figure_rect, boundary) = self.select_boundary(surviving);
        let Some(figure_rect) = figure_rect else {
            debug!("no figure boundary found");
            return RegionExtraction::not_found();
        };

        let figure = self.crop_region(page.raster(), figure_rect, RegionKind::Figure);
        let table = table_rect(figure_rect, width)
            .and_then(|rect| self.crop_region(page.raster(), rect, RegionKind::Table));
        debug!(
            boundary = ?boundary,
            figure = figure.is_some(),
            table = table.is_some(),
            "region extraction complete"
        );
        RegionExtraction {
            figure,
            table,
            boundary,
        }
    }

    /// Picks the figure boundary from the surviving contours.
    fn select_boundary(
        &self,
        surviving: Vec<ContourData>,
    ) -> (Option<PixelRect>, BoundaryOutcome) {
        if surviving.is_empty() {
            return (None, BoundaryOutcome::NotFound);
        }
        let sorted = sort_by_area_desc(surviving);
        let areas: Vec<f32> = sorted.iter().map(|c| c.area).collect();
        let group_len = primary_group_len(&areas, self.config.area_drop_off_ratio);
        if group_len == 0 {
            let largest = &sorted[0];
            debug!(
                area = largest.area,
                "no primary candidate group, using largest surviving contour"
            );
            return (
                Some(largest.rect),
                BoundaryOutcome::LargestContour {
                    area: largest.area,
                },
            );
        }
        match innermost(&sorted[..group_len]) {
            Some(inner) => (
                Some(inner.rect),
                BoundaryOutcome::InnerBoundary { area: inner.area },
            ),
            None => (None, BoundaryOutcome::NotFound),
        }
    }

    /// Crops a region window out of the page raster.
    ///
    /// The window is the region rectangle inset by the configured padding
    /// and clamped to the raster. When padding or clamping collapses the
    /// window, the crop is retried without padding; a rectangle that is
    /// degenerate even unpadded yields no region.
    fn crop_region(
        &self,
        raster: &GrayImage,
        rect: PixelRect,
        kind: RegionKind,
    ) -> Option<Region> {
        let (width, height) = raster.dimensions();
        let window = rect
            .inset(self.config.crop_padding)
            .and_then(|r| r.clamp_to(width, height))
            .or_else(|| rect.clamp_to(width, height))?;
        let crop = imageops::crop_imm(raster, window.x, window.y, window.w, window.h).to_image();
        debug!(
            kind = kind.name(),
            x = window.x,
            y = window.y,
            w = window.w,
            h = window.h,
            "cropped region"
        );
        Some(Region {
            kind,
            bbox: rect,
            crop,
            offset: (window.x, window.y),
        })
    }
}

/// The table occupies the full remaining width to the right of the figure,
/// over the same rows. A figure reaching the right edge leaves no table.
fn table_rect(figure: PixelRect, image_width: u32) -> Option<PixelRect> {
    let x = figure.right();
    if x >= image_width {
        return None;
    }
    Some(PixelRect::new(x, figure.y, image_width - x, figure.h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn page_with_borders() -> PageImage {
        // A nested pair of borders around the figure plus a much smaller
        // content rectangle inside it.
        let mut raster = GrayImage::new(400, 300);
        draw_hollow_rect_mut(&mut raster, Rect::at(50, 40).of_size(300, 220), Luma([255u8]));
        draw_hollow_rect_mut(&mut raster, Rect::at(100, 90).of_size(100, 60), Luma([255u8]));
        PageImage::from_raster(raster).unwrap()
    }

    #[test]
    fn test_extracts_inner_boundary_and_table() {
        let extractor = RegionExtractor::new(RegionConfig::default()).unwrap();
        let extraction = extractor.extract(&page_with_borders());

        match extraction.boundary {
            BoundaryOutcome::InnerBoundary { area } => {
                // The hole border of the outer ring, not the small content
                // rectangle excluded by the area drop-off.
                assert!(area > 20_000.0, "selected area {area} is too small");
            }
            other => panic!("expected inner boundary, got {other:?}"),
        }

        let figure = extraction.figure.as_ref().unwrap();
        assert_eq!(figure.kind, RegionKind::Figure);
        // The hole border sits one pixel inside the drawn ring.
        assert!((50..=52).contains(&figure.bbox.x));
        assert!((40..=42).contains(&figure.bbox.y));
        assert!((296..=300).contains(&figure.bbox.w));
        assert!((216..=220).contains(&figure.bbox.h));
        // Crop window is the bounding box inset by the default padding.
        assert_eq!(figure.offset, (figure.bbox.x + 5, figure.bbox.y + 5));
        assert_eq!(figure.crop.width(), figure.bbox.w - 10);
        assert_eq!(figure.crop.height(), figure.bbox.h - 10);

        let table = extraction.table.as_ref().unwrap();
        assert_eq!(table.kind, RegionKind::Table);
        assert_eq!(table.bbox.x, figure.bbox.right());
        assert_eq!(table.bbox.y, figure.bbox.y);
        assert_eq!(table.bbox.w, 400 - figure.bbox.right());
        assert_eq!(table.bbox.h, figure.bbox.h);
        assert!(!extraction.needs_full_page_fallback());
    }

    #[test]
    fn test_blank_page_finds_nothing_at_default_margin() {
        let extractor = RegionExtractor::new(RegionConfig::default()).unwrap();
        let page = PageImage::from_raster(GrayImage::new(400, 300)).unwrap();
        let extraction = extractor.extract(&page);
        assert_eq!(extraction.boundary, BoundaryOutcome::NotFound);
        assert!(extraction.needs_full_page_fallback());
    }

    #[test]
    fn test_blank_page_uses_whole_image_at_zero_margin() {
        let config = RegionConfig::default().with_edge_margin_ratio(0.0);
        let extractor = RegionExtractor::new(config).unwrap();
        let page = PageImage::from_raster(GrayImage::new(400, 300)).unwrap();
        let extraction = extractor.extract(&page);

        assert!(matches!(
            extraction.boundary,
            BoundaryOutcome::InnerBoundary { .. }
        ));
        let figure = extraction.figure.as_ref().unwrap();
        assert_eq!(figure.bbox, PixelRect::new(0, 0, 400, 300));
        // The figure spans the page, so no table remains.
        assert!(extraction.table.is_none());
    }

    #[test]
    fn test_crop_content_aligns_with_offset() {
        let mut raster = GrayImage::new(400, 300);
        draw_hollow_rect_mut(&mut raster, Rect::at(50, 40).of_size(300, 220), Luma([255u8]));
        // A marker inside the figure; far too small to survive filtering.
        raster.put_pixel(200, 150, Luma([255u8]));
        let page = PageImage::from_raster(raster).unwrap();

        let extractor = RegionExtractor::new(RegionConfig::default()).unwrap();
        let extraction = extractor.extract(&page);
        let figure = extraction.figure.unwrap();
        let (ox, oy) = figure.offset;
        assert_eq!(figure.crop.get_pixel(200 - ox, 150 - oy), &Luma([255u8]));
    }

    #[test]
    fn test_thin_rect_falls_back_to_unpadded_crop() {
        let extractor = RegionExtractor::new(RegionConfig::default()).unwrap();
        let raster = GrayImage::new(100, 100);
        // Too thin for the default padding of 5 on each side.
        let rect = PixelRect::new(10, 10, 80, 8);
        let region = extractor
            .crop_region(&raster, rect, RegionKind::Figure)
            .unwrap();
        assert_eq!(region.offset, (10, 10));
        assert_eq!((region.crop.width(), region.crop.height()), (80, 8));
    }

    #[test]
    fn test_table_rect_derivation() {
        assert_eq!(
            table_rect(PixelRect::new(51, 41, 298, 218), 400),
            Some(PixelRect::new(349, 41, 51, 218))
        );
        // A figure spanning the full width leaves no table.
        assert_eq!(table_rect(PixelRect::new(0, 0, 400, 300), 400), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RegionConfig::default().with_area_drop_off_ratio(0.5);
        assert!(RegionExtractor::new(config).is_err());
    }
}
