//! Contour discovery and selection for page boundary detection.
//!
//! Engineering drawings carry a family of nested rectangular borders
//! around the schematic figure. Boundary detection binarizes the page,
//! traces every outer and hole contour, filters out scan artifacts, then
//! groups the largest survivors into a primary candidate family whose
//! innermost member encloses the figure.

use image::GrayImage;
use imageproc::contours::{Contour, find_contours};
use imageproc::contrast::{ThresholdType, threshold};
use itertools::Itertools;

use crate::processors::geometry::{PixelRect, Polygon};

/// Areas at or below this are treated as zero when forming ratios.
const AREA_EPSILON: f32 = 1e-6;

/// A traced contour reduced to the measurements boundary selection needs.
#[derive(Debug, Clone)]
pub struct ContourData {
    /// Polygon over the traced boundary pixels.
    pub polygon: Polygon,
    /// Enclosed area in pixels, from the shoelace formula.
    pub area: f32,
    /// Pixel-space bounding rectangle of the boundary.
    pub rect: PixelRect,
}

/// Binarizes a grayscale raster; pixels above `cutoff` become white.
pub fn binarize(raster: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(raster, cutoff, ThresholdType::Binary)
}

/// Traces every outer and hole contour of a binarized raster.
pub fn trace_contours(binary: &GrayImage) -> Vec<ContourData> {
    find_contours::<u32>(binary)
        .iter()
        .filter_map(contour_data)
        .collect()
}

fn contour_data(contour: &Contour<u32>) -> Option<ContourData> {
    let (min_x, max_x) = contour.points.iter().map(|p| p.x).minmax().into_option()?;
    let (min_y, max_y) = contour.points.iter().map(|p| p.y).minmax().into_option()?;
    let polygon = Polygon::from_contour(contour);
    let area = polygon.area();
    Some(ContourData {
        polygon,
        area,
        rect: PixelRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
    })
}

/// The whole-image contour substituted when tracing finds nothing.
///
/// It still runs through artifact filtering, so at a non-zero edge margin
/// it is discarded like any other edge-hugging contour.
pub fn whole_image_contour(width: u32, height: u32) -> ContourData {
    ContourData {
        polygon: Polygon::from_coords(0.0, 0.0, width as f32, height as f32),
        area: width as f32 * height as f32,
        rect: PixelRect::new(0, 0, width, height),
    }
}

/// Discards contours that are too small or hug the image edges.
///
/// A contour survives when its area is at least `min_area_ratio` of the
/// image area and its bounding rectangle stays `edge_margin_ratio` of the
/// respective dimension away from every image edge.
pub fn filter_artifacts(
    contours: Vec<ContourData>,
    width: u32,
    height: u32,
    min_area_ratio: f32,
    edge_margin_ratio: f32,
) -> Vec<ContourData> {
    let min_area = min_area_ratio * width as f32 * height as f32;
    let margin_x = edge_margin_ratio * width as f32;
    let margin_y = edge_margin_ratio * height as f32;

    let mut surviving = Vec::new();
    for contour in contours {
        if contour.area < min_area {
            continue;
        }
        let rect = contour.rect;
        if (rect.x as f32) < margin_x
            || (rect.y as f32) < margin_y
            || (rect.right() as f32) > width as f32 - margin_x
            || (rect.bottom() as f32) > height as f32 - margin_y
        {
            continue;
        }
        surviving.push(contour);
    }
    surviving
}

/// Sorts contours by enclosed area, largest first.
pub fn sort_by_area_desc(mut contours: Vec<ContourData>) -> Vec<ContourData> {
    contours.sort_by(|a, b| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    contours
}

/// Length of the primary candidate prefix of an area-descending list.
///
/// Starting from the largest area, the group keeps absorbing the next one
/// while the consecutive area ratio stays below `drop_off_ratio`.
/// Absorption stops at the first meaningful drop or when the next area is
/// effectively zero. A zero-area leader forms no group at all.
pub fn primary_group_len(areas: &[f32], drop_off_ratio: f32) -> usize {
    let Some(&first) = areas.first() else {
        return 0;
    };
    if first <= AREA_EPSILON {
        return 0;
    }
    let mut len = 1;
    while len < areas.len() {
        let next = areas[len];
        if next <= AREA_EPSILON {
            break;
        }
        if areas[len - 1] / next >= drop_off_ratio {
            break;
        }
        len += 1;
    }
    len
}

/// The innermost member of a candidate group, by smallest enclosed area.
pub fn innermost(candidates: &[ContourData]) -> Option<&ContourData> {
    candidates.iter().min_by(|a, b| {
        a.area
            .partial_cmp(&b.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
