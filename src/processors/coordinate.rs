//! Coordinate reconciliation between crop, page, and document space.
//!
//! Pages are rasterized at `render_scale` times the document resolution
//! and then cropped per region, so detections arrive in crop-local pixels.
//! Persisted coordinates are document-space: the crop offset is applied in
//! rendered-page pixels first, then the result is divided by the render
//! scale. The inverse mapping runs the two steps in the opposite order.

use crate::core::errors::{PipelineError, PipelineResult};
use crate::processors::geometry::Polygon;

/// Maps detection geometry between crop-local and document coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    render_scale: f32,
}

impl CoordinateMapper {
    /// Creates a mapper for pages rendered at the given upscale factor.
    pub fn new(render_scale: f32) -> PipelineResult<Self> {
        if !render_scale.is_finite() || render_scale <= 0.0 {
            return Err(PipelineError::config_error(format!(
                "render_scale must be a positive finite number, got {render_scale}"
            )));
        }
        Ok(Self { render_scale })
    }

    /// The upscale factor the mapper divides by.
    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    /// Maps a crop-local polygon into document space.
    ///
    /// The offset translation happens before the division; the two steps
    /// do not commute.
    pub fn to_document_space(&self, polygon: &Polygon, offset: (u32, u32)) -> Polygon {
        polygon
            .translated(offset.0 as f32, offset.1 as f32)
            .scaled(1.0 / self.render_scale)
    }

    /// Maps a document-space polygon back into crop-local coordinates.
    pub fn to_rendered_space(&self, polygon: &Polygon, offset: (u32, u32)) -> Polygon {
        polygon
            .scaled(self.render_scale)
            .translated(-(offset.0 as f32), -(offset.1 as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_applies_before_scaling() {
        let mapper = CoordinateMapper::new(4.0).unwrap();
        let polygon = Polygon::from_coords(10.0, 20.0, 30.0, 40.0);
        let mapped = mapper.to_document_space(&polygon, (100, 40));
        // (10 + 100) / 4 and (20 + 40) / 4, not 10 / 4 + 100.
        assert_eq!(mapped.points[0].x, 27.5);
        assert_eq!(mapped.points[0].y, 15.0);
        assert_eq!(mapped.points[2].x, 32.5);
        assert_eq!(mapped.points[2].y, 20.0);
    }

    #[test]
    fn test_round_trip_restores_coordinates() {
        let mapper = CoordinateMapper::new(4.0).unwrap();
        let polygon = Polygon::from_coords(3.0, 7.0, 91.0, 55.0);
        let there = mapper.to_document_space(&polygon, (17, 23));
        let back = mapper.to_rendered_space(&there, (17, 23));
        for (original, restored) in polygon.points.iter().zip(back.points.iter()) {
            assert!((original.x - restored.x).abs() < 1e-4);
            assert!((original.y - restored.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unit_scale_only_translates() {
        let mapper = CoordinateMapper::new(1.0).unwrap();
        let polygon = Polygon::from_coords(0.0, 0.0, 10.0, 10.0);
        let mapped = mapper.to_document_space(&polygon, (5, 6));
        assert_eq!(mapped.points[0].x, 5.0);
        assert_eq!(mapped.points[0].y, 6.0);
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(CoordinateMapper::new(0.0).is_err());
        assert!(CoordinateMapper::new(-2.0).is_err());
        assert!(CoordinateMapper::new(f32::NAN).is_err());
    }
}
