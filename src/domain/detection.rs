//! Detections produced by text recognition over page crops.

use serde::{Deserialize, Serialize};

use crate::processors::geometry::{Polygon, Rect};

/// Which crop of the page a detection was recognized on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionSource {
    /// The schematic figure crop.
    Figure,
    /// The table crop to the right of the figure.
    Table,
    /// The whole page, used when no region boundary was found.
    FullPage,
}

impl DetectionSource {
    /// Returns the source name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            DetectionSource::Figure => "figure",
            DetectionSource::Table => "table",
            DetectionSource::FullPage => "full_page",
        }
    }
}

/// One recognized text line, already mapped into document space.
///
/// Detections are built exactly once per recognized line, after coordinate
/// mapping, and are immutable from then on. All downstream stages group and
/// filter them without editing the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Outline of the recognized line in document coordinates.
    pub polygon: Polygon,
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    /// Zero-based index of the page the line was found on.
    pub page_index: usize,
    /// Which crop of the page produced the line.
    pub source: DetectionSource,
}

impl Detection {
    /// Axis-aligned bounding rectangle of the detection polygon.
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.polygon.bounding_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names() {
        assert_eq!(DetectionSource::Figure.name(), "figure");
        assert_eq!(DetectionSource::Table.name(), "table");
        assert_eq!(DetectionSource::FullPage.name(), "full_page");
    }

    #[test]
    fn test_bounding_rect_spans_polygon() {
        let detection = Detection {
            polygon: Polygon::from_coords(2.0, 3.0, 10.0, 8.0),
            text: "P-101A".to_string(),
            confidence: 0.9,
            page_index: 0,
            source: DetectionSource::Figure,
        };
        let rect = detection.bounding_rect().unwrap();
        assert_eq!((rect.x_min, rect.y_min, rect.x_max, rect.y_max), (2.0, 3.0, 10.0, 8.0));
    }
}
