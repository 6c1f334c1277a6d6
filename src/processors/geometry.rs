//! Geometric primitives for the tag-extraction pipeline.
//!
//! Detections carry quadrilateral outlines in floating-point coordinates
//! (crop-local, rendered-page, or document space), while region extraction
//! works with integer pixel rectangles on the page raster. This module
//! provides both families and the conversions between them.

use imageproc::contours::Contour;
use imageproc::point::Point as ImageProcPoint;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a point from an imageproc contour point.
    pub fn from_imageproc_point(p: ImageProcPoint<u32>) -> Self {
        Self {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

/// A closed polygon given by its vertices, usually a detection quadrilateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon, in drawing order.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new polygon from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned rectangular polygon from corner coordinates.
    ///
    /// # Arguments
    ///
    /// * `x1` - The x-coordinate of the top-left corner.
    /// * `y1` - The y-coordinate of the top-left corner.
    /// * `x2` - The x-coordinate of the bottom-right corner.
    /// * `y2` - The y-coordinate of the bottom-right corner.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let points = vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ];
        Self { points }
    }

    /// Creates a polygon from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::from_imageproc_point(*p))
            .collect();
        Self { points }
    }

    /// Calculates the area of the polygon using the shoelace formula.
    ///
    /// # Returns
    ///
    /// The enclosed area. Returns 0.0 for polygons with fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Computes the axis-aligned bounding rectangle of the polygon.
    ///
    /// # Returns
    ///
    /// The rectangle spanning the min/max x and y over all vertices, or
    /// `None` for an empty polygon.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }

    /// Returns a copy of the polygon with `dx`/`dy` added to every vertex.
    pub fn translated(&self, dx: f32, dy: f32) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }

    /// Returns a copy of the polygon with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x * factor, p.y * factor))
                .collect(),
        }
    }
}

/// An axis-aligned rectangle in floating-point coordinates, stored as
/// min/max extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x-coordinate.
    pub x_min: f32,
    /// Minimum y-coordinate.
    pub y_min: f32,
    /// Maximum x-coordinate.
    pub x_max: f32,
    /// Maximum y-coordinate.
    pub y_max: f32,
}

impl Rect {
    /// Creates a new rectangle from its extents.
    #[inline]
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Computes the rectangle spanning the min/max x and y of `points`.
    ///
    /// Returns `None` when `points` is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Point> + Clone,
    {
        let (x_min, x_max) = points
            .clone()
            .into_iter()
            .map(|p| p.x)
            .minmax()
            .into_option()?;
        let (y_min, y_max) = points.into_iter().map(|p| p.y).minmax().into_option()?;
        Some(Rect::new(x_min, y_min, x_max, y_max))
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Area of the rectangle.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Tests whether two rectangles overlap on both axes.
    ///
    /// Bounds are inclusive: rectangles that merely touch along an edge or
    /// at a corner count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x_min.min(other.x_min),
            self.y_min.min(other.y_min),
            self.x_max.max(other.x_max),
            self.y_max.max(other.y_max),
        )
    }

}

/// An integer rectangle in image pixel space, stored as top-left corner
/// plus size. Used for region bounding boxes and crop windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// X-coordinate of the top-left corner.
    pub x: u32,
    /// Y-coordinate of the top-left corner.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl PixelRect {
    /// Creates a new pixel rectangle.
    #[inline]
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column covered by the rectangle.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the bottommost row covered by the rectangle.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Area in pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Shrinks the rectangle inward by `padding` pixels on every side.
    ///
    /// Returns `None` when the result would have non-positive width or
    /// height.
    pub fn inset(&self, padding: u32) -> Option<PixelRect> {
        if self.w <= 2 * padding || self.h <= 2 * padding {
            return None;
        }
        Some(PixelRect::new(
            self.x + padding,
            self.y + padding,
            self.w - 2 * padding,
            self.h - 2 * padding,
        ))
    }

    /// Clips the rectangle to an image of the given dimensions.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.w.min(width - self.x);
        let h = self.h.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(PixelRect::new(self.x, self.y, w, h))
    }
}
