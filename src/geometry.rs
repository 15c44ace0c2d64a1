//! Geometry primitives: points, axis-aligned rectangles, and the derived
//! bounding boxes of elements.
//!
//! Everything here is a pure function of element fields. Bounds are never
//! cached, so a commit or patch is visible to hit-testing and alignment on the
//! very next read.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind, ShapeForm};

/// A point in either screen or page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle containing both corner points, in any order.
    #[must_use]
    pub fn spanning(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width * 0.5
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height * 0.5
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Vertical reference lines: left edge, center, right edge.
    #[must_use]
    pub fn vertical_refs(&self) -> [f64; 3] {
        [self.left(), self.center_x(), self.right()]
    }

    /// Horizontal reference lines: top edge, middle, bottom edge.
    #[must_use]
    pub fn horizontal_refs(&self) -> [f64; 3] {
        [self.top(), self.center_y(), self.bottom()]
    }

    /// Whether `pt` lies inside or on the boundary of the rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left() && pt.x <= self.right() && pt.y >= self.top() && pt.y <= self.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Axis-aligned box enclosing this rectangle rotated by `degrees`
    /// clockwise about its own center.
    #[must_use]
    pub fn rotated_aabb(&self, degrees: f64) -> Rect {
        if normalize_degrees(degrees) < f64::EPSILON {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let ext_x = (half_w * cos).abs() + (half_h * sin).abs();
        let ext_y = (half_w * sin).abs() + (half_h * cos).abs();
        let c = self.center();
        Rect::new(c.x - ext_x, c.y - ext_y, ext_x * 2.0, ext_y * 2.0)
    }
}

/// Normalize an angle in degrees into `[0, 360)`. Non-finite input maps to `0`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate `pt` by `degrees` clockwise around `pivot`.
#[must_use]
pub fn rotate_point(pt: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = pt.x - pivot.x;
    let dy = pt.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Width of the element as it currently appears on screen.
#[must_use]
pub fn scaled_width(e: &Element) -> f64 {
    e.width * e.scale_x
}

/// Height of the element as it currently appears on screen.
#[must_use]
pub fn scaled_height(e: &Element) -> f64 {
    e.height * e.scale_y
}

/// The element's visual (scaled, unrotated) bounding box.
///
/// Lines span their origin and scaled endpoint offset. Circles take both sides
/// from `width`, the same field the scale commit reads.
#[must_use]
pub fn visual_bounds(e: &Element) -> Rect {
    match &e.kind {
        ElementKind::Shape(shape) => match shape.form {
            ShapeForm::Line { x2, y2 } => {
                let origin = Point::new(e.x, e.y);
                let end = Point::new(e.x + x2 * e.scale_x, e.y + y2 * e.scale_y);
                Rect::spanning(origin, end)
            }
            ShapeForm::Circle { .. } => Rect::new(e.x, e.y, e.width * e.scale_x, e.width * e.scale_y),
            ShapeForm::Rectangle | ShapeForm::Unsupported => {
                Rect::new(e.x, e.y, scaled_width(e), scaled_height(e))
            }
        },
        ElementKind::Text(_) | ElementKind::Image(_) => Rect::new(e.x, e.y, scaled_width(e), scaled_height(e)),
    }
}

/// The rotation-aware bounding box used for alignment and hit-testing.
#[must_use]
pub fn rotated_bounds(e: &Element) -> Rect {
    visual_bounds(e).rotated_aabb(e.rotation)
}
