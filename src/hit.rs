//! Hit-testing: which element, or which handle of the selection, is under a
//! page-space point.
//!
//! Handles belong to the selection box and are only offered for a single
//! selected, unlocked element. Bodies are tested topmost first in the element's
//! own rotated frame; lines use a distance-to-segment test so that thin
//! strokes stay clickable.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::element::{Element, ElementId, ElementKind, ShapeForm};
use crate::geometry::{Point, Rect, rotate_point, rotated_bounds, visual_bounds};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Horizontal direction the handle drags: -1 (west), 0, or 1 (east).
    #[must_use]
    pub fn sign_x(self) -> f64 {
        match self {
            Self::Ne | Self::E | Self::Se => 1.0,
            Self::Nw | Self::W | Self::Sw => -1.0,
            Self::N | Self::S => 0.0,
        }
    }

    /// Vertical direction the handle drags: -1 (north), 0, or 1 (south).
    #[must_use]
    pub fn sign_y(self) -> f64 {
        match self {
            Self::Se | Self::S | Self::Sw => 1.0,
            Self::Ne | Self::N | Self::Nw => -1.0,
            Self::E | Self::W => 0.0,
        }
    }

    /// Handle position on `bounds`.
    #[must_use]
    pub fn position(self, bounds: &Rect) -> Point {
        Point::new(
            bounds.center_x() + self.sign_x() * bounds.width * 0.5,
            bounds.center_y() + self.sign_y() * bounds.height * 0.5,
        )
    }

    /// The point of `bounds` that stays put while this handle is dragged.
    #[must_use]
    pub fn fixed_point(self, bounds: &Rect) -> Point {
        Point::new(
            bounds.center_x() - self.sign_x() * bounds.width * 0.5,
            bounds.center_y() - self.sign_y() * bounds.height * 0.5,
        )
    }

    /// Whether the handle sits on a corner (drags both axes).
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Pixel sizes used for handle slop, already chosen by the caller's config.
#[derive(Debug, Clone, Copy)]
pub struct HandleMetrics {
    pub handle_radius_px: f64,
    pub rotate_offset_px: f64,
}

/// Test what is under `page_pt`, checking the selection's handles first.
#[must_use]
pub fn hit_test(
    page_pt: Point,
    canvas: &Canvas,
    camera: &Camera,
    selection: &[ElementId],
    metrics: HandleMetrics,
) -> Option<Hit> {
    let slop = camera.px_to_page(metrics.handle_radius_px);

    if let [only] = selection {
        if let Some(selected) = canvas.get(only).filter(|e| !e.locked) {
            if let Some(part) = hit_handles(page_pt, selected, camera, slop, metrics) {
                return Some(Hit { element_id: selected.id, part });
            }
        }
    }

    canvas
        .elements()
        .iter()
        .rev()
        .find(|e| hit_body(page_pt, e, slop))
        .map(|e| Hit { element_id: e.id, part: HitPart::Body })
}

/// Position of the rotate handle above `bounds`.
#[must_use]
pub fn rotate_handle_position(bounds: &Rect, camera: &Camera, metrics: HandleMetrics) -> Point {
    Point::new(bounds.center_x(), bounds.top() - camera.px_to_page(metrics.rotate_offset_px))
}

fn hit_handles(pt: Point, element: &Element, camera: &Camera, slop: f64, metrics: HandleMetrics) -> Option<HitPart> {
    let bounds = rotated_bounds(element);
    if distance(pt, rotate_handle_position(&bounds, camera, metrics)) <= slop {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .into_iter()
        .find(|anchor| distance(pt, anchor.position(&bounds)) <= slop)
        .map(HitPart::ResizeHandle)
}

fn hit_body(pt: Point, element: &Element, slop: f64) -> bool {
    if let ElementKind::Shape(shape) = &element.kind {
        if let ShapeForm::Line { x2, y2 } = shape.form {
            let a = Point::new(element.x, element.y);
            let b = Point::new(element.x + x2 * element.scale_x, element.y + y2 * element.scale_y);
            let pivot = visual_bounds(element).center();
            let a = rotate_point(a, pivot, element.rotation);
            let b = rotate_point(b, pivot, element.rotation);
            return distance_to_segment(pt, a, b) <= slop;
        }
    }
    let bounds = visual_bounds(element);
    let local = rotate_point(pt, bounds.center(), -element.rotation);
    bounds.contains(local)
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * abx, a.y + t * aby))
}
