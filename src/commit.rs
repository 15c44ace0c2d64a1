//! Scale commit: folds the transient visual scale of an element into its
//! intrinsic dimensions and resets the scale pair to identity.
//!
//! Each element kind has its own rule:
//!
//! | Kind | Rule |
//! |------|------|
//! | rectangle, image | `width *= scale_x`, `height *= scale_y` |
//! | circle | `radius = width * scale_x / 2`, `width = height = 2 * radius` |
//! | line | `x2 *= scale_x`, `y2 *= scale_y`, box re-derived as `|x2| × |y2|` |
//! | text | `font_size *= scale_y`, `width *= scale_x`, `height *= scale_y` |
//! | unsupported form | scale discarded, nothing else changes |
//!
//! Commit is total. It runs on every gesture end, so a bad factor never
//! raises: any field whose new value would be non-finite or negative keeps its
//! last committed value.

#[cfg(test)]
#[path = "commit_test.rs"]
mod commit_test;

use tracing::debug;

use crate::consts::IDENTITY_SCALE;
use crate::element::{Element, ElementId, ElementKind, ShapeForm};

/// Return a copy of `element` with its scale folded into intrinsic fields.
#[must_use]
pub fn commit_scale(element: &Element) -> Element {
    let mut committed = element.clone();
    commit_in_place(&mut committed);
    committed
}

/// Fold the scale of `element` into its intrinsic fields in place.
///
/// A no-op when the element is already at rest.
pub fn commit_in_place(element: &mut Element) {
    if element.is_at_rest() {
        return;
    }

    let sx = sanitize_factor(element.id, "scale_x", element.scale_x);
    let sy = sanitize_factor(element.id, "scale_y", element.scale_y);
    let id = element.id;

    match &mut element.kind {
        ElementKind::Shape(shape) => match &mut shape.form {
            ShapeForm::Rectangle => {
                element.width = scaled_or_keep(id, "width", element.width, sx);
                element.height = scaled_or_keep(id, "height", element.height, sy);
            }
            ShapeForm::Circle { radius } => {
                // Only the X factor is authoritative; a non-uniform drag collapses to it.
                let diameter = scaled_or_keep(id, "diameter", element.width, sx);
                *radius = diameter * 0.5;
                element.width = diameter;
                element.height = diameter;
            }
            ShapeForm::Line { x2, y2 } => {
                *x2 = scaled_offset_or_keep(id, "x2", *x2, sx);
                *y2 = scaled_offset_or_keep(id, "y2", *y2, sy);
                element.width = x2.abs();
                element.height = y2.abs();
            }
            ShapeForm::Unsupported => {
                debug!(%id, scale_x = element.scale_x, scale_y = element.scale_y, "commit: unsupported shape form; scale discarded");
            }
        },
        ElementKind::Image(_) => {
            element.width = scaled_or_keep(id, "width", element.width, sx);
            element.height = scaled_or_keep(id, "height", element.height, sy);
        }
        ElementKind::Text(text) => {
            let font_size = text.font_size * sy;
            if font_size.is_finite() && font_size > 0.0 {
                text.font_size = font_size;
            } else {
                debug!(%id, font_size, "commit: clamped font_size to last committed value");
            }
            element.width = scaled_or_keep(id, "width", element.width, sx);
            element.height = scaled_or_keep(id, "height", element.height, sy);
        }
    }

    element.scale_x = IDENTITY_SCALE;
    element.scale_y = IDENTITY_SCALE;
}

/// Non-finite or negative factors are treated as identity.
fn sanitize_factor(id: ElementId, axis: &'static str, factor: f64) -> f64 {
    if factor.is_finite() && factor >= 0.0 {
        factor
    } else {
        debug!(%id, axis, factor, "commit: rejected scale factor");
        IDENTITY_SCALE
    }
}

fn scaled_or_keep(id: ElementId, field: &'static str, current: f64, factor: f64) -> f64 {
    let next = current * factor;
    if next.is_finite() && next >= 0.0 {
        next
    } else {
        debug!(%id, field, next, "commit: clamped to last committed value");
        current
    }
}

/// Endpoint offsets may be negative; only non-finite results are rejected.
fn scaled_offset_or_keep(id: ElementId, field: &'static str, current: f64, factor: f64) -> f64 {
    let next = current * factor;
    if next.is_finite() {
        next
    } else {
        debug!(%id, field, next, "commit: clamped to last committed value");
        current
    }
}
