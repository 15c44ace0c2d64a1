//! Transform session: the lifetime of one drag, resize, or rotate gesture.
//!
//! A session captures the pre-gesture value of every member when it begins.
//! Each [`TransformSession::update`] composes the incoming delta into the
//! running transform and rewrites the members on the canvas as a *preview*
//! derived from those captured originals: position, transient scale, and
//! rotation change, intrinsic dimensions do not. Because every preview is
//! recomputed from the originals, updates never accumulate rounding drift.
//!
//! The session ends in exactly one of two ways, both of which consume it:
//!
//! - [`TransformSession::end`] folds each member's scale into its intrinsic
//!   fields with [`crate::commit::commit_in_place`] and returns the committed
//!   values for persistence.
//! - [`TransformSession::cancel`] writes the captured geometry back, leaving
//!   every member exactly where it was before the gesture.
//!
//! Locked elements never become members. A session whose every candidate was
//! locked is valid but empty; all of its operations are no-ops.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::{AlignmentResult, compute_guides};
use crate::canvas::Canvas;
use crate::commit::commit_in_place;
use crate::consts::IDENTITY_SCALE;
use crate::element::{Element, ElementId};
use crate::geometry::{Point, normalize_degrees, rotate_point, visual_bounds};

/// Opaque handle naming one session of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub u32);

/// What a gesture does to its members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Gesture {
    /// Translate; the only gesture that snaps to guides.
    Move,
    /// Scale about `anchor`, the point that stays fixed.
    Resize { anchor: Point },
    /// Rotate about `pivot`.
    Rotate { pivot: Point },
}

/// One incremental step of a gesture.
///
/// Translation and rotation add up; scale factors multiply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
    #[serde(default = "identity")]
    pub scale_x: f64,
    #[serde(default = "identity")]
    pub scale_y: f64,
    #[serde(default)]
    pub rotation: f64,
}

fn identity() -> f64 {
    IDENTITY_SCALE
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self { dx: 0.0, dy: 0.0, scale_x: IDENTITY_SCALE, scale_y: IDENTITY_SCALE, rotation: 0.0 }
    }
}

impl TransformDelta {
    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self { dx, dy, ..Self::default() }
    }

    #[must_use]
    pub fn scale(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y, ..Self::default() }
    }

    #[must_use]
    pub fn rotate(degrees: f64) -> Self {
        Self { rotation: degrees, ..Self::default() }
    }
}

/// The transform accumulated since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub dx: f64,
    pub dy: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { dx: 0.0, dy: 0.0, scale_x: IDENTITY_SCALE, scale_y: IDENTITY_SCALE, rotation: 0.0 }
    }
}

impl Transform {
    /// Fold `delta` in. Non-finite or non-positive components are ignored.
    fn compose(&mut self, delta: &TransformDelta) {
        if delta.dx.is_finite() && delta.dy.is_finite() {
            self.dx += delta.dx;
            self.dy += delta.dy;
        }
        if positive_finite(delta.scale_x) && positive_finite(delta.scale_y) {
            let sx = self.scale_x * delta.scale_x;
            let sy = self.scale_y * delta.scale_y;
            if positive_finite(sx) && positive_finite(sy) {
                self.scale_x = sx;
                self.scale_y = sy;
            }
        }
        if delta.rotation.is_finite() {
            self.rotation += delta.rotation;
        }
    }
}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// State of one active gesture.
#[derive(Debug, Clone)]
pub struct TransformSession {
    gesture: Gesture,
    /// Members as they were at begin, in paint order.
    originals: Vec<Element>,
    transform: Transform,
}

impl TransformSession {
    /// Start a gesture over `ids`.
    ///
    /// Unknown ids and locked elements are left out; duplicates collapse.
    #[must_use]
    pub fn begin(canvas: &Canvas, ids: &[ElementId], gesture: Gesture) -> Self {
        let originals: Vec<Element> =
            canvas.elements().iter().filter(|e| ids.contains(&e.id) && !e.locked).cloned().collect();
        let excluded = ids.len().saturating_sub(originals.len());
        if excluded > 0 {
            debug!(excluded, members = originals.len(), "session: left locked or unknown elements out");
        }
        Self { gesture, originals, transform: Transform::default() }
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Ids of the members, in paint order.
    pub fn member_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.originals.iter().map(|e| e.id)
    }

    /// Pre-gesture values of the members.
    #[must_use]
    pub fn originals(&self) -> &[Element] {
        &self.originals
    }

    /// Compose `delta`, rewrite the member previews, and return the guides.
    ///
    /// `snap_threshold` is in page units; `None` disables guides. For move
    /// gestures the winning snap delta is applied to every member and reported
    /// in the result. Other gestures never snap, so they report only the guides
    /// the members already touch.
    ///
    /// Only geometry is written; a member's `z_index` and lock flag stay as the
    /// canvas has them.
    pub fn update(&mut self, canvas: &mut Canvas, delta: TransformDelta, snap_threshold: Option<f64>) -> AlignmentResult {
        if self.is_empty() {
            return AlignmentResult::default();
        }
        self.transform.compose(&delta);

        let mut previews: Vec<Element> = self.originals.iter().map(|orig| self.preview(orig)).collect();

        let mut result = match snap_threshold {
            Some(threshold) => compute_guides(&previews, canvas.elements(), threshold),
            None => AlignmentResult::default(),
        };
        if matches!(self.gesture, Gesture::Move) {
            for preview in &mut previews {
                preview.x += result.snap.dx;
                preview.y += result.snap.dy;
            }
        } else {
            result = result.without_snap();
        }

        for preview in &previews {
            if let Some(slot) = canvas.get_mut(&preview.id) {
                slot.copy_geometry_from(preview);
            }
        }
        result
    }

    /// Commit every member still on the canvas and return the committed values.
    pub fn end(self, canvas: &mut Canvas) -> Vec<Element> {
        let mut committed = Vec::with_capacity(self.originals.len());
        for orig in &self.originals {
            let Some(element) = canvas.get_mut(&orig.id) else {
                debug!(id = %orig.id, "session: member vanished before commit");
                continue;
            };
            commit_in_place(element);
            committed.push(element.clone());
        }
        debug!(members = committed.len(), "session: committed");
        committed
    }

    /// Restore every member to its pre-gesture value.
    pub fn cancel(self, canvas: &mut Canvas) {
        for orig in &self.originals {
            canvas.restore(orig);
        }
        debug!(members = self.originals.len(), "session: cancelled");
    }

    fn preview(&self, orig: &Element) -> Element {
        let t = &self.transform;
        let mut e = orig.clone();
        match self.gesture {
            Gesture::Move => {}
            Gesture::Resize { anchor } => {
                e.x = anchor.x + (orig.x - anchor.x) * t.scale_x;
                e.y = anchor.y + (orig.y - anchor.y) * t.scale_y;
                e.scale_x = orig.scale_x * t.scale_x;
                e.scale_y = orig.scale_y * t.scale_y;
            }
            Gesture::Rotate { pivot } => {
                let center = visual_bounds(orig).center();
                let moved = rotate_point(center, pivot, t.rotation);
                e.x += moved.x - center.x;
                e.y += moved.y - center.y;
                e.rotation = normalize_degrees(orig.rotation + t.rotation);
            }
        }
        e.x += t.dx;
        e.y += t.dy;
        e
    }
}
