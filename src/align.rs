//! Alignment guides and snapping for elements being dragged.
//!
//! [`compute_guides`] compares the reference lines of the moving selection
//! (left/center/right and top/middle/bottom of its rotation-aware bounding
//! box) against the same lines of every other unlocked element. Within the
//! snap threshold, the closest match on each axis decides the snap delta; ties
//! go to the target that comes first in paint order. The guides reported for
//! an axis are exactly the target lines that coincide with the selection once
//! that delta is applied.
//!
//! The computation is pure and stateless. It never touches element geometry;
//! the transform session applies [`AlignmentResult::snap`] itself.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::GEOMETRY_EPSILON;
use crate::element::{Element, ElementId};
use crate::geometry::{Point, Rect, rotated_bounds};

/// Offset that would align the moving selection to the winning guides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Guides for one tick of a drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Y coordinates of horizontal guide lines, ascending.
    pub horizontal: Vec<f64>,
    /// X coordinates of vertical guide lines, ascending.
    pub vertical: Vec<f64>,
    /// Every crossing of a horizontal and a vertical guide.
    pub intersections: Vec<Point>,
    /// Delta to apply to the moving selection. Zero on an axis with no guide.
    pub snap: SnapDelta,
}

impl AlignmentResult {
    /// Whether no guide is active on either axis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    /// Drop the snap, keeping only the guides the selection already touches.
    ///
    /// An axis whose winning delta is non-zero loses its guides, since nothing
    /// will move the selection onto them.
    #[must_use]
    pub fn without_snap(mut self) -> Self {
        if self.snap.dx.abs() > GEOMETRY_EPSILON {
            self.vertical.clear();
        }
        if self.snap.dy.abs() > GEOMETRY_EPSILON {
            self.horizontal.clear();
        }
        self.intersections = crossings(&self.horizontal, &self.vertical);
        self.snap = SnapDelta::default();
        self
    }
}

/// A target line within reach of a moving line.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    delta: f64,
    coord: f64,
}

/// Compute guides for `moving` against the rest of `all` (paint order).
///
/// Elements of `all` whose id appears in `moving` are skipped, as are locked
/// elements. An empty selection, a canvas with nothing else on it, or a
/// non-finite/negative threshold produces an empty result.
#[must_use]
pub fn compute_guides(moving: &[Element], all: &[Element], threshold: f64) -> AlignmentResult {
    if !threshold.is_finite() || threshold < 0.0 {
        return AlignmentResult::default();
    }
    let Some(moving_box) = selection_bounds(moving) else {
        return AlignmentResult::default();
    };

    let moving_ids: HashSet<ElementId> = moving.iter().map(|e| e.id).collect();
    let targets: Vec<Rect> = all
        .iter()
        .filter(|e| !moving_ids.contains(&e.id) && !e.locked)
        .map(rotated_bounds)
        .collect();
    if targets.is_empty() {
        return AlignmentResult::default();
    }

    let (dx, vertical) = resolve_axis(&moving_box.vertical_refs(), targets.iter().map(Rect::vertical_refs), threshold);
    let (dy, horizontal) =
        resolve_axis(&moving_box.horizontal_refs(), targets.iter().map(Rect::horizontal_refs), threshold);

    let intersections = crossings(&horizontal, &vertical);
    AlignmentResult { horizontal, vertical, intersections, snap: SnapDelta { dx, dy } }
}

/// Union of the rotation-aware bounds of the selection.
#[must_use]
pub fn selection_bounds(elements: &[Element]) -> Option<Rect> {
    elements.iter().map(rotated_bounds).reduce(|acc, b| acc.union(&b))
}

fn crossings(horizontal: &[f64], vertical: &[f64]) -> Vec<Point> {
    horizontal.iter().flat_map(|&y| vertical.iter().map(move |&x| Point::new(x, y))).collect()
}

/// Pick the winning delta for one axis and the guide lines that realize it.
fn resolve_axis<I>(moving_refs: &[f64; 3], target_refs: I, threshold: f64) -> (f64, Vec<f64>)
where
    I: Iterator<Item = [f64; 3]>,
{
    let mut candidates: Vec<Candidate> = Vec::new();
    for refs in target_refs {
        for &coord in &refs {
            for &m in moving_refs {
                let delta = coord - m;
                if delta.abs() <= threshold + GEOMETRY_EPSILON {
                    candidates.push(Candidate { delta, coord });
                }
            }
        }
    }

    // Candidates are in target paint order, so keeping the first strict
    // minimum is the stable tie-break.
    let mut best: Option<Candidate> = None;
    for c in &candidates {
        match best {
            Some(b) if c.delta.abs() >= b.delta.abs() - GEOMETRY_EPSILON => {}
            _ => best = Some(*c),
        }
    }
    let Some(best) = best else {
        return (0.0, Vec::new());
    };

    let mut guides: Vec<f64> = candidates
        .iter()
        .filter(|c| (c.delta - best.delta).abs() <= GEOMETRY_EPSILON)
        .map(|c| c.coord)
        .collect();
    guides.sort_by(f64::total_cmp);
    guides.dedup_by(|a, b| (*a - *b).abs() <= GEOMETRY_EPSILON);

    (best.delta, guides)
}
