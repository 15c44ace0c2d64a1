//! Page store: the ordered element list plus page size and background.
//!
//! The canvas exclusively owns its elements. Paint order is vector order, and
//! every element's `z_index` is kept equal to its position so that hosts which
//! sort by `z_index` agree with the engine. New elements go on top.
//!
//! Everything that takes outside input here validates it first and returns a
//! [`CanvasError`] instead of storing bad geometry.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::element::{Element, ElementId, ElementPatch};
use crate::error::CanvasError;
use crate::geometry::{Point, Rect};

/// Page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Color { color: String },
    Image { src: String },
}

/// Serializable page snapshot exchanged with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A page and its elements, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
    background: Option<Background>,
    elements: Vec<Element>,
}

impl Canvas {
    /// Create an empty page. Non-finite or negative sizes are stored as zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: clamp_size(width), height: clamp_size(height), background: None, elements: Vec::new() }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The page rectangle, anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Whether `pt` lies on the page.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.bounds().contains(pt)
    }

    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
    }

    /// Resize the page. Non-finite or negative sizes are stored as zero.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = clamp_size(width);
        self.height = clamp_size(height);
    }

    /// Add an element on top of the paint order.
    ///
    /// # Errors
    ///
    /// [`CanvasError::DuplicateId`] if the id is taken, or
    /// [`CanvasError::InvalidGeometry`] if a numeric field is out of range.
    pub fn insert(&mut self, element: Element) -> Result<(), CanvasError> {
        element.validate()?;
        if self.index_of(&element.id).is_some() {
            return Err(CanvasError::DuplicateId(element.id));
        }
        let mut element = element;
        element.z_index = z_of(self.elements.len());
        debug!(id = %element.id, kind = element.kind_label(), z = element.z_index, "canvas: insert");
        self.elements.push(element);
        Ok(())
    }

    /// Remove an element and return it.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id, [`CanvasError::Locked`] when
    /// the element is locked.
    pub fn remove(&mut self, id: &ElementId) -> Result<Element, CanvasError> {
        let idx = self.index_of(id).ok_or(CanvasError::NotFound(*id))?;
        if self.elements[idx].locked {
            warn!(%id, "canvas: refused to delete locked element");
            return Err(CanvasError::Locked(*id));
        }
        let removed = self.elements.remove(idx);
        self.renumber();
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Apply a validated sparse update.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id, [`CanvasError::Locked`] when
    /// the element is locked and the patch does more than unlock it, or
    /// [`CanvasError::InvalidGeometry`] for out-of-range values.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<(), CanvasError> {
        patch.validate()?;
        let element = self.elements.iter_mut().find(|e| e.id == *id).ok_or(CanvasError::NotFound(*id))?;
        let geometry_change = ElementPatch { locked: None, ..patch.clone() } != ElementPatch::default();
        if element.locked && patch.locked != Some(false) && geometry_change {
            return Err(CanvasError::Locked(*id));
        }
        patch.apply_to(element);
        Ok(())
    }

    /// Lock or unlock an element.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id.
    pub fn set_locked(&mut self, id: &ElementId, locked: bool) -> Result<(), CanvasError> {
        let element = self.elements.iter_mut().find(|e| e.id == *id).ok_or(CanvasError::NotFound(*id))?;
        element.locked = locked;
        Ok(())
    }

    /// Replace the whole page with a snapshot.
    ///
    /// Elements keep the snapshot's order. Invalid elements and repeated ids are
    /// dropped with a warning so that one bad record cannot block a load.
    pub fn load_page(&mut self, page: Page) {
        self.width = clamp_size(page.width);
        self.height = clamp_size(page.height);
        self.background = page.background;
        self.elements.clear();

        let mut seen: HashSet<ElementId> = HashSet::new();
        let mut skipped = 0_usize;
        for element in page.elements {
            if let Err(e) = element.validate() {
                warn!(id = %element.id, error = %e, "canvas: skipping invalid element in snapshot");
                skipped += 1;
                continue;
            }
            if !seen.insert(element.id) {
                warn!(id = %element.id, "canvas: skipping duplicate element in snapshot");
                skipped += 1;
                continue;
            }
            self.elements.push(element);
        }
        self.renumber();
        info!(count = self.elements.len(), skipped, "canvas: loaded page");
    }

    /// Snapshot the page for the host.
    #[must_use]
    pub fn to_page(&self) -> Page {
        Page {
            width: self.width,
            height: self.height,
            background: self.background.clone(),
            elements: self.elements.clone(),
        }
    }

    /// All elements in paint order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Move an element to the top of the paint order.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id.
    pub fn bring_to_front(&mut self, id: &ElementId) -> Result<(), CanvasError> {
        let last = self.elements.len().saturating_sub(1);
        self.move_to(id, |_| last)
    }

    /// Move an element to the bottom of the paint order.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id.
    pub fn send_to_back(&mut self, id: &ElementId) -> Result<(), CanvasError> {
        self.move_to(id, |_| 0)
    }

    /// Swap an element with the one painted directly above it.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id.
    pub fn bring_forward(&mut self, id: &ElementId) -> Result<(), CanvasError> {
        let last = self.elements.len().saturating_sub(1);
        self.move_to(id, |idx| (idx + 1).min(last))
    }

    /// Swap an element with the one painted directly below it.
    ///
    /// # Errors
    ///
    /// [`CanvasError::NotFound`] for an unknown id.
    pub fn send_backward(&mut self, id: &ElementId) -> Result<(), CanvasError> {
        self.move_to(id, |idx| idx.saturating_sub(1))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // --- Crate-internal access for the transform session ---

    pub(crate) fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Put back the geometry of a previously captured element value.
    ///
    /// The slot keeps its current `z_index` and lock flag.
    pub(crate) fn restore(&mut self, original: &Element) {
        if let Some(slot) = self.get_mut(&original.id) {
            slot.copy_geometry_from(original);
        }
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    fn move_to(&mut self, id: &ElementId, target: impl FnOnce(usize) -> usize) -> Result<(), CanvasError> {
        let idx = self.index_of(id).ok_or(CanvasError::NotFound(*id))?;
        let dest = target(idx);
        if dest != idx {
            let element = self.elements.remove(idx);
            self.elements.insert(dest, element);
            self.renumber();
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (idx, element) in self.elements.iter_mut().enumerate() {
            element.z_index = z_of(idx);
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn clamp_size(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn z_of(idx: usize) -> i64 {
    i64::try_from(idx).unwrap_or(i64::MAX)
}
