//! Engine: the host-facing state machine for one page.
//!
//! [`EngineCore`] owns the canvas, the camera, the selection, and at most one
//! [`TransformSession`]. Hosts drive it either through the explicit session
//! API (`begin_session` / `update_session` / `end_session` /
//! `cancel_session`) or through raw pointer and keyboard events, which are
//! translated into the same session calls. Event handlers return a list of
//! [`Action`]s; `Action::GeometryCommitted` is the hand-off point to the
//! persistence layer.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, warn};

use crate::align::AlignmentResult;
use crate::camera::Camera;
use crate::canvas::{Canvas, Page};
use crate::config::EngineConfig;
use crate::consts::{GEOMETRY_EPSILON, WHEEL_ZOOM_STEP};
use crate::element::{Element, ElementId, ElementPatch};
use crate::error::{CanvasError, EngineError};
use crate::geometry::{Point, Rect, normalize_degrees, rotated_bounds};
use crate::hit::{self, HitPart, ResizeAnchor};
use crate::input::{Button, DragKind, InputState, Key, Modifiers, WheelDelta};
use crate::session::{Gesture, SessionHandle, TransformDelta, TransformSession};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// The selection changed; `ids` is the new selection in click order.
    SelectionChanged { ids: Vec<ElementId> },
    /// Guides for the current gesture tick.
    GuidesChanged { guides: AlignmentResult },
    /// The gesture ended; guides should disappear.
    GuidesCleared,
    /// Final geometry of a finished gesture, ready to persist.
    GeometryCommitted { elements: Vec<Element> },
    /// The gesture was aborted and geometry restored.
    GestureCancelled,
    /// An element was deleted from the page.
    ElementDeleted { id: ElementId },
    RenderNeeded,
}

/// The active session and the handle it was issued under.
#[derive(Debug, Clone)]
struct ActiveSession {
    handle: SessionHandle,
    session: TransformSession,
}

/// Core engine state for one page.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub canvas: Canvas,
    pub camera: Camera,
    pub config: EngineConfig,
    pub input: InputState,
    selection: Vec<ElementId>,
    active: Option<ActiveSession>,
    next_handle: u32,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the page. Any active gesture is cancelled first.
    pub fn load_page(&mut self, page: Page) {
        self.abort_active();
        self.canvas.load_page(page);
        self.selection.retain(|id| self.canvas.get(id).is_some());
    }

    /// Add an element created elsewhere (toolbar, upload, remote peer).
    ///
    /// # Errors
    ///
    /// Propagates [`CanvasError`] from validation.
    pub fn insert(&mut self, element: Element) -> Result<(), EngineError> {
        self.canvas.insert(element)?;
        Ok(())
    }

    /// Apply a sparse update from outside the gesture path.
    ///
    /// # Errors
    ///
    /// Propagates [`CanvasError`]; members of an active session are refused as locked.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<(), EngineError> {
        if self.is_member(id) {
            return Err(CanvasError::Locked(*id).into());
        }
        self.canvas.apply_patch(id, patch)?;
        Ok(())
    }

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Propagates [`CanvasError`]; locked elements and session members are refused.
    pub fn delete(&mut self, id: &ElementId) -> Result<Element, EngineError> {
        if self.is_member(id) {
            return Err(CanvasError::Locked(*id).into());
        }
        let removed = self.canvas.remove(id)?;
        self.selection.retain(|s| s != id);
        Ok(removed)
    }

    // --- Selection ---

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Replace the selection; unknown ids are dropped.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        self.selection.clear();
        for id in ids {
            if self.canvas.get(id).is_some() && !self.selection.contains(id) {
                self.selection.push(*id);
            }
        }
    }

    // --- Session API ---

    /// Whether a transform session is active.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.active.is_some()
    }

    /// Start a gesture over `ids`. Locked and unknown ids are left out; if
    /// nothing remains the session is empty and every later call on it is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionActive`] while another session is running.
    pub fn begin_session(&mut self, ids: &[ElementId], gesture: Gesture) -> Result<SessionHandle, EngineError> {
        if self.active.is_some() {
            warn!("engine: begin_session refused; a session is already active");
            return Err(EngineError::SessionActive);
        }
        let handle = SessionHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let session = TransformSession::begin(&self.canvas, ids, gesture);
        debug!(handle = handle.0, members = session.originals().len(), ?gesture, "engine: session started");
        self.active = Some(ActiveSession { handle, session });
        Ok(handle)
    }

    /// Feed one delta into the session and return the guides for this tick.
    ///
    /// A stale handle yields an empty result.
    pub fn update_session(&mut self, handle: SessionHandle, delta: TransformDelta) -> AlignmentResult {
        self.update_with(handle, delta, true)
    }

    /// Commit the session and return the committed elements.
    ///
    /// A stale handle yields an empty list.
    pub fn end_session(&mut self, handle: SessionHandle) -> Vec<Element> {
        let Some(active) = self.take_active(handle) else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        active.session.end(&mut self.canvas)
    }

    /// Abort the session, restoring every member. A stale handle is ignored.
    pub fn cancel_session(&mut self, handle: SessionHandle) {
        let Some(active) = self.take_active(handle) else {
            return;
        };
        self.input = InputState::Idle;
        active.session.cancel(&mut self.canvas);
    }

    // --- Viewport ---

    /// Snap threshold in page units, or `None` when snapping is off.
    #[must_use]
    pub fn snap_threshold(&self) -> Option<f64> {
        self.config.snap_enabled.then(|| self.camera.px_to_page(self.config.snap_threshold_px))
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                Vec::new()
            }
            Button::Primary => self.primary_down(screen_pt, modifiers),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::Transforming { handle, drag } => {
                let page = self.camera.screen_to_page(screen_pt);
                let (delta, next_drag) = self.pointer_delta(drag, page, modifiers);
                self.input = InputState::Transforming { handle, drag: next_drag };
                let guides = self.update_with(handle, delta, !modifiers.alt);
                vec![Action::GuidesChanged { guides }, Action::RenderNeeded]
            }
        }
    }

    /// Finish the pointer gesture. Releasing outside the page cancels it.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => {
                self.input = InputState::Idle;
                Vec::new()
            }
            InputState::Transforming { handle, .. } => {
                let page = self.camera.screen_to_page(screen_pt);
                if !self.canvas.contains(page) {
                    debug!(x = page.x, y = page.y, "engine: released outside page; cancelling");
                    self.cancel_session(handle);
                    return vec![Action::GestureCancelled, Action::GuidesCleared, Action::RenderNeeded];
                }
                let originals: Vec<Element> =
                    self.active.as_ref().map(|a| a.session.originals().to_vec()).unwrap_or_default();
                let committed: Vec<Element> =
                    self.end_session(handle).into_iter().filter(|e| !originals.contains(e)).collect();
                let mut actions = vec![Action::GuidesCleared];
                if !committed.is_empty() {
                    actions.push(Action::GeometryCommitted { elements: committed });
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_cancel() {
            if let Some(handle) = self.active.as_ref().map(|a| a.handle) {
                self.cancel_session(handle);
                return vec![Action::GestureCancelled, Action::GuidesCleared, Action::RenderNeeded];
            }
            if !self.selection.is_empty() {
                self.selection.clear();
                return vec![Action::SelectionChanged { ids: Vec::new() }, Action::RenderNeeded];
            }
            return Vec::new();
        }
        if key.is_delete() && self.active.is_none() {
            return self.delete_selection();
        }
        Vec::new()
    }

    /// Ctrl/meta + wheel zooms about the pointer; plain wheel pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
            self.camera.zoom_about(screen_pt, factor);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- Internals ---

    fn primary_down(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let page = self.camera.screen_to_page(screen_pt);
        let hit = hit::hit_test(page, &self.canvas, &self.camera, &self.selection, self.config.handle_metrics());

        let Some(hit) = hit else {
            if modifiers.shift || self.selection.is_empty() {
                return Vec::new();
            }
            self.selection.clear();
            return vec![Action::SelectionChanged { ids: Vec::new() }, Action::RenderNeeded];
        };

        let mut actions = Vec::new();
        let drag = match hit.part {
            HitPart::Body => {
                if modifiers.shift {
                    if let Some(pos) = self.selection.iter().position(|id| *id == hit.element_id) {
                        self.selection.remove(pos);
                    } else {
                        self.selection.push(hit.element_id);
                    }
                    return vec![Action::SelectionChanged { ids: self.selection.clone() }, Action::RenderNeeded];
                }
                if !self.selection.contains(&hit.element_id) {
                    self.selection = vec![hit.element_id];
                    actions.push(Action::SelectionChanged { ids: self.selection.clone() });
                }
                DragKind::Move { last_page: page }
            }
            HitPart::ResizeHandle(anchor) => {
                let Some(orig) = self.canvas.get(&hit.element_id).map(rotated_bounds) else {
                    return Vec::new();
                };
                DragKind::Resize { anchor, start_page: page, orig }
            }
            HitPart::RotateHandle => {
                let Some(pivot) = self.canvas.get(&hit.element_id).map(|e| rotated_bounds(e).center()) else {
                    return Vec::new();
                };
                DragKind::Rotate { pivot, start_angle_deg: angle_deg(pivot, page) }
            }
        };

        let gesture = match drag {
            DragKind::Move { .. } => Gesture::Move,
            DragKind::Resize { anchor, orig, .. } => Gesture::Resize { anchor: anchor.fixed_point(&orig) },
            DragKind::Rotate { pivot, .. } => Gesture::Rotate { pivot },
        };
        let ids = self.selection.clone();
        match self.begin_session(&ids, gesture) {
            Ok(handle) => self.input = InputState::Transforming { handle, drag },
            Err(e) => warn!(error = %e, "engine: pointer gesture not started"),
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Turn pointer motion into an incremental delta for the active drag.
    fn pointer_delta(&self, drag: DragKind, page: Point, modifiers: Modifiers) -> (TransformDelta, DragKind) {
        let current = self.active.as_ref().map(|a| a.session.transform()).unwrap_or_default();
        match drag {
            DragKind::Move { last_page } => {
                (TransformDelta::translate(page.x - last_page.x, page.y - last_page.y), DragKind::Move { last_page: page })
            }
            DragKind::Resize { anchor, start_page, orig } => {
                let (sx, sy) = self.resize_factors(anchor, orig, page.x - start_page.x, page.y - start_page.y, modifiers);
                (TransformDelta::scale(sx / current.scale_x, sy / current.scale_y), drag)
            }
            DragKind::Rotate { pivot, start_angle_deg } => {
                let mut target = angle_deg(pivot, page) - start_angle_deg;
                if modifiers.shift {
                    let step = self.config.rotation_snap_deg;
                    target = (target / step).round() * step;
                }
                (TransformDelta::rotate(target - current.rotation), drag)
            }
        }
    }

    /// Total scale factors for a resize whose pointer moved `(dx, dy)` from its start.
    fn resize_factors(&self, anchor: ResizeAnchor, orig: Rect, dx: f64, dy: f64, modifiers: Modifiers) -> (f64, f64) {
        let min = self.config.min_element_size;
        let factor = |extent: f64, travel: f64, sign: f64| -> f64 {
            if sign.abs() < f64::EPSILON || extent <= GEOMETRY_EPSILON {
                return 1.0;
            }
            (extent + travel * sign).max(min) / extent
        };
        let sx = factor(orig.width, dx, anchor.sign_x());
        let sy = factor(orig.height, dy, anchor.sign_y());
        if modifiers.shift && anchor.is_corner() {
            let uniform = sx.max(sy);
            return (uniform, uniform);
        }
        (sx, sy)
    }

    fn update_with(&mut self, handle: SessionHandle, delta: TransformDelta, snapping: bool) -> AlignmentResult {
        let threshold = if snapping { self.snap_threshold() } else { None };
        match self.active.as_mut() {
            Some(active) if active.handle == handle => active.session.update(&mut self.canvas, delta, threshold),
            _ => {
                debug!(handle = handle.0, "engine: update for stale session handle ignored");
                AlignmentResult::default()
            }
        }
    }

    fn take_active(&mut self, handle: SessionHandle) -> Option<ActiveSession> {
        if self.active.as_ref().map(|a| a.handle) != Some(handle) {
            debug!(handle = handle.0, "engine: stale session handle ignored");
            return None;
        }
        self.active.take()
    }

    fn abort_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.session.cancel(&mut self.canvas);
        }
        self.input = InputState::Idle;
    }

    fn is_member(&self, id: &ElementId) -> bool {
        self.active.as_ref().is_some_and(|a| a.session.member_ids().any(|m| m == *id))
    }

    fn delete_selection(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for id in self.selection.clone() {
            match self.delete(&id) {
                Ok(_) => actions.push(Action::ElementDeleted { id }),
                Err(e) => debug!(%id, error = %e, "engine: delete skipped"),
            }
        }
        if !actions.is_empty() {
            actions.push(Action::SelectionChanged { ids: self.selection.clone() });
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}

/// Angle of `pt` around `pivot`, in degrees, clockwise from +x in screen orientation.
fn angle_deg(pivot: Point, pt: Point) -> f64 {
    normalize_degrees((pt.y - pivot.y).atan2(pt.x - pivot.x).to_degrees())
}
