//! Page viewport: pan offset and zoom factor.
//!
//! Pointer events arrive in CSS pixels; element geometry lives in page units.
//! Every conversion between the two goes through [`Camera`].

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::Point;

/// `pan_x` / `pan_y` are the screen position of the page origin, in CSS pixels.
/// `zoom` is screen pixels per page unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn screen_to_page(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan_x) / self.zoom, (screen.y - self.pan_y) / self.zoom)
    }

    #[must_use]
    pub fn page_to_screen(&self, page: Point) -> Point {
        Point::new(page.x * self.zoom + self.pan_x, page.y * self.zoom + self.pan_y)
    }

    /// Convert a pixel distance to page units.
    ///
    /// Snap thresholds and handle slop are given in pixels so they feel the
    /// same at every zoom level.
    #[must_use]
    pub fn px_to_page(&self, px: f64) -> f64 {
        px / self.zoom
    }

    /// Shift the view by a screen-space offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Multiply the zoom by `factor`, keeping the page point under `anchor` fixed.
    ///
    /// The result is clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]. Non-positive or
    /// non-finite factors are ignored.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.screen_to_page(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_x = anchor.x - fixed.x * self.zoom;
        self.pan_y = anchor.y - fixed.y * self.zoom;
    }
}
