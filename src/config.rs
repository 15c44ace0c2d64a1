//! Engine configuration supplied by the host as JSON.
//!
//! Every field is optional and falls back to the defaults in
//! [`crate::consts`]. Pixel values are screen pixels; the engine converts them
//! to page units through the camera at the moment they are used.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MIN_ELEMENT_SIZE, DEFAULT_ROTATION_SNAP_DEG, DEFAULT_SNAP_THRESHOLD_PX, HANDLE_RADIUS_PX,
    ROTATE_HANDLE_OFFSET_PX,
};
use crate::error::ConfigError;
use crate::hit::HandleMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether move gestures snap to alignment guides.
    pub snap_enabled: bool,
    /// Maximum edge/center distance, in pixels, for a guide to activate.
    pub snap_threshold_px: f64,
    /// Angular step, in degrees, for shift-constrained rotation.
    pub rotation_snap_deg: f64,
    /// Smallest width/height, in page units, a resize may produce.
    pub min_element_size: f64,
    /// Hit slop around resize handles, in pixels.
    pub handle_radius_px: f64,
    /// Distance of the rotate handle above the selection, in pixels.
    pub rotate_handle_offset_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            snap_threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
            rotation_snap_deg: DEFAULT_ROTATION_SNAP_DEG,
            min_element_size: DEFAULT_MIN_ELEMENT_SIZE,
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed input, [`ConfigError::InvalidValue`]
    /// when a number is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("snap_threshold_px", self.snap_threshold_px)?;
        non_negative("handle_radius_px", self.handle_radius_px)?;
        non_negative("rotate_handle_offset_px", self.rotate_handle_offset_px)?;
        positive("rotation_snap_deg", self.rotation_snap_deg)?;
        positive("min_element_size", self.min_element_size)?;
        Ok(())
    }

    #[must_use]
    pub fn handle_metrics(&self) -> HandleMetrics {
        HandleMetrics { handle_radius_px: self.handle_radius_px, rotate_offset_px: self.rotate_handle_offset_px }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 { Ok(()) } else { Err(ConfigError::InvalidValue { field, value }) }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(ConfigError::InvalidValue { field, value }) }
}
