//! Error types for the boundary operations of the canvas crate.
//!
//! The per-frame paths (commit, guide computation, session updates) never
//! fail; they clamp or ignore. Only operations where outside input enters the
//! engine return these errors.

use crate::element::ElementId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CanvasError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
    #[error("element is locked: {0}")]
    Locked(ElementId),
    #[error("invalid geometry: {field} = {value}")]
    InvalidGeometry { field: &'static str, value: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {field} = {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EngineError {
    #[error("a transform session is already active")]
    SessionActive,
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
