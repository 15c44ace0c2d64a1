//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Tolerance used when comparing guide coordinates and snap deltas.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Identity value for the transient scale factors.
pub const IDENTITY_SCALE: f64 = 1.0;

// ── Snapping ────────────────────────────────────────────────────

/// Default alignment tolerance, in screen pixels.
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 5.0;

/// Default angular step for shift-constrained rotation, in degrees.
pub const DEFAULT_ROTATION_SNAP_DEG: f64 = 15.0;

/// Smallest width/height a resize gesture may shrink an element to, in page units.
pub const DEFAULT_MIN_ELEMENT_SIZE: f64 = 1.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed camera zoom.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed camera zoom.
pub const MAX_ZOOM: f64 = 8.0;

/// Zoom multiplier per 100 px of wheel travel.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Element defaults ────────────────────────────────────────────

/// Default font size for new text elements.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Default font family for new text elements.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Default text color.
pub const DEFAULT_TEXT_COLOR: &str = "#1F1A17";

/// Default shape fill.
pub const DEFAULT_FILL: &str = "#D94B4B";

/// Default shape border color.
pub const DEFAULT_BORDER_COLOR: &str = "#1F1A17";
