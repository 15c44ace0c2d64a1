//! Element model: the positionable things that live on a page.
//!
//! An [`Element`] carries the geometry every kind shares (enclosing rectangle,
//! rotation, transient scale, z-order, lock) plus an [`ElementKind`] payload
//! with the kind-specific intrinsic fields. The scale pair is UI-only state:
//! it is non-identity only while a transform gesture is in flight and is folded
//! into the intrinsic fields by [`crate::commit`].
//!
//! Validation of user-supplied values lives here ([`Element::validate`],
//! [`ElementPatch::validate`]) and is invoked by the canvas store at the point
//! where input enters. The geometry and commit code assume validated input.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_BORDER_COLOR, DEFAULT_FILL, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR, GEOMETRY_EPSILON,
    IDENTITY_SCALE,
};
use crate::error::CanvasError;
use crate::geometry::normalize_degrees;

/// Unique identifier for an element.
pub type ElementId = Uuid;

fn identity_scale() -> f64 {
    IDENTITY_SCALE
}

fn full_opacity() -> f64 {
    1.0
}

/// A page element as stored on the canvas and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Left edge of the enclosing rectangle.
    pub x: f64,
    /// Top edge of the enclosing rectangle.
    pub y: f64,
    /// Intrinsic (unscaled) width.
    pub width: f64,
    /// Intrinsic (unscaled) height.
    pub height: f64,
    /// Clockwise rotation in degrees around the center, in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Transient horizontal scale. `1.0` whenever no gesture is in flight.
    #[serde(default = "identity_scale")]
    pub scale_x: f64,
    /// Transient vertical scale. `1.0` whenever no gesture is in flight.
    #[serde(default = "identity_scale")]
    pub scale_y: f64,
    /// Paint order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z_index: i64,
    /// Locked elements cannot be transformed or deleted.
    #[serde(default)]
    pub locked: bool,
    /// Kind-specific payload.
    pub kind: ElementKind,
}

/// Kind-specific element fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextProps),
    Shape(ShapeProps),
    Image(ImageProps),
}

/// Horizontal text alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    #[serde(default)]
    pub text: String,
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default = "default_text_color")]
    pub color: String,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

/// Geometric form of a shape, tagged by `form`.
///
/// Forms this engine does not know deserialize as [`ShapeForm::Unsupported`]
/// so that a newer document still loads; their scale is never committed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "lowercase")]
pub enum ShapeForm {
    Rectangle,
    /// Circle inscribed in the `width` square; `radius` and `height` are derived from `width`.
    Circle { radius: f64 },
    /// Segment from the element origin to `(x + x2, y + y2)`. `width`/`height` are `|x2|`/`|y2|`.
    Line { x2: f64, y2: f64 },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeProps {
    #[serde(flatten)]
    pub form: ShapeForm,
    #[serde(default = "default_fill")]
    pub background_color: String,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default)]
    pub border_width: f64,
}

fn default_fill() -> String {
    DEFAULT_FILL.to_owned()
}

fn default_border_color() -> String {
    DEFAULT_BORDER_COLOR.to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProps {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
}

impl Element {
    fn base(x: f64, y: f64, width: f64, height: f64, kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            scale_x: IDENTITY_SCALE,
            scale_y: IDENTITY_SCALE,
            z_index: 0,
            locked: false,
            kind,
        }
    }

    fn shape(x: f64, y: f64, width: f64, height: f64, form: ShapeForm) -> Self {
        Self::base(
            x,
            y,
            width,
            height,
            ElementKind::Shape(ShapeProps {
                form,
                background_color: default_fill(),
                border_color: default_border_color(),
                border_width: 0.0,
            }),
        )
    }

    /// New rectangle with default styling.
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::shape(x, y, width, height, ShapeForm::Rectangle)
    }

    /// New circle whose bounding box is `diameter` wide; the radius is derived from it.
    #[must_use]
    pub fn circle(x: f64, y: f64, diameter: f64) -> Self {
        Self::shape(x, y, diameter, diameter, ShapeForm::Circle { radius: diameter * 0.5 })
    }

    /// New line from `(x, y)` to `(x + x2, y + y2)`.
    #[must_use]
    pub fn line(x: f64, y: f64, x2: f64, y2: f64) -> Self {
        Self::shape(x, y, x2.abs(), y2.abs(), ShapeForm::Line { x2, y2 })
    }

    /// New text box with default typography.
    #[must_use]
    pub fn text(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self::base(
            x,
            y,
            width,
            height,
            ElementKind::Text(TextProps {
                text: text.into(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: default_font_family(),
                align: TextAlign::default(),
                bold: false,
                italic: false,
                underline: false,
                strikethrough: false,
                color: default_text_color(),
            }),
        )
    }

    /// New image element; dimensions come from the caller (usually the decoded image).
    #[must_use]
    pub fn image(x: f64, y: f64, width: f64, height: f64, src: impl Into<String>) -> Self {
        Self::base(x, y, width, height, ElementKind::Image(ImageProps { src: src.into(), alt: String::new(), opacity: 1.0 }))
    }

    /// Builder-style lock flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Builder-style rotation, normalized to `[0, 360)`.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_degrees(degrees);
        self
    }

    /// Whether the transient scale pair is at identity.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.scale_x == IDENTITY_SCALE && self.scale_y == IDENTITY_SCALE
    }

    /// Human-readable kind label used in logs.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Shape(shape) => match shape.form {
                ShapeForm::Rectangle => "rectangle",
                ShapeForm::Circle { .. } => "circle",
                ShapeForm::Line { .. } => "line",
                ShapeForm::Unsupported => "unsupported",
            },
        }
    }

    /// Check every user-supplied numeric field.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidGeometry`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        non_negative("width", self.width)?;
        non_negative("height", self.height)?;
        finite("rotation", self.rotation)?;
        non_negative("scale_x", self.scale_x)?;
        non_negative("scale_y", self.scale_y)?;
        match &self.kind {
            ElementKind::Text(text) => positive("font_size", text.font_size),
            ElementKind::Shape(shape) => {
                non_negative("border_width", shape.border_width)?;
                match shape.form {
                    ShapeForm::Circle { radius } => {
                        non_negative("radius", radius)?;
                        derived("radius", radius, self.width * 0.5)?;
                        derived("height", self.height, self.width)
                    }
                    ShapeForm::Line { x2, y2 } => {
                        finite("x2", x2)?;
                        finite("y2", y2)?;
                        derived("width", self.width, x2.abs())?;
                        derived("height", self.height, y2.abs())
                    }
                    ShapeForm::Rectangle | ShapeForm::Unsupported => Ok(()),
                }
            }
            ElementKind::Image(image) => unit_interval("opacity", image.opacity),
        }
    }

    /// Take the geometry of `other` (position, size, rotation, scale, and the
    /// kind payload) while keeping this element's paint slot and lock flag.
    pub(crate) fn copy_geometry_from(&mut self, other: &Element) {
        self.x = other.x;
        self.y = other.y;
        self.width = other.width;
        self.height = other.height;
        self.rotation = other.rotation;
        self.scale_x = other.scale_x;
        self.scale_y = other.scale_y;
        self.kind.clone_from(&other.kind);
    }
}

/// Sparse geometry update. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees; normalized on apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl ElementPatch {
    /// Check the present fields.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidGeometry`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if let Some(x) = self.x {
            finite("x", x)?;
        }
        if let Some(y) = self.y {
            finite("y", y)?;
        }
        if let Some(w) = self.width {
            non_negative("width", w)?;
        }
        if let Some(h) = self.height {
            non_negative("height", h)?;
        }
        if let Some(r) = self.rotation {
            finite("rotation", r)?;
        }
        Ok(())
    }

    /// Apply the present fields to `element`. Assumes [`Self::validate`] passed.
    ///
    /// A circle takes its diameter from `width` (or `height` when only that is
    /// present) and re-derives the other size fields. A line rescales its
    /// endpoint offset on each patched axis, keeping its direction.
    pub fn apply_to(&self, element: &mut Element) {
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(w) = self.width {
            element.width = w;
        }
        if let Some(h) = self.height {
            element.height = h;
        }
        if let ElementKind::Shape(shape) = &mut element.kind {
            match &mut shape.form {
                ShapeForm::Circle { radius } => {
                    if let Some(diameter) = self.width.or(self.height) {
                        element.width = diameter;
                        element.height = diameter;
                        *radius = diameter * 0.5;
                    }
                }
                ShapeForm::Line { x2, y2 } => {
                    if let Some(w) = self.width {
                        *x2 = w.copysign(*x2);
                    }
                    if let Some(h) = self.height {
                        *y2 = h.copysign(*y2);
                    }
                }
                ShapeForm::Rectangle | ShapeForm::Unsupported => {}
            }
        }
        if let Some(r) = self.rotation {
            element.rotation = normalize_degrees(r);
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), CanvasError> {
    if value.is_finite() { Ok(()) } else { Err(CanvasError::InvalidGeometry { field, value }) }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), CanvasError> {
    if value.is_finite() && value >= 0.0 { Ok(()) } else { Err(CanvasError::InvalidGeometry { field, value }) }
}

fn positive(field: &'static str, value: f64) -> Result<(), CanvasError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(CanvasError::InvalidGeometry { field, value }) }
}

/// A size field that must agree with the field it is derived from.
fn derived(field: &'static str, value: f64, expected: f64) -> Result<(), CanvasError> {
    if (value - expected).abs() <= GEOMETRY_EPSILON { Ok(()) } else { Err(CanvasError::InvalidGeometry { field, value }) }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), CanvasError> {
    if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(CanvasError::InvalidGeometry { field, value }) }
}
