//! Browser binding. Exposes [`EngineCore`] and the pure geometry functions to
//! JavaScript with JSON-encoded arguments and results.
//!
//! Errors cross the boundary as `Error` objects whose message is the Rust
//! error's display string.

use wasm_bindgen::prelude::*;

use crate::align::compute_guides;
use crate::canvas::Page;
use crate::commit::commit_scale;
use crate::config::EngineConfig;
use crate::element::{Element, ElementId};
use crate::engine::{Action, EngineCore};
use crate::geometry::Point;
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::session::{Gesture, SessionHandle, TransformDelta};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn parse_modifiers(raw: Option<String>) -> Result<Modifiers, JsValue> {
    match raw {
        Some(json) => serde_json::from_str(&json).map_err(js_err),
        None => Ok(Modifiers::default()),
    }
}

/// `computeGuides(movingJson, allJson, threshold)` → alignment result JSON.
///
/// # Errors
///
/// Throws when either element list is not valid JSON.
#[wasm_bindgen(js_name = computeGuides)]
pub fn compute_guides_json(moving_json: &str, all_json: &str, threshold: f64) -> Result<String, JsValue> {
    let moving: Vec<Element> = serde_json::from_str(moving_json).map_err(js_err)?;
    let all: Vec<Element> = serde_json::from_str(all_json).map_err(js_err)?;
    to_json(&compute_guides(&moving, &all, threshold))
}

/// `commitScale(elementJson)` → committed element JSON.
///
/// # Errors
///
/// Throws when the element is not valid JSON or carries out-of-range
/// geometry. Commit itself never fails.
#[wasm_bindgen(js_name = commitScale)]
pub fn commit_scale_json(element_json: &str) -> Result<String, JsValue> {
    let element: Element = serde_json::from_str(element_json).map_err(js_err)?;
    element.validate().map_err(js_err)?;
    to_json(&commit_scale(&element))
}

#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    /// Create an engine; `config_json` may be omitted for defaults.
    ///
    /// # Errors
    ///
    /// Throws on malformed or out-of-range config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Engine, JsValue> {
        let config = match config_json {
            Some(raw) => EngineConfig::from_json(&raw).map_err(js_err)?,
            None => EngineConfig::default(),
        };
        Ok(Self { core: EngineCore::new(config) })
    }

    /// # Errors
    ///
    /// Throws when the page is not valid JSON.
    #[wasm_bindgen(js_name = loadPage)]
    pub fn load_page(&mut self, page_json: &str) -> Result<(), JsValue> {
        let page: Page = serde_json::from_str(page_json).map_err(js_err)?;
        self.core.load_page(page);
        Ok(())
    }

    /// # Errors
    ///
    /// Throws if serialization fails.
    #[wasm_bindgen(js_name = pageJson)]
    pub fn page_json(&self) -> Result<String, JsValue> {
        to_json(&self.core.canvas.to_page())
    }

    /// # Errors
    ///
    /// Throws on malformed input or while another session is active.
    #[wasm_bindgen(js_name = beginSession)]
    pub fn begin_session(&mut self, ids_json: &str, gesture_json: &str) -> Result<u32, JsValue> {
        let ids: Vec<ElementId> = serde_json::from_str(ids_json).map_err(js_err)?;
        let gesture: Gesture = serde_json::from_str(gesture_json).map_err(js_err)?;
        self.core.begin_session(&ids, gesture).map(|h| h.0).map_err(js_err)
    }

    /// # Errors
    ///
    /// Throws when the delta is not valid JSON.
    #[wasm_bindgen(js_name = updateSession)]
    pub fn update_session(&mut self, handle: u32, delta_json: &str) -> Result<String, JsValue> {
        let delta: TransformDelta = serde_json::from_str(delta_json).map_err(js_err)?;
        to_json(&self.core.update_session(SessionHandle(handle), delta))
    }

    /// # Errors
    ///
    /// Throws if serialization fails.
    #[wasm_bindgen(js_name = endSession)]
    pub fn end_session(&mut self, handle: u32) -> Result<String, JsValue> {
        to_json(&self.core.end_session(SessionHandle(handle)))
    }

    #[wasm_bindgen(js_name = cancelSession)]
    pub fn cancel_session(&mut self, handle: u32) {
        self.core.cancel_session(SessionHandle(handle));
    }

    /// # Errors
    ///
    /// Throws on malformed modifiers JSON.
    #[wasm_bindgen(js_name = onPointerDown)]
    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers_json: Option<String>) -> Result<String, JsValue> {
        let modifiers = parse_modifiers(modifiers_json)?;
        actions_json(&self.core.on_pointer_down(Point::new(x, y), Button::from_dom(button), modifiers))
    }

    /// # Errors
    ///
    /// Throws on malformed modifiers JSON.
    #[wasm_bindgen(js_name = onPointerMove)]
    pub fn on_pointer_move(&mut self, x: f64, y: f64, modifiers_json: Option<String>) -> Result<String, JsValue> {
        let modifiers = parse_modifiers(modifiers_json)?;
        actions_json(&self.core.on_pointer_move(Point::new(x, y), modifiers))
    }

    /// # Errors
    ///
    /// Throws on malformed modifiers JSON.
    #[wasm_bindgen(js_name = onPointerUp)]
    pub fn on_pointer_up(&mut self, x: f64, y: f64, button: i16, modifiers_json: Option<String>) -> Result<String, JsValue> {
        let modifiers = parse_modifiers(modifiers_json)?;
        actions_json(&self.core.on_pointer_up(Point::new(x, y), Button::from_dom(button), modifiers))
    }

    /// # Errors
    ///
    /// Throws on malformed modifiers JSON.
    #[wasm_bindgen(js_name = onKeyDown)]
    pub fn on_key_down(&mut self, key: String, modifiers_json: Option<String>) -> Result<String, JsValue> {
        let modifiers = parse_modifiers(modifiers_json)?;
        actions_json(&self.core.on_key_down(&Key(key), modifiers))
    }

    /// # Errors
    ///
    /// Throws on malformed modifiers JSON.
    #[wasm_bindgen(js_name = onWheel)]
    pub fn on_wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers_json: Option<String>) -> Result<String, JsValue> {
        let modifiers = parse_modifiers(modifiers_json)?;
        actions_json(&self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers))
    }

    /// # Errors
    ///
    /// Throws if serialization fails.
    #[wasm_bindgen(js_name = selectionJson)]
    pub fn selection_json(&self) -> Result<String, JsValue> {
        to_json(&self.core.selection())
    }
}

fn actions_json(actions: &[Action]) -> Result<String, JsValue> {
    to_json(&actions)
}
