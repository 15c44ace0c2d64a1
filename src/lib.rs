//! Geometry and transform engine for the page design editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to the
//! editor UI. It owns element geometry on a page: folding the transient visual
//! scale of a resize into each element kind's intrinsic dimensions, computing
//! alignment guides and snapping while elements are dragged, and running the
//! drag/resize/rotate gesture that ties the two together. Persistence, assets,
//! and rendering stay in the host; the engine hands committed geometry back as
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`element`] | Element types, kind payloads, boundary validation |
//! | [`geometry`] | Points, rectangles, scaled and rotated bounds |
//! | [`commit`] | Scale commit per element kind |
//! | [`align`] | Alignment guides and snap deltas |
//! | [`session`] | Transform session state machine |
//! | [`canvas`] | Page store: paint order, lock, z-order operations |
//! | [`engine`] | Host-facing engine and pointer/keyboard handling |
//! | [`hit`] | Hit-testing against elements and selection handles |
//! | [`camera`] | Pan/zoom and screen/page conversions |
//! | [`input`] | Input event types and the pointer gesture state |
//! | [`config`] | Engine configuration |
//! | [`error`] | Error types for boundary operations |
//! | [`consts`] | Shared numeric constants (snap threshold, handle sizes, etc.) |
//! | [`wasm`] | JavaScript binding |

pub mod align;
pub mod camera;
pub mod canvas;
pub mod commit;
pub mod config;
pub mod consts;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod session;
pub mod wasm;
