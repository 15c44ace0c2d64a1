#![allow(clippy::float_cmp)]

use super::*;

fn rect(x: f64, y: f64) -> Element {
    Element::rectangle(x, y, 10.0, 10.0)
}

fn canvas_with(elements: &[Element]) -> Canvas {
    let mut canvas = Canvas::new(800.0, 600.0);
    for e in elements {
        canvas.insert(e.clone()).unwrap();
    }
    canvas
}

fn order(canvas: &Canvas) -> Vec<ElementId> {
    canvas.elements().iter().map(|e| e.id).collect()
}

fn z_indices(canvas: &Canvas) -> Vec<i64> {
    canvas.elements().iter().map(|e| e.z_index).collect()
}

// =============================================================
// Page
// =============================================================

#[test]
fn new_clamps_bad_sizes() {
    let canvas = Canvas::new(f64::NAN, -10.0);
    assert_eq!(canvas.width(), 0.0);
    assert_eq!(canvas.height(), 0.0);
}

#[test]
fn contains_uses_page_bounds() {
    let canvas = Canvas::new(100.0, 50.0);
    assert!(canvas.contains(Point::new(100.0, 50.0)));
    assert!(!canvas.contains(Point::new(-1.0, 10.0)));
    assert!(!canvas.contains(Point::new(10.0, 51.0)));
}

#[test]
fn set_size_and_background() {
    let mut canvas = Canvas::new(10.0, 10.0);
    canvas.set_size(200.0, f64::INFINITY);
    canvas.set_background(Some(Background::Color { color: "#FFFFFF".into() }));
    assert_eq!(canvas.bounds(), Rect::new(0.0, 0.0, 200.0, 0.0));
    assert_eq!(canvas.background(), Some(&Background::Color { color: "#FFFFFF".into() }));
}

// =============================================================
// Insert / remove
// =============================================================

#[test]
fn insert_stacks_on_top() {
    let a = rect(0.0, 0.0);
    let b = rect(5.0, 5.0);
    let canvas = canvas_with(&[a.clone(), b.clone()]);
    assert_eq!(order(&canvas), vec![a.id, b.id]);
    assert_eq!(z_indices(&canvas), vec![0, 1]);
    assert_eq!(canvas.len(), 2);
}

#[test]
fn insert_rejects_duplicate_id() {
    let a = rect(0.0, 0.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    assert_eq!(canvas.insert(a.clone()), Err(CanvasError::DuplicateId(a.id)));
    assert_eq!(canvas.len(), 1);
}

#[test]
fn insert_rejects_invalid_geometry() {
    let mut canvas = Canvas::new(100.0, 100.0);
    let mut bad = rect(0.0, 0.0);
    bad.width = -5.0;
    assert!(matches!(canvas.insert(bad), Err(CanvasError::InvalidGeometry { field: "width", .. })));
    assert!(canvas.is_empty());
}

#[test]
fn remove_renumbers_paint_order() {
    let a = rect(0.0, 0.0);
    let b = rect(1.0, 1.0);
    let c = rect(2.0, 2.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone(), c.clone()]);
    let removed = canvas.remove(&b.id).unwrap();
    assert_eq!(removed.id, b.id);
    assert_eq!(order(&canvas), vec![a.id, c.id]);
    assert_eq!(z_indices(&canvas), vec![0, 1]);
}

#[test]
fn remove_refuses_locked() {
    let a = rect(0.0, 0.0).with_locked(true);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    assert_eq!(canvas.remove(&a.id), Err(CanvasError::Locked(a.id)));
    assert_eq!(canvas.len(), 1);
}

#[test]
fn remove_unknown_is_not_found() {
    let mut canvas = Canvas::new(10.0, 10.0);
    let id = uuid::Uuid::new_v4();
    assert_eq!(canvas.remove(&id), Err(CanvasError::NotFound(id)));
}

// =============================================================
// Patches and locking
// =============================================================

#[test]
fn apply_patch_updates_geometry() {
    let a = rect(0.0, 0.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let patch = ElementPatch { x: Some(40.0), width: Some(25.0), ..ElementPatch::default() };
    canvas.apply_patch(&a.id, &patch).unwrap();
    let e = canvas.get(&a.id).unwrap();
    assert_eq!(e.x, 40.0);
    assert_eq!(e.width, 25.0);
}

#[test]
fn apply_patch_refuses_locked_geometry() {
    let a = rect(0.0, 0.0).with_locked(true);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let patch = ElementPatch { x: Some(40.0), ..ElementPatch::default() };
    assert_eq!(canvas.apply_patch(&a.id, &patch), Err(CanvasError::Locked(a.id)));
    assert_eq!(canvas.get(&a.id).unwrap().x, 0.0);
}

#[test]
fn apply_patch_can_unlock_and_move_together() {
    let a = rect(0.0, 0.0).with_locked(true);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let patch = ElementPatch { x: Some(40.0), locked: Some(false), ..ElementPatch::default() };
    canvas.apply_patch(&a.id, &patch).unwrap();
    let e = canvas.get(&a.id).unwrap();
    assert!(!e.locked);
    assert_eq!(e.x, 40.0);
}

#[test]
fn apply_patch_rejects_invalid_values() {
    let a = rect(0.0, 0.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let patch = ElementPatch { y: Some(f64::NAN), ..ElementPatch::default() };
    assert!(matches!(canvas.apply_patch(&a.id, &patch), Err(CanvasError::InvalidGeometry { field: "y", .. })));
}

#[test]
fn set_locked_toggles_flag() {
    let a = rect(0.0, 0.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    canvas.set_locked(&a.id, true).unwrap();
    assert!(canvas.get(&a.id).unwrap().locked);
    assert!(canvas.set_locked(&uuid::Uuid::new_v4(), true).is_err());
}

// =============================================================
// Z-order
// =============================================================

#[test]
fn z_order_operations() {
    let a = rect(0.0, 0.0);
    let b = rect(1.0, 1.0);
    let c = rect(2.0, 2.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone(), c.clone()]);

    canvas.bring_to_front(&a.id).unwrap();
    assert_eq!(order(&canvas), vec![b.id, c.id, a.id]);

    canvas.send_to_back(&a.id).unwrap();
    assert_eq!(order(&canvas), vec![a.id, b.id, c.id]);

    canvas.bring_forward(&a.id).unwrap();
    assert_eq!(order(&canvas), vec![b.id, a.id, c.id]);

    canvas.send_backward(&c.id).unwrap();
    assert_eq!(order(&canvas), vec![b.id, c.id, a.id]);
    assert_eq!(z_indices(&canvas), vec![0, 1, 2]);
}

#[test]
fn z_order_at_edges_is_noop() {
    let a = rect(0.0, 0.0);
    let b = rect(1.0, 1.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    canvas.bring_forward(&b.id).unwrap();
    canvas.send_backward(&a.id).unwrap();
    assert_eq!(order(&canvas), vec![a.id, b.id]);
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn load_page_skips_invalid_and_duplicate_elements() {
    let good = rect(0.0, 0.0);
    let mut bad = rect(0.0, 0.0);
    bad.x = f64::INFINITY;
    let page = Page {
        width: 300.0,
        height: 200.0,
        background: None,
        elements: vec![good.clone(), bad, good.clone()],
    };
    let mut canvas = Canvas::default();
    canvas.load_page(page);
    assert_eq!(order(&canvas), vec![good.id]);
    assert_eq!(canvas.width(), 300.0);
}

#[test]
fn load_page_renumbers_z() {
    let mut a = rect(0.0, 0.0);
    a.z_index = 7;
    let mut b = rect(0.0, 0.0);
    b.z_index = 3;
    let mut canvas = Canvas::default();
    canvas.load_page(Page { width: 10.0, height: 10.0, background: None, elements: vec![a, b] });
    assert_eq!(z_indices(&canvas), vec![0, 1]);
}

#[test]
fn page_round_trips() {
    let mut canvas = canvas_with(&[rect(0.0, 0.0), Element::circle(10.0, 10.0, 20.0)]);
    canvas.set_background(Some(Background::Image { src: "bg.png".into() }));
    let json = serde_json::to_string(&canvas.to_page()).unwrap();
    let page: Page = serde_json::from_str(&json).unwrap();
    let mut loaded = Canvas::default();
    loaded.load_page(page);
    assert_eq!(loaded, canvas);
}

#[test]
fn restore_puts_back_original_in_place() {
    let a = rect(0.0, 0.0);
    let b = rect(5.0, 5.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    let original = canvas.get(&a.id).unwrap().clone();
    canvas.get_mut(&a.id).unwrap().x = 99.0;
    canvas.restore(&original);
    assert_eq!(canvas.get(&a.id), Some(&original));
    assert_eq!(order(&canvas), vec![a.id, b.id]);
}

#[test]
fn restore_keeps_current_paint_slot_and_lock() {
    let a = rect(0.0, 0.0);
    let b = rect(5.0, 5.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    let original = canvas.get(&a.id).unwrap().clone();
    canvas.get_mut(&a.id).unwrap().x = 99.0;
    canvas.bring_to_front(&a.id).unwrap();
    canvas.set_locked(&a.id, true).unwrap();

    canvas.restore(&original);
    let restored = canvas.get(&a.id).unwrap();
    assert_eq!(restored.x, 0.0);
    assert!(restored.locked);
    assert_eq!(order(&canvas), vec![b.id, a.id]);
    assert_eq!(z_indices(&canvas), vec![0, 1]);
}

#[test]
fn apply_patch_keeps_circle_consistent() {
    let c = Element::circle(0.0, 0.0, 40.0);
    let mut canvas = canvas_with(std::slice::from_ref(&c));
    let patch = ElementPatch { width: Some(80.0), ..ElementPatch::default() };
    canvas.apply_patch(&c.id, &patch).unwrap();
    let patched = canvas.get(&c.id).unwrap();
    assert_eq!(patched.height, 80.0);
    assert!(patched.validate().is_ok());
}
