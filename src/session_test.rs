#![allow(clippy::float_cmp)]

use super::*;
use crate::align::SnapDelta;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn canvas_with(elements: &[Element]) -> Canvas {
    let mut canvas = Canvas::new(1000.0, 1000.0);
    for e in elements {
        canvas.insert(e.clone()).unwrap();
    }
    canvas
}

fn get(canvas: &Canvas, id: ElementId) -> Element {
    canvas.get(&id).unwrap().clone()
}

// =============================================================
// Membership
// =============================================================

#[test]
fn begin_skips_locked_and_unknown_ids() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let locked = Element::rectangle(20.0, 0.0, 10.0, 10.0).with_locked(true);
    let canvas = canvas_with(&[a.clone(), locked.clone()]);
    let ids = [a.id, locked.id, uuid::Uuid::new_v4()];
    let session = TransformSession::begin(&canvas, &ids, Gesture::Move);
    assert_eq!(session.member_ids().collect::<Vec<_>>(), vec![a.id]);
}

#[test]
fn members_follow_paint_order() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let b = Element::rectangle(20.0, 0.0, 10.0, 10.0);
    let canvas = canvas_with(&[a.clone(), b.clone()]);
    let session = TransformSession::begin(&canvas, &[b.id, a.id], Gesture::Move);
    assert_eq!(session.member_ids().collect::<Vec<_>>(), vec![a.id, b.id]);
}

#[test]
fn all_locked_session_is_an_empty_noop() {
    let locked = Element::rectangle(0.0, 0.0, 10.0, 10.0).with_locked(true);
    let mut canvas = canvas_with(std::slice::from_ref(&locked));
    let before = canvas.clone();
    let mut session = TransformSession::begin(&canvas, &[locked.id], Gesture::Move);
    assert!(session.is_empty());
    let result = session.update(&mut canvas, TransformDelta::translate(50.0, 50.0), Some(5.0));
    assert!(result.is_empty());
    assert!(session.end(&mut canvas).is_empty());
    assert_eq!(canvas, before);
}

// =============================================================
// Move
// =============================================================

#[test]
fn move_accumulates_deltas() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Move);
    session.update(&mut canvas, TransformDelta::translate(10.0, 5.0), None);
    session.update(&mut canvas, TransformDelta::translate(3.0, -2.0), None);
    let moved = get(&canvas, a.id);
    assert_eq!(moved.x, 13.0);
    assert_eq!(moved.y, 3.0);
    assert_eq!(session.transform().dx, 13.0);
}

#[test]
fn move_snaps_to_nearby_edge() {
    let m = Element::rectangle(90.0, 0.0, 50.0, 50.0);
    let t = Element::rectangle(100.0, 500.0, 200.0, 20.0);
    let mut canvas = canvas_with(&[m.clone(), t]);
    let mut session = TransformSession::begin(&canvas, &[m.id], Gesture::Move);
    let result = session.update(&mut canvas, TransformDelta::translate(7.0, 0.0), Some(5.0));
    assert_eq!(result.vertical, vec![100.0]);
    assert!(approx_eq(result.snap.dx, 3.0));
    assert!(approx_eq(get(&canvas, m.id).x, 100.0));
}

#[test]
fn snap_does_not_stick_once_pointer_moves_away() {
    let m = Element::rectangle(90.0, 0.0, 50.0, 50.0);
    let t = Element::rectangle(100.0, 500.0, 200.0, 20.0);
    let mut canvas = canvas_with(&[m.clone(), t]);
    let mut session = TransformSession::begin(&canvas, &[m.id], Gesture::Move);
    session.update(&mut canvas, TransformDelta::translate(7.0, 0.0), Some(5.0));
    // Raw offset is now 7 + 20 = 27; left edge at 117 is far from every target line.
    let result = session.update(&mut canvas, TransformDelta::translate(20.0, 0.0), Some(5.0));
    assert!(result.vertical.is_empty());
    assert!(approx_eq(get(&canvas, m.id).x, 117.0));
}

#[test]
fn no_threshold_means_no_guides() {
    let m = Element::rectangle(90.0, 0.0, 50.0, 50.0);
    let t = Element::rectangle(100.0, 500.0, 200.0, 20.0);
    let mut canvas = canvas_with(&[m.clone(), t]);
    let mut session = TransformSession::begin(&canvas, &[m.id], Gesture::Move);
    let result = session.update(&mut canvas, TransformDelta::translate(7.0, 0.0), None);
    assert!(result.is_empty());
    assert_eq!(get(&canvas, m.id).x, 97.0);
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_previews_scale_then_end_commits() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    session.update(&mut canvas, TransformDelta::scale(2.0, 1.0), Some(5.0));

    let preview = get(&canvas, a.id);
    assert_eq!(preview.width, 100.0);
    assert_eq!(preview.scale_x, 2.0);

    let committed = session.end(&mut canvas);
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].width, 200.0);
    assert_eq!(committed[0].height, 50.0);
    assert!(committed[0].is_at_rest());
    assert_eq!(get(&canvas, a.id), committed[0]);
}

#[test]
fn resize_factors_multiply() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    session.update(&mut canvas, TransformDelta::scale(2.0, 2.0), None);
    session.update(&mut canvas, TransformDelta::scale(1.5, 0.5), None);
    let preview = get(&canvas, a.id);
    assert_eq!(preview.scale_x, 3.0);
    assert_eq!(preview.scale_y, 1.0);
}

#[test]
fn resize_keeps_anchor_fixed() {
    // Dragging the west edge: the east edge (x = 110) stays put.
    let a = Element::rectangle(10.0, 0.0, 100.0, 50.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let anchor = Point::new(110.0, 0.0);
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor });
    session.update(&mut canvas, TransformDelta::scale(0.5, 1.0), None);
    let committed = session.end(&mut canvas);
    let e = &committed[0];
    assert!(approx_eq(e.x, 60.0));
    assert!(approx_eq(e.x + e.width, 110.0));
}

#[test]
fn resize_ignores_bad_factors() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    session.update(&mut canvas, TransformDelta::scale(f64::NAN, 2.0), None);
    session.update(&mut canvas, TransformDelta::scale(-1.0, 2.0), None);
    assert!(get(&canvas, a.id).is_at_rest());
}

#[test]
fn resize_reports_touching_guides_without_snapping() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let t = Element::rectangle(200.0, 500.0, 10.0, 10.0);
    let mut canvas = canvas_with(&[a.clone(), t]);
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    let result = session.update(&mut canvas, TransformDelta::scale(2.0, 1.0), Some(5.0));
    assert_eq!(result.vertical, vec![200.0]);
    assert_eq!(result.snap, SnapDelta::default());
    assert_eq!(get(&canvas, a.id).x, 0.0);
}

#[test]
fn resize_hides_guides_the_edge_does_not_reach() {
    // Right edge lands at 200, two units short of the target's left edge.
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let t = Element::rectangle(198.0, 500.0, 10.0, 10.0);
    let mut canvas = canvas_with(&[a.clone(), t]);
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    let result = session.update(&mut canvas, TransformDelta::scale(2.0, 1.0), Some(5.0));
    assert!(result.is_empty());
    assert!(result.intersections.is_empty());
    assert_eq!(result.snap, SnapDelta::default());
}

#[test]
fn circle_resize_commits_radius() {
    let c = Element::circle(0.0, 0.0, 40.0);
    let mut canvas = canvas_with(std::slice::from_ref(&c));
    let mut session = TransformSession::begin(&canvas, &[c.id], Gesture::Resize { anchor: Point::new(0.0, 0.0) });
    session.update(&mut canvas, TransformDelta::scale(1.5, 1.5), None);
    let committed = session.end(&mut canvas);
    let crate::element::ElementKind::Shape(shape) = &committed[0].kind else {
        panic!("expected shape");
    };
    assert_eq!(shape.form, crate::element::ShapeForm::Circle { radius: 30.0 });
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn rotate_about_own_center_keeps_position() {
    let a = Element::rectangle(0.0, 0.0, 100.0, 50.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Rotate { pivot: Point::new(50.0, 25.0) });
    session.update(&mut canvas, TransformDelta::rotate(30.0), None);
    session.update(&mut canvas, TransformDelta::rotate(-60.0), None);
    let e = get(&canvas, a.id);
    assert!(approx_eq(e.x, 0.0));
    assert!(approx_eq(e.y, 0.0));
    assert!(approx_eq(e.rotation, 330.0));
}

#[test]
fn rotate_about_external_pivot_orbits() {
    let a = Element::rectangle(90.0, -10.0, 20.0, 20.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Rotate { pivot: Point::new(0.0, 0.0) });
    session.update(&mut canvas, TransformDelta::rotate(90.0), None);
    let e = get(&canvas, a.id);
    // Center (100, 0) orbits to (0, 100).
    assert!(approx_eq(e.x, -10.0));
    assert!(approx_eq(e.y, 90.0));
    assert!(approx_eq(e.rotation, 90.0));
}

// =============================================================
// Cancel
// =============================================================

#[test]
fn cancel_restores_exact_state() {
    let a = Element::rectangle(3.25, 7.5, 100.0, 50.0).with_rotation(12.0);
    let b = Element::circle(200.0, 200.0, 40.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    let before = canvas.clone();

    let mut session = TransformSession::begin(&canvas, &[a.id, b.id], Gesture::Resize { anchor: Point::new(1.0, 1.0) });
    session.update(&mut canvas, TransformDelta { dx: 4.0, dy: -3.0, scale_x: 1.7, scale_y: 0.3, rotation: 0.0 }, Some(5.0));
    session.update(&mut canvas, TransformDelta::scale(0.9, 2.2), Some(5.0));
    assert_ne!(canvas, before);

    session.cancel(&mut canvas);
    assert_eq!(canvas, before);
}

#[test]
fn update_keeps_paint_order_changed_mid_gesture() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let b = Element::rectangle(20.0, 0.0, 10.0, 10.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Move);
    canvas.bring_to_front(&a.id).unwrap();

    session.update(&mut canvas, TransformDelta::translate(1.0, 0.0), None);
    let z: Vec<(ElementId, i64)> = canvas.elements().iter().map(|e| (e.id, e.z_index)).collect();
    assert_eq!(z, vec![(b.id, 0), (a.id, 1)]);
    assert_eq!(get(&canvas, a.id).x, 1.0);

    session.cancel(&mut canvas);
    assert_eq!(get(&canvas, a.id).x, 0.0);
    assert_eq!(get(&canvas, a.id).z_index, 1);
}

#[test]
fn update_keeps_lock_toggled_mid_gesture() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let mut canvas = canvas_with(std::slice::from_ref(&a));
    let mut session = TransformSession::begin(&canvas, &[a.id], Gesture::Move);
    canvas.set_locked(&a.id, true).unwrap();
    session.update(&mut canvas, TransformDelta::translate(1.0, 0.0), None);
    assert!(get(&canvas, a.id).locked);
}

#[test]
fn end_skips_members_deleted_mid_gesture() {
    let a = Element::rectangle(0.0, 0.0, 10.0, 10.0);
    let b = Element::rectangle(20.0, 0.0, 10.0, 10.0);
    let mut canvas = canvas_with(&[a.clone(), b.clone()]);
    let mut session = TransformSession::begin(&canvas, &[a.id, b.id], Gesture::Move);
    session.update(&mut canvas, TransformDelta::translate(5.0, 5.0), None);
    canvas.remove(&a.id).unwrap();
    let committed = session.end(&mut canvas);
    assert_eq!(committed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![b.id]);
}

#[test]
fn gesture_json_is_tagged_by_kind() {
    let g: Gesture = serde_json::from_str(r#"{"kind":"resize","anchor":{"x":1,"y":2}}"#).unwrap();
    assert_eq!(g, Gesture::Resize { anchor: Point::new(1.0, 2.0) });
    let d: TransformDelta = serde_json::from_str(r#"{"dx":3}"#).unwrap();
    assert_eq!(d, TransformDelta::translate(3.0, 0.0));
}
