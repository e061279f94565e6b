//! End-to-end UI scenarios: layout, arbitration and composition together

use gridshell::ui::geometry::Rect;
use gridshell::{BoxStyle, CompositionManager, DrawList, InteractiveBox, Layout, TouchArbiter, TouchEvent};
use std::cell::RefCell;
use std::rc::Rc;

fn press(x: f32, y: f32) -> TouchEvent {
    TouchEvent { x, y, pressed: true, held: true, released: false }
}

fn hold(x: f32, y: f32) -> TouchEvent {
    TouchEvent { x, y, pressed: false, held: true, released: false }
}

fn release(x: f32, y: f32) -> TouchEvent {
    TouchEvent { x, y, pressed: false, held: false, released: true }
}

#[test]
fn test_titlebar_press_hits_close_button_only() {
    let mut ui = CompositionManager::new(TouchArbiter::new(), 800.0, 600.0);
    let mut layout = Layout::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    layout.add_row("titlebar closebtn");
    layout.set_row_height(0, 40.0);
    layout.set_col_width(0, 1, 70.0);
    let layout = ui.add_layout(layout);

    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut ids = Vec::new();
    for name in ["titlebar", "closebtn"] {
        let log = hits.clone();
        let id = ui.register_box(|id| {
            InteractiveBox::new(id, Rect::ZERO, BoxStyle::default())
                .on_touch(move |_, _| log.borrow_mut().push(name))
        });
        assert!(ui.bind_box(layout, name, id));
        ids.push(id);
    }

    assert_eq!(ui.get_box(ids[0]).unwrap().rect(), Rect::new(0.0, 560.0, 730.0, 40.0));
    assert_eq!(ui.get_box(ids[1]).unwrap().rect(), Rect::new(730.0, 560.0, 70.0, 40.0));

    assert_eq!(ui.dispatch_touch(&press(750.0, 575.0)), 1);
    assert_eq!(*hits.borrow(), vec!["closebtn"]);
    assert_eq!(ui.arbiter().owner(), Some(ids[1]));
}

#[test]
fn test_held_gesture_blocks_other_box_until_release() {
    let arbiter = TouchArbiter::new();
    let mut ui = CompositionManager::new(arbiter.clone(), 200.0, 100.0);
    let a = ui.create_box(Rect::new(0.0, 0.0, 100.0, 100.0), BoxStyle::default());
    let b = ui.create_box(Rect::new(100.0, 0.0, 100.0, 100.0), BoxStyle::default());

    assert_eq!(ui.dispatch_touch(&press(50.0, 50.0)), 1);
    assert_eq!(arbiter.owner(), Some(a));

    // drag into B while still held: B may not consume
    assert_eq!(ui.dispatch_touch(&hold(150.0, 50.0)), 0);
    assert_eq!(ui.dispatch_touch(&press(150.0, 50.0)), 0);

    // A releases, then B can claim
    assert_eq!(ui.dispatch_touch(&release(50.0, 50.0)), 0);
    assert!(!arbiter.is_active());
    assert_eq!(ui.dispatch_touch(&press(150.0, 50.0)), 1);
    assert_eq!(arbiter.owner(), Some(b));
}

#[test]
fn test_non_blocking_overlay_observes_without_owning() {
    let arbiter = TouchArbiter::new();
    let mut ui = CompositionManager::new(arbiter.clone(), 100.0, 100.0);
    let overlay = ui.register_box(|id| {
        InteractiveBox::new(id, Rect::new(0.0, 0.0, 100.0, 100.0), BoxStyle::default()).blocking(false)
    });
    let button = ui.create_box(Rect::new(10.0, 10.0, 20.0, 20.0), BoxStyle::default());

    assert_eq!(ui.dispatch_touch(&press(50.0, 50.0)), 1);
    assert!(!arbiter.is_active());

    assert_eq!(ui.dispatch_touch(&press(15.0, 15.0)), 2);
    assert_eq!(arbiter.owner(), Some(button));
    assert_ne!(arbiter.owner(), Some(overlay));
}

#[test]
fn test_gesture_is_exclusive_across_managers() {
    let arbiter = TouchArbiter::new();
    let mut left = CompositionManager::new(arbiter.clone(), 100.0, 100.0);
    let mut right = CompositionManager::new(arbiter.clone(), 100.0, 100.0);
    left.create_box(Rect::new(0.0, 0.0, 100.0, 100.0), BoxStyle::default());
    right.create_box(Rect::new(0.0, 0.0, 100.0, 100.0), BoxStyle::default());

    assert_eq!(left.dispatch_touch(&press(10.0, 10.0)), 1);
    assert_eq!(right.dispatch_touch(&press(10.0, 10.0)), 0);

    arbiter.reset();
    assert_eq!(right.dispatch_touch(&press(10.0, 10.0)), 1);
}

#[test]
fn test_doubling_window_doubles_every_box() {
    let mut ui = CompositionManager::new(TouchArbiter::new(), 400.0, 300.0);
    let free = ui.create_box(Rect::new(10.0, 20.0, 30.0, 40.0), BoxStyle::default());
    let mut layout = Layout::new(Rect::new(0.0, 0.0, 400.0, 300.0));
    layout.add_row("a b");
    let layout = ui.add_layout(layout);
    let bound = ui.create_box(Rect::ZERO, BoxStyle::default());
    assert!(ui.bind_box(layout, "b", bound));
    assert_eq!(ui.get_box(bound).unwrap().rect(), Rect::new(200.0, 0.0, 200.0, 300.0));

    ui.resize(800.0, 600.0);

    assert_eq!(ui.get_box(free).unwrap().rect(), Rect::new(20.0, 40.0, 60.0, 80.0));
    assert_eq!(ui.get_box(bound).unwrap().rect(), Rect::new(400.0, 0.0, 400.0, 600.0));
    assert_eq!(ui.layout(layout).unwrap().area(), Rect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn test_render_paints_in_registration_order() {
    use gridshell::Color;

    let mut ui = CompositionManager::new(TouchArbiter::new(), 100.0, 100.0);
    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    ui.create_box(Rect::new(0.0, 0.0, 50.0, 50.0), BoxStyle::default().with_background(red));
    ui.create_box(Rect::new(25.0, 25.0, 50.0, 50.0), BoxStyle::default().with_background(blue));

    let mut draws = DrawList::new();
    ui.render(&mut draws);
    let colors: Vec<_> = draws.visible_rects().map(|(_, c)| c).collect();
    assert_eq!(colors, vec![red, blue]);
}
