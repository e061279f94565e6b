//! Property-based tests for the layout solver and touch arbiter

use gridshell::ui::geometry::Rect;
use gridshell::{BoxId, Layout, TouchArbiter, TouchEvent};
use proptest::prelude::*;

const TOLERANCE: f32 = 0.01;

prop_compose! {
    fn auto_grid()(
        width in 1.0f32..4000.0,
        height in 1.0f32..4000.0,
        columns in proptest::collection::vec(1usize..8, 1..8),
    ) -> (Rect, Vec<usize>) {
        (Rect::new(0.0, 0.0, width, height), columns)
    }
}

fn build(area: Rect, columns: &[usize]) -> Layout {
    let mut layout = Layout::new(area);
    for (row, count) in columns.iter().enumerate() {
        let definition: Vec<String> = (0..*count).map(|c| format!("r{}c{}", row, c)).collect();
        layout.add_row(&definition.join(" "));
    }
    layout.recalculate();
    layout
}

fn touch_event() -> impl Strategy<Value = TouchEvent> {
    (0u8..4, 0.0f32..100.0, 0.0f32..100.0).prop_map(|(kind, x, y)| TouchEvent {
        x,
        y,
        pressed: kind == 0,
        held: kind <= 1,
        released: kind == 2,
    })
}

proptest! {
    #[test]
    fn auto_widths_and_heights_fill_the_area((area, columns) in auto_grid()) {
        let layout = build(area, &columns);

        let mut height_sum = 0.0;
        for (row, count) in columns.iter().enumerate() {
            let width_sum: f32 = (0..*count).map(|c| layout.element_area(row, c).width).sum();
            prop_assert!((width_sum - area.width).abs() <= TOLERANCE * area.width.max(1.0));
            height_sum += layout.element_area(row, 0).height;
        }
        prop_assert!((height_sum - area.height).abs() <= TOLERANCE * area.height.max(1.0));
    }

    #[test]
    fn recalculation_is_idempotent((area, columns) in auto_grid(), fixed in 0.0f32..5000.0) {
        let mut layout = build(area, &columns);
        layout.set_row_height(0, fixed);
        layout.set_col_width(0, 0, fixed);
        layout.recalculate();
        let first: Vec<Rect> = layout.slots().map(|s| s.rect()).collect();
        layout.recalculate();
        let second: Vec<Rect> = layout.slots().map(|s| s.rect()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn oversized_fixed_sizes_never_go_negative((area, columns) in auto_grid(), extra in 0.0f32..1000.0) {
        let mut layout = build(area, &columns);
        layout.set_row_height(0, area.height + extra);
        layout.set_col_width(0, 0, area.width + extra);
        layout.recalculate();
        for slot in layout.slots() {
            prop_assert!(slot.rect().width >= 0.0);
            prop_assert!(slot.rect().height >= 0.0);
        }
    }

    #[test]
    fn at_most_one_owner_and_release_clears(
        steps in proptest::collection::vec((0u64..6, any::<bool>(), touch_event()), 1..200)
    ) {
        let arbiter = TouchArbiter::new();
        for (raw, blocking, event) in steps {
            let id = BoxId::from_raw(raw);
            let owner_before = arbiter.owner();
            let consumable = arbiter.check_and_register(id, &event, blocking);

            match owner_before {
                Some(owner) if event.released && owner == id => {
                    prop_assert!(!consumable);
                    prop_assert_eq!(arbiter.owner(), None);
                }
                Some(owner) if owner == id => {
                    prop_assert_eq!(consumable, event.pressed || event.held);
                    prop_assert_eq!(arbiter.owner(), Some(owner));
                }
                Some(owner) => {
                    prop_assert!(!consumable);
                    prop_assert_eq!(arbiter.owner(), Some(owner));
                }
                None => {
                    let active = event.pressed || event.held;
                    prop_assert_eq!(consumable, active);
                    let expected = (active && blocking).then_some(id);
                    prop_assert_eq!(arbiter.owner(), expected);
                }
            }
        }
    }

    #[test]
    fn non_blocking_boxes_never_own(events in proptest::collection::vec(touch_event(), 1..100)) {
        let arbiter = TouchArbiter::new();
        let id = arbiter.allocate_id();
        for event in events {
            arbiter.check_and_register(id, &event, false);
            prop_assert!(!arbiter.is_active());
        }
    }
}
