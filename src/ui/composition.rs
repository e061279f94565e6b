//! Composition manager: sole owner of a screen's layouts and boxes
//!
//! Layouts and boxes are stored in id-keyed arenas. Box ids come from the
//! shared [`TouchArbiter`] and increase with registration, so iterating the
//! box arena visits boxes in registration order. Clearing the manager drops
//! everything it owns.

use super::geometry::Rect;
use super::layout::Layout;
use super::style::BoxStyle;
use super::touch::{BoxId, TouchArbiter, TouchEvent};
use super::widget::InteractiveBox;
use crate::draw::DrawList;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Identity of a layout within one manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutId(u64);

#[derive(Debug)]
pub struct CompositionManager {
    arbiter: TouchArbiter,
    window_width: f32,
    window_height: f32,
    layouts: BTreeMap<LayoutId, Layout>,
    boxes: BTreeMap<BoxId, InteractiveBox>,
    next_layout_id: u64,
}

impl CompositionManager {
    pub fn new(arbiter: TouchArbiter, window_width: f32, window_height: f32) -> Self {
        debug!(
            "🧩 Composition manager created for {}x{}",
            window_width, window_height
        );
        Self {
            arbiter,
            window_width,
            window_height,
            layouts: BTreeMap::new(),
            boxes: BTreeMap::new(),
            next_layout_id: 0,
        }
    }

    pub fn arbiter(&self) -> &TouchArbiter {
        &self.arbiter
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.window_width, self.window_height)
    }

    /// Record a window size without rescaling anything
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Take ownership of a layout; it is resolved immediately
    pub fn add_layout(&mut self, mut layout: Layout) -> LayoutId {
        let id = LayoutId(self.next_layout_id);
        self.next_layout_id += 1;
        layout.recalculate();
        self.layouts.insert(id, layout);
        id
    }

    pub fn layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    /// Mutable access; call [`Self::recalculate_layouts`] afterwards
    pub fn layout_mut(&mut self, id: LayoutId) -> Option<&mut Layout> {
        self.layouts.get_mut(&id)
    }

    /// Register a box built around a freshly allocated id.
    ///
    /// The allocated id is stamped onto the box, so the arena key and the
    /// id used for arbitration always agree.
    pub fn register_box<F>(&mut self, build: F) -> BoxId
    where
        F: FnOnce(BoxId) -> InteractiveBox,
    {
        let id = self.arbiter.allocate_id();
        let mut widget = build(id);
        if widget.id() != id {
            warn!("🧩 Box built with id {:?}, registering it as {:?}", widget.id(), id);
            widget.set_id(id);
        }
        self.boxes.insert(id, widget);
        id
    }

    /// Register a plain blocking box without a callback
    pub fn create_box(&mut self, rect: Rect, style: BoxStyle) -> BoxId {
        self.register_box(|id| InteractiveBox::new(id, rect, style))
    }

    pub fn get_box(&self, id: BoxId) -> Option<&InteractiveBox> {
        self.boxes.get(&id)
    }

    pub fn box_mut(&mut self, id: BoxId) -> Option<&mut InteractiveBox> {
        self.boxes.get_mut(&id)
    }

    /// Remove a box, ending any gesture it owns
    pub fn remove_box(&mut self, id: BoxId) -> Option<InteractiveBox> {
        let removed = self.boxes.remove(&id);
        if removed.is_some() {
            self.arbiter.release(id);
        }
        removed
    }

    /// Bind a box to a named slot of a layout and adopt the slot rectangle
    pub fn bind_box(&mut self, layout: LayoutId, slot: &str, id: BoxId) -> bool {
        if !self.boxes.contains_key(&id) {
            return false;
        }
        let Some(target) = self.layouts.get_mut(&layout) else {
            return false;
        };
        if !target.bind(slot, id) {
            return false;
        }
        target.recalculate();
        self.sync_bindings();
        true
    }

    /// Resolve layouts marked dirty and push slot rectangles to bound boxes
    pub fn recalculate_layouts(&mut self) {
        for layout in self.layouts.values_mut() {
            if layout.needs_recalculation() {
                layout.recalculate();
            }
        }
        self.sync_bindings();
    }

    fn sync_bindings(&mut self) {
        for layout in self.layouts.values() {
            for (id, rect) in layout.bindings() {
                if let Some(widget) = self.boxes.get_mut(&id) {
                    widget.set_rect(rect);
                }
            }
        }
    }

    /// Rescale everything from the recorded window size to a new one.
    ///
    /// Width and height ratios are computed once and applied to every layout
    /// area and every box rectangle; layouts are then recalculated and boxes
    /// bound to a slot take that slot's rectangle.
    pub fn resize(&mut self, new_width: f32, new_height: f32) {
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            debug!("🧩 No previous window size, recording {}x{}", new_width, new_height);
            self.set_window_size(new_width, new_height);
            return;
        }

        let width_ratio = new_width / self.window_width;
        let height_ratio = new_height / self.window_height;
        info!(
            "📏 Resizing composition {}x{} -> {}x{} (ratios {:.3}, {:.3})",
            self.window_width, self.window_height, new_width, new_height, width_ratio, height_ratio
        );
        self.set_window_size(new_width, new_height);

        for layout in self.layouts.values_mut() {
            layout.set_area(layout.area().scaled(width_ratio, height_ratio));
            layout.recalculate();
        }

        for widget in self.boxes.values_mut() {
            widget.set_rect(widget.rect().scaled(width_ratio, height_ratio));
        }

        self.sync_bindings();
    }

    /// Offer a touch event to every box in registration order.
    /// Returns how many boxes consumed it.
    pub fn dispatch_touch(&mut self, event: &TouchEvent) -> usize {
        let mut consumed = 0;
        for widget in self.boxes.values_mut() {
            if widget.handle_touch(event, &self.arbiter) {
                consumed += 1;
            }
        }
        consumed
    }

    /// Paint every box in registration order; later boxes draw on top
    pub fn render(&self, draws: &mut DrawList) {
        for widget in self.boxes.values() {
            widget.render(draws);
        }
    }

    /// Destroy every layout and box owned by this manager
    pub fn clear(&mut self) {
        debug!(
            "🧹 Clearing {} layout(s) and {} box(es)",
            self.layouts.len(),
            self.boxes.len()
        );
        for id in self.boxes.keys() {
            self.arbiter.release(*id);
        }
        self.layouts.clear();
        self.boxes.clear();
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Box ids in registration order
    pub fn box_ids(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes.keys().copied()
    }
}
