//! Interactive box: a styled rectangle with a touch callback

use super::geometry::Rect;
use super::style::BoxStyle;
use super::touch::{BoxId, TouchArbiter, TouchEvent};
use crate::draw::DrawList;
use std::fmt;

/// Invoked when a box may consume the current touch event
pub type BoxCallback = Box<dyn FnMut(&TouchEvent, &Rect)>;

pub struct InteractiveBox {
    id: BoxId,
    rect: Rect,
    blocking: bool,
    style: BoxStyle,
    callback: Option<BoxCallback>,
}

impl fmt::Debug for InteractiveBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveBox")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("blocking", &self.blocking)
            .field("style", &self.style)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl InteractiveBox {
    pub fn new(id: BoxId, rect: Rect, style: BoxStyle) -> Self {
        Self {
            id,
            rect,
            blocking: true,
            style,
            callback: None,
        }
    }

    /// Non-blocking boxes observe gestures without claiming them
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn on_touch<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&TouchEvent, &Rect) + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub(super) fn set_id(&mut self, id: BoxId) {
        self.id = id;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn style(&self) -> &BoxStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut BoxStyle {
        &mut self.style
    }

    /// Run the arbitration rule for an event inside this box and fire the
    /// callback when consumable. Returns whether the event was consumed.
    pub fn handle_touch(&mut self, event: &TouchEvent, arbiter: &TouchArbiter) -> bool {
        if !self.rect.contains_point(event.x, event.y) {
            return false;
        }

        let consumable = arbiter.check_and_register(self.id, event, self.blocking);
        if consumable {
            if let Some(callback) = self.callback.as_mut() {
                callback(event, &self.rect);
            }
        }
        consumable
    }

    /// Paint the flat background
    pub fn render(&self, draws: &mut DrawList) {
        draws.fill_rect(self.rect, self.style.background);
    }
}
