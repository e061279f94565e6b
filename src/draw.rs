//! Frame draw list
//!
//! The UI records flat drawing commands into a [`DrawList`] during the frame
//! callback; the session replays them on the GPU at present time. Only two
//! primitives exist: clearing the whole target and clearing a scissored
//! rectangle to a flat colour.

use crate::ui::geometry::Rect;
use crate::ui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole target
    Clear(Color),
    /// Clear the area covered by `rect` (bottom-left origin)
    FillRect { rect: Rect, color: Color },
}

/// Ordered drawing commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    /// Record a flat rectangle; empty rectangles are dropped
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Colour of the last full clear, if any
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Rectangles drawn after the last full clear, in paint order
    pub fn visible_rects(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        let start = self
            .commands
            .iter()
            .rposition(|cmd| matches!(cmd, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|cmd| match cmd {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            DrawCommand::Clear(_) => None,
        })
    }
}
