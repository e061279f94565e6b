//! UI composition layer consumed by the frame callback
//!
//! - `layout`: row/column solver producing absolute slot rectangles
//! - `touch`: shared single-gesture ownership arbiter
//! - `widget`: interactive boxes
//! - `composition`: per-screen owner of layouts and boxes
//! - `geometry` and `style`: rectangles, colours and label placement

pub mod composition;
pub mod geometry;
pub mod layout;
pub mod style;
pub mod touch;
pub mod widget;

pub use composition::{CompositionManager, LayoutId};
pub use geometry::{Point, Rect};
pub use layout::{Layout, LayoutSlot};
pub use style::{BoxStyle, Color, TextAlign};
pub use touch::{BoxId, TouchArbiter, TouchEvent};
pub use widget::{BoxCallback, InteractiveBox};
