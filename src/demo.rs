//! Demo shell
//!
//! A window chrome built from the UI layer:
//!
//! ```text
//! +-----------------------------+-------+
//! | titlebar                    | close |  40px
//! +-----------------------------+-------+
//! | content                             |
//! +-------------------------------+-----+
//! | status                        |grip |  24px
//! +-------------------------------+-----+
//! ```
//!
//! Box callbacks cannot reach the session directly; they queue
//! [`ShellAction`]s that `on_frame` turns into frame requests.

use crate::driver::{Frame, ShellApp, StopReason};
use crate::session::ResizeDirection;
use crate::ui::{
    BoxId, BoxStyle, Color, CompositionManager, InteractiveBox, Layout, LayoutId, Rect, TextAlign,
    TouchArbiter,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const TITLEBAR_HEIGHT: f32 = 40.0;
pub const CLOSE_BUTTON_WIDTH: f32 = 70.0;
pub const STATUS_HEIGHT: f32 = 24.0;
pub const GRIP_SIZE: f32 = 24.0;

const GRIP_CURSOR: &str = "se-resize";
const DEFAULT_CURSOR: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Close,
    BeginResize(ResizeDirection),
}

type ActionQueue = Rc<RefCell<Vec<ShellAction>>>;

pub struct DemoShell {
    ui: CompositionManager,
    background: Color,
    actions: ActionQueue,
    layout: Option<LayoutId>,
    content: Option<BoxId>,
    status: Option<BoxId>,
    grip: Option<BoxId>,
    taps: Rc<Cell<u32>>,
    cursor: &'static str,
}

impl DemoShell {
    pub fn new(arbiter: TouchArbiter, background: Color) -> Self {
        Self {
            ui: CompositionManager::new(arbiter, 0.0, 0.0),
            background,
            actions: Rc::new(RefCell::new(Vec::new())),
            layout: None,
            content: None,
            status: None,
            grip: None,
            taps: Rc::new(Cell::new(0)),
            cursor: DEFAULT_CURSOR,
        }
    }

    pub fn composition(&self) -> &CompositionManager {
        &self.ui
    }

    pub fn layout_id(&self) -> Option<LayoutId> {
        self.layout
    }

    /// Presses seen by the content area
    pub fn taps(&self) -> u32 {
        self.taps.get()
    }

    fn build(&mut self, width: f32, height: f32) -> Result<()> {
        self.ui.set_window_size(width, height);
        let layout = self.ui.add_layout(Layout::new(Rect::new(0.0, 0.0, width, height)));
        self.layout = Some(layout);

        // title row
        self.add_row(layout, "titlebar closebtn", TITLEBAR_HEIGHT, Some((1, CLOSE_BUTTON_WIDTH)))?;
        let titlebar = self.ui.create_box(
            Rect::ZERO,
            BoxStyle::default()
                .with_background(Color::rgb(0.15, 0.15, 0.18))
                .with_text("gridshell", TextAlign::Left),
        );
        let queue = self.actions.clone();
        let close = self.ui.register_box(|id| {
            InteractiveBox::new(
                id,
                Rect::ZERO,
                BoxStyle::default()
                    .with_background(Color::rgb(0.75, 0.2, 0.2))
                    .with_text("x", TextAlign::Center),
            )
            .on_touch(move |event, _| {
                if event.pressed {
                    queue.borrow_mut().push(ShellAction::Close);
                }
            })
        });
        self.bind(layout, "titlebar", titlebar)?;
        self.bind(layout, "closebtn", close)?;

        // content row
        self.add_row(layout, "content", 0.0, None)?;
        let taps = self.taps.clone();
        let content = self.ui.register_box(|id| {
            InteractiveBox::new(
                id,
                Rect::ZERO,
                BoxStyle::default().with_background(Color::rgb(0.22, 0.22, 0.25)),
            )
            .blocking(false)
            .on_touch(move |event, _| {
                if event.pressed {
                    taps.set(taps.get() + 1);
                }
            })
        });
        self.bind(layout, "content", content)?;
        self.content = Some(content);

        // status row
        self.add_row(layout, "status grip", STATUS_HEIGHT, Some((1, GRIP_SIZE)))?;
        let status = self.ui.create_box(
            Rect::ZERO,
            BoxStyle::default()
                .with_background(Color::rgb(0.15, 0.15, 0.18))
                .with_text("", TextAlign::Left),
        );
        let queue = self.actions.clone();
        let grip = self.ui.register_box(|id| {
            InteractiveBox::new(
                id,
                Rect::ZERO,
                BoxStyle::default().with_background(Color::rgb(0.4, 0.4, 0.45)),
            )
            .on_touch(move |event, _| {
                if event.pressed {
                    queue
                        .borrow_mut()
                        .push(ShellAction::BeginResize(ResizeDirection::SouthEast));
                }
            })
        });
        self.bind(layout, "status", status)?;
        self.bind(layout, "grip", grip)?;
        self.status = Some(status);
        self.grip = Some(grip);

        info!("🧩 Demo shell built with {} boxes", self.ui.box_count());
        Ok(())
    }

    fn add_row(
        &mut self,
        layout: LayoutId,
        definition: &str,
        height: f32,
        fixed_col: Option<(usize, f32)>,
    ) -> Result<()> {
        let target = self.ui.layout_mut(layout).context("demo layout missing")?;
        let row = target.add_row(definition);
        target.set_row_height(row, height);
        if let Some((col, width)) = fixed_col {
            target.set_col_width(row, col, width);
        }
        Ok(())
    }

    fn bind(&mut self, layout: LayoutId, slot: &str, id: BoxId) -> Result<()> {
        if !self.ui.bind_box(layout, slot, id) {
            anyhow::bail!("failed to bind {} to slot '{}'", id, slot);
        }
        Ok(())
    }

    fn box_contains(&self, id: Option<BoxId>, x: f32, y: f32) -> bool {
        id.and_then(|id| self.ui.get_box(id))
            .is_some_and(|b| b.rect().contains_point(x, y))
    }
}

impl ShellApp for DemoShell {
    fn on_start(&mut self, width: u32, height: u32) -> Result<()> {
        self.build(width as f32, height as f32)
    }

    fn on_frame(&mut self, frame: &mut Frame<'_>) -> i32 {
        if frame.resized() {
            let (width, height) = frame.size();
            self.ui.resize(width, height);
        }

        let touch = frame.touch();
        if !touch.is_idle() {
            self.ui.dispatch_touch(&touch);
            // a release outside the owning box never reaches it
            if touch.released && self.ui.arbiter().is_active() {
                debug!("Dropping stale gesture owned by {:?}", self.ui.arbiter().owner());
                self.ui.arbiter().reset();
            }
        }

        let wanted = if self.box_contains(self.grip, touch.x, touch.y) {
            GRIP_CURSOR
        } else {
            DEFAULT_CURSOR
        };
        if wanted != self.cursor {
            self.cursor = wanted;
            frame.set_cursor(wanted);
        }

        for action in self.actions.borrow_mut().drain(..) {
            match action {
                ShellAction::Close => frame.request_exit(),
                ShellAction::BeginResize(direction) => frame.begin_resize(direction),
            }
        }

        let status_text = format!("{:.0} fps  {} taps", frame.fps(), self.taps.get());
        if let Some(status) = self.status.and_then(|id| self.ui.box_mut(id)) {
            status.style_mut().text = status_text;
        }

        frame.draws().clear(self.background);
        self.ui.render(frame.draws());
        0
    }

    fn on_stop(&mut self, reason: &StopReason) {
        info!("👋 Demo shell stopping ({:?})", reason);
        self.ui.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawList;
    use crate::session::SessionRequest;
    use crate::snapshot::WindowStateSnapshot;

    fn started(width: u32, height: u32) -> DemoShell {
        let mut shell = DemoShell::new(TouchArbiter::new(), Color::BLACK);
        shell.on_start(width, height).unwrap();
        shell
    }

    fn snapshot_at(x: f32, y: f32, pressed: bool, released: bool) -> WindowStateSnapshot {
        WindowStateSnapshot {
            screen_width: 800.0,
            screen_height: 600.0,
            pointer_x: x,
            pointer_y: y,
            pointer_pressed: pressed,
            pointer_held: pressed,
            pointer_released: released,
            ..Default::default()
        }
    }

    #[test]
    fn test_chrome_layout() {
        let shell = started(800, 600);
        let layout = shell.composition().layout(shell.layout_id().unwrap()).unwrap();
        assert_eq!(layout.slot_area("titlebar"), Some(Rect::new(0.0, 560.0, 730.0, 40.0)));
        assert_eq!(layout.slot_area("closebtn"), Some(Rect::new(730.0, 560.0, 70.0, 40.0)));
        assert_eq!(layout.slot_area("content"), Some(Rect::new(0.0, 24.0, 800.0, 536.0)));
        assert_eq!(layout.slot_area("grip"), Some(Rect::new(776.0, 0.0, 24.0, 24.0)));
        assert_eq!(shell.composition().box_count(), 5);
    }

    #[test]
    fn test_close_button_requests_exit() {
        let mut shell = started(800, 600);
        let mut draws = DrawList::new();
        let mut frame = Frame::new(snapshot_at(750.0, 575.0, true, false), &mut draws, 0.0, 0);

        assert_eq!(shell.on_frame(&mut frame), 0);
        assert!(frame.exit_requested());
        assert!(!draws.is_empty());
    }

    #[test]
    fn test_content_counts_taps_and_stale_gesture_is_dropped() {
        let mut shell = started(800, 600);
        let mut draws = DrawList::new();

        // press on the title bar, release over the content area
        let mut frame = Frame::new(snapshot_at(100.0, 580.0, true, false), &mut draws, 0.0, 0);
        shell.on_frame(&mut frame);
        assert!(shell.composition().arbiter().is_active());

        let mut frame = Frame::new(snapshot_at(100.0, 300.0, false, true), &mut draws, 0.0, 1);
        shell.on_frame(&mut frame);
        assert!(!shell.composition().arbiter().is_active());

        let mut frame = Frame::new(snapshot_at(100.0, 300.0, true, false), &mut draws, 0.0, 2);
        shell.on_frame(&mut frame);
        assert_eq!(shell.taps(), 1);
    }

    #[test]
    fn test_grip_sets_cursor_and_starts_resize() {
        let mut shell = started(800, 600);
        let mut draws = DrawList::new();
        let mut frame = Frame::new(snapshot_at(790.0, 10.0, true, false), &mut draws, 0.0, 0);
        shell.on_frame(&mut frame);

        assert_eq!(
            frame.finish(),
            (
                false,
                vec![
                    SessionRequest::SetCursor(GRIP_CURSOR.to_string()),
                    SessionRequest::BeginResize(ResizeDirection::SouthEast),
                ]
            )
        );
    }

    #[test]
    fn test_resize_follows_window() {
        let mut shell = started(800, 600);
        let mut draws = DrawList::new();
        let mut snapshot = snapshot_at(0.0, 0.0, false, false);
        snapshot.screen_width = 1600.0;
        snapshot.screen_height = 1200.0;
        snapshot.resized = true;
        let mut frame = Frame::new(snapshot, &mut draws, 0.0, 0);
        shell.on_frame(&mut frame);

        let layout = shell.composition().layout(shell.layout_id().unwrap()).unwrap();
        assert_eq!(layout.area(), Rect::new(0.0, 0.0, 1600.0, 1200.0));
        assert_eq!(layout.slot_area("closebtn"), Some(Rect::new(1530.0, 1160.0, 70.0, 40.0)));
    }
}
