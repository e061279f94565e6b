//! # gridshell
//!
//! A minimal Wayland windowing shell. It owns one toplevel window and its
//! GPU drawable, pumps the compositor's events, and on every frame hands a
//! snapshot of window and pointer state to a hosted application that lays
//! out grid-organized interactive boxes.
//!
//! ## Architecture
//!
//! - `session`: Wayland connection, xdg toplevel and wgpu drawable
//! - `driver`: frame loop state machine and the `ShellApp` trait
//! - `ui`: layout solver, touch arbiter, boxes and the composition manager
//! - `snapshot`: per-frame window/pointer state
//! - `draw`: flat drawing commands replayed by the GPU context
//! - `config`: TOML configuration
//! - `demo`: the window chrome run by the `gridshell` binary
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gridshell::{DemoShell, DisplaySession, FrameDriver, ShellConfig, TouchArbiter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ShellConfig::default();
//!     let options = config.session_options()?;
//!     let session = DisplaySession::initialize(&options)?;
//!     let shell = DemoShell::new(TouchArbiter::new(), options.gpu.clear_color);
//!     FrameDriver::new(session, shell).run()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod demo;
pub mod draw;
pub mod driver;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod ui;

pub use config::ShellConfig;
pub use demo::DemoShell;
pub use draw::{DrawCommand, DrawList};
pub use driver::{DriverState, Frame, FrameDriver, FrameStats, ShellApp, StopReason};
pub use error::{SessionError, SessionResult};
pub use session::{DisplaySession, ResizeDirection, SessionOptions, SurfaceSession};
pub use snapshot::{PointerLatch, PointerState, WindowStateSnapshot};
pub use ui::{
    BoxId, BoxStyle, Color, CompositionManager, InteractiveBox, Layout, LayoutId, Rect, TextAlign,
    TouchArbiter, TouchEvent,
};

pub use anyhow::{Context, Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
