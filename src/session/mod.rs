//! Display/surface session
//!
//! [`SurfaceSession`] is the seam between the frame driver and the display
//! server. [`DisplaySession`] implements it on top of Wayland
//! (smithay-client-toolkit + calloop) with a wgpu drawable.
//!
//! Only one session may be live per process; [`DisplaySession::initialize`]
//! refuses to create a second one.

pub mod gpu;
pub mod wayland;

use crate::draw::DrawList;
use crate::error::SessionResult;
use crate::snapshot::PointerState;
use crate::ui::style::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use gpu::{GpuContext, GpuOptions, PresentModePreference};
pub use wayland::DisplaySession;

/// What the frame driver needs from a display session
pub trait SurfaceSession {
    /// Process queued display-server events.
    ///
    /// Blocks only while waiting for protocol data, never spins.
    fn pump_events(&mut self) -> SessionResult<()>;

    /// True once the server acknowledged the initial surface configuration
    fn is_configured(&self) -> bool;

    /// True once the server asked the window to close. Never resets.
    fn shutdown_requested(&self) -> bool;

    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Drain latched pointer input; press/release edges reset afterwards
    fn take_pointer(&mut self) -> PointerState;

    /// Replay `draws` on the GPU and present. Rejected before configuration.
    fn present(&mut self, draws: &DrawList) -> SessionResult<()>;

    /// Switch the pointer to a named cursor (`"default"`, `"pointer"`, ...)
    fn set_cursor(&mut self, name: &str);

    /// Start a compositor-driven interactive resize
    fn begin_resize(&mut self, direction: ResizeDirection);
}

/// Window creation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub title: String,
    pub app_id: String,
    pub width: u32,
    pub height: u32,
    pub min_size: Option<(u32, u32)>,
    pub gpu: GpuOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            title: "gridshell".to_string(),
            app_id: "org.gridshell.Shell".to_string(),
            width: 800,
            height: 600,
            min_size: None,
            gpu: GpuOptions::default(),
        }
    }
}

/// Edge or corner grabbed for an interactive resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeDirection::North => "n",
            ResizeDirection::South => "s",
            ResizeDirection::East => "e",
            ResizeDirection::West => "w",
            ResizeDirection::NorthEast => "ne",
            ResizeDirection::NorthWest => "nw",
            ResizeDirection::SouthEast => "se",
            ResizeDirection::SouthWest => "sw",
        }
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown resize direction `{0}` (expected n, s, e, w, ne, nw, se or sw)")]
pub struct ParseDirectionError(String);

impl FromStr for ResizeDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" => Ok(ResizeDirection::North),
            "s" => Ok(ResizeDirection::South),
            "e" => Ok(ResizeDirection::East),
            "w" => Ok(ResizeDirection::West),
            "ne" => Ok(ResizeDirection::NorthEast),
            "nw" => Ok(ResizeDirection::NorthWest),
            "se" => Ok(ResizeDirection::SouthEast),
            "sw" => Ok(ResizeDirection::SouthWest),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Requests the frame callback may make of the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRequest {
    SetCursor(String),
    BeginResize(ResizeDirection),
}

impl SessionRequest {
    pub fn apply<S: SurfaceSession + ?Sized>(self, session: &mut S) {
        match self {
            SessionRequest::SetCursor(name) => session.set_cursor(&name),
            SessionRequest::BeginResize(direction) => session.begin_resize(direction),
        }
    }
}

/// Background colour used when a frame records no clear of its own
pub const DEFAULT_CLEAR_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
