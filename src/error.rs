//! Error types for the display session
//!
//! Initialization failures are fatal and reported once. Protocol oddities
//! never become errors; they are logged where they are handled.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to the Wayland display: {0}")]
    Connect(#[from] wayland_client::ConnectError),

    #[error("failed to read the Wayland registry: {0}")]
    Registry(#[from] wayland_client::globals::GlobalError),

    #[error("required Wayland global `{0}` is not advertised by the compositor")]
    MissingGlobal(&'static str),

    #[error("a display session is already active in this process")]
    AlreadyActive,

    #[error("event loop failure: {0}")]
    EventLoop(String),

    #[error("failed to create GPU surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter can present to this surface")]
    NoAdapter,

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported texture format")]
    NoSurfaceFormat,

    #[error("present called before the compositor configured the surface")]
    NotConfigured,

    #[error("GPU device is out of memory")]
    OutOfMemory,

    #[error("display connection lost: {0}")]
    Disconnected(String),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
