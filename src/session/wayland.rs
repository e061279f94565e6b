//! Wayland implementation of the display session
//!
//! One xdg toplevel per process. Protocol callbacks land on [`WaylandState`]
//! through smithay-client-toolkit's delegate macros; the calloop event loop
//! drives the connection.

use super::gpu::GpuContext;
use super::{ResizeDirection, SessionOptions, SurfaceSession};
use crate::draw::DrawList;
use crate::error::{SessionError, SessionResult};
use crate::snapshot::{PointerLatch, PointerState};
use calloop::{EventLoop, LoopHandle};
use calloop_wayland_source::WaylandSource;
use log::{debug, info, trace, warn};
use raw_window_handle::{
    RawDisplayHandle, RawWindowHandle, WaylandDisplayHandle, WaylandWindowHandle,
};
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_output, delegate_pointer, delegate_registry, delegate_seat,
    delegate_xdg_shell, delegate_xdg_window,
    output::{OutputHandler, OutputState},
    reexports::protocols::xdg::shell::client::xdg_toplevel::ResizeEdge,
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{
        pointer::{CursorIcon, PointerEvent, PointerEventKind, PointerHandler, ThemeSpec, ThemedPointer},
        Capability, SeatHandler, SeatState,
    },
    shell::{
        xdg::{
            window::{Window, WindowConfigure, WindowDecorations, WindowHandler},
            XdgShell,
        },
        WaylandSurface,
    },
};
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use wayland_client::{
    globals::registry_queue_init,
    protocol::{wl_output, wl_pointer, wl_seat, wl_shm, wl_surface},
    Connection, Dispatch, Proxy, QueueHandle,
};

/// Set while a [`DisplaySession`] exists
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

enum PointerHandle {
    Themed(ThemedPointer),
    Plain(wl_pointer::WlPointer),
}

/// Protocol-facing half of the session
pub(crate) struct WaylandState {
    conn: Connection,
    qh: QueueHandle<WaylandState>,
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    compositor: CompositorState,
    shm: Option<wl_shm::WlShm>,
    _xdg_shell: XdgShell,
    window: Window,

    seat: Option<wl_seat::WlSeat>,
    pointer: Option<PointerHandle>,
    cursor: CursorIcon,
    last_serial: Option<u32>,
    latch: PointerLatch,

    width: u32,
    height: u32,
    configured: bool,
    shutdown_requested: bool,
    /// Drawable must be reconfigured before the next present
    resize_pending: bool,
    /// A frame callback has been requested and not yet delivered
    frame_pending: bool,
}

impl WaylandState {
    fn apply_cursor(&self) {
        let Some(pointer) = self.pointer.as_ref() else {
            return;
        };
        match pointer {
            PointerHandle::Themed(themed) => {
                if let Err(e) = themed.set_cursor(&self.conn, self.cursor) {
                    warn!("⚠️ Failed to set cursor {:?}: {}", self.cursor, e);
                }
            }
            PointerHandle::Plain(_) => debug!("No cursor theme available, keeping compositor cursor"),
        }
    }
}

/// Wayland window with a wgpu drawable
pub struct DisplaySession {
    // Declared first so the GPU surface is dropped before the wl_surface
    // and connection it points into.
    gpu: GpuContext,
    event_loop: EventLoop<'static, WaylandState>,
    state: WaylandState,
}

impl DisplaySession {
    /// Connect to the compositor, create the toplevel and the GPU context.
    ///
    /// Fails when `wl_compositor` or `xdg_wm_base` is missing, when the GPU
    /// surface cannot be created, or when another session is still alive.
    pub fn initialize(options: &SessionOptions) -> SessionResult<Self> {
        if SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::AlreadyActive);
        }
        Self::connect(options).map_err(|e| {
            SESSION_ACTIVE.store(false, Ordering::Release);
            e
        })
    }

    fn connect(options: &SessionOptions) -> SessionResult<Self> {
        info!("🌊 Connecting to Wayland display");
        let conn = Connection::connect_to_env()?;
        let (globals, event_queue) = registry_queue_init::<WaylandState>(&conn)?;
        let qh = event_queue.handle();

        let compositor = CompositorState::bind(&globals, &qh)
            .map_err(|_| SessionError::MissingGlobal("wl_compositor"))?;
        let xdg_shell =
            XdgShell::bind(&globals, &qh).map_err(|_| SessionError::MissingGlobal("xdg_wm_base"))?;
        let shm = match globals.bind::<wl_shm::WlShm, _, _>(&qh, 1..=1, ()) {
            Ok(shm) => Some(shm),
            Err(e) => {
                warn!("⚠️ wl_shm unavailable, cursor themes disabled: {}", e);
                None
            }
        };

        let surface = compositor.create_surface(&qh);
        let window = xdg_shell.create_window(surface, WindowDecorations::RequestServer, &qh);
        window.set_title(options.title.clone());
        window.set_app_id(options.app_id.clone());
        window.set_min_size(options.min_size);
        // initial commit without a buffer asks for the first configure
        window.commit();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: options.gpu.backends,
            ..Default::default()
        });
        let gpu_surface = create_gpu_surface(&instance, &conn, &window)?;
        let gpu = GpuContext::new(&instance, gpu_surface, &options.gpu)?;

        let event_loop: EventLoop<'static, WaylandState> =
            EventLoop::try_new().map_err(|e| SessionError::EventLoop(e.to_string()))?;
        insert_wayland_source(event_loop.handle(), conn.clone(), event_queue)?;

        let state = WaylandState {
            registry_state: RegistryState::new(&globals),
            output_state: OutputState::new(&globals, &qh),
            seat_state: SeatState::new(&globals, &qh),
            conn,
            qh,
            compositor,
            shm,
            _xdg_shell: xdg_shell,
            window,
            seat: None,
            pointer: None,
            cursor: CursorIcon::Default,
            last_serial: None,
            latch: PointerLatch::new(),
            width: options.width.max(1),
            height: options.height.max(1),
            configured: false,
            shutdown_requested: false,
            resize_pending: false,
            frame_pending: false,
        };
        info!(
            "🪟 Window '{}' created ({}x{} requested)",
            options.title, state.width, state.height
        );

        Ok(Self {
            gpu,
            event_loop,
            state,
        })
    }

    fn apply_pending_resize(&mut self) {
        if self.state.resize_pending && self.state.configured {
            self.gpu.configure(self.state.width, self.state.height);
            self.state.resize_pending = false;
        }
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        SESSION_ACTIVE.store(false, Ordering::Release);
        debug!("Display session closed");
    }
}

fn insert_wayland_source(
    handle: LoopHandle<'static, WaylandState>,
    conn: Connection,
    event_queue: wayland_client::EventQueue<WaylandState>,
) -> SessionResult<()> {
    WaylandSource::new(conn, event_queue)
        .insert(handle)
        .map_err(|e| SessionError::EventLoop(e.error.to_string()))?;
    Ok(())
}

fn create_gpu_surface(
    instance: &wgpu::Instance,
    conn: &Connection,
    window: &Window,
) -> SessionResult<wgpu::Surface<'static>> {
    let display = NonNull::new(conn.backend().display_ptr() as *mut c_void)
        .ok_or_else(|| SessionError::Disconnected("null wl_display pointer".into()))?;
    let surface = NonNull::new(window.wl_surface().id().as_ptr() as *mut c_void)
        .ok_or_else(|| SessionError::Disconnected("null wl_surface pointer".into()))?;

    let target = wgpu::SurfaceTargetUnsafe::RawHandle {
        raw_display_handle: RawDisplayHandle::Wayland(WaylandDisplayHandle::new(display)),
        raw_window_handle: RawWindowHandle::Wayland(WaylandWindowHandle::new(surface)),
    };
    // SAFETY: the display and surface outlive the wgpu surface; DisplaySession
    // drops its GpuContext before the window and connection.
    let surface = unsafe { instance.create_surface_unsafe(target)? };
    Ok(surface)
}

impl SurfaceSession for DisplaySession {
    fn pump_events(&mut self) -> SessionResult<()> {
        // Wait on the socket only while the first configure or a frame
        // callback is outstanding; both are guaranteed to arrive. Otherwise
        // just drain what is already queued.
        let timeout = if self.state.frame_pending || !self.state.configured {
            None
        } else {
            Some(Duration::ZERO)
        };
        self.event_loop
            .dispatch(timeout, &mut self.state)
            .map_err(|e| SessionError::Disconnected(e.to_string()))?;
        self.apply_pending_resize();
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.state.configured
    }

    fn shutdown_requested(&self) -> bool {
        self.state.shutdown_requested
    }

    fn size(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }

    fn take_pointer(&mut self) -> PointerState {
        self.state.latch.take()
    }

    fn present(&mut self, draws: &DrawList) -> SessionResult<()> {
        if !self.state.configured {
            return Err(SessionError::NotConfigured);
        }
        self.apply_pending_resize();

        let surface = self.state.window.wl_surface();
        surface.frame(&self.state.qh, surface.clone());
        self.state.frame_pending = true;

        if !self.gpu.render(draws)? {
            // skipped frame: nothing committed, so do not wait for the callback
            self.state.frame_pending = false;
        }
        Ok(())
    }

    fn set_cursor(&mut self, name: &str) {
        match name.parse::<CursorIcon>() {
            Ok(icon) => {
                if icon != self.state.cursor {
                    debug!("Cursor -> {}", name);
                    self.state.cursor = icon;
                    self.state.apply_cursor();
                }
            }
            Err(_) => warn!("⚠️ Unknown cursor name '{}'", name),
        }
    }

    fn begin_resize(&mut self, direction: ResizeDirection) {
        let (Some(seat), Some(serial)) = (self.state.seat.as_ref(), self.state.last_serial) else {
            warn!("⚠️ Interactive resize requested without a pointer serial");
            return;
        };
        debug!("Starting interactive resize ({})", direction);
        self.state.window.resize(seat, serial, resize_edge(direction));
    }
}

fn resize_edge(direction: ResizeDirection) -> ResizeEdge {
    match direction {
        ResizeDirection::North => ResizeEdge::Top,
        ResizeDirection::South => ResizeEdge::Bottom,
        ResizeDirection::East => ResizeEdge::Right,
        ResizeDirection::West => ResizeEdge::Left,
        ResizeDirection::NorthEast => ResizeEdge::TopRight,
        ResizeDirection::NorthWest => ResizeEdge::TopLeft,
        ResizeDirection::SouthEast => ResizeEdge::BottomRight,
        ResizeDirection::SouthWest => ResizeEdge::BottomLeft,
    }
}

impl CompositorHandler for WaylandState {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        new_factor: i32,
    ) {
        debug!("Scale factor changed to {} (ignored)", new_factor);
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        self.frame_pending = false;
    }
}

impl OutputHandler for WaylandState {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, output: wl_output::WlOutput) {
        debug!("🖥️ Output added: {:?}", self.output_state.info(&output).and_then(|i| i.name));
    }

    fn update_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}

    fn output_destroyed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {
        debug!("🖥️ Output removed");
    }
}

impl WindowHandler for WaylandState {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &Window) {
        info!("🛑 Compositor requested window close");
        self.shutdown_requested = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _window: &Window,
        configure: WindowConfigure,
        serial: u32,
    ) {
        // A missing dimension means the client picks; keep the current one.
        let width = configure.new_size.0.map_or(self.width, |w| w.get());
        let height = configure.new_size.1.map_or(self.height, |h| h.get());
        trace!("configure serial={} size={}x{}", serial, width, height);

        if (width, height) != (self.width, self.height) {
            info!("📐 Resized {}x{} -> {}x{}", self.width, self.height, width, height);
            self.width = width;
            self.height = height;
            self.resize_pending = true;
        }
        if !self.configured {
            info!("✅ Surface configured at {}x{}", self.width, self.height);
            self.configured = true;
            self.resize_pending = true;
        }
    }
}

impl SeatHandler for WaylandState {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        match capability {
            Capability::Pointer if self.pointer.is_none() => {
                let themed = match &self.shm {
                    Some(shm) => {
                        let cursor_surface = self.compositor.create_surface(qh);
                        match self.seat_state.get_pointer_with_theme(
                            qh,
                            &seat,
                            shm,
                            cursor_surface,
                            ThemeSpec::default(),
                        ) {
                            Ok(pointer) => Some(PointerHandle::Themed(pointer)),
                            Err(e) => {
                                warn!("⚠️ Themed pointer unavailable: {}", e);
                                None
                            }
                        }
                    }
                    None => None,
                };
                let pointer = match themed {
                    Some(pointer) => Some(pointer),
                    None => match self.seat_state.get_pointer(qh, &seat) {
                        Ok(pointer) => Some(PointerHandle::Plain(pointer)),
                        Err(e) => {
                            warn!("⚠️ Failed to bind pointer: {}", e);
                            None
                        }
                    },
                };
                if pointer.is_some() {
                    info!("🖱️ Pointer bound");
                }
                self.pointer = pointer;
                self.seat = Some(seat);
            }
            Capability::Keyboard => debug!("Keyboard present (not bound)"),
            other => debug!("Ignoring seat capability {:?}", other),
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Pointer && self.pointer.take().is_some() {
            info!("🖱️ Pointer removed");
            self.latch.leave();
        }
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, seat: wl_seat::WlSeat) {
        if self.seat.as_ref() == Some(&seat) {
            self.seat = None;
            self.last_serial = None;
        }
    }
}

impl PointerHandler for WaylandState {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        for event in events {
            if &event.surface != self.window.wl_surface() {
                continue;
            }
            let x = event.position.0 as f32;
            let y = self.height as f32 - event.position.1 as f32;
            match event.kind {
                PointerEventKind::Enter { serial } => {
                    self.last_serial = Some(serial);
                    self.latch.motion(x, y);
                    self.apply_cursor();
                }
                PointerEventKind::Leave { .. } => self.latch.leave(),
                PointerEventKind::Motion { .. } => self.latch.motion(x, y),
                PointerEventKind::Press { serial, button, .. } => {
                    trace!("button {:#x} pressed at ({}, {})", button, x, y);
                    self.last_serial = Some(serial);
                    self.latch.motion(x, y);
                    self.latch.button_down();
                }
                PointerEventKind::Release { .. } => {
                    self.latch.motion(x, y);
                    self.latch.button_up();
                }
                PointerEventKind::Axis { .. } => {}
            }
        }
    }
}

impl ProvidesRegistryState for WaylandState {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState, SeatState];
}

impl Dispatch<wl_shm::WlShm, ()> for WaylandState {
    fn event(
        _state: &mut Self,
        _proxy: &wl_shm::WlShm,
        _event: wl_shm::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // format advertisements; cursor themes use argb8888 which is mandatory
    }
}

delegate_compositor!(WaylandState);
delegate_output!(WaylandState);
delegate_seat!(WaylandState);
delegate_pointer!(WaylandState);
delegate_xdg_shell!(WaylandState);
delegate_xdg_window!(WaylandState);
delegate_registry!(WaylandState);
