//! Frame driver
//!
//! Runs the hosted [`ShellApp`] against a [`SurfaceSession`]:
//!
//! ```text
//! NotStarted --start()--> Running --(status != 0 | exit requested | shutdown)--> Stopped
//! ```
//!
//! Every iteration pumps events, builds a fresh [`WindowStateSnapshot`],
//! calls [`ShellApp::on_frame`] exactly once and presents the recorded
//! draw list unless the frame asked to stop.

mod stats;

pub use stats::FrameStats;

use crate::draw::DrawList;
use crate::session::{ResizeDirection, SessionRequest, SurfaceSession};
use crate::snapshot::WindowStateSnapshot;
use crate::ui::touch::TouchEvent;
use anyhow::{bail, Context, Result};
use log::{debug, info, trace, warn};
use std::time::Instant;

/// Application hosted by the frame driver
pub trait ShellApp {
    /// Called once after the surface is configured, before the first frame
    fn on_start(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    /// Called once per iteration. `0` continues, anything else stops.
    fn on_frame(&mut self, frame: &mut Frame<'_>) -> i32;

    /// Called once when the driver stops, whatever the reason
    fn on_stop(&mut self, _reason: &StopReason) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    NotStarted,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// `on_frame` returned a non-zero status
    Status(i32),
    /// The frame called [`Frame::request_exit`]
    ExitRequested,
    /// The compositor asked the window to close
    SessionShutdown,
    /// Startup, event pumping or presentation failed; the error is
    /// returned to the caller
    Failed,
}

/// Per-frame context handed to [`ShellApp::on_frame`].
///
/// The snapshot is read-only except for the exit request. Cursor and resize
/// requests are queued and applied to the session after the callback.
pub struct Frame<'a> {
    snapshot: WindowStateSnapshot,
    draws: &'a mut DrawList,
    requests: Vec<SessionRequest>,
    fps: f32,
    index: u64,
}

impl<'a> Frame<'a> {
    pub fn new(snapshot: WindowStateSnapshot, draws: &'a mut DrawList, fps: f32, index: u64) -> Self {
        Self {
            snapshot,
            draws,
            requests: Vec::new(),
            fps,
            index,
        }
    }

    pub fn snapshot(&self) -> &WindowStateSnapshot {
        &self.snapshot
    }

    pub fn touch(&self) -> TouchEvent {
        self.snapshot.touch()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.snapshot.screen_width, self.snapshot.screen_height)
    }

    pub fn resized(&self) -> bool {
        self.snapshot.resized
    }

    pub fn request_exit(&mut self) {
        self.snapshot.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.snapshot.exit_requested
    }

    pub fn set_cursor(&mut self, name: impl Into<String>) {
        self.requests.push(SessionRequest::SetCursor(name.into()));
    }

    pub fn begin_resize(&mut self, direction: ResizeDirection) {
        self.requests.push(SessionRequest::BeginResize(direction));
    }

    pub fn draws(&mut self) -> &mut DrawList {
        &mut *self.draws
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Zero-based number of this frame
    pub fn index(&self) -> u64 {
        self.index
    }

    pub(crate) fn finish(self) -> (bool, Vec<SessionRequest>) {
        (self.snapshot.exit_requested, self.requests)
    }
}

pub struct FrameDriver<S: SurfaceSession, A: ShellApp> {
    session: S,
    app: A,
    state: DriverState,
    last_size: (u32, u32),
    stats: FrameStats,
    stop_reason: Option<StopReason>,
}

impl<S: SurfaceSession, A: ShellApp> FrameDriver<S, A> {
    pub fn new(session: S, app: A) -> Self {
        Self {
            session,
            app,
            state: DriverState::NotStarted,
            last_size: (0, 0),
            stats: FrameStats::new(),
            stop_reason: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn into_parts(self) -> (S, A) {
        (self.session, self.app)
    }

    /// Wait for the first configure, then hand the size to `on_start`.
    ///
    /// A close request that arrives before the configure stops the driver
    /// without ever starting the app.
    pub fn start(&mut self) -> Result<()> {
        if self.state != DriverState::NotStarted {
            bail!("frame driver already started (state {:?})", self.state);
        }
        while !self.session.is_configured() {
            if self.session.shutdown_requested() {
                info!("🛑 Shutdown requested before the surface was configured");
                self.state = DriverState::Stopped;
                self.stop_reason = Some(StopReason::SessionShutdown);
                return Ok(());
            }
            if let Err(e) = self.session.pump_events() {
                self.state = DriverState::Stopped;
                self.stop_reason = Some(StopReason::Failed);
                return Err(e).context("waiting for the initial configure");
            }
        }

        self.last_size = self.session.size();
        let (width, height) = self.last_size;
        if let Err(e) = self.app.on_start(width, height) {
            self.state = DriverState::Stopped;
            self.stop_reason = Some(StopReason::Failed);
            return Err(e).context("application failed to start");
        }
        self.state = DriverState::Running;
        info!("▶️ Frame driver running at {}x{}", width, height);
        Ok(())
    }

    /// Run one iteration. Returns the stop reason once the driver stops.
    pub fn step(&mut self) -> Result<Option<StopReason>> {
        match self.state {
            DriverState::Running => {}
            DriverState::Stopped => return Ok(self.stop_reason.clone()),
            DriverState::NotStarted => bail!("frame driver not started"),
        }

        if self.session.shutdown_requested() {
            return Ok(Some(self.stop(StopReason::SessionShutdown)));
        }

        if let Err(e) = self.session.pump_events() {
            self.stop(StopReason::Failed);
            return Err(e).context("event pump failed");
        }

        let size = self.session.size();
        let resized = size != self.last_size;
        if resized {
            debug!("Window size {:?} -> {:?}", self.last_size, size);
        }
        self.last_size = size;

        let mut snapshot = WindowStateSnapshot {
            screen_width: size.0 as f32,
            screen_height: size.1 as f32,
            resized,
            ..Default::default()
        };
        snapshot.apply_pointer(self.session.take_pointer());

        let index = self.stats.total_frames();
        if let Some(fps) = self.stats.tick(Instant::now()) {
            debug!("📊 {:.1} fps", fps);
        }

        let mut draws = DrawList::new();
        let mut frame = Frame::new(snapshot, &mut draws, self.stats.fps(), index);
        let status = self.app.on_frame(&mut frame);
        let (exit_requested, requests) = frame.finish();

        for request in requests {
            trace!("session request {:?}", request);
            request.apply(&mut self.session);
        }

        if status != 0 {
            return Ok(Some(self.stop(StopReason::Status(status))));
        }
        if exit_requested {
            return Ok(Some(self.stop(StopReason::ExitRequested)));
        }

        if let Err(e) = self.session.present(&draws) {
            self.stop(StopReason::Failed);
            return Err(e).context("present failed");
        }
        Ok(None)
    }

    /// Start if needed and iterate until the driver stops
    pub fn run(&mut self) -> Result<StopReason> {
        if self.state == DriverState::NotStarted {
            self.start()?;
        }
        loop {
            if let Some(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }

    fn stop(&mut self, reason: StopReason) -> StopReason {
        match &reason {
            StopReason::Status(code) => warn!("⏹️ Frame callback returned status {}", code),
            other => info!("⏹️ Frame driver stopping: {:?}", other),
        }
        self.state = DriverState::Stopped;
        self.app.on_stop(&reason);
        self.stop_reason = Some(reason.clone());
        info!("Rendered {} frames", self.stats.total_frames());
        reason
    }
}
