//! GPU drawable for the display session
//!
//! Owns the wgpu surface, device and a single flat-colour pipeline. A
//! [`DrawList`] is replayed as one render pass: a full clear followed by one
//! scissored full-screen triangle per rectangle.

use crate::draw::DrawList;
use crate::error::{SessionError, SessionResult};
use crate::ui::geometry::Rect;
use crate::ui::style::Color;
use log::{debug, info, warn};
use std::str::FromStr;
use wgpu::util::DeviceExt;

/// Present mode requested by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentModePreference {
    /// Mailbox when available, otherwise FIFO
    #[default]
    Auto,
    Fifo,
    Mailbox,
    Immediate,
}

impl FromStr for PresentModePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fifo" | "vsync" => Ok(Self::Fifo),
            "mailbox" => Ok(Self::Mailbox),
            "immediate" => Ok(Self::Immediate),
            other => Err(format!("unknown present mode `{}`", other)),
        }
    }
}

impl PresentModePreference {
    /// Pick a mode the surface supports, honouring the preference when possible
    pub fn select(&self, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let wanted = match self {
            Self::Auto => None,
            Self::Fifo => Some(wgpu::PresentMode::Fifo),
            Self::Mailbox => Some(wgpu::PresentMode::Mailbox),
            Self::Immediate => Some(wgpu::PresentMode::Immediate),
        };
        if let Some(mode) = wanted.filter(|m| supported.contains(m)) {
            return mode;
        }
        if wanted.is_some() {
            warn!("⚠️ Requested present mode {:?} unsupported, falling back", self);
        }
        if supported.contains(&wgpu::PresentMode::Mailbox) {
            wgpu::PresentMode::Mailbox
        } else if supported.contains(&wgpu::PresentMode::Fifo) || supported.is_empty() {
            wgpu::PresentMode::Fifo
        } else {
            supported[0]
        }
    }
}

/// Map a backend name to the wgpu backend set
pub fn backends_from_str(s: &str) -> wgpu::Backends {
    match s.to_lowercase().as_str() {
        "vulkan" => wgpu::Backends::VULKAN,
        "gl" => wgpu::Backends::GL,
        _ => wgpu::Backends::all(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuOptions {
    pub backends: wgpu::Backends,
    pub present_mode: PresentModePreference,
    /// Used when a frame records no clear of its own
    pub clear_color: Color,
}

impl Default for GpuOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            present_mode: PresentModePreference::Auto,
            clear_color: super::DEFAULT_CLEAR_COLOR,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Full-screen triangle in clip space
const COVER_TRIANGLE: [[f32; 2]; 3] = [[-1.0, -1.0], [3.0, -1.0], [-1.0, 3.0]];

/// Scissor rectangle in framebuffer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scissor {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Convert a bottom-left-origin rectangle to a top-left-origin scissor,
/// clamped to the target. `None` when nothing of it is visible.
pub fn scissor_for(rect: &Rect, target_width: u32, target_height: u32) -> Option<Scissor> {
    let tw = target_width as f32;
    let th = target_height as f32;

    let left = rect.x.clamp(0.0, tw).round();
    let right = rect.right().clamp(0.0, tw).round();
    let top = (th - rect.top()).clamp(0.0, th).round();
    let bottom = (th - rect.y).clamp(0.0, th).round();

    if right <= left || bottom <= top {
        return None;
    }
    Some(Scissor {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    format: wgpu::TextureFormat,
    present_mode: wgpu::PresentMode,
    alpha_mode: wgpu::CompositeAlphaMode,
    config: Option<wgpu::SurfaceConfiguration>,
    clear_color: Color,
}

impl GpuContext {
    /// Pick an adapter able to present to `surface` and build the pipeline.
    /// The surface itself is configured later, once its size is known.
    pub fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        options: &GpuOptions,
    ) -> SessionResult<Self> {
        let mut chosen_adapter: Option<wgpu::Adapter> = None;
        for power in [wgpu::PowerPreference::HighPerformance, wgpu::PowerPreference::LowPower] {
            for fallback in [false, true] {
                if let Some(adapter) = pollster::block_on(instance.request_adapter(
                    &wgpu::RequestAdapterOptions {
                        power_preference: power,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: fallback,
                    },
                )) {
                    chosen_adapter = Some(adapter);
                    break;
                }
            }
            if chosen_adapter.is_some() {
                break;
            }
        }
        let adapter = chosen_adapter.ok_or(SessionError::NoAdapter)?;
        let info = adapter.get_info();
        info!("🖥️ Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gridshell device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        debug!(
            "🧩 Surface capabilities: formats={:?}, present_modes={:?}, alpha_modes={:?}",
            caps.formats, caps.present_modes, caps.alpha_modes
        );
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(SessionError::NoSurfaceFormat)?;
        let present_mode = options.present_mode.select(&caps.present_modes);
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| matches!(m, wgpu::CompositeAlphaMode::Auto | wgpu::CompositeAlphaMode::Opaque))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        info!(
            "🔧 Using format={:?}, present_mode={:?}, alpha_mode={:?}",
            format, present_mode, alpha_mode
        );

        let pipeline = create_solid_pipeline(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            pipeline,
            format,
            present_mode,
            alpha_mode,
            config: None,
            clear_color: options.clear_color,
        })
    }

    /// (Re)configure the swapchain for a new drawable size
    pub fn configure(&mut self, width: u32, height: u32) {
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: width.max(1),
            height: height.max(1),
            present_mode: self.present_mode,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        self.surface.configure(&self.device, &config);
        debug!("📐 Surface configured to {}x{}", config.width, config.height);
        self.config = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Replay `draws` and present.
    ///
    /// Returns `Ok(false)` when the frame was skipped because the surface
    /// went stale; it is reconfigured and the next frame draws normally.
    pub fn render(&mut self, draws: &DrawList) -> SessionResult<bool> {
        let Some(config) = self.config.as_ref() else {
            return Err(SessionError::NotConfigured);
        };
        let (width, height) = (config.width, config.height);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.configure(width, height);
                return Ok(false);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("⚠️ Timed out acquiring surface texture");
                return Ok(false);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(SessionError::OutOfMemory),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut vertices = Vec::new();
        let mut scissors = Vec::new();
        for (rect, color) in draws.visible_rects() {
            if let Some(scissor) = scissor_for(&rect, width, height) {
                let color = [color.r, color.g, color.b, color.a];
                vertices.extend(COVER_TRIANGLE.iter().map(|&position| Vertex { position, color }));
                scissors.push(scissor);
            }
        }
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("gridshell fill vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let clear = draws.clear_color().unwrap_or(self.clear_color);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gridshell frame encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gridshell frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(buffer) = vertex_buffer.as_ref() {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_vertex_buffer(0, buffer.slice(..));
                for (i, scissor) in scissors.iter().enumerate() {
                    let first = (i * 3) as u32;
                    rpass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
                    rpass.draw(first..first + 3, 0..1);
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(true)
    }
}

fn create_solid_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gridshell solid shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("./solid.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("gridshell solid layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("gridshell solid pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // fills replace, like a scissored clear
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}
