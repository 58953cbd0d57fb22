//! wgpu device and window surface setup

use std::sync::Arc;
use thiserror::Error;
use winit::window::Window;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("Failed to get adapter")]
    AdapterNotFound,
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),
    #[error("Surface error: {0}")]
    SurfaceError(String),
    #[error("Failed to read render buffer: {0}")]
    BufferReadFailed(String),
    #[error("Failed to build image: {0}")]
    ImageError(String),
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Request an adapter and device, optionally compatible with `surface`
async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
    label: &str,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), RenderError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(RenderError::AdapterNotFound)?;

    let info = adapter.get_info();
    log::info!("Using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some(label),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| RenderError::DeviceCreation(e.to_string()))?;

    Ok((adapter, device, queue))
}

/// Headless device with no surface attached
pub(crate) async fn request_offscreen_device() -> Result<(wgpu::Device, wgpu::Queue), RenderError> {
    let instance = create_instance();
    let (_, device, queue) = request_device(&instance, None, "Gasket Headless Device").await?;
    Ok((device, queue))
}

/// Device, queue and configured surface for one window
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let instance = create_instance();

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        let (adapter, device, queue) =
            request_device(&instance, Some(&surface), "Gasket Device").await?;

        let caps = surface.get_capabilities(&adapter);
        // Vertex colors are already display-referred, so skip the sRGB encode
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::SurfaceCreation("no supported formats".into()))?;
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| caps.alpha_modes.contains(mode))
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            alpha_mode
        );

        let (depth_texture, depth_view) = create_depth_texture(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_texture,
            depth_view,
        })
    }

    /// Reconfigure the surface; zero-sized (minimized) windows are ignored
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
        }
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let (depth_texture, depth_view) =
            create_depth_texture(&self.device, self.config.width, self.config.height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

pub(crate) fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
