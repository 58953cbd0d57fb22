//! `Renderer` implementations for a window surface and an offscreen target

use crate::context::{RenderContext, RenderError};
use crate::gpu_triangles::GpuTriangles;
use crate::headless::{HeadlessContext, HEADLESS_FORMAT};
use crate::pipeline::{FrameUniforms, GasketPipeline};
use crate::projection::projection_matrix;
use gasket_animation::Renderer;
use gasket_geometry::{GeometryBuilder, TriangleStream};
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

/// Record one cleared, depth-tested draw of the gasket into `encoder`
fn encode_pass(
    encoder: &mut wgpu::CommandEncoder,
    pipeline: &GasketPipeline,
    triangles: &GpuTriangles,
    color_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Gasket Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pass.set_pipeline(&pipeline.pipeline);
    pass.set_bind_group(0, &pipeline.bind_group, &[]);
    triangles.draw(&mut pass);
}

/// Draws into a window surface
pub struct GasketRenderer {
    context: RenderContext,
    pipeline: GasketPipeline,
    triangles: GpuTriangles,
    projection: Mat4,
}

impl GasketRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let context = RenderContext::new(window).await?;
        let pipeline = GasketPipeline::new(&context.device, context.format());
        Ok(Self {
            context,
            pipeline,
            triangles: GpuTriangles::new(),
            projection: projection_matrix(),
        })
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.context.resize(size);
    }

    /// Re-upload vertex data if the geometry changed since the last sync
    pub fn sync_geometry(&mut self, geometry: &GeometryBuilder) {
        self.triangles
            .sync(&self.context.device, &self.context.queue, geometry);
    }

    fn draw(&mut self, transform: Mat4, stream: &TriangleStream) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(RenderError::SurfaceError(e.to_string())),
        };

        let device = &self.context.device;
        let queue = &self.context.queue;
        self.triangles.ensure(device, queue, stream);
        self.pipeline
            .write_uniforms(queue, &FrameUniforms::new(self.projection, transform));

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Gasket Frame Encoder"),
        });
        encode_pass(
            &mut encoder,
            &self.pipeline,
            &self.triangles,
            &view,
            &self.context.depth_view,
        );
        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Renderer for GasketRenderer {
    fn render_frame(&mut self, transform: Mat4, triangles: &TriangleStream) {
        if let Err(e) = self.draw(transform, triangles) {
            log::warn!("Dropped frame: {}", e);
        }
    }
}

/// Draws into an offscreen texture that can be read back as an image
pub struct HeadlessRenderer {
    context: HeadlessContext,
    pipeline: GasketPipeline,
    triangles: GpuTriangles,
    projection: Mat4,
    frames: u64,
}

impl HeadlessRenderer {
    pub async fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let context = HeadlessContext::new(width, height).await?;
        let pipeline = GasketPipeline::new(&context.device, HEADLESS_FORMAT);
        Ok(Self {
            context,
            pipeline,
            triangles: GpuTriangles::new(),
            projection: projection_matrix(),
            frames: 0,
        })
    }

    pub fn sync_geometry(&mut self, geometry: &GeometryBuilder) {
        self.triangles
            .sync(&self.context.device, &self.context.queue, geometry);
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The most recently rendered frame
    pub fn capture(&self) -> Result<image::RgbaImage, RenderError> {
        self.context.read_image()
    }
}

impl Renderer for HeadlessRenderer {
    fn render_frame(&mut self, transform: Mat4, triangles: &TriangleStream) {
        let device = &self.context.device;
        let queue = &self.context.queue;
        self.triangles.ensure(device, queue, triangles);
        self.pipeline
            .write_uniforms(queue, &FrameUniforms::new(self.projection, transform));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Headless Frame Encoder"),
        });
        encode_pass(
            &mut encoder,
            &self.pipeline,
            &self.triangles,
            &self.context.color_view,
            &self.context.depth_view,
        );
        queue.submit(std::iter::once(encoder.finish()));
        self.frames += 1;
    }
}
