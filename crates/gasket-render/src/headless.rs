//! Offscreen render target with pixel readback

use crate::context::{create_depth_texture, request_offscreen_device, RenderError};

pub const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Device plus color and depth textures, no window
pub struct HeadlessContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub width: u32,
    pub height: u32,
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl HeadlessContext {
    pub async fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let width = width.max(1);
        let height = height.max(1);
        let (device, queue) = request_offscreen_device().await?;

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Headless Color Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HEADLESS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (depth_texture, depth_view) = create_depth_texture(&device, width, height);

        Ok(Self {
            device,
            queue,
            width,
            height,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        })
    }

    /// Copy the color texture back as an RGBA image
    pub fn read_image(&self) -> Result<image::RgbaImage, RenderError> {
        let pixels = self.read_pixels()?;
        image::RgbaImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            RenderError::ImageError(format!(
                "pixel buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Tightly packed RGBA bytes, row padding removed
    pub fn read_pixels(&self) -> Result<Vec<u8>, RenderError> {
        let unpadded_bytes_per_row = self.width * 4;
        let padded_bytes_per_row = padded_row_bytes(self.width);

        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixel Readback Buffer"),
            size: (padded_bytes_per_row * self.height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?;

        let pixels = {
            let data = slice.get_mapped_range();
            strip_row_padding(&data, unpadded_bytes_per_row, padded_bytes_per_row, self.height)
        };
        staging_buffer.unmap();

        Ok(pixels)
    }
}

fn padded_row_bytes(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

fn strip_row_padding(data: &[u8], row_bytes: u32, padded_row_bytes: u32, rows: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((row_bytes * rows) as usize);
    for row in 0..rows {
        let start = (row * padded_row_bytes) as usize;
        pixels.extend_from_slice(&data[start..start + row_bytes as usize]);
    }
    pixels
}
