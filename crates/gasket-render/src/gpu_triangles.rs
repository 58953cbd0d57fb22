//! GPU-resident copy of the triangle stream

use crate::pipeline::GasketVertex;
use gasket_geometry::{GeometryBuilder, TriangleStream};

/// Vertex buffer that is reused while the vertex count fits and only
/// rewritten when the geometry changes.
pub struct GpuTriangles {
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    vertex_count: u32,
    revision: Option<u64>,
}

impl GpuTriangles {
    pub fn new() -> Self {
        Self {
            buffer: None,
            capacity: 0,
            vertex_count: 0,
            revision: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Upload when the builder's revision differs from the last upload.
    /// Returns true if vertex data was written.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        geometry: &GeometryBuilder,
    ) -> bool {
        if self.revision == Some(geometry.revision()) {
            return false;
        }
        self.upload(device, queue, geometry.stream());
        self.revision = Some(geometry.revision());
        true
    }

    /// Upload if `stream` cannot be what is on the GPU (different size)
    pub fn ensure(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stream: &TriangleStream) {
        if self.buffer.is_none() || self.vertex_count as usize != stream.vertex_count() {
            self.upload(device, queue, stream);
            self.revision = None;
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stream: &TriangleStream) {
        let vertices = GasketVertex::interleave(stream);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let size = bytes.len() as u64;

        if size > self.capacity || self.buffer.is_none() {
            let capacity = size.max(std::mem::size_of::<GasketVertex>() as u64);
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Gasket Vertex Buffer"),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
            log::debug!("Allocated vertex buffer of {} bytes", capacity);
        }

        if let Some(buffer) = &self.buffer {
            if !bytes.is_empty() {
                queue.write_buffer(buffer, 0, bytes);
            }
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(buffer) = &self.buffer {
            if self.vertex_count > 0 {
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }
    }
}

impl Default for GpuTriangles {
    fn default() -> Self {
        Self::new()
    }
}
