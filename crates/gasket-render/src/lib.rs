//! Gasket Render - wgpu backend for the gasket visualizer
//!
//! Draws the flat-colored triangle stream under a fixed orthographic
//! projection, either into a window surface or an offscreen texture for
//! PNG capture.

mod context;
mod gpu_triangles;
mod headless;
mod pipeline;
pub mod projection;
mod renderer;

pub use context::{RenderContext, RenderError};
pub use gpu_triangles::GpuTriangles;
pub use headless::HeadlessContext;
pub use pipeline::{FrameUniforms, GasketPipeline, GasketVertex};
pub use projection::projection_matrix;
pub use renderer::{GasketRenderer, HeadlessRenderer};
