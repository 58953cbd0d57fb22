//! Draw-call seam between the engine and a rasterization backend

use gasket_geometry::TriangleStream;
use glam::Mat4;

/// Receives one composed model transform and the static triangle stream per frame.
///
/// Implementations handle their own device failures; a dropped frame is not
/// reported back to the engine.
pub trait Renderer {
    fn render_frame(&mut self, transform: Mat4, triangles: &TriangleStream);
}
