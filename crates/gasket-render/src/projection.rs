//! Fixed orthographic view volume

use glam::Mat4;

pub const LEFT: f32 = -4.0;
pub const RIGHT: f32 = 4.0;
pub const BOTTOM: f32 = -1.75;
pub const TOP: f32 = 2.75;
pub const NEAR: f32 = 2.0;
pub const FAR: f32 = -2.0;

/// Projection used for every frame. The volume does not follow the window
/// aspect ratio; a wide window stretches the gasket horizontally.
pub fn projection_matrix() -> Mat4 {
    Mat4::orthographic_rh(LEFT, RIGHT, BOTTOM, TOP, NEAR, FAR)
}
