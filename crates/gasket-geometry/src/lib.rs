//! Gasket Geometry - 3D Sierpinski gasket generation
//!
//! Produces the flat triangle stream the renderer draws:
//! - `subdivide` - pure recursive tetrahedron subdivision
//! - `TriangleStream` - parallel position/color vertex arrays
//! - `GeometryBuilder` - caches the stream for the current depth and colors

mod builder;
mod subdivide;

pub use builder::GeometryBuilder;
pub use subdivide::{subdivide, TriangleStream, GASKET_VERTICES, VERTICES_PER_TETRAHEDRON};
