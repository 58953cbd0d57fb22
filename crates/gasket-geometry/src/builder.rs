//! Cached gasket geometry for the current depth and face colors

use crate::subdivide::{subdivide, TriangleStream, GASKET_VERTICES};
use gasket_core::Color;

/// Owns the triangle stream and rebuilds it only when depth or colors change.
///
/// `revision` increments on every change so the renderer knows when to
/// re-upload vertex data.
pub struct GeometryBuilder {
    depth: u32,
    face_colors: [Color; 4],
    stream: TriangleStream,
    revision: u64,
}

impl GeometryBuilder {
    pub fn new(depth: u32, face_colors: [Color; 4]) -> Self {
        let stream = subdivide(GASKET_VERTICES, depth, &face_colors);
        log::debug!(
            "Built gasket at depth {} ({} triangles)",
            depth,
            stream.triangle_count()
        );
        Self {
            depth,
            face_colors,
            stream,
            revision: 0,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn face_colors(&self) -> &[Color; 4] {
        &self.face_colors
    }

    pub fn stream(&self) -> &TriangleStream {
        &self.stream
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rebuild at a new depth. Returns false when the depth is unchanged.
    pub fn set_depth(&mut self, depth: u32) -> bool {
        if depth == self.depth {
            return false;
        }
        self.depth = depth;
        self.stream = subdivide(GASKET_VERTICES, depth, &self.face_colors);
        self.revision += 1;
        log::debug!(
            "Rebuilt gasket at depth {} ({} triangles)",
            depth,
            self.stream.triangle_count()
        );
        true
    }

    /// Replace all four face colors; positions are kept.
    pub fn set_face_colors(&mut self, face_colors: [Color; 4]) {
        if face_colors == self.face_colors {
            return;
        }
        self.face_colors = face_colors;
        self.stream.recolor(&self.face_colors);
        self.revision += 1;
    }

    /// Replace a single face color. Out-of-range faces are ignored.
    pub fn set_face_color(&mut self, face: usize, color: Color) {
        if face >= self.face_colors.len() {
            return;
        }
        let mut colors = self.face_colors;
        colors[face] = color;
        self.set_face_colors(colors);
    }
}
