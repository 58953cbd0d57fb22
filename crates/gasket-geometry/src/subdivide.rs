//! Recursive tetrahedron subdivision

use gasket_core::Color;
use glam::Vec4;

/// Corners of the unit gasket: apex toward -Z, base triangle at z = 1/3
pub const GASKET_VERTICES: [Vec4; 4] = [
    Vec4::new(0.0000, 0.0000, -1.0000, 1.0),
    Vec4::new(0.0000, 0.9428, 0.3333, 1.0),
    Vec4::new(-0.8165, -0.4714, 0.3333, 1.0),
    Vec4::new(0.8165, -0.4714, 0.3333, 1.0),
];

/// Each leaf tetrahedron emits 4 faces of 3 vertices
pub const VERTICES_PER_TETRAHEDRON: usize = 12;

/// Flat, non-indexed triangle list with one color per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleStream {
    pub positions: Vec<Vec4>,
    pub colors: Vec<Vec4>,
}

impl TriangleStream {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rewrite vertex colors in place. Faces repeat in emission order, so
    /// triangle `t` always belongs to face `t % 4`.
    pub fn recolor(&mut self, face_colors: &[Color; 4]) {
        for (i, color) in self.colors.iter_mut().enumerate() {
            let face = (i / 3) % 4;
            *color = Vec4::from_array(face_colors[face].to_array());
        }
    }

    fn triangle(&mut self, a: Vec4, b: Vec4, c: Vec4, color: Vec4) {
        self.positions.extend_from_slice(&[a, b, c]);
        self.colors.extend_from_slice(&[color, color, color]);
    }

    fn tetra(&mut self, a: Vec4, b: Vec4, c: Vec4, d: Vec4, face_colors: &[Vec4; 4]) {
        self.triangle(a, c, b, face_colors[0]);
        self.triangle(a, c, d, face_colors[1]);
        self.triangle(a, b, d, face_colors[2]);
        self.triangle(b, c, d, face_colors[3]);
    }
}

/// Subdivide a tetrahedron `depth` times, emitting `4^depth` leaf tetrahedra.
///
/// Depth 0 emits the input tetrahedron itself (4 colored triangles).
pub fn subdivide(vertices: [Vec4; 4], depth: u32, face_colors: &[Color; 4]) -> TriangleStream {
    let leaves = 4usize.pow(depth);
    let mut stream = TriangleStream::with_capacity(leaves * VERTICES_PER_TETRAHEDRON);
    let colors = face_colors.map(|c| Vec4::from_array(c.to_array()));

    let [a, b, c, d] = vertices;
    divide_tetra(&mut stream, a, b, c, d, depth, &colors);
    stream
}

fn divide_tetra(
    stream: &mut TriangleStream,
    a: Vec4,
    b: Vec4,
    c: Vec4,
    d: Vec4,
    count: u32,
    colors: &[Vec4; 4],
) {
    if count == 0 {
        stream.tetra(a, b, c, d, colors);
        return;
    }

    // Midpoints of the six edges
    let ab = a.lerp(b, 0.5);
    let ac = a.lerp(c, 0.5);
    let ad = a.lerp(d, 0.5);
    let bc = b.lerp(c, 0.5);
    let bd = b.lerp(d, 0.5);
    let cd = c.lerp(d, 0.5);
    let next = count - 1;

    divide_tetra(stream, a, ab, ac, ad, next, colors);
    divide_tetra(stream, ab, b, bc, bd, next, colors);
    divide_tetra(stream, ac, bc, c, cd, next, colors);
    divide_tetra(stream, ad, bd, cd, d, next, colors);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> [Color; 4] {
        [
            Color::rgb(1.0, 0.0, 0.0),
            Color::rgb(0.0, 1.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0),
            Color::rgb(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn depth_zero_is_one_tetrahedron() {
        let stream = subdivide(GASKET_VERTICES, 0, &colors());
        assert_eq!(stream.triangle_count(), 4);
        assert_eq!(stream.vertex_count(), 12);
        assert_eq!(stream.colors.len(), stream.positions.len());
        // First face is a, c, b
        assert_eq!(stream.positions[0], GASKET_VERTICES[0]);
        assert_eq!(stream.positions[1], GASKET_VERTICES[2]);
        assert_eq!(stream.positions[2], GASKET_VERTICES[1]);
    }

    #[test]
    fn triangle_count_grows_by_four_per_level() {
        for depth in 0..5 {
            let stream = subdivide(GASKET_VERTICES, depth, &colors());
            assert_eq!(stream.triangle_count(), 4usize.pow(depth) * 4);
        }
    }

    #[test]
    fn subdivision_is_deterministic() {
        let a = subdivide(GASKET_VERTICES, 3, &colors());
        let b = subdivide(GASKET_VERTICES, 3, &colors());
        assert_eq!(a, b);
    }

    #[test]
    fn children_stay_inside_parent_bounds() {
        let stream = subdivide(GASKET_VERTICES, 2, &colors());
        for p in &stream.positions {
            assert!(p.x.abs() <= 0.8166 && p.y.abs() <= 0.9429 && p.z.abs() <= 1.0);
            assert_eq!(p.w, 1.0);
        }
    }

    #[test]
    fn face_colors_follow_emission_order() {
        let palette = colors();
        let stream = subdivide(GASKET_VERTICES, 1, &palette);
        for (i, c) in stream.colors.iter().enumerate() {
            let face = (i / 3) % 4;
            assert_eq!(*c, Vec4::from_array(palette[face].to_array()));
        }
    }

    #[test]
    fn recolor_matches_fresh_build() {
        let mut stream = subdivide(GASKET_VERTICES, 2, &colors());
        let new_palette = [Color::BLACK; 4];
        stream.recolor(&new_palette);
        assert_eq!(stream, subdivide(GASKET_VERTICES, 2, &new_palette));
    }
}
