//! Indexed triangle mesh: parallel position/normal/color arrays plus
//! two index arrays, one per attribute.

use crate::color::Color;
use crate::math::Vec3;

/// A single shaded attribute bundle: a position (object or view space,
/// depending on the pipeline stage that holds it), a normal (expected
/// unit length by the time shading consumes it), and a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3 {
    pub point: Vec3,
    pub normal: Vec3,
    pub color: Color,
}

impl Vertex3 {
    pub const fn new(point: Vec3, normal: Vec3, color: Color) -> Self {
        Self {
            point,
            normal,
            color,
        }
    }
}

/// Indexed mesh data: `positions[V]`, `normals[V]`, `colors[V]`, plus
/// `position_index[3T]` and `normal_index[3T]`. Every index must lie
/// in `[0, V)`; triangle count `T = position_index.len() / 3 =
/// normal_index.len() / 3`. Triangles are wound counter-clockwise when
/// viewed from outside the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Color>,
    position_index: Vec<u32>,
    normal_index: Vec<u32>,
}

impl Mesh {
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        colors: Vec<Color>,
        position_index: Vec<u32>,
        normal_index: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(positions.len(), colors.len());
        debug_assert_eq!(position_index.len(), normal_index.len());
        debug_assert_eq!(position_index.len() % 3, 0);
        Self {
            positions,
            normals,
            colors,
            position_index,
            normal_index,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn position_index(&self) -> &[u32] {
        &self.position_index
    }

    pub fn normal_index(&self) -> &[u32] {
        &self.normal_index
    }

    pub fn triangle_count(&self) -> usize {
        self.position_index.len() / 3
    }

    /// The object-space vertex3 triple for triangle `t`.
    pub fn triangle_vertices(&self, t: usize) -> [Vertex3; 3] {
        let p = &self.position_index[t * 3..t * 3 + 3];
        let n = &self.normal_index[t * 3..t * 3 + 3];
        std::array::from_fn(|i| {
            Vertex3::new(
                self.positions[p[i] as usize],
                self.normals[n[i] as usize],
                self.colors[p[i] as usize],
            )
        })
    }

    /// Centroid and max-distance bounding sphere over all positions, in
    /// object space.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let centroid = self
            .positions
            .iter()
            .fold(Vec3::ZERO, |acc, &p| acc + p)
            / self.positions.len() as f32;
        let radius = self
            .positions
            .iter()
            .map(|&p| p.distance(centroid))
            .fold(0.0f32, f32::max);
        (centroid, radius)
    }
}

/// Builds the 24-vertex cube (4 duplicated positions per face, one
/// normal and one color per face) used as the fallback object when no
/// OBJ files load successfully.
pub fn build_cube() -> Mesh {
    const FACES: [(Vec3, [Vec3; 4], Color); 6] = [
        (
            Vec3::FORWARD,
            [
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
            ],
            Color::RED,
        ),
        (
            Vec3::BACK,
            [
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
            ],
            Color::GREEN,
        ),
        (
            Vec3::RIGHT,
            [
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, 1.0),
            ],
            Color::BLUE,
        ),
        (
            Vec3::LEFT,
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(-1.0, 1.0, -1.0),
            ],
            Color::YELLOW,
        ),
        (
            Vec3::UP,
            [
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(-1.0, 1.0, -1.0),
            ],
            Color::PURPLE,
        ),
        (
            Vec3::DOWN,
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(-1.0, -1.0, 1.0),
            ],
            Color::CYAN,
        ),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut colors = Vec::with_capacity(24);
    let mut position_index = Vec::with_capacity(36);
    let mut normal_index = Vec::with_capacity(36);

    for (face_index, (normal, corners, color)) in FACES.iter().enumerate() {
        let base = (face_index * 4) as u32;
        for &corner in corners {
            positions.push(corner);
            normals.push(*normal);
            colors.push(*color);
        }
        for &(a, b, c) in &[(0, 1, 2), (0, 2, 3)] {
            position_index.push(base + a);
            position_index.push(base + b);
            position_index.push(base + c);
            normal_index.push(base + a);
            normal_index.push(base + b);
            normal_index.push(base + c);
        }
    }

    Mesh::new(positions, normals, colors, position_index, normal_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_24_positions_and_36_indices() {
        let cube = build_cube();
        assert_eq!(cube.positions().len(), 24);
        assert_eq!(cube.position_index().len(), 36);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn cube_face_normals_are_axis_aligned() {
        let cube = build_cube();
        for &n in cube.normals() {
            let axis_aligned = [Vec3::RIGHT, Vec3::LEFT, Vec3::UP, Vec3::DOWN, Vec3::FORWARD, Vec3::BACK]
                .iter()
                .any(|&axis| (axis - n).length() < 1e-6);
            assert!(axis_aligned, "normal {:?} is not axis-aligned", n);
        }
    }

    #[test]
    fn cube_is_wound_counter_clockwise() {
        let cube = build_cube();
        let [v0, v1, v2] = cube.triangle_vertices(0);
        let face_normal = (v1.point - v0.point).cross(v2.point - v0.point).normalize();
        assert_relative_eq!(face_normal.dot(v0.normal), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn bounding_sphere_of_cube_matches_corner_distance() {
        let cube = build_cube();
        let (centroid, radius) = cube.bounding_sphere();
        assert_relative_eq!(centroid.length(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(radius, 3.0f32.sqrt(), epsilon = 1e-5);
    }
}
