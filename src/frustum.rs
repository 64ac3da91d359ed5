//! View-space frustum: six planes built from camera intrinsics, a
//! per-plane point classification, and single-plane triangle clipping.
//!
//! Only near/left/right are enforced; top/bottom are built and stored
//! but deliberately never checked. This keeps fragments at the
//! vertical screen limits visible instead of being clipped away, and
//! is a preserved quirk, not a bug to fix.

use crate::math::{Plane, Vec3};
use crate::mesh::Vertex3;

#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub near: Plane,
    pub far: Plane,
    pub left: Plane,
    pub right: Plane,
    pub top: Plane,
    pub bottom: Plane,
}

impl Frustum {
    /// `corners` are the four viewport corners in camera space, in the
    /// order top-left, top-right, bottom-left, bottom-right, at
    /// `z = focal`.
    pub fn new(focal: f32, top_left: Vec3, top_right: Vec3, bottom_left: Vec3, bottom_right: Vec3) -> Self {
        Self {
            near: Plane::new(Vec3::new(0.0, 0.0, 1.0), -focal),
            far: Plane::new(Vec3::new(0.0, 0.0, -1.0), f32::INFINITY),
            left: Plane::new(top_left.cross(bottom_left).normalize(), 0.0),
            right: Plane::new(bottom_right.cross(top_right).normalize(), 0.0),
            top: Plane::new(top_right.cross(top_left).normalize(), 0.0),
            bottom: Plane::new(bottom_left.cross(bottom_right).normalize(), 0.0),
        }
    }

    fn enforced_planes(&self) -> [Plane; 3] {
        [self.near, self.left, self.right]
    }

    /// First violated enforced plane, if any. `None` means inside.
    fn first_violation(&self, point: Vec3) -> Option<Plane> {
        self.enforced_planes()
            .into_iter()
            .find(|p| p.plane_point(point) < 0.0)
    }

    pub fn sphere_outside(&self, center: Vec3, radius: f32) -> bool {
        self.enforced_planes()
            .iter()
            .any(|p| p.plane_point(center) < -radius)
    }
}

/// Result of clipping one triangle against the frustum: zero, one, or
/// two triangles. `is_split` is set whenever the source triangle was
/// genuinely split into two (the two-inside-one-outside case) but is
/// also (quirkily) set `true` for a fully-inside, unclipped triangle —
/// preserved exactly as documented.
#[derive(Debug, Clone)]
pub struct ClippedTriangle {
    pub first: [Vertex3; 3],
    pub second: Option<[Vertex3; 3]>,
    pub is_split: bool,
}

/// Clips a triangle against the frustum's enforced planes (near/left/
/// right). Classifies all three vertices; if none or all are outside
/// (to any single plane), returns `None`. Otherwise clips against the
/// one plane violated by the minority-classified vertex.
pub fn clip_triangle(frustum: &Frustum, v0: Vertex3, v1: Vertex3, v2: Vertex3) -> Option<ClippedTriangle> {
    let violations = [
        frustum.first_violation(v0.point),
        frustum.first_violation(v1.point),
        frustum.first_violation(v2.point),
    ];

    if violations.iter().all(Option::is_none) {
        return Some(ClippedTriangle {
            first: [v0, v1, v2],
            second: None,
            is_split: true,
        });
    }

    if violations.iter().all(Option::is_some) {
        return None;
    }

    let verts = [v0, v1, v2];
    let outside: Vec<usize> = (0..3).filter(|&i| violations[i].is_some()).collect();
    let plane = violations[outside[0]].expect("at least one violation present");

    if outside.len() == 2 {
        // one inside (A), two outside (B, C)
        let a_index = (0..3).find(|i| !outside.contains(i)).expect("one inside vertex");
        let [b_index, c_index] = [outside[0], outside[1]];
        let a = verts[a_index];
        let b = verts[b_index];
        let c = verts[c_index];

        let b_prime_point = plane.line_intersect(a.point, b.point);
        let c_prime_point = plane.line_intersect(a.point, c.point);
        let b_prime = Vertex3::new(b_prime_point, b.normal, b.color);
        let c_prime = Vertex3::new(c_prime_point, c.normal, c.color);

        Some(ClippedTriangle {
            first: [b_prime, a, c_prime],
            second: None,
            is_split: false,
        })
    } else {
        // two inside (A, B), one outside (C)
        let c_index = outside[0];
        let [a_index, b_index] = {
            let mut inside = (0..3).filter(|i| *i != c_index);
            [inside.next().unwrap(), inside.next().unwrap()]
        };
        let a = verts[a_index];
        let b = verts[b_index];
        let c = verts[c_index];

        let a_prime_point = plane.line_intersect(c.point, a.point);
        let b_prime_point = plane.line_intersect(c.point, b.point);
        let a_prime = Vertex3::new(a_prime_point, a.normal, a.color);
        let b_prime = Vertex3::new(b_prime_point, b.normal, b.color);

        Some(ClippedTriangle {
            first: [a_prime, a, b],
            second: Some([a_prime, b, b_prime]),
            is_split: true,
        })
    }
}
