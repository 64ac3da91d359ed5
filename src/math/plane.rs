//! Planes, used by the frustum to classify and clip points.

use super::vec3::Vec3;

/// A plane with a unit normal and a signed distance term. For frustum
/// planes the normal points inward (into the visible half-space):
/// `plane_point(p) > 0` means `p` is inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance of `p` from the plane: `n . p + d`.
    pub fn plane_point(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.distance
    }

    /// Intersection of the plane with the line segment `a -> b`. The
    /// caller guarantees `n . (b - a) != 0`, i.e. the segment actually
    /// crosses the plane.
    pub fn line_intersect(&self, a: Vec3, b: Vec3) -> Vec3 {
        let denom = self.normal.dot(b - a);
        let t = -(self.distance + self.normal.dot(a)) / denom;
        a + (b - a) * t
    }
}
