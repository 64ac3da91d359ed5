//! A mesh placed in the world: uniform scale, a rotation matrix built
//! up from successive body-frame rotations, and a translation.

use crate::math::{Mat4, Sphere, Vec3};
use crate::mesh::Mesh;

#[derive(Debug, Clone)]
pub struct Object {
    mesh: Mesh,
    rotation: Mat4,
    translation: Vec3,
    scale: f32,
    id: u32,
    bounding_sphere: Sphere,
}

impl Object {
    pub fn new(id: u32, mesh: Mesh) -> Self {
        let (center, radius) = mesh.bounding_sphere();
        Self {
            mesh,
            rotation: Mat4::identity(),
            translation: Vec3::ZERO,
            scale: 1.0,
            id,
            bounding_sphere: Sphere::new(center, radius),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_scale(&mut self, scale: f32) {
        debug_assert!(scale > 0.0, "object scale must stay positive");
        self.scale = scale;
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation = self.translation + delta;
    }

    /// Right-multiplies the stored rotation by a rotation about the
    /// object's own Y axis, so successive calls compose in body frame
    /// rather than world frame.
    pub fn rotate_y(&mut self, radians: f32) {
        self.rotation = self.rotation * Mat4::rotation_y(radians);
    }

    pub fn rotate_x(&mut self, radians: f32) {
        self.rotation = self.rotation * Mat4::rotation_x(radians);
    }

    pub fn rotate_z(&mut self, radians: f32) {
        self.rotation = self.rotation * Mat4::rotation_z(radians);
    }

    /// `T = scale * R * translate`, applied to a row vector in that
    /// order: scale first, then rotate, then translate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::scaling(self.scale, self.scale, self.scale)
            * self.rotation
            * Mat4::translation(self.translation.x, self.translation.y, self.translation.z)
    }

    /// Transforms a direction (normal) by the rotation only, ignoring
    /// scale and translation.
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.rotation.transform_direction(normal).normalize()
    }

    /// The world-space bounding sphere, recomputed from the object-space
    /// one at every call: `center·R·scale + translation`, `radius·scale`.
    pub fn world_bounding_sphere(&self) -> Sphere {
        let center = self.rotation.transform_direction(self.bounding_sphere.center) * self.scale
            + self.translation;
        Sphere::new(center, self.bounding_sphere.radius * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_cube;
    use approx::assert_relative_eq;

    #[test]
    fn fresh_object_has_identity_transform() {
        let obj = Object::new(0, build_cube());
        assert_relative_eq!(obj.scale(), 1.0);
        assert_relative_eq!(obj.translation().length(), 0.0);
    }

    #[test]
    fn translate_moves_world_bounding_sphere() {
        let mut obj = Object::new(0, build_cube());
        obj.translate(Vec3::new(10.0, 0.0, 0.0));
        let sphere = obj.world_bounding_sphere();
        assert_relative_eq!(sphere.center.x, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn scale_grows_world_bounding_radius() {
        let mut obj = Object::new(0, build_cube());
        let base_radius = obj.world_bounding_sphere().radius;
        obj.set_scale(2.0);
        assert_relative_eq!(obj.world_bounding_sphere().radius, base_radius * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn successive_rotations_compose_in_body_frame() {
        let mut obj = Object::new(0, build_cube());
        obj.rotate_y(std::f32::consts::FRAC_PI_2);
        obj.rotate_x(std::f32::consts::FRAC_PI_2);
        // body-frame composition: rotation = Ry * Rx, not Rx * Ry.
        let expected = Mat4::rotation_y(std::f32::consts::FRAC_PI_2)
            * Mat4::rotation_x(std::f32::consts::FRAC_PI_2);
        let n = obj.transform_normal(Vec3::RIGHT);
        let expected_n = expected.transform_direction(Vec3::RIGHT).normalize();
        assert_relative_eq!(n.x, expected_n.x, epsilon = 1e-5);
        assert_relative_eq!(n.y, expected_n.y, epsilon = 1e-5);
        assert_relative_eq!(n.z, expected_n.z, epsilon = 1e-5);
    }
}
