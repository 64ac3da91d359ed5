//! Camera: origin, orthonormal basis, intrinsics, and the view matrix
//! and frustum derived from them at construction.
//!
//! # Convention
//!
//! The view matrix's rows are (right, up, forward, origin) in that
//! order: the last row is the camera's translation, not its negation —
//! the pipeline right-multiplies world-space positions by this matrix
//! directly, just like every other transform in this crate.

use crate::frustum::Frustum;
use crate::math::{Mat3, Mat4, Vec3};
use crate::object::Object;

#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    basis: Mat3,
    vfov: f32,
    aspect: f32,
    focal: f32,
    viewport_height: f32,
    viewport_width: f32,
    view: Mat4,
    frustum: Frustum,
}

impl Camera {
    pub fn new(origin: Vec3, vfov: f32, aspect: f32, focal: f32) -> Self {
        let basis = Mat3::identity();
        let viewport_height = 2.0 * focal * (vfov / 2.0).tan();
        let viewport_width = viewport_height * aspect;

        let view = Self::build_view(origin, basis);
        let frustum = Self::build_frustum(focal, viewport_width, viewport_height);

        Self {
            origin,
            basis,
            vfov,
            aspect,
            focal,
            viewport_height,
            viewport_width,
            view,
            frustum,
        }
    }

    fn build_view(origin: Vec3, basis: Mat3) -> Mat4 {
        Mat4::new([
            [basis.i().x, basis.i().y, basis.i().z, 0.0],
            [basis.j().x, basis.j().y, basis.j().z, 0.0],
            [basis.k().x, basis.k().y, basis.k().z, 0.0],
            [origin.x, origin.y, origin.z, 1.0],
        ])
    }

    fn build_frustum(focal: f32, viewport_width: f32, viewport_height: f32) -> Frustum {
        let half_w = viewport_width / 2.0;
        let half_h = viewport_height / 2.0;
        let top_left = Vec3::new(-half_w, half_h, focal);
        let top_right = Vec3::new(half_w, half_h, focal);
        let bottom_left = Vec3::new(-half_w, -half_h, focal);
        let bottom_right = Vec3::new(half_w, -half_h, focal);
        Frustum::new(focal, top_left, top_right, bottom_left, bottom_right)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Transforms `obj`'s world-space bounding sphere center by the
    /// view matrix, and rejects it iff any enforced frustum plane puts
    /// the sphere entirely outside.
    pub fn object_in_frustum(&self, obj: &Object) -> bool {
        let sphere = obj.world_bounding_sphere();
        let center_view = sphere.center * self.view;
        !self.frustum.sphere_outside(center_view, sphere.radius)
    }

    /// Right-multiplies the view matrix by a translation built from
    /// `v`, so the camera moves by `v` in its own current frame.
    pub fn move_by(&mut self, v: Vec3) {
        self.view = self.view * Mat4::translation(v.x, v.y, v.z);
    }

    /// Right-multiplies the view matrix by the inverse Y-rotation
    /// matrix: rotating the camera by `radians` is expressed as
    /// rotating the world by `-radians`.
    pub fn rotate_y(&mut self, radians: f32) {
        self.view = self.view * Mat4::rotation_y(radians).rotation_inverse();
    }
}
