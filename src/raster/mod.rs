//! The pixel back-buffer, NDC projection, and the depth test every
//! drawing primitive in this module shares.

pub mod line;
pub mod scanline;

pub use line::{draw_normal, draw_wireframe_triangle};
pub use scanline::{rasterize_triangle, ShadingMode};

use crate::camera::Camera;
use crate::color::Color;
use crate::math::Vec3;

/// Owned color + depth buffers of identical pixel dimensions. The
/// depth buffer holds `1/z` (larger = nearer) so a plain `>` comparison
/// is the depth test; it is cleared to `0.0` every frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![Color::BLACK.pack(); width * height],
            depth: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    pub fn clear(&mut self) {
        self.color.fill(Color::BLACK.pack());
        self.depth.fill(0.0);
    }

    /// The color buffer reinterpreted as big-endian RGBA bytes, for
    /// handing straight to a streaming texture update.
    pub fn color_buffer_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(self.color.as_ptr() as *const u8, self.color.len() * 4)
        }
    }

    /// Rejects `(x, y)` outside the NDC unit square, otherwise maps it
    /// to a pixel and writes `color` iff `z_priority` beats the stored
    /// depth. Returns whether the write happened.
    pub fn put_pixel_ndc(&mut self, x: f32, y: f32, z_priority: f32, color: Color) -> bool {
        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return false;
        }

        let col = (((x + 1.0) / 2.0) * (self.width as f32 - 1.0)) as usize;
        let row = (((1.0 - y) / 2.0) * (self.height as f32 - 1.0)) as usize;
        let index = row * self.width + col;

        if z_priority > self.depth[index] {
            self.color[index] = color.pack();
            self.depth[index] = z_priority;
            true
        } else {
            false
        }
    }
}

/// `d = camera.origin.z + focal`; `px = x*d/(z*viewport_width/2)`,
/// `py = y*d/(z*viewport_height/2)`, expressed as the equivalent
/// `(x*d/z) * 2/viewport_width`.
pub fn project_to_ndc(view_point: Vec3, camera: &Camera) -> (f32, f32) {
    let d = camera.origin().z + camera.focal();
    let px = view_point.x * d / view_point.z;
    let py = view_point.y * d / view_point.z;
    (px * 2.0 / camera.viewport_width(), py * 2.0 / camera.viewport_height())
}

/// Face normal `n = (v1-v0)x(v2-v0)` in view space; culls iff
/// `(camera_origin - centroid) . n <= 0`. Note `camera_origin` is the
/// camera's world-space origin, not the view-space zero point.
pub fn is_backface(camera: &Camera, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let normal = (v1 - v0).cross(v2 - v0);
    let centroid = Vec3::average(v0, v1, v2);
    let v_to_cam = camera.origin() - centroid;
    v_to_cam.dot(normal) <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_pixel_rejects_outside_unit_square() {
        let mut fb = FrameBuffer::new(4, 4);
        assert!(!fb.put_pixel_ndc(1.5, 0.0, 1.0, Color::WHITE));
    }

    #[test]
    fn put_pixel_writes_inside_unit_square() {
        let mut fb = FrameBuffer::new(4, 4);
        assert!(fb.put_pixel_ndc(0.0, 0.0, 1.0, Color::WHITE));
    }

    #[test]
    fn depth_test_rejects_farther_write() {
        let mut fb = FrameBuffer::new(4, 4);
        assert!(fb.put_pixel_ndc(0.0, 0.0, 2.0, Color::WHITE));
        assert!(!fb.put_pixel_ndc(0.0, 0.0, 1.0, Color::RED));
    }

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_pixel_ndc(0.0, 0.0, 1.0, Color::WHITE);
        fb.clear();
        assert_eq!(fb.depth_buffer()[0], 0.0);
        assert_eq!(fb.color_buffer()[0], Color::BLACK.pack());
    }
}
