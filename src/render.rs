//! Render state and per-frame dispatch: the single owned [`RenderContext`]
//! that replaces the reference renderer's global mutable state (camera,
//! light, buffers, object list, cursor, modes), plus the three host
//! entry points (`on_launch`, `update`, `process_input`) as methods on
//! it.

use std::path::Path;

use log::warn;

use crate::camera::Camera;
use crate::frustum::clip_triangle;
use crate::light::{AmbientLight, PointLight};
use crate::math::Vec3;
use crate::mesh::build_cube;
use crate::obj;
use crate::object::Object;
use crate::raster::{draw_normal, draw_wireframe_triangle, is_backface, rasterize_triangle, FrameBuffer, ShadingMode};

/// How a selected object's triangles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Wireframe,
    #[default]
    Solid,
    SolidWireframe,
}

/// The enumerated set of keys `process_input` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Wireframe,
    Solid,
    SolidAndWireframe,
    Flat,
    Gouraud,
    Phong,
    RotateObjectPositive,
    RotateObjectNegative,
    ToggleNormals,
    CameraUp,
    CameraDown,
    LightLeft,
    LightRight,
    LightUp,
    LightDown,
    SelectObject(u8),
}

/// Per-second rates applied to a key event, scaled by the render
/// state's last frame delta — see [`RenderContext::process_input`].
const OBJECT_ROTATE_RATE: f32 = std::f32::consts::FRAC_PI_3; // 60 deg/s
const LIGHT_NUDGE_RATE: f32 = 50.0;
const CAMERA_MOVE_RATE: f32 = 5.0;

const WIREFRAME_COLOR: crate::color::Color = crate::color::Color::RED;
const OUTLINE_COLOR: crate::color::Color = crate::color::Color::YELLOW;

/// The single owned value holding everything the render-core design's
/// "process-wide mutable render state" describes: camera, light,
/// ambient term, render/shading modes, object list, selection cursor,
/// the normal-overlay flag, and the color/depth buffers.
pub struct RenderContext {
    camera: Camera,
    light: PointLight,
    ambient: AmbientLight,
    render_mode: RenderMode,
    shading_mode: ShadingMode,
    objects: Vec<Object>,
    cursor: usize,
    show_normals: bool,
    backface_culling: bool,
    framebuffer: FrameBuffer,
    last_delta: f32,
}

impl RenderContext {
    /// Loads every path in `obj_paths`, logging and skipping failures;
    /// if nothing loaded, inserts a fallback cube so the object list
    /// is never empty. Builds the camera, light, and ambient term with
    /// the reference renderer's literal defaults.
    pub fn on_launch(width: u32, height: u32, obj_paths: &[impl AsRef<Path>]) -> Self {
        let mut objects = Vec::new();
        for (id, path) in obj_paths.iter().enumerate() {
            match obj::load(path) {
                Ok(mesh) => objects.push(Object::new(id as u32, mesh)),
                Err(err) => warn!("skipping object: {err}"),
            }
        }
        if objects.is_empty() {
            objects.push(Object::new(0, build_cube()));
        }
        for obj in &mut objects {
            obj.set_scale(4.0);
            obj.set_translation(Vec3::new(0.0, 0.0, 12.0));
        }

        let aspect = width as f32 / height as f32;
        let camera = Camera::new(Vec3::ZERO, 20f32.to_radians(), aspect, 2.0);
        let light = PointLight::new(Vec3::new(-4.0, 10.0, 8.0), 0.8, 10.0);
        let ambient = AmbientLight::new(0.2);

        Self {
            camera,
            light,
            ambient,
            render_mode: RenderMode::Solid,
            shading_mode: ShadingMode::Flat,
            objects,
            cursor: 0,
            show_normals: false,
            backface_culling: true,
            framebuffer: FrameBuffer::new(width as usize, height as usize),
            last_delta: 0.0,
        }
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Clears both buffers, then draws the object at the cursor — the
    /// only object visible each frame until the cursor moves.
    pub fn update(&mut self, delta_seconds: f32) {
        self.last_delta = delta_seconds;
        self.framebuffer.clear();

        let Some(object) = self.objects.get(self.cursor) else {
            return;
        };
        if !self.camera.object_in_frustum(object) {
            return;
        }

        let model = object.model_matrix();
        let view = self.camera.view_matrix();
        let cull_backfaces = self.backface_culling && self.render_mode != RenderMode::Wireframe;

        for t in 0..object.mesh().triangle_count() {
            let [a, b, c] = object.mesh().triangle_vertices(t);
            let to_view = |v: crate::mesh::Vertex3| {
                let world_point = v.point * model;
                let world_normal = object.transform_normal(v.normal);
                crate::mesh::Vertex3::new(world_point * view, view.transform_direction(world_normal), v.color)
            };
            let v0 = to_view(a);
            let v1 = to_view(b);
            let v2 = to_view(c);

            if cull_backfaces && is_backface(&self.camera, v0.point, v1.point, v2.point) {
                continue;
            }

            let Some(clipped) = clip_triangle(self.camera.frustum(), v0, v1, v2) else {
                continue;
            };

            self.draw_clipped(clipped.first, clipped.second, clipped.is_split);
        }
    }

    fn draw_clipped(&mut self, first: [crate::mesh::Vertex3; 3], second: Option<[crate::mesh::Vertex3; 3]>, is_split: bool) {
        match self.render_mode {
            RenderMode::Solid => {
                self.shade(first);
                if let Some(second) = second {
                    self.shade(second);
                }
            }
            RenderMode::Wireframe => {
                self.outline(first, WIREFRAME_COLOR);
                // Documented quirk, preserved exactly: a split triangle
                // redraws the first sub-triangle's outline instead of
                // the second's.
                if is_split {
                    self.outline(first, WIREFRAME_COLOR);
                }
            }
            RenderMode::SolidWireframe => {
                self.shade(first);
                self.outline(first, OUTLINE_COLOR);
                if let Some(second) = second {
                    self.shade(second);
                    self.outline(second, OUTLINE_COLOR);
                }
            }
        }

        if self.show_normals {
            for v in first {
                draw_normal(&mut self.framebuffer, &self.camera, v);
            }
            if let Some(second) = second {
                for v in second {
                    draw_normal(&mut self.framebuffer, &self.camera, v);
                }
            }
        }
    }

    fn shade(&mut self, [v0, v1, v2]: [crate::mesh::Vertex3; 3]) {
        rasterize_triangle(&mut self.framebuffer, &self.camera, &self.light, &self.ambient, self.shading_mode, v0, v1, v2);
    }

    fn outline(&mut self, [v0, v1, v2]: [crate::mesh::Vertex3; 3], color: crate::color::Color) {
        draw_wireframe_triangle(&mut self.framebuffer, &self.camera, v0, v1, v2, color);
    }

    /// Mutates render state for one key event. Rates given "per
    /// second" in the key table are scaled by the delta recorded at
    /// the most recent `update` call.
    pub fn process_input(&mut self, key: Key) {
        let dt = self.last_delta;
        match key {
            Key::Wireframe => self.render_mode = RenderMode::Wireframe,
            Key::Solid => self.render_mode = RenderMode::Solid,
            Key::SolidAndWireframe => self.render_mode = RenderMode::SolidWireframe,
            Key::Flat => self.shading_mode = ShadingMode::Flat,
            Key::Gouraud => self.shading_mode = ShadingMode::Gouraud,
            Key::Phong => self.shading_mode = ShadingMode::Phong,
            Key::RotateObjectPositive => self.rotate_selected(OBJECT_ROTATE_RATE * dt),
            Key::RotateObjectNegative => self.rotate_selected(-OBJECT_ROTATE_RATE * dt),
            Key::ToggleNormals => self.show_normals = !self.show_normals,
            Key::CameraUp => self.camera.move_by(Vec3::new(0.0, -CAMERA_MOVE_RATE * dt, 0.0)),
            Key::CameraDown => self.camera.move_by(Vec3::new(0.0, CAMERA_MOVE_RATE * dt, 0.0)),
            Key::LightLeft => self.light.position = self.light.position - Vec3::new(LIGHT_NUDGE_RATE * dt, 0.0, 0.0),
            Key::LightRight => self.light.position = self.light.position + Vec3::new(LIGHT_NUDGE_RATE * dt, 0.0, 0.0),
            Key::LightUp => self.light.position = self.light.position + Vec3::new(0.0, LIGHT_NUDGE_RATE * dt, 0.0),
            Key::LightDown => self.light.position = self.light.position - Vec3::new(0.0, LIGHT_NUDGE_RATE * dt, 0.0),
            Key::SelectObject(slot) => {
                let index = slot.saturating_sub(1) as usize;
                if index < self.objects.len() {
                    self.cursor = index;
                }
            }
        }
    }

    fn rotate_selected(&mut self, radians: f32) {
        if let Some(object) = self.objects.get_mut(self.cursor) {
            object.rotate_y(radians);
        }
    }

    /// Consumes the context; buffers and objects are released by
    /// ordinary `Drop`. Kept as an explicit method so the host's
    /// "called exactly once, after the last `update`" contract has a
    /// checkable call site.
    pub fn on_shutdown(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_objects() -> [&'static str; 0] {
        []
    }

    #[test]
    fn launch_with_no_objects_falls_back_to_one_cube() {
        let ctx = RenderContext::on_launch(64, 64, &no_objects());
        assert_eq!(ctx.objects.len(), 1);
    }

    #[test]
    fn initial_state_matches_reference_defaults() {
        let ctx = RenderContext::on_launch(64, 64, &no_objects());
        assert_eq!(ctx.render_mode, RenderMode::Solid);
        assert_eq!(ctx.shading_mode, ShadingMode::Flat);
        assert_eq!(ctx.cursor, 0);
        assert!(!ctx.show_normals);
    }

    #[test]
    fn selecting_nonexistent_slot_is_a_silent_no_op() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.process_input(Key::SelectObject(9));
        assert_eq!(ctx.cursor, 0);
    }

    #[test]
    fn selecting_existing_slot_moves_cursor() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.objects.push(Object::new(1, build_cube()));
        ctx.process_input(Key::SelectObject(2));
        assert_eq!(ctx.cursor, 1);
    }

    #[test]
    fn toggle_normals_flips_the_flag() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.process_input(Key::ToggleNormals);
        assert!(ctx.show_normals);
        ctx.process_input(Key::ToggleNormals);
        assert!(!ctx.show_normals);
    }

    #[test]
    fn solid_flat_cube_renders_pixels_and_clears_on_next_update() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.update(1.0 / 60.0);
        assert!(ctx.framebuffer().depth_buffer().iter().any(|&d| d > 0.0));
    }

    #[test]
    fn far_object_is_culled_and_buffer_stays_black() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.objects[0].set_translation(Vec3::new(0.0, 0.0, 1.0e6));
        ctx.update(1.0 / 60.0);
        assert!(ctx.framebuffer().depth_buffer().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn only_selected_object_is_drawn() {
        let mut ctx = RenderContext::on_launch(64, 64, &no_objects());
        ctx.objects.push({
            let mut o = Object::new(1, build_cube());
            o.set_scale(4.0);
            o.set_translation(Vec3::new(100.0, 0.0, 12.0));
            o
        });
        ctx.process_input(Key::SelectObject(2));
        ctx.update(1.0 / 60.0);
        // cube 1 is far off-axis; only a drawn, on-axis object would
        // light pixels near the center of a 64x64 buffer.
        let center = 32 * 64 + 32;
        assert_eq!(ctx.framebuffer().depth_buffer()[center], 0.0);
    }
}
