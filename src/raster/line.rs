//! DDA line drawing on NDC coordinates, the wireframe triangle outline
//! built from it, and the normal-visualization overlay.

use super::{project_to_ndc, FrameBuffer};
use crate::camera::Camera;
use crate::color::{Color, LineColor};
use crate::math::{linear_interpolate, Vec2};
use crate::mesh::Vertex3;

/// Priority at which wireframe edges are depth-tested: always above
/// any realistic face `1/z`, so edges win over the faces they outline.
pub const WIREFRAME_PRIORITY: f32 = 1.0;
/// Priority for the normal overlay: higher still, so normals always
/// draw above both faces and wireframe edges.
pub const NORMAL_PRIORITY: f32 = 1000.0;

#[derive(Debug, Clone, Copy)]
struct NdcVertex {
    point: Vec2,
    color: Color,
}

/// Bresenham-style DDA: transposes x/y when the line is steeper than
/// it is wide, so the independent axis is always the one with more
/// pixel steps, then walks it at the matching resolution (`2/W` flat,
/// `2/H` steep).
fn draw_line(fb: &mut FrameBuffer, mut a: NdcVertex, mut b: NdcVertex, line_color: LineColor, z_priority: f32) {
    let steep = (a.point.y - b.point.y).abs() > (a.point.x - b.point.x).abs();
    if steep {
        a.point.transpose();
        b.point.transpose();
    }
    if a.point.x > b.point.x {
        std::mem::swap(&mut a, &mut b);
    }

    let step = if steep {
        2.0 / fb.height() as f32
    } else {
        2.0 / fb.width() as f32
    };

    let mut x = a.point.x;
    while x <= b.point.x {
        let y = linear_interpolate(x, a.point.x, a.point.y, b.point.x, b.point.y);
        let color = match line_color {
            LineColor::Fixed(c) => c,
            LineColor::InterpolateEndpoints => Color::lerp(x, a.point.x, a.color, b.point.x, b.color),
        };

        if steep {
            fb.put_pixel_ndc(y, x, z_priority, color);
        } else {
            fb.put_pixel_ndc(x, y, z_priority, color);
        }
        x += step;
    }
}

fn project_vertex(camera: &Camera, v: Vertex3) -> NdcVertex {
    let (x, y) = project_to_ndc(v.point, camera);
    NdcVertex {
        point: Vec2::new(x, y),
        color: v.color,
    }
}

/// Draws the three edges of a clipped triangle in `line_color`.
/// Wireframe mode has backface culling disabled.
pub fn draw_wireframe_triangle(fb: &mut FrameBuffer, camera: &Camera, v0: Vertex3, v1: Vertex3, v2: Vertex3, line_color: Color) {
    let p0 = project_vertex(camera, v0);
    let p1 = project_vertex(camera, v1);
    let p2 = project_vertex(camera, v2);

    draw_line(fb, p0, p1, LineColor::Fixed(line_color), WIREFRAME_PRIORITY);
    draw_line(fb, p1, p2, LineColor::Fixed(line_color), WIREFRAME_PRIORITY);
    draw_line(fb, p2, p0, LineColor::Fixed(line_color), WIREFRAME_PRIORITY);
}

/// Draws a line from `v.point` to `v.point + v.normal` (unnormalized
/// scale), white to green, above both faces and wireframe edges.
pub fn draw_normal(fb: &mut FrameBuffer, camera: &Camera, v: Vertex3) {
    let start = project_vertex(camera, Vertex3::new(v.point, v.normal, Color::WHITE));
    let end = project_vertex(camera, Vertex3::new(v.point + v.normal, v.normal, Color::GREEN));
    draw_line(fb, start, end, LineColor::InterpolateEndpoints, NORMAL_PRIORITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_camera() -> Camera {
        Camera::new(crate::math::Vec3::ZERO, std::f32::consts::FRAC_PI_2, 1.0, 1.0)
    }

    #[test]
    fn wireframe_triangle_writes_pixels() {
        let camera = flat_camera();
        let mut fb = FrameBuffer::new(32, 32);
        let v0 = Vertex3::new(crate::math::Vec3::new(-0.3, -0.3, 3.0), crate::math::Vec3::UP, Color::RED);
        let v1 = Vertex3::new(crate::math::Vec3::new(0.3, -0.3, 3.0), crate::math::Vec3::UP, Color::RED);
        let v2 = Vertex3::new(crate::math::Vec3::new(0.0, 0.3, 3.0), crate::math::Vec3::UP, Color::RED);
        draw_wireframe_triangle(&mut fb, &camera, v0, v1, v2, Color::RED);
        assert!(fb.depth_buffer().iter().any(|&d| d > 0.0));
    }

    #[test]
    fn normal_overlay_outranks_wireframe_priority() {
        assert!(NORMAL_PRIORITY > WIREFRAME_PRIORITY);
    }
}
