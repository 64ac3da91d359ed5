//! Perspective-correct scanline fill shared by flat, Gouraud, and Phong
//! shading.
//!
//! Triangles are walked directly in NDC space: `y` steps by `2/H`, `x`
//! by `2/W`, matching [`FrameBuffer::put_pixel_ndc`]'s unit-square
//! convention, so no pixel-space rounding happens anywhere in this
//! module. `1/z` is the attribute actually interpolated (not `z`),
//! which is what makes the result perspective-correct; `z` itself is
//! only reconstructed where a shading model needs an actual point
//! (Phong).
//!
//! Every intermediate value — screen x, `1/z`, normal, color — is
//! carried together in one [`ScanVertex`] and swapped/interpolated as
//! a unit. The source this crate is grounded on suffered real bugs
//! from swapping `x` without its paired `z` or normal; keeping one
//! struct instead of four parallel scalars removes that failure mode
//! by construction.

use crate::camera::Camera;
use crate::color::Color;
use crate::light::{AmbientLight, PointLight};
use crate::math::{linear_interpolate, Vec3};
use crate::mesh::Vertex3;

use super::{project_to_ndc, FrameBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Flat,
    Gouraud,
    Phong,
}

#[derive(Debug, Clone, Copy)]
struct ScanVertex {
    x: f32,
    y: f32,
    inv_z: f32,
    normal: Vec3,
    color: Color,
}

fn project(camera: &Camera, v: Vertex3) -> ScanVertex {
    let (x, y) = project_to_ndc(v.point, camera);
    ScanVertex {
        x,
        y,
        inv_z: 1.0 / v.point.z,
        normal: v.normal,
        color: v.color,
    }
}

fn lerp_normal(t: f32, t0: f32, a: Vec3, t1: f32, b: Vec3) -> Vec3 {
    Vec3::new(
        linear_interpolate(t, t0, a.x, t1, b.x),
        linear_interpolate(t, t0, a.y, t1, b.y),
        linear_interpolate(t, t0, a.z, t1, b.z),
    )
}

/// Interpolates every attribute at `y`, anchored between `a` and `b`
/// (by their `.y`). Used to find the edge positions for a scanline.
fn lerp_edge(y: f32, a: ScanVertex, b: ScanVertex) -> ScanVertex {
    ScanVertex {
        x: linear_interpolate(y, a.y, a.x, b.y, b.x),
        y,
        inv_z: linear_interpolate(y, a.y, a.inv_z, b.y, b.inv_z),
        normal: lerp_normal(y, a.y, a.normal, b.y, b.normal),
        color: Color::lerp(y, a.y, a.color, b.y, b.color),
    }
}

/// Interpolates every attribute at `x`, anchored between `start` and
/// `end` (by their `.x`). Used to walk one scanline.
fn lerp_span(x: f32, start: ScanVertex, end: ScanVertex) -> ScanVertex {
    ScanVertex {
        x,
        y: start.y,
        inv_z: linear_interpolate(x, start.x, start.inv_z, end.x, end.inv_z),
        normal: lerp_normal(x, start.x, start.normal, end.x, end.normal),
        color: Color::lerp(x, start.x, start.color, end.x, end.color),
    }
}

/// Inverse of [`project_to_ndc`]: reconstructs the view-space point a
/// fragment's interpolated `1/z` came from, for shading models that
/// need an actual position rather than just a depth key.
fn unproject(camera: &Camera, ndc_x: f32, ndc_y: f32, inv_z: f32) -> Vec3 {
    let z = 1.0 / inv_z;
    let d = camera.origin().z + camera.focal();
    let view_x = ndc_x * (camera.viewport_width() / 2.0) * z / d;
    let view_y = ndc_y * (camera.viewport_height() / 2.0) * z / d;
    Vec3::new(view_x, view_y, z)
}

/// Sorts three projected vertices by ascending `y`, swapping whole
/// vertices so `x`/`1/z`/normal/color never desync from the vertex
/// they belong to.
fn sort_by_y(mut p0: ScanVertex, mut p1: ScanVertex, mut p2: ScanVertex) -> (ScanVertex, ScanVertex, ScanVertex) {
    if p1.y < p0.y {
        std::mem::swap(&mut p0, &mut p1);
    }
    if p2.y < p1.y {
        std::mem::swap(&mut p1, &mut p2);
    }
    if p1.y < p0.y {
        std::mem::swap(&mut p0, &mut p1);
    }
    (p0, p1, p2)
}

fn scan_row(fb: &mut FrameBuffer, y: f32, a: ScanVertex, b: ScanVertex, dx: f32, shade: &mut dyn FnMut(f32, f32, f32, Vec3, Color) -> Color) {
    let (start, end) = if a.x <= b.x { (a, b) } else { (b, a) };
    let mut x = start.x;
    while x <= end.x {
        let frag = lerp_span(x, start, end);
        let color = shade(x, y, frag.inv_z, frag.normal, frag.color);
        fb.put_pixel_ndc(x, y, frag.inv_z, color);
        x += dx;
    }
}

/// Walks the triangle top half (`p0`→`p1` short edge) then bottom half
/// (`p1`→`p2` short edge), the long edge always being `p0`→`p2`, and
/// calls `shade` once per fragment to turn interpolated attributes
/// into a final color.
fn walk(fb: &mut FrameBuffer, camera: &Camera, v0: Vertex3, v1: Vertex3, v2: Vertex3, mut shade: impl FnMut(f32, f32, f32, Vec3, Color) -> Color) {
    let (p0, p1, p2) = sort_by_y(project(camera, v0), project(camera, v1), project(camera, v2));

    let dy = 2.0 / fb.height() as f32;
    let dx = 2.0 / fb.width() as f32;

    let mut y = p0.y;
    while y < p1.y {
        let long = lerp_edge(y, p0, p2);
        let short = lerp_edge(y, p0, p1);
        scan_row(fb, y, long, short, dx, &mut shade);
        y += dy;
    }

    let mut y = p1.y;
    while y <= p2.y {
        let long = lerp_edge(y, p0, p2);
        let short = lerp_edge(y, p1, p2);
        scan_row(fb, y, long, short, dx, &mut shade);
        y += dy;
    }
}

/// Face normal (unnormalized direction; normalized before use) and
/// centroid of a triangle's own (possibly post-clip) vertices.
fn face_normal_and_centroid(v0: Vertex3, v1: Vertex3, v2: Vertex3) -> (Vec3, Vec3) {
    let normal = (v1.point - v0.point).cross(v2.point - v0.point).normalize();
    let centroid = Vec3::average(v0.point, v1.point, v2.point);
    (normal, centroid)
}

/// Bakes flat intensity (one value for the whole face, from its own
/// normal and centroid) into all three vertex colors.
fn lit_flat(light: &PointLight, ambient: &AmbientLight, v0: Vertex3, v1: Vertex3, v2: Vertex3) -> [Vertex3; 3] {
    let (normal, centroid) = face_normal_and_centroid(v0, v1, v2);
    let intensity = ambient.intensity + light.intensity_flat(normal, centroid);
    [
        Vertex3::new(v0.point, v0.normal, v0.color * intensity),
        Vertex3::new(v1.point, v1.normal, v1.color * intensity),
        Vertex3::new(v2.point, v2.normal, v2.color * intensity),
    ]
}

/// Bakes per-vertex Gouraud intensity into each vertex's own color;
/// the scanline then interpolates already-lit colors with no further
/// per-fragment lighting.
fn lit_gouraud(light: &PointLight, ambient: &AmbientLight, v0: Vertex3, v1: Vertex3, v2: Vertex3) -> [Vertex3; 3] {
    let light_vertex = |v: Vertex3| {
        let normal = v.normal.normalize();
        let intensity = ambient.intensity + light.intensity_gouraud(v.point, normal);
        Vertex3::new(v.point, v.normal, v.color * intensity)
    };
    [light_vertex(v0), light_vertex(v1), light_vertex(v2)]
}

/// Rasterizes one already-clipped triangle under `mode`, writing into
/// `fb`'s color and depth buffers. `v0`/`v1`/`v2` are in view space.
pub fn rasterize_triangle(
    fb: &mut FrameBuffer,
    camera: &Camera,
    light: &PointLight,
    ambient: &AmbientLight,
    mode: ShadingMode,
    v0: Vertex3,
    v1: Vertex3,
    v2: Vertex3,
) {
    match mode {
        ShadingMode::Flat => {
            let [v0, v1, v2] = lit_flat(light, ambient, v0, v1, v2);
            walk(fb, camera, v0, v1, v2, |_, _, _, _, color| color);
        }
        ShadingMode::Gouraud => {
            let [v0, v1, v2] = lit_gouraud(light, ambient, v0, v1, v2);
            walk(fb, camera, v0, v1, v2, |_, _, _, _, color| color);
        }
        ShadingMode::Phong => {
            let camera_origin = camera.origin();
            walk(fb, camera, v0, v1, v2, move |x, y, inv_z, normal, color| {
                if normal.length() == 0.0 {
                    return Color::BLACK;
                }
                let point = unproject(camera, x, y, inv_z);
                let view_dir = camera_origin - point;
                let intensity = ambient.intensity + light.intensity_phong(point, normal.normalize(), view_dir);
                color * intensity
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 1.0, 1.0)
    }

    fn tri(z: f32) -> (Vertex3, Vertex3, Vertex3) {
        (
            Vertex3::new(Vec3::new(-0.3, -0.3, z), Vec3::UP, Color::WHITE),
            Vertex3::new(Vec3::new(0.3, -0.3, z), Vec3::UP, Color::WHITE),
            Vertex3::new(Vec3::new(0.0, 0.3, z), Vec3::UP, Color::WHITE),
        )
    }

    #[test]
    fn flat_shading_writes_pixels_and_depth() {
        let mut fb = FrameBuffer::new(32, 32);
        let (v0, v1, v2) = tri(3.0);
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0), 1.0, 10.0);
        let ambient = AmbientLight::new(0.2);
        rasterize_triangle(&mut fb, &camera(), &light, &ambient, ShadingMode::Flat, v0, v1, v2);
        assert!(fb.depth_buffer().iter().any(|&d| d > 0.0));
    }

    #[test]
    fn nearer_triangle_wins_depth_test_over_farther_one() {
        let mut fb = FrameBuffer::new(32, 32);
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0), 1.0, 10.0);
        let ambient = AmbientLight::new(1.0);

        let (v0, v1, v2) = tri(10.0);
        rasterize_triangle(&mut fb, &camera(), &light, &ambient, ShadingMode::Flat, v0, v1, v2);
        let far_depth = fb.depth_buffer()[16 * 32 + 16];

        let (v0, v1, v2) = tri(3.0);
        rasterize_triangle(&mut fb, &camera(), &light, &ambient, ShadingMode::Flat, v0, v1, v2);
        let near_depth = fb.depth_buffer()[16 * 32 + 16];

        assert!(near_depth > far_depth);
    }

    #[test]
    fn phong_produces_a_specular_highlight_brighter_than_gouraud() {
        let light = PointLight::new(Vec3::new(0.0, 2.0, 2.5), 1.0, 20.0);
        let ambient = AmbientLight::new(0.0);
        let camera = camera();

        let v0 = Vertex3::new(Vec3::new(-0.5, -0.5, 3.0), Vec3::new(-0.2, 0.3, 1.0).normalize(), Color::WHITE);
        let v1 = Vertex3::new(Vec3::new(0.5, -0.5, 3.0), Vec3::new(0.2, 0.3, 1.0).normalize(), Color::WHITE);
        let v2 = Vertex3::new(Vec3::new(0.0, 0.5, 3.0), Vec3::UP, Color::WHITE);

        let mut phong_fb = FrameBuffer::new(64, 64);
        rasterize_triangle(&mut phong_fb, &camera, &light, &ambient, ShadingMode::Phong, v0, v1, v2);

        let mut gouraud_fb = FrameBuffer::new(64, 64);
        rasterize_triangle(&mut gouraud_fb, &camera, &light, &ambient, ShadingMode::Gouraud, v0, v1, v2);

        let brightest = |fb: &FrameBuffer| {
            fb.color_buffer()
                .iter()
                .map(|&p| Color::unpack(p).r as u32)
                .max()
                .unwrap_or(0)
        };
        assert!(brightest(&phong_fb) >= brightest(&gouraud_fb));
    }
}
