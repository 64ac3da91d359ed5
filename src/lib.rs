//! CPU software rasterizer: math primitives, color, an indexed mesh and
//! world-placed object, a camera with an attached view frustum, a
//! single point + ambient light, single-plane frustum clipping, and a
//! perspective-correct scanline rasterizer driven by one owned
//! [`render::RenderContext`].

pub mod camera;
pub mod color;
pub mod frustum;
pub mod light;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod object;
pub mod raster;
pub mod render;

pub use obj::LoadError;
pub use raster::ShadingMode;
pub use render::{Key, RenderContext, RenderMode};

/// Internals exposed for benchmarking only; not part of the stable API.
pub mod bench {
    pub use crate::camera::Camera;
    pub use crate::light::{AmbientLight, PointLight};
    pub use crate::mesh::build_cube;
    pub use crate::raster::{rasterize_triangle, FrameBuffer, ShadingMode};
}
