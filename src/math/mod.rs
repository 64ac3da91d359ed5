//! Math primitives: vectors, row-major matrices, planes, spheres, and
//! the scalar helpers the rest of the crate builds on.

pub mod mat3;
pub mod mat4;
pub mod plane;
pub mod sphere;
pub mod util;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use plane::Plane;
pub use sphere::Sphere;
pub use util::{clamp, linear_interpolate};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
