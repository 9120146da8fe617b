//! Geometry primitives used for collision shapes and spatial bounds

mod aabb;
mod cube;
mod sphere;

pub use aabb::Aabb;
pub use cube::Cube;
pub use sphere::Sphere;
