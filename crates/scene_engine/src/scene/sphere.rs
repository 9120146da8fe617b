//! Sphere primitive

use crate::foundation::math::Vec3;
use crate::scene::Aabb;
use serde::{Deserialize, Serialize};

/// A sphere in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// World-space center
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point lies strictly inside the sphere
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        (self.center - point).norm() < self.radius
    }

    /// Smallest axis-aligned box containing the sphere
    #[must_use]
    pub fn encapsulating_aabb(&self) -> Aabb {
        Aabb::from_center_extents(self.center, Vec3::repeat(self.radius))
    }
}
