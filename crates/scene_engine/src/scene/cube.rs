//! Oriented box primitive

use crate::foundation::math::{rotate_around_pivot, Quat, Vec3};
use crate::scene::Aabb;
use serde::{Deserialize, Serialize};

/// An oriented box: an axis-aligned box rotated about its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// World-space center
    pub center: Vec3,
    /// Half-extent along each local axis
    pub half_extents: Vec3,
    /// Orientation applied about the center
    pub rotation: Quat,
}

impl Cube {
    /// Create a new oriented box
    #[must_use]
    pub const fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Total surface area of the unrotated box
    #[must_use]
    pub fn surface_area(&self) -> f32 {
        let d = self.half_extents * 2.0;
        (d.x * d.y + d.y * d.z + d.z * d.x) * 2.0
    }

    /// The 8 corners, rotated about the center, in the same winding as
    /// [`Aabb::vertices`]
    #[must_use]
    pub fn vertices(&self) -> [Vec3; 8] {
        let local = Aabb::from_center_extents(self.center, self.half_extents);
        local
            .vertices()
            .map(|corner| rotate_around_pivot(&self.rotation, corner, self.center))
    }

    /// Smallest axis-aligned box containing the rotated cube
    #[must_use]
    pub fn encapsulating_aabb(&self) -> Aabb {
        let mut result = Aabb::empty();
        for vertex in self.vertices() {
            result.expand(vertex);
        }
        result
    }
}
