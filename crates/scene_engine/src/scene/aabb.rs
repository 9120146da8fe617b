//! Axis-aligned bounding box

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box for spatial queries and collision bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    #[must_use]
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// An inverted box that acts as the identity for [`Self::expand`]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(f32::MIN),
        }
    }

    /// Get the center of the AABB
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (full extent) along each axis
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Total area of the six faces
    #[must_use]
    pub fn surface_area(&self) -> f32 {
        let d = self.size();
        (d.x * d.y + d.y * d.z + d.z * d.x) * 2.0
    }

    /// Grow the box to contain `point`
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow the box to contain another box
    pub fn expand_aabb(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Check if this AABB contains a point (boundary inclusive)
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB overlaps another.
    ///
    /// Strict inequalities: boxes that only touch at a boundary do not
    /// overlap, matching the SAT interval test.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// The 8 corners in the fixed winding shared by SAT and debug draw.
    ///
    /// Corner 0 is `min`, corner 4 is `max`; 1..=3 offset `min` along
    /// x/y/z and 5..=7 pull `max` back along x/y/z.
    #[must_use]
    pub fn vertices(&self) -> [Vec3; 8] {
        let d = self.size();
        [
            self.min,
            self.min + Vec3::new(d.x, 0.0, 0.0),
            self.min + Vec3::new(0.0, d.y, 0.0),
            self.min + Vec3::new(0.0, 0.0, d.z),
            self.max,
            self.max - Vec3::new(d.x, 0.0, 0.0),
            self.max - Vec3::new(0.0, d.y, 0.0),
            self.max - Vec3::new(0.0, 0.0, d.z),
        ]
    }
}
