//! Narrow-phase collision detection
//!
//! Exact intersection tests between convex primitive pairs: a
//! Separating Axis Theorem implementation for box-like shapes and
//! closed-form shortcuts for everything involving spheres. All tests
//! produce the same [`CollisionData`] record so broad-phase candidates,
//! resolution and deferred events share one result shape.

pub mod narrow_phase;
pub mod sat;

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Result of a narrow-phase intersection test.
///
/// When `intersecting` is set, `normal` is the unit direction that
/// pushes the first body out of the second and `depth` is the minimum
/// translation distance along it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionData {
    /// Unit minimum-translation direction, pointing from the second
    /// body toward the first
    pub normal: Vec3,
    /// Penetration depth along `normal`
    pub depth: f32,
    /// Whether the two bodies intersect at all
    pub intersecting: bool,
}

impl CollisionData {
    /// Flip the normal, swapping which body the result pushes out
    pub fn invert(&mut self) {
        self.normal = -self.normal;
    }
}

impl Default for CollisionData {
    fn default() -> Self {
        Self {
            normal: Vec3::zeros(),
            depth: 0.0,
            intersecting: false,
        }
    }
}
