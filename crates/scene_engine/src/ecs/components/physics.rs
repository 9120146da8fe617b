//! Physics component

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Velocity and per-step force accumulation for an entity.
///
/// `acceleration` is a per-step force accumulator, not persistent
/// state: the physics system zeroes it at the end of every step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsComponent {
    /// Current velocity
    pub velocity: Vec3,
    /// Force accumulator for the current step
    pub acceleration: Vec3,
    /// Set while the entity rests on a surface; suppresses gravity
    #[serde(skip)]
    pub on_surface: bool,
}

impl PhysicsComponent {
    /// Reset velocity and accumulated forces
    pub fn set_defaults(&mut self) {
        *self = Self::default();
    }
}
