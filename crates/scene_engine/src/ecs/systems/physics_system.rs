//! Physics integration

use crate::ecs::components::ComponentMask;
use crate::ecs::{System, World};
use crate::foundation::math::{Vec3, EPSILON};

/// Semi-implicit Euler integrator over all physical entities.
///
/// Each step accumulates gravity into the per-step force accumulator
/// (unless the entity rests on a surface), integrates velocity then
/// position, zeroes the accumulator and applies velocity damping.
#[derive(Debug)]
pub struct PhysicsSystem {
    /// Constant acceleration applied to airborne entities
    pub gravity: Vec3,
    /// Per-step velocity retention factor
    pub damping: f32,
    /// Whether damping is applied at all
    pub friction: bool,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -10.0),
            damping: 0.99,
            friction: true,
        }
    }
}

impl System for PhysicsSystem {
    fn component_mask(&self) -> ComponentMask {
        ComponentMask::TRANSFORM | ComponentMask::PHYSICS
    }

    fn update(&mut self, world: &mut World, delta_time: f32) {
        for id in world.query_by_mask(self.component_mask()) {
            let Ok(mut transform) = world.transform(id).copied() else {
                continue;
            };
            let Ok(mut physics) = world.physics(id).copied() else {
                continue;
            };

            if !physics.on_surface {
                physics.acceleration += self.gravity;
            }
            physics.velocity += physics.acceleration * delta_time;
            physics.acceleration = Vec3::zeros();
            if self.friction {
                physics.velocity *= self.damping;
            }

            transform.previous_position = transform.position;
            if physics.velocity.norm() > EPSILON {
                transform.position += physics.velocity * delta_time;
            }

            if let Ok(slot) = world.transform_mut(id) {
                *slot = transform;
            }
            if let Ok(slot) = world.physics_mut(id) {
                *slot = physics;
            }
        }
    }
}
