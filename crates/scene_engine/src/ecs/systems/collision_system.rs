//! Collision resolution

use crate::ecs::components::ComponentMask;
use crate::ecs::{CollisionEvent, Event, System, World};
use crate::foundation::math::{project, EPSILON};
use crate::physics::narrow_phase;

/// Minimum upward normal z for a contact to count as standing on a
/// surface
const SURFACE_NORMAL_Z: f32 = 0.5;

/// Broad-phase plus narrow-phase resolution for all collidable
/// entities.
///
/// Each step rebuilds the bounding volume hierarchy from the positions
/// the physics system just produced, then resolves every non-static
/// entity against its broad-phase candidates: the entity is pushed out
/// along the minimum translation vector, its velocity loses the
/// component into the contact, and a collision event is queued for the
/// next event flush.
///
/// The `on_surface` flag of a moving body is cleared before resolution
/// and set again only if an upward contact recurs; bodies at rest are
/// skipped entirely and keep their flag.
#[derive(Debug, Default)]
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn component_mask(&self) -> ComponentMask {
        ComponentMask::TRANSFORM | ComponentMask::COLLISION
    }

    fn update(&mut self, world: &mut World, _delta_time: f32) {
        world.update_collision_bvh();

        // Snapshot of the matching handles; entities created during
        // resolution wait for the next frame anyway
        let ids = world.query_by_mask(self.component_mask());
        for id in ids {
            let Ok(collision) = world.collision(id).copied() else {
                continue;
            };
            if collision.static_body {
                continue;
            }
            let Ok(mut transform) = world.transform(id).copied() else {
                continue;
            };
            // Bodies that did not move since the physics step cannot
            // have entered a new contact
            if (transform.position - transform.previous_position).norm() < EPSILON {
                continue;
            }
            let bounds = match collision.encapsulating_aabb(&transform) {
                Ok(bounds) => bounds,
                Err(err) => {
                    log::warn!("skipping collision resolution for {id:?}: {err}");
                    continue;
                }
            };
            let mut physics = world.physics(id).ok().copied();
            // A moving body must re-prove its support each step; a
            // resting body is skipped above and keeps the flag
            if let Some(physics) = physics.as_mut() {
                physics.on_surface = false;
            }

            for other_index in world.collision_bvh().query(&bounds) {
                let Some(other) = world.id_at(other_index) else {
                    continue;
                };
                if other == id {
                    continue;
                }
                let Ok(other_collision) = world.collision(other).copied() else {
                    continue;
                };
                let Ok(other_transform) = world.transform(other).copied() else {
                    continue;
                };

                let data = match narrow_phase::check_intersection(
                    &collision,
                    &transform,
                    &other_collision,
                    &other_transform,
                ) {
                    Ok(data) => data,
                    Err(err) => {
                        log::warn!("intersection test {id:?} vs {other:?} failed: {err}");
                        continue;
                    }
                };
                if !data.intersecting {
                    continue;
                }

                // Push out along the minimum translation vector; later
                // candidates see the corrected position
                transform.position += data.normal * data.depth;
                if let Some(physics) = physics.as_mut() {
                    physics.velocity -= project(physics.velocity, data.normal);
                    if data.normal.z > SURFACE_NORMAL_Z {
                        physics.on_surface = true;
                    }
                }

                world.push_event(Event::Collision(CollisionEvent {
                    entity: id,
                    other,
                    data,
                }));
            }

            if let Ok(slot) = world.transform_mut(id) {
                *slot = transform;
            }
            if let (Some(physics), Ok(slot)) = (physics, world.physics_mut(id)) {
                *slot = physics;
            }
        }
    }
}
