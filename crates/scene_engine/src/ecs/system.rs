//! System trait

use crate::ecs::components::ComponentMask;
use crate::ecs::{EntityId, World};

/// A per-frame behavior over entities with a matching component mask.
///
/// Systems are installed on the [`World`] and run in installation order
/// each frame. During `update` the system is temporarily detached from
/// the world, so it may freely mutate entities, push events and even
/// create or delete entities.
pub trait System {
    /// Component kinds an entity must carry for this system to touch it
    fn component_mask(&self) -> ComponentMask;

    /// Called once when a matching entity is created, before its
    /// deferred initialization completes
    fn register_entity(&mut self, _id: EntityId) {}

    /// Called once when the system is installed
    fn initialize(&mut self) {}

    /// Run one frame step
    fn update(&mut self, world: &mut World, delta_time: f32);
}
