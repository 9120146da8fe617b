//! Entity-component-system core
//!
//! Entities are stable ids into parallel component arrays; systems run
//! once per frame over the entities whose component mask matches
//! theirs. The [`World`] owns the storage, the systems pipeline, the
//! broad-phase index and the deferred event queue.

pub mod components;
mod entity;
mod events;
mod storage;
mod system;
pub mod systems;
mod world;

pub use entity::{Entity, EntityFlags, EntityId};
pub use events::{CollisionEvent, Event, EventBindings, OnCollisionCallback};
pub use storage::EntityStorage;
pub use system::System;
pub use world::World;
