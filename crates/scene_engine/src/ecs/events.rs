//! Deferred events
//!
//! Systems enqueue events during their update; the event system flushes
//! the queue once per frame after all other systems ran, so handlers
//! always observe a fully-integrated frame state.

use crate::ecs::{EntityId, World};
use crate::physics::CollisionData;
use std::fmt;
use std::rc::Rc;

/// A collision between two entities, reported to the moving side
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    /// The moving entity the collision was resolved for
    pub entity: EntityId,
    /// The entity it collided with
    pub other: EntityId,
    /// Narrow-phase result at the time of resolution
    pub data: CollisionData,
}

/// Deferred event kinds
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Collision reported by the collision system
    Collision(CollisionEvent),
}

impl Event {
    /// The entity the event targets; events whose target is destroyed
    /// before the flush silently no-op
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::Collision(event) => event.entity,
        }
    }
}

/// Callback invoked when a collision event targeting the entity is
/// flushed
pub type OnCollisionCallback = Rc<dyn Fn(&mut World, &CollisionEvent)>;

/// Optional event-callback bindings attached to an entity
#[derive(Clone, Default)]
pub struct EventBindings {
    /// Invoked by the event system for each flushed collision event
    pub on_collision: Option<OnCollisionCallback>,
}

impl fmt::Debug for EventBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBindings")
            .field("on_collision", &self.on_collision.is_some())
            .finish()
    }
}
