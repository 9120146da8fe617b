//! Entities and their ids

use crate::ecs::components::ComponentMask;
use crate::ecs::events::EventBindings;
use crate::render::RenderId;

/// Stable entity handle: a slot index plus the slot's generation at the
/// time the handle was issued.
///
/// Deleting an entity bumps its slot's generation, so handles captured
/// before the deletion can be told apart from the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    /// Slot index into the component arrays
    pub index: u32,
    /// Generation of the slot when the handle was issued
    pub generation: u32,
}

impl EntityId {
    /// Handle that never refers to a live entity
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

bitflags::bitflags! {
    /// Lifecycle flags of an entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u32 {
        /// Created in the entity directory
        const REGISTERED = 1 << 0;
        /// Registered with the rendering backend
        const REGISTERED_BACKEND = 1 << 1;
        /// Deferred initialization completed
        const INITIALIZED = 1 << 2;
        /// Eligible for system updates
        const CAN_UPDATE = 1 << 3;
        /// Deleted; the slot awaits reuse
        const DESTROYED = 1 << 4;
    }
}

/// Per-entity record: identity, component membership, lifecycle state
/// and event bindings.
///
/// Component data itself lives in the parallel arrays of
/// [`EntityStorage`](crate::ecs::EntityStorage), not here.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Display name, for logs and tooling
    pub name: String,
    /// The entity's own handle, assigned on creation
    pub id: EntityId,
    /// Handle in the rendering backend, once registered there
    pub render_id: Option<RenderId>,
    /// Which component kinds the entity carries
    pub mask: ComponentMask,
    /// Lifecycle flags
    pub flags: EntityFlags,
    /// Optional event-callback bindings
    pub events: EventBindings,
}

impl Entity {
    /// Create an entity description ready to hand to
    /// [`World::create`](crate::ecs::World::create)
    #[must_use]
    pub fn new(name: impl Into<String>, mask: ComponentMask) -> Self {
        Self {
            name: name.into(),
            id: EntityId::INVALID,
            render_id: None,
            mask,
            flags: EntityFlags::CAN_UPDATE,
            events: EventBindings::default(),
        }
    }

    /// Whether the entity has been deleted
    #[must_use]
    pub const fn destroyed(&self) -> bool {
        self.flags.contains(EntityFlags::DESTROYED)
    }
}
