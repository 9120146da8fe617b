//! Error types for the simulation core
//!
//! Nothing in this core is fatal by design: invalid operations surface
//! as distinguishable errors, the call sites inside the per-frame
//! pipeline log them and continue running.

use crate::ecs::components::{CollisionShape, ComponentMask};
use crate::ecs::EntityId;
use thiserror::Error;

/// Errors from entity directory and component storage operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The id's generation no longer matches the slot (deleted and
    /// possibly reused since the id was captured)
    #[error("stale entity id {0:?}")]
    StaleEntity(EntityId),

    /// The entity has not gone through deferred initialization yet
    #[error("entity {0:?} is not initialized")]
    NotInitialized(EntityId),

    /// The entity was already destroyed
    #[error("entity {0:?} is already destroyed")]
    AlreadyDestroyed(EntityId),

    /// The entity does not carry the requested component kind
    #[error("entity {id:?} is missing component(s) {missing:?}")]
    MissingComponent {
        /// Entity the access went through
        id: EntityId,
        /// Required bits absent from the entity's mask
        missing: ComponentMask,
    },
}

/// Errors from narrow-phase collision and shape extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollisionError {
    /// A typed extraction did not match the stored shape tag
    #[error("expected shape {expected:?} but collision shape is {actual:?}")]
    ShapeMismatch {
        /// Shape the accessor was asked for
        expected: CollisionShape,
        /// Shape actually stored in the component
        actual: CollisionShape,
    },

    /// No intersection routine exists for this shape (e.g. `None`)
    #[error("intersection test not supported for shape {0:?}")]
    UnsupportedShape(CollisionShape),
}
