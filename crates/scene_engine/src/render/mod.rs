//! External collaborator boundaries
//!
//! The simulation core has no rendering, windowing or file I/O of its
//! own; it talks to those subsystems through the narrow traits below
//! and never depends on how they are implemented.

use crate::ecs::components::{MeshComponent, ObjectType, TransformComponent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier handed out by the rendering backend for a registered
/// entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderId(pub u32);

/// Identifier of loaded geometry inside the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryIndex(pub u32);

/// Error from the resource loading collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The collaborator could not produce geometry for the file
    #[error("failed to load '{path}': {reason}")]
    LoadFailed {
        /// Requested file
        path: String,
        /// Collaborator-provided reason
        reason: String,
    },
}

/// Rendering backend boundary.
///
/// The entity directory registers renderable entities after their
/// deferred initialization, pushes transform updates each frame and
/// unregisters them on deletion.
pub trait RenderBackend {
    /// Register an entity, returning the backend's id for it
    fn register_entity(&mut self, transform: &TransformComponent, mesh: &MeshComponent)
        -> RenderId;

    /// Remove a previously registered entity
    fn unregister_entity(&mut self, id: RenderId);

    /// Push an updated transform for a registered entity
    fn update_transform(&mut self, id: RenderId, transform: &TransformComponent);
}

/// Resource loading boundary
pub trait ResourceLoader {
    /// Load geometry from a file, returning the backend geometry index
    ///
    /// # Errors
    /// [`ResourceError::LoadFailed`] when the collaborator cannot load
    /// the file; callers log and continue.
    fn load(&mut self, filename: &str, kind: ObjectType) -> Result<GeometryIndex, ResourceError>;
}

/// Render backend that accepts every registration and does nothing.
///
/// Default injection for headless use and tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_id: u32,
}

impl RenderBackend for NullRenderer {
    fn register_entity(
        &mut self,
        _transform: &TransformComponent,
        _mesh: &MeshComponent,
    ) -> RenderId {
        let id = RenderId(self.next_id);
        self.next_id += 1;
        id
    }

    fn unregister_entity(&mut self, _id: RenderId) {}

    fn update_transform(&mut self, _id: RenderId, _transform: &TransformComponent) {}
}
