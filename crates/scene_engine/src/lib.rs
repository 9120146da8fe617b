//! # Scene Engine
//!
//! Data-oriented simulation core for an interactive 3D editor/runtime.
//!
//! The crate provides:
//!
//! - **ECS storage**: entities as stable ids with slot reuse, component
//!   data in parallel arrays ([`ecs::EntityStorage`], [`ecs::World`])
//! - **Systems pipeline**: per-frame physics integration, collision
//!   resolution and deferred event dispatch ([`ecs::systems`])
//! - **Narrow-phase collision**: Separating Axis Theorem with minimum
//!   translation vector extraction, plus exact sphere tests
//!   ([`physics`])
//! - **Broad-phase collision**: a compact bounding volume hierarchy
//!   rebuilt per frame ([`spatial`])
//!
//! Rendering, windowing, asset I/O and serialization are external
//! collaborators consumed through the narrow traits in [`render`];
//! nothing in this crate depends on how they are implemented.
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::ecs::{Entity, World};
//! use scene_engine::ecs::components::ComponentMask;
//!
//! let mut world = World::default();
//! world.initialize();
//!
//! let id = world.create(Entity::new("player", ComponentMask::TRANSFORM | ComponentMask::PHYSICS));
//! world.post_frame(); // deferred initialization runs here
//!
//! world.update(1.0 / 60.0);
//! assert!(world.is_alive(id));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod ecs;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;
pub mod spatial;

pub use error::{CollisionError, EcsError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        ecs::{
            components::{
                CollisionComponent, CollisionShape, ComponentMask, MeshComponent,
                PhysicsComponent, TransformComponent,
            },
            Entity, EntityId, System, World,
        },
        error::{CollisionError, EcsError},
        foundation::math::{Quat, Vec3, Vec4},
        physics::CollisionData,
        render::{NullRenderer, RenderBackend, ResourceLoader},
        scene::{Aabb, Cube, Sphere},
        spatial::CompactBvh,
    };
}
