//! Built-in per-frame systems
//!
//! The standard pipeline order matters: physics integrates first,
//! collision resolves the resulting positions, and event dispatch runs
//! last so callbacks observe a fully settled frame.

mod collision_system;
mod event_system;
mod physics_system;

pub use collision_system::CollisionSystem;
pub use event_system::EventSystem;
pub use physics_system::PhysicsSystem;
