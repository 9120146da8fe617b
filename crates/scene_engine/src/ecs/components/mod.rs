//! Component kinds and the component-membership mask
//!
//! Components are plain data records: no logic beyond typed accessors,
//! no owning references to other entities. All of them serialize as-is
//! for the external serialization collaborator.

mod collision;
mod mesh;
mod physics;
mod transform;

pub use collision::{CollisionComponent, CollisionShape};
pub use mesh::{Material, MeshComponent, ObjectType};
pub use physics::PhysicsComponent;
pub use transform::TransformComponent;

bitflags::bitflags! {
    /// Bitset recording which component kinds an entity carries.
    ///
    /// Systems declare their required components as a mask and only see
    /// entities whose mask contains every required bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentMask: u32 {
        /// Position, pivot, scale and rotation
        const TRANSFORM = 1 << 0;
        /// Velocity and force accumulator
        const PHYSICS = 1 << 1;
        /// Collision shape and static flag
        const COLLISION = 1 << 2;
        /// Mesh reference for the rendering backend
        const MESH = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::Sphere;

    // The serialization collaborator sees components as plain data;
    // runtime-only fields are skipped and come back as defaults
    #[test]
    fn transform_round_trips_without_runtime_state() {
        let mut transform = TransformComponent::default();
        transform.position = Vec3::new(1.0, 2.0, 3.0);
        transform.previous_position = Vec3::repeat(9.0);

        let text = ron::to_string(&transform).unwrap();
        let back: TransformComponent = ron::from_str(&text).unwrap();
        assert_eq!(back.position, transform.position);
        assert_eq!(back.previous_position, Vec3::zeros());
    }

    #[test]
    fn collision_round_trips_exactly() {
        let mut collision = CollisionComponent::default();
        collision.set_sphere(&Sphere::new(Vec3::zeros(), 4.0));
        collision.static_body = true;

        let text = ron::to_string(&collision).unwrap();
        let back: CollisionComponent = ron::from_str(&text).unwrap();
        assert_eq!(back, collision);
    }

    #[test]
    fn mesh_round_trips_without_backend_handles() {
        let mut mesh = MeshComponent::default();
        mesh.set_mesh_data("models/crate.obj", ObjectType::StaticMesh);
        mesh.custom_materials.push(Material {
            name: "painted".to_owned(),
            albedo: Vec3::new(0.8, 0.1, 0.1),
            ..Default::default()
        });

        let text = ron::to_string(&mesh).unwrap();
        let back: MeshComponent = ron::from_str(&text).unwrap();
        assert_eq!(back.filename, mesh.filename);
        assert_eq!(back.custom_materials, mesh.custom_materials);
        assert_eq!(back.geometry_index, None);
        assert!(!back.loaded());
    }
}
