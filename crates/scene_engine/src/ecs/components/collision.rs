//! Collision component

use crate::ecs::components::TransformComponent;
use crate::error::CollisionError;
use crate::foundation::math::{Vec3, Vec4};
use crate::scene::{Aabb, Cube, Sphere};
use serde::{Deserialize, Serialize};

/// Shape carried by a collision component.
///
/// The ordering matters: shape-pair dispatch in the narrow phase sorts
/// operands by this ranking so only the six ordered pairings need
/// distinct implementations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum CollisionShape {
    /// No collision shape assigned
    #[default]
    None,
    /// Axis-aligned box
    Aabb,
    /// Oriented box
    Cube,
    /// Sphere
    Sphere,
}

/// Collision shape of an entity, stored as two generic 4-component data
/// slots whose interpretation depends on the shape tag.
///
/// The packed layout keeps the component a fixed-size value; use the
/// typed `extract_*` accessors rather than reading the raw slots. Each
/// accessor validates the shape tag and fails with
/// [`CollisionError::ShapeMismatch`] otherwise.
///
/// Slot interpretation:
/// - `Aabb`: `data1`/`data2` hold the min/max corner offsets from the
///   entity location
/// - `Sphere`: `data1.w` holds the radius (the center follows the
///   entity location)
/// - `Cube`: derived from the transform; the slots cache center and
///   half-extents for serialization
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionComponent {
    /// First generic data slot
    pub data1: Vec4,
    /// Second generic data slot
    pub data2: Vec4,
    /// Interpretation tag for the data slots
    pub shape: CollisionShape,
    /// Static bodies are never the moving side of resolution but still
    /// participate as obstacles
    pub static_body: bool,
}

impl CollisionComponent {
    /// Reset to "no shape"
    pub fn set_defaults(&mut self) {
        *self = Self::default();
    }

    /// Assign an axis-aligned box, given as min/max offsets from the
    /// entity location
    pub fn set_aabb(&mut self, relative: &Aabb) {
        self.shape = CollisionShape::Aabb;
        self.data1 = Vec4::new(relative.min.x, relative.min.y, relative.min.z, 0.0);
        self.data2 = Vec4::new(relative.max.x, relative.max.y, relative.max.z, 0.0);
    }

    /// Assign a sphere; only the radius is stored, the center follows
    /// the entity location
    pub fn set_sphere(&mut self, sphere: &Sphere) {
        self.shape = CollisionShape::Sphere;
        self.data1 = Vec4::new(sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius);
    }

    /// Assign an oriented box; extraction derives the cube from the
    /// entity transform, the slots only cache the authored values
    pub fn set_cube(&mut self, cube: &Cube) {
        self.shape = CollisionShape::Cube;
        self.data1 = Vec4::new(cube.center.x, cube.center.y, cube.center.z, 0.0);
        self.data2 = Vec4::new(
            cube.half_extents.x,
            cube.half_extents.y,
            cube.half_extents.z,
            0.0,
        );
    }

    /// Extract the world-space AABB
    ///
    /// # Errors
    /// [`CollisionError::ShapeMismatch`] if the stored shape is not an AABB.
    pub fn extract_aabb(&self, transform: &TransformComponent) -> Result<Aabb, CollisionError> {
        self.check_shape(CollisionShape::Aabb)?;
        let location = transform.location();
        Ok(Aabb::new(
            location + self.data1.xyz(),
            location + self.data2.xyz(),
        ))
    }

    /// Extract the world-space sphere
    ///
    /// # Errors
    /// [`CollisionError::ShapeMismatch`] if the stored shape is not a sphere.
    pub fn extract_sphere(&self, transform: &TransformComponent) -> Result<Sphere, CollisionError> {
        self.check_shape(CollisionShape::Sphere)?;
        Ok(Sphere::new(transform.location(), self.data1.w))
    }

    /// Extract the world-space oriented box: the entity's unit-cube
    /// local space placed by its transform
    ///
    /// # Errors
    /// [`CollisionError::ShapeMismatch`] if the stored shape is not a cube.
    pub fn extract_cube(&self, transform: &TransformComponent) -> Result<Cube, CollisionError> {
        self.check_shape(CollisionShape::Cube)?;
        Ok(Cube::new(
            transform.to_world_space(Vec3::repeat(0.5)),
            transform.scale * 0.5,
            transform.rotation,
        ))
    }

    /// World-space AABB enclosing whatever shape is assigned; this is
    /// what feeds the spatial index uniformly for all shapes
    ///
    /// # Errors
    /// [`CollisionError::UnsupportedShape`] if no shape is assigned.
    pub fn encapsulating_aabb(
        &self,
        transform: &TransformComponent,
    ) -> Result<Aabb, CollisionError> {
        match self.shape {
            CollisionShape::Aabb => self.extract_aabb(transform),
            CollisionShape::Sphere => Ok(self.extract_sphere(transform)?.encapsulating_aabb()),
            CollisionShape::Cube => Ok(self.extract_cube(transform)?.encapsulating_aabb()),
            CollisionShape::None => Err(CollisionError::UnsupportedShape(self.shape)),
        }
    }

    /// Whether the assigned shape contains a world-space point
    ///
    /// # Errors
    /// [`CollisionError::UnsupportedShape`] if no shape is assigned.
    pub fn contains(
        &self,
        transform: &TransformComponent,
        point: Vec3,
    ) -> Result<bool, CollisionError> {
        match self.shape {
            CollisionShape::Aabb => Ok(self.extract_aabb(transform)?.contains(point)),
            CollisionShape::Sphere => Ok(self.extract_sphere(transform)?.contains(point)),
            CollisionShape::Cube => {
                // Test in the cube's local frame
                let cube = self.extract_cube(transform)?;
                let local = cube.rotation.inverse() * (point - cube.center);
                Ok(local.x.abs() <= cube.half_extents.x
                    && local.y.abs() <= cube.half_extents.y
                    && local.z.abs() <= cube.half_extents.z)
            }
            CollisionShape::None => Err(CollisionError::UnsupportedShape(self.shape)),
        }
    }

    fn check_shape(&self, expected: CollisionShape) -> Result<(), CollisionError> {
        if self.shape == expected {
            Ok(())
        } else {
            Err(CollisionError::ShapeMismatch {
                expected,
                actual: self.shape,
            })
        }
    }
}
