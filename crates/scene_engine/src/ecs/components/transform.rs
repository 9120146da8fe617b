//! Transform component

use crate::foundation::math::{rotate_around_pivot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial placement of an entity: position, pivot, scale and rotation.
///
/// The pivot is the rotation/scale origin expressed as an offset from
/// the position; entity shapes are authored in a unit-sized local space
/// so the default pivot sits at its center. Scale components should
/// remain non-negative for meaningful geometry (not enforced).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    /// World-space position
    pub position: Vec3,
    /// Rotation/scale origin, as an offset from `position`
    pub pivot: Vec3,
    /// Scale factors
    pub scale: Vec3,
    /// Rotation quaternion
    pub rotation: Quat,
    /// Position at the start of the last physics step, used by the
    /// collision sweep; not part of the serialized state
    #[serde(skip)]
    pub previous_position: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            pivot: Vec3::repeat(0.5),
            scale: Vec3::repeat(1.0),
            rotation: Quat::identity(),
            previous_position: Vec3::zeros(),
        }
    }
}

impl TransformComponent {
    /// Create a transform at `position` with default pivot and scale
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World-space location of the pivot
    #[must_use]
    pub fn location(&self) -> Vec3 {
        self.position + self.pivot
    }

    /// Move the entity so its pivot lands on `location`
    pub fn set_location(&mut self, location: Vec3) {
        self.position = location - self.pivot;
    }

    /// Map a local-space point to world space: scale, rotate about the
    /// pivot, then translate
    #[must_use]
    pub fn to_world_space(&self, point: Vec3) -> Vec3 {
        let scaled = point.component_mul(&self.scale);
        rotate_around_pivot(&self.rotation, scaled, self.pivot) + self.position
    }

    /// Reset to identity placement
    pub fn set_defaults(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn location_is_position_plus_pivot() {
        let transform = TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(transform.location(), Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn set_location_round_trips() {
        let mut transform = TransformComponent::default();
        transform.set_location(Vec3::new(4.0, 5.0, 6.0));
        assert_relative_eq!(transform.location(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn to_world_space_applies_scale_then_translation() {
        let mut transform = TransformComponent::from_position(Vec3::new(10.0, 0.0, 0.0));
        transform.scale = Vec3::repeat(2.0);
        transform.pivot = Vec3::zeros();
        let world = transform.to_world_space(Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(world, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn to_world_space_rotates_about_pivot() {
        let mut transform = TransformComponent::default();
        transform.pivot = Vec3::repeat(0.5);
        transform.rotation = Quat::from_axis_angle(
            &crate::foundation::math::Vector3::z_axis(),
            std::f32::consts::PI,
        );
        // A half turn about the center of the unit cube maps its min
        // corner onto its max corner in xy
        let world = transform.to_world_space(Vec3::zeros());
        assert_relative_eq!(world, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }
}
