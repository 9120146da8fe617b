//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the small helpers the simulation
//! systems need.

pub use nalgebra::{Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Threshold below which a position delta counts as "did not move"
pub const EPSILON: f32 = 1e-4;

/// Project `v` onto the unit vector `onto`.
///
/// The result is the component of `v` along `onto`; subtracting it from
/// `v` removes all velocity in that direction (collision response).
#[must_use]
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    onto * v.dot(&onto)
}

/// Rotate `v` by `rotation` about `pivot` instead of the origin.
#[must_use]
pub fn rotate_around_pivot(rotation: &Quat, v: Vec3, pivot: Vec3) -> Vec3 {
    pivot + rotation * (v - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn project_onto_axis() {
        let v = Vec3::new(3.0, -2.0, 1.0);
        let p = project(v, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn rotate_around_pivot_identity_is_noop() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = rotate_around_pivot(&Quat::identity(), v, Vec3::new(5.0, 5.0, 5.0));
        assert_relative_eq!(r, v);
    }

    #[test]
    fn rotate_around_pivot_half_turn() {
        let q = Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::PI);
        let r = rotate_around_pivot(&q, Vec3::new(2.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(r, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }
}
