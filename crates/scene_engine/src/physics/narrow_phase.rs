//! Shape-pair intersection tests
//!
//! Box-like pairings go through the SAT machinery; anything involving a
//! sphere uses a closed-form shortcut. [`check_intersection`] dispatches
//! on the shape pair by sorting its operands along the
//! [`CollisionShape`] ranking, so only the six ordered pairings need
//! distinct implementations.

use crate::ecs::components::{CollisionComponent, CollisionShape, TransformComponent};
use crate::error::CollisionError;
use crate::foundation::math::Vec3;
use crate::physics::sat::{self, SatBody};
use crate::physics::CollisionData;
use crate::scene::{Aabb, Cube, Sphere};

/// Test two entities' collision shapes against each other.
///
/// The returned normal pushes the first entity out of the second,
/// regardless of the shape pair or the internal dispatch order.
///
/// # Errors
/// [`CollisionError::UnsupportedShape`] when either entity has no shape
/// assigned; shape extraction errors propagate unchanged.
pub fn check_intersection(
    collision1: &CollisionComponent,
    transform1: &TransformComponent,
    collision2: &CollisionComponent,
    transform2: &TransformComponent,
) -> Result<CollisionData, CollisionError> {
    if collision1.shape == CollisionShape::None {
        return Err(CollisionError::UnsupportedShape(collision1.shape));
    }
    if collision2.shape == CollisionShape::None {
        return Err(CollisionError::UnsupportedShape(collision2.shape));
    }

    // Order the pair by shape ranking; flip the result back at the end
    // when the operands were swapped
    let swapped = collision2.shape < collision1.shape;
    let (lo, lo_t, hi, hi_t) = if swapped {
        (collision2, transform2, collision1, transform1)
    } else {
        (collision1, transform1, collision2, transform2)
    };

    let mut data = match (lo.shape, hi.shape) {
        (CollisionShape::Aabb, CollisionShape::Aabb) => sat::test(
            &SatBody::from_aabb(&lo.extract_aabb(lo_t)?),
            &SatBody::from_aabb(&hi.extract_aabb(hi_t)?),
        ),
        (CollisionShape::Aabb, CollisionShape::Cube) => sat::test(
            &SatBody::from_aabb(&lo.extract_aabb(lo_t)?),
            &SatBody::from_cube(&hi.extract_cube(hi_t)?),
        ),
        (CollisionShape::Cube, CollisionShape::Cube) => sat::test(
            &SatBody::from_cube(&lo.extract_cube(lo_t)?),
            &SatBody::from_cube(&hi.extract_cube(hi_t)?),
        ),
        (CollisionShape::Aabb, CollisionShape::Sphere) => {
            // The shortcut pushes the sphere out; here the sphere is the
            // second operand, so flip toward the box
            let mut data = sphere_aabb(&hi.extract_sphere(hi_t)?, &lo.extract_aabb(lo_t)?);
            data.invert();
            data
        }
        (CollisionShape::Cube, CollisionShape::Sphere) => {
            let mut data = sphere_cube(&hi.extract_sphere(hi_t)?, &lo.extract_cube(lo_t)?);
            data.invert();
            data
        }
        (CollisionShape::Sphere, CollisionShape::Sphere) => {
            sphere_sphere(&lo.extract_sphere(lo_t)?, &hi.extract_sphere(hi_t)?)
        }
        _ => unreachable!("operands are sorted and None was rejected above"),
    };

    if swapped {
        data.invert();
    }
    Ok(data)
}

/// Sphere versus sphere; the normal pushes `sphere1` out of `sphere2`
#[must_use]
pub fn sphere_sphere(sphere1: &Sphere, sphere2: &Sphere) -> CollisionData {
    let offset = sphere1.center - sphere2.center;
    let distance = offset.norm();
    if distance >= sphere1.radius + sphere2.radius {
        return CollisionData::default();
    }

    // Coincident centers have no direction; fall back to +x
    let normal = offset
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(|| Vec3::new(1.0, 0.0, 0.0));
    CollisionData {
        normal,
        depth: sphere1.radius + sphere2.radius - distance,
        intersecting: true,
    }
}

/// Sphere versus axis-aligned box; the normal pushes the sphere out
#[must_use]
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> CollisionData {
    let closest = Vec3::new(
        sphere.center.x.clamp(aabb.min.x, aabb.max.x),
        sphere.center.y.clamp(aabb.min.y, aabb.max.y),
        sphere.center.z.clamp(aabb.min.z, aabb.max.z),
    );
    let offset = sphere.center - closest;
    let distance = offset.norm();
    if distance >= sphere.radius {
        return CollisionData::default();
    }

    // A center inside the box clamps to itself; push out toward the
    // sphere center from the box center instead
    let normal = offset.try_normalize(f32::EPSILON).unwrap_or_else(|| {
        (sphere.center - aabb.center())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(1.0, 0.0, 0.0))
    });
    CollisionData {
        normal,
        depth: sphere.radius - distance,
        intersecting: true,
    }
}

/// Sphere versus oriented box; the normal pushes the sphere out.
///
/// The test runs in the cube's local frame: the sphere center is
/// rotated into it, clamped against the half-extents and the resulting
/// push-out direction rotated back to world space.
#[must_use]
pub fn sphere_cube(sphere: &Sphere, cube: &Cube) -> CollisionData {
    let local = cube.rotation.inverse() * (sphere.center - cube.center);
    let closest = Vec3::new(
        local.x.clamp(-cube.half_extents.x, cube.half_extents.x),
        local.y.clamp(-cube.half_extents.y, cube.half_extents.y),
        local.z.clamp(-cube.half_extents.z, cube.half_extents.z),
    );
    let offset = local - closest;
    let distance = offset.norm();
    if distance >= sphere.radius {
        return CollisionData::default();
    }

    let local_normal = offset.try_normalize(f32::EPSILON).unwrap_or_else(|| {
        local
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(1.0, 0.0, 0.0))
    });
    CollisionData {
        normal: cube.rotation * local_normal,
        depth: sphere.radius - distance,
        intersecting: true,
    }
}
