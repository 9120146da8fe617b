//! Separating Axis Theorem for convex box-like bodies
//!
//! Two convex bodies do not intersect iff some axis exists on which
//! their vertex projections do not overlap. When every axis overlaps,
//! the axis with the minimum overlap toward the direction connecting
//! the body centers yields the minimum translation vector.

use crate::foundation::math::{Quat, Vec3};
use crate::physics::CollisionData;
use crate::scene::{Aabb, Cube};

/// Face normals of an axis-aligned box: the 3 axes and their negations
const AXIS_NORMALS: [Vec3; 6] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
];

/// A convex body prepared for SAT testing: its center, the 8 corner
/// vertices and the 6 candidate face normals
#[derive(Debug, Clone, Copy)]
pub struct SatBody {
    /// Body center, used to bias the per-axis overlap direction
    pub center: Vec3,
    /// Corner vertices in world space
    pub vertices: [Vec3; 8],
    /// Candidate separating axes (unit face normals)
    pub normals: [Vec3; 6],
}

impl SatBody {
    /// Build a SAT body from an axis-aligned box
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            vertices: aabb.vertices(),
            normals: AXIS_NORMALS,
        }
    }

    /// Build a SAT body from an oriented box; the candidate normals are
    /// the axis normals rotated by the cube's orientation
    #[must_use]
    pub fn from_cube(cube: &Cube) -> Self {
        let rotation: &Quat = &cube.rotation;
        Self {
            center: cube.center,
            vertices: cube.vertices(),
            normals: AXIS_NORMALS.map(|n| rotation * n),
        }
    }
}

/// Projection interval of a body's vertices onto an axis
#[derive(Debug, Clone, Copy)]
struct Projection {
    min: f32,
    max: f32,
}

impl Projection {
    fn project(body: &SatBody, normal: Vec3) -> Self {
        let mut min = normal.dot(&body.vertices[0]);
        let mut max = min;
        for vertex in &body.vertices[1..] {
            let p = normal.dot(vertex);
            if p < min {
                min = p;
            } else if p > max {
                max = p;
            }
        }
        Self { min, max }
    }

    /// Strict interval overlap: touching intervals do not intersect
    fn overlaps(&self, other: &Self) -> bool {
        other.max > self.min && other.min < self.max
    }

    /// Overlap toward the near side of the interval pair
    fn overlap(&self, other: &Self) -> f32 {
        (self.max - other.min).min(other.max - self.min)
    }

    /// Overlap toward the far side, charged to axes pointing away from
    /// the center-to-center direction so they never win the minimum
    fn max_overlap(&self, other: &Self) -> f32 {
        (self.max - other.min).max(other.max - self.min)
    }
}

/// Run the full SAT test between two bodies.
///
/// Projects both bodies on each of `body1`'s normals, then each of
/// `body2`'s, with an early exit on the first separating axis. The
/// candidate with the smaller penetration depth wins; when the
/// `body2`-axes candidate wins its normal is flipped, so the returned
/// normal always pushes `body1` out of `body2`.
#[must_use]
pub fn test(body1: &SatBody, body2: &SatBody) -> CollisionData {
    let c1 = project_normals(body1, body2);
    if !c1.intersecting {
        return c1;
    }

    let c2 = project_normals(body2, body1);
    if !c2.intersecting {
        return c2;
    }

    // Minimum translation: keep the smaller depth, ties go to body1's
    // axes to keep the normal stable for symmetric configurations
    if c2.depth < c1.depth {
        let mut result = c2;
        result.invert();
        result
    } else {
        c1
    }
}

/// Test `body1`'s candidate normals, returning the axis of minimum
/// overlap biased toward `body1`'s side.
///
/// Coincident centers leave the bias direction zero; every axis is then
/// charged its plain minimum overlap and the first stored (positive)
/// normal wins ties.
fn project_normals(body1: &SatBody, body2: &SatBody) -> CollisionData {
    let offset = body1.center - body2.center;
    let dir = offset.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);

    let mut result = CollisionData {
        normal: Vec3::zeros(),
        depth: f32::MAX,
        intersecting: true,
    };

    for normal in &body1.normals {
        let p1 = Projection::project(body1, *normal);
        let p2 = Projection::project(body2, *normal);

        if !p1.overlaps(&p2) {
            result.intersecting = false;
            return result;
        }

        let depth = if normal.dot(&dir) < 0.0 {
            p1.max_overlap(&p2)
        } else {
            p1.overlap(&p2)
        };
        if depth < result.depth {
            result.depth = depth;
            result.normal = *normal;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_aabbs(a: &Aabb, b: &Aabb) -> CollisionData {
        test(&SatBody::from_aabb(a), &SatBody::from_aabb(b))
    }

    #[test]
    fn aabb_aabb_no_overlap() {
        let a = Aabb::new(Vec3::repeat(0.0), Vec3::repeat(10.0));
        let b = Aabb::new(Vec3::repeat(10.0), Vec3::repeat(20.0));
        assert!(!test_aabbs(&a, &b).intersecting);
    }

    #[test]
    fn aabb_aabb_pos_y_overlap() {
        let a = Aabb::new(Vec3::new(0.0, 9.0, 0.0), Vec3::new(10.0, 19.0, 10.0));
        let b = Aabb::new(Vec3::repeat(0.0), Vec3::repeat(10.0));
        let data = test_aabbs(&a, &b);
        assert!(data.intersecting);
        assert_relative_eq!(data.depth, 1.0);
        assert_relative_eq!(data.normal, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn aabb_aabb_neg_y_overlap() {
        let a = Aabb::new(Vec3::new(0.0, -9.0, 0.0), Vec3::new(10.0, 1.0, 10.0));
        let b = Aabb::new(Vec3::repeat(0.0), Vec3::repeat(10.0));
        let data = test_aabbs(&a, &b);
        assert!(data.intersecting);
        assert_relative_eq!(data.depth, 1.0);
        assert_relative_eq!(data.normal, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn cube_cube_no_overlap() {
        let a = Cube::new(Vec3::repeat(0.0), Vec3::repeat(5.0), Quat::identity());
        let b = Cube::new(Vec3::repeat(10.0), Vec3::repeat(5.0), Quat::identity());
        let data = test(&SatBody::from_cube(&a), &SatBody::from_cube(&b));
        assert!(!data.intersecting);
    }

    #[test]
    fn cube_cube_overlap() {
        let a = Cube::new(Vec3::new(0.0, 9.0, 0.0), Vec3::repeat(5.0), Quat::identity());
        let b = Cube::new(Vec3::zeros(), Vec3::repeat(5.0), Quat::identity());
        let data = test(&SatBody::from_cube(&a), &SatBody::from_cube(&b));
        assert!(data.intersecting);
        assert_relative_eq!(data.depth, 1.0);
        assert_relative_eq!(data.normal, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rotated_cube_reaches_past_aligned_bounds() {
        // A 45 degree turn makes the cube's corner reach sqrt(2) along x,
        // colliding with a box an aligned unit cube would miss
        let rotation = Quat::from_axis_angle(
            &crate::foundation::math::Vector3::z_axis(),
            std::f32::consts::FRAC_PI_4,
        );
        let cube = Cube::new(Vec3::zeros(), Vec3::repeat(1.0), rotation);
        let aligned = Cube::new(Vec3::zeros(), Vec3::repeat(1.0), Quat::identity());
        let wall = Aabb::new(Vec3::new(1.2, -10.0, -10.0), Vec3::new(3.0, 10.0, 10.0));

        let hit = test(&SatBody::from_cube(&cube), &SatBody::from_aabb(&wall));
        let miss = test(&SatBody::from_cube(&aligned), &SatBody::from_aabb(&wall));
        assert!(hit.intersecting);
        assert!(!miss.intersecting);
    }

    #[test]
    fn coincident_centers_use_positive_axis_bias() {
        let a = Aabb::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0));
        let b = Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(5.0));
        let data = test_aabbs(&a, &b);
        assert!(data.intersecting);
        // Smallest overlap is along x; zero bias keeps the +x normal
        assert_relative_eq!(data.normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(data.depth, 6.0);
    }

    #[test]
    fn overlap_predicate_matches_sat() {
        // AABBAABBOverlap(a, b) must agree with SAT on a grid of boxes
        let reference = Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        for x in -3..=3 {
            for y in -3..=3 {
                let offset = Vec3::new(x as f32 * 0.8, y as f32 * 0.8, 0.0);
                let other = Aabb::new(reference.min + offset, reference.max + offset);
                assert_eq!(
                    reference.overlaps(&other),
                    test_aabbs(&reference, &other).intersecting,
                    "disagreement at offset {offset:?}"
                );
            }
        }
    }
}
