//! Compact bounding volume hierarchy
//!
//! A binary BVH over entity bounds, rebuilt from scratch every frame
//! and queried by the collision system for broad-phase candidates. The
//! layout is compact: each node stores the bounds of BOTH its children,
//! so leaves need no nodes of their own and a query never loads a node
//! just to read its bounding box.

use crate::scene::Aabb;

/// Child slot sentinel for "no child"
pub const NO_CHILD: i32 = -1;

/// One interior node.
///
/// A child slot is either [`NO_CHILD`], a non-negative index of another
/// node, or a negative leaf code carrying the entity index (see
/// [`encode_leaf`]).
#[derive(Debug, Clone, Copy)]
pub struct BvhNode {
    /// Bounds of everything under the left child
    pub left_bounds: Aabb,
    /// Bounds of everything under the right child
    pub right_bounds: Aabb,
    /// Left child slot
    pub left: i32,
    /// Right child slot
    pub right: i32,
}

/// Leaf codes start at -2 so they never collide with [`NO_CHILD`]
const fn encode_leaf(entity_index: u32) -> i32 {
    -(entity_index as i32) - 2
}

const fn decode_leaf(code: i32) -> u32 {
    (-code - 2) as u32
}

/// Bounding volume hierarchy over entity indices
#[derive(Debug, Default)]
pub struct CompactBvh {
    nodes: Vec<BvhNode>,
    root: i32,
}

impl CompactBvh {
    /// Build the hierarchy over `(entity index, bounds)` pairs.
    ///
    /// Construction is deterministic: items are split at the median of
    /// the longest centroid-extent axis, with ties broken by entity
    /// index, so the same input always yields the same tree.
    #[must_use]
    pub fn build(items: &[(u32, Aabb)]) -> Self {
        let mut bvh = Self {
            nodes: Vec::new(),
            root: NO_CHILD,
        };
        if items.is_empty() {
            return bvh;
        }

        if let [(index, bounds)] = items {
            // A lone entity still gets a root node so queries test its
            // bounds like any other leaf
            bvh.nodes.push(BvhNode {
                left_bounds: *bounds,
                right_bounds: Aabb::empty(),
                left: encode_leaf(*index),
                right: NO_CHILD,
            });
            bvh.root = 0;
            return bvh;
        }

        let mut scratch: Vec<(u32, Aabb)> = items.to_vec();
        bvh.root = bvh.build_recursive(&mut scratch);
        bvh
    }

    /// Number of interior nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy holds no entities
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root == NO_CHILD
    }

    /// Collect the indices of all entities whose bounds overlap `query`.
    ///
    /// Overlap is strict: bounds that merely touch the query box do not
    /// count, matching the narrow phase so the broad phase never
    /// forwards a pair the narrow phase would reject on contact alone.
    #[must_use]
    pub fn query(&self, query: &Aabb) -> Vec<u32> {
        let mut hits = Vec::new();
        if self.root == NO_CHILD {
            log::warn!("query against an empty hierarchy");
            return hits;
        }

        let mut stack: Vec<i32> = vec![self.root];
        while let Some(code) = stack.pop() {
            if code < 0 {
                hits.push(decode_leaf(code));
                continue;
            }
            #[allow(clippy::cast_sign_loss)]
            let node = &self.nodes[code as usize];
            if node.left != NO_CHILD && node.left_bounds.overlaps(query) {
                stack.push(node.left);
            }
            if node.right != NO_CHILD && node.right_bounds.overlaps(query) {
                stack.push(node.right);
            }
        }
        hits
    }

    fn build_recursive(&mut self, items: &mut [(u32, Aabb)]) -> i32 {
        if items.len() == 1 {
            return encode_leaf(items[0].0);
        }

        // Split at the median of the longest centroid-extent axis
        let mut centroid_bounds = Aabb::empty();
        for (_, bounds) in items.iter() {
            centroid_bounds.expand(bounds.center());
        }
        let extent = centroid_bounds.size();
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        items.sort_unstable_by(|a, b| {
            a.1.center()[axis]
                .total_cmp(&b.1.center()[axis])
                .then_with(|| a.0.cmp(&b.0))
        });
        let mid = items.len() / 2;
        let (left_items, right_items) = items.split_at_mut(mid);

        let left_bounds = enclosing_bounds(left_items);
        let right_bounds = enclosing_bounds(right_items);
        let left = self.build_recursive(left_items);
        let right = self.build_recursive(right_items);

        self.nodes.push(BvhNode {
            left_bounds,
            right_bounds,
            left,
            right,
        });
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        {
            (self.nodes.len() - 1) as i32
        }
    }
}

fn enclosing_bounds(items: &[(u32, Aabb)]) -> Aabb {
    let mut bounds = Aabb::empty();
    for (_, aabb) in items {
        bounds.expand_aabb(aabb);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn unit_box(center: Vec3) -> Aabb {
        Aabb::from_center_extents(center, Vec3::repeat(0.5))
    }

    fn sorted(mut hits: Vec<u32>) -> Vec<u32> {
        hits.sort_unstable();
        hits
    }

    // Small deterministic generator so the brute-force comparison covers
    // irregular layouts without depending on an RNG crate
    struct XorShift(u32);

    impl XorShift {
        fn next_f32(&mut self) -> f32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 17;
            self.0 ^= self.0 << 5;
            (self.0 % 1000) as f32 / 10.0 - 50.0
        }
    }

    #[test]
    fn empty_build_yields_empty_query() {
        let bvh = CompactBvh::build(&[]);
        assert!(bvh.is_empty());
        assert!(bvh.query(&unit_box(Vec3::zeros())).is_empty());
    }

    #[test]
    fn single_entity_round_trips() {
        let bvh = CompactBvh::build(&[(0, unit_box(Vec3::zeros()))]);
        assert!(!bvh.is_empty());
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.query(&unit_box(Vec3::zeros())), vec![0]);
        assert!(bvh.query(&unit_box(Vec3::repeat(30.0))).is_empty());
    }

    #[test]
    fn entity_index_zero_is_a_valid_leaf() {
        // Leaf encoding must distinguish entity 0 from the no-child
        // sentinel
        let bvh = CompactBvh::build(&[
            (0, unit_box(Vec3::zeros())),
            (1, unit_box(Vec3::new(20.0, 0.0, 0.0))),
        ]);
        assert_eq!(bvh.query(&unit_box(Vec3::zeros())), vec![0]);
    }

    #[test]
    fn disjoint_clusters_prune_each_other() {
        let items: Vec<(u32, Aabb)> = (0..8)
            .map(|i| {
                let side = if i < 4 { -100.0 } else { 100.0 };
                (i, unit_box(Vec3::new(side + i as f32 * 2.0, 0.0, 0.0)))
            })
            .collect();
        let bvh = CompactBvh::build(&items);

        let left = bvh.query(&Aabb::new(
            Vec3::new(-110.0, -5.0, -5.0),
            Vec3::new(-80.0, 5.0, 5.0),
        ));
        assert_eq!(sorted(left), vec![0, 1, 2, 3]);
    }

    #[test]
    fn touching_bounds_do_not_report() {
        let bvh = CompactBvh::build(&[
            (0, Aabb::new(Vec3::zeros(), Vec3::repeat(1.0))),
            (1, Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 1.0, 1.0))),
        ]);
        // Query box sharing only a face with entity 0
        let query = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(bvh.query(&query).is_empty());
    }

    #[test]
    fn query_matches_brute_force() {
        let mut rng = XorShift(0x1234_5678);
        let items: Vec<(u32, Aabb)> = (0..64)
            .map(|i| {
                let center = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32());
                let half = Vec3::new(
                    rng.next_f32().abs() * 0.1 + 0.5,
                    rng.next_f32().abs() * 0.1 + 0.5,
                    rng.next_f32().abs() * 0.1 + 0.5,
                );
                (i, Aabb::from_center_extents(center, half))
            })
            .collect();
        let bvh = CompactBvh::build(&items);

        for probe in 0..32 {
            let center = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32());
            let query = Aabb::from_center_extents(center, Vec3::repeat(4.0 + probe as f32 * 0.25));

            let expected: Vec<u32> = items
                .iter()
                .filter(|(_, bounds)| bounds.overlaps(&query))
                .map(|(index, _)| *index)
                .collect();
            assert_eq!(sorted(bvh.query(&query)), sorted(expected));
        }
    }

    #[test]
    fn identical_bounds_build_deterministically() {
        let items: Vec<(u32, Aabb)> = (0..5).map(|i| (i, unit_box(Vec3::zeros()))).collect();
        let a = CompactBvh::build(&items);
        let b = CompactBvh::build(&items);
        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(sorted(a.query(&unit_box(Vec3::zeros()))), vec![0, 1, 2, 3, 4]);
        assert_eq!(sorted(b.query(&unit_box(Vec3::zeros()))), vec![0, 1, 2, 3, 4]);
    }
}
