//! Spatial acceleration structures

mod bvh;

pub use bvh::{BvhNode, CompactBvh, NO_CHILD};
