//! Spatial partitioning module
//!
//! Provides bounding boxes, the adaptive spatial tree over level geometry,
//! and the collision queries that run against it.

mod axis_aligned_box;
mod spatial_object;
mod spatial_tree;
mod collision_query;

pub use axis_aligned_box::AxisAlignedBox;
pub use spatial_object::{ObjectKey, ObjectSource, SpatialObject};
pub use spatial_tree::{NodeContents, SpatialNode, SpatialTree};
pub use collision_query::{brute_force_colliding_objects, colliding_objects};
