/// Collision queries against a `SpatialTree`.
///
/// The tree answers "which leaves could hold something near this box";
/// the final test always uses each object's *current* box, read from an
/// `ObjectSource`. Objects indexed under a whole-path box are therefore
/// reported only where they actually are this tick.

use std::collections::VecDeque;
use rustc_hash::FxHashSet;
use crate::runner_warn;
use super::axis_aligned_box::AxisAlignedBox;
use super::spatial_object::{ObjectKey, ObjectSource, SpatialObject};
use super::spatial_tree::{SpatialNode, SpatialTree};

/// Every indexed object whose current box overlaps `query`.
///
/// Breadth-first descent from the root. The root box itself is not tested:
/// its children are. A key stored in several leaves is reported once. Keys
/// that `objects` no longer knows are skipped with a warning.
pub fn colliding_objects<S>(
    query: &AxisAlignedBox,
    tree: &SpatialTree,
    objects: &S,
) -> FxHashSet<ObjectKey>
where
    S: ObjectSource + ?Sized,
{
    let mut collisions = FxHashSet::default();
    let mut to_visit: VecDeque<&SpatialNode> = VecDeque::new();
    to_visit.push_back(tree.root());

    while let Some(node) = to_visit.pop_front() {
        for child in node.children() {
            if child.bounding_box().overlaps(query) {
                to_visit.push_back(child);
            }
        }

        for &key in node.objects() {
            if collisions.contains(&key) {
                continue;
            }
            match objects.bounding_box_of(key) {
                Some(current) if current.overlaps(query) => {
                    collisions.insert(key);
                }
                Some(_) => {}
                None => {
                    runner_warn!(
                        "runner::CollisionQuery",
                        "Indexed object {:?} is missing from the object source",
                        key
                    );
                }
            }
        }
    }

    collisions
}

/// Reference query without a tree: tests every object.
///
/// O(n). Same result as `colliding_objects` for objects whose current box
/// lies inside their index box.
pub fn brute_force_colliding_objects<'a, O, I>(
    query: &AxisAlignedBox,
    objects: I,
) -> FxHashSet<ObjectKey>
where
    O: SpatialObject + ?Sized + 'a,
    I: IntoIterator<Item = (ObjectKey, &'a O)>,
{
    objects
        .into_iter()
        .filter(|(_, object)| object.bounding_box().overlaps(query))
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
#[path = "collision_query_tests.rs"]
mod tests;
