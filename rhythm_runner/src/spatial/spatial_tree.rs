/// SpatialTree — adaptive bounding-volume tree over level geometry.
///
/// Bulk construction subdivides the object set around box centers
/// (octants or quadrants), creating one child per non-empty region. An
/// object whose box straddles region boundaries goes into every region it
/// overlaps, so the same key may sit in several leaves.
///
/// Incremental maintenance is lazy:
/// - `insert` grows every box on the way down and splits a full leaf into
///   two children (old contents, new object). No rebalancing.
/// - `remove` deletes the key from every leaf it reached and detaches
///   emptied leaves, but never shrinks ancestor boxes. Stale boxes only
///   cost extra descent during queries; `rebuild` restores tight boxes.
///
/// Every node's box contains the index boxes of everything below it.

use std::fmt;
use rustc_hash::FxHashMap;
use crate::config::SpatialConfig;
use crate::error::Result;
use crate::{runner_bail, runner_debug, runner_trace};
use super::axis_aligned_box::AxisAlignedBox;
use super::spatial_object::{ObjectKey, SpatialObject};

/// What a node holds: objects (leaf) or child nodes (interior).
///
/// Interior nodes always have at least one child; a node that loses its
/// last child turns back into an empty leaf.
#[derive(Debug)]
pub enum NodeContents {
    Leaf(Vec<ObjectKey>),
    Interior(Vec<SpatialNode>),
}

/// A single node in the tree. Children are owned exclusively by their parent.
#[derive(Debug)]
pub struct SpatialNode {
    bounding_box: AxisAlignedBox,
    contents: NodeContents,
}

impl SpatialNode {
    fn leaf(bounding_box: AxisAlignedBox, objects: Vec<ObjectKey>) -> Self {
        Self {
            bounding_box,
            contents: NodeContents::Leaf(objects),
        }
    }

    /// Box covering everything below this node (may be stale after removals)
    pub fn bounding_box(&self) -> AxisAlignedBox {
        self.bounding_box
    }

    pub fn contents(&self) -> &NodeContents {
        &self.contents
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.contents, NodeContents::Leaf(_))
    }

    /// Objects held by this node (empty for interior nodes)
    pub fn objects(&self) -> &[ObjectKey] {
        match &self.contents {
            NodeContents::Leaf(objects) => objects,
            NodeContents::Interior(_) => &[],
        }
    }

    /// Children of this node (empty for leaves)
    pub fn children(&self) -> &[SpatialNode] {
        match &self.contents {
            NodeContents::Leaf(_) => &[],
            NodeContents::Interior(children) => children,
        }
    }

    /// Number of levels in this subtree (a lone leaf is 1)
    fn depth(&self) -> usize {
        1 + self.children().iter().map(SpatialNode::depth).max().unwrap_or(0)
    }

    /// (node count, leaf count) of this subtree
    fn counts(&self) -> (usize, usize) {
        match &self.contents {
            NodeContents::Leaf(_) => (1, 1),
            NodeContents::Interior(children) => children
                .iter()
                .map(SpatialNode::counts)
                .fold((1, 0), |(nodes, leaves), (n, l)| (nodes + n, leaves + l)),
        }
    }
}

/// Spatial index over object keys.
///
/// Holds non-owning handles only: despawning an object from the game
/// requires an explicit `remove`, or its key stays in the leaves.
#[derive(Debug)]
pub struct SpatialTree {
    root: SpatialNode,
    /// Flat mirror of every indexed key, one entry per key
    all_objects: Vec<ObjectKey>,
    /// Index box each key was inserted with, used to route removals
    indexed: FxHashMap<ObjectKey, AxisAlignedBox>,
    /// Root min Y at construction time; never updated afterwards
    kill_zone: f32,
    config: SpatialConfig,
}

impl SpatialTree {
    /// Build a tree from an initial object set.
    ///
    /// Each object is indexed under its `index_box()`. A key listed twice is
    /// indexed once, with its first box.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `objects` is empty: the root box and the
    /// kill zone are undefined without geometry.
    pub fn build<'a, O, I>(config: &SpatialConfig, objects: I) -> Result<Self>
    where
        O: SpatialObject + ?Sized + 'a,
        I: IntoIterator<Item = (ObjectKey, &'a O)>,
    {
        let mut indexed = FxHashMap::default();
        let mut entries = Vec::new();
        for (key, object) in objects {
            let index_box = object.index_box();
            if !indexed.contains_key(&key) {
                indexed.insert(key, index_box);
                entries.push((key, index_box));
            }
        }

        if entries.is_empty() {
            runner_bail!(
                "runner::SpatialTree",
                InvalidInput,
                "cannot build a spatial tree from an empty object set"
            );
        }

        let all_objects = entries.iter().map(|&(key, _)| key).collect();
        let root = Self::build_node(entries, 0, config);
        let kill_zone = root.bounding_box.min().y;

        let tree = Self {
            root,
            all_objects,
            indexed,
            kill_zone,
            config: *config,
        };

        runner_debug!(
            "runner::SpatialTree",
            "Built tree: {} objects, {} nodes, {} leaves, depth {}, kill zone {}",
            tree.len(),
            tree.node_count(),
            tree.leaf_count(),
            tree.depth(),
            tree.kill_zone
        );

        Ok(tree)
    }

    /// Recursively subdivide `entries` (never empty) into a subtree.
    fn build_node(
        entries: Vec<(ObjectKey, AxisAlignedBox)>,
        depth: u32,
        config: &SpatialConfig,
    ) -> SpatialNode {
        let Some(bounding_box) = entries
            .iter()
            .map(|(_, b)| *b)
            .reduce(|acc, b| acc.merge(&b))
        else {
            unreachable!("spatial tree nodes are never built from an empty bucket");
        };

        if entries.len() <= config.objects_per_leaf || depth >= config.max_depth {
            return SpatialNode::leaf(bounding_box, entries.into_iter().map(|(key, _)| key).collect());
        }

        let buckets: Vec<Vec<(ObjectKey, AxisAlignedBox)>> = bounding_box
            .split(config.subdivision)
            .iter()
            .map(|region| {
                entries
                    .iter()
                    .filter(|(_, b)| region.overlaps(b))
                    .copied()
                    .collect::<Vec<_>>()
            })
            .filter(|bucket| !bucket.is_empty())
            .collect();

        // A bucket holding every object would repeat this node forever
        if buckets.iter().any(|bucket| bucket.len() == entries.len()) {
            runner_trace!(
                "runner::SpatialTree",
                "Split of {} objects at depth {} made no progress, keeping an oversized leaf",
                entries.len(),
                depth
            );
            return SpatialNode::leaf(bounding_box, entries.into_iter().map(|(key, _)| key).collect());
        }

        let children = buckets
            .into_iter()
            .map(|bucket| Self::build_node(bucket, depth + 1, config))
            .collect();

        SpatialNode {
            bounding_box,
            contents: NodeContents::Interior(children),
        }
    }

    // ===== INCREMENTAL MAINTENANCE =====

    /// Index `object` under `key`.
    ///
    /// A key that is already indexed is removed first, so this also serves
    /// as "update after the object's index box changed".
    pub fn insert(&mut self, key: ObjectKey, object: &dyn SpatialObject) {
        if self.indexed.contains_key(&key) {
            self.remove(key);
        }

        let index_box = object.index_box();
        Self::insert_into(&mut self.root, key, &index_box, 0, &self.config);
        self.all_objects.push(key);
        self.indexed.insert(key, index_box);

        runner_trace!("runner::SpatialTree", "Inserted {:?} under {}", key, index_box);
    }

    /// Grow `node` to cover `index_box` and place the key below it.
    fn insert_into(
        node: &mut SpatialNode,
        key: ObjectKey,
        index_box: &AxisAlignedBox,
        depth: u32,
        config: &SpatialConfig,
    ) {
        let old_box = node.bounding_box;
        node.bounding_box = old_box.merge(index_box);

        let replacement = match &mut node.contents {
            NodeContents::Interior(children) => {
                let mut placed = false;
                for child in children.iter_mut() {
                    if child.bounding_box.overlaps(index_box) {
                        Self::insert_into(child, key, index_box, depth + 1, config);
                        placed = true;
                    }
                }

                if !placed {
                    // Forced placement: nearest child, first one wins ties
                    let nearest = children
                        .iter_mut()
                        .min_by(|a, b| {
                            a.bounding_box
                                .distance(index_box)
                                .total_cmp(&b.bounding_box.distance(index_box))
                        });
                    match nearest {
                        Some(child) => Self::insert_into(child, key, index_box, depth + 1, config),
                        None => unreachable!("interior spatial node without children"),
                    }
                }
                None
            }
            NodeContents::Leaf(objects) => {
                if objects.len() < config.objects_per_leaf || depth >= config.max_depth {
                    objects.push(key);
                    None
                } else {
                    let existing = SpatialNode::leaf(old_box, std::mem::take(objects));
                    let added = SpatialNode::leaf(*index_box, vec![key]);
                    Some(NodeContents::Interior(vec![existing, added]))
                }
            }
        };

        if let Some(contents) = replacement {
            node.contents = contents;
        }
    }

    /// Remove `key` from the tree.
    ///
    /// Returns `false` (and changes nothing) if the key is not indexed.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let Some(index_box) = self.indexed.remove(&key) else {
            return false;
        };

        Self::remove_from(&mut self.root, key, &index_box);

        if let Some(pos) = self.all_objects.iter().position(|&k| k == key) {
            self.all_objects.swap_remove(pos);
        }

        runner_trace!("runner::SpatialTree", "Removed {:?}", key);
        true
    }

    /// Remove `key` from every leaf below `node` that `index_box` reaches.
    ///
    /// Returns `true` if `node` ended up as an empty leaf.
    fn remove_from(node: &mut SpatialNode, key: ObjectKey, index_box: &AxisAlignedBox) -> bool {
        let emptied = match &mut node.contents {
            NodeContents::Leaf(objects) => {
                while let Some(pos) = objects.iter().position(|&k| k == key) {
                    objects.swap_remove(pos);
                }
                return objects.is_empty();
            }
            NodeContents::Interior(children) => {
                children.retain_mut(|child| {
                    !(child.bounding_box.overlaps(index_box)
                        && Self::remove_from(child, key, index_box))
                });
                children.is_empty()
            }
        };

        if emptied {
            node.contents = NodeContents::Leaf(Vec::new());
        }
        emptied
    }

    /// Rebuild the whole tree from the stored index boxes.
    ///
    /// Gives tight boxes again after many removals. The kill zone keeps the
    /// value computed when the tree was first built.
    pub fn rebuild(&mut self) {
        let entries: Vec<(ObjectKey, AxisAlignedBox)> = self
            .all_objects
            .iter()
            .filter_map(|key| self.indexed.get(key).map(|b| (*key, *b)))
            .collect();

        self.root = if entries.is_empty() {
            SpatialNode::leaf(self.root.bounding_box, Vec::new())
        } else {
            Self::build_node(entries, 0, &self.config)
        };

        runner_debug!(
            "runner::SpatialTree",
            "Rebuilt tree: {} objects, {} nodes, depth {}",
            self.len(),
            self.node_count(),
            self.depth()
        );
    }

    // ===== ACCESSORS =====

    pub fn root(&self) -> &SpatialNode {
        &self.root
    }

    /// Fixed death floor: the root's minimum Y when the tree was built.
    pub fn kill_zone(&self) -> f32 {
        self.kill_zone
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Every indexed key, in no particular order.
    pub fn objects(&self) -> &[ObjectKey] {
        &self.all_objects
    }

    pub fn len(&self) -> usize {
        self.all_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_objects.is_empty()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.indexed.contains_key(&key)
    }

    /// Box `key` is currently indexed under.
    pub fn indexed_box(&self, key: ObjectKey) -> Option<AxisAlignedBox> {
        self.indexed.get(&key).copied()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.counts().0
    }

    pub fn leaf_count(&self) -> usize {
        self.root.counts().1
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &SpatialNode, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match &node.contents {
            NodeContents::Leaf(objects) => {
                writeln!(f, "{}leaf {} ({} objects)", pad, node.bounding_box, objects.len())?;
                for key in objects {
                    match self.indexed.get(key) {
                        Some(b) => writeln!(f, "{}  {:?}: {}", pad, key, b)?,
                        None => writeln!(f, "{}  {:?}: <not indexed>", pad, key)?,
                    }
                }
            }
            NodeContents::Interior(children) => {
                writeln!(f, "{}node {} ({} children)", pad, node.bounding_box, children.len())?;
                for child in children {
                    self.write_node(f, child, indent + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SpatialTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, &self.root, 0)
    }
}

#[cfg(test)]
#[path = "spatial_tree_tests.rs"]
mod tests;
