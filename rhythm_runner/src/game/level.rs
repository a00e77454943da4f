/// Level — the objects of one running level and the spatial tree over them.
///
/// The level is the single owner of its objects. Every change that moves
/// an object outside its index box goes through a level method, so the
/// tree and the object store never disagree about what is indexed.

use glam::Vec3;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::config::SpatialConfig;
use crate::error::Result;
use crate::spatial::{self, AxisAlignedBox, ObjectKey, SpatialObject, SpatialTree};
use crate::{runner_debug, runner_info};
use super::game_object::{GameObject, Movement};

pub struct Level {
    objects: SlotMap<ObjectKey, GameObject>,
    tree: SpatialTree,
}

impl Level {
    /// Create a level and bulk-build its spatial tree.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if `objects` is empty.
    pub fn new(config: &SpatialConfig, objects: Vec<GameObject>) -> Result<Self> {
        let mut store = SlotMap::with_capacity_and_key(objects.len());
        for object in objects {
            store.insert(object);
        }

        let tree = SpatialTree::build(config, store.iter())?;

        runner_info!(
            "runner::Level",
            "Level loaded: {} objects, kill zone at y = {}",
            store.len(),
            tree.kill_zone()
        );

        Ok(Self {
            objects: store,
            tree,
        })
    }

    // ===== ACCESSORS =====

    pub fn object(&self, key: ObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &GameObject)> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    /// Y below which the player dies, fixed when the level was built
    pub fn kill_zone(&self) -> f32 {
        self.tree.kill_zone()
    }

    /// Objects whose current box overlaps `query`.
    pub fn colliding_objects(&self, query: &AxisAlignedBox) -> FxHashSet<ObjectKey> {
        spatial::colliding_objects(query, &self.tree, &self.objects)
    }

    // ===== OBJECT LIFECYCLE =====

    /// Add an object to the running level and index it.
    pub fn spawn(&mut self, object: GameObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.tree.insert(key, &self.objects[key]);
        key
    }

    /// Remove an object from the level and the tree.
    pub fn despawn(&mut self, key: ObjectKey) -> Option<GameObject> {
        self.tree.remove(key);
        self.objects.remove(key)
    }

    /// Teleport an object and re-index it. Returns `false` for unknown keys.
    pub fn set_position(&mut self, key: ObjectKey, position: Vec3) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            return false;
        };
        object.set_position(position);
        if self.tree.contains(key) {
            self.tree.insert(key, &*object);
        }
        true
    }

    /// Mark a collectible as collected (see `GameObject::collect`).
    pub fn collect(&mut self, key: ObjectKey) -> bool {
        self.objects.get_mut(key).is_some_and(GameObject::collect)
    }

    /// Trigger a dropping platform (see `GameObject::start_dropping`).
    pub fn start_dropping(&mut self, key: ObjectKey) -> bool {
        let started = self.objects.get_mut(key).is_some_and(GameObject::start_dropping);
        if started {
            runner_debug!("runner::Level", "Platform {:?} starts dropping", key);
        }
        started
    }

    // ===== SIMULATION =====

    /// Advance every object by one tick.
    ///
    /// Path movers are re-indexed only when a step leaves their index box.
    /// Dropping platforms are re-indexed after each step, and leave the tree
    /// for good once entirely below the kill zone.
    pub fn update(&mut self) {
        let kill_zone = self.tree.kill_zone();

        for (key, object) in self.objects.iter_mut() {
            if object.advance() != Movement::Displaced {
                continue;
            }

            if object.is_dropping() && object.bounding_box().max().y < kill_zone {
                object.mark_fallen();
                self.tree.remove(key);
                runner_debug!("runner::Level", "Platform {:?} fell out of the level", key);
            } else {
                self.tree.insert(key, &*object);
            }
        }
    }

    /// Put every object back in its starting state and re-index what moved.
    pub fn reset(&mut self) {
        for (key, object) in self.objects.iter_mut() {
            object.reset();
            if self.tree.indexed_box(key) != Some(object.index_box()) {
                self.tree.insert(key, &*object);
            }
        }
        runner_debug!("runner::Level", "Level reset ({} objects)", self.objects.len());
    }
}

#[cfg(test)]
#[path = "level_tests.rs"]
mod tests;
