/// Object identity and the box capabilities the spatial tree consumes.
///
/// The tree never owns objects. It stores `ObjectKey` handles and reads
/// boxes through `SpatialObject` (when indexing) and `ObjectSource` (when
/// answering queries).

use slotmap::{new_key_type, SlotMap};
use super::axis_aligned_box::AxisAlignedBox;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable identity of a game object within a level.
    ///
    /// Keys remain valid even after other objects are removed.
    /// A key becomes invalid only when its own object is removed.
    pub struct ObjectKey;
}

// ===== SPATIAL OBJECT =====

/// Anything that can be placed in a `SpatialTree`.
pub trait SpatialObject {
    /// Current world-space box (position, rotation and scale applied).
    fn bounding_box(&self) -> AxisAlignedBox;

    /// Box the tree indexes the object under.
    ///
    /// Must contain every box `bounding_box()` can return while the object
    /// stays indexed. Objects following a fixed path return the union of
    /// their boxes along the whole path, so they never need re-indexing.
    fn index_box(&self) -> AxisAlignedBox {
        self.bounding_box()
    }
}

impl SpatialObject for AxisAlignedBox {
    fn bounding_box(&self) -> AxisAlignedBox {
        *self
    }
}

// ===== OBJECT SOURCE =====

/// Key-to-box lookup used by collision queries to read current boxes.
pub trait ObjectSource {
    /// Current box of `key`, or `None` if the key is unknown.
    fn bounding_box_of(&self, key: ObjectKey) -> Option<AxisAlignedBox>;
}

impl<O: SpatialObject> ObjectSource for SlotMap<ObjectKey, O> {
    fn bounding_box_of(&self, key: ObjectKey) -> Option<AxisAlignedBox> {
        self.get(key).map(SpatialObject::bounding_box)
    }
}
