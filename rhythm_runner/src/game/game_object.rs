//! Level objects: obstacles, collectibles and decorations.
//!
//! A `GameObject` is a shared `Shape` placed in the world by a position,
//! an axis/angle rotation and a per-axis scale. Its world-space bounding
//! box is cached and recomputed only when one of those three changes.
//!
//! # Roles
//!
//! ```text
//! ObjectRole
//! ├── Obstacle(kind)  → Platform, MovingPlatform, DroppingPlatform, Monster, Rock
//! ├── Collectible     → collected once for +1 score
//! └── Decoration      → indexed but ignored by the collision check
//! ```

use std::sync::Arc;
use glam::{Mat4, Quat, Vec3};
use crate::error::Result;
use crate::resource::{Shape, ShapeRegistry};
use crate::runner_bail;
use crate::spatial::{AxisAlignedBox, SpatialObject};
use super::path_motion::PathMotion;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// What kind of obstacle an object is, as seen by the collision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Platform,
    MovingPlatform,
    DroppingPlatform,
    Monster,
    Rock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRole {
    Obstacle(ObstacleKind),
    Collectible,
    Decoration,
}

/// How an object moves once the level is running.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionDesc {
    Static,
    /// Follow `waypoints` in order, wrapping, at `velocity` units per tick
    Path { waypoints: Vec<Vec3>, velocity: Vec3 },
    /// Fall by `velocity` units per tick once triggered
    Drop { velocity: f32 },
}

/// Object creation descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObjectDesc {
    /// Name of a shape in the `ShapeRegistry`
    pub shape: String,
    pub role: ObjectRole,
    pub position: Vec3,
    pub rotation_axis: Vec3,
    /// Radians
    pub rotation_angle: f32,
    pub scale: Vec3,
    pub motion: MotionDesc,
}

impl Default for GameObjectDesc {
    fn default() -> Self {
        Self {
            shape: String::new(),
            role: ObjectRole::Decoration,
            position: Vec3::ZERO,
            rotation_axis: Vec3::Y,
            rotation_angle: 0.0,
            scale: Vec3::ONE,
            motion: MotionDesc::Static,
        }
    }
}

// ============================================================================
// MOTION STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Motion {
    Static,
    Path(PathMotion),
    Drop {
        velocity: f32,
        dropping: bool,
        fallen: bool,
    },
}

/// What one tick of motion did to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Nothing moved
    Still,
    /// Moved inside its index box; the spatial tree needs no update
    AlongPath,
    /// Left the box it was indexed under (a dropping platform, or a path
    /// mover whose index box had to grow); must be re-indexed
    Displaced,
}

// ============================================================================
// GAME OBJECT
// ============================================================================

#[derive(Debug, Clone)]
pub struct GameObject {
    shape: Arc<Shape>,
    role: ObjectRole,
    position: Vec3,
    original_position: Vec3,
    rotation_axis: Vec3,
    rotation_angle: f32,
    scale: Vec3,
    motion: Motion,
    collected: bool,
    /// Cached world-space box for the current transform
    bounding_box: AxisAlignedBox,
    /// Whole-path box for path movers
    path_box: Option<AxisAlignedBox>,
}

impl GameObject {
    /// Create an object from a descriptor, resolving its shape by name.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the shape is not registered
    /// - `Error::InvalidInput` if position, scale, rotation or motion
    ///   parameters are not finite
    pub fn from_desc(desc: GameObjectDesc, shapes: &ShapeRegistry) -> Result<Self> {
        let shape = shapes.require(&desc.shape)?;

        let finite = desc.position.is_finite()
            && desc.scale.is_finite()
            && desc.rotation_axis.is_finite()
            && desc.rotation_angle.is_finite();
        if !finite {
            runner_bail!(
                "runner::GameObject",
                InvalidInput,
                "object '{}' has a non-finite transform",
                desc.shape
            );
        }

        let motion = match desc.motion {
            MotionDesc::Static => Motion::Static,
            MotionDesc::Path { waypoints, velocity } => {
                if !velocity.is_finite() || waypoints.iter().any(|w| !w.is_finite()) {
                    runner_bail!(
                        "runner::GameObject",
                        InvalidInput,
                        "object '{}' has a non-finite path",
                        desc.shape
                    );
                }
                Motion::Path(PathMotion::new(desc.position, waypoints, velocity))
            }
            MotionDesc::Drop { velocity } => {
                if !velocity.is_finite() {
                    runner_bail!(
                        "runner::GameObject",
                        InvalidInput,
                        "object '{}' has a non-finite drop velocity",
                        desc.shape
                    );
                }
                Motion::Drop {
                    velocity,
                    dropping: false,
                    fallen: false,
                }
            }
        };

        let mut object = Self {
            shape,
            role: desc.role,
            position: desc.position,
            original_position: desc.position,
            rotation_axis: desc.rotation_axis,
            rotation_angle: desc.rotation_angle,
            scale: desc.scale,
            motion,
            collected: false,
            bounding_box: AxisAlignedBox::from_center_radius(desc.position, Vec3::ZERO),
            path_box: None,
        };
        object.refresh_bounding_box();
        object.refresh_path_box();
        Ok(object)
    }

    // ===== ACCESSORS =====

    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    pub fn role(&self) -> ObjectRole {
        self.role
    }

    /// Obstacle kind, or `None` for collectibles and decorations
    pub fn obstacle_kind(&self) -> Option<ObstacleKind> {
        match self.role {
            ObjectRole::Obstacle(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_collectible(&self) -> bool {
        self.role == ObjectRole::Collectible
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    pub fn rotation_axis(&self) -> Vec3 {
        self.rotation_axis
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn path_motion(&self) -> Option<&PathMotion> {
        match &self.motion {
            Motion::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Rotation as a quaternion; a zero axis means no rotation.
    pub fn rotation(&self) -> Quat {
        match self.rotation_axis.try_normalize() {
            Some(axis) if self.rotation_angle != 0.0 => Quat::from_axis_angle(axis, self.rotation_angle),
            _ => Quat::IDENTITY,
        }
    }

    /// Model-to-world transform (scale, then rotation, then translation)
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.position)
    }

    // ===== TRANSFORM MUTATION =====

    /// Move the object. Callers owning a spatial tree must re-index it.
    ///
    /// A path mover heads for its current waypoint from the new spot, and
    /// its index box grows to cover where it now is.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        if let Motion::Path(path) = &mut self.motion {
            path.retarget(position);
        }
        self.refresh_bounding_box();
        self.cover_current_box();
    }

    pub fn set_rotation(&mut self, axis: Vec3, angle: f32) {
        self.rotation_axis = axis;
        self.rotation_angle = angle;
        self.refresh_bounding_box();
        self.refresh_path_box();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.refresh_bounding_box();
        self.refresh_path_box();
    }

    fn refresh_bounding_box(&mut self) {
        self.bounding_box = AxisAlignedBox::from_shape(&self.shape, &self.transform());
    }

    fn refresh_path_box(&mut self) {
        self.path_box = match &self.motion {
            Motion::Path(path) => Some(
                path.full_path_box(&self.shape, self.rotation(), self.scale)
                    .merge(&self.bounding_box),
            ),
            _ => None,
        };
    }

    /// Grow the path box to cover the current box. Returns `true` if it grew.
    fn cover_current_box(&mut self) -> bool {
        match self.path_box {
            Some(path_box) if !path_box.contains(&self.bounding_box) => {
                self.path_box = Some(path_box.merge(&self.bounding_box));
                true
            }
            _ => false,
        }
    }

    // ===== COLLECTIBLES =====

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark a collectible as collected.
    ///
    /// Returns `true` only for the call that actually collected it; later
    /// calls, and calls on non-collectibles, return `false`.
    pub fn collect(&mut self) -> bool {
        if !self.is_collectible() || self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    // ===== DROPPING PLATFORMS =====

    pub fn is_dropping(&self) -> bool {
        matches!(self.motion, Motion::Drop { dropping: true, .. })
    }

    /// Whether a dropping platform has fallen out of the level
    pub fn has_fallen(&self) -> bool {
        matches!(self.motion, Motion::Drop { fallen: true, .. })
    }

    /// Trigger a dropping platform. Returns `true` if it was not already dropping.
    pub fn start_dropping(&mut self) -> bool {
        match &mut self.motion {
            Motion::Drop { dropping, .. } if !*dropping => {
                *dropping = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn mark_fallen(&mut self) {
        if let Motion::Drop { fallen, .. } = &mut self.motion {
            *fallen = true;
        }
    }

    // ===== SIMULATION =====

    /// Run one tick of motion.
    pub fn advance(&mut self) -> Movement {
        let (position, movement) = match &mut self.motion {
            Motion::Static => return Movement::Still,
            Motion::Path(path) => (path.step(self.position), Movement::AlongPath),
            Motion::Drop { velocity, dropping: true, fallen: false } => {
                (self.position - Vec3::Y * *velocity, Movement::Displaced)
            }
            Motion::Drop { .. } => return Movement::Still,
        };

        self.position = position;
        self.refresh_bounding_box();

        // Steps with unequal per-axis speeds can overshoot the path box
        if movement == Movement::AlongPath && self.cover_current_box() {
            return Movement::Displaced;
        }
        movement
    }

    /// Restore the original position, motion and collectible state.
    pub fn reset(&mut self) {
        match &mut self.motion {
            Motion::Static => {}
            Motion::Path(path) => path.reset(),
            Motion::Drop { dropping, fallen, .. } => {
                *dropping = false;
                *fallen = false;
            }
        }
        self.collected = false;
        self.set_position(self.original_position);
    }
}

impl SpatialObject for GameObject {
    fn bounding_box(&self) -> AxisAlignedBox {
        self.bounding_box
    }

    fn index_box(&self) -> AxisAlignedBox {
        self.path_box.unwrap_or(self.bounding_box)
    }
}

#[cfg(test)]
#[path = "game_object_tests.rs"]
mod tests;
