//! Player state read and written by the per-tick collision check.

use bitflags::bitflags;
use glam::Vec3;
use crate::spatial::{AxisAlignedBox, ObjectKey};

bitflags! {
    /// Lane directions the player currently may not move in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LaneBlock: u8 {
        /// Blocked from moving toward +Z
        const UP_Z = 1 << 0;
        /// Blocked from moving toward -Z
        const DOWN_Z = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    bounding_box: AxisAlignedBox,
    /// Box at the start of the current tick, before movement
    previous_box: AxisAlignedBox,
    /// Vertical speed in units per tick, negative while falling
    y_velocity: f32,
    ground: Option<ObjectKey>,
    blocked: LaneBlock,
    score: u32,
    alive: bool,
}

impl Player {
    pub fn new(bounding_box: AxisAlignedBox) -> Self {
        Self {
            bounding_box,
            previous_box: bounding_box,
            y_velocity: 0.0,
            ground: None,
            blocked: LaneBlock::empty(),
            score: 0,
            alive: true,
        }
    }

    pub fn bounding_box(&self) -> AxisAlignedBox {
        self.bounding_box
    }

    pub fn previous_box(&self) -> AxisAlignedBox {
        self.previous_box
    }

    pub fn y_velocity(&self) -> f32 {
        self.y_velocity
    }

    pub fn ground(&self) -> Option<ObjectKey> {
        self.ground
    }

    pub fn blocked(&self) -> LaneBlock {
        self.blocked
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Remember the current box as the pre-movement box for this tick.
    pub fn begin_tick(&mut self) {
        self.previous_box = self.bounding_box;
    }

    pub fn set_y_velocity(&mut self, y_velocity: f32) {
        self.y_velocity = y_velocity;
    }

    /// Shift the player's box by `offset`.
    pub fn move_by(&mut self, offset: Vec3) {
        self.bounding_box = self.bounding_box.translated(offset);
    }

    pub fn set_bounding_box(&mut self, bounding_box: AxisAlignedBox) {
        self.bounding_box = bounding_box;
    }

    /// Stand on `ground`; vertical motion stops.
    pub fn land(&mut self, ground: ObjectKey) {
        self.ground = Some(ground);
        self.y_velocity = 0.0;
    }

    pub fn leave_ground(&mut self) {
        self.ground = None;
    }

    pub fn block(&mut self, lanes: LaneBlock) {
        self.blocked |= lanes;
    }

    pub fn clear_blocks(&mut self) {
        self.blocked = LaneBlock::empty();
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn die(&mut self) {
        self.alive = false;
    }
}
