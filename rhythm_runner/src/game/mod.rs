//! Game state module
//!
//! Provides level objects, their motion, the level that indexes them, and
//! the per-tick player collision check.

mod game_object;
mod path_motion;
mod level;
mod player;
mod collision_check;

pub use game_object::{
    GameObject, GameObjectDesc, MotionDesc, Movement,
    ObjectRole, ObstacleKind,
};
pub use path_motion::PathMotion;
pub use level::Level;
pub use player::{LaneBlock, Player};
pub use collision_check::{
    check_collisions, classify_obstacle, lane_block,
    DeathCause, ObstacleContact, TickReport,
};
