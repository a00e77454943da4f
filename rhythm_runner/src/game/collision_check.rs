/// Per-tick player collision check.
///
/// Runs once per simulation tick, after the player has moved:
///
/// 1. Query the level tree with the player's current box.
/// 2. Collect every touched collectible that is still uncollected (+1 each).
/// 3. For each touched obstacle, in key order:
///    - block lane movement on Z when the obstacle sits beside the player
///      (monsters never block),
///    - classify the contact against the player's pre-movement box:
///      landing grounds the player (and triggers dropping platforms),
///      landing on a monster kills, grazing is ignored, anything else kills.
/// 4. With no obstacle touched, lane blocks are cleared.
/// 5. A pre-movement box below the kill zone kills.
///
/// The first death ends the tick.

use crate::config::CollisionConfig;
use crate::runner_debug;
use crate::spatial::{AxisAlignedBox, ObjectKey, SpatialObject};
use super::game_object::{ObjectRole, ObstacleKind};
use super::level::Level;
use super::player::{LaneBlock, Player};

/// How the player met an obstacle this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleContact {
    /// Came down on top of it
    Landing,
    /// Clipped it within the X/Z tolerances
    Grazing,
    /// Ran into it
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Hit the side of an obstacle
    SideCollision(ObjectKey),
    /// Landed on a monster
    Monster(ObjectKey),
    /// Fell below the level
    KillZone,
}

/// Everything one collision check did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Collectibles collected this tick, in key order
    pub collected: Vec<ObjectKey>,
    /// Last obstacle landed on this tick
    pub landed_on: Option<ObjectKey>,
    pub death: Option<DeathCause>,
}

/// Classify a contact from the player's pre-movement box.
///
/// Landing when the previous min Y was above the obstacle's top, or
/// within `tolerance_y + |y_velocity|` of it. Otherwise grazing when the
/// previous box was already beside the obstacle on Z or X (within the
/// tolerances), otherwise fatal.
pub fn classify_obstacle(
    previous: &AxisAlignedBox,
    obstacle: &AxisAlignedBox,
    y_velocity: f32,
    config: &CollisionConfig,
) -> ObstacleContact {
    let player_min_y = previous.min().y;
    let top = obstacle.max().y;

    if player_min_y > top || (player_min_y - top).abs() < config.tolerance_y + y_velocity.abs() {
        return ObstacleContact::Landing;
    }

    let beside_z = previous.min().z > obstacle.max().z - config.tolerance_z
        || previous.max().z < obstacle.min().z + config.tolerance_z;
    let beside_x = previous.min().x > obstacle.max().x - config.tolerance_x
        || previous.max().x < obstacle.min().x + config.tolerance_x;

    if beside_z || beside_x {
        ObstacleContact::Grazing
    } else {
        ObstacleContact::Fatal
    }
}

/// Lane the obstacle blocks, judged from the player's pre-movement box.
pub fn lane_block(previous: &AxisAlignedBox, obstacle: &AxisAlignedBox, config: &CollisionConfig) -> LaneBlock {
    if previous.min().z > obstacle.max().z - config.tolerance_z {
        LaneBlock::DOWN_Z
    } else if previous.max().z < obstacle.min().z + config.tolerance_z {
        LaneBlock::UP_Z
    } else {
        LaneBlock::empty()
    }
}

/// Run one tick's collision check for `player` against `level`.
pub fn check_collisions(player: &mut Player, level: &mut Level, config: &CollisionConfig) -> TickReport {
    let mut report = TickReport::default();
    let previous = player.previous_box();

    let mut touched: Vec<ObjectKey> = level
        .colliding_objects(&player.bounding_box())
        .into_iter()
        .collect();
    touched.sort_unstable();

    let mut obstacles: Vec<(ObjectKey, ObstacleKind, AxisAlignedBox)> = Vec::new();
    for key in touched {
        let Some(object) = level.object(key) else {
            continue;
        };
        match object.role() {
            ObjectRole::Collectible => {
                if level.collect(key) {
                    player.add_score(1);
                    report.collected.push(key);
                }
            }
            ObjectRole::Obstacle(kind) => obstacles.push((key, kind, object.bounding_box())),
            ObjectRole::Decoration => {}
        }
    }

    if obstacles.is_empty() {
        player.clear_blocks();
    }

    for (key, kind, obstacle) in obstacles {
        if kind != ObstacleKind::Monster {
            player.block(lane_block(&previous, &obstacle, config));
        }

        match classify_obstacle(&previous, &obstacle, player.y_velocity(), config) {
            ObstacleContact::Landing if kind == ObstacleKind::Monster => {
                return die(player, report, DeathCause::Monster(key));
            }
            ObstacleContact::Landing => {
                player.land(key);
                report.landed_on = Some(key);
                if kind == ObstacleKind::DroppingPlatform {
                    level.start_dropping(key);
                }
            }
            ObstacleContact::Grazing => {}
            ObstacleContact::Fatal => {
                return die(player, report, DeathCause::SideCollision(key));
            }
        }
    }

    if previous.min().y < level.kill_zone() {
        return die(player, report, DeathCause::KillZone);
    }

    report
}

fn die(player: &mut Player, mut report: TickReport, cause: DeathCause) -> TickReport {
    runner_debug!("runner::CollisionCheck", "Player died: {:?}", cause);
    player.die();
    report.death = Some(cause);
    report
}

#[cfg(test)]
#[path = "collision_check_tests.rs"]
mod tests;
