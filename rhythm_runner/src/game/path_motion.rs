/// Waypoint following for moving platforms and monsters.
///
/// The object heads for one waypoint at a time along a unit movement
/// vector scaled per axis by its velocity. As soon as a step carries it
/// farther from the current waypoint than it was, it has passed the
/// waypoint: the next one (wrapping to the first) becomes the goal.

use glam::{Quat, Vec3, Mat4};
use crate::resource::Shape;
use crate::spatial::AxisAlignedBox;

#[derive(Debug, Clone, PartialEq)]
pub struct PathMotion {
    original_position: Vec3,
    waypoints: Vec<Vec3>,
    /// Per-axis speed in world units per tick
    velocity: Vec3,
    current: usize,
    movement: Vec3,
}

impl PathMotion {
    pub fn new(original_position: Vec3, waypoints: Vec<Vec3>, velocity: Vec3) -> Self {
        let movement = waypoints
            .first()
            .map(|goal| movement_toward(*goal, original_position))
            .unwrap_or(Vec3::ZERO);
        Self {
            original_position,
            waypoints,
            velocity,
            current: 0,
            movement,
        }
    }

    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Index of the waypoint currently being approached
    pub fn current_waypoint(&self) -> usize {
        self.current
    }

    /// Unit direction of travel (zero when there is nowhere to go)
    pub fn movement(&self) -> Vec3 {
        self.movement
    }

    /// Position after one tick starting from `position`.
    pub fn step(&mut self, position: Vec3) -> Vec3 {
        // Sitting on the goal: move on to the next one
        if self.movement == Vec3::ZERO && self.waypoints.len() > 1 {
            self.advance_from(position);
        }

        let next = position + self.movement * self.velocity;

        if let Some(goal) = self.waypoints.get(self.current) {
            if goal.distance(next) > goal.distance(position) {
                self.advance_from(next);
            }
        }

        next
    }

    fn advance_from(&mut self, position: Vec3) {
        self.current = (self.current + 1) % self.waypoints.len();
        self.movement = movement_toward(self.waypoints[self.current], position);
    }

    /// Head for the current waypoint from `position`, e.g. after a teleport.
    pub fn retarget(&mut self, position: Vec3) {
        if let Some(goal) = self.waypoints.get(self.current) {
            self.movement = movement_toward(*goal, position);
        }
    }

    /// Back to the first waypoint, heading out from the original position.
    pub fn reset(&mut self) {
        self.current = 0;
        self.movement = self
            .waypoints
            .first()
            .map(|goal| movement_toward(*goal, self.original_position))
            .unwrap_or(Vec3::ZERO);
    }

    /// Union of the shape's boxes at the original position and at every
    /// waypoint, grown by two steps on each axis.
    ///
    /// A waypoint is only noticed after it has been passed, which can take
    /// the object up to one and a half steps beyond it. With the same speed
    /// on every axis that bounds the whole path. Unequal speeds bend the
    /// heading away from the goal and can carry the object further out;
    /// `GameObject::advance` grows the box when that happens.
    pub fn full_path_box(&self, shape: &Shape, rotation: Quat, scale: Vec3) -> AxisAlignedBox {
        let box_at = |position: Vec3| {
            let transform = Mat4::from_scale_rotation_translation(scale, rotation, position);
            AxisAlignedBox::from_shape(shape, &transform)
        };

        let stops = self
            .waypoints
            .iter()
            .fold(box_at(self.original_position), |acc, waypoint| acc.merge(&box_at(*waypoint)));

        if self.waypoints.is_empty() {
            return stops;
        }
        let overshoot = self.velocity.abs() * 2.0;
        AxisAlignedBox::new(stops.min() - overshoot, stops.max() + overshoot)
    }
}

/// Unit vector from `start` to `goal`, zero if they coincide.
fn movement_toward(goal: Vec3, start: Vec3) -> Vec3 {
    (goal - start).normalize_or_zero()
}

#[cfg(test)]
#[path = "path_motion_tests.rs"]
mod tests;
