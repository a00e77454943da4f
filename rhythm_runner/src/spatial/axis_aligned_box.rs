/// AxisAlignedBox — world-space bounding box value type.
///
/// Corners are normalized on construction, so `min <= max` holds on every
/// axis no matter which order the caller passes them in. Boxes are never
/// edited in place: every operation returns a new box.

use std::fmt;
use glam::{Mat4, Vec3};
use crate::config::Subdivision;
use crate::error::Result;
use crate::resource::Shape;
use crate::runner_bail;

/// Axis-aligned bounding box with component-wise `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    min: Vec3,
    max: Vec3,
}

impl AxisAlignedBox {
    /// Create a box spanning two opposite corners, in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box extending `radius` from `center` on each axis.
    ///
    /// Negative radii are accepted; the corners are normalized like `new`.
    pub fn from_center_radius(center: Vec3, radius: Vec3) -> Self {
        Self::new(center + radius, center - radius)
    }

    /// Box around a flat xyz position buffer after applying `transform`.
    ///
    /// Every vertex is projected; the cost is linear in the vertex count,
    /// so callers should cache the result while the transform is unchanged.
    pub fn from_positions(positions: &[f32], transform: &Mat4) -> Result<Self> {
        if positions.is_empty() {
            runner_bail!("runner::AxisAlignedBox", InvalidGeometry, "position buffer is empty");
        }
        if positions.len() % 3 != 0 {
            runner_bail!(
                "runner::AxisAlignedBox",
                InvalidGeometry,
                "position buffer length {} is not a multiple of 3",
                positions.len()
            );
        }
        if positions.iter().any(|p| !p.is_finite()) {
            runner_bail!("runner::AxisAlignedBox", InvalidGeometry, "position buffer contains non-finite values");
        }

        let points = positions
            .chunks_exact(3)
            .map(|p| transform.transform_point3(Vec3::new(p[0], p[1], p[2])));
        Ok(Self::enclosing(points, transform))
    }

    /// Box around a shape's vertices after applying `transform`.
    pub fn from_shape(shape: &Shape, transform: &Mat4) -> Self {
        let points = shape.vertices().map(|v| transform.transform_point3(v));
        Self::enclosing(points, transform)
    }

    /// Running per-axis extrema over already transformed points.
    fn enclosing(mut points: impl Iterator<Item = Vec3>, transform: &Mat4) -> Self {
        // Shapes and validated buffers always hold a vertex; the translation
        // is only a stand-in for an empty iterator.
        let first = points
            .next()
            .unwrap_or_else(|| transform.w_axis.truncate());
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self { min, max }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent on each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Closed-interval overlap test on all three axes.
    ///
    /// Touching boxes overlap: a player standing exactly on a platform edge
    /// collides with it.
    pub fn overlaps(&self, other: &AxisAlignedBox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Test if this box fully contains another box.
    pub fn contains(&self, other: &AxisAlignedBox) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> AxisAlignedBox {
        AxisAlignedBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest box containing both boxes.
    pub fn merge(&self, other: &AxisAlignedBox) -> AxisAlignedBox {
        AxisAlignedBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Separation metric: distance between the min corners plus distance
    /// between the max corners.
    ///
    /// Zero only for identical boxes. Used to pick the nearest child when
    /// an inserted box overlaps none of them.
    pub fn distance(&self, other: &AxisAlignedBox) -> f32 {
        self.min.distance(other.min) + self.max.distance(other.max)
    }

    /// Cut the box into disjoint regions around its center.
    ///
    /// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low half).
    /// Quadrants use bit0 = X, bit1 = Z and keep the full Y range.
    pub fn split(&self, subdivision: Subdivision) -> Vec<AxisAlignedBox> {
        let center = self.center();
        match subdivision {
            Subdivision::Octants => (0..8u8)
                .map(|octant| self.region(center, octant & 1 != 0, Some(octant & 2 != 0), octant & 4 != 0))
                .collect(),
            Subdivision::Quadrants => (0..4u8)
                .map(|quadrant| self.region(center, quadrant & 1 != 0, None, quadrant & 2 != 0))
                .collect(),
        }
    }

    /// One half-space region per axis; `None` keeps the whole axis.
    fn region(&self, center: Vec3, high_x: bool, high_y: Option<bool>, high_z: bool) -> AxisAlignedBox {
        let half = |high: bool, min: f32, mid: f32, max: f32| {
            if high { (mid, max) } else { (min, mid) }
        };
        let (min_x, max_x) = half(high_x, self.min.x, center.x, self.max.x);
        let (min_y, max_y) = match high_y {
            Some(high) => half(high, self.min.y, center.y, self.max.y),
            None => (self.min.y, self.max.y),
        };
        let (min_z, max_z) = half(high_z, self.min.z, center.z, self.max.z);

        AxisAlignedBox {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }
}

impl fmt::Display for AxisAlignedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min: [{}, {}, {}], max: [{}, {}, {}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

#[cfg(test)]
#[path = "axis_aligned_box_tests.rs"]
mod tests;
