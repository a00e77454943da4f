//! Collision shapes and the registry that owns them.
//!
//! A `Shape` is the vertex data a game object's bounding box is computed
//! from: a flat `[x, y, z, x, y, z, ...]` position buffer in model space.
//! Shapes are loaded once, registered by name, and shared between every
//! object that uses them.
//!
//! # Example
//!
//! ```text
//! ShapeRegistry
//! ├── "platform" → Arc<Shape> (8 vertices)
//! ├── "coin"     → Arc<Shape> (24 vertices)
//! └── "monster"  → Arc<Shape> (312 vertices)
//! ```

use std::sync::Arc;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{runner_bail, runner_debug, runner_err};

// ============================================================================
// SHAPE
// ============================================================================

/// Named model-space vertex positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    name: String,
    positions: Vec<f32>,
}

impl Shape {
    /// Create a shape from a flat xyz position buffer.
    ///
    /// # Errors
    ///
    /// `Error::InvalidGeometry` if the buffer is empty, its length is not a
    /// multiple of 3, or it contains NaN/infinite values.
    pub fn new(name: impl Into<String>, positions: Vec<f32>) -> Result<Self> {
        let name = name.into();
        if positions.is_empty() {
            runner_bail!("runner::Shape", InvalidGeometry, "shape '{}' has no vertices", name);
        }
        if positions.len() % 3 != 0 {
            runner_bail!(
                "runner::Shape",
                InvalidGeometry,
                "shape '{}': position count {} is not a multiple of 3",
                name,
                positions.len()
            );
        }
        if positions.iter().any(|p| !p.is_finite()) {
            runner_bail!("runner::Shape", InvalidGeometry, "shape '{}' has non-finite positions", name);
        }

        Ok(Self { name, positions })
    }

    /// Create a shape from raw vertex bytes (`f32` triples, native byte order).
    pub fn from_vertex_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        if bytes.len() % 4 != 0 {
            runner_bail!(
                "runner::Shape",
                InvalidGeometry,
                "shape '{}': {} bytes is not a whole number of floats",
                name,
                bytes.len()
            );
        }

        let positions = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        Self::new(name, positions)
    }

    /// Axis-aligned cube of side 1 centered on the origin.
    pub fn unit_cube(name: impl Into<String>) -> Self {
        let positions = (0..8u8)
            .flat_map(|corner| {
                let coord = |bit: u8| if corner & bit != 0 { 0.5 } else { -0.5 };
                [coord(1), coord(2), coord(4)]
            })
            .collect();
        Self {
            name: name.into(),
            positions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flat position buffer
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Position buffer as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Iterate over vertices as `Vec3`
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }
}

// ============================================================================
// SHAPE REGISTRY
// ============================================================================

/// Name-indexed store of shared shapes.
///
/// Owned by whoever loads the level and passed to object construction;
/// there is no global registry.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: FxHashMap<String, Arc<Shape>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape under its own name.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the name is already taken.
    pub fn register(&mut self, shape: Shape) -> Result<Arc<Shape>> {
        if self.shapes.contains_key(shape.name()) {
            runner_bail!(
                "runner::ShapeRegistry",
                InvalidResource,
                "shape '{}' is already registered",
                shape.name()
            );
        }

        let shape = Arc::new(shape);
        self.shapes.insert(shape.name().to_string(), Arc::clone(&shape));
        runner_debug!(
            "runner::ShapeRegistry",
            "Registered shape '{}' ({} vertices)",
            shape.name(),
            shape.vertex_count()
        );
        Ok(shape)
    }

    /// Get a shape by name
    pub fn get(&self, name: &str) -> Option<&Arc<Shape>> {
        self.shapes.get(name)
    }

    /// Get a shape by name, or fail with `Error::InvalidResource`.
    pub fn require(&self, name: &str) -> Result<Arc<Shape>> {
        self.shapes
            .get(name)
            .cloned()
            .ok_or_else(|| runner_err!("runner::ShapeRegistry", InvalidResource, "unknown shape '{}'", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
#[path = "shape_tests.rs"]
mod tests;
