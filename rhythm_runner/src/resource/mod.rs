//! Resource management module
//!
//! Provides the collision shapes game objects are built from and the
//! registry that shares them.

mod shape;

pub use shape::{Shape, ShapeRegistry};
