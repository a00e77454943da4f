/*!
# Rhythm Runner

Spatial partitioning and collision core for a rhythm platformer.

Level geometry is indexed in an adaptive bounding-volume tree; once per
simulation tick the player's box is queried against it and every contact
is classified as landing, grazing or fatal.

## Architecture

- **AxisAlignedBox**: World-space bounding box value type
- **SpatialTree**: Bulk-built tree over object keys with lazy insert/remove
- **colliding_objects**: Breadth-first overlap query against current boxes
- **ShapeRegistry**: Shared collision shapes, injected where needed
- **Level**: Object store plus its spatial tree, advanced tick by tick
- **check_collisions**: Per-tick player classification (collect, land, die)

Game state is always owned by the caller; the only global is the logger.
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod spatial;
pub mod resource;
pub mod game;

// Main runner namespace module
pub mod runner {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{CollisionConfig, RunnerConfig, SpatialConfig, Subdivision};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: runner_* macros are exported at the crate root
    }

    // Spatial sub-module: boxes, tree, queries
    pub mod spatial {
        pub use crate::spatial::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Game sub-module
    pub mod game {
        pub use crate::game::*;
    }
}

// Re-export math library at crate root
pub use glam;
