//! RoomForge Core - Procedural Platforming Room Generator
//!
//! Builds a single enclosed room out of unit wall cells, fills it with tiered,
//! jump-reachable platforms and swaps some floor cells and platforms for
//! traps, coins, a key and an exit door.
//!
//! # Architecture
//!
//! Generation is a one-way pipeline:
//! - **Bounds**: inner/outer room volume from the cell size and room dimensions
//! - **Room**: the hollow wall shell and its floor cells
//! - **Platforms**: tiered placement around a moving spawn cursor
//! - **Decoration**: door, key, traps and coins replace existing slots
//!
//! The pipeline never touches an engine directly. It asks a [`scene::SpatialOracle`]
//! whether space is free and hands objects to a [`scene::PlacementSink`].
//! [`scene::SceneWorld`] implements both over a `hecs` world.
//!
//! # Example
//!
//! The default config describes a cramped 5x5x5 room where many seeds cannot
//! fit a single platform, so real levels want a bigger room:
//!
//! ```rust
//! use roomforge_core::prelude::*;
//!
//! let config = LevelConfig {
//!     room_length: 14,
//!     room_width: 14,
//!     room_height: 10,
//!     ..LevelConfig::default()
//! };
//! let mut engine = LevelEngine::new(config);
//!
//! // A run can still fail with `InsufficientSpace` for an unlucky seed
//! match engine.generate() {
//!     Ok(layout) => println!("{} platforms", layout.platforms.len()),
//!     Err(e) => eprintln!("generation failed: {}", e),
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod scene;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{validate_config, Compat, LevelConfig, Prefabs};
    pub use crate::engine::{Generator, LevelEngine};
    pub use crate::error::{ConfigError, Diagnostic, GenerationError};
    pub use crate::generation::{LevelLayout, LevelSummary, Placement, Platform};
    pub use crate::scene::{Handle, PlacementSink, SceneWorld, SpatialOracle};
}
