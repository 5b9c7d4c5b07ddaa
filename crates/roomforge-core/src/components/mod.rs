//! Component definitions for generated level objects.
//!
//! Components are pure data structs attached to entities in the scene world.
//! They have no behavior - that lives in the generation passes.

mod common;
mod level;

pub use common::*;
pub use level::*;
