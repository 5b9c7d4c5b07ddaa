//! Error and diagnostic types for level generation.
//!
//! Fatal problems abort a run and come back as [`GenerationError`]. Recoverable
//! ones are logged and collected as [`Diagnostic`]s on the finished layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{ObjectKind, Vec3};

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A prefab the run needs has no footprint assigned.
    #[error("{0} prefab is not assigned")]
    MissingPrefab(ObjectKind),
    /// A prefab footprint has a zero, negative or non-finite component.
    #[error("{kind} prefab has an invalid footprint {size}")]
    InvalidFootprint { kind: ObjectKind, size: Vec3 },
    /// Inner bounds are not strictly increasing on every axis.
    #[error("inner room bounds are degenerate: min {min} is not below max {max}")]
    DegenerateBounds { min: Vec3, max: Vec3 },
    /// `max_platforms` is zero.
    #[error("max_platforms must be at least 1")]
    NoPlatforms,
    /// `vertical_levels` is zero.
    #[error("vertical_levels must be at least 1")]
    NoVerticalLevels,
    /// `max_attempts` is zero.
    #[error("max_attempts must be at least 1")]
    NoAttempts,
    /// Jump distances must be finite and non-negative.
    #[error("invalid jump range: jump {max_horizontal_jump}, min radius {min_radius}")]
    InvalidJumpRange {
        max_horizontal_jump: f32,
        min_radius: f32,
    },
    /// More decorations requested than free slots remain.
    #[error("cannot place {requested} {kind}(s): only {available} free slot(s)")]
    NotEnoughSlots {
        kind: ObjectKind,
        requested: usize,
        available: usize,
    },
}

/// Fatal generation failure. Objects placed before the failure stay in the world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// The room is too small for even one platform.
    #[error("no platforms generated ({requested} requested, {attempts} attempts each)")]
    InsufficientSpace { requested: u32, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Recoverable event reported during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A platform placement exhausted its attempt budget around `anchor`.
    PlacementSkipped { anchor: Vec3, attempts: u32 },
    /// No platform reached the door height threshold (or the door was overwritten).
    DoorNotPlaced { min_height: f32 },
    /// The key's single draw landed on a slot that was already decorated.
    KeyCollision { slot: usize, replaced: ObjectKind },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::PlacementSkipped { anchor, attempts } => write!(
                f,
                "failed to find a valid platform position near {} after {} attempts",
                anchor, attempts
            ),
            Diagnostic::DoorNotPlaced { min_height } => {
                write!(f, "no platform at or above height {:.2} for the exit door", min_height)
            }
            Diagnostic::KeyCollision { slot, replaced } => {
                write!(f, "key replaced the {} already at platform slot {}", replaced, slot)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_generation_error() {
        let err: GenerationError = ConfigError::MissingPrefab(ObjectKind::Wall).into();
        assert!(matches!(
            err,
            GenerationError::Configuration(ConfigError::MissingPrefab(ObjectKind::Wall))
        ));
        assert_eq!(
            err.to_string(),
            "configuration error: wall prefab is not assigned"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::PlacementSkipped {
            anchor: Vec3::new(1.0, 2.0, 3.0),
            attempts: 100,
        };
        assert!(d.to_string().contains("after 100 attempts"));
    }
}
