//! Level configuration and validation.
//!
//! A [`LevelConfig`] carries everything one generation run needs: prefab
//! footprints, room dimensions, platform placement rules and decoration
//! counts. It is plain serde data so tools can load it from JSON; every field
//! has a default, so partial documents are accepted.
//!
//! ```
//! use roomforge_core::config::{validate_config, LevelConfig};
//!
//! let config = LevelConfig::default();
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::components::{ObjectKind, Vec3};
use crate::error::ConfigError;
use crate::generation::RoomBounds;

/// Footprints (full size) of the prefabs the generator instantiates.
/// `None` means the prefab is not assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefabs {
    pub wall: Option<Vec3>,
    pub platform: Option<Vec3>,
    pub trap: Option<Vec3>,
    pub coin: Option<Vec3>,
    pub key: Option<Vec3>,
    pub door: Option<Vec3>,
}

impl Default for Prefabs {
    fn default() -> Self {
        Self {
            wall: Some(Vec3::ONE),
            platform: Some(Vec3::new(1.0, 0.2, 1.0)),
            trap: Some(Vec3::new(1.0, 0.3, 1.0)),
            coin: Some(Vec3::new(0.5, 0.5, 0.1)),
            key: Some(Vec3::new(0.5, 0.5, 0.2)),
            door: Some(Vec3::new(1.0, 2.0, 0.2)),
        }
    }
}

impl Prefabs {
    pub fn footprint(&self, kind: ObjectKind) -> Option<Vec3> {
        match kind {
            ObjectKind::Wall => self.wall,
            ObjectKind::Platform => self.platform,
            ObjectKind::Trap => self.trap,
            ObjectKind::Coin => self.coin,
            ObjectKind::Key => self.key,
            ObjectKind::Door => self.door,
        }
    }

    /// Footprint of `kind`, or why it can't be used.
    pub fn require(&self, kind: ObjectKind) -> Result<Vec3, ConfigError> {
        let size = self
            .footprint(kind)
            .ok_or(ConfigError::MissingPrefab(kind))?;
        if !size.is_positive() {
            return Err(ConfigError::InvalidFootprint { kind, size });
        }
        Ok(size)
    }
}

/// Switches for two long-standing placement quirks. Both default to the
/// legacy behaviour so existing levels reproduce exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compat {
    /// Floor classification compares integer lattice coordinates against the
    /// world-unit inner bounds. When false, the cell's world position is used.
    pub lattice_floor_classification: bool,
    /// The z sample is centred on the anchor's x coordinate. When false, it is
    /// centred on the anchor's z coordinate.
    pub legacy_z_sampling: bool,
}

impl Default for Compat {
    fn default() -> Self {
        Self {
            lattice_floor_classification: true,
            legacy_z_sampling: true,
        }
    }
}

/// Configuration for one level generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub prefabs: Prefabs,

    /// Room inner size in cells
    pub room_length: u32,
    pub room_width: u32,
    pub room_height: u32,

    /// Platform generation
    pub max_platforms: u32,
    pub vertical_levels: u32,
    pub max_horizontal_jump: f32,
    pub min_radius: f32,
    /// Attempts per platform before the placement is skipped
    pub max_attempts: u32,

    /// Decorations
    pub floor_traps: u32,
    pub platform_traps: u32,
    pub platform_coins: u32,
    pub floor_coins: u32,
    /// Reserved for a collectible-count feature; placement ignores it.
    pub coin_amount: u32,

    /// Seed for [`crate::engine::Generator::run_seeded`]
    pub seed: u64,
    pub compat: Compat,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            prefabs: Prefabs::default(),
            room_length: 5,
            room_width: 5,
            room_height: 5,
            max_platforms: 10,
            vertical_levels: 5,
            max_horizontal_jump: 5.0,
            min_radius: 3.0,
            max_attempts: 100,
            floor_traps: 3,
            platform_traps: 2,
            platform_coins: 2,
            floor_coins: 3,
            coin_amount: 1,
            seed: 0,
            compat: Compat::default(),
        }
    }
}

impl LevelConfig {
    /// More tiers than platforms is meaningless, so the tier count is capped.
    pub fn effective_vertical_levels(&self) -> u32 {
        self.vertical_levels.min(self.max_platforms)
    }

    /// Prefabs this configuration will instantiate.
    pub fn required_prefabs(&self) -> Vec<ObjectKind> {
        let mut kinds = vec![
            ObjectKind::Wall,
            ObjectKind::Platform,
            ObjectKind::Key,
            ObjectKind::Door,
        ];
        if self.floor_traps + self.platform_traps > 0 {
            kinds.push(ObjectKind::Trap);
        }
        if self.floor_coins + self.platform_coins > 0 {
            kinds.push(ObjectKind::Coin);
        }
        kinds.sort();
        kinds
    }

    /// Returns the first problem found, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match validate_config(self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Validate a level configuration, returning all errors found.
pub fn validate_config(config: &LevelConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for kind in config.required_prefabs() {
        if let Err(e) = config.prefabs.require(kind) {
            errors.push(e);
        }
    }

    if let Ok(cell) = config.prefabs.require(ObjectKind::Wall) {
        let bounds = RoomBounds::new(
            cell,
            config.room_length,
            config.room_width,
            config.room_height,
        );
        if !bounds.is_valid() {
            errors.push(ConfigError::DegenerateBounds {
                min: bounds.inner.min,
                max: bounds.inner.max,
            });
        }
    }

    if config.max_platforms == 0 {
        errors.push(ConfigError::NoPlatforms);
    }
    if config.vertical_levels == 0 {
        errors.push(ConfigError::NoVerticalLevels);
    }
    if config.max_attempts == 0 {
        errors.push(ConfigError::NoAttempts);
    }

    let jump_ok = config.max_horizontal_jump.is_finite() && config.max_horizontal_jump >= 0.0;
    let radius_ok = config.min_radius.is_finite() && config.min_radius >= 0.0;
    if !jump_ok || !radius_ok {
        errors.push(ConfigError::InvalidJumpRange {
            max_horizontal_jump: config.max_horizontal_jump,
            min_radius: config.min_radius,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let errors = validate_config(&LevelConfig::default());
        assert!(errors.is_empty(), "default config invalid: {:?}", errors);
    }

    #[test]
    fn test_missing_wall_prefab() {
        let mut config = LevelConfig::default();
        config.prefabs.wall = None;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::MissingPrefab(ObjectKind::Wall)));
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPrefab(ObjectKind::Wall))
        );
    }

    #[test]
    fn test_missing_platform_prefab() {
        let mut config = LevelConfig::default();
        config.prefabs.platform = None;
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPrefab(ObjectKind::Platform))
        );
    }

    #[test]
    fn test_unused_prefab_not_required() {
        let config = LevelConfig {
            floor_traps: 0,
            platform_traps: 0,
            prefabs: Prefabs {
                trap: None,
                ..Prefabs::default()
            },
            ..LevelConfig::default()
        };
        assert!(validate_config(&config).is_empty());
        assert!(!config.required_prefabs().contains(&ObjectKind::Trap));
    }

    #[test]
    fn test_invalid_footprint() {
        let mut config = LevelConfig::default();
        config.prefabs.platform = Some(Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFootprint {
                kind: ObjectKind::Platform,
                ..
            })
        ));
    }

    #[test]
    fn test_degenerate_bounds() {
        let config = LevelConfig {
            room_height: 1,
            ..LevelConfig::default()
        };
        assert!(validate_config(&config)
            .iter()
            .any(|e| matches!(e, ConfigError::DegenerateBounds { .. })));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let config = LevelConfig {
            max_platforms: 0,
            vertical_levels: 0,
            max_attempts: 0,
            ..LevelConfig::default()
        };
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::NoPlatforms));
        assert!(errors.contains(&ConfigError::NoVerticalLevels));
        assert!(errors.contains(&ConfigError::NoAttempts));
    }

    #[test]
    fn test_negative_jump_rejected() {
        let config = LevelConfig {
            max_horizontal_jump: -1.0,
            ..LevelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidJumpRange { .. })
        ));
    }

    #[test]
    fn test_min_radius_above_jump_is_not_a_config_error() {
        // Impossible geometry is reported by the placer, not by validation.
        let config = LevelConfig {
            min_radius: 10.0,
            max_horizontal_jump: 5.0,
            ..LevelConfig::default()
        };
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_vertical_levels_clamped() {
        let config = LevelConfig {
            max_platforms: 3,
            vertical_levels: 8,
            ..LevelConfig::default()
        };
        assert_eq!(config.effective_vertical_levels(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LevelConfig =
            serde_json::from_str(r#"{ "room_length": 8, "seed": 7 }"#).unwrap();
        assert_eq!(config.room_length, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.room_width, 5);
        assert_eq!(config.prefabs, Prefabs::default());
        assert!(config.compat.legacy_z_sampling);
    }
}
