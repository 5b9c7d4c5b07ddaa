//! Generation output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bounds::RoomBounds;
use super::decoration::UsedSlots;
use crate::components::{ObjectKind, Vec3};
use crate::error::Diagnostic;
use crate::scene::Handle;

/// One materialized object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub handle: Handle,
    pub kind: ObjectKind,
    pub position: Vec3,
}

/// A platform slot. Decoration may swap `placement` for a trap, coin, key or door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub placement: Placement,
    /// Half-size on x and z
    pub half_extents: (f32, f32),
    /// Tier index from the tiered pass, `None` for the leftover pass
    pub tier: Option<u32>,
}

impl Platform {
    pub fn position(&self) -> Vec3 {
        self.placement.position
    }
}

/// Result of level generation
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub bounds: RoomBounds,
    /// Every wall cell in lattice-scan order
    pub walls: Vec<Placement>,
    /// Indices into `walls` of the floor-classified cells
    pub floor: Vec<usize>,
    pub platforms: Vec<Platform>,
    pub floor_used: UsedSlots,
    pub platform_used: UsedSlots,
    pub key: Option<Placement>,
    pub door: Option<Placement>,
    pub diagnostics: Vec<Diagnostic>,
    /// Carried from the config, not used by placement
    pub coin_amount: u32,
}

impl LevelLayout {
    /// Floor cells in scan order.
    pub fn floor_cells(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.floor.iter().map(move |&i| &self.walls[i])
    }

    /// Every placement the run left in the world.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.walls
            .iter()
            .chain(self.platforms.iter().map(|p| &p.placement))
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.placements().filter(|p| p.kind == kind).count()
    }

    pub fn summary(&self) -> LevelSummary {
        let mut counts = BTreeMap::new();
        for p in self.placements() {
            *counts.entry(p.kind.name().to_string()).or_insert(0) += 1;
        }
        let mut tiers: Vec<u32> = self.platforms.iter().filter_map(|p| p.tier).collect();
        tiers.dedup();
        LevelSummary {
            inner_min: self.bounds.inner.min,
            inner_max: self.bounds.inner.max,
            wall_cells: self.walls.len(),
            floor_cells: self.floor.len(),
            platforms: self.platforms.len(),
            tiers: tiers.len(),
            counts,
            key: self.key.map(|p| p.position),
            door: self.door.map(|p| p.position),
            coin_amount: self.coin_amount,
            diagnostics: self.diagnostics.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Serializable overview of a generated level, for tooling output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSummary {
    pub inner_min: Vec3,
    pub inner_max: Vec3,
    pub wall_cells: usize,
    pub floor_cells: usize,
    pub platforms: usize,
    pub tiers: usize,
    /// Live placements per kind name
    pub counts: BTreeMap<String, usize>,
    pub key: Option<Vec3>,
    pub door: Option<Vec3>,
    pub coin_amount: u32,
    pub diagnostics: Vec<String>,
}
