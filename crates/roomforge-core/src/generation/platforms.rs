//! Platform placer - tiered, jump-reachable platforms inside the inner bounds.
//!
//! Placement walks a spawn cursor through the room. Each new platform is
//! sampled around the cursor at the cursor's height, clamped into the inner
//! bounds, and accepted only if the spot is free and within jumping distance
//! of the cursor. The cursor then moves onto the new platform. After each
//! tier the cursor is raised to the next tier height.
//!
//! `max_platforms / vertical_levels` platforms go into each of the first
//! `vertical_levels - 1` tiers; a leftover pass from a fresh anchor makes up
//! whatever the integer division and skipped placements left out.

use rand::Rng;

use super::bounds::{clamp_span, RoomBounds};
use super::layout::{Placement, Platform};
use crate::components::{Footprint, ObjectKind, Vec3};
use crate::config::LevelConfig;
use crate::error::{Diagnostic, GenerationError, Result};
use crate::scene::{PlacementSink, SpatialOracle};

/// The subset of [`LevelConfig`] that drives platform placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    pub max_platforms: u32,
    /// Already capped at `max_platforms`
    pub vertical_levels: u32,
    pub max_horizontal_jump: f32,
    pub min_radius: f32,
    pub max_attempts: u32,
    pub legacy_z_sampling: bool,
}

impl From<&LevelConfig> for PlacementRules {
    fn from(config: &LevelConfig) -> Self {
        Self {
            max_platforms: config.max_platforms,
            vertical_levels: config.effective_vertical_levels(),
            max_horizontal_jump: config.max_horizontal_jump,
            min_radius: config.min_radius,
            max_attempts: config.max_attempts,
            legacy_z_sampling: config.compat.legacy_z_sampling,
        }
    }
}

/// Output of a placement run
#[derive(Debug, Clone, Default)]
pub struct PlatformRun {
    /// Creation order: tiers first, then the leftover pass
    pub platforms: Vec<Platform>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct PlatformPlacer {
    rules: PlacementRules,
    bounds: RoomBounds,
    half_extents: (f32, f32),
    cursor: Vec3,
    run: PlatformRun,
}

impl PlatformPlacer {
    pub fn new(rules: PlacementRules, bounds: RoomBounds, platform_size: Vec3) -> Self {
        Self {
            rules,
            bounds,
            half_extents: Footprint(platform_size).horizontal_extents(),
            cursor: bounds.inner.min,
            run: PlatformRun::default(),
        }
    }

    /// Sphere radius used for the free-space check.
    pub fn overlap_radius(&self) -> f32 {
        self.bounds.inner.min.y
    }

    /// Vertical spacing between tiers.
    pub fn level_height(&self) -> f32 {
        self.bounds.inner.max.y / self.rules.vertical_levels.max(1) as f32
    }

    /// Run the tiered pass and the leftover pass.
    ///
    /// Fails with [`GenerationError::InsufficientSpace`] if the tiered pass ran
    /// and placed nothing, or if nothing was placed at all.
    ///
    /// With a single vertical level no tier runs, so the empty-tier check is
    /// skipped and the leftover pass places every platform. Legacy levels
    /// failed outright in that case; this is a deliberate departure.
    pub fn generate<W, R>(mut self, world: &mut W, rng: &mut R) -> Result<PlatformRun>
    where
        W: SpatialOracle + PlacementSink + ?Sized,
        R: Rng + ?Sized,
    {
        let levels = self.rules.vertical_levels.max(1);
        let per_level = self.rules.max_platforms / levels;

        self.reseed_anchor(rng);

        for tier in 1..levels {
            self.try_place(world, rng, Some(tier));
            for _ in 1..per_level {
                self.try_place(world, rng, Some(tier));
            }
            self.raise_cursor(tier);
        }

        if levels > 1 && self.run.platforms.is_empty() {
            return Err(self.insufficient_space());
        }

        let leftover = self
            .rules
            .max_platforms
            .saturating_sub(self.run.platforms.len() as u32);
        self.reseed_anchor(rng);
        for step in 1..=leftover {
            self.try_place(world, rng, None);
            self.raise_cursor(step);
        }

        if self.run.platforms.is_empty() {
            return Err(self.insufficient_space());
        }

        log::info!(
            "Placed {}/{} platforms over {} tier(s), {} skipped",
            self.run.platforms.len(),
            self.rules.max_platforms,
            levels,
            self.run.diagnostics.len()
        );

        Ok(self.run)
    }

    /// Try to place one platform around the cursor.
    ///
    /// On success the platform is materialized and the cursor moves onto it.
    /// After `max_attempts` misses a [`Diagnostic::PlacementSkipped`] is
    /// recorded and the cursor stays put.
    pub fn try_place<W, R>(
        &mut self,
        world: &mut W,
        rng: &mut R,
        tier: Option<u32>,
    ) -> Option<Platform>
    where
        W: SpatialOracle + PlacementSink + ?Sized,
        R: Rng + ?Sized,
    {
        let anchor = self.cursor;
        let jump = self.rules.max_horizontal_jump;
        let (x_extent, z_extent) = self.half_extents;
        let inner = self.bounds.inner;
        let radius = self.overlap_radius();
        let z_center = if self.rules.legacy_z_sampling {
            anchor.x
        } else {
            anchor.z
        };

        for attempt in 0..self.rules.max_attempts {
            let x = clamp_span(
                sample_span(rng, anchor.x - jump, anchor.x + jump),
                inner.min.x + x_extent,
                inner.max.x - x_extent,
            );
            let z = clamp_span(
                sample_span(rng, z_center - jump, z_center + jump),
                inner.min.z + z_extent,
                inner.max.z - z_extent,
            );
            let center = Vec3::new(x, anchor.y, z);

            if !world.overlaps(center, radius) && self.within_jump(center) {
                let platform = Platform {
                    placement: Placement {
                        handle: world.place(ObjectKind::Platform, center),
                        kind: ObjectKind::Platform,
                        position: center,
                    },
                    half_extents: self.half_extents,
                    tier,
                };
                self.cursor = center;
                self.run.platforms.push(platform);
                log::debug!("Platform at {} after {} attempt(s)", center, attempt + 1);
                return Some(platform);
            }
        }

        let diagnostic = Diagnostic::PlacementSkipped {
            anchor,
            attempts: self.rules.max_attempts,
        };
        log::warn!("{}", diagnostic);
        self.run.diagnostics.push(diagnostic);
        None
    }

    /// Distance from the cursor lies in `[min_radius, max_horizontal_jump]`.
    fn within_jump(&self, position: Vec3) -> bool {
        let distance = self.cursor.distance(&position);
        distance >= self.rules.min_radius && distance <= self.rules.max_horizontal_jump
    }

    /// Fresh random anchor inside the extent-adjusted bounds, at twice the
    /// inner minimum height.
    fn reseed_anchor<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let inner = self.bounds.inner;
        let (x_extent, z_extent) = self.half_extents;
        self.cursor = Vec3::new(
            sample_span(rng, inner.min.x + x_extent, inner.max.x - x_extent),
            inner.min.y * 2.0,
            sample_span(rng, inner.min.z + z_extent, inner.max.z - z_extent),
        );
    }

    fn raise_cursor(&mut self, step: u32) {
        let inner = self.bounds.inner;
        self.cursor.y = clamp_span(
            inner.min.y + self.level_height() * step as f32,
            inner.min.y,
            inner.max.y,
        );
    }

    fn insufficient_space(&self) -> GenerationError {
        GenerationError::InsufficientSpace {
            requested: self.rules.max_platforms,
            attempts: self.rules.max_attempts,
        }
    }
}

/// Uniform sample in `[lo, hi]`; an empty or inverted span yields `lo`.
fn sample_span<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
