//! Integration tests for the full level generation pipeline.
//!
//! Exercises: LevelConfig → RoomBounds → room shell → platforms → decorations
//!
//! Everything runs against the headless `SceneWorld`, or a recording wrapper
//! around it.

use rand::rngs::StdRng;
use rand::SeedableRng;

use roomforge_core::components::{ObjectKind, Vec3};
use roomforge_core::config::{Compat, LevelConfig};
use roomforge_core::engine::{Generator, LevelEngine};
use roomforge_core::error::{ConfigError, Diagnostic, GenerationError};
use roomforge_core::generation::{LevelLayout, RoomBounds};
use roomforge_core::scene::{Handle, PlacementSink, SceneWorld, SpatialOracle};

// ── Helpers ────────────────────────────────────────────────────────────

fn spacious_config(seed: u64) -> LevelConfig {
    LevelConfig {
        room_length: 14,
        room_width: 14,
        room_height: 10,
        seed,
        compat: Compat {
            lattice_floor_classification: true,
            legacy_z_sampling: false,
        },
        ..LevelConfig::default()
    }
}

fn generate(config: &LevelConfig) -> (SceneWorld, LevelLayout) {
    let mut scene = SceneWorld::new(&config.prefabs);
    let layout = Generator::new(config.clone())
        .run_seeded(&mut scene)
        .expect("generation failed");
    (scene, layout)
}

/// Wraps a scene, records every placement and checks each new platform
/// lands on free space.
struct RecordingScene {
    inner: SceneWorld,
    placed: Vec<(ObjectKind, Vec3)>,
    removed: usize,
}

impl RecordingScene {
    fn new(config: &LevelConfig) -> Self {
        Self {
            inner: SceneWorld::new(&config.prefabs),
            placed: Vec::new(),
            removed: 0,
        }
    }
}

impl SpatialOracle for RecordingScene {
    fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        self.inner.overlaps(center, radius)
    }
}

impl PlacementSink for RecordingScene {
    fn place(&mut self, kind: ObjectKind, position: Vec3) -> Handle {
        if kind == ObjectKind::Platform {
            // The placer queried this exact spot and found it free
            assert!(
                !self.inner.overlaps(position, 1.0),
                "platform at {} overlaps an existing object",
                position
            );
        }
        self.placed.push((kind, position));
        self.inner.place(kind, position)
    }

    fn remove(&mut self, handle: Handle) -> bool {
        self.removed += 1;
        self.inner.remove(handle)
    }
}

// ── Bounds and shell ───────────────────────────────────────────────────

#[test]
fn unit_room_bounds() {
    let bounds = RoomBounds::new(Vec3::ONE, 5, 5, 5);
    assert_eq!(bounds.inner.min, Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(bounds.inner.max, Vec3::new(5.0, 5.0, 5.0));
    assert_eq!(
        (bounds.outer_length, bounds.outer_height, bounds.outer_width),
        (7, 6, 7)
    );
}

#[test]
fn shell_cells_are_unique_and_open_on_top() {
    let (_, layout) = generate(&spacious_config(1));
    let mut coords: Vec<(i32, i32, i32)> = layout
        .walls
        .iter()
        .map(|w| {
            (
                w.position.x.round() as i32,
                w.position.y.round() as i32,
                w.position.z.round() as i32,
            )
        })
        .collect();
    let total = coords.len();
    coords.sort();
    coords.dedup();
    assert_eq!(coords.len(), total, "duplicate wall cells");

    let b = layout.bounds;
    let (lx, ly, lz) = (b.outer_length, b.outer_height, b.outer_width);
    for &(x, y, z) in &coords {
        let on_side = x == 0 || z == 0 || x == lx as i32 - 1 || z == lz as i32 - 1;
        assert!(y == 0 || on_side, "interior cell ({}, {}, {})", x, y, z);
        assert!(y < ly as i32);
    }
}

#[test]
fn floor_cells_lie_under_inner_footprint() {
    let (_, layout) = generate(&spacious_config(2));
    assert_eq!(layout.floor.len(), 14 * 14);
    let inner = layout.bounds.inner;
    for cell in layout.floor_cells() {
        assert_eq!(cell.position.y, 0.0);
        assert!(cell.position.x >= inner.min.x && cell.position.x <= inner.max.x);
        assert!(cell.position.z >= inner.min.z && cell.position.z <= inner.max.z);
    }
}

// ── Platforms ──────────────────────────────────────────────────────────

#[test]
fn platforms_stay_inside_extent_adjusted_bounds() {
    for seed in 0..10 {
        let (_, layout) = generate(&spacious_config(seed));
        let inner = layout.bounds.inner;
        for p in &layout.platforms {
            let pos = p.position();
            let (hx, hz) = p.half_extents;
            assert!(pos.x >= inner.min.x + hx && pos.x <= inner.max.x - hx);
            assert!(pos.z >= inner.min.z + hz && pos.z <= inner.max.z - hz);
            assert!(pos.y >= inner.min.y && pos.y <= inner.max.y);
        }
    }
}

#[test]
fn spacious_room_gets_every_platform() {
    let (scene, layout) = generate(&spacious_config(42));
    assert_eq!(layout.platforms.len(), 10);
    let tiers = layout.summary().tiers;
    assert_eq!(tiers, 4, "vertical_levels - 1 tiered passes");
    // Every platform slot holds exactly one live object
    let live = layout.walls.len() + layout.platforms.len();
    assert_eq!(scene.len(), live);
}

#[test]
fn no_platform_overlaps_at_acceptance() {
    let config = spacious_config(7);
    let mut scene = RecordingScene::new(&config);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let layout = Generator::new(config).run(&mut scene, &mut rng).unwrap();

    let platforms = scene
        .placed
        .iter()
        .filter(|(kind, _)| *kind == ObjectKind::Platform)
        .count();
    assert_eq!(platforms, layout.platforms.len());
    // One removal per decorated slot
    assert_eq!(
        scene.removed,
        layout.floor_used.len() + layout.platform_used.len()
            + layout
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::KeyCollision { .. }))
                .count()
    );
}

#[test]
fn impossible_geometry_is_insufficient_space() {
    let config = LevelConfig {
        max_attempts: 1,
        min_radius: 6.0,
        max_horizontal_jump: 5.0,
        ..spacious_config(0)
    };
    let mut scene = SceneWorld::new(&config.prefabs);
    let err = Generator::new(config).run_seeded(&mut scene).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::InsufficientSpace { attempts: 1, .. }
    ));
    assert_eq!(scene.count(ObjectKind::Platform), 0);
}

// ── Decorations ────────────────────────────────────────────────────────

#[test]
fn decoration_counts_match_config() {
    let config = spacious_config(11);
    let (scene, layout) = generate(&config);

    let floor_traps = layout
        .floor_cells()
        .filter(|c| c.kind == ObjectKind::Trap)
        .count();
    let floor_coins = layout
        .floor_cells()
        .filter(|c| c.kind == ObjectKind::Coin)
        .count();
    assert_eq!(floor_traps, config.floor_traps as usize);
    assert_eq!(floor_coins, config.floor_coins as usize);
    assert_eq!(layout.floor_used.len(), floor_traps + floor_coins);

    let platform_traps = layout
        .platforms
        .iter()
        .filter(|p| p.placement.kind == ObjectKind::Trap)
        .count();
    assert_eq!(platform_traps, config.platform_traps as usize);
    assert_eq!(scene.count(ObjectKind::Key), 1);
    assert!(scene.count(ObjectKind::Door) <= 1);
}

#[test]
fn used_slots_stay_within_candidate_lists() {
    for seed in 0..20 {
        let (_, layout) = generate(&spacious_config(seed));
        assert!(layout.floor_used.len() <= layout.floor.len());
        assert!(layout.platform_used.len() <= layout.platforms.len());
        assert!(layout.floor_used.iter().all(|i| i < layout.floor.len()));
        assert!(layout.platform_used.iter().all(|i| i < layout.platforms.len()));
    }
}

#[test]
fn door_sits_high_enough() {
    for seed in 0..20 {
        let (_, layout) = generate(&spacious_config(seed));
        match layout.door {
            Some(door) => assert!(door.position.y >= layout.bounds.door_threshold()),
            None => assert!(layout
                .diagnostics
                .iter()
                .any(|d| matches!(d, Diagnostic::DoorNotPlaced { .. }))),
        }
    }
}

#[test]
fn too_many_floor_traps_is_configuration_error() {
    let config = LevelConfig {
        floor_traps: 14 * 14 + 1,
        ..spacious_config(0)
    };
    let mut scene = SceneWorld::new(&config.prefabs);
    let err = Generator::new(config).run_seeded(&mut scene).unwrap_err();
    assert_eq!(
        err,
        GenerationError::Configuration(ConfigError::NotEnoughSlots {
            kind: ObjectKind::Trap,
            requested: 197,
            available: 196,
        })
    );
}

// ── Determinism ────────────────────────────────────────────────────────

#[test]
fn same_seed_same_placements() {
    let config = spacious_config(99);
    let mut first = RecordingScene::new(&config);
    let mut second = RecordingScene::new(&config);
    let generator = Generator::new(config);
    generator.run_seeded(&mut first).unwrap();
    generator.run_seeded(&mut second).unwrap();
    assert_eq!(first.placed, second.placed);
}

#[test]
fn different_seeds_differ() {
    let (_, a) = generate(&spacious_config(1));
    let (_, b) = generate(&spacious_config(2));
    let positions = |l: &LevelLayout| l.platforms.iter().map(|p| p.position()).collect::<Vec<_>>();
    assert_ne!(positions(&a), positions(&b));
}

#[test]
fn engine_regenerates_cleanly() {
    let mut engine = LevelEngine::new(spacious_config(5));
    for seed in 0..5 {
        let live = {
            let layout = engine.generate_with_seed(seed).unwrap();
            layout.walls.len() + layout.platforms.len()
        };
        assert_eq!(engine.object_count(), live);
    }
}

#[test]
fn summary_serializes() {
    let (_, layout) = generate(&spacious_config(3));
    let summary = layout.summary();
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains(&format!("\"platforms\":{}", layout.platforms.len())));
    assert_eq!(summary.counts.get("key"), Some(&1));
}
