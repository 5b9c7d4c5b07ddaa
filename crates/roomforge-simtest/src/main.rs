//! RoomForge Headless Generation Harness
//!
//! Generates levels over a sweep of seeds and checks the invariants every
//! level must hold. Runs entirely in-process against the `hecs` scene.
//!
//! Usage:
//!   cargo run -p roomforge-simtest
//!   cargo run -p roomforge-simtest -- --verbose --seeds 200
//!   cargo run -p roomforge-simtest -- --config my_level.json --json

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use roomforge_core::components::{BoundingBox, ObjectKind, Vec3};
use roomforge_core::config::{validate_config, LevelConfig};
use roomforge_core::engine::{Generator, LevelEngine};
use roomforge_core::error::{ConfigError, Diagnostic, GenerationError};
use roomforge_core::generation::{build_room, LevelLayout, RoomBounds};
use roomforge_core::scene::{Handle, PlacementSink, SceneWorld, SpatialOracle};

// ── Default level (same JSON the tools ship) ────────────────────────────
const DEFAULT_LEVEL_JSON: &str = include_str!("../../../data/default_level.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    seeds: u64,
    config_path: Option<String>,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let value_after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        seeds: value_after("--seeds")
            .and_then(|s| s.parse().ok())
            .unwrap_or(100),
        config_path: value_after("--config"),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = parse_args();
    println!("=== RoomForge Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&opts, &mut results) {
        Some(c) => c,
        None => {
            report(&results, opts.verbose);
            std::process::exit(1);
        }
    };

    // 2. Bounds & room shell
    results.extend(validate_room_shell(&config, opts.verbose));

    // 3. Platform sweep
    results.extend(validate_platforms(&config, opts.seeds, opts.verbose));

    // 4. Decoration sweep
    results.extend(validate_decorations(&config, opts.seeds, opts.verbose));

    // 5. Determinism
    results.extend(validate_determinism(&config, opts.verbose));

    // 6. Error paths
    results.extend(validate_error_paths(&config, opts.verbose));

    if opts.json {
        print_summary_json(&config);
    }

    let failed = report(&results, opts.verbose);
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Print the result table and return the failure count.
fn report(results: &[TestResult], verbose: bool) -> usize {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

/// Per-seed outcomes of a sweep. Running out of room for platforms or for
/// decorations is a legitimate result for a cramped config, so those are
/// reported as rates; anything else is a failure.
#[derive(Debug, Default)]
struct SweepTally {
    runs: u64,
    ok: u64,
    insufficient_space: u64,
    slot_shortfalls: u64,
    unexpected: Vec<String>,
}

impl SweepTally {
    fn record<T>(&mut self, seed: u64, outcome: &Result<T, GenerationError>) {
        self.runs += 1;
        match outcome {
            Ok(_) => self.ok += 1,
            Err(GenerationError::InsufficientSpace { .. }) => self.insufficient_space += 1,
            Err(GenerationError::Configuration(ConfigError::NotEnoughSlots { .. })) => {
                self.slot_shortfalls += 1
            }
            Err(e) => self.unexpected.push(format!("seed {}: {}", seed, e)),
        }
    }

    /// No unexpected errors, and at least one seed produced a level.
    fn passed(&self) -> bool {
        self.unexpected.is_empty() && (self.runs == 0 || self.ok > 0)
    }

    fn rate(&self, count: u64) -> f32 {
        if self.runs == 0 {
            0.0
        } else {
            count as f32 * 100.0 / self.runs as f32
        }
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(opts: &Options, results: &mut Vec<TestResult>) -> Option<LevelConfig> {
    println!("--- Configuration ---");

    let (source, text) = match &opts.config_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => (path.clone(), text),
            Err(e) => {
                results.push(check(
                    "config_read",
                    false,
                    format!("cannot read {}: {}", path, e),
                ));
                return None;
            }
        },
        None => ("data/default_level.json".to_string(), DEFAULT_LEVEL_JSON.to_string()),
    };

    let config: LevelConfig = match serde_json::from_str(&text) {
        Ok(c) => c,
        Err(e) => {
            results.push(check(
                "config_parse",
                false,
                format!("JSON parse error in {}: {}", source, e),
            ));
            return None;
        }
    };
    results.push(check("config_parse", true, format!("loaded {}", source)));

    let errors = validate_config(&config);
    results.push(check(
        "config_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!(
                "{}x{}x{} room, {} platforms over {} levels",
                config.room_length,
                config.room_width,
                config.room_height,
                config.max_platforms,
                config.vertical_levels
            )
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    if opts.verbose {
        println!("  compat: {:?}", config.compat);
    }

    errors.is_empty().then_some(config)
}

// ── 2. Bounds & room shell ──────────────────────────────────────────────

fn validate_room_shell(config: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Room Shell ---");
    let mut results = Vec::new();

    let cell = config.prefabs.wall.unwrap_or(Vec3::ONE);
    let bounds = RoomBounds::new(
        cell,
        config.room_length,
        config.room_width,
        config.room_height,
    );
    let expected_max = cell.scale(Vec3::new(
        config.room_length as f32,
        config.room_height as f32,
        config.room_width as f32,
    ));
    results.push(check(
        "bounds_inner",
        bounds.inner.min == cell && bounds.inner.max == expected_max,
        format!("inner {} .. {}", bounds.inner.min, bounds.inner.max),
    ));

    let (lx, ly, lz) = (bounds.outer_length, bounds.outer_height, bounds.outer_width);
    // The shell is built before any platform, so it does not depend on the seed
    let mut scene = SceneWorld::new(&config.prefabs);
    let shell = build_room(&mut scene, &bounds, &config.compat);

    // Floor layer plus the side ring on every layer above it
    let ring = 2 * (lx + lz) - 4;
    let expected_cells = (lx * lz + (ly - 1) * ring) as usize;
    results.push(check(
        "shell_cell_count",
        shell.walls.len() == expected_cells && shell.walls.len() <= bounds.lattice_size(),
        format!(
            "{} of {} lattice cells over {}x{}x{} (expected {})",
            shell.walls.len(),
            bounds.lattice_size(),
            lx,
            ly,
            lz,
            expected_cells
        ),
    ));

    let unique: HashSet<(i64, i64, i64)> = shell
        .walls
        .iter()
        .map(|w| {
            (
                (w.position.x * 1000.0).round() as i64,
                (w.position.y * 1000.0).round() as i64,
                (w.position.z * 1000.0).round() as i64,
            )
        })
        .collect();
    results.push(check(
        "shell_no_duplicates",
        unique.len() == shell.walls.len(),
        format!("{} unique positions", unique.len()),
    ));

    let floor_on_bottom = shell
        .floor
        .iter()
        .all(|&i| shell.walls[i].position.y == 0.0);
    results.push(check(
        "floor_on_bottom_layer",
        floor_on_bottom && !shell.floor.is_empty(),
        format!("{} floor cells", shell.floor.len()),
    ));

    if verbose {
        println!(
            "  lattice {}x{}x{}, door threshold {:.2}",
            lx,
            ly,
            lz,
            bounds.door_threshold()
        );
    }

    results
}

// ── 3. Platform sweep ───────────────────────────────────────────────────

fn validate_platforms(config: &LevelConfig, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Platforms ({} seeds) ---", seeds);
    let mut results = Vec::new();

    let mut tally = SweepTally::default();
    let mut out_of_bounds = 0;
    let mut jump_violations = 0;
    let mut tier_order_violations = 0;
    let mut overlaps = 0;
    let mut total_platforms = 0;
    let mut total_skips = 0;

    for seed in 0..seeds {
        let mut scene = CheckingScene::new(config);
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = Generator::new(config.clone()).run(&mut scene, &mut rng);
        tally.record(seed, &outcome);
        let layout = match outcome {
            Ok(l) => l,
            Err(_) => continue,
        };
        overlaps += scene.overlapping_platforms;
        total_platforms += layout.platforms.len();
        total_skips += layout
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::PlacementSkipped { .. }))
            .count();

        let inner = layout.bounds.inner;
        for p in &layout.platforms {
            let (hx, hz) = p.half_extents;
            let margin = Vec3::new(hx - 1e-4, 0.0, hz - 1e-4);
            let allowed = BoundingBox::new(inner.min + margin, inner.max - margin);
            if !allowed.contains(&p.position()) {
                out_of_bounds += 1;
            }
        }

        for w in layout.platforms.windows(2) {
            // Each pass starts from a random anchor; tiers differ only in height
            if w[0].tier.is_some() != w[1].tier.is_some() {
                continue;
            }
            let (a, b) = (w[0].position(), w[1].position());
            let distance = ((a.x - b.x).powi(2) + (a.z - b.z).powi(2)).sqrt();
            if distance < config.min_radius - 1e-4 || distance > config.max_horizontal_jump + 1e-4 {
                jump_violations += 1;
            }
            if w[0].tier.is_some() && w[0].position().y > w[1].position().y {
                tier_order_violations += 1;
            }
        }
    }

    results.push(check(
        "platforms_generated",
        tally.passed(),
        match tally.unexpected.first() {
            None => format!(
                "{} platforms over {}/{} levels, {} skipped placements",
                total_platforms, tally.ok, seeds, total_skips
            ),
            Some(first) => format!("{} failed runs, first: {}", tally.unexpected.len(), first),
        },
    ));
    results.push(check(
        "platforms_insufficient_space",
        true,
        format!(
            "{:.1}% of seeds had no room for a platform, {:.1}% ran out of decoration slots",
            tally.rate(tally.insufficient_space),
            tally.rate(tally.slot_shortfalls)
        ),
    ));
    results.push(check(
        "platforms_inside_bounds",
        out_of_bounds == 0,
        format!("{} platforms outside the extent-adjusted bounds", out_of_bounds),
    ));
    results.push(check(
        "platforms_no_overlap",
        overlaps == 0,
        format!("{} platforms placed onto occupied space", overlaps),
    ));
    results.push(check(
        "platforms_jump_range",
        jump_violations == 0,
        format!(
            "{} consecutive pairs outside [{}, {}]",
            jump_violations, config.min_radius, config.max_horizontal_jump
        ),
    ));
    results.push(check(
        "platforms_tiers_ascend",
        tier_order_violations == 0,
        format!("{} tier height inversions", tier_order_violations),
    ));

    if verbose && tally.ok > 0 {
        println!(
            "  avg {:.2} platforms/level",
            total_platforms as f32 / tally.ok as f32
        );
    }

    results
}

// ── 4. Decoration sweep ─────────────────────────────────────────────────

fn validate_decorations(config: &LevelConfig, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Decorations ({} seeds) ---", seeds);
    let mut results = Vec::new();

    let mut tally = SweepTally::default();
    let mut slot_violations = 0;
    let mut floor_count_mismatch = 0;
    let mut low_doors = 0;
    let mut missing_doors = 0;
    let mut key_collisions = 0;

    for seed in 0..seeds {
        let outcome = generate_seeded(config, seed);
        tally.record(seed, &outcome);
        let layout = match outcome {
            Ok((_, l)) => l,
            Err(_) => continue,
        };

        if layout.floor_used.len() > layout.floor.len()
            || layout.platform_used.len() > layout.platforms.len()
            || layout.floor_used.iter().any(|i| i >= layout.floor.len())
            || layout.platform_used.iter().any(|i| i >= layout.platforms.len())
        {
            slot_violations += 1;
        }

        let floor_traps = layout
            .floor_cells()
            .filter(|c| c.kind == ObjectKind::Trap)
            .count();
        let floor_coins = layout
            .floor_cells()
            .filter(|c| c.kind == ObjectKind::Coin)
            .count();
        if floor_traps != config.floor_traps as usize || floor_coins != config.floor_coins as usize
        {
            floor_count_mismatch += 1;
        }

        match layout.door {
            Some(door) if door.position.y < layout.bounds.door_threshold() => low_doors += 1,
            Some(_) => {}
            None => missing_doors += 1,
        }
        key_collisions += layout
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::KeyCollision { .. }))
            .count();
    }

    results.push(check(
        "decor_enough_slots",
        tally.passed(),
        format!(
            "{}/{} runs ran out of platform slots ({:.1}%)",
            tally.slot_shortfalls,
            tally.runs,
            tally.rate(tally.slot_shortfalls)
        ),
    ));
    results.push(check(
        "decor_used_slots_bounded",
        slot_violations == 0,
        format!("{} levels with out-of-range used slots", slot_violations),
    ));
    results.push(check(
        "decor_floor_counts",
        floor_count_mismatch == 0,
        format!(
            "{}/{} levels with exactly {} floor traps and {} floor coins",
            tally.ok - floor_count_mismatch,
            tally.ok,
            config.floor_traps,
            config.floor_coins
        ),
    ));
    results.push(check(
        "decor_door_height",
        low_doors == 0,
        format!("{} doors below the threshold", low_doors),
    ));

    if verbose {
        println!(
            "  {} levels without a door, {} key collisions",
            missing_doors, key_collisions
        );
    }

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    // A failed run still places objects, and must fail the same way
    let run = |seed: u64| -> (Vec<(ObjectKind, Vec3)>, Option<GenerationError>) {
        let mut scene = CheckingScene::new(config);
        let mut rng = StdRng::seed_from_u64(seed);
        let error = Generator::new(config.clone())
            .run(&mut scene, &mut rng)
            .err();
        (scene.placed, error)
    };

    let first = run(config.seed);
    let second = run(config.seed);
    results.push(check(
        "same_seed_same_level",
        !first.0.is_empty() && first == second,
        format!(
            "{} placements replayed{}",
            first.0.len(),
            first
                .1
                .as_ref()
                .map_or(String::new(), |e| format!(", both runs failed with: {}", e))
        ),
    ));

    // The engine clears the previous level before regenerating
    let mut engine = LevelEngine::new(config.clone());
    let mut stale = 0;
    for seed in 0..5 {
        if let Ok(layout) = engine.generate_with_seed(seed) {
            let live = layout.walls.len() + layout.platforms.len();
            if engine.object_count() != live {
                stale += 1;
            }
        }
    }
    results.push(check(
        "regenerate_no_stale_objects",
        stale == 0,
        format!("{} regenerations left stale objects", stale),
    ));

    if verbose {
        println!("  seed {}", config.seed);
    }

    results
}

// ── 6. Error paths ──────────────────────────────────────────────────────

fn validate_error_paths(config: &LevelConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Error Paths ---");
    let mut results = Vec::new();

    let impossible = LevelConfig {
        max_attempts: 1,
        min_radius: config.max_horizontal_jump + 1.0,
        ..config.clone()
    };
    let outcome = generate_seeded(&impossible, 0);
    results.push(check(
        "impossible_geometry",
        matches!(outcome, Err(GenerationError::InsufficientSpace { .. })),
        match outcome {
            Err(e) => e.to_string(),
            Ok(_) => "generated a level".into(),
        },
    ));

    let bounds = RoomBounds::new(
        config.prefabs.wall.unwrap_or(Vec3::ONE),
        config.room_length,
        config.room_width,
        config.room_height,
    );
    let floor_cells = build_room(&mut SceneWorld::new(&config.prefabs), &bounds, &config.compat)
        .floor
        .len();
    // Same seed as a level that succeeds, so the platforms fit and the floor
    // pass is reached
    match (0..64).find(|&seed| generate_seeded(config, seed).is_ok()) {
        Some(seed) => {
            let overdraw = LevelConfig {
                floor_traps: floor_cells as u32 + 1,
                ..config.clone()
            };
            let outcome = generate_seeded(&overdraw, seed);
            results.push(check(
                "floor_trap_overdraw",
                matches!(
                    outcome,
                    Err(GenerationError::Configuration(ConfigError::NotEnoughSlots { .. }))
                ),
                match outcome {
                    Err(e) => format!("seed {}: {}", seed, e),
                    Ok(_) => "generated a level".into(),
                },
            ));
        }
        None => results.push(check(
            "floor_trap_overdraw",
            false,
            "no seed in 0..64 produced a level".into(),
        )),
    }

    let mut missing = config.clone();
    missing.prefabs.platform = None;
    let outcome = generate_seeded(&missing, 0);
    results.push(check(
        "missing_platform_prefab",
        matches!(
            outcome,
            Err(GenerationError::Configuration(ConfigError::MissingPrefab(
                ObjectKind::Platform
            )))
        ),
        match outcome {
            Err(e) => e.to_string(),
            Ok(_) => "generated a level".into(),
        },
    ));

    results
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn generate_seeded(
    config: &LevelConfig,
    seed: u64,
) -> Result<(SceneWorld, LevelLayout), GenerationError> {
    let mut scene = SceneWorld::new(&config.prefabs);
    let mut rng = StdRng::seed_from_u64(seed);
    let layout = Generator::new(config.clone()).run(&mut scene, &mut rng)?;
    Ok((scene, layout))
}

fn print_summary_json(config: &LevelConfig) {
    match generate_seeded(config, config.seed) {
        Ok((_, layout)) => match serde_json::to_string_pretty(&layout.summary()) {
            Ok(json) => println!("\n{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        },
        Err(e) => log::error!("No level to summarize: {}", e),
    }
}

/// Scene wrapper that records placements and flags platforms placed onto
/// occupied space.
struct CheckingScene {
    inner: SceneWorld,
    radius: f32,
    placed: Vec<(ObjectKind, Vec3)>,
    overlapping_platforms: usize,
}

impl CheckingScene {
    fn new(config: &LevelConfig) -> Self {
        Self {
            inner: SceneWorld::new(&config.prefabs),
            radius: config.prefabs.wall.map_or(1.0, |c| c.y),
            placed: Vec::new(),
            overlapping_platforms: 0,
        }
    }
}

impl SpatialOracle for CheckingScene {
    fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        self.inner.overlaps(center, radius)
    }
}

impl PlacementSink for CheckingScene {
    fn place(&mut self, kind: ObjectKind, position: Vec3) -> Handle {
        if kind == ObjectKind::Platform && self.inner.overlaps(position, self.radius) {
            log::warn!("Platform at {} overlaps an existing object", position);
            self.overlapping_platforms += 1;
        }
        self.placed.push((kind, position));
        self.inner.place(kind, position)
    }

    fn remove(&mut self, handle: Handle) -> bool {
        self.inner.remove(handle)
    }
}
