//! Level engine - main entry point for generating a level

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::ObjectKind;
use crate::config::LevelConfig;
use crate::error::{Diagnostic, Result};
use crate::generation::{
    build_room, place_door, place_key, replace_random_unique, FloorSlots, LevelLayout,
    PlatformPlacer, PlacementRules, RoomBounds, UsedSlots,
};
use crate::scene::{PlacementSink, SceneWorld, SpatialOracle};

/// Runs the full pipeline for one configuration against any scene.
#[derive(Debug, Clone)]
pub struct Generator {
    config: LevelConfig,
}

impl Generator {
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Generate with an RNG seeded from `config.seed`.
    pub fn run_seeded<W>(&self, world: &mut W) -> Result<LevelLayout>
    where
        W: SpatialOracle + PlacementSink + ?Sized,
    {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.run(world, &mut rng)
    }

    /// Validate, build the room, place platforms, decorate.
    ///
    /// Fatal errors leave whatever was already placed in `world`.
    pub fn run<W, R>(&self, world: &mut W, rng: &mut R) -> Result<LevelLayout>
    where
        W: SpatialOracle + PlacementSink + ?Sized,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        config.validate()?;

        let cell_size = config.prefabs.require(ObjectKind::Wall)?;
        let platform_size = config.prefabs.require(ObjectKind::Platform)?;
        let bounds = RoomBounds::new(
            cell_size,
            config.room_length,
            config.room_width,
            config.room_height,
        );

        let shell = build_room(world, &bounds, &config.compat);
        let run = PlatformPlacer::new(PlacementRules::from(config), bounds, platform_size)
            .generate(world, rng)?;

        let mut layout = LevelLayout {
            bounds,
            walls: shell.walls,
            floor: shell.floor,
            platforms: run.platforms,
            floor_used: UsedSlots::new(),
            platform_used: UsedSlots::new(),
            key: None,
            door: None,
            diagnostics: run.diagnostics,
            coin_amount: config.coin_amount,
        };

        decorate(config, &mut layout, world, rng)?;

        log::info!(
            "Level generated: {} walls, {} platforms, {} traps, {} coins, door {}",
            layout.count(ObjectKind::Wall),
            layout.platforms.len(),
            layout.count(ObjectKind::Trap),
            layout.count(ObjectKind::Coin),
            if layout.door.is_some() { "placed" } else { "missing" }
        );

        Ok(layout)
    }
}

/// Door and key first, so traps and coins see their slots as used.
fn decorate<W, R>(
    config: &LevelConfig,
    layout: &mut LevelLayout,
    world: &mut W,
    rng: &mut R,
) -> Result<()>
where
    W: PlacementSink + ?Sized,
    R: Rng + ?Sized,
{
    let min_height = layout.bounds.door_threshold();
    let mut door_slot = None;
    match place_door(world, &mut layout.platforms, &mut layout.platform_used, min_height) {
        Some((index, door)) => {
            door_slot = Some(index);
            layout.door = Some(door);
        }
        None => report(&mut layout.diagnostics, Diagnostic::DoorNotPlaced { min_height }),
    }

    if let Some(drop) = place_key(world, rng, &mut layout.platforms, &mut layout.platform_used) {
        if let Some(replaced) = drop.collided_with {
            report(
                &mut layout.diagnostics,
                Diagnostic::KeyCollision {
                    slot: drop.index,
                    replaced,
                },
            );
            if door_slot == Some(drop.index) {
                layout.door = None;
                report(&mut layout.diagnostics, Diagnostic::DoorNotPlaced { min_height });
            }
        }
        layout.key = Some(drop.placement);
    }

    let passes = [
        (config.floor_traps, ObjectKind::Trap, true),
        (config.platform_traps, ObjectKind::Trap, false),
        (config.floor_coins, ObjectKind::Coin, true),
        (config.platform_coins, ObjectKind::Coin, false),
    ];
    for (count, kind, on_floor) in passes {
        if on_floor {
            let mut slots = FloorSlots {
                walls: &mut layout.walls,
                floor: &layout.floor,
            };
            replace_random_unique(
                world,
                rng,
                &mut slots,
                count as usize,
                kind,
                &mut layout.floor_used,
            )?;
        } else {
            replace_random_unique(
                world,
                rng,
                layout.platforms.as_mut_slice(),
                count as usize,
                kind,
                &mut layout.platform_used,
            )?;
        }
    }

    Ok(())
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Owns a headless scene and the last layout generated into it.
pub struct LevelEngine {
    /// Scene containing every placed object
    pub scene: SceneWorld,
    /// Layout of the last successful run
    pub layout: Option<LevelLayout>,
    config: LevelConfig,
}

impl LevelEngine {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            scene: SceneWorld::new(&config.prefabs),
            layout: None,
            config,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Clear the scene and generate from `config.seed`.
    pub fn generate(&mut self) -> Result<&LevelLayout> {
        let seed = self.config.seed;
        self.generate_with_seed(seed)
    }

    /// Clear the scene and generate from the given seed.
    pub fn generate_with_seed(&mut self, seed: u64) -> Result<&LevelLayout> {
        self.clear();
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = Generator::new(self.config.clone()).run(&mut self.scene, &mut rng)?;
        Ok(self.layout.insert(layout))
    }

    /// Despawn everything, including leftovers of a failed run.
    pub fn clear(&mut self) {
        self.scene.world.clear();
        self.layout = None;
    }

    /// Count live objects of a kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.scene.count(kind)
    }

    /// Count all live objects
    pub fn object_count(&self) -> usize {
        self.scene.len()
    }
}
