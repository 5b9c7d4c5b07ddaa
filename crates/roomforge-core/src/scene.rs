//! Scene interfaces - how the generator talks to whatever hosts the level.
//!
//! The generator never instantiates or queries anything itself. It asks a
//! [`SpatialOracle`] whether a volume is free and tells a [`PlacementSink`]
//! to materialize or discard objects. [`SceneWorld`] implements both over a
//! `hecs` world so the generator can run headless.

use std::collections::HashMap;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::{Footprint, ObjectKind, Placed, Position, Vec3};
use crate::config::Prefabs;

/// Opaque reference to a materialized object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub u64);

/// Answers "is anything already here?"
pub trait SpatialOracle {
    /// True if any existing occupant intersects the sphere.
    fn overlaps(&self, center: Vec3, radius: f32) -> bool;
}

/// Materializes and discards level objects.
pub trait PlacementSink {
    fn place(&mut self, kind: ObjectKind, position: Vec3) -> Handle;

    /// Returns false if the handle was already gone.
    fn remove(&mut self, handle: Handle) -> bool;
}

/// Headless scene: every placed object is an entity with
/// `Placed`, `Position` and `Footprint` components.
pub struct SceneWorld {
    /// ECS world containing all placed objects
    pub world: World,
    footprints: HashMap<ObjectKind, Vec3>,
}

impl SceneWorld {
    /// Objects of a kind without a prefab footprint get a unit cube.
    pub fn new(prefabs: &Prefabs) -> Self {
        let footprints = ObjectKind::ALL
            .iter()
            .map(|&kind| (kind, prefabs.footprint(kind).unwrap_or(Vec3::ONE)))
            .collect();
        Self {
            world: World::new(),
            footprints,
        }
    }

    /// Number of live objects of the given kind.
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.world
            .query::<&Placed>()
            .iter()
            .filter(|(_, placed)| placed.kind == kind)
            .count()
    }

    /// Total live objects.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Kind and position of a live object.
    pub fn get(&self, handle: Handle) -> Option<(ObjectKind, Vec3)> {
        let entity = entity_from_handle(handle)?;
        let placed = self.world.get::<&Placed>(entity).ok()?;
        let position = self.world.get::<&Position>(entity).ok()?;
        Some((placed.kind, position.0))
    }

    pub fn contains(&self, handle: Handle) -> bool {
        entity_from_handle(handle).is_some_and(|e| self.world.contains(e))
    }
}

impl SpatialOracle for SceneWorld {
    fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        self.world
            .query::<(&Position, &Footprint)>()
            .iter()
            .any(|(_, (pos, fp))| fp.bounds_at(pos.0).intersects_sphere(&center, radius))
    }
}

impl PlacementSink for SceneWorld {
    fn place(&mut self, kind: ObjectKind, position: Vec3) -> Handle {
        let size = self.footprints.get(&kind).copied().unwrap_or(Vec3::ONE);
        let entity = self
            .world
            .spawn((Placed { kind }, Position(position), Footprint(size)));
        Handle(entity.to_bits().get())
    }

    fn remove(&mut self, handle: Handle) -> bool {
        match entity_from_handle(handle) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }
}

fn entity_from_handle(handle: Handle) -> Option<Entity> {
    Entity::from_bits(handle.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove() {
        let mut scene = SceneWorld::new(&Prefabs::default());
        let h = scene.place(ObjectKind::Platform, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(scene.count(ObjectKind::Platform), 1);
        assert_eq!(
            scene.get(h),
            Some((ObjectKind::Platform, Vec3::new(2.0, 2.0, 2.0)))
        );
        assert!(scene.remove(h));
        assert!(!scene.contains(h));
        assert!(!scene.remove(h), "second removal must report a stale handle");
        assert!(scene.is_empty());
    }

    #[test]
    fn test_overlap_uses_footprints() {
        let mut scene = SceneWorld::new(&Prefabs::default());
        scene.place(ObjectKind::Wall, Vec3::ZERO);
        // Unit cube spans -0.5..0.5
        assert!(scene.overlaps(Vec3::new(1.0, 0.0, 0.0), 0.6));
        assert!(!scene.overlaps(Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(!scene.overlaps(Vec3::new(0.0, 3.0, 0.0), 1.0));
    }

    #[test]
    fn test_removed_objects_no_longer_overlap() {
        let mut scene = SceneWorld::new(&Prefabs::default());
        let h = scene.place(ObjectKind::Coin, Vec3::new(3.0, 3.0, 3.0));
        assert!(scene.overlaps(Vec3::new(3.0, 3.0, 3.0), 0.5));
        scene.remove(h);
        assert!(!scene.overlaps(Vec3::new(3.0, 3.0, 3.0), 0.5));
    }

    #[test]
    fn test_garbage_handle() {
        let mut scene = SceneWorld::new(&Prefabs::default());
        assert!(!scene.remove(Handle(0)));
        assert_eq!(scene.get(Handle(0)), None);
    }
}
