//! Decoration allocator - swaps generated floor cells and platforms for traps,
//! coins, the key and the exit door.
//!
//! Every replacement removes the slot's current handle, places the new kind
//! at the same position and overwrites the slot in place. A [`UsedSlots`] set
//! per candidate list keeps a slot from being decorated twice.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::{Placement, Platform};
use crate::components::ObjectKind;
use crate::error::ConfigError;
use crate::scene::PlacementSink;

/// Indices of a candidate list that already hold a decoration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSlots {
    indices: BTreeSet<usize>,
}

impl UsedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the index was already marked.
    pub fn mark(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Unmarked indices of a list of `len` slots, ascending.
    pub fn unused(&self, len: usize) -> Vec<usize> {
        (0..len).filter(|i| !self.indices.contains(i)).collect()
    }
}

/// A list of decoratable slots.
pub trait SlotList {
    fn slot_count(&self) -> usize;
    fn slot(&self, index: usize) -> &Placement;
    fn slot_mut(&mut self, index: usize) -> &mut Placement;
}

impl SlotList for [Platform] {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn slot(&self, index: usize) -> &Placement {
        &self[index].placement
    }

    fn slot_mut(&mut self, index: usize) -> &mut Placement {
        &mut self[index].placement
    }
}

/// Floor cells viewed through their indices into the wall list, so a
/// decorated floor cell is also updated in the wall list.
pub struct FloorSlots<'a> {
    pub walls: &'a mut [Placement],
    pub floor: &'a [usize],
}

impl SlotList for FloorSlots<'_> {
    fn slot_count(&self) -> usize {
        self.floor.len()
    }

    fn slot(&self, index: usize) -> &Placement {
        &self.walls[self.floor[index]]
    }

    fn slot_mut(&mut self, index: usize) -> &mut Placement {
        &mut self.walls[self.floor[index]]
    }
}

/// Replace one slot in place and return the new placement.
pub fn replace_slot<S, L>(sink: &mut S, slots: &mut L, index: usize, kind: ObjectKind) -> Placement
where
    S: PlacementSink + ?Sized,
    L: SlotList + ?Sized,
{
    debug_assert!(kind.is_decoration(), "{} is not a decoration", kind);
    let old = *slots.slot(index);
    if !sink.remove(old.handle) {
        log::warn!("Slot {} held a stale {} handle {:?}", index, old.kind, old.handle);
    }
    let placement = Placement {
        handle: sink.place(kind, old.position),
        kind,
        position: old.position,
    };
    *slots.slot_mut(index) = placement;
    log::debug!("Replaced {} with {} at {}", old.kind, kind, old.position);
    placement
}

/// Decorate `count` distinct, previously unused slots with `kind`.
///
/// The unused indices are collected once and sampled without replacement,
/// so this always terminates. Asking for more than are free is an error and
/// leaves every slot untouched.
pub fn replace_random_unique<S, L, R>(
    sink: &mut S,
    rng: &mut R,
    slots: &mut L,
    count: usize,
    kind: ObjectKind,
    used: &mut UsedSlots,
) -> Result<usize, ConfigError>
where
    S: PlacementSink + ?Sized,
    L: SlotList + ?Sized,
    R: Rng + ?Sized,
{
    let mut free = used.unused(slots.slot_count());
    if count > free.len() {
        return Err(ConfigError::NotEnoughSlots {
            kind,
            requested: count,
            available: free.len(),
        });
    }

    let (picked, _) = free.partial_shuffle(rng, count);
    for &index in picked.iter() {
        replace_slot(sink, slots, index, kind);
        used.mark(index);
    }
    Ok(count)
}

/// Where the key went
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDrop {
    pub index: usize,
    pub placement: Placement,
    /// Kind that was overwritten when the draw hit an already-used slot
    pub collided_with: Option<ObjectKind>,
}

/// Put the key on one uniformly drawn platform.
///
/// A single draw over all platforms, with no retry: it can land on a slot
/// that is already decorated, in which case that decoration is overwritten.
pub fn place_key<S, R>(
    sink: &mut S,
    rng: &mut R,
    platforms: &mut [Platform],
    used: &mut UsedSlots,
) -> Option<KeyDrop>
where
    S: PlacementSink + ?Sized,
    R: Rng + ?Sized,
{
    if platforms.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..platforms.len());
    let collided_with = used
        .contains(index)
        .then(|| platforms[index].placement.kind);
    let placement = replace_slot(sink, platforms, index, ObjectKind::Key);
    used.mark(index);
    Some(KeyDrop {
        index,
        placement,
        collided_with,
    })
}

/// Put the exit door on the first platform, scanning forward from the middle
/// of the list, whose height reaches `min_height`. Returns `None` when no
/// platform in that range qualifies.
pub fn place_door<S>(
    sink: &mut S,
    platforms: &mut [Platform],
    used: &mut UsedSlots,
    min_height: f32,
) -> Option<(usize, Placement)>
where
    S: PlacementSink + ?Sized,
{
    let start = platforms.len() / 2;
    let index = (start..platforms.len()).find(|&i| platforms[i].position().y >= min_height)?;
    let placement = replace_slot(sink, platforms, index, ObjectKind::Door);
    used.mark(index);
    Some((index, placement))
}
