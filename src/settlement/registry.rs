use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::Position;
use crate::structure::Structure;

/// Registry slot of a placed structure. Slots are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureId(u32);

impl StructureId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only sequence of placed structures.
///
/// Positions live inside the structures themselves, so distance queries walk
/// the same slots that placement appends to.
#[derive(Debug, Clone)]
pub struct StructureRegistry {
    min_distance: f32,
    slots: Vec<Option<Structure>>,
}

impl StructureRegistry {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            slots: Vec::new(),
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Distance from `position` to the closest live structure.
    pub fn nearest_distance(&self, position: Position) -> Option<f32> {
        self.iter()
            .map(|(_, structure)| structure.position.distance(position))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// False when any structure sits strictly closer than the minimum separation.
    pub fn can_place_at(&self, position: Position) -> bool {
        self.iter()
            .all(|(_, structure)| structure.position.distance(position) >= self.min_distance)
    }

    pub fn register(&mut self, structure: Structure) -> StructureId {
        let id = StructureId(self.slots.len() as u32);
        self.slots.push(Some(structure));
        id
    }

    pub fn remove(&mut self, id: StructureId) -> Option<Structure> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    pub fn contains(&self, id: StructureId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: StructureId) -> Option<&Structure> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Live structures in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (StructureId, &Structure)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|s| (StructureId(index as u32), s)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StructureId, &mut Structure)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|s| (StructureId(index as u32), s)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
