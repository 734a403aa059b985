use serde::{Deserialize, Serialize};

use super::registry::StructureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingUnit {
    pub structure: StructureId,
    pub capacity: u32,
    pub occupation: u32,
}

/// Houses in registration order with their current occupants.
#[derive(Debug, Default, Clone)]
pub struct HousingLedger {
    units: Vec<HousingUnit>,
}

impl HousingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, structure: StructureId, capacity: u32) {
        self.units.push(HousingUnit {
            structure,
            capacity,
            occupation: 0,
        });
    }

    pub fn remove(&mut self, structure: StructureId) -> Option<HousingUnit> {
        let index = self.units.iter().position(|u| u.structure == structure)?;
        Some(self.units.remove(index))
    }

    pub fn total_capacity(&self) -> u32 {
        self.units
            .iter()
            .fold(0u32, |total, unit| total.saturating_add(unit.capacity))
    }

    pub fn total_occupation(&self) -> u32 {
        self.units.iter().map(|unit| unit.occupation).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HousingUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Seat `target` residents, filling houses front to back.
    ///
    /// Anyone beyond total capacity is dropped. Returns the number seated.
    pub fn redistribute(&mut self, target: u32) -> u32 {
        let mut remaining = target;
        for unit in &mut self.units {
            let seated = remaining.min(unit.capacity);
            unit.occupation = seated;
            remaining -= seated;
        }
        target - remaining
    }
}
