use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Wood,
    Stone,
    Magic,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Wood, ResourceKind::Stone, ResourceKind::Magic];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Magic => "magic",
        };
        f.write_str(label)
    }
}

/// Price of a structure, one amount per resource.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    #[serde(default)]
    pub wood: u32,
    #[serde(default)]
    pub stone: u32,
    #[serde(default)]
    pub magic: u32,
}

impl Cost {
    pub const fn new(wood: u32, stone: u32, magic: u32) -> Self {
        Self { wood, stone, magic }
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Magic => self.magic,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wood={} stone={} magic={}",
            self.wood, self.stone, self.magic
        )
    }
}

/// Resource balances held by the town.
///
/// `remove` does not refuse an overdraw; it saturates at zero. Callers that
/// must not lose resources go through [`Inventory::spend`], which checks every
/// balance before touching any of them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub wood: u32,
    #[serde(default)]
    pub stone: u32,
    #[serde(default)]
    pub magic: u32,
}

impl Inventory {
    pub fn new(wood: u32, stone: u32, magic: u32) -> Self {
        Self { wood, stone, magic }
    }

    pub fn balance(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Magic => self.magic,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Magic => &mut self.magic,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    pub fn remove(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.slot_mut(kind);
        if amount > *slot {
            warn!(
                resource = %kind,
                balance = *slot,
                requested = amount,
                "inventory overdraw clamped at zero"
            );
        }
        *slot = slot.saturating_sub(amount);
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.balance(kind) >= cost.amount(kind))
    }

    /// Deduct `cost` only if every balance covers it; otherwise nothing changes.
    pub fn spend(&mut self, cost: &Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for kind in ResourceKind::ALL {
            self.remove(kind, cost.amount(kind));
        }
        true
    }

    pub fn as_cost(&self) -> Cost {
        Cost::new(self.wood, self.stone, self.magic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_is_all_or_nothing() {
        let mut inventory = Inventory::new(100, 10, 0);

        assert!(!inventory.spend(&Cost::new(30, 20, 0)));
        assert_eq!(inventory, Inventory::new(100, 10, 0));

        assert!(inventory.spend(&Cost::new(30, 10, 0)));
        assert_eq!(inventory, Inventory::new(70, 0, 0));
    }

    #[test]
    fn magic_shortfall_blocks_spend() {
        let mut inventory = Inventory::new(500, 500, 4);
        assert!(!inventory.can_afford(&Cost::new(0, 0, 5)));
        assert!(!inventory.spend(&Cost::new(1, 1, 5)));
        assert_eq!(inventory.wood, 500);
    }

    #[test]
    fn remove_saturates() {
        let mut inventory = Inventory::new(5, 0, 0);
        inventory.remove(ResourceKind::Wood, 8);
        assert_eq!(inventory.balance(ResourceKind::Wood), 0);
    }

    #[test]
    fn add_credits_the_named_resource() {
        let mut inventory = Inventory::default();
        inventory.add(ResourceKind::Stone, 12);
        inventory.add(ResourceKind::Magic, 3);
        assert_eq!(inventory.as_cost(), Cost::new(0, 12, 3));
    }
}
