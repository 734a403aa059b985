//! Structures and the blueprints they are built from.
//!
//! A structure is described by its capabilities rather than by a type
//! hierarchy: it may carry a housing facet, a collectible facet, both or
//! neither. The settlement queries those facets when it places, collects or
//! removes a structure.

use serde::{Deserialize, Serialize};

use crate::inventory::{Cost, ResourceKind};
use crate::spatial::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingSpec {
    pub capacity: u32,
}

/// Finite deposit that yields a fixed amount per charge until exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub resource: ResourceKind,
    pub charges: u32,
    pub yield_per_charge: u32,
}

impl ResourceNode {
    /// Remove up to `requested` charges and return `(charges_removed, yield)`.
    pub fn remove_charges(&mut self, requested: u32) -> (u32, u32) {
        let removed = requested.min(self.charges);
        self.charges -= removed;
        (removed, removed.saturating_mul(self.yield_per_charge))
    }

    pub fn is_depleted(&self) -> bool {
        self.charges == 0
    }
}

/// Building that accumulates stock every day until collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBuilding {
    pub resource: ResourceKind,
    #[serde(default)]
    pub stock: u32,
    pub rate_per_day: u32,
    pub max_stock: u32,
}

impl ResourceBuilding {
    /// Accrue `days` of output scaled by `1 + boost`; returns the amount added.
    pub fn produce(&mut self, days: f64, boost: f32) -> u32 {
        let scaled = f64::from(self.rate_per_day) * days * (1.0 + f64::from(boost));
        let produced = scaled.round().max(0.0) as u32;
        let before = self.stock;
        self.stock = self.stock.saturating_add(produced).min(self.max_stock);
        self.stock.saturating_sub(before)
    }

    pub fn take_stock(&mut self) -> u32 {
        std::mem::take(&mut self.stock)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collectible {
    Node(ResourceNode),
    Producer(ResourceBuilding),
}

/// Template a structure is instantiated from. Loaded from the scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    #[serde(default)]
    pub cost: Cost,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub happiness: i64,
    #[serde(default)]
    pub production_boost: f32,
    #[serde(default)]
    pub housing: Option<HousingSpec>,
    #[serde(default)]
    pub node: Option<ResourceNode>,
    #[serde(default)]
    pub producer: Option<ResourceBuilding>,
}

impl Blueprint {
    pub fn named(name: impl Into<String>, cost: Cost, score: i64) -> Self {
        Self {
            name: name.into(),
            cost,
            score,
            happiness: 0,
            production_boost: 0.0,
            housing: None,
            node: None,
            producer: None,
        }
    }

    pub fn with_housing(mut self, capacity: u32) -> Self {
        self.housing = Some(HousingSpec { capacity });
        self
    }

    pub fn with_happiness(mut self, happiness: i64) -> Self {
        self.happiness = happiness;
        self
    }

    pub fn with_production_boost(mut self, boost: f32) -> Self {
        self.production_boost = boost;
        self
    }

    pub fn with_node(mut self, resource: ResourceKind, charges: u32, yield_per_charge: u32) -> Self {
        self.node = Some(ResourceNode {
            resource,
            charges,
            yield_per_charge,
        });
        self
    }

    pub fn with_producer(mut self, resource: ResourceKind, rate_per_day: u32, max_stock: u32) -> Self {
        self.producer = Some(ResourceBuilding {
            resource,
            stock: 0,
            rate_per_day,
            max_stock,
        });
        self
    }

    fn collectible(&self) -> Option<Collectible> {
        self.node
            .clone()
            .map(Collectible::Node)
            .or_else(|| self.producer.clone().map(Collectible::Producer))
    }

    pub fn instantiate(&self, position: Position) -> Structure {
        Structure {
            kind: self.name.clone(),
            position,
            cost: self.cost,
            score: self.score,
            happiness: self.happiness,
            production_boost: self.production_boost,
            housing: self.housing,
            collectible: self.collectible(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: String,
    pub position: Position,
    pub cost: Cost,
    pub score: i64,
    pub happiness: i64,
    pub production_boost: f32,
    pub housing: Option<HousingSpec>,
    pub collectible: Option<Collectible>,
}

impl Structure {
    pub fn is_house(&self) -> bool {
        self.housing.is_some()
    }

    pub fn capacity(&self) -> u32 {
        self.housing.map(|h| h.capacity).unwrap_or(0)
    }
}

/// Named blueprints available to the town, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    blueprints: Vec<Blueprint>,
}

impl Catalog {
    pub fn new(blueprints: Vec<Blueprint>) -> Self {
        Self { blueprints }
    }

    pub fn get(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|bp| bp.name == name)
    }

    /// Blueprints a player can build; resource nodes are world features only.
    pub fn buildable(&self) -> Vec<&Blueprint> {
        self.blueprints.iter().filter(|bp| bp.node.is_none()).collect()
    }
}
