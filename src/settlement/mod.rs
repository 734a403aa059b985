//! Settlement state engine: placement, collection and population balance.
//!
//! A [`Settlement`] owns the population/happiness counters, the registry of
//! placed structures and the housing ledger. Resource balances live in an
//! [`Inventory`] that the caller passes in, so the same settlement can be
//! driven by the day engine, by tests or by any other front end.
//!
//! Population follows happiness. The happiness percent is `happiness /
//! population`; below `sad_range` residents leave until the ratio recovers,
//! at or above `happy_range` newcomers arrive until it drops back. Whatever
//! the outcome, residents are then reseated across houses in registration
//! order and anyone without a bed is dropped.

mod housing;
mod registry;

pub use housing::{HousingLedger, HousingUnit};
pub use registry::{StructureId, StructureRegistry};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ScenarioError, SettlementError};
use crate::inventory::{Inventory, ResourceKind};
use crate::spatial::Position;
use crate::structure::{Blueprint, Collectible, Structure};

fn default_min_distance() -> f32 {
    5.0
}

fn default_sad_range() -> f64 {
    0.5
}

fn default_happy_range() -> f64 {
    0.9
}

fn default_node_charges_per_collect() -> u32 {
    1
}

fn default_max_convergence_steps() -> u32 {
    1_024
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    /// Below this happiness percent the town is sad.
    #[serde(default = "default_sad_range")]
    pub sad_range: f64,
    /// At or above this happiness percent the town is happy.
    #[serde(default = "default_happy_range")]
    pub happy_range: f64,
    #[serde(default = "default_node_charges_per_collect")]
    pub node_charges_per_collect: u32,
    /// Correction steps allowed after the closed-form population estimate.
    #[serde(default = "default_max_convergence_steps")]
    pub max_convergence_steps: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            sad_range: default_sad_range(),
            happy_range: default_happy_range(),
            node_charges_per_collect: default_node_charges_per_collect(),
            max_convergence_steps: default_max_convergence_steps(),
        }
    }
}

impl SettlementConfig {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            return Err(ScenarioError::Validation(format!(
                "min_distance must be a non-negative number, got {}",
                self.min_distance
            )));
        }
        if !(self.sad_range.is_finite() && self.sad_range > 0.0) {
            return Err(ScenarioError::Validation(format!(
                "sad_range must be positive, got {}",
                self.sad_range
            )));
        }
        if !(self.happy_range.is_finite() && self.happy_range > self.sad_range) {
            return Err(ScenarioError::Validation(format!(
                "happy_range ({}) must be greater than sad_range ({})",
                self.happy_range, self.sad_range
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementState {
    pub population: u32,
    pub happiness: i64,
    pub building_score: i64,
    pub production_boost: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sad,
    Normal,
    Happy,
}

/// Outcome of one [`Settlement::adjust_population`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationReport {
    pub mood: Mood,
    pub previous: u32,
    /// Population the happiness ratio converged on, before the housing clamp.
    pub target: u32,
    pub seated: u32,
    /// Residents dropped for lack of housing.
    pub discarded: u32,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectReport {
    pub structure: StructureId,
    pub resource: ResourceKind,
    pub amount: u32,
    /// Charges spent; zero for resource buildings.
    pub charges_removed: u32,
    pub depleted: bool,
}

pub struct Settlement {
    config: SettlementConfig,
    state: SettlementState,
    registry: StructureRegistry,
    housing: HousingLedger,
}

impl Settlement {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            registry: StructureRegistry::new(config.min_distance),
            housing: HousingLedger::new(),
            state: SettlementState::default(),
            config,
        }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    pub fn housing(&self) -> &HousingLedger {
        &self.housing
    }

    pub fn population(&self) -> u32 {
        self.state.population
    }

    pub fn happiness(&self) -> i64 {
        self.state.happiness
    }

    pub fn building_score(&self) -> i64 {
        self.state.building_score
    }

    pub fn production_boost(&self) -> f32 {
        self.state.production_boost
    }

    /// Validate, pay for and register a structure built from `blueprint`.
    ///
    /// Distance is checked before cost; a rejected placement changes nothing.
    pub fn place_building(
        &mut self,
        blueprint: &Blueprint,
        position: Position,
        inventory: &mut Inventory,
    ) -> Result<StructureId, SettlementError> {
        self.check_position(blueprint, position)?;
        if !inventory.spend(&blueprint.cost) {
            debug!(kind = %blueprint.name, cost = %blueprint.cost, "placement rejected: unaffordable");
            return Err(SettlementError::InsufficientResources {
                kind: blueprint.name.clone(),
                required: blueprint.cost,
                available: inventory.as_cost(),
            });
        }
        let id = self.insert(blueprint.instantiate(position));
        info!(
            id = %id,
            kind = %blueprint.name,
            %position,
            building_score = self.state.building_score,
            "structure placed"
        );
        Ok(id)
    }

    /// Register a pre-existing structure without charging for it.
    pub fn seed_structure(
        &mut self,
        blueprint: &Blueprint,
        position: Position,
    ) -> Result<StructureId, SettlementError> {
        self.check_position(blueprint, position)?;
        Ok(self.insert(blueprint.instantiate(position)))
    }

    fn check_position(&self, blueprint: &Blueprint, position: Position) -> Result<(), SettlementError> {
        if self.registry.can_place_at(position) {
            return Ok(());
        }
        let nearest = self.registry.nearest_distance(position).unwrap_or(0.0);
        debug!(kind = %blueprint.name, %position, nearest, "placement rejected: too close");
        Err(SettlementError::PlacementTooClose {
            kind: blueprint.name.clone(),
            position,
            nearest,
            min_distance: self.registry.min_distance(),
        })
    }

    fn insert(&mut self, structure: Structure) -> StructureId {
        let score = structure.score;
        let happiness = structure.happiness;
        let boost = structure.production_boost;
        let capacity = structure.housing.map(|h| h.capacity);
        let id = self.registry.register(structure);
        if let Some(capacity) = capacity {
            self.housing.add(id, capacity);
        }
        self.add_building_score(score);
        self.add_happiness(happiness);
        self.add_production_boost(boost);
        id
    }

    /// Demolish a structure, reversing everything it contributed on placement.
    pub fn remove_structure(&mut self, id: StructureId) -> Result<Structure, SettlementError> {
        let structure = self
            .registry
            .remove(id)
            .ok_or(SettlementError::UnknownStructure(id))?;
        self.subtract_building_score(structure.score);
        self.subtract_happiness(structure.happiness);
        self.subtract_production_boost(structure.production_boost);
        if self.housing.remove(id).is_some() {
            self.redistribute_population(self.state.population);
        }
        Ok(structure)
    }

    /// Spend charges on a resource node and credit what they yield.
    pub fn collect_resource_node(
        &mut self,
        id: StructureId,
        inventory: &mut Inventory,
    ) -> Result<CollectReport, SettlementError> {
        let per_collect = self.config.node_charges_per_collect;
        let structure = self
            .registry
            .get_mut(id)
            .ok_or(SettlementError::UnknownStructure(id))?;
        let Some(Collectible::Node(node)) = structure.collectible.as_mut() else {
            return Err(SettlementError::NotCollectible {
                id,
                expected: "resource node",
            });
        };
        let (charges_removed, amount) = node.remove_charges(per_collect);
        let resource = node.resource;
        let depleted = node.is_depleted();
        inventory.add(resource, amount);
        if depleted {
            debug!(id = %id, "resource node depleted");
            self.remove_structure(id)?;
        }
        Ok(CollectReport {
            structure: id,
            resource,
            amount,
            charges_removed,
            depleted,
        })
    }

    /// Move a resource building's accumulated stock into the inventory.
    pub fn collect_resource_building(
        &mut self,
        id: StructureId,
        inventory: &mut Inventory,
    ) -> Result<CollectReport, SettlementError> {
        let structure = self
            .registry
            .get_mut(id)
            .ok_or(SettlementError::UnknownStructure(id))?;
        let Some(Collectible::Producer(building)) = structure.collectible.as_mut() else {
            return Err(SettlementError::NotCollectible {
                id,
                expected: "resource building",
            });
        };
        let amount = building.take_stock();
        let resource = building.resource;
        inventory.add(resource, amount);
        Ok(CollectReport {
            structure: id,
            resource,
            amount,
            charges_removed: 0,
            depleted: false,
        })
    }

    /// Accrue `days` of output in every resource building; returns the total added.
    pub fn produce(&mut self, days: f64) -> u32 {
        let boost = self.state.production_boost;
        self.registry
            .iter_mut()
            .filter_map(|(_, structure)| match structure.collectible.as_mut() {
                Some(Collectible::Producer(building)) => Some(building.produce(days, boost)),
                _ => None,
            })
            .fold(0u32, u32::saturating_add)
    }

    /// `happiness / population`, or `None` while nobody lives here.
    pub fn happiness_percent(&self) -> Option<f64> {
        (self.state.population > 0)
            .then(|| self.state.happiness as f64 / f64::from(self.state.population))
    }

    /// An empty town counts as happy when it has any happiness to offer.
    pub fn mood(&self) -> Mood {
        let sad = self.config.sad_range;
        let happy = self.config.happy_range;
        match self.happiness_percent() {
            Some(ratio) if ratio < sad => Mood::Sad,
            Some(ratio) if ratio >= happy => Mood::Happy,
            Some(_) => Mood::Normal,
            None if self.state.happiness > 0 => Mood::Happy,
            None => Mood::Normal,
        }
    }

    /// Move population toward the normal happiness band, then reseat everyone.
    pub fn adjust_population(&mut self) -> PopulationReport {
        let previous = self.state.population;
        if previous == 0 {
            debug!(happiness = self.state.happiness, "happiness ratio undefined for empty town");
        }
        let mood = self.mood();
        let target = match mood {
            Mood::Sad => self.shrink_target(),
            Mood::Happy => self.grow_target(),
            Mood::Normal => previous,
        };
        let collapsed = target == 0;
        if collapsed {
            warn!(previous, happiness = self.state.happiness, "lost all population");
        }
        let seated = self.redistribute_population(target);
        PopulationReport {
            mood,
            previous,
            target,
            seated,
            discarded: target - seated,
            collapsed,
        }
    }

    /// Largest population not above the current one whose ratio clears
    /// `sad_range`, or zero when none does.
    fn shrink_target(&self) -> u32 {
        let happiness = self.state.happiness;
        let current = self.state.population;
        let sad = self.config.sad_range;
        if happiness <= 0 {
            return 0;
        }
        let mut steps = self.config.max_convergence_steps;
        let mut exhausted = false;
        let mut pop = ((happiness as f64 / sad).floor() as u32).min(current);
        while pop > 0 && ratio(happiness, pop) < sad {
            if steps == 0 {
                exhausted = true;
                break;
            }
            pop -= 1;
            steps -= 1;
        }
        while !exhausted && pop < current && ratio(happiness, pop + 1) >= sad {
            if steps == 0 {
                exhausted = true;
                break;
            }
            pop += 1;
            steps -= 1;
        }
        if exhausted {
            warn!(pop, "population shrink hit the convergence step limit");
        }
        pop
    }

    /// Smallest population not below the current one whose ratio falls to
    /// `happy_range`.
    fn grow_target(&self) -> u32 {
        let happiness = self.state.happiness;
        let current = self.state.population;
        let happy = self.config.happy_range;
        if happiness <= 0 {
            return current;
        }
        let mut steps = self.config.max_convergence_steps;
        let mut exhausted = false;
        let mut pop = ((happiness as f64 / happy).ceil() as u32).max(current);
        while pop < u32::MAX && ratio(happiness, pop) > happy {
            if steps == 0 {
                exhausted = true;
                break;
            }
            pop += 1;
            steps -= 1;
        }
        while !exhausted && pop > current && ratio(happiness, pop - 1) <= happy {
            if steps == 0 {
                exhausted = true;
                break;
            }
            pop -= 1;
            steps -= 1;
        }
        if exhausted {
            warn!(pop, "population growth hit the convergence step limit");
        }
        pop
    }

    /// Clamp to housing capacity, store it as the population and seat residents.
    pub fn redistribute_population(&mut self, population: u32) -> u32 {
        let clamped = population.min(self.housing.total_capacity());
        self.state.population = clamped;
        self.housing.redistribute(clamped)
    }

    pub fn add_happiness(&mut self, amount: i64) {
        self.state.happiness += amount;
    }

    pub fn subtract_happiness(&mut self, amount: i64) {
        self.state.happiness -= amount;
    }

    pub fn add_building_score(&mut self, score: i64) {
        self.state.building_score += score;
    }

    pub fn subtract_building_score(&mut self, score: i64) {
        self.state.building_score -= score;
    }

    pub fn add_production_boost(&mut self, amount: f32) {
        self.state.production_boost += amount;
    }

    pub fn subtract_production_boost(&mut self, amount: f32) {
        self.state.production_boost -= amount;
    }
}

fn ratio(happiness: i64, population: u32) -> f64 {
    if population == 0 {
        return match happiness.signum() {
            1 => f64::INFINITY,
            -1 => f64::NEG_INFINITY,
            _ => 0.0,
        };
    }
    happiness as f64 / f64::from(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Cost;

    fn config(sad_range: f64, happy_range: f64) -> SettlementConfig {
        SettlementConfig {
            sad_range,
            happy_range,
            ..SettlementConfig::default()
        }
    }

    fn workshop() -> Blueprint {
        Blueprint::named("workshop", Cost::new(30, 20, 0), 12)
    }

    fn house(capacity: u32) -> Blueprint {
        Blueprint::named("house", Cost::default(), 5).with_housing(capacity)
    }

    /// Settlement with one house per capacity, laid out far apart.
    fn housed(config: SettlementConfig, capacities: &[u32]) -> Settlement {
        let mut settlement = Settlement::new(config);
        for (i, &capacity) in capacities.iter().enumerate() {
            settlement
                .seed_structure(&house(capacity), Position::new(i as f32 * 100.0, 0.0))
                .unwrap();
        }
        settlement
    }

    #[test]
    fn placement_succeeds_and_charges_exact_cost() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        settlement
            .seed_structure(&house(4), Position::new(0.0, 0.0))
            .unwrap();
        let score_before = settlement.building_score();
        let mut inventory = Inventory::new(100, 50, 0);

        let id = settlement
            .place_building(&workshop(), Position::new(10.0, 0.0), &mut inventory)
            .expect("placement should succeed");

        assert_eq!(inventory, Inventory::new(70, 30, 0));
        assert_eq!(settlement.building_score(), score_before + 12);
        assert_eq!(settlement.registry().get(id).unwrap().kind, "workshop");
        assert_eq!(settlement.registry().len(), 2);
    }

    #[test]
    fn placement_too_close_changes_nothing() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        settlement
            .seed_structure(&house(4), Position::new(0.0, 0.0))
            .unwrap();
        let mut inventory = Inventory::new(100, 50, 0);

        let err = settlement
            .place_building(&workshop(), Position::new(2.0, 0.0), &mut inventory)
            .unwrap_err();

        assert!(matches!(err, SettlementError::PlacementTooClose { nearest, .. } if nearest == 2.0));
        assert_eq!(inventory, Inventory::new(100, 50, 0));
        assert_eq!(settlement.registry().len(), 1);
        assert_eq!(settlement.building_score(), 5);
    }

    #[test]
    fn distance_is_checked_before_cost() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        settlement
            .seed_structure(&house(4), Position::new(0.0, 0.0))
            .unwrap();
        let mut broke = Inventory::default();

        let err = settlement
            .place_building(&workshop(), Position::new(1.0, 1.0), &mut broke)
            .unwrap_err();
        assert!(matches!(err, SettlementError::PlacementTooClose { .. }));
    }

    #[test]
    fn unaffordable_placement_changes_nothing() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        let mut inventory = Inventory::new(100, 10, 0);

        let err = settlement
            .place_building(&workshop(), Position::new(0.0, 0.0), &mut inventory)
            .unwrap_err();

        assert!(matches!(err, SettlementError::InsufficientResources { .. }));
        assert_eq!(inventory, Inventory::new(100, 10, 0));
        assert!(settlement.registry().is_empty());
        assert_eq!(settlement.building_score(), 0);
    }

    #[test]
    fn placed_structures_keep_min_distance_pairwise() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        let mut inventory = Inventory::new(u32::MAX, u32::MAX, u32::MAX);
        let free = Blueprint::named("marker", Cost::default(), 0);
        for step in 0..60 {
            let position = Position::new((step * 7 % 23) as f32, (step * 3 % 17) as f32);
            let _ = settlement.place_building(&free, position, &mut inventory);
        }

        let positions: Vec<_> = settlement.registry().iter().map(|(_, s)| s.position).collect();
        assert!(positions.len() > 1);
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) >= 5.0);
            }
        }
    }

    #[test]
    fn houses_join_the_ledger_and_contribute_bonuses() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        let mut inventory = Inventory::default();
        let tavern = Blueprint::named("tavern", Cost::default(), 8)
            .with_happiness(15)
            .with_production_boost(0.25);

        let home = settlement
            .place_building(&house(6), Position::new(0.0, 0.0), &mut inventory)
            .unwrap();
        settlement
            .place_building(&tavern, Position::new(10.0, 0.0), &mut inventory)
            .unwrap();

        assert_eq!(settlement.housing().len(), 1);
        assert_eq!(settlement.housing().total_capacity(), 6);
        assert!(settlement.registry().contains(home));
        assert_eq!(settlement.happiness(), 15);
        assert_eq!(settlement.production_boost(), 0.25);
        assert_eq!(settlement.building_score(), 13);
    }

    #[test]
    fn redistribution_clamps_to_capacity() {
        let mut settlement = housed(SettlementConfig::default(), &[4, 6, 3]);

        assert_eq!(settlement.redistribute_population(50), 13);
        assert_eq!(settlement.population(), 13);
        assert_eq!(settlement.housing().total_occupation(), 13);

        assert_eq!(settlement.redistribute_population(5), 5);
        let occupations: Vec<_> = settlement.housing().iter().map(|u| u.occupation).collect();
        assert_eq!(occupations, vec![4, 1, 0]);
    }

    #[test]
    fn redistribution_is_idempotent() {
        let mut settlement = housed(SettlementConfig::default(), &[3, 3, 3]);
        settlement.redistribute_population(7);
        let first: Vec<_> = settlement.housing().iter().copied().collect();

        settlement.redistribute_population(settlement.population());
        let second: Vec<_> = settlement.housing().iter().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn happy_town_grows_until_ratio_reaches_threshold() {
        let mut settlement = housed(config(0.5, 0.9), &[200]);
        settlement.redistribute_population(10);
        settlement.add_happiness(80);

        let report = settlement.adjust_population();

        assert_eq!(report.mood, Mood::Happy);
        assert_eq!(report.target, 89);
        assert_eq!(settlement.population(), 89);
        assert!(80.0 / 89.0 <= 0.9_f64);
        assert!(80.0 / 88.0 > 0.9_f64);
        assert!(!report.collapsed);
    }

    #[test]
    fn normal_town_keeps_population() {
        let mut settlement = housed(config(0.3, 0.6), &[150]);
        settlement.redistribute_population(100);
        settlement.add_happiness(50);

        let report = settlement.adjust_population();

        assert_eq!(report.mood, Mood::Normal);
        assert_eq!(report.target, 100);
        assert_eq!(settlement.population(), 100);
    }

    #[test]
    fn sad_town_shrinks_to_the_sad_threshold() {
        let mut settlement = housed(config(0.5, 0.9), &[150]);
        settlement.redistribute_population(100);
        settlement.add_happiness(20);

        let report = settlement.adjust_population();

        assert_eq!(report.mood, Mood::Sad);
        assert_eq!(settlement.population(), 40);
    }

    #[test]
    fn closed_form_rounding_is_corrected() {
        // 3 / 0.1 floors to 29 in floating point although 3 / 30 == 0.1.
        let mut settlement = housed(config(0.1, 0.9), &[150]);
        settlement.redistribute_population(100);
        settlement.add_happiness(3);

        settlement.adjust_population();

        assert_eq!(settlement.population(), 30);
    }

    #[test]
    fn closed_form_alone_without_correction_steps() {
        let no_steps = SettlementConfig {
            max_convergence_steps: 0,
            ..config(0.1, 0.9)
        };

        let mut growing = housed(no_steps.clone(), &[200]);
        growing.redistribute_population(10);
        growing.add_happiness(80);
        assert_eq!(growing.adjust_population().target, 89);

        // Without a correction step the floored estimate stands, still within
        // the current population and still above the sad threshold.
        let mut shrinking = housed(no_steps, &[150]);
        shrinking.redistribute_population(100);
        shrinking.add_happiness(3);
        let report = shrinking.adjust_population();
        assert_eq!(report.mood, Mood::Sad);
        assert_eq!(report.target, 29);
        assert!(report.target <= report.previous);
        assert!(3.0 / f64::from(report.target) >= 0.1);
    }

    #[test]
    fn miserable_town_collapses() {
        let mut settlement = housed(config(0.5, 0.9), &[20]);
        settlement.redistribute_population(20);
        settlement.subtract_happiness(4);

        let report = settlement.adjust_population();

        assert!(report.collapsed);
        assert_eq!(settlement.population(), 0);
        assert_eq!(settlement.housing().total_occupation(), 0);
    }

    #[test]
    fn growth_is_limited_by_housing() {
        let mut settlement = housed(config(0.5, 0.9), &[10, 15]);
        settlement.redistribute_population(10);
        settlement.add_happiness(80);

        let report = settlement.adjust_population();

        assert_eq!(report.target, 89);
        assert_eq!(report.seated, 25);
        assert_eq!(report.discarded, 64);
        assert_eq!(settlement.population(), 25);
    }

    #[test]
    fn empty_town_with_happiness_grows() {
        let mut settlement = housed(config(0.5, 0.9), &[50]);
        settlement.add_happiness(9);

        assert_eq!(settlement.happiness_percent(), None);
        assert_eq!(settlement.mood(), Mood::Happy);
        let report = settlement.adjust_population();

        assert_eq!(report.target, 10);
        assert_eq!(settlement.population(), 10);
    }

    #[test]
    fn empty_joyless_town_stays_empty() {
        let mut settlement = housed(config(0.5, 0.9), &[50]);

        let report = settlement.adjust_population();

        assert_eq!(report.mood, Mood::Normal);
        assert_eq!(settlement.population(), 0);
        assert!(report.collapsed);
    }

    #[test]
    fn node_collection_credits_and_depletes() {
        let config = SettlementConfig {
            node_charges_per_collect: 2,
            ..SettlementConfig::default()
        };
        let mut settlement = Settlement::new(config);
        let grove = Blueprint::named("grove", Cost::default(), 0).with_node(ResourceKind::Wood, 3, 20);
        let id = settlement.seed_structure(&grove, Position::new(0.0, 0.0)).unwrap();
        let mut inventory = Inventory::default();

        let first = settlement.collect_resource_node(id, &mut inventory).unwrap();
        assert_eq!((first.amount, first.charges_removed, first.depleted), (40, 2, false));

        let second = settlement.collect_resource_node(id, &mut inventory).unwrap();
        assert_eq!((second.amount, second.charges_removed, second.depleted), (20, 1, true));
        assert_eq!(inventory.wood, 60);
        assert!(!settlement.registry().contains(id));
        assert_eq!(
            settlement.collect_resource_node(id, &mut inventory),
            Err(SettlementError::UnknownStructure(id))
        );
    }

    #[test]
    fn building_collection_empties_stock() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        let quarry = Blueprint::named("quarry", Cost::default(), 3)
            .with_producer(ResourceKind::Stone, 10, 100);
        let id = settlement.seed_structure(&quarry, Position::new(0.0, 0.0)).unwrap();
        settlement.add_production_boost(0.5);
        let mut inventory = Inventory::default();

        assert_eq!(settlement.produce(2.0), 30);
        let report = settlement.collect_resource_building(id, &mut inventory).unwrap();

        assert_eq!(report.amount, 30);
        assert_eq!(inventory.stone, 30);
        assert_eq!(settlement.collect_resource_building(id, &mut inventory).unwrap().amount, 0);
        assert!(matches!(
            settlement.collect_resource_node(id, &mut inventory),
            Err(SettlementError::NotCollectible { .. })
        ));
    }

    #[test]
    fn removing_a_house_reseats_residents() {
        let mut settlement = housed(SettlementConfig::default(), &[4, 6]);
        settlement.redistribute_population(10);
        let first = settlement.housing().iter().next().unwrap().structure;

        let removed = settlement.remove_structure(first).unwrap();

        assert!(removed.is_house());
        assert_eq!(settlement.population(), 6);
        assert_eq!(settlement.housing().total_occupation(), 6);
        assert_eq!(settlement.building_score(), 5);
        assert!(settlement
            .housing()
            .iter()
            .all(|unit| settlement.registry().contains(unit.structure)));
    }

    #[test]
    fn mutators_apply_plain_deltas() {
        let mut settlement = Settlement::new(SettlementConfig::default());
        settlement.subtract_happiness(7);
        settlement.add_happiness(2);
        settlement.subtract_building_score(3);
        settlement.add_production_boost(0.5);
        settlement.subtract_production_boost(0.25);

        assert_eq!(settlement.happiness(), -5);
        assert_eq!(settlement.building_score(), -3);
        assert_eq!(settlement.production_boost(), 0.25);
    }

    #[test]
    fn config_rejects_inverted_thresholds() {
        assert!(config(0.9, 0.5).validate().is_err());
        assert!(config(0.0, 0.5).validate().is_err());
        assert!(config(0.5, 0.9).validate().is_ok());
    }
}
