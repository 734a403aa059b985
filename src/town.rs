use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::inventory::{Cost, Inventory, ResourceKind};
use crate::settlement::{
    CollectReport, HousingUnit, Mood, PopulationReport, Settlement, StructureId,
};
use crate::spatial::Position;
use crate::structure::{Catalog, Collectible};

/// Counters for what happened during the current day.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub placed: u32,
    pub rejected_too_close: u32,
    pub rejected_unaffordable: u32,
    pub gathered: Cost,
    pub produced: u32,
    pub population: Option<PopulationReport>,
}

impl DailyActivity {
    fn record_gather(&mut self, report: &CollectReport) {
        match report.resource {
            ResourceKind::Wood => {
                self.gathered.wood = self.gathered.wood.saturating_add(report.amount)
            }
            ResourceKind::Stone => {
                self.gathered.stone = self.gathered.stone.saturating_add(report.amount)
            }
            ResourceKind::Magic => {
                self.gathered.magic = self.gathered.magic.saturating_add(report.amount)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSnapshot {
    pub id: StructureId,
    pub kind: String,
    pub position: Position,
    /// Blueprint cost, also reported for structures seeded for free.
    pub cost: Cost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownSnapshot {
    pub scenario: String,
    pub day: u64,
    pub days_elapsed: f64,
    pub population: u32,
    pub happiness: i64,
    pub happiness_percent: Option<f64>,
    pub mood: Mood,
    pub building_score: i64,
    pub production_boost: f32,
    pub housing_capacity: u32,
    pub inventory: Inventory,
    pub structures: Vec<StructureSnapshot>,
    pub houses: Vec<HousingUnit>,
    pub activity: DailyActivity,
}

/// Everything one play session owns: the settlement, its resources and the
/// blueprints it can build from.
pub struct Town {
    day: u64,
    days_elapsed: f64,
    dt_days: f64,
    settlement: Settlement,
    inventory: Inventory,
    catalog: Catalog,
    activity: DailyActivity,
}

impl Town {
    pub fn new(dt_days: f64, settlement: Settlement, inventory: Inventory, catalog: Catalog) -> Self {
        Self {
            day: 0,
            days_elapsed: 0.0,
            dt_days,
            settlement,
            inventory,
            catalog,
            activity: DailyActivity::default(),
        }
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn dt_days(&self) -> f64 {
        self.dt_days
    }

    pub fn days_elapsed(&self) -> f64 {
        self.days_elapsed
    }

    pub fn begin_day(&mut self) {
        self.activity = DailyActivity::default();
    }

    pub fn advance_day(&mut self) {
        self.day += 1;
        self.days_elapsed += self.dt_days;
    }

    pub fn settlement(&self) -> &Settlement {
        &self.settlement
    }

    pub fn settlement_mut(&mut self) -> &mut Settlement {
        &mut self.settlement
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn activity(&self) -> &DailyActivity {
        &self.activity
    }

    /// Place a catalog blueprint, paying from the town inventory.
    pub fn place(&mut self, blueprint: &str, position: Position) -> Result<StructureId, SettlementError> {
        let blueprint = self
            .catalog
            .get(blueprint)
            .ok_or_else(|| SettlementError::UnknownBlueprint(blueprint.to_string()))?;
        let result = self
            .settlement
            .place_building(blueprint, position, &mut self.inventory);
        match &result {
            Ok(_) => self.activity.placed += 1,
            Err(SettlementError::PlacementTooClose { .. }) => self.activity.rejected_too_close += 1,
            Err(SettlementError::InsufficientResources { .. }) => {
                self.activity.rejected_unaffordable += 1
            }
            Err(_) => {}
        }
        result
    }

    pub fn collect_resource_node(&mut self, id: StructureId) -> Result<CollectReport, SettlementError> {
        let report = self
            .settlement
            .collect_resource_node(id, &mut self.inventory)?;
        self.activity.record_gather(&report);
        Ok(report)
    }

    pub fn collect_resource_building(
        &mut self,
        id: StructureId,
    ) -> Result<CollectReport, SettlementError> {
        let report = self
            .settlement
            .collect_resource_building(id, &mut self.inventory)?;
        self.activity.record_gather(&report);
        Ok(report)
    }

    pub fn produce(&mut self) -> u32 {
        let produced = self.settlement.produce(self.dt_days);
        self.activity.produced = self.activity.produced.saturating_add(produced);
        produced
    }

    pub fn adjust_population(&mut self) -> PopulationReport {
        let report = self.settlement.adjust_population();
        self.activity.population = Some(report);
        report
    }

    pub fn resource_nodes(&self) -> Vec<StructureId> {
        self.collectible_ids(|c| matches!(c, Collectible::Node(_)))
    }

    pub fn resource_buildings(&self) -> Vec<StructureId> {
        self.collectible_ids(|c| matches!(c, Collectible::Producer(_)))
    }

    fn collectible_ids(&self, keep: impl Fn(&Collectible) -> bool) -> Vec<StructureId> {
        self.settlement
            .registry()
            .iter()
            .filter(|(_, s)| s.collectible.as_ref().is_some_and(&keep))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn snapshot(&self, scenario: &str) -> TownSnapshot {
        let settlement = &self.settlement;
        TownSnapshot {
            scenario: scenario.to_string(),
            day: self.day,
            days_elapsed: self.days_elapsed,
            population: settlement.population(),
            happiness: settlement.happiness(),
            happiness_percent: settlement.happiness_percent(),
            mood: settlement.mood(),
            building_score: settlement.building_score(),
            production_boost: settlement.production_boost(),
            housing_capacity: settlement.housing().total_capacity(),
            inventory: self.inventory.clone(),
            structures: settlement
                .registry()
                .iter()
                .map(|(id, s)| StructureSnapshot {
                    id,
                    kind: s.kind.clone(),
                    position: s.position,
                    cost: s.cost,
                })
                .collect(),
            houses: settlement.housing().iter().copied().collect(),
            activity: self.activity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::SettlementConfig;
    use crate::structure::Blueprint;

    fn town() -> Town {
        let catalog = Catalog::new(vec![
            Blueprint::named("house", Cost::new(30, 20, 0), 10).with_housing(5),
            Blueprint::named("quarry", Cost::new(10, 0, 0), 4)
                .with_producer(ResourceKind::Stone, 6, 60),
        ]);
        let settlement = Settlement::new(SettlementConfig::default());
        Town::new(1.0, settlement, Inventory::new(100, 50, 0), catalog)
    }

    #[test]
    fn place_records_outcomes() {
        let mut town = town();

        town.place("house", Position::new(0.0, 0.0)).unwrap();
        assert!(town.place("house", Position::new(1.0, 0.0)).is_err());
        town.place("house", Position::new(20.0, 0.0)).unwrap();
        assert!(town.place("house", Position::new(40.0, 0.0)).is_err());

        let activity = town.activity();
        assert_eq!(activity.placed, 2);
        assert_eq!(activity.rejected_too_close, 1);
        assert_eq!(activity.rejected_unaffordable, 1);
        assert_eq!(town.inventory(), &Inventory::new(40, 10, 0));
    }

    #[test]
    fn unknown_blueprint_is_reported() {
        let mut town = town();
        assert_eq!(
            town.place("castle", Position::default()),
            Err(SettlementError::UnknownBlueprint("castle".into()))
        );
    }

    #[test]
    fn production_and_collection_are_tallied() {
        let mut town = town();
        let quarry = town.place("quarry", Position::new(0.0, 0.0)).unwrap();

        assert_eq!(town.produce(), 6);
        town.collect_resource_building(quarry).unwrap();

        assert_eq!(town.activity().gathered, Cost::new(0, 6, 0));
        assert_eq!(town.resource_buildings(), vec![quarry]);
        assert!(town.resource_nodes().is_empty());

        town.begin_day();
        assert_eq!(town.activity(), &DailyActivity::default());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut town = town();
        town.place("house", Position::new(0.0, 0.0)).unwrap();
        town.settlement_mut().redistribute_population(3);
        town.advance_day();

        let snapshot = town.snapshot("test");
        assert_eq!(snapshot.day, 1);
        assert_eq!(snapshot.population, 3);
        assert_eq!(snapshot.housing_capacity, 5);
        assert_eq!(snapshot.houses.len(), 1);
        assert_eq!(snapshot.structures[0].kind, "house");
        assert_eq!(snapshot.structures[0].cost, Cost::new(30, 20, 0));
    }

    #[test]
    fn gathered_totals_saturate_like_the_inventory() {
        let mut town = town();
        let spring = Blueprint::named("spring", Cost::default(), 0)
            .with_node(ResourceKind::Magic, 5, u32::MAX);
        let id = town
            .settlement_mut()
            .seed_structure(&spring, Position::new(50.0, 50.0))
            .unwrap();

        town.collect_resource_node(id).unwrap();
        town.collect_resource_node(id).unwrap();

        assert_eq!(town.activity().gathered.magic, u32::MAX);
        assert_eq!(town.inventory().magic, u32::MAX);
    }
}
