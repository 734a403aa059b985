use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    error::ScenarioError,
    inventory::Inventory,
    settlement::{Settlement, SettlementConfig},
    spatial::{MapBounds, Position},
    structure::{Blueprint, Catalog},
    town::Town,
};

fn default_dt_days() -> f64 {
    1.0
}

fn default_snapshot_interval_days() -> u64 {
    10
}

fn default_collects_per_day() -> u32 {
    2
}

fn default_build_attempts_per_day() -> u32 {
    1
}

fn default_map_extent() -> f32 {
    100.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_dt_days")]
    pub dt_days: f64,
    #[serde(default)]
    pub days: Option<u64>,
    #[serde(default = "default_snapshot_interval_days")]
    pub snapshot_interval_days: u64,
    #[serde(default)]
    pub settlement: SettlementConfig,
    #[serde(default)]
    pub start: StartingState,
    pub blueprints: Vec<Blueprint>,
    #[serde(default)]
    pub structures: Vec<InitialStructure>,
    #[serde(default)]
    pub steward: StewardConfig,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StartingState {
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub happiness: i64,
    #[serde(default)]
    pub inventory: Inventory,
}

/// Structure that already stands when the session begins.
#[derive(Debug, Clone, Deserialize)]
pub struct InitialStructure {
    pub blueprint: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StewardConfig {
    #[serde(default = "default_collects_per_day")]
    pub collects_per_day: u32,
    #[serde(default = "default_build_attempts_per_day")]
    pub build_attempts_per_day: u32,
    #[serde(default = "default_map_extent")]
    pub map_width: f32,
    #[serde(default = "default_map_extent")]
    pub map_height: f32,
}

impl Default for StewardConfig {
    fn default() -> Self {
        Self {
            collects_per_day: default_collects_per_day(),
            build_attempts_per_day: default_build_attempts_per_day(),
            map_width: default_map_extent(),
            map_height: default_map_extent(),
        }
    }
}

impl StewardConfig {
    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.map_width, self.map_height)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text).context("invalid scenario YAML")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.dt_days.is_finite() && self.dt_days > 0.0) {
            return Err(ScenarioError::Validation(format!(
                "dt_days must be positive, got {}",
                self.dt_days
            )));
        }
        self.settlement.validate()?;

        if self.blueprints.is_empty() {
            return Err(ScenarioError::Validation(
                "scenario must define at least one blueprint".into(),
            ));
        }

        let mut names = HashSet::new();
        for blueprint in &self.blueprints {
            if !names.insert(blueprint.name.as_str()) {
                return Err(ScenarioError::Validation(format!(
                    "blueprint '{}' defined more than once",
                    blueprint.name
                )));
            }
            if blueprint.node.is_some() && blueprint.producer.is_some() {
                return Err(ScenarioError::Validation(format!(
                    "blueprint '{}' cannot be both a resource node and a resource building",
                    blueprint.name
                )));
            }
        }

        for structure in &self.structures {
            if !names.contains(structure.blueprint.as_str()) {
                return Err(ScenarioError::Validation(format!(
                    "structure references unknown blueprint '{}'",
                    structure.blueprint
                )));
            }
        }

        Ok(())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.blueprints.clone())
    }

    /// Seed the starting structures, then seat the starting population.
    pub fn build_town(&self) -> Result<Town, ScenarioError> {
        let catalog = self.catalog();
        let mut settlement = Settlement::new(self.settlement.clone());
        for initial in &self.structures {
            let blueprint = catalog.get(&initial.blueprint).ok_or_else(|| {
                ScenarioError::Validation(format!("unknown blueprint '{}'", initial.blueprint))
            })?;
            settlement
                .seed_structure(blueprint, Position::new(initial.x, initial.y))
                .map_err(|source| ScenarioError::Seed {
                    blueprint: initial.blueprint.clone(),
                    source,
                })?;
        }
        settlement.add_happiness(self.start.happiness);
        settlement.redistribute_population(self.start.population);
        Ok(Town::new(
            self.dt_days,
            settlement,
            self.start.inventory.clone(),
            catalog,
        ))
    }

    pub fn days(&self, override_days: Option<u64>) -> u64 {
        override_days.or(self.days).unwrap_or(30)
    }
}
