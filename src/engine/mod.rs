use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::{
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    town::{Town, TownSnapshot},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_days: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_days,
            ),
            settings: self.settings,
        }
    }
}

/// Runs the registered systems once per in-game day.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, town: &mut Town, days: u64) -> Result<()> {
        self.run_with_hook(town, days, |_| {})
    }

    /// Like [`Engine::run`], handing the end-of-day snapshot to `hook`.
    pub fn run_with_hook<F>(&mut self, town: &mut Town, days: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(TownSnapshot),
    {
        for _ in 0..days {
            town.begin_day();
            let ctx = SystemContext {
                day: town.day(),
                dt_days: town.dt_days(),
                scenario_name: &self.settings.scenario_name,
            };
            for system in &mut self.systems {
                let mut rng_stream = self.rng.stream(system.name());
                system.run(&ctx, town, &mut rng_stream)?;
            }
            town.advance_day();

            let snapshot = town.snapshot(&self.settings.scenario_name);
            info!(
                day = snapshot.day,
                population = snapshot.population,
                happiness = snapshot.happiness,
                mood = ?snapshot.mood,
                structures = snapshot.structures.len(),
                "day complete"
            );
            self.snapshot_writer.maybe_write(&snapshot)?;
            hook(snapshot);
        }
        Ok(())
    }
}

pub struct SystemContext<'a> {
    pub day: u64,
    pub dt_days: f64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &SystemContext, town: &mut Town, rng: &mut SystemRng<'_>)
        -> Result<()>;
}
