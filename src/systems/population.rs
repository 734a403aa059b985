use anyhow::Result;
use tracing::info;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    town::Town,
};

/// Once per day, let population follow happiness and reseat residents.
pub struct PopulationSystem;

impl PopulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PopulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PopulationSystem {
    fn name(&self) -> &str {
        "population"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        town: &mut Town,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let report = town.adjust_population();
        if report.previous != report.seated {
            info!(
                day = ctx.day,
                mood = ?report.mood,
                from = report.previous,
                to = report.seated,
                discarded = report.discarded,
                "population changed"
            );
        }
        Ok(())
    }
}
