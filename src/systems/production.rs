use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    town::Town,
};

/// Resource buildings accrue their daily output, scaled by the production boost.
pub struct ProductionSystem;

impl ProductionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProductionSystem {
    fn name(&self) -> &str {
        "production"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        town: &mut Town,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let produced = town.produce();
        debug!(
            day = ctx.day,
            produced,
            boost = town.settlement().production_boost(),
            "production accrued"
        );
        Ok(())
    }
}
