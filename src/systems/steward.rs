use anyhow::{Context, Result};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    error::SettlementError,
    rng::SystemRng,
    scenario::StewardConfig,
    town::Town,
};

/// Scripted stand-in for the player: empties resource buildings, works a few
/// resource nodes and tries to build at random spots.
pub struct StewardSystem {
    config: StewardConfig,
}

impl StewardSystem {
    pub fn new(config: StewardConfig) -> Self {
        Self { config }
    }

    fn collect(&self, town: &mut Town, rng: &mut SystemRng<'_>) -> Result<()> {
        for id in town.resource_buildings() {
            town.collect_resource_building(id)
                .with_context(|| format!("collecting resource building {id}"))?;
        }

        let mut nodes = town.resource_nodes();
        for _ in 0..self.config.collects_per_day {
            if nodes.is_empty() {
                break;
            }
            let index = rng.gen_range(0..nodes.len());
            let report = town
                .collect_resource_node(nodes[index])
                .with_context(|| format!("collecting resource node {}", nodes[index]))?;
            if report.depleted {
                nodes.swap_remove(index);
            }
        }
        Ok(())
    }

    fn build(&self, ctx: &SystemContext, town: &mut Town, rng: &mut SystemRng<'_>) -> Result<()> {
        let names: Vec<String> = town
            .catalog()
            .buildable()
            .into_iter()
            .map(|bp| bp.name.clone())
            .collect();
        let bounds = self.config.bounds();
        for _ in 0..self.config.build_attempts_per_day {
            let Some(name) = names.choose(rng) else {
                break;
            };
            let position = bounds.sample(rng);
            match town.place(name, position) {
                Ok(_) => {}
                Err(
                    err @ (SettlementError::PlacementTooClose { .. }
                    | SettlementError::InsufficientResources { .. }),
                ) => debug!(day = ctx.day, "{err}"),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl System for StewardSystem {
    fn name(&self) -> &str {
        "steward"
    }

    fn run(&mut self, ctx: &SystemContext, town: &mut Town, rng: &mut SystemRng<'_>) -> Result<()> {
        self.collect(town, rng)?;
        self.build(ctx, town, rng)
    }
}
