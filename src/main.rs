use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rebuild::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{PopulationSystem, ProductionSystem, StewardSystem},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Settlement economy runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/hamlet.yaml")]
    scenario: PathBuf,

    /// Override day count (uses scenario default when omitted)
    #[arg(long)]
    days: Option<u64>,

    /// Override snapshot interval in days
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .init();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let mut town = scenario.build_town()?;
    let days = scenario.days(cli.days);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_days);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));
    info!(scenario = %scenario.name, seed = scenario.seed, days, "scenario loaded");

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_days: snapshot_interval,
        snapshot_dir,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(ProductionSystem::new())
        .with_system(StewardSystem::new(scenario.steward.clone()))
        .with_system(PopulationSystem::new())
        .build();

    engine.run(&mut town, days)?;
    let settlement = town.settlement();
    println!(
        "Scenario '{}' completed after {} days. Population: {}, happiness: {}, building score: {}, structures: {}",
        scenario.name,
        days,
        settlement.population(),
        settlement.happiness(),
        settlement.building_score(),
        settlement.registry().len()
    );
    Ok(())
}
