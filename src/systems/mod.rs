mod population;
mod production;
mod steward;

pub use population::PopulationSystem;
pub use production::ProductionSystem;
pub use steward::StewardSystem;
