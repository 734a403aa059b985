pub mod engine;
pub mod error;
pub mod inventory;
pub mod rng;
pub mod scenario;
pub mod settlement;
pub mod snapshot;
pub mod spatial;
pub mod structure;
pub mod systems;
pub mod town;

pub use error::{ScenarioError, SettlementError};
pub use scenario::{Scenario, ScenarioLoader};
pub use settlement::{Settlement, SettlementConfig};
pub use town::Town;
