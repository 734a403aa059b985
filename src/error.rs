//! Error types for settlement operations and scenario loading.

use crate::inventory::Cost;
use crate::settlement::StructureId;
use crate::spatial::Position;

/// Recoverable failures of a settlement operation. None of them leave
/// partial state behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettlementError {
    /// Another structure sits strictly closer than the minimum separation.
    #[error("cannot place {kind} at {position}: nearest structure is {nearest:.2} away, minimum is {min_distance:.2}")]
    PlacementTooClose {
        kind: String,
        position: Position,
        nearest: f32,
        min_distance: f32,
    },

    /// At least one resource balance is below the blueprint cost.
    #[error("not enough resources to place {kind}: needs {required}, have {available}")]
    InsufficientResources {
        kind: String,
        required: Cost,
        available: Cost,
    },

    #[error("structure {0} not found")]
    UnknownStructure(StructureId),

    /// The structure exists but lacks the requested collectible facet.
    #[error("structure {id} is not a {expected}")]
    NotCollectible {
        id: StructureId,
        expected: &'static str,
    },

    #[error("unknown blueprint '{0}'")]
    UnknownBlueprint(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario validation error: {0}")]
    Validation(String),

    #[error("initial structure '{blueprint}' could not be placed")]
    Seed {
        blueprint: String,
        #[source]
        source: SettlementError,
    },
}
