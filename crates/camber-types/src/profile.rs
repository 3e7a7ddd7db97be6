use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A chain of sketch entities traced from the sketch geometry.
///
/// Closed profiles are candidates for extrusion or revolution; open chains
/// are reported so callers can diagnose why a sketch produced no solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Ordered entity ids forming the chain.
    pub entity_ids: Vec<EntityId>,
    /// Whether the chain loops back to its starting point.
    pub closed: bool,
}

/// Result of running the constraint solver over a sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolveOutcome {
    /// All constraints satisfied; `dof` remaining degrees of freedom.
    Solved { dof: u32 },
    /// Constraints are contradictory.
    Inconsistent { conflicts: Vec<EntityId> },
    /// Solver failed to converge.
    NotConverged { reason: String },
}
