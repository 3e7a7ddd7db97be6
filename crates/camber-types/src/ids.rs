use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a sketch entity (point, line, circle, arc, constraint).
///
/// Assigned monotonically by the owning store and never reused. Distinct from
/// the entity's array position, which shifts under insert/remove.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Stable identifier for a feature in the feature graph.
///
/// The graph's id counter stays strictly above every id ever issued,
/// including ids restored by redo.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}
