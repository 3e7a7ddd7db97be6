use std::fmt;

use camber_types::FeatureId;
use serde::{Deserialize, Serialize};
use sketch_store::{Sketch, StoreError};
use solid_kernel::ArtifactHandle;

/// The kind of a feature, derivable from its params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Sketch,
    Extrude,
    Cut,
    Revolve,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeatureKind::Sketch => "Sketch",
            FeatureKind::Extrude => "Extrude",
            FeatureKind::Cut => "Cut",
            FeatureKind::Revolve => "Revolve",
        };
        f.write_str(label)
    }
}

/// Parameters of a feature, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureParams {
    /// A sketch owns its entity store; sketches are user-edited, never
    /// computed.
    Sketch { sketch: Sketch },
    Extrude { sketch: FeatureId, depth: f64 },
    Cut {
        sketch: FeatureId,
        base: FeatureId,
        depth: f64,
    },
    Revolve {
        sketch: FeatureId,
        axis_origin: [f64; 2],
        axis_direction: [f64; 2],
        angle_degrees: f64,
    },
}

impl FeatureParams {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureParams::Sketch { .. } => FeatureKind::Sketch,
            FeatureParams::Extrude { .. } => FeatureKind::Extrude,
            FeatureParams::Cut { .. } => FeatureKind::Cut,
            FeatureParams::Revolve { .. } => FeatureKind::Revolve,
        }
    }
}

/// Regeneration status of a feature.
///
/// Valid becomes NeedsUpdate when a dependency or its own parameters
/// change. Regeneration moves NeedsUpdate to Valid on success and to Failed
/// on error; a retry can recover Failed. Disabling freezes the feature as
/// Suppressed until re-enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Valid,
    NeedsUpdate,
    Failed,
    Suppressed,
}

/// A single feature in the parametric design history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub name: String,
    pub params: FeatureParams,
    pub status: Status,
    /// Ids of features this one depends on; always positioned earlier in
    /// the graph, so storage order is a topological order.
    pub parents: Vec<FeatureId>,
    /// Kernel solid produced by the last successful regeneration.
    /// Runtime-only, not persisted.
    #[serde(skip)]
    pub artifact: Option<ArtifactHandle>,
    /// Message from the last failed regeneration.
    pub last_error: Option<String>,
    pub enabled: bool,
    pub visible: bool,
}

/// Validation errors from graph operations. Returned at the call site with
/// no mutation performed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("feature not found: {id}")]
    FeatureNotFound { id: FeatureId },

    #[error("feature {id} is not a sketch")]
    NotASketch { id: FeatureId },

    #[error("feature {id} carries no artifact to cut from")]
    MissingBaseArtifact { id: FeatureId },
}

/// Errors from command execution, undo, and redo. The offending command is
/// discarded by the history rather than left in an indeterminate state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("command target not found: {what}")]
    TargetNotFound { what: String },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("params kind does not match feature {id}")]
    KindMismatch { id: FeatureId },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
