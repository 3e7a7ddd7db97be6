pub mod command;
pub mod graph;
pub mod history;
pub mod regen;
pub mod types;

use camber_types::FeatureId;
use solid_kernel::SolidKernel;

pub use command::{Command, EntityClass, EntitySnapshot, EntitySpec, FeatureSpec};
pub use graph::FeatureGraph;
pub use history::{CommandHistory, EditCtx};
pub use types::{CommandError, Feature, FeatureKind, FeatureParams, GraphError, Status};

/// Default bound on the undo ring.
pub const DEFAULT_HISTORY_DEPTH: usize = 64;

/// The parametric edit engine facade.
///
/// Owns the feature graph and the command history; the solid-modeling
/// collaborator is passed into each operation, never owned.
pub struct Editor {
    pub graph: FeatureGraph,
    pub history: CommandHistory,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_history_depth(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_history_depth(max_depth: usize) -> Self {
        Self {
            graph: FeatureGraph::new(),
            history: CommandHistory::new(max_depth),
        }
    }

    pub fn execute(
        &mut self,
        cmd: Command,
        kernel: &mut dyn SolidKernel,
    ) -> Result<(), CommandError> {
        let mut ctx = EditCtx {
            graph: &mut self.graph,
            kernel,
        };
        self.history.execute(cmd, &mut ctx)
    }

    pub fn undo(&mut self, kernel: &mut dyn SolidKernel) -> Result<(), CommandError> {
        let mut ctx = EditCtx {
            graph: &mut self.graph,
            kernel,
        };
        self.history.undo(&mut ctx)
    }

    pub fn redo(&mut self, kernel: &mut dyn SolidKernel) -> Result<(), CommandError> {
        let mut ctx = EditCtx {
            graph: &mut self.graph,
            kernel,
        };
        self.history.redo(&mut ctx)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn regenerate_all(&mut self, kernel: &mut dyn SolidKernel) -> bool {
        self.graph.regenerate_all(kernel)
    }

    /// Synthesize a default display name: "Sketch 1", "Extrude 2", ...
    pub fn default_name(&self, kind: FeatureKind) -> String {
        format!("{} {}", kind, self.graph.count_by_kind(kind) + 1)
    }

    /// Add an empty sketch through the history, returning its id.
    pub fn add_sketch(&mut self, kernel: &mut dyn SolidKernel) -> Result<FeatureId, CommandError> {
        let name = self.default_name(FeatureKind::Sketch);
        let cmd = Command::add_feature(
            name,
            FeatureParams::Sketch {
                sketch: sketch_store::Sketch::new(),
            },
        );
        self.execute(cmd, kernel)?;
        self.last_feature_id()
    }

    /// Add an extrude through the history, returning its id.
    pub fn add_extrude(
        &mut self,
        sketch: FeatureId,
        depth: f64,
        kernel: &mut dyn SolidKernel,
    ) -> Result<FeatureId, CommandError> {
        let name = self.default_name(FeatureKind::Extrude);
        let cmd = Command::add_feature(name, FeatureParams::Extrude { sketch, depth });
        self.execute(cmd, kernel)?;
        self.last_feature_id()
    }

    /// Add a cut through the history, returning its id.
    pub fn add_cut(
        &mut self,
        sketch: FeatureId,
        base: FeatureId,
        depth: f64,
        kernel: &mut dyn SolidKernel,
    ) -> Result<FeatureId, CommandError> {
        let name = self.default_name(FeatureKind::Cut);
        let cmd = Command::add_feature(
            name,
            FeatureParams::Cut {
                sketch,
                base,
                depth,
            },
        );
        self.execute(cmd, kernel)?;
        self.last_feature_id()
    }

    /// Add a revolve through the history, returning its id.
    pub fn add_revolve(
        &mut self,
        sketch: FeatureId,
        axis_origin: [f64; 2],
        axis_direction: [f64; 2],
        angle_degrees: f64,
        kernel: &mut dyn SolidKernel,
    ) -> Result<FeatureId, CommandError> {
        let name = self.default_name(FeatureKind::Revolve);
        let cmd = Command::add_feature(
            name,
            FeatureParams::Revolve {
                sketch,
                axis_origin,
                axis_direction,
                angle_degrees,
            },
        );
        self.execute(cmd, kernel)?;
        self.last_feature_id()
    }

    /// Issue a Modify command changing an extrude's (or cut's) depth. Marks
    /// the feature stale; regeneration is the caller's separate step.
    pub fn change_extrude_depth(
        &mut self,
        id: FeatureId,
        depth: f64,
        kernel: &mut dyn SolidKernel,
    ) -> Result<(), CommandError> {
        let feature = self
            .graph
            .get(id)
            .ok_or(GraphError::FeatureNotFound { id })?;
        let new_params = match &feature.params {
            FeatureParams::Extrude { sketch, .. } => FeatureParams::Extrude {
                sketch: *sketch,
                depth,
            },
            FeatureParams::Cut { sketch, base, .. } => FeatureParams::Cut {
                sketch: *sketch,
                base: *base,
                depth,
            },
            _ => return Err(CommandError::KindMismatch { id }),
        };
        self.execute(Command::modify_feature(id, new_params), kernel)
    }

    fn last_feature_id(&self) -> Result<FeatureId, CommandError> {
        self.graph
            .features
            .last()
            .map(|f| f.id)
            .ok_or(CommandError::TargetNotFound {
                what: "appended feature".to_string(),
            })
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
