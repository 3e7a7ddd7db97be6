use camber_types::{
    Constraint, ConstraintKind, EntityId, FeatureId, SketchArc, SketchCircle, SketchLine,
    SketchPoint,
};
use sketch_store::Sketch;
use solid_kernel::SolidKernel;

use crate::graph::FeatureGraph;
use crate::types::{CommandError, Feature, FeatureKind, FeatureParams};

/// Data for a sketch entity about to be added, minus the id the store
/// assigns at execute time.
#[derive(Debug, Clone)]
pub enum EntitySpec {
    Point { x: f64, y: f64, fixed: bool },
    Line { start: EntityId, end: EntityId },
    Circle { center: EntityId, radius: f64 },
    Arc {
        center: EntityId,
        start: EntityId,
        end: EntityId,
        radius: f64,
    },
    Constraint { kind: ConstraintKind },
}

impl EntitySpec {
    pub fn class(&self) -> EntityClass {
        match self {
            EntitySpec::Point { .. } => EntityClass::Point,
            EntitySpec::Line { .. } => EntityClass::Line,
            EntitySpec::Circle { .. } => EntityClass::Circle,
            EntitySpec::Arc { .. } => EntityClass::Arc,
            EntitySpec::Constraint { .. } => EntityClass::Constraint,
        }
    }
}

/// Which entity collection inside a sketch a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    Point,
    Line,
    Circle,
    Arc,
    Constraint,
}

/// Full-value snapshot of a removed sketch entity, typed by collection.
#[derive(Debug, Clone)]
pub enum EntitySnapshot {
    Point(SketchPoint),
    Line(SketchLine),
    Circle(SketchCircle),
    Arc(SketchArc),
    Constraint(Constraint),
}

impl EntitySnapshot {
    pub fn id(&self) -> EntityId {
        match self {
            EntitySnapshot::Point(p) => p.id,
            EntitySnapshot::Line(l) => l.id,
            EntitySnapshot::Circle(c) => c.id,
            EntitySnapshot::Arc(a) => a.id,
            EntitySnapshot::Constraint(c) => c.id,
        }
    }
}

/// A feature about to be added, before the graph assigns its id.
#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub name: String,
    pub params: FeatureParams,
}

/// A reversible edit operation over sketch entities or features.
///
/// Each case stores enough identifying data to re-locate its target, the
/// storage index captured at execute time, and a full snapshot of anything
/// it deletes or overwrites. Cached indices stay valid between a command's
/// execute and its own undo/redo only because the history is strictly
/// linear and single-threaded.
///
/// Undo of every add-command removes by stable-id lookup; the recorded
/// index is used only by redo's positional re-insert.
#[derive(Debug, Clone)]
pub enum Command {
    AddEntity {
        sketch: FeatureId,
        spec: EntitySpec,
        /// Stable id assigned at execute time.
        entity_id: Option<EntityId>,
        /// Storage index the entity landed at, captured at execute time.
        entity_index: Option<usize>,
    },
    DeleteEntity {
        sketch: FeatureId,
        class: EntityClass,
        index: usize,
        snapshot: Option<EntitySnapshot>,
    },
    AddFeature {
        spec: FeatureSpec,
        feature_id: Option<FeatureId>,
        feature_index: Option<usize>,
        /// The undone feature, retained for redo's positional re-insert.
        removed: Option<Box<Feature>>,
    },
    DeleteFeature {
        index: usize,
        snapshot: Option<Box<Feature>>,
    },
    ModifyFeature {
        feature: FeatureId,
        old_params: Option<Box<FeatureParams>>,
        new_params: Box<FeatureParams>,
    },
}

impl Command {
    pub fn add_point(sketch: FeatureId, x: f64, y: f64, fixed: bool) -> Self {
        Self::add_entity(sketch, EntitySpec::Point { x, y, fixed })
    }

    pub fn add_line(sketch: FeatureId, start: EntityId, end: EntityId) -> Self {
        Self::add_entity(sketch, EntitySpec::Line { start, end })
    }

    pub fn add_circle(sketch: FeatureId, center: EntityId, radius: f64) -> Self {
        Self::add_entity(sketch, EntitySpec::Circle { center, radius })
    }

    pub fn add_arc(
        sketch: FeatureId,
        center: EntityId,
        start: EntityId,
        end: EntityId,
        radius: f64,
    ) -> Self {
        Self::add_entity(
            sketch,
            EntitySpec::Arc {
                center,
                start,
                end,
                radius,
            },
        )
    }

    pub fn add_constraint(sketch: FeatureId, kind: ConstraintKind) -> Self {
        Self::add_entity(sketch, EntitySpec::Constraint { kind })
    }

    pub fn add_entity(sketch: FeatureId, spec: EntitySpec) -> Self {
        Command::AddEntity {
            sketch,
            spec,
            entity_id: None,
            entity_index: None,
        }
    }

    pub fn delete_entity(sketch: FeatureId, class: EntityClass, index: usize) -> Self {
        Command::DeleteEntity {
            sketch,
            class,
            index,
            snapshot: None,
        }
    }

    pub fn add_feature(name: impl Into<String>, params: FeatureParams) -> Self {
        Command::AddFeature {
            spec: FeatureSpec {
                name: name.into(),
                params,
            },
            feature_id: None,
            feature_index: None,
            removed: None,
        }
    }

    pub fn delete_feature(index: usize) -> Self {
        Command::DeleteFeature {
            index,
            snapshot: None,
        }
    }

    pub fn modify_feature(feature: FeatureId, new_params: FeatureParams) -> Self {
        Command::ModifyFeature {
            feature,
            old_params: None,
            new_params: Box::new(new_params),
        }
    }

    /// Stable per-kind label for display.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddEntity { spec, .. } => match spec {
                EntitySpec::Point { .. } => "Add Point",
                EntitySpec::Line { .. } => "Add Line",
                EntitySpec::Circle { .. } => "Add Circle",
                EntitySpec::Arc { .. } => "Add Arc",
                EntitySpec::Constraint { .. } => "Add Constraint",
            },
            Command::DeleteEntity { class, .. } => match class {
                EntityClass::Point => "Delete Point",
                EntityClass::Line => "Delete Line",
                EntityClass::Circle => "Delete Circle",
                EntityClass::Arc => "Delete Arc",
                EntityClass::Constraint => "Delete Constraint",
            },
            Command::AddFeature { spec, .. } => match spec.params.kind() {
                FeatureKind::Sketch => "Add Sketch",
                FeatureKind::Extrude => "Add Extrude",
                FeatureKind::Cut => "Add Cut",
                FeatureKind::Revolve => "Add Revolve",
            },
            Command::DeleteFeature { .. } => "Delete Feature",
            Command::ModifyFeature { .. } => "Edit Feature",
        }
    }

    /// First application. Mutates the graph only after validation, so a
    /// failed apply leaves no partial state behind.
    pub fn apply(&mut self, graph: &mut FeatureGraph) -> Result<(), CommandError> {
        match self {
            Command::AddEntity {
                sketch,
                spec,
                entity_id,
                entity_index,
            } => {
                let store = sketch_store_mut(graph, *sketch)?;
                let (id, index) = match spec {
                    EntitySpec::Point { x, y, fixed } => {
                        let id = store.add_point(*x, *y, *fixed);
                        (id, store.points.len() - 1)
                    }
                    EntitySpec::Line { start, end } => {
                        let id = store.add_line(*start, *end)?;
                        (id, store.lines.len() - 1)
                    }
                    EntitySpec::Circle { center, radius } => {
                        let id = store.add_circle(*center, *radius)?;
                        (id, store.circles.len() - 1)
                    }
                    EntitySpec::Arc {
                        center,
                        start,
                        end,
                        radius,
                    } => {
                        let id = store.add_arc(*center, *start, *end, *radius)?;
                        (id, store.arcs.len() - 1)
                    }
                    EntitySpec::Constraint { kind } => {
                        let id = store.add_constraint(kind.clone());
                        (id, store.constraints.len() - 1)
                    }
                };
                *entity_id = Some(id);
                *entity_index = Some(index);
                Ok(())
            }

            Command::DeleteEntity {
                sketch,
                class,
                index,
                snapshot,
            } => {
                let store = sketch_store_mut(graph, *sketch)?;
                *snapshot = Some(remove_entity_at(store, *class, *index)?);
                Ok(())
            }

            Command::AddFeature {
                spec,
                feature_id,
                feature_index,
                ..
            } => {
                let id = match &spec.params {
                    FeatureParams::Sketch { sketch } => {
                        graph.add_sketch_with(spec.name.clone(), sketch.clone())
                    }
                    FeatureParams::Extrude { sketch, depth } => {
                        graph.add_extrude(*sketch, *depth, spec.name.clone())?
                    }
                    FeatureParams::Cut {
                        sketch,
                        base,
                        depth,
                    } => graph.add_cut(*sketch, *base, *depth, spec.name.clone())?,
                    FeatureParams::Revolve {
                        sketch,
                        axis_origin,
                        axis_direction,
                        angle_degrees,
                    } => graph.add_revolve(
                        *sketch,
                        *axis_origin,
                        *axis_direction,
                        *angle_degrees,
                        spec.name.clone(),
                    )?,
                };
                *feature_id = Some(id);
                *feature_index = Some(graph.features.len() - 1);
                Ok(())
            }

            Command::DeleteFeature { index, snapshot } => {
                let len = graph.features.len();
                let feature = graph
                    .remove_feature_at(*index)
                    .ok_or(CommandError::IndexOutOfRange { index: *index, len })?;
                *snapshot = Some(Box::new(feature));
                Ok(())
            }

            Command::ModifyFeature {
                feature,
                old_params,
                new_params,
            } => {
                let id = *feature;
                let target = graph
                    .get_mut(id)
                    .ok_or(CommandError::TargetNotFound {
                        what: format!("feature {id}"),
                    })?;
                if new_params.kind() != target.kind {
                    return Err(CommandError::KindMismatch { id });
                }
                let old = std::mem::replace(&mut target.params, (**new_params).clone());
                *old_params = Some(Box::new(old));
                graph.mark_dirty(id);
                Ok(())
            }
        }
    }

    /// Inverse of `apply`.
    pub fn unapply(&mut self, graph: &mut FeatureGraph) -> Result<(), CommandError> {
        match self {
            Command::AddEntity {
                sketch,
                spec,
                entity_id,
                ..
            } => {
                let id = entity_id.ok_or(CommandError::TargetNotFound {
                    what: "unexecuted add command".to_string(),
                })?;
                let store = sketch_store_mut(graph, *sketch)?;
                remove_entity_by_id(store, spec.class(), id)?;
                Ok(())
            }

            Command::DeleteEntity {
                sketch,
                index,
                snapshot,
                ..
            } => {
                let snap = snapshot.as_ref().ok_or(CommandError::TargetNotFound {
                    what: "delete snapshot".to_string(),
                })?;
                let store = sketch_store_mut(graph, *sketch)?;
                insert_snapshot(store, *index, snap.clone());
                Ok(())
            }

            Command::AddFeature {
                feature_id,
                removed,
                ..
            } => {
                let id = feature_id.ok_or(CommandError::TargetNotFound {
                    what: "unexecuted add command".to_string(),
                })?;
                let (_, feature) = graph.remove_feature(id)?;
                *removed = Some(Box::new(feature));
                Ok(())
            }

            Command::DeleteFeature { index, snapshot } => {
                let snap = snapshot.as_mut().ok_or(CommandError::TargetNotFound {
                    what: "delete snapshot".to_string(),
                })?;
                // The restored feature takes the artifact back; the snapshot
                // keeps only the value data, so a later dispose cannot free
                // a handle the graph now owns.
                let mut feature = (**snap).clone();
                feature.artifact = snap.artifact.take();
                graph.restore_feature_at(*index, feature);
                Ok(())
            }

            Command::ModifyFeature {
                feature,
                old_params,
                ..
            } => {
                let id = *feature;
                let old = old_params.as_ref().ok_or(CommandError::TargetNotFound {
                    what: "unexecuted modify command".to_string(),
                })?;
                let target = graph
                    .get_mut(id)
                    .ok_or(CommandError::TargetNotFound {
                        what: format!("feature {id}"),
                    })?;
                target.params = (**old).clone();
                graph.mark_dirty(id);
                Ok(())
            }
        }
    }

    /// Re-application after an undo. Distinct from the original `apply`: it
    /// restores the original ids and storage positions instead of
    /// allocating fresh ones, advancing id counters past restored ids.
    pub fn reapply(&mut self, graph: &mut FeatureGraph) -> Result<(), CommandError> {
        match self {
            Command::AddEntity {
                sketch,
                spec,
                entity_id,
                entity_index,
            } => {
                let id = entity_id.ok_or(CommandError::TargetNotFound {
                    what: "unexecuted add command".to_string(),
                })?;
                let index = entity_index.ok_or(CommandError::TargetNotFound {
                    what: "unexecuted add command".to_string(),
                })?;
                let snapshot = materialize(spec, id);
                let store = sketch_store_mut(graph, *sketch)?;
                insert_snapshot(store, index, snapshot);
                Ok(())
            }

            Command::DeleteEntity {
                sketch,
                class,
                index,
                ..
            } => {
                let store = sketch_store_mut(graph, *sketch)?;
                remove_entity_at(store, *class, *index)?;
                Ok(())
            }

            Command::AddFeature {
                feature_index,
                removed,
                ..
            } => {
                let feature = removed.take().ok_or(CommandError::TargetNotFound {
                    what: "undone feature snapshot".to_string(),
                })?;
                let index = feature_index.unwrap_or(graph.features.len());
                graph.restore_feature_at(index, *feature);
                Ok(())
            }

            Command::DeleteFeature { index, snapshot } => {
                let len = graph.features.len();
                let feature = graph
                    .remove_feature_at(*index)
                    .ok_or(CommandError::IndexOutOfRange { index: *index, len })?;
                // Re-capture the snapshot: the removed feature may carry an
                // artifact regenerated since the last delete.
                *snapshot = Some(Box::new(feature));
                Ok(())
            }

            Command::ModifyFeature {
                feature,
                new_params,
                ..
            } => {
                let id = *feature;
                let target = graph
                    .get_mut(id)
                    .ok_or(CommandError::TargetNotFound {
                        what: format!("feature {id}"),
                    })?;
                target.params = (**new_params).clone();
                graph.mark_dirty(id);
                Ok(())
            }
        }
    }

    /// Release kernel artifacts held by retained snapshots. Called by the
    /// history at every confirmed non-restoration point: ring eviction,
    /// redo-stack discard, failed inverse. Host memory is released by
    /// `Drop` as usual.
    pub fn dispose(&mut self, kernel: &mut dyn SolidKernel) {
        match self {
            Command::AddFeature { removed, .. } => {
                if let Some(feature) = removed {
                    if let Some(handle) = feature.artifact.take() {
                        kernel.destroy(handle);
                    }
                }
            }
            Command::DeleteFeature { snapshot, .. } => {
                if let Some(feature) = snapshot {
                    if let Some(handle) = feature.artifact.take() {
                        kernel.destroy(handle);
                    }
                }
            }
            Command::AddEntity { .. }
            | Command::DeleteEntity { .. }
            | Command::ModifyFeature { .. } => {}
        }
    }
}

fn sketch_store_mut(
    graph: &mut FeatureGraph,
    id: FeatureId,
) -> Result<&mut Sketch, CommandError> {
    graph
        .sketch_mut(id)
        .ok_or(CommandError::TargetNotFound {
            what: format!("sketch {id}"),
        })
}

fn class_len(store: &Sketch, class: EntityClass) -> usize {
    match class {
        EntityClass::Point => store.points.len(),
        EntityClass::Line => store.lines.len(),
        EntityClass::Circle => store.circles.len(),
        EntityClass::Arc => store.arcs.len(),
        EntityClass::Constraint => store.constraints.len(),
    }
}

fn remove_entity_at(
    store: &mut Sketch,
    class: EntityClass,
    index: usize,
) -> Result<EntitySnapshot, CommandError> {
    let len = class_len(store, class);
    let removed = match class {
        EntityClass::Point => store.points.remove_at(index).map(EntitySnapshot::Point),
        EntityClass::Line => store.lines.remove_at(index).map(EntitySnapshot::Line),
        EntityClass::Circle => store.circles.remove_at(index).map(EntitySnapshot::Circle),
        EntityClass::Arc => store.arcs.remove_at(index).map(EntitySnapshot::Arc),
        EntityClass::Constraint => store
            .constraints
            .remove_at(index)
            .map(EntitySnapshot::Constraint),
    };
    removed.ok_or(CommandError::IndexOutOfRange { index, len })
}

fn remove_entity_by_id(
    store: &mut Sketch,
    class: EntityClass,
    id: EntityId,
) -> Result<usize, CommandError> {
    let removed = match class {
        EntityClass::Point => store.points.remove_by_id(id).map(|(i, _)| i),
        EntityClass::Line => store.lines.remove_by_id(id).map(|(i, _)| i),
        EntityClass::Circle => store.circles.remove_by_id(id).map(|(i, _)| i),
        EntityClass::Arc => store.arcs.remove_by_id(id).map(|(i, _)| i),
        EntityClass::Constraint => store.constraints.remove_by_id(id).map(|(i, _)| i),
    };
    removed.ok_or(CommandError::TargetNotFound {
        what: format!("entity {id}"),
    })
}

/// Positional re-insert of a snapshot, advancing the store's id counter
/// past the restored id.
fn insert_snapshot(store: &mut Sketch, index: usize, snapshot: EntitySnapshot) {
    let id = snapshot.id();
    match snapshot {
        EntitySnapshot::Point(p) => {
            store.points.insert_clamped(index, p);
        }
        EntitySnapshot::Line(l) => {
            store.lines.insert_clamped(index, l);
        }
        EntitySnapshot::Circle(c) => {
            store.circles.insert_clamped(index, c);
        }
        EntitySnapshot::Arc(a) => {
            store.arcs.insert_clamped(index, a);
        }
        EntitySnapshot::Constraint(c) => {
            store.constraints.insert_clamped(index, c);
        }
    }
    store.note_restored_id(id);
}

/// Rebuild the typed entity an add-command originally produced.
fn materialize(spec: &EntitySpec, id: EntityId) -> EntitySnapshot {
    match spec {
        EntitySpec::Point { x, y, fixed } => EntitySnapshot::Point(SketchPoint {
            id,
            x: *x,
            y: *y,
            fixed: *fixed,
        }),
        EntitySpec::Line { start, end } => EntitySnapshot::Line(SketchLine {
            id,
            start: *start,
            end: *end,
        }),
        EntitySpec::Circle { center, radius } => EntitySnapshot::Circle(SketchCircle {
            id,
            center: *center,
            radius: *radius,
        }),
        EntitySpec::Arc {
            center,
            start,
            end,
            radius,
        } => EntitySnapshot::Arc(SketchArc {
            id,
            center: *center,
            start: *start,
            end: *end,
            radius: *radius,
        }),
        EntitySpec::Constraint { kind } => EntitySnapshot::Constraint(Constraint {
            id,
            kind: kind.clone(),
        }),
    }
}
