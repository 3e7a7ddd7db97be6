use camber_types::FeatureId;
use serde::{Deserialize, Serialize};
use sketch_store::Sketch;

use crate::types::{Feature, FeatureKind, FeatureParams, GraphError, Status};

/// The ordered feature graph. Parents always precede their dependents, so
/// the dependency relation is acyclic by construction and storage order is
/// a valid topological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGraph {
    pub features: Vec<Feature>,
    next_id: u32,
    /// Sketch currently open for editing, if any.
    pub active_id: Option<FeatureId>,
}

impl FeatureGraph {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            next_id: 1,
            active_id: None,
        }
    }

    fn alloc_id(&mut self) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new empty sketch and make it active. Sketches are
    /// user-edited, never computed, so they start Valid.
    pub fn add_sketch(&mut self, name: impl Into<String>) -> FeatureId {
        self.add_sketch_with(name, Sketch::new())
    }

    /// Append a sketch feature owning the given entity store.
    pub fn add_sketch_with(&mut self, name: impl Into<String>, sketch: Sketch) -> FeatureId {
        let id = self.alloc_id();
        self.features.push(Feature {
            id,
            kind: FeatureKind::Sketch,
            name: name.into(),
            params: FeatureParams::Sketch { sketch },
            status: Status::Valid,
            parents: Vec::new(),
            artifact: None,
            last_error: None,
            enabled: true,
            visible: true,
        });
        self.active_id = Some(id);
        id
    }

    /// Append an extrude parented on a sketch. Fails without mutating when
    /// the parent is missing or not a sketch.
    pub fn add_extrude(
        &mut self,
        sketch: FeatureId,
        depth: f64,
        name: impl Into<String>,
    ) -> Result<FeatureId, GraphError> {
        self.require_sketch(sketch)?;
        Ok(self.push_computed(
            FeatureKind::Extrude,
            name.into(),
            FeatureParams::Extrude { sketch, depth },
            vec![sketch],
        ))
    }

    /// Append a cut parented on a sketch and a base feature. The base must
    /// already carry a non-empty artifact.
    pub fn add_cut(
        &mut self,
        sketch: FeatureId,
        base: FeatureId,
        depth: f64,
        name: impl Into<String>,
    ) -> Result<FeatureId, GraphError> {
        self.require_sketch(sketch)?;
        let base_feature = self
            .get(base)
            .ok_or(GraphError::FeatureNotFound { id: base })?;
        if base_feature.artifact.is_none() {
            return Err(GraphError::MissingBaseArtifact { id: base });
        }
        Ok(self.push_computed(
            FeatureKind::Cut,
            name.into(),
            FeatureParams::Cut { sketch, base, depth },
            vec![sketch, base],
        ))
    }

    /// Append a revolve parented on a sketch.
    pub fn add_revolve(
        &mut self,
        sketch: FeatureId,
        axis_origin: [f64; 2],
        axis_direction: [f64; 2],
        angle_degrees: f64,
        name: impl Into<String>,
    ) -> Result<FeatureId, GraphError> {
        self.require_sketch(sketch)?;
        Ok(self.push_computed(
            FeatureKind::Revolve,
            name.into(),
            FeatureParams::Revolve {
                sketch,
                axis_origin,
                axis_direction,
                angle_degrees,
            },
            vec![sketch],
        ))
    }

    fn push_computed(
        &mut self,
        kind: FeatureKind,
        name: String,
        params: FeatureParams,
        parents: Vec<FeatureId>,
    ) -> FeatureId {
        let id = self.alloc_id();
        self.features.push(Feature {
            id,
            kind,
            name,
            params,
            status: Status::NeedsUpdate,
            parents,
            artifact: None,
            last_error: None,
            enabled: true,
            visible: true,
        });
        id
    }

    /// Find a feature by id. Linear scan; the graph is modeling-tree scale.
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    /// Storage position of a feature.
    pub fn feature_index(&self, id: FeatureId) -> Option<usize> {
        self.features.iter().position(|f| f.id == id)
    }

    /// The entity store of a sketch feature.
    pub fn sketch(&self, id: FeatureId) -> Option<&Sketch> {
        match &self.get(id)?.params {
            FeatureParams::Sketch { sketch } => Some(sketch),
            _ => None,
        }
    }

    pub fn sketch_mut(&mut self, id: FeatureId) -> Option<&mut Sketch> {
        match &mut self.get_mut(id)?.params {
            FeatureParams::Sketch { sketch } => Some(sketch),
            _ => None,
        }
    }

    /// Number of features of a kind. Used to synthesize default names.
    pub fn count_by_kind(&self, kind: FeatureKind) -> usize {
        self.features.iter().filter(|f| f.kind == kind).count()
    }

    /// Mark a feature stale and cascade to every feature that depends on it.
    ///
    /// The Valid → NeedsUpdate transition is idempotent, so revisiting an
    /// already-dirty feature is a safe no-op; Failed and Suppressed keep
    /// their status while their dependents are still cascaded. No visited
    /// set: acyclicity alone bounds the recursion.
    pub fn mark_dirty(&mut self, id: FeatureId) {
        if let Some(feature) = self.get_mut(id) {
            if feature.status == Status::Valid {
                feature.status = Status::NeedsUpdate;
            }
        }
        let dependents: Vec<FeatureId> = self
            .features
            .iter()
            .filter(|f| f.parents.contains(&id))
            .map(|f| f.id)
            .collect();
        for dependent in dependents {
            self.mark_dirty(dependent);
        }
    }

    /// Enable or disable a feature. Disabling freezes its status as
    /// Suppressed; re-enabling marks it stale. Dependents are dirtied in
    /// both directions, since the artifact they see appears or disappears
    /// either way.
    pub fn set_enabled(&mut self, id: FeatureId, enabled: bool) -> Result<(), GraphError> {
        let feature = self
            .get_mut(id)
            .ok_or(GraphError::FeatureNotFound { id })?;
        feature.enabled = enabled;
        feature.status = if enabled {
            Status::NeedsUpdate
        } else {
            Status::Suppressed
        };
        let dependents: Vec<FeatureId> = self
            .features
            .iter()
            .filter(|f| f.parents.contains(&id))
            .map(|f| f.id)
            .collect();
        for dependent in dependents {
            self.mark_dirty(dependent);
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: FeatureId, visible: bool) -> Result<(), GraphError> {
        let feature = self
            .get_mut(id)
            .ok_or(GraphError::FeatureNotFound { id })?;
        feature.visible = visible;
        Ok(())
    }

    pub fn set_active(&mut self, id: Option<FeatureId>) {
        self.active_id = id.filter(|id| self.get(*id).is_some());
    }

    /// Remove a feature by id, returning its position and the feature.
    pub fn remove_feature(&mut self, id: FeatureId) -> Result<(usize, Feature), GraphError> {
        let index = self
            .feature_index(id)
            .ok_or(GraphError::FeatureNotFound { id })?;
        Ok((index, self.take_feature_at(index)))
    }

    /// Remove the feature at a storage position, if in range.
    pub fn remove_feature_at(&mut self, index: usize) -> Option<Feature> {
        if index >= self.features.len() {
            return None;
        }
        Some(self.take_feature_at(index))
    }

    fn take_feature_at(&mut self, index: usize) -> Feature {
        let feature = self.features.remove(index);
        if self.active_id == Some(feature.id) {
            self.active_id = None;
        }
        feature
    }

    /// Re-insert a feature at a storage position (appending when the
    /// position is past the end) and advance the id counter past the
    /// restored id, keeping it strictly above every id ever issued.
    pub fn restore_feature_at(&mut self, index: usize, feature: Feature) -> usize {
        if feature.id.0 >= self.next_id {
            self.next_id = feature.id.0 + 1;
        }
        let index = index.min(self.features.len());
        self.features.insert(index, feature);
        index
    }
}

impl Default for FeatureGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGraph {
    fn require_sketch(&self, id: FeatureId) -> Result<(), GraphError> {
        let feature = self.get(id).ok_or(GraphError::FeatureNotFound { id })?;
        if feature.kind != FeatureKind::Sketch {
            return Err(GraphError::NotASketch { id });
        }
        Ok(())
    }
}
