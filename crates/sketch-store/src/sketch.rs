use camber_types::{
    Constraint, ConstraintKind, EntityId, Profile, SketchArc, SketchCircle, SketchLine,
    SketchPoint, SolveOutcome,
};
use serde::{Deserialize, Serialize};

use crate::list::{EntityList, StoreItem};
use crate::profiles::trace_profiles;
use crate::solver::ConstraintSolver;

impl StoreItem for SketchPoint {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl StoreItem for SketchLine {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl StoreItem for SketchCircle {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl StoreItem for SketchArc {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl StoreItem for Constraint {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Errors from the entity store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("unknown point: {id}")]
    UnknownPoint { id: EntityId },

    #[error("unknown entity: {id}")]
    UnknownEntity { id: EntityId },
}

/// The sketch entity store: insertion-ordered, position-addressed
/// collections sharing one monotonic id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub points: EntityList<SketchPoint>,
    pub lines: EntityList<SketchLine>,
    pub circles: EntityList<SketchCircle>,
    pub arcs: EntityList<SketchArc>,
    pub constraints: EntityList<Constraint>,
    next_id: u32,
}

impl Sketch {
    pub fn new() -> Self {
        Self {
            points: EntityList::new(),
            lines: EntityList::new(),
            circles: EntityList::new(),
            arcs: EntityList::new(),
            constraints: EntityList::new(),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Advance the id counter past a restored id, keeping it strictly above
    /// every id ever issued. Called on the redo path, where entities come
    /// back with the ids they were originally assigned.
    pub fn note_restored_id(&mut self, id: EntityId) {
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64, fixed: bool) -> EntityId {
        let id = self.alloc_id();
        self.points.push(SketchPoint { id, x, y, fixed });
        id
    }

    pub fn add_line(&mut self, start: EntityId, end: EntityId) -> Result<EntityId, StoreError> {
        self.require_point(start)?;
        self.require_point(end)?;
        let id = self.alloc_id();
        self.lines.push(SketchLine { id, start, end });
        Ok(id)
    }

    pub fn add_circle(&mut self, center: EntityId, radius: f64) -> Result<EntityId, StoreError> {
        self.require_point(center)?;
        let id = self.alloc_id();
        self.circles.push(SketchCircle { id, center, radius });
        Ok(id)
    }

    pub fn add_arc(
        &mut self,
        center: EntityId,
        start: EntityId,
        end: EntityId,
        radius: f64,
    ) -> Result<EntityId, StoreError> {
        self.require_point(center)?;
        self.require_point(start)?;
        self.require_point(end)?;
        let id = self.alloc_id();
        self.arcs.push(SketchArc {
            id,
            center,
            start,
            end,
            radius,
        });
        Ok(id)
    }

    pub fn add_constraint(&mut self, kind: ConstraintKind) -> EntityId {
        let id = self.alloc_id();
        self.constraints.push(Constraint { id, kind });
        id
    }

    pub fn get_point(&self, id: EntityId) -> Option<&SketchPoint> {
        self.points.by_id(id)
    }

    /// Total entity count across all collections.
    pub fn entity_count(&self) -> usize {
        self.points.len()
            + self.lines.len()
            + self.circles.len()
            + self.arcs.len()
            + self.constraints.len()
    }

    /// Run the constraint solver over this sketch.
    pub fn solve_constraints(&mut self, solver: &dyn ConstraintSolver) -> SolveOutcome {
        solver.solve(self)
    }

    /// Trace profiles (closed loops and open chains) from the current
    /// geometry.
    pub fn detect_profiles(&self) -> Vec<Profile> {
        trace_profiles(self)
    }

    fn require_point(&self, id: EntityId) -> Result<(), StoreError> {
        if self.points.by_id(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::UnknownPoint { id })
        }
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}
