use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A 2D sketch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchPoint {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    /// Fixed points are anchored in place and contribute no degrees of freedom.
    pub fixed: bool,
}

/// A line segment between two sketch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    pub id: EntityId,
    pub start: EntityId,
    pub end: EntityId,
}

/// A circle centered on a sketch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchCircle {
    pub id: EntityId,
    pub center: EntityId,
    pub radius: f64,
}

/// A circular arc from a start point to an end point around a center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchArc {
    pub id: EntityId,
    pub center: EntityId,
    pub start: EntityId,
    pub end: EntityId,
    pub radius: f64,
}

/// A constraint between sketch entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: EntityId,
    pub kind: ConstraintKind,
}

/// Constraint kinds with their payload data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstraintKind {
    Coincident { point_a: EntityId, point_b: EntityId },
    Horizontal { line: EntityId },
    Vertical { line: EntityId },
    Parallel { line_a: EntityId, line_b: EntityId },
    Perpendicular { line_a: EntityId, line_b: EntityId },
    Distance { entity_a: EntityId, entity_b: EntityId, value: f64 },
    Radius { entity: EntityId, value: f64 },
    Fixed { point: EntityId },
}
