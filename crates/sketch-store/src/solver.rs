use camber_types::SolveOutcome;

use crate::sketch::Sketch;

/// Constraint solving is delegated to an external solver behind this seam.
/// The edit engine consumes only the outcome, never the solving process.
pub trait ConstraintSolver {
    fn solve(&self, sketch: &Sketch) -> SolveOutcome;
}

/// Solver stand-in that accepts the stored coordinates as the solution.
///
/// Reports degrees of freedom as two per free point, minus one per
/// constraint, which is exact for the simple constraint set and close
/// enough for diagnostics elsewhere.
pub struct PassthroughSolver;

impl ConstraintSolver for PassthroughSolver {
    fn solve(&self, sketch: &Sketch) -> SolveOutcome {
        let free = sketch.points.iter().filter(|p| !p.fixed).count() as u32;
        let dof = (free * 2).saturating_sub(sketch.constraints.len() as u32);
        SolveOutcome::Solved { dof }
    }
}
