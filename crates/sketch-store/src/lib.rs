pub mod list;
pub mod profiles;
pub mod sketch;
pub mod solver;

pub use list::{EntityList, StoreItem};
pub use profiles::trace_profiles;
pub use sketch::{Sketch, StoreError};
pub use solver::{ConstraintSolver, PassthroughSolver};
