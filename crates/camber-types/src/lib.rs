pub mod ids;
pub mod profile;
pub mod sketch;

pub use ids::*;
pub use profile::*;
pub use sketch::*;
