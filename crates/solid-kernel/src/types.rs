use serde::{Deserialize, Serialize};

/// Opaque handle to a solid owned by the kernel.
///
/// A plain id, cheap to copy; the kernel owns the actual geometry and frees
/// it only through [`crate::SolidKernel::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle(pub u64);

/// The modeling operation requested from the kernel, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildOp {
    /// Extrude the profile along the sketch normal.
    Extrude { depth: f64 },
    /// Extrude the profile and subtract the result from a base solid.
    Cut { depth: f64 },
    /// Revolve the profile around an in-plane axis.
    Revolve {
        axis_origin: [f64; 2],
        axis_direction: [f64; 2],
        angle_degrees: f64,
    },
}

/// Resolved 2D geometry of one profile, ready for the kernel.
#[derive(Debug, Clone, Default)]
pub struct ProfileGeometry {
    /// Ordered outline vertex positions.
    pub points: Vec<[f64; 2]>,
    /// Whether the outline closes back on itself.
    pub closed: bool,
}

impl ProfileGeometry {
    /// Signed area by the shoelace formula. Positive for counter-clockwise
    /// outlines.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.points.len() {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % self.points.len()];
            sum += x0 * y1 - x1 * y0;
        }
        sum / 2.0
    }
}

/// Errors from the solid-modeling collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("profile is not a closed loop")]
    OpenProfile,

    #[error("profile encloses no area")]
    DegenerateProfile,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("unknown artifact handle {0:?}")]
    UnknownArtifact(ArtifactHandle),

    #[error("cut requires a base artifact")]
    MissingBase,

    #[error("build rejected: {reason}")]
    BuildRejected { reason: String },
}
