use crate::types::{ArtifactHandle, BuildOp, KernelError, ProfileGeometry};

/// The solid-modeling collaborator.
///
/// Implemented by [`crate::MockKernel`] for tests; a production build wraps
/// a B-rep kernel. Calls are blocking and never retried by the caller;
/// failures are reported on the requesting feature.
pub trait SolidKernel {
    /// Build a solid from a profile. Cut operations subtract the extruded
    /// profile from `base`.
    fn build(
        &mut self,
        op: &BuildOp,
        profile: &ProfileGeometry,
        base: Option<ArtifactHandle>,
    ) -> Result<ArtifactHandle, KernelError>;

    /// Free a solid. Unknown handles are ignored.
    fn destroy(&mut self, handle: ArtifactHandle);

    /// Whether a handle still refers to a live solid.
    fn is_alive(&self, handle: ArtifactHandle) -> bool;
}
