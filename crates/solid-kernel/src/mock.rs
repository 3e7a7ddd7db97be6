//! Deterministic test double implementing [`SolidKernel`].
//!
//! Produces synthetic solids with predictable volumes from the profile's
//! shoelace area. Used by feature-graph for unit and scenario testing.

use std::collections::HashMap;

use crate::traits::SolidKernel;
use crate::types::{ArtifactHandle, BuildOp, KernelError, ProfileGeometry};

/// A synthetic solid with a volume derived from its build inputs.
#[derive(Debug, Clone)]
struct MockSolid {
    volume: f64,
}

/// Deterministic test double for the solid-modeling service.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    /// One-shot injected failure, consumed by the next build call.
    fail_next: Option<String>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            fail_next: None,
        }
    }

    fn alloc_handle(&mut self) -> ArtifactHandle {
        let handle = ArtifactHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Make the next `build` call fail with the given reason.
    pub fn inject_failure(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Number of live solids, for free-discipline assertions.
    pub fn live_count(&self) -> usize {
        self.solids.len()
    }

    /// Volume of a live solid.
    pub fn volume(&self, handle: ArtifactHandle) -> Option<f64> {
        self.solids.get(&handle.0).map(|solid| solid.volume)
    }
}

impl SolidKernel for MockKernel {
    fn build(
        &mut self,
        op: &BuildOp,
        profile: &ProfileGeometry,
        base: Option<ArtifactHandle>,
    ) -> Result<ArtifactHandle, KernelError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(KernelError::BuildRejected { reason });
        }
        if !profile.closed {
            return Err(KernelError::OpenProfile);
        }
        let area = profile.signed_area().abs();
        if area <= f64::EPSILON {
            return Err(KernelError::DegenerateProfile);
        }

        let volume = match op {
            BuildOp::Extrude { depth } => {
                if *depth <= 0.0 {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("extrude depth must be positive, got {depth}"),
                    });
                }
                area * depth
            }
            BuildOp::Cut { depth } => {
                if *depth <= 0.0 {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("cut depth must be positive, got {depth}"),
                    });
                }
                let base = base.ok_or(KernelError::MissingBase)?;
                let base_volume = self
                    .solids
                    .get(&base.0)
                    .ok_or(KernelError::UnknownArtifact(base))?
                    .volume;
                (base_volume - area * depth).max(0.0)
            }
            BuildOp::Revolve {
                angle_degrees,
                axis_direction,
                ..
            } => {
                if *angle_degrees <= 0.0 || *angle_degrees > 360.0 {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("revolve angle must be in (0, 360], got {angle_degrees}"),
                    });
                }
                let axis_len =
                    (axis_direction[0].powi(2) + axis_direction[1].powi(2)).sqrt();
                if axis_len <= f64::EPSILON {
                    return Err(KernelError::InvalidParameter {
                        reason: "revolve axis direction is zero".to_string(),
                    });
                }
                // Crude sweep volume; tests only rely on it being positive
                // and deterministic.
                area * angle_degrees.to_radians()
            }
        };

        let handle = self.alloc_handle();
        self.solids.insert(handle.0, MockSolid { volume });
        Ok(handle)
    }

    fn destroy(&mut self, handle: ArtifactHandle) {
        self.solids.remove(&handle.0);
    }

    fn is_alive(&self, handle: ArtifactHandle) -> bool {
        self.solids.contains_key(&handle.0)
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}
