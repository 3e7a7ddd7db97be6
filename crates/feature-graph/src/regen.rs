use camber_types::{EntityId, FeatureId, Profile};
use sketch_store::Sketch;
use solid_kernel::{ArtifactHandle, BuildOp, ProfileGeometry, SolidKernel};
use tracing::{debug, warn};

use crate::graph::FeatureGraph;
use crate::types::{FeatureKind, FeatureParams, Status};

impl FeatureGraph {
    /// Recompute one feature's artifact from its current parameters and
    /// parent artifacts.
    ///
    /// Disabled features are a no-op success with their status frozen.
    /// Sketches are user-edited and simply become Valid. Computed features
    /// resolve their inputs and call the kernel; any missing input or
    /// kernel failure frees the previous artifact and records Failed with
    /// a message.
    pub fn regenerate(&mut self, id: FeatureId, kernel: &mut dyn SolidKernel) -> bool {
        let Some(index) = self.feature_index(id) else {
            return false;
        };
        if !self.features[index].enabled {
            return true;
        }
        if self.features[index].kind == FeatureKind::Sketch {
            let feature = &mut self.features[index];
            feature.status = Status::Valid;
            feature.last_error = None;
            return true;
        }

        match self.build_inputs(index) {
            Ok((op, geometry, base)) => match kernel.build(&op, &geometry, base) {
                Ok(handle) => {
                    self.install_result(index, kernel, Some(handle), None);
                    true
                }
                Err(e) => {
                    self.install_result(index, kernel, None, Some(e.to_string()));
                    false
                }
            },
            Err(message) => {
                self.install_result(index, kernel, None, Some(message));
                false
            }
        }
    }

    /// Regenerate every feature in stored order (which is topological
    /// order), continuing past individual failures. Returns the logical
    /// AND of all results.
    ///
    /// A feature depending on a Failed parent fails naturally because the
    /// parent's artifact is absent; no separate propagation pass runs.
    pub fn regenerate_all(&mut self, kernel: &mut dyn SolidKernel) -> bool {
        let ids: Vec<FeatureId> = self.features.iter().map(|f| f.id).collect();
        let mut all_ok = true;
        for id in ids {
            all_ok &= self.regenerate(id, kernel);
        }
        debug!(
            features = self.features.len(),
            all_ok, "regenerate_all complete"
        );
        all_ok
    }

    /// Replace a feature's artifact and status after a build attempt,
    /// freeing whatever artifact it held before.
    fn install_result(
        &mut self,
        index: usize,
        kernel: &mut dyn SolidKernel,
        handle: Option<ArtifactHandle>,
        error: Option<String>,
    ) {
        let feature = &mut self.features[index];
        if let Some(old) = feature.artifact.take() {
            kernel.destroy(old);
        }
        match handle {
            Some(handle) => {
                feature.artifact = Some(handle);
                feature.status = Status::Valid;
                feature.last_error = None;
                debug!(feature = %feature.id, name = %feature.name, "regenerated");
            }
            None => {
                feature.status = Status::Failed;
                warn!(
                    feature = %feature.id,
                    name = %feature.name,
                    error = error.as_deref().unwrap_or(""),
                    "regeneration failed"
                );
                feature.last_error = error;
            }
        }
    }

    /// Resolve a computed feature's kernel inputs from its params and
    /// parents. Errors are plain messages destined for `last_error`.
    fn build_inputs(
        &self,
        index: usize,
    ) -> Result<(BuildOp, ProfileGeometry, Option<ArtifactHandle>), String> {
        match &self.features[index].params {
            FeatureParams::Sketch { .. } => {
                Err("sketches are not regenerated through the kernel".to_string())
            }
            FeatureParams::Extrude { sketch, depth } => {
                let geometry = self.sketch_profile(*sketch)?;
                Ok((BuildOp::Extrude { depth: *depth }, geometry, None))
            }
            FeatureParams::Cut {
                sketch,
                base,
                depth,
            } => {
                let geometry = self.sketch_profile(*sketch)?;
                let base_handle = self
                    .get(*base)
                    .ok_or_else(|| format!("base feature {base} is missing"))?
                    .artifact
                    .ok_or_else(|| format!("base feature {base} has no artifact"))?;
                Ok((BuildOp::Cut { depth: *depth }, geometry, Some(base_handle)))
            }
            FeatureParams::Revolve {
                sketch,
                axis_origin,
                axis_direction,
                angle_degrees,
            } => {
                let geometry = self.sketch_profile(*sketch)?;
                Ok((
                    BuildOp::Revolve {
                        axis_origin: *axis_origin,
                        axis_direction: *axis_direction,
                        angle_degrees: *angle_degrees,
                    },
                    geometry,
                    None,
                ))
            }
        }
    }

    fn sketch_profile(&self, id: FeatureId) -> Result<ProfileGeometry, String> {
        let feature = self
            .get(id)
            .ok_or_else(|| format!("parent sketch {id} is missing"))?;
        let sketch = match &feature.params {
            FeatureParams::Sketch { sketch } => sketch,
            _ => return Err(format!("parent feature {id} is not a sketch")),
        };
        let profile = sketch
            .detect_profiles()
            .into_iter()
            .find(|p| p.closed)
            .ok_or_else(|| format!("sketch {id} has no closed profile"))?;
        outline_of(sketch, &profile)
    }
}

/// Resolve a closed profile's ordered outline positions.
fn outline_of(sketch: &Sketch, profile: &Profile) -> Result<ProfileGeometry, String> {
    // A standalone circle profile is sampled as a coarse polygon; only the
    // enclosed area matters downstream.
    if profile.entity_ids.len() == 1 {
        if let Some(circle) = sketch.circles.by_id(profile.entity_ids[0]) {
            let center = sketch
                .get_point(circle.center)
                .ok_or_else(|| format!("circle {} center is missing", circle.id))?;
            let samples = 8;
            let points = (0..samples)
                .map(|i| {
                    let t = i as f64 * std::f64::consts::TAU / samples as f64;
                    [
                        center.x + circle.radius * t.cos(),
                        center.y + circle.radius * t.sin(),
                    ]
                })
                .collect();
            return Ok(ProfileGeometry {
                points,
                closed: true,
            });
        }
    }

    let mut ends: Vec<(EntityId, EntityId)> = Vec::new();
    for &entity_id in &profile.entity_ids {
        if let Some(line) = sketch.lines.by_id(entity_id) {
            ends.push((line.start, line.end));
        } else if let Some(arc) = sketch.arcs.by_id(entity_id) {
            ends.push((arc.start, arc.end));
        } else {
            return Err(format!("profile entity {entity_id} is not a line or arc"));
        }
    }
    if ends.len() < 3 {
        return Err("profile encloses no area".to_string());
    }

    // Orient the loop by chaining shared endpoints, starting from the end
    // of the first segment that the second segment does not touch.
    let touches = |p: EntityId, (a, b): (EntityId, EntityId)| p == a || p == b;
    let (first, mut cursor) = if touches(ends[0].1, ends[1]) {
        (ends[0].0, ends[0].1)
    } else {
        (ends[0].1, ends[0].0)
    };
    let mut ordered = vec![first];
    for &(a, b) in &ends[1..] {
        ordered.push(cursor);
        cursor = if a == cursor {
            b
        } else if b == cursor {
            a
        } else {
            return Err("profile chain is not contiguous".to_string());
        };
    }

    let mut points = Vec::with_capacity(ordered.len());
    for point_id in ordered {
        let point = sketch
            .get_point(point_id)
            .ok_or_else(|| format!("profile point {point_id} is missing"))?;
        points.push([point.x, point.y]);
    }
    Ok(ProfileGeometry {
        points,
        closed: true,
    })
}
