use std::collections::HashMap;

use camber_types::{EntityId, Profile};

use crate::sketch::Sketch;

/// Trace profiles from sketch geometry.
///
/// 1. Each non-degenerate circle is a closed profile on its own.
/// 2. Lines and arcs form an undirected endpoint graph; chains are followed
///    segment by segment until they either return to their starting point
///    (closed) or run out of unused segments (open).
///
/// This walker finds simple loops only; nested and intersecting loop
/// topology is the profile collaborator's concern, not the edit engine's.
pub fn trace_profiles(sketch: &Sketch) -> Vec<Profile> {
    let mut profiles = Vec::new();

    for circle in sketch.circles.iter() {
        profiles.push(Profile {
            entity_ids: vec![circle.id],
            closed: true,
        });
    }

    // Undirected segment graph over line and arc endpoints.
    struct Seg {
        id: EntityId,
        a: EntityId,
        b: EntityId,
    }

    let mut segs: Vec<Seg> = Vec::new();
    for line in sketch.lines.iter() {
        segs.push(Seg {
            id: line.id,
            a: line.start,
            b: line.end,
        });
    }
    for arc in sketch.arcs.iter() {
        segs.push(Seg {
            id: arc.id,
            a: arc.start,
            b: arc.end,
        });
    }

    let mut adjacency: HashMap<EntityId, Vec<usize>> = HashMap::new();
    for (i, seg) in segs.iter().enumerate() {
        adjacency.entry(seg.a).or_default().push(i);
        adjacency.entry(seg.b).or_default().push(i);
    }

    let other_end = |seg: &Seg, at: EntityId| if seg.a == at { seg.b } else { seg.a };

    let mut used = vec![false; segs.len()];
    for first in 0..segs.len() {
        if used[first] {
            continue;
        }
        used[first] = true;

        let origin = segs[first].a;
        let mut cursor = segs[first].b;
        let mut chain = vec![first];
        let mut closed = false;

        // Walk forward from the seed segment.
        loop {
            if cursor == origin {
                closed = true;
                break;
            }
            let next = adjacency
                .get(&cursor)
                .and_then(|candidates| candidates.iter().find(|&&j| !used[j]).copied());
            match next {
                Some(j) => {
                    used[j] = true;
                    cursor = other_end(&segs[j], cursor);
                    chain.push(j);
                }
                None => break,
            }
        }

        // Open chain: extend backward from the origin so the whole run is
        // reported as one profile.
        if !closed {
            let mut back = origin;
            loop {
                let next = adjacency
                    .get(&back)
                    .and_then(|candidates| candidates.iter().find(|&&j| !used[j]).copied());
                match next {
                    Some(j) => {
                        used[j] = true;
                        back = other_end(&segs[j], back);
                        chain.insert(0, j);
                    }
                    None => break,
                }
            }
        }

        profiles.push(Profile {
            entity_ids: chain.iter().map(|&j| segs[j].id).collect(),
            closed,
        });
    }

    profiles
}
