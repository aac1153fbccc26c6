//! Face and edge selection.
//!
//! Every lookup either resolves to the entities asked for or fails with an
//! `OpError`; there is no empty "not found" reference.

use std::collections::BTreeSet;

use gridbin_kernel::{EdgeCurve, KernelId, KernelIntrospect, KernelSolidHandle};
use gridbin_types::vec3::{self, Vec3};
use gridbin_types::{Orientation, TopoKind};
use tracing::warn;

use crate::types::OpError;

const NORMAL_TOL: f64 = 1e-6;

/// The unique planar face among `candidates` whose outward normal is the
/// axis direction of `orientation`.
pub fn find_face(
    introspect: &dyn KernelIntrospect,
    candidates: &[KernelId],
    orientation: Orientation,
) -> Result<KernelId, OpError> {
    let target = orientation.normal();
    let matches: Vec<KernelId> = candidates
        .iter()
        .copied()
        .filter(|&face| {
            let sig = introspect.compute_signature(face, TopoKind::Face);
            sig.surface_type.as_deref() == Some("planar")
                && sig
                    .normal
                    .map(|n| vec3::distance(n, target) < NORMAL_TOL)
                    .unwrap_or(false)
        })
        .collect();
    match matches[..] {
        [face] => Ok(face),
        [] => {
            warn!(%orientation, candidates = candidates.len(), "no face matches orientation");
            Err(OpError::FaceNotFound { orientation })
        }
        _ => {
            warn!(%orientation, count = matches.len(), "several faces match orientation");
            Err(OpError::AmbiguousFace {
                orientation,
                count: matches.len(),
            })
        }
    }
}

/// The unique planar face of `solid` facing `orientation`.
pub fn find_solid_face(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    orientation: Orientation,
) -> Result<KernelId, OpError> {
    find_face(introspect, &introspect.list_faces(solid), orientation)
}

/// The edge whose midpoint lies furthest towards `orientation`.
/// Ties keep the first candidate.
pub fn find_extreme_edge(
    introspect: &dyn KernelIntrospect,
    edges: &[KernelId],
    orientation: Orientation,
) -> Result<KernelId, OpError> {
    let direction = orientation.normal();
    let mut best: Option<(KernelId, f64)> = None;
    for &edge in edges {
        let Some(curve) = introspect.edge_curve(edge) else {
            continue;
        };
        let score = vec3::dot(curve.midpoint(), direction);
        match best {
            Some((_, s)) if score <= s + NORMAL_TOL => {}
            _ => best = Some((edge, score)),
        }
    }
    best.map(|(edge, _)| edge).ok_or_else(|| {
        warn!(%orientation, candidates = edges.len(), "no edge to pick");
        OpError::EdgeNotFound { orientation }
    })
}

/// Straight edges running along `direction` (either sense).
pub fn parallel_edges(
    introspect: &dyn KernelIntrospect,
    edges: &[KernelId],
    direction: Vec3,
) -> Vec<KernelId> {
    edges
        .iter()
        .copied()
        .filter(|&e| {
            introspect
                .edge_curve(e)
                .map(|c| c.is_parallel_to(direction))
                .unwrap_or(false)
        })
        .collect()
}

/// Edges of the outer boundary loop of a face.
pub fn loop_edges(introspect: &dyn KernelIntrospect, face: KernelId) -> Vec<KernelId> {
    introspect
        .face_loops(face)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Edges bounding both faces.
pub fn shared_edges(introspect: &dyn KernelIntrospect, a: KernelId, b: KernelId) -> Vec<KernelId> {
    let of_b: BTreeSet<KernelId> = introspect.face_edges(b).into_iter().collect();
    introspect
        .face_edges(a)
        .into_iter()
        .filter(|e| of_b.contains(e))
        .collect()
}

/// Faces sharing at least one edge with `face`.
pub fn adjacent_faces(introspect: &dyn KernelIntrospect, face: KernelId) -> Vec<KernelId> {
    let mut found = BTreeSet::new();
    for edge in introspect.face_edges(face) {
        for other in introspect.edge_faces(edge) {
            if other != face {
                found.insert(other);
            }
        }
    }
    found.into_iter().collect()
}

/// Keep the entities that `introspect` still knows about.
pub fn live_only(introspect: &dyn KernelIntrospect, entities: &[KernelId]) -> Vec<KernelId> {
    entities
        .iter()
        .copied()
        .filter(|&e| introspect.owner_solid(e).is_some())
        .collect()
}

/// Geometry of a live edge.
pub fn edge_geometry(introspect: &dyn KernelIntrospect, edge: KernelId) -> Result<EdgeCurve, OpError> {
    introspect
        .edge_curve(edge)
        .ok_or(OpError::Kernel(gridbin_kernel::KernelError::EntityNotFound { id: edge }))
}

/// A point on a face: the mean of its outer boundary. Arcs are sampled, so
/// this leans towards rounded corners; use [`face_center`] for placement.
pub fn face_point(introspect: &dyn KernelIntrospect, face: KernelId) -> Result<Vec3, OpError> {
    introspect
        .compute_signature(face, TopoKind::Face)
        .centroid
        .ok_or(OpError::Kernel(gridbin_kernel::KernelError::EntityNotFound { id: face }))
}

/// Centre of a face's bounding box.
pub fn face_center(introspect: &dyn KernelIntrospect, face: KernelId) -> Result<Vec3, OpError> {
    introspect
        .compute_signature(face, TopoKind::Face)
        .bbox
        .filter(|b| !b.is_empty())
        .map(|b| b.center())
        .ok_or(OpError::Kernel(gridbin_kernel::KernelError::EntityNotFound { id: face }))
}
