use gridbin_kernel::{ExtrudeExtent, KernelId, KernelSolidHandle, Vec3};
use gridbin_types::vec3;
use gridbin_types::{Orientation, TopoKind};
use tracing::{debug, instrument};

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::query;
use crate::types::{OpError, OpResult};

/// Every wall extrusion goes up.
const WALL_DIRECTION: Vec3 = [0.0, 0.0, 1.0];
const DRAFT_PULL: Vec3 = [0.0, 0.0, -1.0];

/// Execute an extrude operation on sketch regions or faces.
///
/// The result is always a new solid; the solid owning a face region is not
/// modified.
pub fn execute_extrude(
    kb: &mut dyn KernelBundle,
    regions: &[KernelId],
    direction: Vec3,
    extent: ExtrudeExtent,
) -> Result<OpResult, OpError> {
    if regions.is_empty() {
        return Err(OpError::NoProfiles);
    }
    if vec3::norm(direction) < vec3::EPS {
        return Err(OpError::InvalidParameter {
            reason: "extrude direction must be non-zero".to_string(),
        });
    }
    diff::tracked(kb, &[], |kb| Ok(vec![kb.extrude(regions, direction, extent)?]))
}

/// Parameters of a vertical wall extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WallExtrude {
    pub depth: f64,
    /// Round the new vertical edges.
    pub fillet_radius: Option<f64>,
    /// Draft the new side faces outward by this many degrees.
    pub draft_angle: Option<f64>,
}

/// A wall extrusion and the top face of the solid it made.
#[derive(Debug, Clone)]
pub struct WallExtrusion {
    pub result: OpResult,
    pub solid: KernelSolidHandle,
    pub top_face: KernelId,
}

/// Extrude regions straight up, then optionally round the vertical edges
/// and draft the side faces.
///
/// The draft only touches planar faces whose normals are ±X or ±Y, pulled
/// against +Z and referenced on `reference` (the face or region the wall
/// grows from).
#[instrument(skip(kb, regions), fields(regions = regions.len()))]
pub fn wall_extrude(
    kb: &mut dyn KernelBundle,
    regions: &[KernelId],
    reference: KernelId,
    params: &WallExtrude,
) -> Result<WallExtrusion, OpError> {
    if params.depth <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("wall depth must be positive, got {}", params.depth),
        });
    }
    let extruded = execute_extrude(
        kb,
        regions,
        WALL_DIRECTION,
        ExtrudeExtent::Blind {
            depth: params.depth,
        },
    )?;
    let solid = extruded
        .main()
        .ok_or(OpError::InvalidParameter {
            reason: "extrude produced no solid".to_string(),
        })?;

    if let Some(radius) = params.fillet_radius {
        let vertical = query::parallel_edges(
            kb.as_introspect(),
            &extruded.created(TopoKind::Edge),
            WALL_DIRECTION,
        );
        debug!(edges = vertical.len(), radius, "rounding wall edges");
        super::fillet::execute_fillet(kb, &solid, &vertical, radius, false)?;
    }

    if let Some(angle) = params.draft_angle {
        let sides = side_faces(kb, &extruded.created(TopoKind::Face));
        debug!(faces = sides.len(), angle, "drafting wall faces");
        super::draft::execute_draft(kb, &solid, &sides, reference, DRAFT_PULL, angle)?;
    }

    // Provenance of the whole wall relative to nothing.
    let result = diff::tracked(kb, &[], |_| Ok(vec![solid]))?;
    let top_face = query::find_solid_face(kb.as_introspect(), &solid, Orientation::Top)?;
    Ok(WallExtrusion {
        result,
        solid,
        top_face,
    })
}

/// Live planar faces among `faces` whose normals are horizontal axis directions.
fn side_faces(kb: &dyn KernelBundle, faces: &[KernelId]) -> Vec<KernelId> {
    let axes = [
        Orientation::Left,
        Orientation::Right,
        Orientation::Front,
        Orientation::Back,
    ];
    faces
        .iter()
        .copied()
        .filter(|&f| {
            let sig = kb.compute_signature(f, TopoKind::Face);
            sig.surface_type.as_deref() == Some("planar")
                && sig
                    .normal
                    .map(|n| axes.iter().any(|o| vec3::distance(n, o.normal()) < 1e-6))
                    .unwrap_or(false)
        })
        .collect()
}
