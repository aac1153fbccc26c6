use gridbin_kernel::{KernelId, KernelSolidHandle, Vec3};

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Draft planar faces about `reference`, tilting them by `angle_deg` so the
/// solid widens against `pull`.
pub fn execute_draft(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    faces: &[KernelId],
    reference: KernelId,
    pull: Vec3,
    angle_deg: f64,
) -> Result<OpResult, OpError> {
    if !(0.0..90.0).contains(&angle_deg) {
        return Err(OpError::InvalidParameter {
            reason: format!("draft angle {} must lie in [0, 90) degrees", angle_deg),
        });
    }
    if faces.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "draft needs at least one face".to_string(),
        });
    }

    diff::tracked(kb, &[*solid], |kb| {
        Ok(vec![kb.draft_faces(solid, faces, reference, pull, angle_deg.to_radians())?])
    })
}
