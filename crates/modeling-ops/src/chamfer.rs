use gridbin_kernel::{KernelId, KernelSolidHandle};

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Equal-distance chamfer on specified edges of a solid.
pub fn execute_chamfer(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    edges: &[KernelId],
    distance: f64,
) -> Result<OpResult, OpError> {
    if distance <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: "chamfer distance must be positive".to_string(),
        });
    }
    if edges.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "chamfer needs at least one edge".to_string(),
        });
    }

    diff::tracked(kb, &[*solid], |kb| {
        Ok(vec![kb.chamfer_edges(solid, edges, distance)?])
    })
}
