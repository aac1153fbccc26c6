use gridbin_kernel::{KernelId, KernelSolidHandle};

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Execute a fillet operation on specified edges of a solid.
pub fn execute_fillet(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    edges: &[KernelId],
    radius: f64,
    tangent_propagation: bool,
) -> Result<OpResult, OpError> {
    if radius <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: "fillet radius must be positive".to_string(),
        });
    }
    if edges.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "fillet needs at least one edge".to_string(),
        });
    }

    diff::tracked(kb, &[*solid], |kb| {
        Ok(vec![kb.fillet_edges(solid, edges, radius, tangent_propagation)?])
    })
}
