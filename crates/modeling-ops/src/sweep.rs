use gridbin_kernel::KernelId;

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Sweep a sketch region along a closed loop of edges into a new solid.
pub fn execute_sweep(
    kb: &mut dyn KernelBundle,
    profile: KernelId,
    path: &[KernelId],
) -> Result<OpResult, OpError> {
    if path.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "sweep path is empty".to_string(),
        });
    }
    diff::tracked(kb, &[], |kb| Ok(vec![kb.sweep(profile, path)?]))
}
