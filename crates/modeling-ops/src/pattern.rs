use gridbin_kernel::{KernelSolidHandle, PatternDirection};
use tracing::debug;

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Rectangular linear pattern. Outputs are the new instances only; the
/// source solid is left untouched.
pub fn execute_linear_pattern(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    first: PatternDirection,
    second: Option<PatternDirection>,
) -> Result<OpResult, OpError> {
    for dir in std::iter::once(&first).chain(second.iter()) {
        if dir.count == 0 {
            return Err(OpError::InvalidParameter {
                reason: "pattern count must be at least 1".to_string(),
            });
        }
        if dir.spacing <= 0.0 {
            return Err(OpError::InvalidParameter {
                reason: "pattern spacing must be positive".to_string(),
            });
        }
    }

    diff::tracked(kb, &[], |kb| {
        let instances = kb.linear_pattern(solid, first, second)?;
        debug!(instances = instances.len(), "pattern instances created");
        Ok(instances)
    })
}
