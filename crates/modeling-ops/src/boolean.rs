use gridbin_kernel::KernelSolidHandle;
use tracing::debug;

use crate::diff;
use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, OpResult};

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanKind {
    Union,
    Subtract,
}

/// Unite every defined part into the first defined one.
///
/// `None` entries are skipped. The survivor keeps its handle; callers must
/// not expect a new identity from a union.
pub fn merge_parts(
    kb: &mut dyn KernelBundle,
    parts: &[Option<KernelSolidHandle>],
) -> Result<OpResult, OpError> {
    combine(kb, parts, BooleanKind::Union)
}

/// Subtract every later defined part from the first defined one.
pub fn subtract_parts(
    kb: &mut dyn KernelBundle,
    parts: &[Option<KernelSolidHandle>],
) -> Result<OpResult, OpError> {
    combine(kb, parts, BooleanKind::Subtract)
}

fn combine(
    kb: &mut dyn KernelBundle,
    parts: &[Option<KernelSolidHandle>],
    kind: BooleanKind,
) -> Result<OpResult, OpError> {
    let defined: Vec<KernelSolidHandle> = parts.iter().flatten().copied().collect();
    let Some((&survivor, tools)) = defined.split_first() else {
        return Err(OpError::NoBodies);
    };
    let tools = tools.to_vec();

    diff::tracked(kb, &defined, |kb| {
        for tool in &tools {
            match kind {
                BooleanKind::Union => kb.boolean_union(&survivor, tool)?,
                BooleanKind::Subtract => kb.boolean_subtract(&survivor, tool)?,
            };
        }
        debug!(?survivor, tools = tools.len(), ?kind, "parts combined");
        Ok(vec![survivor])
    })
}
