use gridbin_kernel::{KernelSketch, SketchPlane, SketchShape};
use tracing::debug;

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Create a sketch holding one region per shape.
pub fn create_profile(
    kb: &mut dyn KernelBundle,
    plane: &SketchPlane,
    shapes: &[SketchShape],
) -> Result<KernelSketch, OpError> {
    if shapes.is_empty() {
        return Err(OpError::NoProfiles);
    }
    let sketch = kb.create_sketch(plane, shapes)?;
    debug!(regions = sketch.regions.len(), origin = ?plane.origin, "profile created");
    Ok(sketch)
}
