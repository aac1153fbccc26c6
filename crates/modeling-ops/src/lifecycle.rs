use gridbin_kernel::{KernelSketchHandle, KernelSolidHandle, Vec3};
use tracing::debug;

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Delete every defined body.
pub fn remove_bodies(
    kb: &mut dyn KernelBundle,
    bodies: &[Option<KernelSolidHandle>],
) -> Result<(), OpError> {
    for body in bodies.iter().flatten() {
        kb.delete_solid(body)?;
    }
    Ok(())
}

/// Delete construction sketches.
pub fn remove_sketches(
    kb: &mut dyn KernelBundle,
    sketches: &[KernelSketchHandle],
) -> Result<(), OpError> {
    for sketch in sketches {
        kb.delete_sketch(sketch)?;
    }
    Ok(())
}

/// Move a solid so its horizontal bounding-box centre sits on the origin.
/// Heights are left alone. Returns the applied offset.
pub fn center_part(kb: &mut dyn KernelBundle, solid: &KernelSolidHandle) -> Result<Vec3, OpError> {
    let bbox = kb
        .solid_bounding_box(solid)
        .filter(|b| !b.is_empty())
        .ok_or(OpError::Kernel(gridbin_kernel::KernelError::SolidNotFound {
            handle: *solid,
        }))?;
    let center = bbox.center();
    let offset = [-center[0], -center[1], 0.0];
    kb.translate(solid, offset)?;
    debug!(?offset, "part centred");
    Ok(offset)
}

/// Assign the display name of a solid.
pub fn rename_part(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    name: &str,
) -> Result<(), OpError> {
    kb.set_name(solid, name)?;
    Ok(())
}
