//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context, the expected value and what was found.

use bin_engine::GeneratedBin;
use gridbin_kernel::{KernelIntrospect, KernelSolidHandle};

use crate::helpers::{solid_bbox, HarnessError};

fn failed(detail: String) -> HarnessError {
    HarnessError::AssertionFailed { detail }
}

/// Assert the bounding-box size of a solid within tolerance.
pub fn assert_bbox_size(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let size = solid_bbox(introspect, solid)?.size();
    for axis in 0..3 {
        if (size[axis] - expected[axis]).abs() > tol {
            return Err(failed(format!(
                "[{ctx}] bounding box size[{axis}]: expected {:.3}, got {:.3} (tol={tol})",
                expected[axis], size[axis],
            )));
        }
    }
    Ok(())
}

/// Assert the solid is centred horizontally and stands on z = 0.
pub fn assert_centered_on_origin(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bbox = solid_bbox(introspect, solid)?;
    let center = bbox.center();
    if center[0].abs() > tol || center[1].abs() > tol {
        return Err(failed(format!(
            "[{ctx}] horizontal centre: expected origin, got ({:.3}, {:.3})",
            center[0], center[1],
        )));
    }
    if bbox.min[2].abs() > tol {
        return Err(failed(format!(
            "[{ctx}] bottom: expected z = 0, got {:.3}",
            bbox.min[2]
        )));
    }
    Ok(())
}

/// Assert the kernel holds exactly the bin's solid and no sketches.
pub fn assert_only_solid(
    introspect: &dyn KernelIntrospect,
    bin: &GeneratedBin,
    ctx: &str,
) -> Result<(), HarnessError> {
    let solids = introspect.list_solids();
    if solids != [bin.solid] {
        return Err(failed(format!(
            "[{ctx}] expected only {:?}, kernel holds {solids:?}",
            bin.solid
        )));
    }
    let sketches = introspect.list_sketches();
    if !sketches.is_empty() {
        return Err(failed(format!(
            "[{ctx}] {} construction sketches left behind",
            sketches.len()
        )));
    }
    Ok(())
}

/// Assert whether a named stage ran.
pub fn assert_stage(bin: &GeneratedBin, name: &str, present: bool, ctx: &str) -> Result<(), HarnessError> {
    let found = bin.stages.find(name).is_some();
    if found == present {
        Ok(())
    } else {
        let names: Vec<&str> = bin.stages.stages().iter().map(|s| s.name.as_str()).collect();
        Err(failed(format!(
            "[{ctx}] stage {name:?} expected {}, stages: {names:?}",
            if present { "present" } else { "absent" },
        )))
    }
}
