//! Helper functions: error type, tracing setup, bin generation, geometry lookups.

use std::sync::Once;

use bin_engine::{generate, BinConfig, BuildError, GeneratedBin};
use gridbin_kernel::{Aabb, KernelId, KernelIntrospect, KernelSolidHandle, MockKernel};
use gridbin_types::{vec3, Orientation, TopoKind};
use tracing_subscriber::EnvFilter;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("no solid: {name}")]
    NoSolid { name: String },

    #[error("stage not found: {name}")]
    StageNotFound { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },
}

// ── Tracing ─────────────────────────────────────────────────────────────────

static TRACING: Once = Once::new();

/// Route `tracing` output through the test writer, filtered by `RUST_LOG`.
/// Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another subscriber may already be installed by the test binary.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// ── Generation ──────────────────────────────────────────────────────────────

/// Generate a bin on a fresh mock kernel.
pub fn build_bin(config: &BinConfig) -> Result<(MockKernel, GeneratedBin), HarnessError> {
    init_tracing();
    let mut kernel = MockKernel::new();
    let bin = generate(config, &mut kernel)?;
    tracing::debug!(name = %bin.name, stages = bin.stages.len(), "harness bin ready");
    Ok((kernel, bin))
}

// ── Geometry Lookups ────────────────────────────────────────────────────────

pub fn solid_bbox(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
) -> Result<Aabb, HarnessError> {
    introspect
        .solid_bounding_box(solid)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| HarnessError::NoSolid {
            name: format!("{solid:?}"),
        })
}

/// Planar faces of a solid whose outward normal is `orientation`.
pub fn faces_facing(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    orientation: Orientation,
) -> Vec<KernelId> {
    faces_among(introspect, &introspect.list_faces(solid), orientation)
}

/// Planar faces among `faces` whose outward normal is `orientation`.
pub fn faces_among(
    introspect: &dyn KernelIntrospect,
    faces: &[KernelId],
    orientation: Orientation,
) -> Vec<KernelId> {
    faces
        .iter()
        .copied()
        .filter(|&f| {
            let sig = introspect.compute_signature(f, TopoKind::Face);
            sig.surface_type.as_deref() == Some("planar")
                && sig
                    .normal
                    .map(|n| vec3::distance(n, orientation.normal()) < 1e-6)
                    .unwrap_or(false)
        })
        .collect()
}

/// Box around a set of faces.
pub fn faces_bbox(introspect: &dyn KernelIntrospect, faces: &[KernelId]) -> Aabb {
    faces
        .iter()
        .filter_map(|&f| introspect.compute_signature(f, TopoKind::Face).bbox)
        .fold(Aabb::from_points(&[]), |acc, b| acc.union(&b))
}

/// Live faces created by the named stage of a bin.
pub fn stage_faces(
    introspect: &dyn KernelIntrospect,
    bin: &GeneratedBin,
    name: &str,
) -> Result<Vec<KernelId>, HarnessError> {
    let id = bin.stages.find(name).ok_or_else(|| HarnessError::StageNotFound {
        name: name.to_string(),
    })?;
    Ok(bin.stages.live_faces(id, introspect)?)
}
