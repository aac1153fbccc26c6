use std::collections::BTreeMap;

use gridbin_kernel::{KernelId, KernelIntrospect, KernelSolidHandle};
use gridbin_types::{TopoKind, TopoSignature};

use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, EntityRecord, OpError, OpResult, Provenance};

/// A snapshot of the topology of one or more solids at a point in time.
#[derive(Debug, Clone, Default)]
pub struct TopoSnapshot {
    pub faces: Vec<(KernelId, TopoSignature)>,
    pub edges: Vec<(KernelId, TopoSignature)>,
}

/// Take a topology snapshot of a set of solids for diffing.
pub fn snapshot(introspect: &dyn KernelIntrospect, solids: &[KernelSolidHandle]) -> TopoSnapshot {
    let mut snap = TopoSnapshot::default();
    for solid in solids {
        snap.faces
            .extend(introspect.compute_all_signatures(solid, TopoKind::Face));
        snap.edges
            .extend(introspect.compute_all_signatures(solid, TopoKind::Edge));
    }
    snap
}

/// Result of diffing two topology snapshots.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Entities present in `after` but not in `before`.
    pub created: Vec<EntityRecord>,
    /// Entities present in `before` but not in `after`.
    pub deleted: Vec<EntityRecord>,
}

/// Diff two snapshots by entity id.
///
/// Kernel ids are persistent, so an entity present on both sides survived
/// even when its geometry changed (trimmed, drafted, moved).
pub fn diff(before: &TopoSnapshot, after: &TopoSnapshot) -> DiffResult {
    let mut result = DiffResult::default();
    diff_kind(&before.faces, &after.faces, TopoKind::Face, &mut result);
    diff_kind(&before.edges, &after.edges, TopoKind::Edge, &mut result);
    result
}

fn diff_kind(
    before: &[(KernelId, TopoSignature)],
    after: &[(KernelId, TopoSignature)],
    kind: TopoKind,
    result: &mut DiffResult,
) {
    let before_map: BTreeMap<KernelId, &TopoSignature> =
        before.iter().map(|(id, sig)| (*id, sig)).collect();
    let after_map: BTreeMap<KernelId, &TopoSignature> =
        after.iter().map(|(id, sig)| (*id, sig)).collect();

    for (id, sig) in &after_map {
        if !before_map.contains_key(id) {
            result.created.push(EntityRecord {
                kernel_id: *id,
                kind,
                signature: (*sig).clone(),
            });
        }
    }
    for (id, sig) in &before_map {
        if !after_map.contains_key(id) {
            result.deleted.push(EntityRecord {
                kernel_id: *id,
                kind,
                signature: (*sig).clone(),
            });
        }
    }
}

/// Run a kernel mutation between two snapshots and package the outcome.
///
/// `inputs` are the solids the operation reads or consumes; the closure
/// returns the solids it produced. Created entities are those of the outputs
/// that did not exist on any input.
pub(crate) fn tracked<F>(
    kb: &mut dyn KernelBundle,
    inputs: &[KernelSolidHandle],
    op: F,
) -> Result<OpResult, OpError>
where
    F: FnOnce(&mut dyn KernelBundle) -> Result<Vec<KernelSolidHandle>, OpError>,
{
    let before = snapshot(kb.as_introspect(), inputs);
    let outputs = op(kb)?;
    let after = snapshot(kb.as_introspect(), &outputs);
    let DiffResult { created, deleted } = diff(&before, &after);
    Ok(OpResult {
        outputs,
        provenance: Provenance { created, deleted },
        diagnostics: Diagnostics::default(),
    })
}
