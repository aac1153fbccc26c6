use gridbin_kernel::{KernelError, KernelId, KernelSolidHandle};
use gridbin_types::{Orientation, TopoKind, TopoSignature};

/// Complete result of a modeling operation.
/// Contains everything bin-engine needs to record a stage and to look up
/// the entities it produced later in the pipeline.
#[derive(Debug, Clone)]
pub struct OpResult {
    /// The solids produced or modified by this operation. The first entry is
    /// the main output.
    pub outputs: Vec<KernelSolidHandle>,
    /// Provenance: what entities were created and deleted.
    pub provenance: Provenance,
    /// Non-fatal warnings.
    pub diagnostics: Diagnostics,
}

impl OpResult {
    /// The main output solid.
    pub fn main(&self) -> Option<KernelSolidHandle> {
        self.outputs.first().copied()
    }

    /// Ids of created entities of one kind.
    pub fn created(&self, kind: TopoKind) -> Vec<KernelId> {
        self.provenance
            .created
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.kernel_id)
            .collect()
    }
}

/// Provenance tracking: what happened to topology during an operation.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    /// Entities that exist in the result but not in the input.
    pub created: Vec<EntityRecord>,
    /// Entities that existed in the input but not in the result.
    pub deleted: Vec<EntityRecord>,
}

/// Record of a topological entity with its kernel ID and signature.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub kernel_id: KernelId,
    /// Edge or face.
    pub kind: TopoKind,
    /// Geometric signature at the time of recording.
    pub signature: TopoSignature,
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("no profiles available for operation")]
    NoProfiles,

    #[error("no bodies given to combine")]
    NoBodies,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("no planar face faces {orientation}")]
    FaceNotFound { orientation: Orientation },

    #[error("{count} planar faces face {orientation}, expected exactly one")]
    AmbiguousFace {
        orientation: Orientation,
        count: usize,
    },

    #[error("no edge to pick towards {orientation}")]
    EdgeNotFound { orientation: Orientation },
}
