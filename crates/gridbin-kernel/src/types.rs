use serde::{Deserialize, Serialize};

// Re-export shared types from gridbin-types
pub use gridbin_types::{Aabb, EdgeCurve, SketchPlane, SketchShape, TopoKind, TopoSignature, Vec3};

/// Opaque handle to a solid in the geometry kernel.
/// Valid only for the current kernel session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque handle to a sketch (a construction body holding planar regions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelSketchHandle(pub(crate) u64);

impl KernelSketchHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Kernel-internal entity identifier for faces, edges and sketch regions.
///
/// Persistent for the whole session: an entity keeps its id through every
/// operation that only modifies it, and ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KernelId(pub u64);

/// A sketch and the planar regions it bounds, one per drawn shape.
#[derive(Debug, Clone)]
pub struct KernelSketch {
    pub handle: KernelSketchHandle,
    pub regions: Vec<KernelId>,
}

/// How far an extrusion goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtrudeExtent {
    /// Signed distance along the extrusion direction.
    Blind { depth: f64 },
    /// Up to the plane of an existing planar face.
    UpToFace { face: KernelId },
}

/// One direction of a linear pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternDirection {
    pub direction: Vec3,
    pub spacing: f64,
    /// Number of instances along this direction, the original included.
    pub count: u32,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("draft failed: {reason}")]
    DraftFailed { reason: String },

    #[error("sweep failed: {reason}")]
    SweepFailed { reason: String },

    #[error("extrude failed: {reason}")]
    ExtrudeFailed { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("solid not found: {handle:?}")]
    SolidNotFound { handle: KernelSolidHandle },

    #[error("sketch not found: {handle:?}")]
    SketchNotFound { handle: KernelSketchHandle },
}
