use crate::types::*;

/// Core geometry kernel trait: shape construction and modification.
/// Implemented by MockKernel (deterministic test double); a production
/// modeller plugs in behind the same seam.
pub trait Kernel {
    /// Create a sketch holding one planar region per shape.
    fn create_sketch(
        &mut self,
        plane: &SketchPlane,
        shapes: &[SketchShape],
    ) -> Result<KernelSketch, KernelError>;

    /// Remove a sketch and its regions.
    fn delete_sketch(&mut self, sketch: &KernelSketchHandle) -> Result<(), KernelError>;

    /// Extrude planar regions (sketch regions or faces of solids) into a new solid.
    fn extrude(
        &mut self,
        regions: &[KernelId],
        direction: Vec3,
        extent: ExtrudeExtent,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union. The target survives; the tool is consumed.
    fn boolean_union(
        &mut self,
        target: &KernelSolidHandle,
        tool: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: target minus tool. The tool is consumed.
    fn boolean_subtract(
        &mut self,
        target: &KernelSolidHandle,
        tool: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Fillet (round) edges, optionally following tangent-continuous chains.
    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        radius: f64,
        tangent_propagation: bool,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Equal-distance chamfer on edges.
    fn chamfer_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        distance: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Draft planar faces about a reference face. `angle` is in radians.
    fn draft_faces(
        &mut self,
        solid: &KernelSolidHandle,
        faces: &[KernelId],
        reference: KernelId,
        pull_direction: Vec3,
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Rectangular linear pattern. Returns the new instances only.
    fn linear_pattern(
        &mut self,
        solid: &KernelSolidHandle,
        first: PatternDirection,
        second: Option<PatternDirection>,
    ) -> Result<Vec<KernelSolidHandle>, KernelError>;

    /// Sweep a planar profile region along a closed loop of edges.
    fn sweep(
        &mut self,
        profile: KernelId,
        path: &[KernelId],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Delete a solid.
    fn delete_solid(&mut self, solid: &KernelSolidHandle) -> Result<(), KernelError>;

    /// Rigid translation.
    fn translate(&mut self, solid: &KernelSolidHandle, offset: Vec3) -> Result<(), KernelError>;

    /// Assign the name property of a solid.
    fn set_name(&mut self, solid: &KernelSolidHandle, name: &str) -> Result<(), KernelError>;
}

/// Topology introspection trait. Read-only queries on kernel geometry.
pub trait KernelIntrospect {
    /// All live solids, in creation order.
    fn list_solids(&self) -> Vec<KernelSolidHandle>;

    /// All live sketches, in creation order.
    fn list_sketches(&self) -> Vec<KernelSketchHandle>;

    /// List all faces of a solid.
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId>;

    /// List all edges of a solid.
    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId>;

    /// All edges bounding a face, outer loop first.
    fn face_edges(&self, face: KernelId) -> Vec<KernelId>;

    /// Boundary loops of a face: the outer loop, then any holes.
    fn face_loops(&self, face: KernelId) -> Vec<Vec<KernelId>>;

    /// Faces adjacent to an edge.
    fn edge_faces(&self, edge: KernelId) -> Vec<KernelId>;

    /// Geometry of an edge.
    fn edge_curve(&self, edge: KernelId) -> Option<EdgeCurve>;

    /// The solid currently owning a face or edge, if it is still alive.
    fn owner_solid(&self, entity: KernelId) -> Option<KernelSolidHandle>;

    /// Compute the geometric signature of a single entity.
    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature;

    /// Compute signatures for all entities of a given kind in a solid.
    fn compute_all_signatures(
        &self,
        solid: &KernelSolidHandle,
        kind: TopoKind,
    ) -> Vec<(KernelId, TopoSignature)>;

    /// Bounding box of a solid.
    fn solid_bounding_box(&self, solid: &KernelSolidHandle) -> Option<Aabb>;

    /// Enclosed volume of a solid.
    fn solid_volume(&self, solid: &KernelSolidHandle) -> Option<f64>;

    /// Name property of a solid.
    fn solid_name(&self, solid: &KernelSolidHandle) -> Option<String>;
}
