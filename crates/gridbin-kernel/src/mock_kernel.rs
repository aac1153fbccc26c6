//! MockKernel: deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Keeps a light boundary representation: faces own loops of edge ids, edges
//! own their curve geometry. Entity ids are allocated sequentially and never
//! reused, and every map is ordered, so two runs with the same calls produce
//! identical ids and geometry.
//!
//! Geometry is simplified where exactness does not matter to callers:
//! unions are additive in volume, coplanar faces are trimmed by bounding-box
//! containment, and blends on arbitrary edges are approximated by offset
//! curves.

mod blend;
mod boolean;
mod build;
mod sweep;

use std::collections::{BTreeMap, BTreeSet};

use gridbin_types::curve::{chain_curves, loop_points, signed_area};
use gridbin_types::vec3::{self, EPS};
use tracing::debug;

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// Surface kind of a mock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceKind {
    Planar,
    Cylindrical,
    Conical,
    Blend,
}

impl SurfaceKind {
    fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Planar => "planar",
            SurfaceKind::Cylindrical => "cylindrical",
            SurfaceKind::Conical => "conical",
            SurfaceKind::Blend => "blend",
        }
    }
}

/// Axis of a surface of revolution: a point on it, its direction, and +1 when
/// the outward normal points away from the axis (-1 towards it).
#[derive(Debug, Clone, Copy)]
struct SurfaceAxis {
    point: Vec3,
    direction: Vec3,
    sign: f64,
}

#[derive(Debug, Clone)]
struct MockEdge {
    solid: u64,
    curve: EdgeCurve,
}

#[derive(Debug, Clone)]
struct MockFace {
    solid: u64,
    kind: SurfaceKind,
    /// Outward normal; representative only for curved faces.
    normal: Vec3,
    axis: Option<SurfaceAxis>,
    outer: Vec<KernelId>,
    holes: Vec<Vec<KernelId>>,
}

impl MockFace {
    fn loops(&self) -> impl Iterator<Item = &Vec<KernelId>> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    fn contains_edge(&self, edge: KernelId) -> bool {
        self.loops().any(|l| l.contains(&edge))
    }

    fn replace_edge(&mut self, old: KernelId, new: KernelId) {
        for l in std::iter::once(&mut self.outer).chain(self.holes.iter_mut()) {
            for e in l.iter_mut() {
                if *e == old {
                    *e = new;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct MockSolid {
    name: Option<String>,
    volume: f64,
}

#[derive(Debug, Clone)]
struct MockRegion {
    plane: SketchPlane,
    outer: Vec<EdgeCurve>,
}

/// A planar region ready to be extruded: boundary loops, normal and area.
#[derive(Debug, Clone)]
struct RegionLoops {
    point: Vec3,
    normal: Vec3,
    outer: Vec<EdgeCurve>,
    holes: Vec<Vec<EdgeCurve>>,
    area: f64,
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    solids: BTreeMap<u64, MockSolid>,
    sketches: BTreeMap<u64, Vec<KernelId>>,
    regions: BTreeMap<KernelId, MockRegion>,
    faces: BTreeMap<KernelId, MockFace>,
    edges: BTreeMap<KernelId, MockEdge>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            solids: BTreeMap::new(),
            sketches: BTreeMap::new(),
            regions: BTreeMap::new(),
            faces: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn add_edge(&mut self, solid: u64, curve: EdgeCurve) -> KernelId {
        let id = self.alloc_id();
        self.edges.insert(id, MockEdge { solid, curve });
        id
    }

    fn add_face(&mut self, face: MockFace) -> KernelId {
        let id = self.alloc_id();
        self.faces.insert(id, face);
        id
    }

    fn require_solid(&self, solid: &KernelSolidHandle) -> Result<u64, KernelError> {
        if self.solids.contains_key(&solid.id()) {
            Ok(solid.id())
        } else {
            Err(KernelError::SolidNotFound { handle: *solid })
        }
    }

    fn faces_of(&self, solid: u64) -> Vec<KernelId> {
        self.faces
            .iter()
            .filter(|(_, f)| f.solid == solid)
            .map(|(id, _)| *id)
            .collect()
    }

    fn edges_of(&self, solid: u64) -> Vec<KernelId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.solid == solid)
            .map(|(id, _)| *id)
            .collect()
    }

    fn planar_faces_of(&self, solid: u64) -> Vec<KernelId> {
        self.faces
            .iter()
            .filter(|(_, f)| f.solid == solid && f.kind == SurfaceKind::Planar)
            .map(|(id, _)| *id)
            .collect()
    }

    fn faces_of_edge(&self, edge: KernelId) -> Vec<KernelId> {
        let Some(e) = self.edges.get(&edge) else {
            return Vec::new();
        };
        self.faces
            .iter()
            .filter(|(_, f)| f.solid == e.solid && f.contains_edge(edge))
            .map(|(id, _)| *id)
            .collect()
    }

    fn curve(&self, edge: KernelId) -> Result<EdgeCurve, KernelError> {
        self.edges
            .get(&edge)
            .map(|e| e.curve.clone())
            .ok_or(KernelError::EntityNotFound { id: edge })
    }

    /// Head-to-tail curves of one face loop.
    fn loop_chain(&self, ids: &[KernelId]) -> Vec<EdgeCurve> {
        let curves: Vec<EdgeCurve> = ids
            .iter()
            .filter_map(|id| self.edges.get(id).map(|e| e.curve.clone()))
            .collect();
        chain_curves(&curves)
    }

    fn loop_bbox(&self, ids: &[KernelId]) -> Aabb {
        let mut bbox = Aabb::from_points(&[]);
        for id in ids {
            if let Some(e) = self.edges.get(id) {
                bbox = bbox.union(&e.curve.bounding_box());
            }
        }
        bbox
    }

    fn face_bbox(&self, face: &MockFace) -> Aabb {
        face.loops()
            .fold(Aabb::from_points(&[]), |acc, l| acc.union(&self.loop_bbox(l)))
    }

    /// Any point on the face boundary; for planar faces a point of the plane.
    fn face_point(&self, face: &MockFace) -> Option<Vec3> {
        face.outer
            .first()
            .and_then(|id| self.edges.get(id))
            .map(|e| e.curve.start())
    }

    fn face_centroid(&self, face: &MockFace) -> Vec3 {
        let points = loop_points(&self.loop_chain(&face.outer));
        if points.is_empty() {
            return [0.0; 3];
        }
        let sum = points.iter().fold([0.0; 3], |acc, p| vec3::add(acc, *p));
        vec3::scale(sum, 1.0 / points.len() as f64)
    }

    fn planar_area(&self, face: &MockFace) -> f64 {
        let outer = signed_area(&loop_points(&self.loop_chain(&face.outer)), face.normal).abs();
        let holes: f64 = face
            .holes
            .iter()
            .map(|h| signed_area(&loop_points(&self.loop_chain(h)), face.normal).abs())
            .sum();
        outer - holes
    }

    /// Outward normal of a face at a point on it.
    fn normal_at(&self, face: &MockFace, p: Vec3) -> Vec3 {
        match face.axis {
            Some(axis) => {
                let radial = vec3::reject(vec3::sub(p, axis.point), axis.direction);
                if vec3::norm(radial) < EPS {
                    face.normal
                } else {
                    vec3::scale(vec3::normalize(radial), axis.sign)
                }
            }
            None => face.normal,
        }
    }

    fn solid_bbox(&self, solid: u64) -> Aabb {
        self.edges
            .values()
            .filter(|e| e.solid == solid)
            .fold(Aabb::from_points(&[]), |acc, e| acc.union(&e.curve.bounding_box()))
    }

    /// Drop edges no longer bounding any face of the solid.
    fn prune_edges(&mut self, solid: u64) {
        let used: BTreeSet<KernelId> = self
            .faces
            .values()
            .filter(|f| f.solid == solid)
            .flat_map(|f| f.loops().flatten().copied().collect::<Vec<_>>())
            .collect();
        let stale: Vec<KernelId> = self
            .edges
            .iter()
            .filter(|(id, e)| e.solid == solid && !used.contains(id))
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.edges.remove(&id);
        }
    }

    /// Point on the plane of a sketch region or planar face.
    fn reference_point(&self, id: KernelId) -> Option<Vec3> {
        if let Some(region) = self.regions.get(&id) {
            return Some(region.plane.origin);
        }
        self.faces.get(&id).and_then(|f| self.face_point(f))
    }

    /// Resolve a sketch region or planar face into extrudable loops.
    fn region_loops(&self, id: KernelId) -> Result<RegionLoops, KernelError> {
        if let Some(region) = self.regions.get(&id) {
            let outer = chain_curves(&region.outer);
            let area = signed_area(&loop_points(&outer), region.plane.normal).abs();
            return Ok(RegionLoops {
                point: region.plane.origin,
                normal: region.plane.normal,
                outer,
                holes: Vec::new(),
                area,
            });
        }
        let face = self
            .faces
            .get(&id)
            .ok_or(KernelError::EntityNotFound { id })?;
        if face.kind != SurfaceKind::Planar {
            return Err(KernelError::ExtrudeFailed {
                reason: format!("face {:?} is not planar", id),
            });
        }
        let point = self
            .face_point(face)
            .ok_or(KernelError::EntityNotFound { id })?;
        Ok(RegionLoops {
            point,
            normal: face.normal,
            outer: self.loop_chain(&face.outer),
            holes: face.holes.iter().map(|h| self.loop_chain(h)).collect(),
            area: self.planar_area(face),
        })
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn create_sketch(
        &mut self,
        plane: &SketchPlane,
        shapes: &[SketchShape],
    ) -> Result<KernelSketch, KernelError> {
        let sketch = self.alloc_handle();
        let mut regions = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let id = self.alloc_id();
            self.regions.insert(
                id,
                MockRegion {
                    plane: *plane,
                    outer: shape.boundary(plane),
                },
            );
            regions.push(id);
        }
        self.sketches.insert(sketch, regions.clone());
        debug!(sketch, regions = regions.len(), "mock sketch created");
        Ok(KernelSketch {
            handle: KernelSketchHandle(sketch),
            regions,
        })
    }

    fn delete_sketch(&mut self, sketch: &KernelSketchHandle) -> Result<(), KernelError> {
        let regions = self
            .sketches
            .remove(&sketch.id())
            .ok_or(KernelError::SketchNotFound { handle: *sketch })?;
        for id in regions {
            self.regions.remove(&id);
        }
        Ok(())
    }

    fn extrude(
        &mut self,
        regions: &[KernelId],
        direction: Vec3,
        extent: ExtrudeExtent,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.extrude_regions(regions, direction, extent)
    }

    fn boolean_union(
        &mut self,
        target: &KernelSolidHandle,
        tool: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let (t, o) = (self.require_solid(target)?, self.require_solid(tool)?);
        if t == o {
            return Err(KernelError::BooleanFailed {
                reason: "cannot unite a solid with itself".to_string(),
            });
        }
        self.unite(t, o);
        Ok(*target)
    }

    fn boolean_subtract(
        &mut self,
        target: &KernelSolidHandle,
        tool: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let (t, o) = (self.require_solid(target)?, self.require_solid(tool)?);
        if t == o {
            return Err(KernelError::BooleanFailed {
                reason: "cannot subtract a solid from itself".to_string(),
            });
        }
        self.subtract(t, o);
        Ok(*target)
    }

    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        radius: f64,
        tangent_propagation: bool,
    ) -> Result<KernelSolidHandle, KernelError> {
        let s = self.require_solid(solid)?;
        self.blend_edges(s, edges, radius, blend::BlendKind::Fillet, tangent_propagation)?;
        Ok(*solid)
    }

    fn chamfer_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        distance: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let s = self.require_solid(solid)?;
        self.blend_edges(s, edges, distance, blend::BlendKind::Chamfer, false)?;
        Ok(*solid)
    }

    fn draft_faces(
        &mut self,
        solid: &KernelSolidHandle,
        faces: &[KernelId],
        reference: KernelId,
        pull_direction: Vec3,
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let s = self.require_solid(solid)?;
        self.draft(s, faces, reference, pull_direction, angle)?;
        Ok(*solid)
    }

    fn linear_pattern(
        &mut self,
        solid: &KernelSolidHandle,
        first: PatternDirection,
        second: Option<PatternDirection>,
    ) -> Result<Vec<KernelSolidHandle>, KernelError> {
        let s = self.require_solid(solid)?;
        let second_count = second.map(|d| d.count).unwrap_or(1);
        let mut instances = Vec::new();
        for j in 0..second_count {
            for i in 0..first.count {
                if i == 0 && j == 0 {
                    continue;
                }
                let mut offset = vec3::scale(vec3::normalize(first.direction), first.spacing * i as f64);
                if let Some(d) = second {
                    offset = vec3::add(
                        offset,
                        vec3::scale(vec3::normalize(d.direction), d.spacing * j as f64),
                    );
                }
                instances.push(KernelSolidHandle(self.clone_solid(s, offset)));
            }
        }
        debug!(solid = s, instances = instances.len(), "mock linear pattern");
        Ok(instances)
    }

    fn sweep(
        &mut self,
        profile: KernelId,
        path: &[KernelId],
    ) -> Result<KernelSolidHandle, KernelError> {
        self.sweep_profile(profile, path).map(KernelSolidHandle)
    }

    fn delete_solid(&mut self, solid: &KernelSolidHandle) -> Result<(), KernelError> {
        let s = self.require_solid(solid)?;
        self.solids.remove(&s);
        self.faces.retain(|_, f| f.solid != s);
        self.edges.retain(|_, e| e.solid != s);
        Ok(())
    }

    fn translate(&mut self, solid: &KernelSolidHandle, offset: Vec3) -> Result<(), KernelError> {
        let s = self.require_solid(solid)?;
        self.translate_solid(s, offset);
        Ok(())
    }

    fn set_name(&mut self, solid: &KernelSolidHandle, name: &str) -> Result<(), KernelError> {
        let s = self.require_solid(solid)?;
        if let Some(entry) = self.solids.get_mut(&s) {
            entry.name = Some(name.to_string());
        }
        Ok(())
    }
}

impl KernelIntrospect for MockKernel {
    fn list_solids(&self) -> Vec<KernelSolidHandle> {
        self.solids.keys().map(|&id| KernelSolidHandle(id)).collect()
    }

    fn list_sketches(&self) -> Vec<KernelSketchHandle> {
        self.sketches.keys().map(|&id| KernelSketchHandle(id)).collect()
    }

    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.faces_of(solid.id())
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        self.edges_of(solid.id())
    }

    fn face_edges(&self, face: KernelId) -> Vec<KernelId> {
        self.face_loops(face).into_iter().flatten().collect()
    }

    fn face_loops(&self, face: KernelId) -> Vec<Vec<KernelId>> {
        self.faces
            .get(&face)
            .map(|f| f.loops().cloned().collect())
            .unwrap_or_default()
    }

    fn edge_faces(&self, edge: KernelId) -> Vec<KernelId> {
        self.faces_of_edge(edge)
    }

    fn edge_curve(&self, edge: KernelId) -> Option<EdgeCurve> {
        self.edges.get(&edge).map(|e| e.curve.clone())
    }

    fn owner_solid(&self, entity: KernelId) -> Option<KernelSolidHandle> {
        self.faces
            .get(&entity)
            .map(|f| f.solid)
            .or_else(|| self.edges.get(&entity).map(|e| e.solid))
            .map(KernelSolidHandle)
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        match kind {
            TopoKind::Face => match self.faces.get(&entity) {
                Some(face) => TopoSignature {
                    surface_type: Some(face.kind.as_str().to_string()),
                    area: (face.kind == SurfaceKind::Planar).then(|| self.planar_area(face)),
                    centroid: Some(self.face_centroid(face)),
                    normal: Some(face.normal),
                    bbox: Some(self.face_bbox(face)),
                    length: None,
                },
                None => TopoSignature::empty(),
            },
            TopoKind::Edge => match self.edges.get(&entity) {
                Some(edge) => TopoSignature {
                    surface_type: Some(
                        match edge.curve {
                            EdgeCurve::Line { .. } => "line",
                            EdgeCurve::Arc { .. } => "arc",
                        }
                        .to_string(),
                    ),
                    area: None,
                    centroid: Some(edge.curve.midpoint()),
                    normal: None,
                    bbox: Some(edge.curve.bounding_box()),
                    length: Some(edge.curve.length()),
                },
                None => TopoSignature::empty(),
            },
        }
    }

    fn compute_all_signatures(
        &self,
        solid: &KernelSolidHandle,
        kind: TopoKind,
    ) -> Vec<(KernelId, TopoSignature)> {
        let ids = match kind {
            TopoKind::Face => self.faces_of(solid.id()),
            TopoKind::Edge => self.edges_of(solid.id()),
        };
        ids.into_iter()
            .map(|id| (id, self.compute_signature(id, kind)))
            .collect()
    }

    fn solid_bounding_box(&self, solid: &KernelSolidHandle) -> Option<Aabb> {
        self.solids
            .contains_key(&solid.id())
            .then(|| self.solid_bbox(solid.id()))
    }

    fn solid_volume(&self, solid: &KernelSolidHandle) -> Option<f64> {
        self.solids.get(&solid.id()).map(|s| s.volume)
    }

    fn solid_name(&self, solid: &KernelSolidHandle) -> Option<String> {
        self.solids.get(&solid.id()).and_then(|s| s.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const UP: Vec3 = [0.0, 0.0, 1.0];

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> SketchShape {
        SketchShape::Rectangle {
            first_corner: (x0, y0),
            second_corner: (x1, y1),
        }
    }

    fn make_box(k: &mut MockKernel, w: f64, d: f64, h: f64) -> KernelSolidHandle {
        let sketch = k
            .create_sketch(&SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, w, d)])
            .unwrap();
        k.extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: h })
            .unwrap()
    }

    fn planar_faces_with_normal(k: &MockKernel, solid: &KernelSolidHandle, n: Vec3) -> Vec<KernelId> {
        k.list_faces(solid)
            .into_iter()
            .filter(|&f| {
                let sig = k.compute_signature(f, TopoKind::Face);
                sig.surface_type.as_deref() == Some("planar")
                    && sig.normal.map(|m| vec3::approx_eq(m, n)).unwrap_or(false)
            })
            .collect()
    }

    fn vertical_edges(k: &MockKernel, solid: &KernelSolidHandle) -> Vec<KernelId> {
        k.list_edges(solid)
            .into_iter()
            .filter(|&e| k.edge_curve(e).map(|c| c.is_parallel_to(UP)).unwrap_or(false))
            .collect()
    }

    // ── Extrude ─────────────────────────────────────────────────────────────

    #[test]
    fn box_extrude_topology_and_volume() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 10.0, 20.0, 5.0);

        assert_eq!(k.list_faces(&b).len(), 6, "box has 6 faces");
        assert_eq!(k.list_edges(&b).len(), 12, "box has 12 edges");
        assert_relative_eq!(k.solid_volume(&b).unwrap(), 1000.0, epsilon = 1e-9);

        let bbox = k.solid_bounding_box(&b).unwrap();
        assert_relative_eq!(bbox.size()[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.size()[1], 20.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.size()[2], 5.0, epsilon = 1e-9);

        for (n, expected) in [
            ([0.0, 0.0, 1.0], 1),
            ([0.0, 0.0, -1.0], 1),
            ([1.0, 0.0, 0.0], 1),
            ([-1.0, 0.0, 0.0], 1),
            ([0.0, 1.0, 0.0], 1),
            ([0.0, -1.0, 0.0], 1),
        ] {
            assert_eq!(
                planar_faces_with_normal(&k, &b, n).len(),
                expected,
                "one outward face per axis direction {:?}",
                n
            );
        }
    }

    #[test]
    fn extrude_existing_face_keeps_source_solid() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 4.0, 4.0, 1.0);
        let top = planar_faces_with_normal(&k, &b, UP)[0];
        let lid = k.extrude(&[top], UP, ExtrudeExtent::Blind { depth: 2.0 }).unwrap();

        assert_ne!(lid, b);
        assert_eq!(k.list_solids().len(), 2);
        let bbox = k.solid_bounding_box(&lid).unwrap();
        assert_relative_eq!(bbox.min[2], 1.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max[2], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn extrude_up_to_face_measures_depth() {
        let mut k = MockKernel::new();
        let wall = make_box(&mut k, 1.0, 10.0, 10.0);
        k.translate(&wall, [20.0, 0.0, 0.0]).unwrap();
        let right = planar_faces_with_normal(&k, &wall, [1.0, 0.0, 0.0])[0];

        let plane = SketchPlane::new([2.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let sketch = k.create_sketch(&plane, &[rect(0.0, 0.0, 1.0, 1.0)]).unwrap();
        let rib = k
            .extrude(&sketch.regions, [1.0, 0.0, 0.0], ExtrudeExtent::UpToFace { face: right })
            .unwrap();
        let bbox = k.solid_bounding_box(&rib).unwrap();
        assert_relative_eq!(bbox.max[0], 21.0, epsilon = 1e-9);
    }

    #[test]
    fn circle_extrude_is_cylinder() {
        let mut k = MockKernel::new();
        let circle = SketchShape::Circle {
            center: (0.0, 0.0),
            radius: 2.0,
        };
        let sketch = k.create_sketch(&SketchPlane::horizontal(0.0), &[circle]).unwrap();
        let c = k.extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: 3.0 }).unwrap();

        assert_eq!(k.list_faces(&c).len(), 3, "cylinder: side, bottom, top");
        assert_relative_eq!(k.solid_volume(&c).unwrap(), PI * 4.0 * 3.0, max_relative = 0.01);
    }

    // ── Fillet / chamfer / draft ────────────────────────────────────────────

    #[test]
    fn vertical_fillet_rounds_corners() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 10.0, 10.0, 2.0);
        let before = k.solid_volume(&b).unwrap();
        let seams = vertical_edges(&k, &b);
        assert_eq!(seams.len(), 4);

        k.fillet_edges(&b, &seams, 1.0, false).unwrap();

        let top = planar_faces_with_normal(&k, &b, UP)[0];
        let arcs = k
            .face_edges(top)
            .into_iter()
            .filter(|&e| matches!(k.edge_curve(e), Some(EdgeCurve::Arc { .. })))
            .count();
        assert_eq!(arcs, 4, "top cap gains one arc per corner");
        assert_eq!(k.face_edges(top).len(), 8);
        let cylinders = k
            .list_faces(&b)
            .into_iter()
            .filter(|&f| {
                k.compute_signature(f, TopoKind::Face).surface_type.as_deref() == Some("cylindrical")
            })
            .count();
        assert_eq!(cylinders, 4);

        let removed = 4.0 * (1.0 - PI / 4.0) * 2.0;
        assert_relative_eq!(k.solid_volume(&b).unwrap(), before - removed, epsilon = 1e-9);
        // Footprint is unchanged by rounding.
        let bbox = k.solid_bounding_box(&b).unwrap();
        assert_relative_eq!(bbox.size()[0], 10.0, epsilon = 1e-6);
    }

    #[test]
    fn vertical_fillet_rounds_every_corner_off_origin() {
        let mut k = MockKernel::new();
        let sketch = k
            .create_sketch(&SketchPlane::horizontal(0.0), &[rect(-20.75, -20.75, 20.75, 20.75)])
            .unwrap();
        let b = k
            .extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: 2.0 })
            .unwrap();
        let seams = vertical_edges(&k, &b);
        k.fillet_edges(&b, &seams, 3.75, false).unwrap();

        for n in [UP, [0.0, 0.0, -1.0]] {
            let cap = planar_faces_with_normal(&k, &b, n)[0];
            let arcs = k
                .face_edges(cap)
                .into_iter()
                .filter(|&e| matches!(k.edge_curve(e), Some(EdgeCurve::Arc { .. })))
                .count();
            assert_eq!(arcs, 4, "each cap is rounded at all four corners");
        }
        let bbox = k.solid_bounding_box(&b).unwrap();
        assert_relative_eq!(bbox.min[0], -20.75, epsilon = 1e-6);
        assert_relative_eq!(bbox.max[1], 20.75, epsilon = 1e-6);
    }

    #[test]
    fn chamfer_on_top_edge_adds_planar_face() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 10.0, 10.0, 10.0);
        let top = planar_faces_with_normal(&k, &b, UP)[0];
        let edge = k.face_edges(top)[0];
        let faces_before = k.list_faces(&b).len();

        k.chamfer_edges(&b, &[edge], 1.0).unwrap();

        assert_eq!(k.list_faces(&b).len(), faces_before + 1);
        assert!(k.edge_curve(edge).is_none(), "chamfered edge is consumed");
        assert_relative_eq!(k.solid_volume(&b).unwrap(), 1000.0 - 5.0, epsilon = 1e-9);
    }

    #[test]
    fn fillet_rejects_foreign_edge() {
        let mut k = MockKernel::new();
        let a = make_box(&mut k, 1.0, 1.0, 1.0);
        let b = make_box(&mut k, 1.0, 1.0, 1.0);
        let foreign = k.list_edges(&b)[0];
        let err = k.fillet_edges(&a, &[foreign], 0.1, false).unwrap_err();
        assert!(matches!(err, KernelError::EntityNotFound { .. }));
    }

    #[test]
    fn draft_widens_towards_the_top() {
        let mut k = MockKernel::new();
        let sketch = k
            .create_sketch(&SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 10.0, 10.0)])
            .unwrap();
        let b = k.extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: 1.0 }).unwrap();
        let sides: Vec<KernelId> = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, -1.0, 0.0]]
            .iter()
            .flat_map(|&n| planar_faces_with_normal(&k, &b, n))
            .collect();

        k.draft_faces(&b, &sides, sketch.regions[0], [0.0, 0.0, -1.0], PI / 4.0)
            .unwrap();

        let bbox = k.solid_bounding_box(&b).unwrap();
        assert_relative_eq!(bbox.size()[0], 12.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.min[0], -1.0, epsilon = 1e-9);
        let bottom = planar_faces_with_normal(&k, &b, [0.0, 0.0, -1.0])[0];
        let sig = k.compute_signature(bottom, TopoKind::Face);
        assert_relative_eq!(sig.area.unwrap(), 100.0, epsilon = 1e-9);
        let top = planar_faces_with_normal(&k, &b, UP)[0];
        assert_relative_eq!(k.compute_signature(top, TopoKind::Face).area.unwrap(), 144.0, epsilon = 1e-9);
    }

    // ── Booleans ────────────────────────────────────────────────────────────

    #[test]
    fn union_of_stacked_boxes_glues_contact_faces() {
        let mut k = MockKernel::new();
        let lower = make_box(&mut k, 5.0, 5.0, 1.0);
        let top = planar_faces_with_normal(&k, &lower, UP)[0];
        let upper = k.extrude(&[top], UP, ExtrudeExtent::Blind { depth: 1.0 }).unwrap();

        let survivor = k.boolean_union(&lower, &upper).unwrap();

        assert_eq!(survivor, lower, "target keeps its identity");
        assert_eq!(k.list_solids(), vec![lower]);
        assert_eq!(k.list_faces(&lower).len(), 10, "contact faces removed");
        assert_eq!(planar_faces_with_normal(&k, &lower, UP).len(), 1);
        assert!(k.owner_solid(top).is_none(), "glued face is gone");
        assert_relative_eq!(k.solid_volume(&lower).unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn union_with_larger_cap_pierces_it() {
        let mut k = MockKernel::new();
        let post = make_box(&mut k, 2.0, 2.0, 1.0);
        let post_top = planar_faces_with_normal(&k, &post, UP)[0];
        let sketch = k
            .create_sketch(&SketchPlane::horizontal(1.0), &[rect(-5.0, -5.0, 5.0, 5.0)])
            .unwrap();
        let cap = k.extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: 1.0 }).unwrap();
        let cap_bottom = planar_faces_with_normal(&k, &cap, [0.0, 0.0, -1.0])[0];

        k.boolean_union(&post, &cap).unwrap();

        assert!(k.owner_solid(post_top).is_none());
        assert_eq!(k.face_loops(cap_bottom).len(), 2, "cap bottom gains a hole");
        assert_eq!(k.owner_solid(cap_bottom), Some(post));
    }

    #[test]
    fn subtract_opens_coplanar_face() {
        let mut k = MockKernel::new();
        let block = make_box(&mut k, 10.0, 10.0, 5.0);
        let bottom = planar_faces_with_normal(&k, &block, [0.0, 0.0, -1.0])[0];
        let circle = SketchShape::Circle {
            center: (5.0, 5.0),
            radius: 1.0,
        };
        let sketch = k.create_sketch(&SketchPlane::horizontal(0.0), &[circle]).unwrap();
        let pin = k.extrude(&sketch.regions, UP, ExtrudeExtent::Blind { depth: 2.0 }).unwrap();
        let pin_volume = k.solid_volume(&pin).unwrap();

        k.boolean_subtract(&block, &pin).unwrap();

        assert_eq!(k.list_solids(), vec![block]);
        assert_eq!(k.face_loops(bottom).len(), 2, "bottom face gains the socket opening");
        assert_relative_eq!(k.solid_volume(&block).unwrap(), 500.0 - pin_volume, epsilon = 1e-9);
        // Socket ceiling now faces down into the socket.
        assert_eq!(planar_faces_with_normal(&k, &block, [0.0, 0.0, -1.0]).len(), 2);
    }

    // ── Pattern / sweep / misc ──────────────────────────────────────────────

    #[test]
    fn pattern_creates_translated_instances() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 1.0, 1.0, 1.0);
        let first = PatternDirection {
            direction: [1.0, 0.0, 0.0],
            spacing: 3.0,
            count: 3,
        };
        let second = PatternDirection {
            direction: [0.0, 1.0, 0.0],
            spacing: 2.0,
            count: 2,
        };
        let instances = k.linear_pattern(&b, first, Some(second)).unwrap();
        assert_eq!(instances.len(), 5);

        let last = k.solid_bounding_box(&instances[4]).unwrap();
        assert_relative_eq!(last.min[0], 6.0, epsilon = 1e-9);
        assert_relative_eq!(last.min[1], 2.0, epsilon = 1e-9);
        let ids: BTreeSet<KernelId> = k.list_faces(&instances[0]).into_iter().collect();
        assert!(k.list_faces(&b).iter().all(|f| !ids.contains(f)), "fresh ids per instance");
    }

    #[test]
    fn sweep_square_profile_around_box_top() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 20.0, 20.0, 5.0);
        let top = planar_faces_with_normal(&k, &b, UP)[0];
        let path = k.face_edges(top);

        // Profile plane on the front edge, facing -X, x axis up: y runs inward.
        let plane = SketchPlane::new([10.0, 0.0, 5.0], [-1.0, 0.0, 0.0], UP);
        let profile = SketchShape::Polyline {
            points: vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)],
        };
        let sketch = k.create_sketch(&plane, &[profile]).unwrap();
        let rim = k.sweep(sketch.regions[0], &path).unwrap();

        // Two horizontal bands become annuli; two vertical bands give 4 faces each.
        assert_eq!(k.list_faces(&rim).len(), 2 + 8);
        let bbox = k.solid_bounding_box(&rim).unwrap();
        assert_relative_eq!(bbox.size()[0], 20.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.min[2], 5.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max[2], 7.0, epsilon = 1e-9);
        // Profile area 2 x perimeter at the profile centroid (inset 0.5).
        assert_relative_eq!(k.solid_volume(&rim).unwrap(), 2.0 * 76.0, epsilon = 1e-9);

        let top_band = planar_faces_with_normal(&k, &rim, UP);
        assert_eq!(top_band.len(), 1);
        assert_eq!(k.face_loops(top_band[0]).len(), 2, "annulus has a hole");
    }

    #[test]
    fn tangent_propagation_follows_rounded_loop() {
        let mut k = MockKernel::new();
        let b = make_box(&mut k, 10.0, 10.0, 2.0);
        let seams = vertical_edges(&k, &b);
        k.fillet_edges(&b, &seams, 2.0, false).unwrap();
        let top = planar_faces_with_normal(&k, &b, UP)[0];
        let seed = k
            .face_edges(top)
            .into_iter()
            .find(|&e| matches!(k.edge_curve(e), Some(EdgeCurve::Line { .. })))
            .unwrap();
        let blends_before = k.list_faces(&b).len();

        k.fillet_edges(&b, &[seed], 0.5, true).unwrap();

        assert_eq!(
            k.list_faces(&b).len(),
            blends_before + 8,
            "every edge of the tangent-continuous top loop is rounded"
        );
    }

    #[test]
    fn sketches_are_listed_until_deleted() {
        let mut k = MockKernel::new();
        let sketch = k
            .create_sketch(&SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 1.0, 1.0)])
            .unwrap();
        assert_eq!(k.list_sketches().len(), 1);
        k.delete_sketch(&sketch.handle).unwrap();
        assert!(k.list_sketches().is_empty());
        assert!(k.delete_sketch(&sketch.handle).is_err());
    }

    #[test]
    fn deterministic_ids_across_sessions() {
        let run = || {
            let mut k = MockKernel::new();
            let b = make_box(&mut k, 3.0, 4.0, 5.0);
            k.list_faces(&b)
        };
        assert_eq!(run(), run());
    }
}
