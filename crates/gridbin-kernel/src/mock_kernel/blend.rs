//! Fillets, chamfers and drafts.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use gridbin_types::vec3::{self, EPS};
use tracing::debug;

use super::{MockFace, MockKernel, SurfaceAxis, SurfaceKind};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlendKind {
    Fillet,
    Chamfer,
}

/// One end of a vertical corner trim: the cap face, the two cap edges meeting
/// at the corner and the arc replacing the corner.
struct CornerTrim {
    cap: KernelId,
    edge_a: KernelId,
    edge_b: KernelId,
    corner: Vec3,
    tangent_a: Vec3,
    tangent_b: Vec3,
    arc: EdgeCurve,
    setback: f64,
    angle: f64,
}

impl MockKernel {
    pub(super) fn blend_edges(
        &mut self,
        solid: u64,
        edges: &[KernelId],
        size: f64,
        kind: BlendKind,
        tangent_propagation: bool,
    ) -> Result<(), KernelError> {
        if size <= 0.0 {
            return Err(KernelError::FilletFailed {
                reason: format!("blend size must be positive, got {}", size),
            });
        }
        for &e in edges {
            match self.edges.get(&e) {
                Some(edge) if edge.solid == solid => {}
                _ => return Err(KernelError::EntityNotFound { id: e }),
            }
        }

        let targets = if tangent_propagation {
            self.tangent_chain(solid, edges)
        } else {
            edges.iter().copied().collect::<BTreeSet<_>>()
        };

        for e in targets {
            if !self.edges.contains_key(&e) {
                continue;
            }
            if kind == BlendKind::Fillet && self.try_corner_trim(solid, e, size)? {
                continue;
            }
            self.offset_blend(solid, e, size, kind)?;
        }
        self.prune_edges(solid);
        debug!(solid, edges = edges.len(), size, ?kind, "mock blend");
        Ok(())
    }

    /// Seeds plus every edge reachable through tangent-continuous joints.
    fn tangent_chain(&self, solid: u64, seeds: &[KernelId]) -> BTreeSet<KernelId> {
        let mut found: BTreeSet<KernelId> = seeds.iter().copied().collect();
        let mut queue: Vec<KernelId> = seeds.to_vec();
        let candidates = self.edges_of(solid);

        while let Some(e) = queue.pop() {
            let Some(curve) = self.edges.get(&e).map(|x| x.curve.clone()) else {
                continue;
            };
            for &f in &candidates {
                if found.contains(&f) {
                    continue;
                }
                let Some(other) = self.edges.get(&f).map(|x| &x.curve) else {
                    continue;
                };
                if tangent_joint(&curve, other) {
                    found.insert(f);
                    queue.push(f);
                }
            }
        }
        found
    }

    /// Round a straight edge between two planar faces whose ends meet planar
    /// caps. The caps gain arcs, the side faces are trimmed back and a
    /// cylindrical face fills the corner. Returns false when the edge does not
    /// have that shape.
    fn try_corner_trim(&mut self, solid: u64, e: KernelId, r: f64) -> Result<bool, KernelError> {
        let curve = self.curve(e)?;
        let EdgeCurve::Line { start, end } = curve else {
            return Ok(false);
        };
        let adjacent = self.faces_of_edge(e);
        let [f1, f2] = adjacent[..] else {
            return Ok(false);
        };
        let planar = |id: KernelId| {
            self.faces
                .get(&id)
                .map(|f| f.kind == SurfaceKind::Planar)
                .unwrap_or(false)
        };
        if !planar(f1) || !planar(f2) {
            return Ok(false);
        }

        let mut trims = Vec::with_capacity(2);
        for corner in [start, end] {
            match self.corner_at(solid, f1, f2, corner, r)? {
                Some(trim) => trims.push(trim),
                None => return Ok(false),
            }
        }
        let (n1, n2) = match (self.faces.get(&f1), self.faces.get(&f2)) {
            (Some(a), Some(b)) => (a.normal, b.normal),
            _ => return Ok(false),
        };
        // Directions along the cap edges, away from the corner.
        let first = &trims[0];
        let bisector = vec3::add(
            vec3::sub(first.tangent_a, first.corner),
            vec3::sub(first.tangent_b, first.corner),
        );
        if vec3::dot(bisector, vec3::add(n1, n2)) >= 0.0 {
            // Reflex corner; handled as a generic blend.
            return Ok(false);
        }

        let mut arcs = Vec::with_capacity(2);
        for trim in &trims {
            for (edge, point) in [(trim.edge_a, trim.tangent_a), (trim.edge_b, trim.tangent_b)] {
                if let Some(x) = self.edges.get_mut(&edge) {
                    x.curve = move_endpoint(&x.curve, trim.corner, point);
                }
            }
            let arc = self.add_edge(solid, trim.arc.clone());
            if let Some(cap) = self.faces.get_mut(&trim.cap) {
                insert_after(cap, trim.edge_a, arc);
            }
            arcs.push(arc);
        }

        let seam_a = self.add_edge(
            solid,
            EdgeCurve::Line {
                start: trims[0].tangent_a,
                end: trims[1].tangent_a,
            },
        );
        let seam_b = self.add_edge(
            solid,
            EdgeCurve::Line {
                start: trims[0].tangent_b,
                end: trims[1].tangent_b,
            },
        );
        if let Some(f) = self.faces.get_mut(&f1) {
            f.replace_edge(e, seam_a);
        }
        if let Some(f) = self.faces.get_mut(&f2) {
            f.replace_edge(e, seam_b);
        }

        let (center, axis_dir) = match &trims[0].arc {
            EdgeCurve::Arc { center, .. } => (*center, vec3::normalize(vec3::sub(end, start))),
            EdgeCurve::Line { .. } => return Ok(false),
        };
        self.add_face(MockFace {
            solid,
            kind: SurfaceKind::Cylindrical,
            normal: vec3::normalize(vec3::sub(start, center)),
            axis: Some(SurfaceAxis {
                point: center,
                direction: axis_dir,
                sign: 1.0,
            }),
            outer: vec![arcs[0], seam_b, arcs[1], seam_a],
            holes: Vec::new(),
        });
        self.edges.remove(&e);

        let t = trims[0].setback;
        let removed = (t * r - 0.5 * r * r * (PI - trims[0].angle)) * vec3::distance(start, end);
        if let Some(s) = self.solids.get_mut(&solid) {
            s.volume -= removed;
        }
        Ok(true)
    }

    /// Locate the cap face at `corner` and size the arc that replaces it.
    fn corner_at(
        &self,
        solid: u64,
        f1: KernelId,
        f2: KernelId,
        corner: Vec3,
        r: f64,
    ) -> Result<Option<CornerTrim>, KernelError> {
        let (Some(face1), Some(face2)) = (self.faces.get(&f1), self.faces.get(&f2)) else {
            return Ok(None);
        };
        let touching = |face: &MockFace, cap: &MockFace| -> Option<KernelId> {
            face.loops().flatten().copied().find(|id| {
                cap.contains_edge(*id)
                    && self
                        .edges
                        .get(id)
                        .map(|x| {
                            matches!(x.curve, EdgeCurve::Line { .. })
                                && (vec3::approx_eq(x.curve.start(), corner)
                                    || vec3::approx_eq(x.curve.end(), corner))
                        })
                        .unwrap_or(false)
            })
        };

        for (cap_id, cap) in self.faces.iter() {
            if cap.solid != solid || *cap_id == f1 || *cap_id == f2 || cap.kind != SurfaceKind::Planar {
                continue;
            }
            let (Some(edge_a), Some(edge_b)) = (touching(face1, cap), touching(face2, cap)) else {
                continue;
            };
            let far = |id: KernelId| -> Result<Vec3, KernelError> {
                let c = self.curve(id)?;
                Ok(if vec3::approx_eq(c.start(), corner) { c.end() } else { c.start() })
            };
            let (pa, pb) = (far(edge_a)?, far(edge_b)?);
            let wa = vec3::normalize(vec3::sub(pa, corner));
            let wb = vec3::normalize(vec3::sub(pb, corner));
            let angle = vec3::dot(wa, wb).clamp(-1.0, 1.0).acos();
            if angle < EPS || (PI - angle) < EPS {
                return Ok(None);
            }
            let setback = r / (angle / 2.0).tan();
            if setback > vec3::distance(pa, corner) + EPS || setback > vec3::distance(pb, corner) + EPS {
                return Err(KernelError::FilletFailed {
                    reason: format!("radius {} does not fit the adjacent edges", r),
                });
            }
            let tangent_a = vec3::add(corner, vec3::scale(wa, setback));
            let tangent_b = vec3::add(corner, vec3::scale(wb, setback));
            let center = vec3::add(
                corner,
                vec3::scale(vec3::normalize(vec3::add(wa, wb)), r / (angle / 2.0).sin()),
            );
            let axis = vec3::normalize(vec3::cross(
                vec3::sub(tangent_a, center),
                vec3::sub(tangent_b, center),
            ));
            return Ok(Some(CornerTrim {
                cap: *cap_id,
                edge_a,
                edge_b,
                corner,
                tangent_a,
                tangent_b,
                arc: EdgeCurve::Arc {
                    center,
                    axis,
                    radius: r,
                    start: tangent_a,
                    end: tangent_b,
                },
                setback,
                angle,
            }));
        }
        Ok(None)
    }

    /// Replace an edge by two offset copies, one on each adjacent face, joined
    /// by a blend face.
    fn offset_blend(
        &mut self,
        solid: u64,
        e: KernelId,
        size: f64,
        kind: BlendKind,
    ) -> Result<(), KernelError> {
        let curve = self.curve(e)?;
        let adjacent = self.faces_of_edge(e);
        let [f1, f2] = adjacent[..] else {
            return Err(KernelError::FilletFailed {
                reason: format!("edge {:?} bounds {} faces, expected 2", e, adjacent.len()),
            });
        };
        let mid = curve.midpoint();
        let tangent = curve.tangent_at(0.5);
        let (d1, n1) = self.into_face(f1, e, mid, tangent)?;
        let (d2, n2) = self.into_face(f2, e, mid, tangent)?;
        let convex = vec3::dot(d1, n2) < 0.0;

        let e1 = self.add_edge(solid, curve.offset(d1, size));
        let e2 = self.add_edge(solid, curve.offset(d2, size));
        if let Some(f) = self.faces.get_mut(&f1) {
            f.replace_edge(e, e1);
        }
        if let Some(f) = self.faces.get_mut(&f2) {
            f.replace_edge(e, e2);
        }
        self.add_face(MockFace {
            solid,
            kind: match kind {
                BlendKind::Fillet => SurfaceKind::Blend,
                BlendKind::Chamfer => SurfaceKind::Planar,
            },
            normal: vec3::normalize(vec3::add(n1, n2)),
            axis: None,
            outer: vec![e1, e2],
            holes: Vec::new(),
        });
        self.edges.remove(&e);

        let section = match kind {
            BlendKind::Fillet => (1.0 - PI / 4.0) * size * size,
            BlendKind::Chamfer => 0.5 * size * size,
        };
        let change = section * curve.length();
        if let Some(s) = self.solids.get_mut(&solid) {
            s.volume += if convex { -change } else { change };
        }
        Ok(())
    }

    /// Unit direction pointing from edge `e` into face `f`, and the face
    /// normal at the edge midpoint.
    fn into_face(
        &self,
        f: KernelId,
        e: KernelId,
        mid: Vec3,
        tangent: Vec3,
    ) -> Result<(Vec3, Vec3), KernelError> {
        let face = self
            .faces
            .get(&f)
            .ok_or(KernelError::EntityNotFound { id: f })?;
        let normal = self.normal_at(face, mid);
        let mut d = vec3::normalize(vec3::cross(normal, tangent));
        let toward_centroid = vec3::dot(d, vec3::sub(self.face_centroid(face), mid)) >= 0.0;
        let on_hole = face.holes.iter().any(|h| h.contains(&e));
        if toward_centroid == on_hole {
            d = vec3::scale(d, -1.0);
        }
        Ok((d, normal))
    }

    pub(super) fn draft(
        &mut self,
        solid: u64,
        faces: &[KernelId],
        reference: KernelId,
        pull: Vec3,
        angle: f64,
    ) -> Result<(), KernelError> {
        let origin = self
            .reference_point(reference)
            .ok_or(KernelError::EntityNotFound { id: reference })?;
        let pull = vec3::normalize(pull);
        let lift = vec3::scale(pull, -1.0);
        let tan = angle.tan();

        let mut planes = Vec::with_capacity(faces.len());
        let mut added = 0.0;
        for &f in faces {
            let face = self
                .faces
                .get(&f)
                .filter(|x| x.solid == solid)
                .ok_or(KernelError::EntityNotFound { id: f })?;
            if face.kind != SurfaceKind::Planar {
                return Err(KernelError::DraftFailed {
                    reason: format!("face {:?} is not planar", f),
                });
            }
            let point = self
                .face_point(face)
                .ok_or(KernelError::EntityNotFound { id: f })?;
            let height = vec3::dot(vec3::sub(self.face_centroid(face), origin), lift);
            added += self.planar_area(face) * tan * height;
            planes.push((face.normal, point));
        }

        let displacement = |p: Vec3| -> Vec3 {
            let h = vec3::dot(vec3::sub(p, origin), lift);
            planes
                .iter()
                .filter(|(n, q)| vec3::dot(vec3::sub(p, *q), *n).abs() < EPS)
                .fold([0.0; 3], |acc, (n, _)| vec3::add(acc, vec3::scale(*n, tan * h)))
        };

        let edge_ids = self.edges_of(solid);
        for id in edge_ids {
            let Some(edge) = self.edges.get(&id) else {
                continue;
            };
            let moved = match &edge.curve {
                EdgeCurve::Line { start, end } => EdgeCurve::Line {
                    start: vec3::add(*start, displacement(*start)),
                    end: vec3::add(*end, displacement(*end)),
                },
                EdgeCurve::Arc {
                    center,
                    axis,
                    radius,
                    start,
                    end,
                } => {
                    let new_start = vec3::add(*start, displacement(*start));
                    let r = vec3::norm(vec3::reject(vec3::sub(new_start, *center), *axis));
                    let new_radius = if r > EPS { r } else { *radius };
                    let new_end = if vec3::approx_eq(*start, *end) {
                        new_start
                    } else {
                        let p = vec3::add(*end, displacement(*end));
                        let offset = vec3::sub(p, *center);
                        let axial = vec3::scale(*axis, vec3::dot(offset, *axis));
                        let radial = vec3::normalize(vec3::reject(offset, *axis));
                        vec3::add(vec3::add(*center, axial), vec3::scale(radial, new_radius))
                    };
                    EdgeCurve::Arc {
                        center: *center,
                        axis: *axis,
                        radius: new_radius,
                        start: new_start,
                        end: new_end,
                    }
                }
            };
            if let Some(edge) = self.edges.get_mut(&id) {
                edge.curve = moved;
            }
        }

        for &f in faces {
            if let Some(face) = self.faces.get_mut(&f) {
                face.normal = vec3::normalize(vec3::add(face.normal, vec3::scale(pull, tan)));
            }
        }
        if let Some(s) = self.solids.get_mut(&solid) {
            s.volume += added;
        }
        debug!(solid, faces = faces.len(), angle, "mock draft");
        Ok(())
    }
}

/// Two curves sharing an endpoint with parallel tangents there.
fn tangent_joint(a: &EdgeCurve, b: &EdgeCurve) -> bool {
    for (pa, ta) in [(a.start(), 0.0), (a.end(), 1.0)] {
        for (pb, tb) in [(b.start(), 0.0), (b.end(), 1.0)] {
            if vec3::approx_eq(pa, pb)
                && vec3::dot(a.tangent_at(ta), b.tangent_at(tb)).abs() > 1.0 - 1e-6
            {
                return true;
            }
        }
    }
    false
}

fn move_endpoint(curve: &EdgeCurve, from: Vec3, to: Vec3) -> EdgeCurve {
    match curve {
        EdgeCurve::Line { start, end } if vec3::approx_eq(*start, from) => {
            EdgeCurve::Line { start: to, end: *end }
        }
        EdgeCurve::Line { start, end } if vec3::approx_eq(*end, from) => {
            EdgeCurve::Line { start: *start, end: to }
        }
        other => other.clone(),
    }
}

/// Insert `new` into whichever loop of `face` holds `after`, right behind it.
fn insert_after(face: &mut MockFace, after: KernelId, new: KernelId) {
    for l in std::iter::once(&mut face.outer).chain(face.holes.iter_mut()) {
        if let Some(pos) = l.iter().position(|e| *e == after) {
            l.insert(pos + 1, new);
            return;
        }
    }
}
