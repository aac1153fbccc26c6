//! Prism construction, instancing and rigid motion.

use std::collections::BTreeMap;

use gridbin_types::curve::{chain_curves, loop_points, signed_area};
use gridbin_types::vec3::{self, EPS};
use tracing::debug;

use super::{MockFace, MockKernel, MockSolid, SurfaceAxis, SurfaceKind};
use crate::types::*;

impl MockKernel {
    pub(super) fn extrude_regions(
        &mut self,
        regions: &[KernelId],
        direction: Vec3,
        extent: ExtrudeExtent,
    ) -> Result<KernelSolidHandle, KernelError> {
        if regions.is_empty() {
            return Err(KernelError::ExtrudeFailed {
                reason: "no regions to extrude".to_string(),
            });
        }
        let dir = vec3::normalize(direction);
        let resolved = regions
            .iter()
            .map(|&id| self.region_loops(id))
            .collect::<Result<Vec<_>, _>>()?;

        let depth = match extent {
            ExtrudeExtent::Blind { depth } => depth,
            ExtrudeExtent::UpToFace { face } => {
                let target = self
                    .faces
                    .get(&face)
                    .and_then(|f| self.face_point(f))
                    .ok_or(KernelError::EntityNotFound { id: face })?;
                vec3::dot(vec3::sub(target, resolved[0].point), dir)
            }
        };
        if depth.abs() < EPS {
            return Err(KernelError::ExtrudeFailed {
                reason: format!("degenerate extrusion depth {}", depth),
            });
        }

        let offset = vec3::scale(dir, depth);
        let solid = self.alloc_handle();
        let mut volume = 0.0;
        for region in &resolved {
            self.build_prism(solid, &region.outer, &region.holes, offset);
            volume += region.area * depth.abs() * vec3::dot(region.normal, dir).abs();
        }
        self.solids.insert(solid, MockSolid { name: None, volume });
        debug!(solid, depth, regions = regions.len(), "mock extrude");
        Ok(KernelSolidHandle(solid))
    }

    /// Sweep loops straight along `offset`: bottom cap, top cap and one side
    /// face per boundary curve.
    fn build_prism(
        &mut self,
        solid: u64,
        outer: &[EdgeCurve],
        holes: &[Vec<EdgeCurve>],
        offset: Vec3,
    ) {
        let up = vec3::normalize(offset);
        let mut bottom_loops: Vec<Vec<KernelId>> = Vec::new();
        let mut top_loops: Vec<Vec<KernelId>> = Vec::new();

        let all_loops = std::iter::once(outer).chain(holes.iter().map(|h| h.as_slice()));
        for (index, curves) in all_loops.enumerate() {
            let is_hole = index > 0;
            let chain = chain_curves(curves);
            if chain.is_empty() {
                continue;
            }
            let ccw = signed_area(&loop_points(&chain), up) > 0.0;
            // t x up points out of a counter-clockwise outer loop.
            let side_sign = if ccw != is_hole { 1.0 } else { -1.0 };

            let bottom: Vec<KernelId> = chain
                .iter()
                .map(|c| self.add_edge(solid, c.clone()))
                .collect();
            let top: Vec<KernelId> = chain
                .iter()
                .map(|c| self.add_edge(solid, c.translated(offset)))
                .collect();
            let seams: Vec<KernelId> = chain
                .iter()
                .map(|c| {
                    self.add_edge(
                        solid,
                        EdgeCurve::Line {
                            start: c.start(),
                            end: vec3::add(c.start(), offset),
                        },
                    )
                })
                .collect();

            let n = chain.len();
            for (k, curve) in chain.iter().enumerate() {
                let side_loop = if n == 1 {
                    vec![bottom[k], seams[k], top[k]]
                } else {
                    vec![bottom[k], seams[(k + 1) % n], top[k], seams[k]]
                };
                let outward = vec3::scale(
                    vec3::normalize(vec3::cross(curve.tangent_at(0.5), up)),
                    side_sign,
                );
                let (kind, axis) = match curve {
                    EdgeCurve::Line { .. } => (SurfaceKind::Planar, None),
                    EdgeCurve::Arc { center, axis, .. } => {
                        let radial = vec3::reject(vec3::sub(curve.midpoint(), *center), *axis);
                        let sign = if vec3::dot(radial, outward) >= 0.0 { 1.0 } else { -1.0 };
                        (
                            SurfaceKind::Cylindrical,
                            Some(SurfaceAxis {
                                point: *center,
                                direction: vec3::normalize(*axis),
                                sign,
                            }),
                        )
                    }
                };
                self.add_face(MockFace {
                    solid,
                    kind,
                    normal: outward,
                    axis,
                    outer: side_loop,
                    holes: Vec::new(),
                });
            }
            bottom_loops.push(bottom);
            top_loops.push(top);
        }

        for (loops, normal) in [
            (bottom_loops, vec3::scale(up, -1.0)),
            (top_loops, up),
        ] {
            let mut loops = loops.into_iter();
            let Some(outer) = loops.next() else {
                continue;
            };
            self.add_face(MockFace {
                solid,
                kind: SurfaceKind::Planar,
                normal,
                axis: None,
                outer,
                holes: loops.collect(),
            });
        }
    }

    /// Copy a solid under fresh ids, translated by `offset`.
    pub(super) fn clone_solid(&mut self, source: u64, offset: Vec3) -> u64 {
        let solid = self.alloc_handle();
        let mut remap: BTreeMap<KernelId, KernelId> = BTreeMap::new();

        let edges: Vec<(KernelId, EdgeCurve)> = self
            .edges
            .iter()
            .filter(|(_, e)| e.solid == source)
            .map(|(id, e)| (*id, e.curve.clone()))
            .collect();
        for (old, curve) in edges {
            let new = self.add_edge(solid, curve.translated(offset));
            remap.insert(old, new);
        }

        let faces: Vec<MockFace> = self
            .faces
            .values()
            .filter(|f| f.solid == source)
            .cloned()
            .collect();
        let map_loop = |l: &Vec<KernelId>| -> Vec<KernelId> {
            l.iter().map(|e| remap.get(e).copied().unwrap_or(*e)).collect()
        };
        for face in faces {
            let copy = MockFace {
                solid,
                kind: face.kind,
                normal: face.normal,
                axis: face.axis.map(|a| SurfaceAxis {
                    point: vec3::add(a.point, offset),
                    ..a
                }),
                outer: map_loop(&face.outer),
                holes: face.holes.iter().map(map_loop).collect(),
            };
            self.add_face(copy);
        }

        let volume = self.solids.get(&source).map(|s| s.volume).unwrap_or(0.0);
        self.solids.insert(solid, MockSolid { name: None, volume });
        solid
    }

    pub(super) fn translate_solid(&mut self, solid: u64, offset: Vec3) {
        for edge in self.edges.values_mut().filter(|e| e.solid == solid) {
            edge.curve = edge.curve.translated(offset);
        }
        for face in self.faces.values_mut().filter(|f| f.solid == solid) {
            if let Some(axis) = face.axis.as_mut() {
                axis.point = vec3::add(axis.point, offset);
            }
        }
    }
}
