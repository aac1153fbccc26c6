//! Union and subtraction.
//!
//! Solids are merged by moving the tool's faces and edges onto the target.
//! Coplanar contact faces are trimmed against each other using loop bounding
//! boxes, which is exact for the axis-aligned stacks this kernel is used with.

use gridbin_types::vec3::{self, EPS};
use tracing::debug;

use super::{MockFace, MockKernel};
use crate::types::*;

const TOL: f64 = 1e-6;

impl MockKernel {
    pub(super) fn unite(&mut self, target: u64, tool: u64) {
        for b in self.planar_faces_of(tool) {
            for a in self.planar_faces_of(target) {
                if !self.faces.contains_key(&b) {
                    break;
                }
                if self.coplanar(a, b, -1.0) {
                    self.glue(a, b);
                }
            }
        }

        self.adopt(target, tool);
        let tool_volume = self.solids.remove(&tool).map(|s| s.volume).unwrap_or(0.0);
        if let Some(s) = self.solids.get_mut(&target) {
            s.volume += tool_volume;
        }
        self.prune_edges(target);
        debug!(target, tool, "mock union");
    }

    pub(super) fn subtract(&mut self, target: u64, tool: u64) {
        let tool_box = self.solid_bbox(tool);
        let overlap = if tool_box.volume() > 0.0 {
            tool_box.intersection(&self.solid_bbox(target)).volume() / tool_box.volume()
        } else {
            0.0
        };

        // Tool faces lying on a target face open that face.
        for b in self.planar_faces_of(tool) {
            for a in self.planar_faces_of(target) {
                if !self.coplanar(a, b, 1.0) {
                    continue;
                }
                let (Some(fa), Some(fb)) = (self.faces.get(&a), self.faces.get(&b)) else {
                    continue;
                };
                let (oa, ob) = (self.loop_bbox(&fa.outer), self.loop_bbox(&fb.outer));
                let opening = fb.outer.clone();
                if oa.approx_eq(&ob, TOL) {
                    self.faces.remove(&a);
                    self.faces.remove(&b);
                    break;
                }
                if oa.contains(&ob, TOL) {
                    if let Some(fa) = self.faces.get_mut(&a) {
                        fa.holes.push(opening);
                    }
                    self.faces.remove(&b);
                    break;
                }
            }
        }

        // The rest of the tool boundary bounds the removed material from outside.
        for face in self.faces.values_mut().filter(|f| f.solid == tool) {
            face.normal = vec3::scale(face.normal, -1.0);
            if let Some(axis) = face.axis.as_mut() {
                axis.sign = -axis.sign;
            }
        }
        self.adopt(target, tool);

        let tool_volume = self.solids.remove(&tool).map(|s| s.volume).unwrap_or(0.0);
        if let Some(s) = self.solids.get_mut(&target) {
            s.volume -= tool_volume * overlap;
        }
        self.prune_edges(target);
        debug!(target, tool, overlap, "mock subtract");
    }

    /// Move every face and edge of `tool` onto `target`.
    fn adopt(&mut self, target: u64, tool: u64) {
        for face in self.faces.values_mut().filter(|f| f.solid == tool) {
            face.solid = target;
        }
        for edge in self.edges.values_mut().filter(|e| e.solid == tool) {
            edge.solid = target;
        }
    }

    /// Two planar faces on the same plane whose normals satisfy
    /// `dot(na, nb) ~ sense` (+1 same side, -1 facing each other).
    fn coplanar(&self, a: KernelId, b: KernelId, sense: f64) -> bool {
        let (Some(fa), Some(fb)) = (self.faces.get(&a), self.faces.get(&b)) else {
            return false;
        };
        if (vec3::dot(fa.normal, fb.normal) - sense).abs() > EPS {
            return false;
        }
        match (self.face_point(fa), self.face_point(fb)) {
            (Some(pa), Some(pb)) => vec3::dot(vec3::sub(pb, pa), fa.normal).abs() < TOL,
            _ => false,
        }
    }

    /// Trim two touching faces of opposite orientation.
    fn glue(&mut self, a: KernelId, b: KernelId) {
        let (Some(fa), Some(fb)) = (self.faces.get(&a).cloned(), self.faces.get(&b).cloned()) else {
            return;
        };
        let (oa, ob) = (self.loop_bbox(&fa.outer), self.loop_bbox(&fb.outer));

        if oa.approx_eq(&ob, TOL) {
            match (fa.holes.is_empty(), fb.holes.is_empty()) {
                (true, true) => {
                    self.faces.remove(&a);
                    self.faces.remove(&b);
                }
                (true, false) => {
                    self.fill_with_holes(a, &fb.holes);
                    self.faces.remove(&b);
                }
                (false, true) => {
                    self.fill_with_holes(b, &fa.holes);
                    self.faces.remove(&a);
                }
                (false, false) => {
                    if self.holes_match(&fa.holes, &fb.holes) {
                        self.faces.remove(&a);
                        self.faces.remove(&b);
                    } else {
                        debug!(?a, ?b, "holed contact faces left untrimmed");
                    }
                }
            }
        } else if ob.contains(&oa, TOL) && fa.holes.is_empty() {
            if let Some(face) = self.faces.get_mut(&b) {
                face.holes.push(fa.outer.clone());
            }
            self.faces.remove(&a);
        } else if oa.contains(&ob, TOL) && fb.holes.is_empty() {
            if let Some(face) = self.faces.get_mut(&a) {
                face.holes.push(fb.outer.clone());
            }
            self.faces.remove(&b);
        } else if !oa.intersection(&ob).is_empty() {
            debug!(?a, ?b, "partial face overlap left untrimmed");
        }
    }

    /// The uncovered part of a face is what the other side's holes leave
    /// open: one face per hole, the first keeping the original id.
    fn fill_with_holes(&mut self, face: KernelId, holes: &[Vec<KernelId>]) {
        let Some(template) = self.faces.get(&face).cloned() else {
            return;
        };
        let mut holes = holes.iter();
        if let Some(first) = holes.next() {
            if let Some(f) = self.faces.get_mut(&face) {
                f.outer = first.clone();
                f.holes.clear();
            }
        }
        for hole in holes {
            self.add_face(MockFace {
                outer: hole.clone(),
                holes: Vec::new(),
                ..template.clone()
            });
        }
    }

    fn holes_match(&self, a: &[Vec<KernelId>], b: &[Vec<KernelId>]) -> bool {
        a.len() == b.len()
            && a.iter().all(|ha| {
                let ba = self.loop_bbox(ha);
                b.iter().any(|hb| self.loop_bbox(hb).approx_eq(&ba, TOL))
            })
    }
}
