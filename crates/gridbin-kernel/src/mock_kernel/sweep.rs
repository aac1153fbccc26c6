//! Profile sweeps along closed planar loops.
//!
//! The profile is measured in the frame of the path: height along the loop
//! normal and inset towards the loop interior. Every profile vertex becomes a
//! ring (the path offset by that height and inset) and consecutive rings are
//! joined by bands of faces.

use gridbin_types::curve::{chain_curves, loop_points, signed_area};
use gridbin_types::vec3::{self, EPS};
use tracing::debug;

use super::{MockFace, MockKernel, MockSolid, SurfaceAxis, SurfaceKind};
use crate::types::*;

impl MockKernel {
    pub(super) fn sweep_profile(
        &mut self,
        profile: KernelId,
        path: &[KernelId],
    ) -> Result<u64, KernelError> {
        let region = self
            .regions
            .get(&profile)
            .cloned()
            .ok_or(KernelError::EntityNotFound { id: profile })?;
        if path.is_empty() {
            return Err(KernelError::SweepFailed {
                reason: "empty sweep path".to_string(),
            });
        }
        let curves = path
            .iter()
            .map(|&id| self.curve(id))
            .collect::<Result<Vec<_>, _>>()?;
        let mut chain = chain_curves(&curves);
        let closed = match (chain.first(), chain.last()) {
            (Some(first), Some(last)) => vec3::approx_eq(first.start(), last.end()),
            _ => false,
        };
        if !closed {
            return Err(KernelError::SweepFailed {
                reason: "sweep path must form a closed loop".to_string(),
            });
        }

        let points = loop_points(&chain);
        let mut up = newell_normal(&points);
        if vec3::dot(up, region.plane.x_axis) < 0.0 {
            up = vec3::scale(up, -1.0);
        }
        if signed_area(&points, up) < 0.0 {
            chain = chain.iter().rev().map(EdgeCurve::reversed).collect();
        }

        let origin = region.plane.origin;
        let anchor = chain
            .iter()
            .min_by(|a, b| {
                distance_to(a, origin)
                    .partial_cmp(&distance_to(b, origin))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or(KernelError::SweepFailed {
                reason: "empty sweep path".to_string(),
            })?;
        let anchor_inward = inward(anchor, up);

        // Profile vertices as (height, inset).
        let outline = chain_curves(&region.outer);
        let profile_pts: Vec<(f64, f64)> = outline
            .iter()
            .map(|c| {
                let d = vec3::sub(c.start(), origin);
                (vec3::dot(d, up), vec3::dot(d, anchor_inward))
            })
            .collect();
        if profile_pts.len() < 3 {
            return Err(KernelError::SweepFailed {
                reason: "profile needs at least three vertices".to_string(),
            });
        }
        let (area, centroid) = polygon_area_centroid(&profile_pts);
        if area.abs() < EPS {
            return Err(KernelError::SweepFailed {
                reason: "degenerate profile".to_string(),
            });
        }
        let ccw = area > 0.0;

        let solid = self.alloc_handle();
        let ring_curves: Vec<Vec<EdgeCurve>> = profile_pts
            .iter()
            .map(|&(a, b)| offset_ring(&chain, up, a, b))
            .collect();
        let rings: Vec<Vec<KernelId>> = ring_curves
            .iter()
            .map(|ring| ring.iter().map(|c| self.add_edge(solid, c.clone())).collect())
            .collect();

        let m = profile_pts.len();
        let n = chain.len();
        for k in 0..m {
            let next = (k + 1) % m;
            let (a0, b0) = profile_pts[k];
            let (a1, b1) = profile_pts[next];
            let (da, db) = (a1 - a0, b1 - b0);
            if da.abs() < EPS && db.abs() < EPS {
                continue;
            }
            let (nb, na) = if ccw { (da, -db) } else { (-da, db) };

            if da.abs() < EPS {
                // Flat band: one annulus between the two rings.
                let (outer, hole) = if b0 <= b1 { (k, next) } else { (next, k) };
                self.add_face(MockFace {
                    solid,
                    kind: SurfaceKind::Planar,
                    normal: vec3::scale(up, na.signum()),
                    axis: None,
                    outer: rings[outer].clone(),
                    holes: vec![rings[hole].clone()],
                });
                continue;
            }

            let seams: Vec<KernelId> = (0..n)
                .map(|c| {
                    let curve = EdgeCurve::Line {
                        start: ring_curves[k][c].start(),
                        end: ring_curves[next][c].start(),
                    };
                    self.add_edge(solid, curve)
                })
                .collect();
            for c in 0..n {
                let band_loop = if n == 1 {
                    vec![rings[k][c], seams[c], rings[next][c]]
                } else {
                    vec![rings[k][c], seams[(c + 1) % n], rings[next][c], seams[c]]
                };
                let path_curve = &chain[c];
                let normal = vec3::normalize(vec3::add(
                    vec3::scale(up, na),
                    vec3::scale(inward(path_curve, up), nb),
                ));
                let (kind, axis) = match &ring_curves[k][c] {
                    EdgeCurve::Line { .. } => (SurfaceKind::Planar, None),
                    EdgeCurve::Arc { center, axis, .. } => {
                        let mid = ring_curves[k][c].midpoint();
                        let radial = vec3::reject(vec3::sub(mid, *center), *axis);
                        let sign = if vec3::dot(radial, normal) >= 0.0 { 1.0 } else { -1.0 };
                        let kind = if db.abs() < EPS {
                            SurfaceKind::Cylindrical
                        } else {
                            SurfaceKind::Conical
                        };
                        (
                            kind,
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
                    normal,
                    axis,
                    outer: band_loop,
                    holes: Vec::new(),
                });
            }
        }

        let centroid_length: f64 = offset_ring(&chain, up, centroid.0, centroid.1)
            .iter()
            .map(EdgeCurve::length)
            .sum();
        let volume = area.abs() * centroid_length;
        self.solids.insert(solid, MockSolid { name: None, volume });
        debug!(solid, rings = m, path = n, "mock sweep");
        Ok(solid)
    }
}

/// Unit vector in the loop plane pointing into a counter-clockwise loop.
fn inward(curve: &EdgeCurve, up: Vec3) -> Vec3 {
    vec3::normalize(vec3::cross(up, curve.tangent_at(0.5)))
}

fn distance_to(curve: &EdgeCurve, p: Vec3) -> f64 {
    curve
        .samples()
        .windows(2)
        .map(|w| point_segment_distance(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

fn point_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f64 {
    let ab = vec3::sub(b, a);
    let len2 = vec3::dot(ab, ab);
    if len2 < EPS * EPS {
        return vec3::distance(p, a);
    }
    let t = (vec3::dot(vec3::sub(p, a), ab) / len2).clamp(0.0, 1.0);
    vec3::distance(p, vec3::add(a, vec3::scale(ab, t)))
}

fn newell_normal(points: &[Vec3]) -> Vec3 {
    let mut n = [0.0; 3];
    for i in 0..points.len() {
        let (a, b) = (points[i], points[(i + 1) % points.len()]);
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    vec3::normalize(n)
}

/// Signed area and centroid of a polygon in (height, inset) coordinates,
/// oriented with inset as the first axis.
fn polygon_area_centroid(points: &[(f64, f64)]) -> (f64, (f64, f64)) {
    let mut area2 = 0.0;
    let (mut ca, mut cb) = (0.0, 0.0);
    for i in 0..points.len() {
        let (a0, b0) = points[i];
        let (a1, b1) = points[(i + 1) % points.len()];
        let cross = b0 * a1 - b1 * a0;
        area2 += cross;
        ca += (a0 + a1) * cross;
        cb += (b0 + b1) * cross;
    }
    let area = area2 / 2.0;
    if area.abs() < EPS {
        return (area, points[0]);
    }
    (area, (ca / (6.0 * area), cb / (6.0 * area)))
}

/// The loop lifted by `height` along `up` and inset by `inset`, with straight
/// neighbours re-joined at their new corner.
fn offset_ring(chain: &[EdgeCurve], up: Vec3, height: f64, inset: f64) -> Vec<EdgeCurve> {
    let mut ring: Vec<EdgeCurve> = chain
        .iter()
        .map(|c| c.translated(vec3::scale(up, height)).offset(inward(c, up), inset))
        .collect();
    let n = ring.len();
    if n < 2 {
        return ring;
    }
    for i in 0..n {
        let j = (i + 1) % n;
        if vec3::approx_eq(ring[i].end(), ring[j].start()) {
            continue;
        }
        let joint = match (&ring[i], &ring[j]) {
            (EdgeCurve::Line { start: s1, end: e1 }, EdgeCurve::Line { start: s2, end: e2 }) => {
                Some((*s1, *e1, *s2, *e2))
            }
            _ => None,
        };
        if let Some((s1, e1, s2, e2)) = joint {
            if let Some(corner) = line_intersection(s1, e1, s2, e2) {
                ring[i] = EdgeCurve::Line { start: s1, end: corner };
                ring[j] = EdgeCurve::Line { start: corner, end: e2 };
            }
        }
    }
    ring
}

fn line_intersection(s1: Vec3, e1: Vec3, s2: Vec3, e2: Vec3) -> Option<Vec3> {
    let d1 = vec3::sub(e1, s1);
    let d2 = vec3::sub(e2, s2);
    let c = vec3::cross(d1, d2);
    let denom = vec3::dot(c, c);
    if denom < EPS * EPS {
        return None;
    }
    let t = vec3::dot(vec3::cross(vec3::sub(s2, s1), d2), c) / denom;
    Some(vec3::add(s1, vec3::scale(d1, t)))
}
