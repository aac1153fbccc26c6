use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::topo::Aabb;
use crate::vec3::{self, Vec3, EPS};

/// Geometry carried by an edge.
///
/// Arcs run counter-clockwise about `axis` from `start` to `end`. An arc whose
/// start and end coincide is a full circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EdgeCurve {
    Line {
        start: Vec3,
        end: Vec3,
    },
    Arc {
        center: Vec3,
        axis: Vec3,
        radius: f64,
        start: Vec3,
        end: Vec3,
    },
}

impl EdgeCurve {
    pub fn start(&self) -> Vec3 {
        match self {
            EdgeCurve::Line { start, .. } | EdgeCurve::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Vec3 {
        match self {
            EdgeCurve::Line { end, .. } | EdgeCurve::Arc { end, .. } => *end,
        }
    }

    pub fn is_closed(&self) -> bool {
        vec3::approx_eq(self.start(), self.end())
    }

    /// Swept angle of an arc in (0, 2π]. Zero for lines.
    pub fn sweep_angle(&self) -> f64 {
        match self {
            EdgeCurve::Line { .. } => 0.0,
            EdgeCurve::Arc {
                center,
                axis,
                start,
                end,
                ..
            } => {
                if vec3::approx_eq(*start, *end) {
                    return TAU;
                }
                let a = vec3::sub(*start, *center);
                let b = vec3::sub(*end, *center);
                let y = vec3::dot(vec3::cross(a, b), *axis);
                let x = vec3::dot(a, b);
                let angle = y.atan2(x);
                if angle <= 0.0 {
                    angle + TAU
                } else {
                    angle
                }
            }
        }
    }

    /// Point at normalized parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Vec3 {
        match self {
            EdgeCurve::Line { start, end } => vec3::add(*start, vec3::scale(vec3::sub(*end, *start), t)),
            EdgeCurve::Arc {
                center, axis, start, ..
            } => {
                let radial = vec3::sub(*start, *center);
                vec3::add(*center, vec3::rotate(radial, *axis, self.sweep_angle() * t))
            }
        }
    }

    pub fn midpoint(&self) -> Vec3 {
        self.point_at(0.5)
    }

    /// Unit tangent in the direction of travel at parameter `t`.
    pub fn tangent_at(&self, t: f64) -> Vec3 {
        match self {
            EdgeCurve::Line { start, end } => vec3::normalize(vec3::sub(*end, *start)),
            EdgeCurve::Arc { center, axis, .. } => {
                let p = self.point_at(t);
                vec3::normalize(vec3::cross(*axis, vec3::sub(p, *center)))
            }
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            EdgeCurve::Line { start, end } => vec3::distance(*start, *end),
            EdgeCurve::Arc { radius, .. } => radius * self.sweep_angle(),
        }
    }

    /// True for lines running along `direction` (either sense).
    pub fn is_parallel_to(&self, direction: Vec3) -> bool {
        match self {
            EdgeCurve::Line { .. } => {
                let d = vec3::normalize(direction);
                vec3::dot(self.tangent_at(0.0), d).abs() > 1.0 - EPS
            }
            EdgeCurve::Arc { .. } => false,
        }
    }

    /// Points along the curve, start and end included.
    pub fn samples(&self) -> Vec<Vec3> {
        match self {
            EdgeCurve::Line { start, end } => vec![*start, *end],
            EdgeCurve::Arc { .. } => {
                let segments = ((self.sweep_angle() / TAU) * 32.0).ceil().max(2.0) as usize;
                (0..=segments)
                    .map(|i| self.point_at(i as f64 / segments as f64))
                    .collect()
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.samples())
    }

    /// Same curve traversed the other way.
    pub fn reversed(&self) -> EdgeCurve {
        match self {
            EdgeCurve::Line { start, end } => EdgeCurve::Line {
                start: *end,
                end: *start,
            },
            EdgeCurve::Arc {
                center,
                axis,
                radius,
                start,
                end,
            } => EdgeCurve::Arc {
                center: *center,
                axis: vec3::scale(*axis, -1.0),
                radius: *radius,
                start: *end,
                end: *start,
            },
        }
    }

    pub fn translated(&self, offset: Vec3) -> EdgeCurve {
        match self {
            EdgeCurve::Line { start, end } => EdgeCurve::Line {
                start: vec3::add(*start, offset),
                end: vec3::add(*end, offset),
            },
            EdgeCurve::Arc {
                center,
                axis,
                radius,
                start,
                end,
            } => EdgeCurve::Arc {
                center: vec3::add(*center, offset),
                axis: *axis,
                radius: *radius,
                start: vec3::add(*start, offset),
                end: vec3::add(*end, offset),
            },
        }
    }

    /// Offset the curve by `distance` along `direction`, where `direction` is
    /// measured at the curve midpoint. Lines translate; arcs split the offset
    /// into an axial shift of the center and a change of radius.
    pub fn offset(&self, direction: Vec3, distance: f64) -> EdgeCurve {
        match self {
            EdgeCurve::Line { .. } => self.translated(vec3::scale(direction, distance)),
            EdgeCurve::Arc {
                center,
                axis,
                radius,
                start,
                end,
            } => {
                let radial = vec3::normalize(vec3::reject(vec3::sub(self.midpoint(), *center), *axis));
                let axial_shift = vec3::dot(direction, *axis) * distance;
                let new_radius = (radius + vec3::dot(direction, radial) * distance).max(EPS);
                let new_center = vec3::add(*center, vec3::scale(*axis, axial_shift));
                let rescale = |p: Vec3| {
                    let dir = vec3::normalize(vec3::reject(vec3::sub(p, *center), *axis));
                    vec3::add(new_center, vec3::scale(dir, new_radius))
                };
                let new_start = rescale(*start);
                let new_end = if vec3::approx_eq(*start, *end) {
                    new_start
                } else {
                    rescale(*end)
                };
                EdgeCurve::Arc {
                    center: new_center,
                    axis: *axis,
                    radius: new_radius,
                    start: new_start,
                    end: new_end,
                }
            }
        }
    }
}

/// Order curves head-to-tail, reversing any that run backwards.
///
/// Curves that cannot be connected are appended in their original order.
pub fn chain_curves(curves: &[EdgeCurve]) -> Vec<EdgeCurve> {
    let mut remaining: Vec<EdgeCurve> = curves.to_vec();
    let mut chained = Vec::with_capacity(remaining.len());
    if remaining.is_empty() {
        return chained;
    }
    chained.push(remaining.remove(0));

    while !remaining.is_empty() {
        let tail = chained[chained.len() - 1].end();
        let next = remaining.iter().position(|c| vec3::approx_eq(c.start(), tail));
        if let Some(i) = next {
            chained.push(remaining.remove(i));
            continue;
        }
        let flipped = remaining.iter().position(|c| vec3::approx_eq(c.end(), tail));
        match flipped {
            Some(i) => {
                let c = remaining.remove(i);
                chained.push(c.reversed());
            }
            None => {
                chained.append(&mut remaining);
            }
        }
    }
    chained
}

/// Polygon approximating a chained loop, without the repeated closing point.
pub fn loop_points(chain: &[EdgeCurve]) -> Vec<Vec3> {
    let mut points = Vec::new();
    for curve in chain {
        let samples = curve.samples();
        points.extend_from_slice(&samples[..samples.len() - 1]);
    }
    points
}

/// Signed area of a closed polygon seen from the tip of `normal`
/// (counter-clockwise positive).
pub fn signed_area(points: &[Vec3], normal: Vec3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let (u, v) = vec3::plane_basis(normal);
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let (ax, ay) = (vec3::dot(a, u), vec3::dot(a, v));
        let (bx, by) = (vec3::dot(b, u), vec3::dot(b, v));
        sum += ax * by - bx * ay;
    }
    sum / 2.0
}
