use serde::{Deserialize, Serialize};

use crate::curve::EdgeCurve;
use crate::vec3::{self, Vec3};

/// A sketch plane: origin, unit normal and in-plane x axis.
/// The y axis is `normal x x_axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchPlane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub x_axis: Vec3,
}

impl SketchPlane {
    pub fn new(origin: Vec3, normal: Vec3, x_axis: Vec3) -> Self {
        Self {
            origin,
            normal: vec3::normalize(normal),
            x_axis: vec3::normalize(x_axis),
        }
    }

    /// The world XY plane lifted to height `z`.
    pub fn horizontal(z: f64) -> Self {
        Self::new([0.0, 0.0, z], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0])
    }

    pub fn y_axis(&self) -> Vec3 {
        vec3::cross(self.normal, self.x_axis)
    }

    /// Map sketch coordinates to world space.
    pub fn to_world(&self, u: f64, v: f64) -> Vec3 {
        vec3::add(
            self.origin,
            vec3::add(vec3::scale(self.x_axis, u), vec3::scale(self.y_axis(), v)),
        )
    }
}

/// A closed 2D shape drawn on a sketch plane, in sketch coordinates (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SketchShape {
    Rectangle {
        first_corner: (f64, f64),
        second_corner: (f64, f64),
    },
    Circle {
        center: (f64, f64),
        radius: f64,
    },
    /// Closed polyline. The closing segment is implied when the last point
    /// differs from the first.
    Polyline { points: Vec<(f64, f64)> },
}

impl SketchShape {
    /// Boundary curves of the shape placed on `plane`, head-to-tail.
    pub fn boundary(&self, plane: &SketchPlane) -> Vec<EdgeCurve> {
        match self {
            SketchShape::Rectangle {
                first_corner: (x0, y0),
                second_corner: (x1, y1),
            } => {
                let corners = [(*x0, *y0), (*x1, *y0), (*x1, *y1), (*x0, *y1)];
                polyline_edges(plane, &corners)
            }
            SketchShape::Circle {
                center: (cx, cy),
                radius,
            } => {
                let start = plane.to_world(cx + radius, *cy);
                vec![EdgeCurve::Arc {
                    center: plane.to_world(*cx, *cy),
                    axis: plane.normal,
                    radius: *radius,
                    start,
                    end: start,
                }]
            }
            SketchShape::Polyline { points } => polyline_edges(plane, points),
        }
    }
}

fn polyline_edges(plane: &SketchPlane, points: &[(f64, f64)]) -> Vec<EdgeCurve> {
    let world: Vec<Vec3> = points.iter().map(|&(u, v)| plane.to_world(u, v)).collect();
    let mut edges = Vec::with_capacity(world.len());
    for i in 0..world.len() {
        let start = world[i];
        let end = world[(i + 1) % world.len()];
        if !vec3::approx_eq(start, end) {
            edges.push(EdgeCurve::Line { start, end });
        }
    }
    edges
}
