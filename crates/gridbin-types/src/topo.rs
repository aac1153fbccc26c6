use serde::{Deserialize, Serialize};

use crate::vec3::Vec3;

/// The kind of topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Edge,
    Face,
}

/// Geometric signature of a topological entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoSignature {
    /// Surface or curve type (planar, cylindrical, conical, blend, line, arc).
    pub surface_type: Option<String>,
    /// Surface area (planar faces).
    pub area: Option<f64>,
    /// Centroid position [x, y, z].
    pub centroid: Option<Vec3>,
    /// Outward-pointing normal (faces). Representative for curved faces.
    pub normal: Option<Vec3>,
    /// Axis-aligned bounding box.
    pub bbox: Option<Aabb>,
    /// Edge length (for edges).
    pub length: Option<f64>,
}

impl TopoSignature {
    pub fn empty() -> Self {
        Self {
            surface_type: None,
            area: None,
            centroid: None,
            normal: None,
            bbox: None,
            length: None,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box around `points`. An empty slice yields an inverted (empty) box.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bbox = Aabb {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        };
        for p in points {
            bbox.include(*p);
        }
        bbox
    }

    pub fn include(&mut self, p: Vec3) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn size(&self) -> Vec3 {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> Vec3 {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.size();
        s[0] * s[1] * s[2]
    }

    /// Overlap of two boxes (possibly empty).
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = self.min[i].max(other.min[i]);
            out.max[i] = self.max[i].min(other.max[i]);
        }
        out
    }

    /// True when `other` lies inside `self`, allowing `tol` slack.
    pub fn contains(&self, other: &Aabb, tol: f64) -> bool {
        (0..3).all(|i| other.min[i] >= self.min[i] - tol && other.max[i] <= self.max[i] + tol)
    }

    pub fn approx_eq(&self, other: &Aabb, tol: f64) -> bool {
        (0..3).all(|i| {
            (self.min[i] - other.min[i]).abs() <= tol && (self.max[i] - other.max[i]).abs() <= tol
        })
    }
}
