//! Structured text reports of generated bins.

use std::fmt;

use bin_engine::GeneratedBin;
use gridbin_kernel::KernelIntrospect;

use crate::helpers::{solid_bbox, HarnessError};

/// A complete bin report.
#[derive(Debug, Clone, PartialEq)]
pub struct BinReport {
    pub name: String,
    pub stages: Vec<StageEntry>,
    pub size: [f64; 3],
    pub volume: f64,
    pub face_count: usize,
    pub edge_count: usize,
}

/// One stage's report entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StageEntry {
    pub index: usize,
    pub name: String,
    pub kind: String,
    pub faces: usize,
    pub edges: usize,
}

impl BinReport {
    pub fn from_bin(introspect: &dyn KernelIntrospect, bin: &GeneratedBin) -> Result<Self, HarnessError> {
        let stages = bin
            .stages
            .stages()
            .iter()
            .enumerate()
            .map(|(index, s)| StageEntry {
                index,
                name: s.name.clone(),
                kind: s.kind.to_string(),
                faces: s.created_faces.len(),
                edges: s.created_edges.len(),
            })
            .collect();
        let size = solid_bbox(introspect, &bin.solid)?.size();
        Ok(Self {
            name: bin.name.clone(),
            stages,
            size,
            volume: introspect.solid_volume(&bin.solid).unwrap_or(0.0),
            face_count: introspect.list_faces(&bin.solid).len(),
            edge_count: introspect.list_edges(&bin.solid).len(),
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n\n", self.name));
        out.push_str(&format!("Stages ({}):\n", self.stages.len()));
        for entry in &self.stages {
            out.push_str(&format!("  [{}] {} ({})", entry.index, entry.name, entry.kind));
            if entry.faces > 0 || entry.edges > 0 {
                out.push_str(&format!(" +{}F +{}E", entry.faces, entry.edges));
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!(
            "Bounding box: {:.3} x {:.3} x {:.3} mm\n",
            self.size[0], self.size[1], self.size[2]
        ));
        out.push_str(&format!("Volume: {:.3} mm^3\n", self.volume));
        out.push_str(&format!(
            "Topology: {} faces, {} edges\n",
            self.face_count, self.edge_count
        ));
        out
    }
}

impl fmt::Display for BinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
