//! Append-only record of what each construction step produced.
//!
//! Later steps look up faces and edges by the stage that created them. A
//! lookup only returns entities still owned by a live solid, so a reference
//! consumed by a boolean or a deletion surfaces as an error instead of
//! silently pointing at nothing.

use std::fmt;

use gridbin_kernel::{KernelId, KernelIntrospect, KernelSketch, KernelSketchHandle, KernelSolidHandle};
use gridbin_types::{Orientation, TopoKind};
use modeling_ops::{query, OpResult};

use crate::error::{BuildError, QueryContext};

/// Index of a stage in a [`StageLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Sketch,
    Extrude,
    Union,
    Subtract,
    Pattern,
    Sweep,
    Fillet,
    Chamfer,
    Transform,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Sketch => "sketch",
            StageKind::Extrude => "extrude",
            StageKind::Union => "union",
            StageKind::Subtract => "subtract",
            StageKind::Pattern => "pattern",
            StageKind::Sweep => "sweep",
            StageKind::Fillet => "fillet",
            StageKind::Chamfer => "chamfer",
            StageKind::Transform => "transform",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded construction step.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub kind: StageKind,
    /// Main solid produced or modified.
    pub solid: Option<KernelSolidHandle>,
    pub sketch: Option<KernelSketchHandle>,
    /// Instance solids of a pattern, or other secondary outputs.
    pub extra_solids: Vec<KernelSolidHandle>,
    pub created_faces: Vec<KernelId>,
    pub created_edges: Vec<KernelId>,
}

#[derive(Debug, Clone, Default)]
pub struct StageLog {
    stages: Vec<Stage>,
}

impl StageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operation and what it created.
    pub fn record(&mut self, name: &str, kind: StageKind, result: &OpResult) -> StageId {
        let mut outputs = result.outputs.iter().copied();
        self.push(Stage {
            name: name.to_string(),
            kind,
            solid: outputs.next(),
            sketch: None,
            extra_solids: outputs.collect(),
            created_faces: result.created(TopoKind::Face),
            created_edges: result.created(TopoKind::Edge),
        })
    }

    /// Record a sketch; its regions are kept as created faces.
    pub fn record_sketch(&mut self, name: &str, sketch: &KernelSketch) -> StageId {
        self.push(Stage {
            name: name.to_string(),
            kind: StageKind::Sketch,
            solid: None,
            sketch: Some(sketch.handle),
            extra_solids: Vec::new(),
            created_faces: sketch.regions.clone(),
            created_edges: Vec::new(),
        })
    }

    /// Record a step that creates no topology.
    pub fn record_step(&mut self, name: &str, kind: StageKind, solid: KernelSolidHandle) -> StageId {
        self.push(Stage {
            name: name.to_string(),
            kind,
            solid: Some(solid),
            sketch: None,
            extra_solids: Vec::new(),
            created_faces: Vec::new(),
            created_edges: Vec::new(),
        })
    }

    fn push(&mut self, stage: Stage) -> StageId {
        self.stages.push(stage);
        StageId(self.stages.len() - 1)
    }

    pub fn get(&self, id: StageId) -> Result<&Stage, BuildError> {
        self.stages.get(id.0).ok_or(BuildError::UnknownStage(id))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Find a stage by name. Names are not unique; the latest wins.
    pub fn find(&self, name: &str) -> Option<StageId> {
        self.stages
            .iter()
            .rposition(|s| s.name == name)
            .map(StageId)
    }

    /// The main solid of a stage.
    pub fn solid(&self, id: StageId) -> Result<KernelSolidHandle, BuildError> {
        let stage = self.get(id)?;
        stage.solid.ok_or_else(|| BuildError::MissingOutput {
            stage: stage.name.clone(),
        })
    }

    /// Faces created by a stage that are still alive.
    pub fn live_faces(
        &self,
        id: StageId,
        introspect: &dyn KernelIntrospect,
    ) -> Result<Vec<KernelId>, BuildError> {
        Ok(query::live_only(introspect, &self.get(id)?.created_faces))
    }

    /// Edges created by a stage that are still alive.
    pub fn live_edges(
        &self,
        id: StageId,
        introspect: &dyn KernelIntrospect,
    ) -> Result<Vec<KernelId>, BuildError> {
        Ok(query::live_only(introspect, &self.get(id)?.created_edges))
    }

    /// Check that an entity remembered from a stage still exists.
    pub fn require_live(
        &self,
        id: StageId,
        entity: KernelId,
        introspect: &dyn KernelIntrospect,
    ) -> Result<KernelId, BuildError> {
        let stage = self.get(id)?;
        if introspect.owner_solid(entity).is_some() {
            Ok(entity)
        } else {
            Err(BuildError::StaleReference {
                stage: stage.name.clone(),
                entity,
            })
        }
    }

    /// The single live planar face a stage created facing `orientation`.
    pub fn face(
        &self,
        id: StageId,
        introspect: &dyn KernelIntrospect,
        orientation: Orientation,
        context: &'static str,
    ) -> Result<KernelId, BuildError> {
        let faces = self.live_faces(id, introspect)?;
        query::find_face(introspect, &faces, orientation).in_stage(context)
    }
}
