use gridbin_kernel::{KernelId, KernelSolidHandle, SketchPlane, SketchShape};
use gridbin_types::Orientation;
use modeling_ops::{execute_fillet, execute_sweep, query, wall_extrude, OpError, WallExtrude};
use tracing::{debug, instrument};

use crate::body::BodyHandle;
use crate::builder::{single_region, BinBuilder};
use crate::config::LipShape;
use crate::dims::{self, ROUNDED_LIP_FILLET, TOP_HEIGHT};
use crate::error::{BuildError, QueryContext};
use crate::stages::{StageId, StageKind};

#[derive(Debug, Clone, Copy)]
pub struct TopHandle {
    pub solid: KernelSolidHandle,
    pub stage: StageId,
}

impl BinBuilder<'_> {
    /// A flat cap, or the stacking lip swept around the top of the walls.
    #[instrument(skip(self, body), fields(lip = ?self.config.effective_lip()))]
    pub fn build_top(&mut self, body: &BodyHandle) -> Result<TopHandle, BuildError> {
        let top_face = self
            .log
            .require_live(body.walls, body.top_face, self.introspect())?;
        match self.config.effective_lip() {
            None => self.flat_cap(top_face),
            Some(shape) => self.stacking_lip(body, top_face, shape),
        }
    }

    fn flat_cap(&mut self, top_face: KernelId) -> Result<TopHandle, BuildError> {
        let cap = wall_extrude(
            self.kb,
            &[top_face],
            top_face,
            &WallExtrude {
                depth: TOP_HEIGHT,
                ..WallExtrude::default()
            },
        )?;
        let stage = self.log.record("cap", StageKind::Extrude, &cap.result);
        Ok(TopHandle {
            solid: cap.solid,
            stage,
        })
    }

    fn stacking_lip(
        &mut self,
        body: &BodyHandle,
        top_face: KernelId,
        shape: LipShape,
    ) -> Result<TopHandle, BuildError> {
        // Outer rim only: the cavity opening was made by a later stage.
        let wall_edges = self.log.live_edges(body.walls, self.introspect())?;
        let path: Vec<KernelId> = query::loop_edges(self.introspect(), top_face)
            .into_iter()
            .filter(|e| wall_edges.contains(e))
            .collect();
        let front = query::find_extreme_edge(self.introspect(), &path, Orientation::Front)
            .in_stage("lip path")?;
        let anchor = query::edge_geometry(self.introspect(), front)?.midpoint();

        // Profile x runs up the wall, y runs into the bin.
        let plane = SketchPlane::new(anchor, [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let profile = SketchShape::Polyline {
            points: dims::lip_profile(shape).to_vec(),
        };
        let sketch = self.sketch("lip profile", &plane, &[profile])?;
        let region = single_region(&sketch)?;
        let swept = execute_sweep(self.kb, region, &path)?;
        let stage = self.log.record("lip", StageKind::Sweep, &swept);
        let solid = self.log.solid(stage)?;

        match shape {
            LipShape::Sharp => {}
            LipShape::Rounded => self.round_lip(solid, stage)?,
        }
        self.drop_sketches(&[sketch.handle])?;
        debug!(%shape, path = path.len(), "lip swept");
        Ok(TopHandle { solid, stage })
    }

    /// Round the outer top edge of the lip all the way around.
    fn round_lip(&mut self, lip: KernelSolidHandle, stage: StageId) -> Result<(), BuildError> {
        let faces = self.log.live_faces(stage, self.introspect())?;
        let top = query::find_face(self.introspect(), &faces, Orientation::Top).in_stage("lip top")?;
        // The inner band on the right side also faces -X; only the faces
        // touching the top are candidates.
        let around: Vec<KernelId> = query::adjacent_faces(self.introspect(), top)
            .into_iter()
            .filter(|f| faces.contains(f))
            .collect();
        let outer = query::find_face(self.introspect(), &around, Orientation::Left)
            .in_stage("lip outer face")?;
        let seed = query::shared_edges(self.introspect(), top, outer)
            .first()
            .copied()
            .ok_or(OpError::EdgeNotFound {
                orientation: Orientation::Left,
            })
            .in_stage("lip fillet edge")?;
        let result = execute_fillet(self.kb, &lip, &[seed], ROUNDED_LIP_FILLET, true)?;
        self.log.record("lip fillet", StageKind::Fillet, &result);
        Ok(())
    }
}
