use gridbin_kernel::{KernelId, KernelSolidHandle, SketchPlane, SketchShape};
use modeling_ops::{subtract_parts, wall_extrude, WallExtrude};
use tracing::{debug, instrument};

use crate::base::BaseHandle;
use crate::builder::{single_region, BinBuilder};
use crate::dims::{self, BODY_INTERNAL_FILLET, LIP_WIDTH, WALL_OFFSET};
use crate::error::BuildError;
use crate::stages::{StageId, StageKind};

#[derive(Debug, Clone, Copy)]
pub struct BodyHandle {
    pub solid: KernelSolidHandle,
    /// Stage of the outer wall extrusion.
    pub walls: StageId,
    /// Top face of the walls, with the cavity opening when hollow.
    pub top_face: KernelId,
}

impl BinBuilder<'_> {
    /// Raise the walls from the floor and, for a hollow bin, cut the cavity.
    #[instrument(skip(self, base), fields(height = self.config.height, hollow = self.config.is_hollow()))]
    pub fn build_body(&mut self, base: &BaseHandle) -> Result<BodyHandle, BuildError> {
        let floor = self
            .log
            .require_live(base.layer4, base.floor, self.introspect())?;
        let depth = dims::body_height(self.config.height);
        let walls = wall_extrude(
            self.kb,
            &[floor],
            floor,
            &WallExtrude {
                depth,
                ..WallExtrude::default()
            },
        )?;
        let stage = self.log.record("walls", StageKind::Extrude, &walls.result);

        if self.config.is_hollow() {
            self.cut_cavity(base, walls.solid, depth)?;
        }
        Ok(BodyHandle {
            solid: walls.solid,
            walls: stage,
            top_face: walls.top_face,
        })
    }

    /// Inner outline of the walls. The front wall is thickened to the lip
    /// width when a finger slide needs the room.
    pub fn cavity_outline(&self) -> SketchShape {
        let wall = self.config.wall_thickness;
        let slide_room = match self.config.finger_slide {
            Some(_) => (LIP_WIDTH - wall).max(0.0),
            None => 0.0,
        };
        let o = WALL_OFFSET;
        SketchShape::Rectangle {
            first_corner: (o + wall, o + wall + slide_room),
            second_corner: (
                o - wall + dims::footprint(self.config.columns),
                o - wall + dims::footprint(self.config.rows),
            ),
        }
    }

    fn cut_cavity(
        &mut self,
        base: &BaseHandle,
        walls: KernelSolidHandle,
        depth: f64,
    ) -> Result<(), BuildError> {
        let outline = self.cavity_outline();
        let sketch = self.sketch(
            "cavity profile",
            &SketchPlane::horizontal(base.floor_height),
            &[outline],
        )?;
        let region = single_region(&sketch)?;
        let cavity = wall_extrude(
            self.kb,
            &sketch.regions,
            region,
            &WallExtrude {
                depth,
                fillet_radius: Some(BODY_INTERNAL_FILLET),
                draft_angle: None,
            },
        )?;
        self.log.record("cavity", StageKind::Extrude, &cavity.result);
        let result = subtract_parts(self.kb, &[Some(walls), Some(cavity.solid)])?;
        self.log.record("hollow", StageKind::Subtract, &result);
        self.drop_sketches(&[sketch.handle])?;
        debug!(wall = self.config.wall_thickness, depth, "cavity cut");
        Ok(())
    }
}
