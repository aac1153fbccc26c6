use gridbin_kernel::{ExtrudeExtent, KernelId, KernelSolidHandle, PatternDirection, SketchPlane, SketchShape};
use gridbin_types::Orientation;
use modeling_ops::{
    execute_extrude, execute_linear_pattern, query, subtract_parts, wall_extrude, WallExtrude,
};
use tracing::{debug, instrument};

use crate::builder::{single_region, BinBuilder};
use crate::config::MagnetOptions;
use crate::dims::{self, BASE_DRAFT_ANGLE, BOTTOM_SIZE, UNIT_SIZE, WALL_OFFSET};
use crate::error::{BuildError, QueryContext};
use crate::stages::{StageId, StageKind};

const X_AXIS: [f64; 3] = [1.0, 0.0, 0.0];
const Y_AXIS: [f64; 3] = [0.0, 1.0, 0.0];
const Z_AXIS: [f64; 3] = [0.0, 0.0, 1.0];

/// What the base hands on to the rest of the bin.
#[derive(Debug, Clone, Copy)]
pub struct BaseHandle {
    /// The base solid; every later part is merged into it.
    pub solid: KernelSolidHandle,
    /// Stage of the full-footprint fourth layer.
    pub layer4: StageId,
    /// Top face of the fourth layer, which becomes the bin floor.
    pub floor: KernelId,
    pub floor_height: f64,
}

/// One grid cell's stepped foot, before replication.
struct Foot {
    solid: KernelSolidHandle,
    layer1: StageId,
    bottom: KernelId,
    top_height: f64,
}

impl BinBuilder<'_> {
    /// Build the stepped feet, one per grid cell, joined by a plate covering
    /// the whole footprint.
    #[instrument(skip(self), fields(rows = self.config.rows, columns = self.config.columns))]
    pub fn build_base(&mut self) -> Result<BaseHandle, BuildError> {
        let foot = self.build_foot()?;
        if let Some(magnets) = self.config.magnets {
            self.cut_magnet_sockets(&foot, &magnets)?;
        }
        let instances = self.replicate_foot(foot.solid)?;

        let o = WALL_OFFSET;
        let plate = SketchShape::Rectangle {
            first_corner: (o, o),
            second_corner: (
                o + dims::footprint(self.config.columns),
                o + dims::footprint(self.config.rows),
            ),
        };
        let sketch = self.sketch(
            "layer 4 profile",
            &SketchPlane::horizontal(foot.top_height),
            &[plate],
        )?;
        let region = single_region(&sketch)?;
        let layer4 = wall_extrude(
            self.kb,
            &sketch.regions,
            region,
            &WallExtrude {
                depth: dims::LAYER4_HEIGHT,
                fillet_radius: Some(dims::BODY_FILLET),
                draft_angle: None,
            },
        )?;
        let layer4_stage = self.log.record("layer 4", StageKind::Extrude, &layer4.result);

        let mut parts = Vec::with_capacity(instances.len() + 2);
        parts.push(Some(foot.solid));
        parts.extend(instances.into_iter().map(Some));
        parts.push(Some(layer4.solid));
        let solid = self.merge("base", &parts)?;
        self.drop_sketches(&[sketch.handle])?;

        let floor_height = foot.top_height + dims::LAYER4_HEIGHT;
        debug!(?solid, floor_height, "base built");
        Ok(BaseHandle {
            solid,
            layer4: layer4_stage,
            floor: layer4.top_face,
            floor_height,
        })
    }

    /// The three drafted layers under a single cell.
    fn build_foot(&mut self) -> Result<Foot, BuildError> {
        let square = SketchShape::Rectangle {
            first_corner: (0.0, 0.0),
            second_corner: (BOTTOM_SIZE, BOTTOM_SIZE),
        };
        let sketch = self.sketch("base profile", &SketchPlane::horizontal(0.0), &[square])?;
        let region = single_region(&sketch)?;

        let layer1 = wall_extrude(
            self.kb,
            &sketch.regions,
            region,
            &WallExtrude {
                depth: dims::LAYER1_HEIGHT,
                fillet_radius: Some(dims::BASE_FILLET),
                draft_angle: Some(BASE_DRAFT_ANGLE),
            },
        )?;
        let layer1_stage = self.log.record("layer 1", StageKind::Extrude, &layer1.result);
        let bottom = self
            .log
            .face(layer1_stage, self.introspect(), Orientation::Bottom, "base bottom")?;

        let layer2 = wall_extrude(
            self.kb,
            &[layer1.top_face],
            layer1.top_face,
            &WallExtrude {
                depth: dims::LAYER2_HEIGHT,
                ..WallExtrude::default()
            },
        )?;
        self.log.record("layer 2", StageKind::Extrude, &layer2.result);

        let layer3 = wall_extrude(
            self.kb,
            &[layer2.top_face],
            layer2.top_face,
            &WallExtrude {
                depth: dims::LAYER3_HEIGHT,
                fillet_radius: None,
                draft_angle: Some(BASE_DRAFT_ANGLE),
            },
        )?;
        self.log.record("layer 3", StageKind::Extrude, &layer3.result);
        let top_height = query::face_point(self.introspect(), layer3.top_face)
            .in_stage("layer 3 top")?[2];

        let solid = self.merge(
            "foot",
            &[Some(layer1.solid), Some(layer2.solid), Some(layer3.solid)],
        )?;
        self.drop_sketches(&[sketch.handle])?;
        Ok(Foot {
            solid,
            layer1: layer1_stage,
            bottom,
            top_height,
        })
    }

    /// Four sockets drilled up into the bottom of the foot.
    fn cut_magnet_sockets(&mut self, foot: &Foot, magnets: &MagnetOptions) -> Result<(), BuildError> {
        let bottom = self
            .log
            .require_live(foot.layer1, foot.bottom, self.introspect())?;
        let center = query::face_center(self.introspect(), bottom).in_stage("magnet plane")?;
        let plane = SketchPlane::new(center, Z_AXIS, X_AXIS);
        let reach = BOTTOM_SIZE / 2.0 - dims::MAGNET_CLEARANCE;
        let holes: Vec<SketchShape> = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .iter()
            .map(|&(sx, sy)| SketchShape::Circle {
                center: (sx * reach, sy * reach),
                radius: magnets.radius,
            })
            .collect();
        let sketch = self.sketch("magnet profile", &plane, &holes)?;

        let sockets = execute_extrude(
            self.kb,
            &sketch.regions,
            Z_AXIS,
            ExtrudeExtent::Blind {
                depth: magnets.depth,
            },
        )?;
        self.log.record("magnet sockets", StageKind::Extrude, &sockets);
        let result = subtract_parts(self.kb, &[Some(foot.solid), sockets.main()])?;
        self.log.record("magnet cut", StageKind::Subtract, &result);
        self.drop_sketches(&[sketch.handle])?;
        debug!(radius = magnets.radius, depth = magnets.depth, "magnet sockets cut");
        Ok(())
    }

    /// Copies of the foot for every other grid cell: columns along +X, rows
    /// along +Y.
    fn replicate_foot(&mut self, foot: KernelSolidHandle) -> Result<Vec<KernelSolidHandle>, BuildError> {
        let (rows, columns) = (self.config.rows, self.config.columns);
        if rows <= 1 && columns <= 1 {
            return Ok(Vec::new());
        }
        let result = execute_linear_pattern(
            self.kb,
            &foot,
            PatternDirection {
                direction: X_AXIS,
                spacing: UNIT_SIZE,
                count: columns,
            },
            Some(PatternDirection {
                direction: Y_AXIS,
                spacing: UNIT_SIZE,
                count: rows,
            }),
        )?;
        self.log.record("foot pattern", StageKind::Pattern, &result);
        Ok(result.outputs)
    }

    /// The straight floor edge furthest towards `side` (front or back).
    pub(crate) fn floor_edge(
        &self,
        base: &BaseHandle,
        side: Orientation,
        context: &'static str,
    ) -> Result<KernelId, BuildError> {
        let floor = self.log.require_live(base.layer4, base.floor, self.introspect())?;
        let rim = query::loop_edges(self.introspect(), floor);
        let along_x = query::parallel_edges(self.introspect(), &rim, X_AXIS);
        query::find_extreme_edge(self.introspect(), &along_x, side).in_stage(context)
    }
}
