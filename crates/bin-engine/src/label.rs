use gridbin_kernel::{ExtrudeExtent, KernelSolidHandle, SketchPlane, SketchShape};
use gridbin_types::Orientation;
use modeling_ops::{execute_extrude, query};
use tracing::{debug, instrument};

use crate::base::BaseHandle;
use crate::builder::{single_region, BinBuilder};
use crate::config::LabelOptions;
use crate::dims::{self, BODY_INTERNAL_FILLET, LIP_HEIGHT, TOP_HEIGHT};
use crate::error::BuildError;
use crate::stages::StageKind;

impl BinBuilder<'_> {
    /// Height of the label's top edge above the floor.
    pub fn label_top(&self, options: &LabelOptions) -> f64 {
        let lip = if self.config.effective_lip().is_some() {
            LIP_HEIGHT
        } else {
            0.0
        };
        dims::body_height(self.config.height) + TOP_HEIGHT - lip - options.offset
    }

    /// A sloped label shelf along the back wall, running the full width of
    /// the bin. Returns the merged part.
    #[instrument(skip(self, base, part), fields(width = options.width, offset = options.offset))]
    pub fn build_label(
        &mut self,
        base: &BaseHandle,
        part: KernelSolidHandle,
        options: &LabelOptions,
    ) -> Result<KernelSolidHandle, BuildError> {
        let back = self.floor_edge(base, Orientation::Back, "label edge")?;
        let curve = query::edge_geometry(self.introspect(), back)?;
        let (a, b) = (curve.start(), curve.end());
        // The back edge stops where the cavity corner rounding starts.
        let left = if a[0] <= b[0] { a } else { b };
        let origin = [left[0] - BODY_INTERNAL_FILLET, left[1], left[2]];

        // Sketch x runs along +Y, y runs up.
        let plane = SketchPlane::new(origin, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let top = self.label_top(options);
        let width = options.width;
        let profile = SketchShape::Polyline {
            points: vec![(0.0, top), (-width, top), (0.0, top - width)],
        };
        let sketch = self.sketch("label profile", &plane, &[profile])?;
        let region = single_region(&sketch)?;

        let stop = self
            .log
            .face(base.layer4, self.introspect(), Orientation::Right, "label stop face")?;
        let label = execute_extrude(
            self.kb,
            &[region],
            [1.0, 0.0, 0.0],
            ExtrudeExtent::UpToFace { face: stop },
        )?;
        let stage = self.log.record("label", StageKind::Extrude, &label);
        let shelf = self.log.solid(stage)?;
        let merged = self.merge("bin with label", &[Some(part), Some(shelf)])?;
        self.drop_sketches(&[sketch.handle])?;
        debug!(top, width, "label added");
        Ok(merged)
    }
}
