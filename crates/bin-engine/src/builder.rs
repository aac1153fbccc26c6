use gridbin_kernel::{
    KernelId, KernelIntrospect, KernelSketch, KernelSketchHandle, KernelSolidHandle, SketchPlane,
    SketchShape,
};
use modeling_ops::{create_profile, merge_parts, remove_sketches, KernelBundle, OpError};
use tracing::debug;

use crate::config::BinConfig;
use crate::error::BuildError;
use crate::stages::{StageKind, StageLog};

/// Runs the construction stages of one bin against a kernel.
///
/// Stages hand each other small handle structs (`BaseHandle`, `BodyHandle`,
/// `TopHandle`); everything else they need is looked up through the stage
/// log.
pub struct BinBuilder<'a> {
    pub(crate) kb: &'a mut dyn KernelBundle,
    pub(crate) config: &'a BinConfig,
    pub(crate) log: StageLog,
}

impl<'a> BinBuilder<'a> {
    pub fn new(kb: &'a mut dyn KernelBundle, config: &'a BinConfig) -> Self {
        Self {
            kb,
            config,
            log: StageLog::new(),
        }
    }

    pub fn config(&self) -> &BinConfig {
        self.config
    }

    pub fn log(&self) -> &StageLog {
        &self.log
    }

    pub fn into_log(self) -> StageLog {
        self.log
    }

    pub(crate) fn introspect(&self) -> &dyn KernelIntrospect {
        self.kb.as_introspect()
    }

    pub(crate) fn sketch(
        &mut self,
        name: &str,
        plane: &SketchPlane,
        shapes: &[SketchShape],
    ) -> Result<KernelSketch, BuildError> {
        let sketch = create_profile(self.kb, plane, shapes)?;
        self.log.record_sketch(name, &sketch);
        Ok(sketch)
    }

    pub(crate) fn drop_sketches(&mut self, sketches: &[KernelSketchHandle]) -> Result<(), BuildError> {
        remove_sketches(self.kb, sketches)?;
        debug!(count = sketches.len(), "construction sketches removed");
        Ok(())
    }

    /// Union parts into the first defined one.
    pub fn merge(
        &mut self,
        name: &str,
        parts: &[Option<KernelSolidHandle>],
    ) -> Result<KernelSolidHandle, BuildError> {
        let result = merge_parts(self.kb, parts)?;
        let id = self.log.record(name, StageKind::Union, &result);
        self.log.solid(id)
    }
}

/// The region of a one-shape sketch.
pub(crate) fn single_region(sketch: &KernelSketch) -> Result<KernelId, BuildError> {
    sketch
        .regions
        .first()
        .copied()
        .ok_or(BuildError::Op(OpError::NoProfiles))
}
