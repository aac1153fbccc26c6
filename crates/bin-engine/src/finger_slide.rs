use gridbin_kernel::KernelSolidHandle;
use gridbin_types::Orientation;
use modeling_ops::{execute_chamfer, execute_fillet};
use tracing::instrument;

use crate::base::BaseHandle;
use crate::builder::BinBuilder;
use crate::config::{FingerSlideOptions, FingerSlideType};
use crate::error::BuildError;
use crate::stages::{StageId, StageKind};

impl BinBuilder<'_> {
    /// Ease the front floor edge so contents can be scooped out.
    #[instrument(skip(self, base, part), fields(kind = %options.kind, height = options.height))]
    pub fn cut_finger_slide(
        &mut self,
        base: &BaseHandle,
        part: KernelSolidHandle,
        options: &FingerSlideOptions,
    ) -> Result<StageId, BuildError> {
        let edge = self.floor_edge(base, Orientation::Front, "finger slide edge")?;
        let stage = match options.kind {
            FingerSlideType::Rounded => {
                let result = execute_fillet(self.kb, &part, &[edge], options.height, false)?;
                self.log.record("finger slide", StageKind::Fillet, &result)
            }
            FingerSlideType::Chamfer => {
                let result = execute_chamfer(self.kb, &part, &[edge], options.height)?;
                self.log.record("finger slide", StageKind::Chamfer, &result)
            }
        };
        Ok(stage)
    }
}
