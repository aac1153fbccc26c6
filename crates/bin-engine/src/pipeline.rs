use gridbin_kernel::KernelSolidHandle;
use modeling_ops::{center_part, rename_part, KernelBundle};
use tracing::{info, instrument};

use crate::builder::BinBuilder;
use crate::config::BinConfig;
use crate::error::BuildError;
use crate::stages::{StageKind, StageLog};

/// A finished bin: one named solid, centred on the origin.
#[derive(Debug, Clone)]
pub struct GeneratedBin {
    pub solid: KernelSolidHandle,
    pub name: String,
    pub stages: StageLog,
}

/// Display name of a bin, rows first.
pub fn bin_name(config: &BinConfig) -> String {
    format!("Gridfinity Bin {}x{}", config.rows, config.columns)
}

/// Generate a bin from a configuration.
///
/// The configuration is validated first; nothing is created in the kernel
/// when it is rejected. On a construction error the kernel may hold partial
/// bodies.
#[instrument(skip(config, kb), fields(rows = config.rows, columns = config.columns, height = config.height))]
pub fn generate(config: &BinConfig, kb: &mut dyn KernelBundle) -> Result<GeneratedBin, BuildError> {
    config.validate()?;
    let mut builder = BinBuilder::new(kb, config);

    let base = builder.build_base()?;
    let body = builder.build_body(&base)?;
    let top = builder.build_top(&body)?;
    let mut part = builder.merge("bin", &[Some(base.solid), Some(body.solid), Some(top.solid)])?;

    if config.is_hollow() {
        if let Some(slide) = &config.finger_slide {
            builder.cut_finger_slide(&base, part, slide)?;
        }
        if let Some(label) = &config.label {
            part = builder.build_label(&base, part, label)?;
        }
    }

    let name = bin_name(config);
    let offset = center_part(builder.kb, &part)?;
    builder.log.record_step("center", StageKind::Transform, part);
    rename_part(builder.kb, &part, &name)?;

    let stages = builder.into_log();
    info!(%name, stages = stages.len(), ?offset, "bin generated");
    Ok(GeneratedBin {
        solid: part,
        name,
        stages,
    })
}
