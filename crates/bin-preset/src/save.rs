use bin_engine::BinConfig;
use serde::Serialize;

use crate::errors::SaveError;
use crate::metadata::PresetMetadata;

pub const FORMAT_ID: &str = "gridfinity-bin";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Serialize)]
struct PresetFile<'a> {
    format: &'static str,
    version: u32,
    preset: &'a PresetMetadata,
    config: &'a BinConfig,
}

/// Serialize a preset to a pretty-printed JSON string.
///
/// The configuration is validated first so that every saved preset loads.
pub fn save_preset(metadata: &PresetMetadata, config: &BinConfig) -> Result<String, SaveError> {
    config.validate()?;
    let file = PresetFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        preset: metadata,
        config,
    };
    serde_json::to_string_pretty(&file).map_err(|e| SaveError::Serialize(e.to_string()))
}
