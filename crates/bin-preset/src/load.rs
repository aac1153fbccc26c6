use bin_engine::BinConfig;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::LoadError;
use crate::metadata::PresetMetadata;
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// A loaded preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preset {
    #[serde(rename = "preset")]
    pub metadata: PresetMetadata,
    pub config: BinConfig,
}

/// Deserialize a preset from a JSON string.
///
/// Checks the format identifier and version, migrates older files and
/// validates the configuration.
pub fn load_preset(json: &str) -> Result<Preset, LoadError> {
    let raw: Value = serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let format = raw
        .get("format")
        .and_then(Value::as_str)
        .ok_or(LoadError::MissingField("format"))?;
    if format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(format.to_string()));
    }

    let version = raw
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(LoadError::MissingField("version"))?;
    if version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: version,
            supported_version: FORMAT_VERSION,
        });
    }

    let current = if version < FORMAT_VERSION {
        crate::migrate::migrate(raw, version, FORMAT_VERSION)?
    } else {
        raw
    };

    let preset: Preset =
        serde_json::from_value(current).map_err(|e| LoadError::ParseError(e.to_string()))?;
    preset.config.validate()?;
    Ok(preset)
}
