use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations work on the raw JSON and are applied one version at a time.
pub fn migrate(mut file: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    let mut version = from_version;
    while version < to_version {
        file = match version {
            1 => migrate_v1_to_v2(file)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: version,
                    to: to_version,
                    reason: format!("no migration path from v{version}"),
                })
            }
        };
        version += 1;
        debug!(version, "preset migrated");
    }
    Ok(file)
}

/// Version 1 had a single `filled` flag meaning "completely filled" and no
/// wall thickness.
fn migrate_v1_to_v2(mut file: Value) -> Result<Value, LoadError> {
    let failed = |reason: &str| LoadError::MigrationFailed {
        from: 1,
        to: 2,
        reason: reason.to_string(),
    };
    let config: &mut Map<String, Value> = file
        .get_mut("config")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| failed("config is not an object"))?;

    let filled = match config.remove("filled") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(other) => return Err(failed(&format!("filled must be a boolean, got {other}"))),
    };
    let fill = if filled {
        Value::String("COMPLETE".to_string())
    } else {
        Value::Null
    };
    config.insert("fill".to_string(), fill);
    config
        .entry("wall_thickness")
        .or_insert_with(|| Value::from(bin_engine::WALL_THICKNESS_BOUNDS.default));

    file["version"] = Value::from(2);
    Ok(file)
}
