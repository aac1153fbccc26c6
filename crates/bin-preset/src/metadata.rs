use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Preset metadata stored alongside the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMetadata {
    pub id: Uuid,
    /// Human-readable preset name.
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl PresetMetadata {
    /// New metadata with a fresh id, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Mark the preset as modified now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
