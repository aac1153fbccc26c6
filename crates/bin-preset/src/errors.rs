use bin_engine::ConfigError;

/// Errors during preset loading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("preset holds an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors during preset saving.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("refusing to save an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("serialization failed: {0}")]
    Serialize(String),
}
