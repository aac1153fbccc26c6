use gridbin_kernel::KernelId;
use modeling_ops::OpError;

use crate::config::ConfigError;
use crate::stages::StageId;

/// Errors from bin generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("operation error: {0}")]
    Op(#[from] OpError),

    /// A face or edge lookup that did not resolve to exactly one entity.
    #[error("{stage}: {source}")]
    Query {
        stage: &'static str,
        #[source]
        source: OpError,
    },

    #[error("stage {stage:?} refers to {entity:?}, which no longer exists")]
    StaleReference { stage: String, entity: KernelId },

    #[error("stage {stage:?} produced no solid")]
    MissingOutput { stage: String },

    #[error("no stage with id {0:?}")]
    UnknownStage(StageId),
}

/// Attach the pipeline stage to a failed lookup.
pub(crate) trait QueryContext<T> {
    fn in_stage(self, stage: &'static str) -> Result<T, BuildError>;
}

impl<T> QueryContext<T> for Result<T, OpError> {
    fn in_stage(self, stage: &'static str) -> Result<T, BuildError> {
        self.map_err(|source| BuildError::Query { stage, source })
    }
}
