use thiserror::Error;

use super::state::PipelineStage;
use crate::ai::AiError;

/// Why a composer action did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    /// Required input missing; no request was made
    #[error("{0}")]
    Validation(String),

    /// A run of the same kind is still in flight
    #[error("{0} already in progress")]
    Busy(&'static str),

    /// A pipeline stage failed after its request was issued
    #[error("{stage} failed: {message}")]
    Stage {
        stage: PipelineStage,
        message: String,
    },
}

impl ComposerError {
    pub fn stage(stage: PipelineStage, error: &AiError) -> Self {
        ComposerError::Stage {
            stage,
            message: error.user_message().to_string(),
        }
    }
}
