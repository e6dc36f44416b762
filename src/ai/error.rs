//! Failure taxonomy shared by the three AI flows

use thiserror::Error;

/// Errors surfaced by the AI flows.
///
/// Raw transport errors never cross this boundary: they are logged where they
/// occur and collapsed into [`AiError::ServiceUnavailable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    /// A required input was empty; detected before any request was made
    #[error("{0}")]
    Validation(String),

    /// The model returned nothing that conforms to the expected output schema
    #[error("{flow}: model produced no output")]
    Generation { flow: &'static str },

    /// Network, provider or timeout failure talking to the model
    #[error("{flow}: AI service unavailable")]
    ServiceUnavailable { flow: &'static str },
}

impl AiError {
    /// The user-facing description for this failure
    pub fn user_message(&self) -> &str {
        match self {
            AiError::Validation(msg) => msg,
            AiError::Generation { .. } | AiError::ServiceUnavailable { .. } => {
                "The AI service is currently unavailable. Please try again later."
            }
        }
    }
}
