//! AI flows for prospect research and cold email writing
//!
//! This module wraps a hosted model (OpenRouter) behind three flows:
//! - Prospect insight summarization (the "hook")
//! - Personalized email generation
//! - Email effectiveness rating

mod actor;
mod client;
mod error;
mod flows;
pub mod markup;
mod model;
mod prompts;
mod schema;
mod types;

pub use actor::{AiActorHandle, AiCommand, spawn_ai_actor};
pub use client::{DEFAULT_BASE_URL, OpenRouterClient};
pub use error::AiError;
pub use flows::{ComposerAi, FlowClient, FlowLimits};
pub use model::{OutputSchema, StructuredModel, StructuredPrompt};
pub use types::{
    EffectivenessRequest, EffectivenessResult, EmailGenerationRequest, EmailGenerationResult,
    EngagementPredictions, ProspectInsightRequest, ProspectInsightResult,
};
