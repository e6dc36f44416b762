//! The seam between the flows and whatever hosts the language model

use std::future::Future;

use serde_json::Value;

/// Expected shape of a model response
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Identifier sent with the response format (letters, digits, `_`)
    pub name: &'static str,
    /// JSON schema the response must conform to
    pub schema: Value,
}

/// One structured generation request: instructions plus the schema to fill
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub system: &'static str,
    pub user: String,
    pub output: OutputSchema,
    pub max_tokens: u32,
}

/// A text-generation service that answers a structured prompt with JSON.
///
/// `Ok(None)` means the service answered but produced no content; `Err` is any
/// other failure (network, HTTP status, undecodable envelope, timeout).
pub trait StructuredModel: Send + Sync {
    fn generate(
        &self,
        prompt: &StructuredPrompt,
    ) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
}
