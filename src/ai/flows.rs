//! The three AI flows: summarize insights, generate email, rate effectiveness
//!
//! Each flow is one prompt template plus validation of the structured reply.
//! Nothing is retried; a failed flow is retried only by the user asking again.

use std::future::Future;

use serde::de::DeserializeOwned;

use super::error::AiError;
use super::markup;
use super::model::{StructuredModel, StructuredPrompt};
use super::prompts;
use super::schema;
use super::types::{
    EffectivenessRequest, EffectivenessResult, EmailGenerationRequest, EmailGenerationResult,
    ProspectInsightRequest, ProspectInsightResult,
};

const SUMMARIZE_FLOW: &str = "summarize_prospect_insights";
const GENERATE_FLOW: &str = "generate_personalized_email";
const RATE_FLOW: &str = "rate_email_effectiveness";

/// The AI operations the composer depends on
pub trait ComposerAi: Send + Sync {
    /// Extract the single best outreach hook from free-text research
    fn summarize_prospect(
        &self,
        request: &ProspectInsightRequest,
    ) -> impl Future<Output = Result<ProspectInsightResult, AiError>> + Send;

    /// Write a subject line and body for the prospect
    fn generate_email(
        &self,
        request: &EmailGenerationRequest,
    ) -> impl Future<Output = Result<EmailGenerationResult, AiError>> + Send;

    /// Score an email and suggest improvements
    fn rate_email(
        &self,
        request: &EffectivenessRequest,
    ) -> impl Future<Output = Result<EffectivenessResult, AiError>> + Send;
}

/// Token budgets for each flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLimits {
    pub summary_max_tokens: u32,
    pub email_max_tokens: u32,
    pub rating_max_tokens: u32,
}

/// [`ComposerAi`] backed by a hosted model
pub struct FlowClient<M> {
    model: M,
    limits: FlowLimits,
}

impl<M: StructuredModel> FlowClient<M> {
    pub fn new(model: M, limits: FlowLimits) -> Self {
        Self { model, limits }
    }

    /// Send one prompt and decode the reply, collapsing every failure into the
    /// two AI-layer conditions.
    async fn run<T: DeserializeOwned>(
        &self,
        flow: &'static str,
        prompt: StructuredPrompt,
    ) -> Result<T, AiError> {
        tracing::debug!(flow, prompt_len = prompt.user.len(), "AI flow started");

        let content = match self.model.generate(&prompt).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::warn!(flow, "AI model returned no content");
                return Err(AiError::Generation { flow });
            }
            Err(e) => {
                tracing::error!(flow, "AI request failed: {:#}", e);
                return Err(AiError::ServiceUnavailable { flow });
            }
        };

        serde_json::from_str(markup::strip_code_fence(&content)).map_err(|e| {
            tracing::warn!(
                flow,
                content_len = content.len(),
                "AI response did not match schema: {}",
                e
            );
            AiError::Generation { flow }
        })
    }
}

impl<M: StructuredModel> ComposerAi for FlowClient<M> {
    async fn summarize_prospect(
        &self,
        request: &ProspectInsightRequest,
    ) -> Result<ProspectInsightResult, AiError> {
        if request.prospect_details.trim().is_empty() {
            return Err(AiError::Validation(
                "Please paste some details about the prospect.".to_string(),
            ));
        }

        let prompt = StructuredPrompt {
            system: prompts::PROSPECT_INSIGHT_SYSTEM,
            user: prompts::prospect_insight_message(request),
            output: schema::prospect_insight(),
            max_tokens: self.limits.summary_max_tokens,
        };
        let raw: ProspectInsightResult = self.run(SUMMARIZE_FLOW, prompt).await?;

        let summary = markup::single_paragraph(&raw.summary);
        if summary.is_empty() {
            tracing::warn!(flow = SUMMARIZE_FLOW, "AI returned an empty summary");
            return Err(AiError::Generation {
                flow: SUMMARIZE_FLOW,
            });
        }

        tracing::info!(flow = SUMMARIZE_FLOW, summary_len = summary.len(), "AI flow completed");
        Ok(ProspectInsightResult { summary })
    }

    async fn generate_email(
        &self,
        request: &EmailGenerationRequest,
    ) -> Result<EmailGenerationResult, AiError> {
        let prompt = StructuredPrompt {
            system: prompts::PERSONALIZED_EMAIL_SYSTEM,
            user: prompts::personalized_email_message(request),
            output: schema::personalized_email(),
            max_tokens: self.limits.email_max_tokens,
        };
        let raw: EmailGenerationResult = self.run(GENERATE_FLOW, prompt).await?;

        let subject_line = markup::normalize_subject(&raw.subject_line);
        let body = markup::plain_paragraphs(&raw.body);
        if subject_line.is_empty() || body.is_empty() {
            tracing::warn!(flow = GENERATE_FLOW, "AI returned an empty subject or body");
            return Err(AiError::Generation {
                flow: GENERATE_FLOW,
            });
        }

        let stock = markup::stock_phrases(&subject_line);
        if !stock.is_empty() {
            tracing::debug!(flow = GENERATE_FLOW, ?stock, "Subject contains stock phrases");
        }

        tracing::info!(
            flow = GENERATE_FLOW,
            subject_len = subject_line.len(),
            body_len = body.len(),
            paragraphs = markup::paragraph_count(&body),
            "AI flow completed"
        );
        Ok(EmailGenerationResult { subject_line, body })
    }

    async fn rate_email(
        &self,
        request: &EffectivenessRequest,
    ) -> Result<EffectivenessResult, AiError> {
        if request.email_content.trim().is_empty() {
            return Err(AiError::Validation(
                "Please write or generate an email before analyzing it.".to_string(),
            ));
        }

        let prompt = StructuredPrompt {
            system: prompts::EFFECTIVENESS_SYSTEM,
            user: prompts::effectiveness_message(request),
            output: schema::email_effectiveness(),
            max_tokens: self.limits.rating_max_tokens,
        };
        let raw: EffectivenessResult = self.run(RATE_FLOW, prompt).await?;

        let score = raw.effectiveness_score;
        if !score.is_finite()
            || !(0.0..=100.0).contains(&score)
            || !raw.engagement_predictions.all_within(0.0, 100.0)
        {
            tracing::warn!(
                flow = RATE_FLOW,
                score,
                predictions = ?raw.engagement_predictions,
                "AI rating out of bounds"
            );
            return Err(AiError::Generation { flow: RATE_FLOW });
        }

        let suggestions: Vec<String> = raw
            .suggestions
            .iter()
            .map(|s| markup::single_paragraph(s))
            .filter(|s| !s.is_empty())
            .collect();

        tracing::info!(
            flow = RATE_FLOW,
            score,
            suggestions = suggestions.len(),
            "AI flow completed"
        );
        Ok(EffectivenessResult {
            effectiveness_score: score,
            engagement_predictions: raw.engagement_predictions,
            suggestions,
        })
    }
}
