//! Request and result records exchanged with the AI flows.
//!
//! Every record lives for exactly one pipeline step: it is built right before
//! the call that consumes it and dropped once its result is rendered.

use serde::{Deserialize, Serialize};

/// Input to the prospect insight summarizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectInsightRequest {
    /// Free-text research: bio, articles, posts
    pub prospect_details: String,
}

/// The single-paragraph hook extracted from prospect research
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectInsightResult {
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailGenerationRequest {
    pub prospect_name: String,
    pub prospect_company: String,
    pub prospect_job_title: String,
    /// Talking points for the opening; empty means "no additional context"
    #[serde(default)]
    pub email_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailGenerationResult {
    pub subject_line: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivenessRequest {
    /// Subject and body concatenated, markup stripped
    pub email_content: String,
    pub target_audience: String,
    pub goal: String,
}

/// Predicted engagement rates, each a percentage in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementPredictions {
    pub open_rate: f64,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
}

impl EngagementPredictions {
    pub fn all_within(&self, min: f64, max: f64) -> bool {
        [self.open_rate, self.click_through_rate, self.conversion_rate]
            .iter()
            .all(|v| v.is_finite() && *v >= min && *v <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivenessResult {
    /// 0 (certain failure) to 100 (certain success)
    pub effectiveness_score: f64,
    pub engagement_predictions: EngagementPredictions,
    /// Rewrite instructions, most impactful first
    pub suggestions: Vec<String>,
}

impl EffectivenessResult {
    /// The suggestions a reader actually sees, in their original order
    pub fn top_suggestions(&self, limit: usize) -> &[String] {
        &self.suggestions[..self.suggestions.len().min(limit)]
    }

    /// Score rounded for display
    pub fn display_score(&self) -> u8 {
        self.effectiveness_score.round().clamp(0.0, 100.0) as u8
    }
}
