//! Sequencing of AI calls for one Generate or Analyze run
//!
//! Runs report progress through an event sink so the same code drives the
//! in-process [`Composer`](super::Composer) and the TUI's background actor.

use super::error::ComposerError;
use super::state::{AnalyzeTicket, ComposerEvent, GenerateTicket, PipelineStage};
use crate::ai::{ComposerAi, EmailGenerationRequest};

/// Summarize the research, then write the email from that summary.
///
/// The generator is only called once the summarizer has returned, and its
/// context is exactly that summary.
pub async fn run_generate<A: ComposerAi>(
    ai: &A,
    ticket: GenerateTicket,
    mut emit: impl FnMut(ComposerEvent),
) -> Result<(), ComposerError> {
    let run = ticket.run;

    let summary = match ai.summarize_prospect(&ticket.insight).await {
        Ok(insight) => insight.summary,
        Err(error) => {
            let failure = ComposerError::stage(PipelineStage::Summarize, &error);
            emit(ComposerEvent::GenerateFailed {
                run,
                stage: PipelineStage::Summarize,
                error,
            });
            return Err(failure);
        }
    };

    emit(ComposerEvent::Summarized {
        run,
        summary: summary.clone(),
    });

    let request = EmailGenerationRequest {
        email_context: summary,
        ..ticket.identity
    };

    match ai.generate_email(&request).await {
        Ok(email) => {
            emit(ComposerEvent::EmailGenerated { run, email });
            Ok(())
        }
        Err(error) => {
            let failure = ComposerError::stage(PipelineStage::Generate, &error);
            emit(ComposerEvent::GenerateFailed {
                run,
                stage: PipelineStage::Generate,
                error,
            });
            Err(failure)
        }
    }
}

/// Rate the draft captured in the ticket
pub async fn run_analyze<A: ComposerAi>(
    ai: &A,
    ticket: AnalyzeTicket,
    mut emit: impl FnMut(ComposerEvent),
) -> Result<(), ComposerError> {
    let revision = ticket.revision;

    match ai.rate_email(&ticket.request).await {
        Ok(result) => {
            emit(ComposerEvent::Analyzed { revision, result });
            Ok(())
        }
        Err(error) => {
            let failure = ComposerError::stage(PipelineStage::Analyze, &error);
            emit(ComposerEvent::AnalyzeFailed { revision, error });
            Err(failure)
        }
    }
}
