//! Starting AI runs on the actor

use crate::ai::{AiCommand, AiError};
use crate::app::state::Field;
use crate::composer::{ComposerError, ComposerEvent, PipelineStage};

use super::super::App;

/// Reported when the actor has gone away
const ACTOR_GONE: AiError = AiError::ServiceUnavailable { flow: "ai_actor" };

impl App {
    pub(crate) async fn start_generate(&mut self) {
        let ticket = match self.state.composer.begin_generate() {
            Ok(ticket) => ticket,
            Err(ComposerError::Busy(what)) => {
                tracing::debug!("Ignoring generate: {} already in progress", what);
                return;
            }
            Err(e) => {
                tracing::debug!("Generate not started: {}", e);
                self.state.focus = Field::Details;
                return;
            }
        };

        let run = ticket.run;
        if self.ai_actor.cmd_tx.send(AiCommand::Generate(ticket)).await.is_err() {
            tracing::error!("AI actor unavailable");
            self.state.composer.apply(ComposerEvent::GenerateFailed {
                run,
                stage: PipelineStage::Summarize,
                error: ACTOR_GONE,
            });
        }
    }

    pub(crate) async fn start_analyze(&mut self) {
        let ticket = match self.state.composer.begin_analyze() {
            Ok(ticket) => ticket,
            Err(ComposerError::Busy(what)) => {
                tracing::debug!("Ignoring analyze: {} already in progress", what);
                return;
            }
            Err(e) => {
                tracing::debug!("Analyze not started: {}", e);
                self.state.focus = Field::Body;
                return;
            }
        };

        let revision = ticket.revision;
        if self.ai_actor.cmd_tx.send(AiCommand::Analyze(ticket)).await.is_err() {
            tracing::error!("AI actor unavailable");
            self.state.composer.apply(ComposerEvent::AnalyzeFailed {
                revision,
                error: ACTOR_GONE,
            });
        }
    }
}
