//! AI actor for running composer pipelines off the UI thread

use std::sync::Arc;

use tokio::sync::mpsc;

use super::flows::ComposerAi;
use crate::composer::pipeline;
use crate::composer::{AnalyzeTicket, ComposerEvent, GenerateTicket};

/// Commands that can be sent to the AI actor
#[derive(Debug)]
pub enum AiCommand {
    /// Summarize the prospect, then write the email
    Generate(GenerateTicket),
    /// Rate a draft
    Analyze(AnalyzeTicket),
    /// Shutdown the actor
    Shutdown,
}

/// Handle for communicating with the AI actor
pub struct AiActorHandle {
    pub cmd_tx: mpsc::Sender<AiCommand>,
    pub event_rx: mpsc::UnboundedReceiver<ComposerEvent>,
}

/// Spawn the AI actor task
pub fn spawn_ai_actor<A: ComposerAi + 'static>(ai: Arc<A>) -> AiActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    tokio::spawn(ai_actor_loop(ai, cmd_rx, event_tx));

    AiActorHandle { cmd_tx, event_rx }
}

async fn ai_actor_loop<A: ComposerAi + 'static>(
    ai: Arc<A>,
    mut cmd_rx: mpsc::Receiver<AiCommand>,
    event_tx: mpsc::UnboundedSender<ComposerEvent>,
) {
    // Each run gets its own task so a Generate and an Analyze can overlap.
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            AiCommand::Generate(ticket) => {
                let ai = ai.clone();
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let run = ticket.run;
                    let emit = |event| {
                        if event_tx.send(event).is_err() {
                            tracing::warn!("AI actor: event receiver dropped");
                        }
                    };
                    if let Err(e) = pipeline::run_generate(ai.as_ref(), ticket, emit).await {
                        tracing::debug!(run = run.0, "Generate run ended: {}", e);
                    }
                });
            }

            AiCommand::Analyze(ticket) => {
                let ai = ai.clone();
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let revision = ticket.revision;
                    let emit = |event| {
                        if event_tx.send(event).is_err() {
                            tracing::warn!("AI actor: event receiver dropped");
                        }
                    };
                    if let Err(e) = pipeline::run_analyze(ai.as_ref(), ticket, emit).await {
                        tracing::debug!(revision, "Analyze run ended: {}", e);
                    }
                });
            }

            AiCommand::Shutdown => {
                break;
            }
        }
    }
}
