//! Application core - owns the composer state and coordinates the actor and renderer

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use render_thread::RenderThread;

use crate::ai::{AiActorHandle, AiCommand, ComposerAi, spawn_ai_actor};
use crate::composer::ComposerState;
use crate::config::Config;
use crate::input::KeyBindings;
use state::AppState;

pub struct App {
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// AI actor running Generate and Analyze pipelines
    pub(crate) ai_actor: AiActorHandle,
    /// Where copied drafts are saved
    pub(crate) export_dir: PathBuf,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    pub fn new<A: ComposerAi + 'static>(config: &Config, ai: Arc<A>) -> Result<Self> {
        let composer = ComposerState::new(config.composer.goal.clone());
        let state = AppState::new(composer, config.ai.model.clone());

        Ok(Self {
            state,
            bindings: KeyBindings::new(),
            ai_actor: spawn_ai_actor(ai),
            export_dir: config.export_dir()?,
            dirty: true, // Start dirty for initial render
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        let result = self.event_loop(&render_thread).await;

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        // In-flight runs are abandoned; their results have nowhere to go
        let _ = self.ai_actor.cmd_tx.send(AiCommand::Shutdown).await;

        result
    }
}
