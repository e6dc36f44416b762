//! Main event loop and AI event processing

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::constants::EVENT_POLL_MS;
use crate::input::{InputResult, handle_input};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Process AI events from the actor (non-blocking)
            if self.process_ai_events() {
                self.dirty = true;
            }

            if self.state.refresh_notices() {
                self.dirty = true;
            }

            // Clear expired notices
            if self.state.clear_notice_if_expired() {
                self.dirty = true;
            }

            // Keep the spinner moving while a run is in flight
            if self.state.is_busy() {
                self.dirty = true;
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                render_thread.render(self.state.clone());
                self.dirty = false;
            }

            // Yield so actor tasks progress on a single-core runtime
            tokio::task::yield_now().await;

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.state.acknowledge_error();
                        self.handle_action(action).await;
                    }
                    InputResult::Char(c) => {
                        self.state.acknowledge_error();
                        self.state.insert_char(c);
                    }
                    InputResult::Paste(text) => {
                        self.state.acknowledge_error();
                        self.state.insert_str(&text);
                    }
                    InputResult::Backspace => {
                        self.state.acknowledge_error();
                        self.state.backspace();
                    }
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Apply pipeline events from the AI actor. Returns true if any were processed.
    pub(crate) fn process_ai_events(&mut self) -> bool {
        let mut had_events = false;

        while let Ok(event) = self.ai_actor.event_rx.try_recv() {
            tracing::debug!("Received AI event: {:?}", event);
            self.state.composer.apply(event);
            had_events = true;
        }

        had_events
    }
}
