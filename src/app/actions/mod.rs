//! Action handlers for user input
//!
//! - `ai`: starting Generate and Analyze runs
//! - `draft`: demo content, copying and reset

mod ai;
mod draft;

use crate::input::Action;

use super::App;

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) {
        match action {
            Action::NextField => self.state.focus_next(),
            Action::PrevField => self.state.focus_prev(),
            Action::Generate => self.start_generate().await,
            Action::Analyze => self.start_analyze().await,
            Action::LoadDemo => self.load_demo(),
            Action::Copy => self.copy_draft(),
            Action::Reset => self.reset(),
            Action::Quit => {} // Handled in event loop
        }
    }
}
