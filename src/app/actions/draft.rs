//! Demo content, copying and reset

use crate::app::state::Field;
use crate::composer::{demo, export};

use super::super::App;

impl App {
    pub(crate) fn load_demo(&mut self) {
        let prospect = demo::random_prospect();
        if let Err(e) = self.state.composer.load_demo(prospect) {
            tracing::debug!("Demo not loaded: {}", e);
            return;
        }
        self.state.focus = Field::Details;
    }

    /// Save the draft as plain text to the export directory
    pub(crate) fn copy_draft(&mut self) {
        let Some(text) = self.state.composer.copy_text() else {
            return;
        };

        match export::save_draft(&self.export_dir, &text) {
            Ok(path) => self.state.composer.copied(&path.display().to_string()),
            Err(e) => {
                tracing::error!("Failed to save draft: {:#}", e);
                self.state.composer.copy_failed(&format!("{:#}", e));
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state.composer.reset();
        self.state.focus = Field::Details;
    }
}
