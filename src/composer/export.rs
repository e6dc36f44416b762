//! Saving drafts as plain-text files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Write `text` to a new timestamped file in `dir`, creating the directory if needed
pub fn save_draft(dir: &Path, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let mut path = dir.join(format!("email-{}.txt", stamp));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("email-{}-{}.txt", stamp, n));
        n += 1;
    }

    fs::write(&path, format!("{}\n", text.trim_end()))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved draft to {}", path.display());
    Ok(path)
}
