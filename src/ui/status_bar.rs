//! Status bar with run indicators and the error marker

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::{Theme, symbols};
use crate::app::state::AppState;
use crate::composer::{AnalyzePhase, GeneratePhase};
use crate::constants::SPINNER_FRAME_MS;

/// Calculate display width of a string (accounting for Unicode)
fn display_width(s: &str) -> usize {
    use unicode_width::UnicodeWidthStr;
    s.width()
}

fn spinner_frame(state: &AppState) -> &'static str {
    let tick = state.started.elapsed().as_millis() / SPINNER_FRAME_MS;
    symbols::SPINNER[(tick % symbols::SPINNER.len() as u128) as usize]
}

/// Short description of what the composer is doing
pub fn activity(state: &AppState) -> String {
    let composer = &state.composer;
    let mut parts = Vec::new();

    match composer.generate {
        GeneratePhase::Summarizing => parts.push("Researching prospect...".to_string()),
        GeneratePhase::Generating => parts.push("Writing email...".to_string()),
        GeneratePhase::Failed(stage) => parts.push(format!("Generate failed at {}", stage)),
        GeneratePhase::Idle | GeneratePhase::Ready => {}
    }
    match composer.analyze {
        AnalyzePhase::Analyzing => parts.push("Analyzing...".to_string()),
        AnalyzePhase::Failed => parts.push("Analysis failed".to_string()),
        AnalyzePhase::Idle | AnalyzePhase::Ready => {}
    }

    if parts.is_empty() {
        "Ready".to_string()
    } else {
        parts.join("  ")
    }
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = Theme::status_bar();

    let mut left = vec![Span::styled(" hookline ", style)];
    if state.is_busy() {
        left.push(Span::styled(format!("{} ", spinner_frame(state)), style));
    }
    let activity = activity(state);
    left.push(Span::styled(activity.clone(), style));

    let mut right = Vec::new();
    if state.status.has_unacknowledged_error {
        right.push(Span::styled(
            format!("{} ", symbols::ERROR_INDICATOR),
            Theme::error_indicator(),
        ));
    }
    let model = format!("{} ", state.model);
    right.push(Span::styled(model.clone(), style));

    let used = 10
        + if state.is_busy() { 2 } else { 0 }
        + display_width(&activity)
        + display_width(&model)
        + if state.status.has_unacknowledged_error { 2 } else { 0 };
    let padding = (area.width as usize).saturating_sub(used);

    let mut spans = left;
    spans.push(Span::styled(" ".repeat(padding), style));
    spans.extend(right);

    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}
