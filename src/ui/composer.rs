use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::{Theme, symbols};
use super::widgets::sanitize_text;
use crate::app::state::{AppState, Field};

/// Left column: research and prospect identity
pub fn render_prospect_pane(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Details
            Constraint::Length(3), // Name
            Constraint::Length(3), // Company
            Constraint::Length(3), // Job title
        ])
        .split(area);

    let details = state.field(Field::Details);
    let title = if state.composer.is_generating() {
        " Prospect Details (locked for this run) ".to_string()
    } else {
        format!(" {} ({} chars) ", Field::Details.label(), details.chars().count())
    };
    render_text_field(frame, chunks[0], &title, details, state.focus == Field::Details);

    for (chunk, field) in chunks[1..]
        .iter()
        .zip([Field::Name, Field::Company, Field::JobTitle])
    {
        let title = format!(" {} ", field.label());
        render_field(frame, *chunk, &title, state.field(field), state.focus == field);
    }
}

/// Right column: subject, body and the stock-phrase warning
pub fn render_draft_pane(frame: &mut Frame, area: Rect, state: &AppState) {
    let warnings = state.subject_warnings();
    let warning_height = if warnings.is_empty() { 0 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // Subject
            Constraint::Length(warning_height), // Stock phrase warning
            Constraint::Min(3),                 // Body
        ])
        .split(area);

    render_field(
        frame,
        chunks[0],
        " Subject ",
        state.field(Field::Subject),
        state.focus == Field::Subject,
    );

    if !warnings.is_empty() {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", symbols::WARNING), Theme::text_warning()),
            Span::styled(
                format!("Generic phrasing in subject: {}", warnings.join(", ")),
                Theme::text_warning(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[1]);
    }

    let body = state.field(Field::Body);
    let title = if state.composer.is_generating() {
        " Body (writing...) ".to_string()
    } else {
        format!(" Body ({} chars) ", body.chars().count())
    };
    render_text_field(frame, chunks[2], &title, body, state.focus == Field::Body);
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string())
}

fn field_text(value: &str, focused: bool) -> String {
    let value = sanitize_text(value);
    if focused {
        format!("{}{}", value, symbols::CURSOR)
    } else {
        value
    }
}

fn render_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let block = field_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = if focused {
        Theme::text()
    } else {
        Theme::text_secondary()
    };

    let paragraph = Paragraph::new(field_text(value, focused)).style(style);
    frame.render_widget(paragraph, inner);
}

/// Multi-line field that keeps the end of the text in view
fn render_text_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let block = field_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = if focused {
        Theme::text()
    } else {
        Theme::text_secondary()
    };

    let text = field_text(value, focused);
    let lines = wrapped_line_count(&text, inner.width);
    let scroll = lines.saturating_sub(inner.height as usize);

    let paragraph = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, inner);
}

/// Approximate rendered line count for wrapped text
fn wrapped_line_count(text: &str, width: u16) -> usize {
    use unicode_width::UnicodeWidthStr;

    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}
