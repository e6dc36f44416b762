//! Common UI widgets and utilities

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::Theme;
use crate::composer::{Notice, NoticeKind};
use crate::input::KeybindingEntry;

/// One-line banner for the latest notice
pub fn notice_bar(frame: &mut Frame, area: Rect, notice: &Notice) {
    let style = match notice.kind {
        NoticeKind::Error => Theme::error_bar(),
        NoticeKind::Success => Theme::success_bar(),
    };
    let text = format!(" {}: {} ", notice.title, notice.description);
    let paragraph = Paragraph::new(truncate_string(&text, area.width as usize)).style(style);
    frame.render_widget(paragraph, area);
}

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[KeybindingEntry]) {
    use unicode_width::UnicodeWidthStr;

    if hints.is_empty() {
        return;
    }

    let available_width = area.width as usize;

    // Format: " key desc │" (separator between hints)
    let hint_widths: Vec<usize> = hints
        .iter()
        .enumerate()
        .map(|(i, hint)| {
            let base = format!(" {} ", hint.key).width() + hint.description.width();
            if i < hints.len() - 1 {
                base + 3 // " │ " separator
            } else {
                base + 1 // trailing space
            }
        })
        .collect();

    let mut total_width = 0;
    let mut hints_to_show = 0;
    for width in &hint_widths {
        if total_width + width <= available_width {
            total_width += width;
            hints_to_show += 1;
        } else {
            break;
        }
    }

    // Show at least one hint if possible
    hints_to_show = hints_to_show.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, hint) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", hint.key), Theme::help_key()));
        spans.push(Span::styled(hint.description.clone(), Theme::help_desc()));
        if i < hints_to_show - 1 {
            spans.push(Span::styled(" │ ", Theme::text_muted()));
        }
    }
    spans.push(Span::styled(" ", Theme::text_muted()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Sanitize text for display: remove control characters and ANSI escape sequences
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip until the final byte of the sequence
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' && c != '\t' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a longer line", 8), "a lon...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_sanitize_strips_escapes() {
        assert_eq!(sanitize_text("\x1b[31mred\x1b[0m text"), "red text");
        assert_eq!(sanitize_text("a\rb\nc"), "a b\nc");
    }
}
