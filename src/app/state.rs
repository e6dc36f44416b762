//! UI-side state: the composer record plus focus and notice display

use std::time::Instant;

use crate::ai::markup;
use crate::composer::{ComposerState, Notice, NoticeKind};
use crate::constants::{ERROR_TTL_SECS, SUCCESS_TTL_SECS};

/// Editable fields, in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Details,
    Name,
    Company,
    JobTitle,
    Subject,
    Body,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Details,
        Field::Name,
        Field::Company,
        Field::JobTitle,
        Field::Subject,
        Field::Body,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Details => "Prospect Details",
            Field::Name => "Name",
            Field::Company => "Company",
            Field::JobTitle => "Job Title",
            Field::Subject => "Subject",
            Field::Body => "Body",
        }
    }

    /// Enter inserts a newline instead of moving on
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::Details | Field::Body)
    }
}

/// The notice banner and its lifetime
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub banner: Option<Notice>,
    /// Persists after the banner expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
    /// Number of composer notices already surfaced
    seen: u64,
}

impl StatusState {
    /// Surface the newest composer notice. Returns true if a new one appeared.
    fn sync(&mut self, raised: u64, latest: Option<&Notice>) -> bool {
        if raised <= self.seen {
            // The count goes down only if the composer was replaced
            self.seen = raised;
            return false;
        }
        self.seen = raised;
        let Some(latest) = latest else {
            return false;
        };
        if latest.kind == NoticeKind::Error {
            self.has_unacknowledged_error = true;
        }
        self.banner = Some(latest.clone());
        true
    }

    /// Clear the banner if TTL expired. Returns true if it was cleared.
    fn clear_if_expired(&mut self, now: Instant) -> bool {
        let Some(banner) = &self.banner else {
            return false;
        };
        let ttl = match banner.kind {
            NoticeKind::Error => ERROR_TTL_SECS,
            NoticeKind::Success => SUCCESS_TTL_SECS,
        };
        if now.saturating_duration_since(banner.at).as_secs() >= ttl {
            self.banner = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub composer: ComposerState,
    pub focus: Field,
    pub status: StatusState,
    /// Model name shown in the status bar
    pub model: String,
    pub started: Instant,
}

impl AppState {
    pub fn new(composer: ComposerState, model: impl Into<String>) -> Self {
        Self {
            composer,
            focus: Field::default(),
            status: StatusState::default(),
            model: model.into(),
            started: Instant::now(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        let c = &self.composer;
        match field {
            Field::Details => &c.prospect.details,
            Field::Name => &c.prospect.name,
            Field::Company => &c.prospect.company,
            Field::JobTitle => &c.prospect.job_title,
            Field::Subject => &c.draft.subject,
            Field::Body => &c.draft.body,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        let c = &mut self.composer;
        match field {
            Field::Details => &mut c.prospect.details,
            Field::Name => &mut c.prospect.name,
            Field::Company => &mut c.prospect.company,
            Field::JobTitle => &mut c.prospect.job_title,
            Field::Subject => &mut c.draft.subject,
            Field::Body => &mut c.draft.body,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' && !self.focus.is_multiline() {
            self.focus_next();
            return;
        }
        let focus = self.focus;
        self.field_mut(focus).push(c);
    }

    /// Insert pasted text; single-line fields get newlines flattened to spaces
    pub fn insert_str(&mut self, text: &str) {
        let focus = self.focus;
        if focus.is_multiline() {
            self.field_mut(focus).push_str(text);
        } else {
            let flat = markup::single_paragraph(text);
            self.field_mut(focus).push_str(&flat);
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.field_mut(focus).pop();
    }

    /// Pick up notices raised by the composer since the last call
    pub fn refresh_notices(&mut self) -> bool {
        self.status
            .sync(self.composer.notice_count(), self.composer.latest_notice())
    }

    pub fn clear_notice_if_expired(&mut self) -> bool {
        self.status.clear_if_expired(Instant::now())
    }

    /// Acknowledge the error indicator; call on user input
    pub fn acknowledge_error(&mut self) {
        self.status.has_unacknowledged_error = false;
    }

    pub fn is_busy(&self) -> bool {
        !self.composer.busy.is_empty()
    }

    /// Stock sales phrases in the current subject line
    pub fn subject_warnings(&self) -> Vec<&'static str> {
        markup::stock_phrases(&self.composer.draft.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(ComposerState::default(), "test-model")
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut s = state();
        for _ in 0..Field::ALL.len() {
            s.focus_next();
        }
        assert_eq!(s.focus, Field::Details);

        s.focus_prev();
        assert_eq!(s.focus, Field::Body);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut s = state();
        s.focus = Field::Company;
        for c in "Acme".chars() {
            s.insert_char(c);
        }
        s.backspace();
        assert_eq!(s.composer.prospect.company, "Acm");
        assert!(s.composer.prospect.name.is_empty());
    }

    #[test]
    fn test_enter_in_single_line_field_moves_focus() {
        let mut s = state();
        s.focus = Field::Name;
        s.insert_char('\n');
        assert_eq!(s.focus, Field::Company);
        assert!(s.composer.prospect.name.is_empty());

        s.focus = Field::Body;
        s.insert_char('\n');
        assert_eq!(s.composer.draft.body, "\n");
    }

    #[test]
    fn test_paste_into_single_line_field_is_flattened() {
        let mut s = state();
        s.focus = Field::JobTitle;
        s.insert_str("Head of\nGrowth");
        assert_eq!(s.composer.prospect.job_title, "Head of Growth");

        s.focus = Field::Details;
        s.insert_str("line one\nline two");
        assert_eq!(s.composer.prospect.details, "line one\nline two");
    }

    #[test]
    fn test_new_error_notice_sets_indicator() {
        let mut s = state();
        assert!(!s.refresh_notices());

        // Empty details raises an error notice
        let _ = s.composer.begin_generate();
        assert!(s.refresh_notices());
        assert!(s.status.has_unacknowledged_error);
        assert_eq!(s.status.banner.as_ref().unwrap().title, "No Details Provided");
        assert!(!s.refresh_notices());

        s.acknowledge_error();
        assert!(!s.status.has_unacknowledged_error);
    }

    #[test]
    fn test_banner_updates_after_history_is_full() {
        use crate::constants::MAX_NOTICE_HISTORY;

        let mut s = state();
        for _ in 0..MAX_NOTICE_HISTORY {
            let _ = s.composer.copy_text();
        }
        assert!(s.refresh_notices());
        s.status.banner = None;

        let _ = s.composer.begin_analyze();
        assert!(s.refresh_notices());
        assert_eq!(s.status.banner.as_ref().unwrap().title, "Empty Email");
    }

    #[test]
    fn test_banner_expires_after_ttl() {
        let mut s = state();
        let _ = s.composer.begin_analyze();
        s.refresh_notices();

        let at = s.status.banner.as_ref().unwrap().at;
        assert!(!s.status.clear_if_expired(at));
        assert!(s.status.clear_if_expired(at + Duration::from_secs(ERROR_TTL_SECS)));
        assert!(s.status.banner.is_none());
    }

    #[test]
    fn test_subject_warnings() {
        let mut s = state();
        s.composer.draft.subject = "Quick question about Q3".into();
        assert_eq!(s.subject_warnings(), vec!["quick question"]);
    }
}
