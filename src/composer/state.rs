//! Composer state record and its transition functions
//!
//! One owned record holds everything the composer shows: the prospect form,
//! the draft, the latest analysis, the per-path phases and the notifications.
//! Every user action or pipeline event goes through a method here.

use std::fmt;
use std::time::Instant;

use bitflags::bitflags;

use super::demo::DemoProspect;
use super::error::ComposerError;
use crate::constants::MAX_NOTICE_HISTORY;
use crate::ai::markup;
use crate::ai::{
    AiError, EffectivenessRequest, EffectivenessResult, EmailGenerationRequest,
    EmailGenerationResult, ProspectInsightRequest,
};

pub const DEFAULT_GOAL: &str = "Get a reply";

bitflags! {
    /// Runs currently in flight
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Busy: u8 {
        const GENERATING = 0b01;
        const ANALYZING = 0b10;
    }
}

/// A step that talks to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Summarize,
    Generate,
    Analyze,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Summarize => "prospect summary",
            PipelineStage::Generate => "email generation",
            PipelineStage::Analyze => "email analysis",
        };
        f.write_str(name)
    }
}

/// Generate path: Idle → Summarizing → Generating → Ready, or Failed at a stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratePhase {
    #[default]
    Idle,
    Summarizing,
    Generating,
    Ready,
    Failed(PipelineStage),
}

/// Analyze path: Idle → Analyzing → Ready | Failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyzePhase {
    #[default]
    Idle,
    Analyzing,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProspectForm {
    pub details: String,
    pub name: String,
    pub company: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub subject: String,
    pub body: String,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.subject.trim().is_empty() && self.body.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing notification
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub at: Instant,
}

/// Identifies one Generate run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunId(pub u64);

/// Everything a Generate run needs, captured when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTicket {
    pub run: RunId,
    pub insight: ProspectInsightRequest,
    /// Prospect identity; the context is filled from the summary
    pub identity: EmailGenerationRequest,
}

/// Everything an Analyze run needs, captured when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeTicket {
    /// Draft revision being analyzed
    pub revision: u64,
    pub request: EffectivenessRequest,
}

/// Progress reported by pipeline runs
#[derive(Debug, Clone)]
pub enum ComposerEvent {
    Summarized {
        run: RunId,
        summary: String,
    },
    EmailGenerated {
        run: RunId,
        email: EmailGenerationResult,
    },
    GenerateFailed {
        run: RunId,
        stage: PipelineStage,
        error: AiError,
    },
    Analyzed {
        revision: u64,
        result: EffectivenessResult,
    },
    AnalyzeFailed {
        revision: u64,
        error: AiError,
    },
}

#[derive(Debug, Clone)]
pub struct ComposerState {
    pub prospect: ProspectForm,
    pub draft: Draft,
    /// Hook extracted by the last successful summary of the current run
    pub hook: Option<String>,
    pub analysis: Option<EffectivenessResult>,
    pub generate: GeneratePhase,
    pub analyze: AnalyzePhase,
    pub busy: Busy,
    /// Goal handed to the rater
    pub goal: String,
    /// Most recent notices, oldest first, capped at `MAX_NOTICE_HISTORY`
    pub notices: Vec<Notice>,
    /// Notices raised since startup, including ones dropped from history
    raised: u64,
    run: RunId,
    /// Bumped whenever the draft is replaced wholesale
    revision: u64,
    /// Revision read by the analysis in flight
    analyzing: Option<u64>,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new(DEFAULT_GOAL)
    }
}

impl ComposerState {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            prospect: ProspectForm::default(),
            draft: Draft::default(),
            hook: None,
            analysis: None,
            generate: GeneratePhase::Idle,
            analyze: AnalyzePhase::Idle,
            busy: Busy::empty(),
            goal: goal.into(),
            notices: Vec::new(),
            raised: 0,
            run: RunId::default(),
            revision: 0,
            analyzing: None,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.busy.contains(Busy::GENERATING)
    }

    pub fn is_analyzing(&self) -> bool {
        self.busy.contains(Busy::ANALYZING)
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Total notices raised, including ones no longer kept in history
    pub fn notice_count(&self) -> u64 {
        self.raised
    }

    fn notify(&mut self, kind: NoticeKind, title: &str, description: impl Into<String>) {
        let notice = Notice {
            kind,
            title: title.to_string(),
            description: description.into(),
            at: Instant::now(),
        };
        match kind {
            NoticeKind::Success => tracing::info!("{}: {}", notice.title, notice.description),
            NoticeKind::Error => tracing::warn!("{}: {}", notice.title, notice.description),
        }
        if self.notices.len() >= MAX_NOTICE_HISTORY {
            self.notices.remove(0);
        }
        self.notices.push(notice);
        self.raised += 1;
    }

    fn clear_outputs(&mut self) {
        self.draft = Draft::default();
        self.hook = None;
        self.analysis = None;
        self.revision += 1;
    }

    /// Start a Generate run.
    ///
    /// Clears the draft, hook and analysis before any request is issued so a
    /// failed run never leaves half-updated output behind.
    pub fn begin_generate(&mut self) -> Result<GenerateTicket, ComposerError> {
        if self.is_generating() {
            return Err(ComposerError::Busy("email generation"));
        }

        if self.prospect.details.trim().is_empty() {
            self.notify(
                NoticeKind::Error,
                "No Details Provided",
                "Please paste some details about the prospect to generate an email.",
            );
            return Err(ComposerError::Validation(
                "prospect details are empty".to_string(),
            ));
        }

        self.run = RunId(self.run.0 + 1);
        self.clear_outputs();
        if self.analyze != AnalyzePhase::Analyzing {
            self.analyze = AnalyzePhase::Idle;
        }
        self.generate = GeneratePhase::Summarizing;
        self.busy.insert(Busy::GENERATING);

        tracing::debug!(run = self.run.0, "Generate run started");

        Ok(GenerateTicket {
            run: self.run,
            insight: ProspectInsightRequest {
                prospect_details: self.prospect.details.clone(),
            },
            identity: EmailGenerationRequest {
                prospect_name: self.prospect.name.clone(),
                prospect_company: self.prospect.company.clone(),
                prospect_job_title: self.prospect.job_title.clone(),
                email_context: String::new(),
            },
        })
    }

    /// Start an Analyze run on the current draft
    pub fn begin_analyze(&mut self) -> Result<AnalyzeTicket, ComposerError> {
        if self.is_analyzing() {
            return Err(ComposerError::Busy("email analysis"));
        }

        let body = markup::to_plain_text(&self.draft.body);
        if body.is_empty() {
            self.notify(
                NoticeKind::Error,
                "Empty Email",
                "Please write or generate an email before analyzing it.",
            );
            return Err(ComposerError::Validation("email body is empty".to_string()));
        }

        self.analysis = None;
        self.analyze = AnalyzePhase::Analyzing;
        self.busy.insert(Busy::ANALYZING);
        self.analyzing = Some(self.revision);

        tracing::debug!(revision = self.revision, "Analyze run started");

        Ok(AnalyzeTicket {
            revision: self.revision,
            request: EffectivenessRequest {
                email_content: format!("Subject: {}\n\n{}", self.draft.subject.trim(), body),
                target_audience: self.prospect.job_title.clone(),
                goal: self.goal.clone(),
            },
        })
    }

    /// Apply a pipeline event. Events from superseded runs are dropped.
    pub fn apply(&mut self, event: ComposerEvent) {
        match event {
            ComposerEvent::Summarized { run, summary } => {
                if self.is_stale_run(run) {
                    return;
                }
                self.hook = Some(summary);
                self.generate = GeneratePhase::Generating;
            }
            ComposerEvent::EmailGenerated { run, email } => {
                if self.is_stale_run(run) {
                    return;
                }
                self.draft = Draft {
                    subject: email.subject_line,
                    body: email.body,
                };
                self.revision += 1;
                self.generate = GeneratePhase::Ready;
                self.busy.remove(Busy::GENERATING);
                self.notify(
                    NoticeKind::Success,
                    "Email Generated",
                    "Your personalized email draft is ready.",
                );
            }
            ComposerEvent::GenerateFailed { run, stage, error } => {
                if self.is_stale_run(run) {
                    return;
                }
                tracing::warn!(run = run.0, %stage, "Generate run failed: {}", error);
                self.draft = Draft::default();
                self.generate = GeneratePhase::Failed(stage);
                self.busy.remove(Busy::GENERATING);
                self.notify(NoticeKind::Error, "Generation Failed", error.user_message());
            }
            ComposerEvent::Analyzed { revision, result } => {
                if self.is_stale_analysis(revision) {
                    return;
                }
                self.analysis = Some(result);
                self.analyze = AnalyzePhase::Ready;
                self.finish_analysis();
                self.notify(
                    NoticeKind::Success,
                    "Analysis Complete",
                    "Your email's effectiveness has been rated.",
                );
            }
            ComposerEvent::AnalyzeFailed { revision, error } => {
                if self.is_stale_analysis(revision) {
                    return;
                }
                tracing::warn!(revision, "Analyze run failed: {}", error);
                self.analyze = AnalyzePhase::Failed;
                self.finish_analysis();
                self.notify(NoticeKind::Error, "Analysis Failed", error.user_message());
            }
        }
    }

    fn is_stale_run(&self, run: RunId) -> bool {
        let stale = run != self.run;
        if stale {
            tracing::debug!(
                run = run.0,
                current = self.run.0,
                "Dropping result of superseded generate run"
            );
        }
        stale
    }

    fn finish_analysis(&mut self) {
        self.busy.remove(Busy::ANALYZING);
        self.analyzing = None;
    }

    /// An analysis is stale once the draft it read has been replaced.
    ///
    /// A stale result still ends its own run, but only if that run is the
    /// one in flight. After a reset a newer analysis may be running.
    fn is_stale_analysis(&mut self, revision: u64) -> bool {
        if revision == self.revision {
            return false;
        }
        tracing::debug!(
            revision,
            current = self.revision,
            "Dropping analysis of a replaced draft"
        );
        if self.analyzing == Some(revision) {
            self.finish_analysis();
            self.analyze = AnalyzePhase::Idle;
        }
        true
    }

    /// Fill the prospect form from a demo profile
    pub fn load_demo(&mut self, demo: &DemoProspect) -> Result<(), ComposerError> {
        if self.is_generating() {
            return Err(ComposerError::Busy("email generation"));
        }

        self.prospect = ProspectForm {
            details: demo.details.to_string(),
            name: demo.name.to_string(),
            company: demo.company.to_string(),
            job_title: demo.title.to_string(),
        };
        self.notify(
            NoticeKind::Success,
            "Demo Content Loaded",
            "Generate an email to see the AI in action.",
        );
        Ok(())
    }

    /// Plain-text rendition of the draft for copying
    pub fn copy_text(&mut self) -> Option<String> {
        if self.draft.is_empty() {
            self.notify(
                NoticeKind::Error,
                "Nothing to Copy",
                "Please generate or write an email first.",
            );
            return None;
        }
        Some(format!(
            "Subject: {}\n\n{}",
            self.draft.subject.trim(),
            markup::to_plain_text(&self.draft.body)
        ))
    }

    pub fn copied(&mut self, destination: &str) {
        self.notify(
            NoticeKind::Success,
            "Email Copied",
            format!("The subject and body were saved as plain text to {}", destination),
        );
    }

    pub fn copy_failed(&mut self, reason: &str) {
        self.notify(NoticeKind::Error, "Copy Failed", reason.to_string());
    }

    /// Clear every field and forget in-flight runs.
    ///
    /// Requests already sent keep running; their results are discarded on arrival.
    pub fn reset(&mut self) {
        self.prospect = ProspectForm::default();
        self.clear_outputs();
        self.run = RunId(self.run.0 + 1);
        self.generate = GeneratePhase::Idle;
        self.analyze = AnalyzePhase::Idle;
        self.busy = Busy::empty();
        self.analyzing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EngagementPredictions;

    fn with_details() -> ComposerState {
        let mut state = ComposerState::default();
        state.prospect = ProspectForm {
            details: "Sarah wrote about AI in marketing.".into(),
            name: "Sarah Chen".into(),
            company: "InnovateTech".into(),
            job_title: "VP of Marketing".into(),
        };
        state
    }

    fn email() -> EmailGenerationResult {
        EmailGenerationResult {
            subject_line: "Your AI post".into(),
            body: "Hi Sarah,\n\nLoved it.".into(),
        }
    }

    fn rating() -> EffectivenessResult {
        EffectivenessResult {
            effectiveness_score: 70.0,
            engagement_predictions: EngagementPredictions {
                open_rate: 40.0,
                click_through_rate: 5.0,
                conversion_rate: 2.0,
            },
            suggestions: vec!["Be brief.".into()],
        }
    }

    fn error_count(state: &ComposerState) -> usize {
        state
            .notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Error)
            .count()
    }

    #[test]
    fn test_generate_requires_details() {
        let mut state = ComposerState::default();
        let err = state.begin_generate().unwrap_err();

        assert!(matches!(err, ComposerError::Validation(_)));
        assert_eq!(state.latest_notice().unwrap().title, "No Details Provided");
        assert_eq!(state.generate, GeneratePhase::Idle);
        assert!(!state.is_generating());
    }

    #[test]
    fn test_begin_generate_clears_previous_outputs() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "Old".into(),
            body: "Old body".into(),
        };
        state.analysis = Some(rating());
        state.hook = Some("old hook".into());

        let ticket = state.begin_generate().unwrap();

        assert_eq!(state.draft, Draft::default());
        assert!(state.analysis.is_none());
        assert!(state.hook.is_none());
        assert_eq!(state.generate, GeneratePhase::Summarizing);
        assert!(state.is_generating());
        assert_eq!(ticket.insight.prospect_details, state.prospect.details);
        assert_eq!(ticket.identity.prospect_name, "Sarah Chen");
        assert!(ticket.identity.email_context.is_empty());
    }

    #[test]
    fn test_second_generate_while_in_flight_is_rejected() {
        let mut state = with_details();
        state.begin_generate().unwrap();
        assert_eq!(
            state.begin_generate().unwrap_err(),
            ComposerError::Busy("email generation")
        );
    }

    #[test]
    fn test_generate_success_path() {
        let mut state = with_details();
        let ticket = state.begin_generate().unwrap();

        state.apply(ComposerEvent::Summarized {
            run: ticket.run,
            summary: "hook".into(),
        });
        assert_eq!(state.generate, GeneratePhase::Generating);
        assert_eq!(state.hook.as_deref(), Some("hook"));

        state.apply(ComposerEvent::EmailGenerated {
            run: ticket.run,
            email: email(),
        });
        assert_eq!(state.generate, GeneratePhase::Ready);
        assert_eq!(state.draft.subject, "Your AI post");
        assert!(!state.is_generating());
        assert_eq!(state.latest_notice().unwrap().title, "Email Generated");
    }

    #[test]
    fn test_generate_failure_clears_draft_and_notifies_once() {
        let mut state = with_details();
        let ticket = state.begin_generate().unwrap();

        state.apply(ComposerEvent::GenerateFailed {
            run: ticket.run,
            stage: PipelineStage::Summarize,
            error: AiError::ServiceUnavailable { flow: "summarize" },
        });

        assert_eq!(state.generate, GeneratePhase::Failed(PipelineStage::Summarize));
        assert_eq!(state.draft, Draft::default());
        assert!(!state.is_generating());
        assert_eq!(error_count(&state), 1);
        let notice = state.latest_notice().unwrap();
        assert_eq!(notice.title, "Generation Failed");
        assert!(notice.description.contains("try again later"));
    }

    #[test]
    fn test_analyze_requires_body() {
        let mut state = with_details();
        state.draft.subject = "Subject only".into();

        let err = state.begin_analyze().unwrap_err();
        assert!(matches!(err, ComposerError::Validation(_)));
        assert_eq!(state.latest_notice().unwrap().title, "Empty Email");
        assert!(!state.is_analyzing());
    }

    #[test]
    fn test_analyze_request_contents() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "Your AI post".into(),
            body: "<p>Hi <b>Sarah</b></p>".into(),
        };

        let ticket = state.begin_analyze().unwrap();
        let request = ticket.request;
        assert!(request.email_content.starts_with("Subject: Your AI post\n\n"));
        assert!(request.email_content.contains("Sarah"));
        assert!(!request.email_content.contains("<b>"));
        assert_eq!(request.target_audience, "VP of Marketing");
        assert_eq!(request.goal, DEFAULT_GOAL);
        assert_eq!(state.analyze, AnalyzePhase::Analyzing);
    }

    #[test]
    fn test_analyze_failure_keeps_draft() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "S".into(),
            body: "B".into(),
        };
        let ticket = state.begin_analyze().unwrap();

        state.apply(ComposerEvent::AnalyzeFailed {
            revision: ticket.revision,
            error: AiError::Generation { flow: "rate" },
        });

        assert_eq!(state.analyze, AnalyzePhase::Failed);
        assert_eq!(state.draft.body, "B");
        assert!(!state.is_analyzing());
        assert_eq!(state.latest_notice().unwrap().title, "Analysis Failed");
    }

    #[test]
    fn test_generate_and_analyze_run_side_by_side() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "S".into(),
            body: "B".into(),
        };
        let analyze = state.begin_analyze().unwrap();
        let generate = state.begin_generate().unwrap();
        assert!(state.is_analyzing());
        assert!(state.is_generating());

        // The analyzed draft was replaced by the restart, so its result is dropped
        state.apply(ComposerEvent::Analyzed {
            revision: analyze.revision,
            result: rating(),
        });
        assert!(state.analysis.is_none());
        assert!(!state.is_analyzing());
        assert_eq!(state.analyze, AnalyzePhase::Idle);

        state.apply(ComposerEvent::EmailGenerated {
            run: generate.run,
            email: email(),
        });
        assert_eq!(state.generate, GeneratePhase::Ready);
    }

    #[test]
    fn test_results_after_reset_are_discarded() {
        let mut state = with_details();
        let ticket = state.begin_generate().unwrap();
        state.reset();

        state.apply(ComposerEvent::EmailGenerated {
            run: ticket.run,
            email: email(),
        });

        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.generate, GeneratePhase::Idle);
        assert!(state.prospect.details.is_empty());
    }

    #[test]
    fn test_stale_analysis_after_reset_keeps_new_run_guarded() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "S".into(),
            body: "First draft".into(),
        };
        let old = state.begin_analyze().unwrap();

        state.reset();
        state.draft.body = "Second draft".into();
        let current = state.begin_analyze().unwrap();
        assert_ne!(old.revision, current.revision);

        state.apply(ComposerEvent::Analyzed {
            revision: old.revision,
            result: rating(),
        });
        assert!(state.analysis.is_none());
        assert!(state.is_analyzing());
        assert_eq!(state.analyze, AnalyzePhase::Analyzing);
        assert_eq!(
            state.begin_analyze().unwrap_err(),
            ComposerError::Busy("email analysis")
        );

        state.apply(ComposerEvent::AnalyzeFailed {
            revision: old.revision,
            error: AiError::ServiceUnavailable { flow: "rate" },
        });
        assert!(state.is_analyzing());
        assert_eq!(error_count(&state), 0);

        state.apply(ComposerEvent::Analyzed {
            revision: current.revision,
            result: rating(),
        });
        assert!(!state.is_analyzing());
        assert_eq!(state.analyze, AnalyzePhase::Ready);
        assert!(state.analysis.is_some());
    }

    #[test]
    fn test_notice_history_is_capped() {
        let mut state = ComposerState::default();
        for _ in 0..MAX_NOTICE_HISTORY + 5 {
            assert!(state.copy_text().is_none());
        }

        assert_eq!(state.notices.len(), MAX_NOTICE_HISTORY);
        assert_eq!(state.notice_count(), (MAX_NOTICE_HISTORY + 5) as u64);
        assert_eq!(state.latest_notice().unwrap().title, "Nothing to Copy");
    }

    #[test]
    fn test_analysis_replaces_previous_wholesale() {
        let mut state = with_details();
        state.draft = Draft {
            subject: "S".into(),
            body: "B".into(),
        };
        let ticket = state.begin_analyze().unwrap();
        state.apply(ComposerEvent::Analyzed {
            revision: ticket.revision,
            result: rating(),
        });
        assert_eq!(state.analysis.as_ref().unwrap().suggestions, vec!["Be brief."]);

        let ticket = state.begin_analyze().unwrap();
        assert!(state.analysis.is_none());
        let mut second = rating();
        second.suggestions = vec!["Cut the last line.".into()];
        state.apply(ComposerEvent::Analyzed {
            revision: ticket.revision,
            result: second,
        });
        assert_eq!(
            state.analysis.as_ref().unwrap().suggestions,
            vec!["Cut the last line."]
        );
    }

    #[test]
    fn test_copy_text() {
        let mut state = ComposerState::default();
        assert!(state.copy_text().is_none());
        assert_eq!(state.latest_notice().unwrap().title, "Nothing to Copy");

        state.draft = Draft {
            subject: "Hello".into(),
            body: "Line one\n\nLine two".into(),
        };
        assert_eq!(
            state.copy_text().unwrap(),
            "Subject: Hello\n\nLine one\n\nLine two"
        );
    }

    #[test]
    fn test_demo_blocked_while_generating() {
        let mut state = with_details();
        state.begin_generate().unwrap();
        let demo = &crate::composer::demo::DEMO_PROSPECTS[0];
        assert!(state.load_demo(demo).is_err());
        assert_eq!(state.prospect.name, "Sarah Chen");
    }
}
