use std::sync::Arc;

use super::demo::DemoProspect;
use super::error::ComposerError;
use super::pipeline;
use super::state::ComposerState;
use crate::ai::ComposerAi;

/// Runs composer actions to completion in the caller's task.
///
/// The CLI uses this directly. The TUI keeps its own [`ComposerState`] and
/// hands tickets to the AI actor instead, so both go through the same
/// transition functions.
pub struct Composer<A> {
    ai: Arc<A>,
    state: ComposerState,
}

impl<A: ComposerAi> Composer<A> {
    pub fn new(ai: Arc<A>, goal: impl Into<String>) -> Self {
        Self {
            ai,
            state: ComposerState::new(goal),
        }
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ComposerState {
        &mut self.state
    }

    /// Summarize the prospect research and write a draft from it
    pub async fn generate(&mut self) -> Result<(), ComposerError> {
        let ticket = self.state.begin_generate()?;
        let state = &mut self.state;
        pipeline::run_generate(self.ai.as_ref(), ticket, |event| state.apply(event)).await
    }

    /// Rate the current draft
    pub async fn analyze(&mut self) -> Result<(), ComposerError> {
        let ticket = self.state.begin_analyze()?;
        let state = &mut self.state;
        pipeline::run_analyze(self.ai.as_ref(), ticket, |event| state.apply(event)).await
    }

    pub fn load_demo(&mut self, demo: &DemoProspect) -> Result<(), ComposerError> {
        self.state.load_demo(demo)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ai::{
        AiError, EffectivenessRequest, EffectivenessResult, EmailGenerationRequest,
        EmailGenerationResult, EngagementPredictions, ProspectInsightRequest,
        ProspectInsightResult,
    };
    use crate::composer::state::{AnalyzePhase, Draft, GeneratePhase, NoticeKind, PipelineStage};

    /// Test double recording every call it receives
    #[derive(Default)]
    struct FakeAi {
        summaries: Mutex<Vec<Result<String, AiError>>>,
        emails: Mutex<Vec<Result<EmailGenerationResult, AiError>>>,
        ratings: Mutex<Vec<Result<EffectivenessResult, AiError>>>,
        summarize_calls: Mutex<Vec<ProspectInsightRequest>>,
        generate_calls: Mutex<Vec<EmailGenerationRequest>>,
        rate_calls: Mutex<Vec<EffectivenessRequest>>,
    }

    impl FakeAi {
        fn summary(self, result: Result<&str, AiError>) -> Self {
            self.summaries
                .lock()
                .unwrap()
                .push(result.map(str::to_string));
            self
        }

        fn email(self, result: Result<EmailGenerationResult, AiError>) -> Self {
            self.emails.lock().unwrap().push(result);
            self
        }

        fn rating(self, result: Result<EffectivenessResult, AiError>) -> Self {
            self.ratings.lock().unwrap().push(result);
            self
        }
    }

    fn take<T>(queue: &Mutex<Vec<Result<T, AiError>>>, flow: &'static str) -> Result<T, AiError> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            return Err(AiError::ServiceUnavailable { flow });
        }
        queue.remove(0)
    }

    impl ComposerAi for FakeAi {
        async fn summarize_prospect(
            &self,
            request: &ProspectInsightRequest,
        ) -> Result<ProspectInsightResult, AiError> {
            self.summarize_calls.lock().unwrap().push(request.clone());
            take(&self.summaries, "summarize").map(|summary| ProspectInsightResult { summary })
        }

        async fn generate_email(
            &self,
            request: &EmailGenerationRequest,
        ) -> Result<EmailGenerationResult, AiError> {
            self.generate_calls.lock().unwrap().push(request.clone());
            take(&self.emails, "generate")
        }

        async fn rate_email(
            &self,
            request: &EffectivenessRequest,
        ) -> Result<EffectivenessResult, AiError> {
            self.rate_calls.lock().unwrap().push(request.clone());
            take(&self.ratings, "rate")
        }
    }

    fn email() -> EmailGenerationResult {
        EmailGenerationResult {
            subject_line: "Your post on AI in marketing".into(),
            body: "Hi Sarah,\n\nYour post stuck with me.\n\nIs this a priority right now?".into(),
        }
    }

    fn rating(score: f64) -> EffectivenessResult {
        EffectivenessResult {
            effectiveness_score: score,
            engagement_predictions: EngagementPredictions {
                open_rate: 45.0,
                click_through_rate: 8.5,
                conversion_rate: 2.5,
            },
            suggestions: vec!["Shorten the opener.".into()],
        }
    }

    fn composer(ai: FakeAi) -> (Composer<FakeAi>, Arc<FakeAi>) {
        let ai = Arc::new(ai);
        let mut composer = Composer::new(ai.clone(), "Get a reply");
        let demo = &crate::composer::demo::DEMO_PROSPECTS[0];
        composer.load_demo(demo).unwrap();
        (composer, ai)
    }

    fn error_notices(composer: &Composer<FakeAi>) -> usize {
        composer
            .state()
            .notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Error)
            .count()
    }

    #[tokio::test]
    async fn test_generator_receives_the_summary_of_the_same_run() {
        let (mut composer, ai) = composer(
            FakeAi::default()
                .summary(Ok("First hook."))
                .email(Ok(email()))
                .summary(Ok("Second hook."))
                .email(Ok(email())),
        );

        composer.generate().await.unwrap();
        composer.generate().await.unwrap();

        let calls = ai.generate_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].email_context, "First hook.");
        assert_eq!(calls[1].email_context, "Second hook.");
        assert_eq!(calls[1].prospect_name, "Sarah Chen");
        assert_eq!(calls[1].prospect_job_title, "VP of Marketing");
    }

    #[tokio::test]
    async fn test_successful_generate_fills_draft() {
        let (mut composer, _ai) =
            composer(FakeAi::default().summary(Ok("Hook.")).email(Ok(email())));

        composer.generate().await.unwrap();

        let state = composer.state();
        assert_eq!(state.generate, GeneratePhase::Ready);
        assert!(!state.draft.subject.is_empty());
        assert!(!state.draft.body.is_empty());
        assert_eq!(state.hook.as_deref(), Some("Hook."));
        assert_eq!(state.latest_notice().unwrap().title, "Email Generated");
    }

    #[tokio::test]
    async fn test_summarizer_failure_never_reaches_generator() {
        let (mut composer, ai) = composer(
            FakeAi::default()
                .summary(Err(AiError::ServiceUnavailable { flow: "summarize" }))
                .email(Ok(email())),
        );
        composer.state_mut().draft = Draft {
            subject: "Stale".into(),
            body: "Stale body".into(),
        };

        let err = composer.generate().await.unwrap_err();

        assert!(matches!(
            err,
            ComposerError::Stage {
                stage: PipelineStage::Summarize,
                ..
            }
        ));
        assert!(ai.generate_calls.lock().unwrap().is_empty());
        let state = composer.state();
        assert_eq!(state.draft.subject, "");
        assert_eq!(state.draft.body, "");
        assert_eq!(state.generate, GeneratePhase::Failed(PipelineStage::Summarize));
        assert_eq!(error_notices(&composer), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_after_summary() {
        let (mut composer, _ai) = composer(
            FakeAi::default()
                .summary(Ok("Hook."))
                .email(Err(AiError::Generation { flow: "generate" })),
        );

        let err = composer.generate().await.unwrap_err();

        assert!(matches!(
            err,
            ComposerError::Stage {
                stage: PipelineStage::Generate,
                ..
            }
        ));
        let state = composer.state();
        assert_eq!(state.generate, GeneratePhase::Failed(PipelineStage::Generate));
        assert!(state.draft.is_empty());
        assert_eq!(state.latest_notice().unwrap().title, "Generation Failed");
    }

    #[tokio::test]
    async fn test_restart_clears_previous_results_before_new_run() {
        let (mut composer, ai) = composer(
            FakeAi::default()
                .summary(Ok("Hook."))
                .email(Ok(email()))
                .rating(Ok(rating(72.0)))
                .summary(Err(AiError::Generation { flow: "summarize" })),
        );
        composer.generate().await.unwrap();
        composer.analyze().await.unwrap();
        assert!(composer.state().analysis.is_some());

        let _ = composer.generate().await;

        let state = composer.state();
        assert!(state.draft.is_empty());
        assert!(state.analysis.is_none());
        assert!(state.hook.is_none());
        assert_eq!(ai.summarize_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_with_empty_body_never_calls_rater() {
        let (mut composer, ai) = composer(FakeAi::default().rating(Ok(rating(50.0))));
        composer.state_mut().draft.subject = "Only a subject".into();

        let err = composer.analyze().await.unwrap_err();

        assert!(matches!(err, ComposerError::Validation(_)));
        assert!(ai.rate_calls.lock().unwrap().is_empty());
        assert_eq!(composer.state().latest_notice().unwrap().title, "Empty Email");
        assert_eq!(composer.state().analyze, AnalyzePhase::Idle);
    }

    #[tokio::test]
    async fn test_generate_with_empty_details_never_calls_ai() {
        let ai = Arc::new(FakeAi::default());
        let mut composer = Composer::new(ai.clone(), "Get a reply");

        let err = composer.generate().await.unwrap_err();

        assert!(matches!(err, ComposerError::Validation(_)));
        assert!(ai.summarize_calls.lock().unwrap().is_empty());
        assert_eq!(
            composer.state().latest_notice().unwrap().title,
            "No Details Provided"
        );
    }

    #[tokio::test]
    async fn test_analyze_failure_leaves_draft_untouched() {
        let (mut composer, ai) = composer(
            FakeAi::default()
                .summary(Ok("Hook."))
                .email(Ok(email()))
                .rating(Err(AiError::ServiceUnavailable { flow: "rate" })),
        );
        composer.generate().await.unwrap();
        let draft = composer.state().draft.clone();

        assert!(composer.analyze().await.is_err());

        let state = composer.state();
        assert_eq!(state.draft, draft);
        assert_eq!(state.analyze, AnalyzePhase::Failed);
        assert_eq!(state.generate, GeneratePhase::Ready);
        let request = &ai.rate_calls.lock().unwrap()[0];
        assert!(request.email_content.starts_with("Subject: Your post on AI in marketing"));
        assert_eq!(request.target_audience, "VP of Marketing");
        assert_eq!(request.goal, "Get a reply");
    }

    #[tokio::test]
    async fn test_analysis_result_is_stored() {
        let (mut composer, _ai) = composer(
            FakeAi::default()
                .summary(Ok("Hook."))
                .email(Ok(email()))
                .rating(Ok(rating(81.0))),
        );
        composer.generate().await.unwrap();
        composer.analyze().await.unwrap();

        let analysis = composer.state().analysis.as_ref().unwrap();
        assert_eq!(analysis.effectiveness_score, 81.0);
        assert_eq!(composer.state().latest_notice().unwrap().title, "Analysis Complete");
    }

    #[tokio::test]
    async fn test_no_automatic_retry() {
        let (mut composer, ai) = composer(
            FakeAi::default().summary(Err(AiError::ServiceUnavailable { flow: "summarize" })),
        );

        let _ = composer.generate().await;

        assert_eq!(ai.summarize_calls.lock().unwrap().len(), 1);
        assert!(!composer.state().is_generating());
    }
}
