//! Non-interactive `generate` and `analyze` commands

use anyhow::{Result, bail};
use std::fmt::Write as _;

use crate::ai::{ComposerAi, EffectivenessResult};
use crate::composer::{Composer, ComposerState, demo};
use crate::constants::MAX_DISPLAYED_SUGGESTIONS;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    pub name: String,
    pub company: String,
    pub title: String,
    pub demo: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AnalyzeArgs {
    pub audience: Option<String>,
    pub goal: Option<String>,
}

fn flag_value<'a>(flag: &str, iter: &mut impl Iterator<Item = &'a String>) -> Result<String> {
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value.clone()),
        _ => bail!("Missing value for {}", flag),
    }
}

impl GenerateArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--name" => parsed.name = flag_value(arg, &mut iter)?,
                "--company" => parsed.company = flag_value(arg, &mut iter)?,
                "--title" => parsed.title = flag_value(arg, &mut iter)?,
                "--demo" => parsed.demo = true,
                other => bail!("Unknown option for generate: {}", other),
            }
        }
        Ok(parsed)
    }
}

impl AnalyzeArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--audience" => parsed.audience = Some(flag_value(arg, &mut iter)?),
                "--goal" => parsed.goal = Some(flag_value(arg, &mut iter)?),
                other => bail!("Unknown option for analyze: {}", other),
            }
        }
        Ok(parsed)
    }
}

/// Split piped email text into subject and body.
///
/// A leading `Subject:` line (case-insensitive) becomes the subject; the
/// blank lines after it are dropped.
pub fn split_email(input: &str) -> (String, String) {
    let input = input.trim_start_matches('\u{feff}');
    let (first, rest) = input.split_once('\n').unwrap_or((input, ""));
    let first = first.trim_end_matches('\r');

    match first.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("subject:") => (
            first[8..].trim().to_string(),
            rest.trim_start_matches(['\r', '\n']).trim_end().to_string(),
        ),
        _ => (String::new(), input.trim().to_string()),
    }
}

/// Fill the prospect form and run the Generate pipeline
pub async fn generate<A: ComposerAi>(
    composer: &mut Composer<A>,
    args: &GenerateArgs,
    details: &str,
) -> Result<(), String> {
    if args.demo {
        composer
            .load_demo(demo::random_prospect())
            .map_err(|_| notice_text(composer.state()))?;
    } else {
        let prospect = &mut composer.state_mut().prospect;
        prospect.details = details.to_string();
        prospect.name = args.name.clone();
        prospect.company = args.company.clone();
        prospect.job_title = args.title.clone();
    }

    composer
        .generate()
        .await
        .map_err(|_| notice_text(composer.state()))
}

/// Load the piped draft and run the Rater on it
pub async fn analyze<A: ComposerAi>(
    composer: &mut Composer<A>,
    args: &AnalyzeArgs,
    email: &str,
) -> Result<EffectivenessResult, String> {
    let (subject, body) = split_email(email);
    let state = composer.state_mut();
    state.draft.subject = subject;
    state.draft.body = body;
    if let Some(ref audience) = args.audience {
        state.prospect.job_title = audience.clone();
    }
    if let Some(ref goal) = args.goal {
        state.goal = goal.clone();
    }

    composer
        .analyze()
        .await
        .map_err(|_| notice_text(composer.state()))?;

    composer
        .state()
        .analysis
        .clone()
        .ok_or_else(|| notice_text(composer.state()))
}

/// The latest notification as "Title: description"
pub fn notice_text(state: &ComposerState) -> String {
    match state.latest_notice() {
        Some(notice) => format!("{}: {}", notice.title, notice.description),
        None => "Something went wrong. Please try again.".to_string(),
    }
}

pub fn format_draft(state: &ComposerState) -> String {
    format!(
        "Subject: {}\n\n{}\n",
        state.draft.subject,
        state.draft.body.trim_end()
    )
}

pub fn format_analysis(result: &EffectivenessResult) -> String {
    let p = &result.engagement_predictions;
    let mut out = String::new();
    let _ = writeln!(out, "Effectiveness: {} out of 100", result.display_score());
    let _ = writeln!(out, "Open rate: {:.1}%", p.open_rate);
    let _ = writeln!(out, "Click-through rate: {:.1}%", p.click_through_rate);
    let _ = writeln!(out, "Conversion rate: {:.1}%", p.conversion_rate);

    let suggestions = result.top_suggestions(MAX_DISPLAYED_SUGGESTIONS);
    if !suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggestions:");
        for (i, suggestion) in suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, suggestion);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EngagementPredictions;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_generate_args() {
        let parsed =
            GenerateArgs::parse(&args(&["--name", "Sarah", "--title", "VP Sales", "--demo"]))
                .unwrap();
        assert_eq!(parsed.name, "Sarah");
        assert_eq!(parsed.title, "VP Sales");
        assert!(parsed.company.is_empty());
        assert!(parsed.demo);

        assert!(GenerateArgs::parse(&args(&["--name"])).is_err());
        assert!(GenerateArgs::parse(&args(&["--name", "--demo"])).is_err());
        assert!(GenerateArgs::parse(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_parse_analyze_args() {
        let parsed = AnalyzeArgs::parse(&args(&["--goal", "Book a demo"])).unwrap();
        assert_eq!(parsed.goal.as_deref(), Some("Book a demo"));
        assert_eq!(parsed.audience, None);
    }

    #[test]
    fn test_split_email_with_subject_line() {
        let (subject, body) = split_email("subject: Your Q3 launch\r\n\r\nHi Sarah,\n\nBest\n");
        assert_eq!(subject, "Your Q3 launch");
        assert_eq!(body, "Hi Sarah,\n\nBest");
    }

    #[test]
    fn test_split_email_without_subject_line() {
        let (subject, body) = split_email("\nHi Sarah,\nBest\n");
        assert_eq!(subject, "");
        assert_eq!(body, "Hi Sarah,\nBest");

        let (subject, body) = split_email("Subject: only a subject");
        assert_eq!(subject, "only a subject");
        assert_eq!(body, "");
    }

    #[test]
    fn test_format_analysis_limits_suggestions() {
        let result = EffectivenessResult {
            effectiveness_score: 81.6,
            engagement_predictions: EngagementPredictions {
                open_rate: 40.0,
                click_through_rate: 6.44,
                conversion_rate: 1.5,
            },
            suggestions: args(&["a", "b", "c", "d"]),
        };

        let text = format_analysis(&result);
        assert!(text.starts_with("Effectiveness: 82 out of 100\n"));
        assert!(text.contains("Click-through rate: 6.4%"));
        assert!(text.contains("  3. c"));
        assert!(!text.contains("  4. d"));
    }

    #[test]
    fn test_notice_text_falls_back_without_notices() {
        let mut state = ComposerState::default();
        assert!(notice_text(&state).contains("try again"));

        let _ = state.begin_analyze();
        assert_eq!(
            notice_text(&state),
            "Empty Email: Please write or generate an email before analyzing it."
        );
    }
}
