//! Effectiveness analysis panel

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use super::widgets::sanitize_text;
use crate::ai::EffectivenessResult;
use crate::composer::{AnalyzePhase, ComposerState};
use crate::constants::MAX_DISPLAYED_SUGGESTIONS;

/// Formatted panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView<'a> {
    pub score: u8,
    pub open_rate: String,
    pub click_through_rate: String,
    pub conversion_rate: String,
    pub suggestions: &'a [String],
}

impl<'a> AnalysisView<'a> {
    pub fn new(result: &'a EffectivenessResult) -> Self {
        let p = &result.engagement_predictions;
        Self {
            score: result.display_score(),
            open_rate: format!("{:.1}%", p.open_rate),
            click_through_rate: format!("{:.1}%", p.click_through_rate),
            conversion_rate: format!("{:.1}%", p.conversion_rate),
            suggestions: result.top_suggestions(MAX_DISPLAYED_SUGGESTIONS),
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Effectiveness ", Theme::label()),
                Span::styled(self.score.to_string(), Theme::score(self.score)),
                Span::styled(" out of 100", Theme::text_muted()),
            ]),
            Line::from(vec![
                Span::styled("Open ", Theme::label()),
                Span::styled(self.open_rate.clone(), Theme::text_accent()),
                Span::styled("   Click-through ", Theme::label()),
                Span::styled(self.click_through_rate.clone(), Theme::text_accent()),
                Span::styled("   Conversion ", Theme::label()),
                Span::styled(self.conversion_rate.clone(), Theme::text_accent()),
            ]),
        ];

        if !self.suggestions.is_empty() {
            lines.push(Line::from(Span::styled("Suggestions", Theme::label())));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!(" {}. ", i + 1), Theme::text_accent()),
                    Span::styled(sanitize_text(suggestion), Theme::text()),
                ]));
            }
        }
        lines
    }
}

pub fn render_analysis(frame: &mut Frame, area: Rect, composer: &ComposerState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(" Analysis ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match (&composer.analysis, composer.analyze) {
        (Some(result), _) => AnalysisView::new(result).lines(),
        (None, AnalyzePhase::Analyzing) => {
            vec![Line::from(Span::styled("Rating your email...", Theme::text_muted()))]
        }
        (None, AnalyzePhase::Failed) => vec![Line::from(Span::styled(
            "Analysis failed. Press Ctrl+A to try again.",
            Theme::text_warning(),
        ))],
        (None, _) => vec![Line::from(Span::styled(
            "Press Ctrl+A to rate the draft against your goal.",
            Theme::text_muted(),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
