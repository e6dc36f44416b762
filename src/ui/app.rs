use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use super::analysis::render_analysis;
use super::composer::{render_draft_pane, render_prospect_pane};
use super::status_bar::render_status_bar;
use super::widgets::{help_bar, notice_bar};
use crate::app::state::AppState;
use crate::constants::{ANALYSIS_PANEL_HEIGHT, MIN_SPLIT_VIEW_WIDTH, PROSPECT_PANE_PERCENT};
use crate::input::KeyBindings;

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Notice or help bar
        ])
        .split(frame.area());

    render_status_bar(frame, chunks[0], state);
    render_panes(frame, chunks[1], state);

    if let Some(ref notice) = state.status.banner {
        notice_bar(frame, chunks[2], notice);
    } else {
        help_bar(frame, chunks[2], &KeyBindings::new().help_entries());
    }
}

fn render_panes(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.width >= MIN_SPLIT_VIEW_WIDTH {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(PROSPECT_PANE_PERCENT),
                Constraint::Percentage(100 - PROSPECT_PANE_PERCENT),
            ])
            .split(area);

        render_prospect_pane(frame, columns[0], state);
        render_draft_column(frame, columns[1], state);
    } else {
        // Narrow terminal: stack everything
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        render_prospect_pane(frame, rows[0], state);
        render_draft_column(frame, rows[1], state);
    }
}

fn render_draft_column(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(ANALYSIS_PANEL_HEIGHT),
        ])
        .split(area);

    render_draft_pane(frame, rows[0], state);
    render_analysis(frame, rows[1], &state.composer);
}
