//! Application-wide constants for tuning and configuration

/// Error notice display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Success notice display duration in seconds.
pub const SUCCESS_TTL_SECS: u64 = 3;

/// Composer notices kept in history; older ones are dropped.
pub const MAX_NOTICE_HISTORY: usize = 32;

/// Number of rater suggestions shown in the analysis panel.
pub const MAX_DISPLAYED_SUGGESTIONS: usize = 3;

/// Event poll timeout for the main loop in milliseconds.
pub const EVENT_POLL_MS: u64 = 50;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;

/// Minimum terminal width to show the prospect and draft panes side by side.
pub const MIN_SPLIT_VIEW_WIDTH: u16 = 100;

/// Width of the prospect column as a percentage in split view.
pub const PROSPECT_PANE_PERCENT: u16 = 40;

/// Height of the analysis panel in lines.
pub const ANALYSIS_PANEL_HEIGHT: u16 = 9;
