//! The composer: prospect form, draft, analysis and the runs that fill them

pub mod demo;
mod error;
pub mod export;
mod orchestrator;
pub mod pipeline;
mod state;

pub use error::ComposerError;
pub use orchestrator::Composer;
pub use state::{
    AnalyzePhase, AnalyzeTicket, Busy, ComposerEvent, ComposerState, DEFAULT_GOAL, Draft,
    GeneratePhase, GenerateTicket, Notice, NoticeKind, PipelineStage, ProspectForm, RunId,
};
