mod analysis;
pub mod app;
mod composer;
mod status_bar;
pub mod theme;
mod widgets;

pub use app::render;
