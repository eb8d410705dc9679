pub mod app;
pub mod domain;
pub mod infra;

pub use app::dom::{Dom, ElementTree};
pub use app::emitter::ReorderSink;
pub use app::engine::DragSort;
pub use app::session::{Ignored, OverlapPolicy, Transition};
pub use domain::model::{ElementId, Group, ItemRef, ListId, ListOptions, ReorderInstruction};
pub use domain::selector::Selector;

/// Install logging as configured.
pub fn init(config: &infra::config::Config) -> anyhow::Result<()> {
    infra::logging::init(&config.logging)
}
