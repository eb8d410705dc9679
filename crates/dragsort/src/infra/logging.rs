//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;

use crate::infra::config::Logging;

/// Install a stderr `fmt` subscriber at the configured level.
///
/// Installing twice is not an error; the first subscriber stays in place.
pub fn init(settings: &Logging) -> Result<()> {
    let level = parse_level(&settings.level())?;
    if tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .with_context(|| format!("invalid log level '{level}'"))
}
