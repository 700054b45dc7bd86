use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Crates that log far too much below `WARN`
const NOISY_TARGETS: [&str; 5] = ["wgpu", "naga", "cosmic_text", "iced_wgpu", "winit"];

/// Install the global subscriber: console always, `log_file` when given
pub fn init_logging(level: Level, log_file: Option<&Path>) -> Result<()> {
    let mut filter = Targets::new().with_default(LevelFilter::from_level(level));
    for target in NOISY_TARGETS {
        filter = filter.with_target(target, LevelFilter::WARN);
    }

    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_timer(fmt::time::ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_filter(filter.clone());

    let file_layer = match log_file {
        Some(path) => {
            let file_writer = OpenOptions::new().append(true).create(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_timer(fmt::time::ChronoLocal::new(TIME_FORMAT.to_string()))
                    .with_filter(filter),
            )
        }
        None => None,
    };

    let subscriber = registry().with(console_layer).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
