use crate::logging::format::Formatter;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

mod format;

const CRATE_TARGET: &str = "planti";

fn is_own_target(target: &str) -> bool {
    target == CRATE_TARGET || target.starts_with("planti::")
}

/// Installs the global subscriber.
///
/// Events of this crate go to `file` when configured, to stdout otherwise,
/// filtered by `level`. Dependencies only log at INFO and above on stdout.
pub fn registry_logs(level: Level, file: Option<PathBuf>) -> anyhow::Result<()> {
    let mut layers = Vec::new();
    match file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(Formatter::new(false))
                .with_writer(Mutex::new(file))
                .with_filter(filter::filter_fn(move |metadata| {
                    is_own_target(metadata.target()) && metadata.level() <= &level
                }));
            layers.push(file_layer.boxed());
        }
        None => {
            let stdio_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(Formatter::new(true))
                .with_filter(filter::filter_fn(move |metadata| {
                    is_own_target(metadata.target()) && metadata.level() <= &level
                }));
            layers.push(stdio_layer.boxed());
        }
    }
    // general_layer
    {
        let general_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(Formatter::new(true))
            .with_filter(filter::filter_fn(|metadata| {
                !is_own_target(metadata.target()) && metadata.level() <= &Level::INFO
            }));
        layers.push(general_layer.boxed());
    }
    tracing_subscriber::registry()
        .with(layers)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_own_target() {
        assert!(is_own_target("planti"));
        assert!(is_own_target("planti::services::photo"));
        assert!(!is_own_target("planti_other"));
        assert!(!is_own_target("tower_http::trace"));
    }
}
