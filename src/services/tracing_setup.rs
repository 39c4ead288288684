//! Tracing subscriber setup
//!
//! Everything is logged to a file; the terminal belongs to the picker and
//! the package manager.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, `info` when unset or invalid.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `log_file_path`.
///
/// Returns false if the file cannot be created or a subscriber is already set.
pub fn init_global(log_file_path: &Path) -> bool {
    if let Some(parent) = log_file_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };
    build_subscriber(log_file, default_filter()).try_init().is_ok()
}

/// Subscriber writing plain-text events from `filter` to `log_file`.
pub fn build_subscriber(
    log_file: File,
    filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_events_reach_log_file() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Detected pnpm");
            tracing::debug!("hidden detail");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("Detected pnpm"));
        assert!(!contents.contains("hidden detail"));
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn test_filter_directive_enables_debug() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), EnvFilter::new("debug"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("cursor moved");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("cursor moved"));
    }
}
