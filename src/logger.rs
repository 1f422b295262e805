use std::{path::Path, sync::OnceLock};
use tracing_subscriber::{EnvFilter, fmt};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

// RUST_LOG wins when set; otherwise fall back to the caller's string.
fn resolve_filter(fallback: &str) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize file logging once for the whole process.
/// - `path`: e.g., "logs/assay.log"
/// - `filter`: e.g., "assay::params=debug,assay::eval=trace"
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) {
    INIT.get_or_init(|| {
        let path = path.as_ref();

        // Ensure directory exists
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        // Non-blocking writer appending to a single file
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("open log file");

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        // Keep the guard alive for the program lifetime
        let _ = GUARD.set(guard);

        let subscriber = fmt()
            .with_env_filter(resolve_filter(filter))
            .with_ansi(false) // plain text in files
            .with_target(true) // show module e.g. assay::params
            .with_file(true)
            .with_line_number(true)
            .with_writer(non_blocking)
            .finish();

        // Ignore error if someone already set a global subscriber
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
