//! Logging infrastructure.
//!
//! Structured logging with file and console output:
//! - Writes to `logs/kolejka.log` (cleared on startup)
//! - Console output goes to stderr so stdout stays clean for rendered
//!   tables
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging.
///
/// Creates the log directory if needed, clears the previous log file,
/// and sets up output to both the file and stderr. `default_filter` is
/// the directive used when RUST_LOG is not set (for example `"info"` or
/// `"kolejka=debug"`).
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log
/// file cannot be cleared.
pub fn init_logging(
    log_dir: &str,
    log_file: &str,
    default_filter: &str,
) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Clear the previous log file; handles both existing and missing files
    let log_path = Path::new(log_dir).join(log_file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .compact();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Get default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "kolejka.log"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_dir(), "logs");
        assert_eq!(default_log_file(), "kolejka.log");
    }

    #[test]
    fn test_creates_directory_and_file() {
        // Can't exercise init_logging itself because the global subscriber
        // can only be set once per process; verify the file operations
        let root = tempfile::tempdir().unwrap();
        let log_dir = root.path().join("logs/deep");

        fs::create_dir_all(&log_dir).unwrap();
        let log_path = log_dir.join("kolejka.log");
        fs::write(&log_path, "").unwrap();

        assert!(log_dir.exists());
        assert!(log_path.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_clears_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let log_file = root.path().join("kolejka.log");
        fs::write(&log_file, "old log data").unwrap();

        fs::write(&log_file, "").unwrap();

        let contents = fs::read_to_string(&log_file).unwrap();
        assert_eq!(contents, "", "file should be cleared");
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }
}
