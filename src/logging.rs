//! `tracing` subscriber set-up.
//!
//! The terminal UI owns stdout/stderr while it runs, so in that mode logs go
//! to a file or nowhere. Headless runs log to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Append to a file.
    File(&'a Path),
    /// Standard error.
    Stderr,
    /// Logging disabled.
    Off,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `level` when set.
///
/// # Errors
///
/// Returns an `io::Error` if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init(level: &str, target: LogTarget<'_>) -> io::Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_installs_nothing() {
        assert!(init("info", LogTarget::Off).is_ok());
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let target = LogTarget::File(Path::new("/nonexistent/dir/dash.log"));
        assert!(init("info", target).is_err());
    }
}
