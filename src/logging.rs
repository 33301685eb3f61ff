/*!
 * Logging and tracing initialization.
 */

use std::fs::File;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{FsError, FsErrorKind, Result};

/// Levels realizing the Logger collaborator's `(timestamp, source-location,
/// level, message)` surface as `tracing` levels. `Off` installs no
/// subscriber at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Err,
    Off,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Trace => Some(Level::TRACE),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Err => Some(Level::ERROR),
            LogLevel::Off => None,
        }
    }
}

/// Install a stdout `tracing` subscriber at `level`. A `Level::Off` call is
/// a no-op: no subscriber is installed, matching a null logger.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(());
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("waypoint_fs={tracing_level}")))
        .map_err(|e| {
            FsError::new(FsErrorKind::Other).with_message(format!("invalid log filter: {e}"))
        })?;

    init_stdout_logging(env_filter);
    Ok(())
}

fn init_stdout_logging(env_filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log to `path` instead of stdout, in JSON.
pub fn init_file_logging(level: LogLevel, path: &Path) -> Result<()> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(());
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("waypoint_fs={tracing_level}")))
        .map_err(|e| {
            FsError::new(FsErrorKind::Other).with_message(format!("invalid log filter: {e}"))
        })?;

    let file = File::create(path).map_err(|e| FsError::from(e).with_path(path))?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Install a test-writer subscriber exactly once per process.
#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("waypoint_fs=debug"));

        let fmt_layer = fmt::layer().with_test_writer().with_target(false).compact();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_conversion() {
        assert_eq!(LogLevel::Err.to_tracing_level(), Some(Level::ERROR));
        assert_eq!(LogLevel::Warn.to_tracing_level(), Some(Level::WARN));
        assert_eq!(LogLevel::Info.to_tracing_level(), Some(Level::INFO));
        assert_eq!(LogLevel::Debug.to_tracing_level(), Some(Level::DEBUG));
        assert_eq!(LogLevel::Trace.to_tracing_level(), Some(Level::TRACE));
        assert_eq!(LogLevel::Off.to_tracing_level(), None);
    }

    #[test]
    fn off_level_is_a_no_op() {
        assert!(init_logging(LogLevel::Off).is_ok());
    }
}
