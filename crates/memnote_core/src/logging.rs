//! Process-wide logging for memnote binaries.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process, writing to stderr or to
//!   size-rotated files.
//! - Record panics as a single sanitized log line before the default hook runs.
//!
//! # Invariants
//! - A second `init_logging` call with the same level and target is a no-op.
//! - A second call with a different level or target fails and leaves the
//!   active logger untouched.
//! - Initialization never panics.

use flexi_logger::{
    Cleanup, Criterion, DeferredNow, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, Record};
use once_cell::sync::OnceCell;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "memnote";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;
const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Rotating files inside an absolute directory.
    Dir(PathBuf),
}

impl LogTarget {
    /// Builds a target from an optional configured directory.
    pub fn from_setting(dir: Option<&str>) -> Result<Self, LoggingError> {
        let Some(raw) = dir else {
            return Ok(Self::Stderr);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoggingError::InvalidDir("log directory cannot be empty".into()));
        }
        let path = Path::new(trimmed);
        if !path.is_absolute() {
            return Err(LoggingError::InvalidDir(format!(
                "log directory must be absolute, got `{trimmed}`"
            )));
        }
        Ok(Self::Dir(path.to_path_buf()))
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("{0}")]
    InvalidDir(String),
    #[error("failed to create log directory `{}`: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    /// Logging is already running with another configuration.
    #[error("logging already active with {active}; refusing to switch to {requested}")]
    Conflict { active: String, requested: String },
    #[error("failed to start logger: {0}")]
    Backend(#[from] FlexiLoggerError),
}

struct ActiveLogger {
    level: &'static str,
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts logging at `level`, to stderr when `log_dir` is `None`.
///
/// # Errors
/// - [`LoggingError::UnsupportedLevel`] or [`LoggingError::InvalidDir`] for bad input.
/// - [`LoggingError::Conflict`] when a different configuration is already active.
/// - [`LoggingError::CreateDir`] or [`LoggingError::Backend`] when the backend
///   cannot start.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let target = LogTarget::from_setting(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| {
        let handle = start_backend(level, &target)?;
        PANIC_HOOK.get_or_init(install_panic_hook);
        info!(
            "event=app_start module=core status=ok platform={} version={} level={} target={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level,
            target
        );
        Ok::<_, LoggingError>(ActiveLogger {
            level,
            target: target.clone(),
            _handle: handle,
        })
    })?;

    if active.level != level || active.target != target {
        return Err(LoggingError::Conflict {
            active: format!("level={} target={}", active.level, active.target),
            requested: format!("level={level} target={target}"),
        });
    }
    Ok(())
}

/// Level and target of the running logger, if any.
#[cfg(test)]
fn logging_status() -> Option<(&'static str, LogTarget)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.target.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    let wanted = level.trim().to_ascii_lowercase();
    let wanted = if wanted == "warning" {
        "warn".to_string()
    } else {
        wanted
    };
    LEVELS
        .iter()
        .copied()
        .find(|known| *known == wanted)
        .ok_or(LoggingError::UnsupportedLevel(wanted))
}

fn start_backend(level: &'static str, target: &LogTarget) -> Result<LoggerHandle, LoggingError> {
    let logger = Logger::try_with_str(level)?;
    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr().format_for_stderr(stderr_line),
        LogTarget::Dir(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                dir: dir.clone(),
                source,
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                )
                .append()
                .write_mode(WriteMode::BufferAndFlush)
                .format_for_files(flexi_logger::detailed_format)
        }
    };
    Ok(logger.start()?)
}

/// Compact stderr format: level, target and message, no timestamp.
fn stderr_line(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record<'_>,
) -> std::io::Result<()> {
    write!(
        w,
        "{:<5} {}: {}",
        record.level(),
        record.target(),
        record.args()
    )
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        // Payloads may quote note text.
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            single_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(info);
    }));
}

fn single_line(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_level, single_line, LogTarget, LoggingError};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Outlives the test: the active logger keeps writing here.
    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("memnote-log-{tag}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn levels_are_normalized() {
        assert_eq!(parse_level(" INFO ").unwrap(), "info");
        assert_eq!(parse_level("Warning").unwrap(), "warn");
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::UnsupportedLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn target_requires_absolute_non_empty_dir() {
        assert_eq!(LogTarget::from_setting(None).unwrap(), LogTarget::Stderr);
        assert!(matches!(
            LogTarget::from_setting(Some("logs/dev")),
            Err(LoggingError::InvalidDir(_))
        ));
        assert!(LogTarget::from_setting(Some("   ")).is_err());
        assert_eq!(LogTarget::Stderr.to_string(), "stderr");
    }

    #[test]
    fn single_line_flattens_and_truncates() {
        assert_eq!(single_line("a\nb", 10), "a b");
        assert_eq!(single_line("line1\rline2", 4), "line...");
    }

    #[test]
    fn reinit_is_idempotent_and_conflicts_are_rejected() {
        let dir = scratch_dir("reinit");
        let dir_str = dir.to_str().expect("utf-8 temp dir").to_string();

        init_logging("info", Some(&dir_str)).expect("first init");
        init_logging("INFO", Some(&dir_str)).expect("same config again");

        assert!(matches!(
            init_logging("debug", Some(&dir_str)),
            Err(LoggingError::Conflict { .. })
        ));
        assert!(matches!(
            init_logging("info", None),
            Err(LoggingError::Conflict { .. })
        ));
        assert_eq!(logging_status(), Some(("info", LogTarget::Dir(dir))));
    }
}
