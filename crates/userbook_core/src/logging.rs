//! Process-wide logging for the server.
//!
//! Application events and the HTTP access log share one rolling file. The
//! access log writes under [`ACCESS_LOG_TARGET`] so its verbosity is filtered
//! independently of the application level.
//!
//! # Invariants
//! - The logger is started at most once per process.
//! - Starting again with identical settings is a no-op; different settings
//!   are rejected and the active logger is kept.

use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecification, Logger,
    LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log target the access-log middleware writes under.
pub const ACCESS_LOG_TARGET: &str = "userbook::access";

/// Runtime crates that are chatty below `info`.
const QUIET_TARGETS: &[&str] = &["actix_server", "actix_http", "mio"];

const LOG_FILE_BASENAME: &str = "userbook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 7;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    /// Log directory must be absolute.
    RelativeDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Start(FlexiLoggerError),
    AlreadyActive {
        active: LogSettings,
        requested: LogSettings,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected off|error|warn|info|debug|trace"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Start(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyActive { active, requested } => write!(
                f,
                "logging already active with {active}; refusing {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Start(err) => Some(err),
            Self::InvalidLevel(_) | Self::RelativeDir(_) | Self::AlreadyActive { .. } => None,
        }
    }
}

/// Validated logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    level: LevelFilter,
    dir: PathBuf,
}

impl LogSettings {
    /// Parses `level` case-insensitively and checks that `dir` is absolute.
    pub fn new(level: &str, dir: impl Into<PathBuf>) -> Result<Self, LoggingError> {
        let trimmed = level.trim();
        let level = LevelFilter::from_str(trimmed)
            .map_err(|_| LoggingError::InvalidLevel(trimmed.to_string()))?;
        let dir = dir.into();
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeDir(dir));
        }
        Ok(Self { level, dir })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Access lines are kept at `info` even when the application level is
    /// stricter; only `off` silences them.
    fn access_level(&self) -> LevelFilter {
        match self.level {
            LevelFilter::Off => LevelFilter::Off,
            level => level.max(LevelFilter::Info),
        }
    }

    fn specification(&self) -> LogSpecification {
        let mut builder = LogSpecification::builder();
        builder
            .default(self.level)
            .module(ACCESS_LOG_TARGET, self.access_level());
        for target in QUIET_TARGETS {
            builder.module(target, self.level.min(LevelFilter::Info));
        }
        builder.build()
    }
}

impl Display for LogSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "level={} log_dir={}", self.level, self.dir.display())
    }
}

/// Starts the rolling file logger for this process.
///
/// Files rotate daily or at 10 MiB. Warnings and errors are also written to
/// stderr for a foreground server.
pub fn init_logging(settings: LogSettings) -> Result<(), LoggingError> {
    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(settings.clone()))?;
    if active.settings != settings {
        return Err(LoggingError::AlreadyActive {
            active: active.settings.clone(),
            requested: settings,
        });
    }
    Ok(())
}

/// Settings of the running logger, if any.
pub fn active_log_settings() -> Option<&'static LogSettings> {
    ACTIVE_LOGGER.get().map(|active| &active.settings)
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::with(settings.specification())
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::AgeOrSize(Age::Day, MAX_LOG_FILE_SIZE_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::with_thread)
        .format_for_stderr(flexi_logger::default_format)
        .start()
        .map_err(LoggingError::Start)?;

    info!(
        "event=logging_init module=core status=ok {settings} access_level={} version={}",
        settings.access_level(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        active_log_settings, init_logging, LogSettings, LoggingError, ACCESS_LOG_TARGET,
    };
    use log::LevelFilter;

    fn filter_for(settings: &LogSettings, target: &str) -> Option<LevelFilter> {
        settings
            .specification()
            .module_filters()
            .iter()
            .find(|filter| filter.module_name.as_deref() == Some(target))
            .map(|filter| filter.level_filter)
    }

    #[test]
    fn settings_parse_level_case_insensitively() {
        let settings = LogSettings::new(" WARN ", "/var/log/userbook").unwrap();
        assert_eq!(settings.level(), LevelFilter::Warn);

        let err = LogSettings::new("verbose", "/var/log/userbook").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel(ref level) if level == "verbose"));
    }

    #[test]
    fn settings_reject_relative_dir() {
        let err = LogSettings::new("info", "logs/dev").unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDir(_)));
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn access_log_stays_at_info_under_a_stricter_level() {
        let settings = LogSettings::new("error", "/var/log/userbook").unwrap();
        assert_eq!(filter_for(&settings, ACCESS_LOG_TARGET), Some(LevelFilter::Info));
        assert_eq!(filter_for(&settings, "actix_server"), Some(LevelFilter::Error));
    }

    #[test]
    fn runtime_targets_are_capped_at_info_under_trace() {
        let settings = LogSettings::new("trace", "/var/log/userbook").unwrap();
        assert_eq!(filter_for(&settings, ACCESS_LOG_TARGET), Some(LevelFilter::Trace));
        assert_eq!(filter_for(&settings, "actix_http"), Some(LevelFilter::Info));
        assert_eq!(filter_for(&settings, "mio"), Some(LevelFilter::Info));
    }

    #[test]
    fn off_silences_the_access_log_too() {
        let settings = LogSettings::new("off", "/var/log/userbook").unwrap();
        assert_eq!(filter_for(&settings, ACCESS_LOG_TARGET), Some(LevelFilter::Off));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_other_settings() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let settings = LogSettings::new("info", first.path()).unwrap();

        init_logging(settings.clone()).unwrap();
        init_logging(settings.clone()).unwrap();

        let louder = LogSettings::new("debug", first.path()).unwrap();
        assert!(matches!(
            init_logging(louder).unwrap_err(),
            LoggingError::AlreadyActive { .. }
        ));

        let moved = LogSettings::new("info", second.path()).unwrap();
        let err = init_logging(moved).unwrap_err();
        assert!(err.to_string().contains("refusing"));

        assert_eq!(active_log_settings(), Some(&settings));
    }
}
