//! Logging subsystem: explicit, code-constructed configuration applied once
//! at startup.
//!
//! There is no global registry. The host builds a [`LoggingConfig`] (a list
//! of sink descriptors plus per-subsystem override rules), constructs one
//! [`Logger`] from it, and passes that value to whatever needs to log.

pub mod decode;
pub mod format;
pub mod record;
pub mod sink;

pub use format::{Formatter, FormatterSpec, SERVER_REPLY_MARKER};
pub use record::{Record, Severity};
pub use sink::{ConsoleSink, RotatingFileSink, Sink};

use std::panic::Location;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Describes one output destination.
#[derive(Debug, Clone)]
pub enum SinkSpec {
    Console {
        threshold: Severity,
        formatter: FormatterSpec,
    },
    RotatingFile {
        path: PathBuf,
        max_bytes: u64,
        backup_count: u32,
        threshold: Severity,
        formatter: FormatterSpec,
    },
}

/// Per-subsystem override: records whose logger name matches `name` (exactly
/// or as a dotted prefix) must meet `threshold`, and are dropped entirely
/// when `propagate` is false.
#[derive(Debug, Clone)]
pub struct SubsystemRule {
    pub name: String,
    pub threshold: Severity,
    pub propagate: bool,
}

impl SubsystemRule {
    fn matches(&self, logger: &str) -> bool {
        logger == self.name
            || logger
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub sinks: Vec<SinkSpec>,
    pub rules: Vec<SubsystemRule>,
}

/// The standard wiring: colored console plus a 10 MiB rotating file with
/// five retained backups, both at DEBUG. The bot-framework subsystem
/// propagates; the noisy HTTP client is silenced.
pub fn default_config(log_path: impl Into<PathBuf>) -> LoggingConfig {
    LoggingConfig {
        sinks: vec![
            SinkSpec::Console {
                threshold: Severity::Debug,
                formatter: FormatterSpec::colored(),
            },
            SinkSpec::RotatingFile {
                path: log_path.into(),
                max_bytes: 10 * 1024 * 1024,
                backup_count: 5,
                threshold: Severity::Debug,
                formatter: FormatterSpec::detailed(),
            },
        ],
        rules: vec![
            SubsystemRule {
                name: "TeleBot".to_string(),
                threshold: Severity::Debug,
                propagate: true,
            },
            SubsystemRule {
                name: "urllib3".to_string(),
                threshold: Severity::Debug,
                propagate: false,
            },
        ],
    }
}

/// The logging collaborator. Constructed once at startup and passed
/// explicitly; cloning is not needed because callers share it by reference
/// (it is `Send + Sync`).
pub struct Logger {
    sinks: Vec<Box<dyn Sink>>,
    rules: Vec<SubsystemRule>,
}

impl Logger {
    /// Open every configured sink eagerly. A file that cannot be opened is a
    /// startup error; nothing is partially initialized on failure.
    pub fn new(config: LoggingConfig) -> Result<Self, LoggingError> {
        let mut sinks: Vec<Box<dyn Sink>> = Vec::with_capacity(config.sinks.len());
        for spec in config.sinks {
            match spec {
                SinkSpec::Console { threshold, formatter } => {
                    sinks.push(Box::new(ConsoleSink::new(threshold, Formatter::new(formatter))));
                }
                SinkSpec::RotatingFile {
                    path,
                    max_bytes,
                    backup_count,
                    threshold,
                    formatter,
                } => {
                    sinks.push(Box::new(RotatingFileSink::open(
                        path,
                        max_bytes,
                        backup_count,
                        threshold,
                        Formatter::new(formatter),
                    )?));
                }
            }
        }
        Ok(Self {
            sinks,
            rules: config.rules,
        })
    }

    /// Build a logger from already-constructed sinks. Hosts use this to add
    /// their own [`Sink`] implementations.
    pub fn with_sinks(sinks: Vec<Box<dyn Sink>>, rules: Vec<SubsystemRule>) -> Self {
        Self { sinks, rules }
    }

    /// Route a record: the first matching subsystem rule gates it, then every
    /// sink receives it (each sink applies its own threshold).
    pub fn log(&self, record: &Record) {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(&record.logger)) {
            if !rule.propagate || record.severity < rule.threshold {
                return;
            }
        }
        for sink in &self.sinks {
            sink.write(record);
        }
    }

    #[track_caller]
    pub fn debug(&self, logger: &str, message: impl Into<String>) {
        self.emit(Severity::Debug, logger, message.into());
    }

    #[track_caller]
    pub fn info(&self, logger: &str, message: impl Into<String>) {
        self.emit(Severity::Info, logger, message.into());
    }

    #[track_caller]
    pub fn warning(&self, logger: &str, message: impl Into<String>) {
        self.emit(Severity::Warning, logger, message.into());
    }

    #[track_caller]
    pub fn error(&self, logger: &str, message: impl Into<String>) {
        self.emit(Severity::Error, logger, message.into());
    }

    #[track_caller]
    pub fn critical(&self, logger: &str, message: impl Into<String>) {
        self.emit(Severity::Critical, logger, message.into());
    }

    #[track_caller]
    fn emit(&self, severity: Severity, logger: &str, message: String) {
        let location = Location::caller();
        let module = Path::new(location.file())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        self.log(&Record::new(severity, module, location.line(), logger, message));
    }
}
