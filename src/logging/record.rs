use chrono::{DateTime, Local};

/// Ordered log severity. Sinks and subsystem rules compare records against
/// their thresholds with this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// One log event. Immutable once constructed; each configured sink consumes
/// it exactly once.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    /// Source module name (file stem of the emitting call site).
    pub module: String,
    pub line: u32,
    /// Subsystem / logger name, matched against override rules.
    pub logger: String,
    /// Raw message, before any formatting or escape decoding.
    pub message: String,
}

impl Record {
    pub fn new(
        severity: Severity,
        module: impl Into<String>,
        line: u32,
        logger: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            module: module.into(),
            line,
            logger: logger.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn severity_names() {
        assert_eq!(Severity::Debug.as_str(), "DEBUG");
        assert_eq!(Severity::Critical.as_str(), "CRITICAL");
    }

    #[test]
    fn record_captures_fields() {
        let record = Record::new(Severity::Warning, "bot", 42, "TeleBot", "hello");
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.module, "bot");
        assert_eq!(record.line, 42);
        assert_eq!(record.logger, "TeleBot");
        assert_eq!(record.message, "hello");
    }
}
