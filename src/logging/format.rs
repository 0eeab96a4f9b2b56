use crate::logging::decode::decode_unicode_escapes;
use crate::logging::record::{Record, Severity};

/// Raw messages containing this marker are routed through the escape decoder
/// after layout. Checked against the unformatted message only, so layout
/// metadata can never trigger decoding.
pub const SERVER_REPLY_MARKER: &str = "The server returned:";

/// Template tokens: `{timestamp}`, `{level}` (left-padded to 8), `{module}`,
/// `{line}`, `{name}`, `{message}`.
pub const DETAILED_TEMPLATE: &str =
    "{timestamp} - [{level}] - {module} - {line} - {name} - {message}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

const RESET: &str = "\x1b[0m";

// Fixed severity-to-color table. INFO is intentionally absent and takes the
// reset fallback.
const COLORS: &[(Severity, &str)] = &[
    (Severity::Debug, "\x1b[0;37m"),
    (Severity::Warning, "\x1b[33m"),
    (Severity::Error, "\x1b[91m"),
    (Severity::Critical, "\x1b[31;1m"),
];

fn color_for(severity: Severity) -> &'static str {
    COLORS
        .iter()
        .find(|(s, _)| *s == severity)
        .map(|(_, code)| *code)
        .unwrap_or(RESET)
}

/// Describes one formatter variant: the line template plus color and
/// escape-decoding behavior flags.
#[derive(Debug, Clone)]
pub struct FormatterSpec {
    pub template: String,
    pub color: bool,
    pub decode_escapes: bool,
}

impl FormatterSpec {
    /// Plain variant used for file output.
    pub fn detailed() -> Self {
        Self {
            template: DETAILED_TEMPLATE.to_string(),
            color: false,
            decode_escapes: true,
        }
    }

    /// ANSI-colored variant used for console output.
    pub fn colored() -> Self {
        Self {
            template: DETAILED_TEMPLATE.to_string(),
            color: true,
            decode_escapes: true,
        }
    }
}

/// Renders records to their final line. Formatting never fails: malformed
/// escape sequences stay literal and unmapped severities render uncolored.
#[derive(Debug, Clone)]
pub struct Formatter {
    spec: FormatterSpec,
}

impl Formatter {
    pub fn new(spec: FormatterSpec) -> Self {
        Self { spec }
    }

    pub fn format(&self, record: &Record) -> String {
        // The message token is substituted last so tokens inside the message
        // are not expanded.
        let mut line = self
            .spec
            .template
            .replace("{timestamp}", &record.timestamp.format(TIMESTAMP_FORMAT).to_string())
            .replace("{level}", &format!("{:<8}", record.severity.as_str()))
            .replace("{module}", &record.module)
            .replace("{line}", &record.line.to_string())
            .replace("{name}", &record.logger)
            .replace("{message}", &record.message);

        if self.spec.decode_escapes && record.message.contains(SERVER_REPLY_MARKER) {
            line = decode_unicode_escapes(&line).into_owned();
        }

        if self.spec.color {
            line = format!("{}{}{}", color_for(record.severity), line, RESET);
        }

        line
    }
}
