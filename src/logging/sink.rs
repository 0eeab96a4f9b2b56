use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::logging::format::Formatter;
use crate::logging::record::{Record, Severity};

use super::LoggingError;

/// A configured log destination. Implementations must be safe to call from
/// concurrent logging call sites; write failures after startup are swallowed
/// so logging can never take the host down.
pub trait Sink: Send + Sync {
    fn write(&self, record: &Record);
}

/// Single-line-per-record output to stdout.
pub struct ConsoleSink {
    threshold: Severity,
    formatter: Formatter,
}

impl ConsoleSink {
    pub fn new(threshold: Severity, formatter: Formatter) -> Self {
        Self { threshold, formatter }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &Record) {
        if record.severity < self.threshold {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", self.formatter.format(record));
    }
}

struct FileState {
    file: File,
    len: u64,
}

/// Size-bounded rotating file output. The live file is appended to until a
/// write would push it past `max_bytes`; backups rotate through
/// `<path>.1 ..= <path>.N` with the oldest dropped.
pub struct RotatingFileSink {
    threshold: Severity,
    formatter: Formatter,
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    pub fn open(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: u32,
        threshold: Severity,
        formatter: Formatter,
    ) -> Result<Self, LoggingError> {
        let path = path.into();
        let file = open_append(&path).map_err(|source| LoggingError::OpenLogFile {
            path: path.clone(),
            source,
        })?;
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            threshold,
            formatter,
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(FileState { file, len }),
        })
    }

    fn backup_path(&self, n: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        state.file.flush()?;
        let oldest = self.backup_path(self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backup_count).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;
        state.file = open_append(&self.path)?;
        state.len = 0;
        Ok(())
    }

    fn try_write(&self, line: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let bytes = line.len() as u64 + 1;
        // RotatingFileHandler semantics: rotate before the write that would
        // exceed the cap, and only when backups are kept at all.
        if self.backup_count > 0 && state.len > 0 && state.len + bytes > self.max_bytes {
            self.rotate(&mut state)?;
        }
        state.file.write_all(line.as_bytes())?;
        state.file.write_all(b"\n")?;
        state.len += bytes;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, record: &Record) {
        if record.severity < self.threshold {
            return;
        }
        let _ = self.try_write(&self.formatter.format(record));
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::format::FormatterSpec;
    use tempfile::TempDir;

    fn sink(dir: &TempDir, max_bytes: u64, backups: u32) -> RotatingFileSink {
        RotatingFileSink::open(
            dir.path().join("logs.log"),
            max_bytes,
            backups,
            Severity::Debug,
            Formatter::new(FormatterSpec::detailed()),
        )
        .unwrap()
    }

    fn record(severity: Severity, message: &str) -> Record {
        Record::new(severity, "bot", 1, "TeleBot", message)
    }

    #[test]
    fn appends_formatted_lines() {
        let dir = TempDir::new().unwrap();
        let sink = sink(&dir, 10 * 1024, 5);
        sink.write(&record(Severity::Info, "first"));
        sink.write(&record(Severity::Info, "second"));

        let contents = fs::read_to_string(dir.path().join("logs.log")).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("first"));
        assert!(contents.contains("second"));
    }

    #[test]
    fn drops_records_below_threshold() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(
            dir.path().join("logs.log"),
            10 * 1024,
            5,
            Severity::Error,
            Formatter::new(FormatterSpec::detailed()),
        )
        .unwrap();
        sink.write(&record(Severity::Debug, "quiet"));
        sink.write(&record(Severity::Critical, "loud"));

        let contents = fs::read_to_string(dir.path().join("logs.log")).unwrap();
        assert!(!contents.contains("quiet"));
        assert!(contents.contains("loud"));
    }

    #[test]
    fn rotates_when_cap_would_be_exceeded() {
        let dir = TempDir::new().unwrap();
        let sink = sink(&dir, 128, 5);
        for i in 0..10 {
            sink.write(&record(Severity::Info, &format!("line {i}")));
        }

        assert!(dir.path().join("logs.log").exists());
        assert!(dir.path().join("logs.log.1").exists());
        // The live file never grows past the cap plus one record.
        let len = fs::metadata(dir.path().join("logs.log")).unwrap().len();
        assert!(len <= 256);
    }

    #[test]
    fn retention_is_bounded_by_backup_count() {
        let dir = TempDir::new().unwrap();
        let sink = sink(&dir, 64, 2);
        for i in 0..40 {
            sink.write(&record(Severity::Info, &format!("line {i}")));
        }

        assert!(dir.path().join("logs.log.1").exists());
        assert!(dir.path().join("logs.log.2").exists());
        assert!(!dir.path().join("logs.log.3").exists());
    }

    #[test]
    fn zero_backups_disables_rotation() {
        let dir = TempDir::new().unwrap();
        let sink = sink(&dir, 64, 0);
        for i in 0..20 {
            sink.write(&record(Severity::Info, &format!("line {i}")));
        }

        assert!(!dir.path().join("logs.log.1").exists());
        let len = fs::metadata(dir.path().join("logs.log")).unwrap().len();
        assert!(len > 64);
    }

    #[test]
    fn reopens_existing_file_and_keeps_contents() {
        let dir = TempDir::new().unwrap();
        {
            let sink = sink(&dir, 10 * 1024, 5);
            sink.write(&record(Severity::Info, "before"));
        }
        {
            let sink = sink(&dir, 10 * 1024, 5);
            sink.write(&record(Severity::Info, "after"));
        }

        let contents = fs::read_to_string(dir.path().join("logs.log")).unwrap();
        assert!(contents.contains("before"));
        assert!(contents.contains("after"));
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = RotatingFileSink::open(
            dir.path().join("no-such-dir").join("logs.log"),
            10 * 1024,
            5,
            Severity::Debug,
            Formatter::new(FormatterSpec::detailed()),
        );
        assert!(result.is_err());
    }
}
