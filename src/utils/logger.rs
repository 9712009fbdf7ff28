//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation for the log crate
//! that writes every record to stderr and, optionally, to a log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// Most verbose level this logger accepts
    level: Level,
    /// Optional file receiving a copy of every record
    file: Mutex<Option<File>>,
}

impl Logger {
    /// Creates a logger writing to stderr only
    pub fn new(level: Level) -> Self {
        Logger {
            level,
            file: Mutex::new(None),
        }
    }

    /// Creates a logger that also appends to `log_file`
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be opened
    pub fn with_file(level: Level, log_file: &str) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Path::new(log_file))?;
        Ok(Logger {
            level,
            file: Mutex::new(Some(file)),
        })
    }

    /// Writes one formatted line to every sink
    fn write_line(&self, message: &str) -> io::Result<()> {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle, "{}", message)?;

        // A poisoned lock only means another thread panicked mid-write.
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Installs a logger as the global `log` backend
    ///
    /// `verbose` selects debug output instead of info.
    pub fn init_global_logger(verbose: bool, log_file: Option<&str>) -> io::Result<()> {
        let level = if verbose { Level::Debug } else { Level::Info };
        let logger = match log_file {
            Some(path) => Logger::with_file(level, path)?,
            None => Logger::new(level),
        };

        if log::set_boxed_logger(Box::new(logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    /// Level filter matching this logger
    pub fn level_filter(&self) -> LevelFilter {
        self.level.to_level_filter()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_line(&message);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_level() {
        let logger = Logger::new(Level::Info);
        assert!(logger.enabled(&Metadata::builder().level(Level::Warn).build()));
        assert!(logger.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
        assert_eq!(logger.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn copies_records_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let logger = Logger::with_file(Level::Debug, path.to_str().unwrap()).unwrap();

        logger.log(&Record::builder()
            .level(Level::Warn)
            .args(format_args!("TIFF x dimension changes in stack!"))
            .build());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[WARN] TIFF x dimension changes in stack!\n");
    }
}
