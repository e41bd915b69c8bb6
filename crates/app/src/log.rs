use std::{
    fmt,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub static LOG: Mutex<Option<Arc<dyn Repository>>> = Mutex::new(None);

pub trait Repository: Send + Sync + 'static {
    fn write_entry(&self, entry: &Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("log file lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub time: String,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {} - {}", self.time, self.level, self.message)
    }
}

/// Appends log entries to a file, one line per entry.
pub struct FileLog {
    file: Mutex<File>,
}

impl FileLog {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Repository for FileLog {
    fn write_entry(&self, entry: &Entry) -> Result<(), Error> {
        let mut file = self.file.lock().map_err(|_| Error::Poisoned)?;
        writeln!(file, "{entry}")?;
        Ok(())
    }
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Arc<dyn Repository>, level: LevelFilter) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(log) = LOG.lock() {
            if let Some(ref log) = *log {
                let _ = log.write_entry(&Entry {
                    time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    level: record.level(),
                    message: record.args().to_string(),
                });
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(message: &str) -> Entry {
        Entry {
            time: "2024-03-01 10:00:00".to_string(),
            level: Level::Error,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(
            entry("member with ID U001 not found").to_string(),
            "2024-03-01 10:00:00 - ERROR - member with ID U001 not found"
        );
    }

    #[test]
    fn test_file_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymlog.log");

        FileLog::open(&path)
            .unwrap()
            .write_entry(&entry("first"))
            .unwrap();
        let log = FileLog::open(&path).unwrap();
        log.write_entry(&entry("second")).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-03-01 10:00:00 - ERROR - first\n2024-03-01 10:00:00 - ERROR - second\n"
        );
    }

    #[test]
    fn test_file_log_invalid_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileLog::open(&dir.path().join("missing").join("gymlog.log")),
            Err(Error::Io(_))
        ));
    }
}
