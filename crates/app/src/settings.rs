use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

pub const DEFAULT_LOG_FILE: &str = "gymlog.log";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub report_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            report_dir: PathBuf::from("."),
        }
    }
}

/// Values given on the command line, which take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<LevelFilter>,
    pub report_dir: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Settings {
    /// Read settings from a TOML file, or use the defaults if no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            log_file: overrides.log_file.unwrap_or(self.log_file),
            log_level: overrides.log_level.unwrap_or(self.log_level),
            report_dir: overrides.report_dir.unwrap_or(self.report_dir),
        }
    }
}
