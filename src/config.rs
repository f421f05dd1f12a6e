//! Runtime settings: where the database lives and how much to log.
//!
//! Resolution order for each value:
//!
//! 1. explicit value (CLI flag)
//! 2. environment variable (`SFINANCE_DATA_DIR`, `SFINANCE_LOG`)
//! 3. default (`data`, `info`)

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DATA_DIR_ENV: &str = "SFINANCE_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "SFINANCE_LOG";

/// Relative to the working directory, created on first run
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DATABASE_FILE: &str = "expenses.db";
pub const LOG_FILE: &str = "sfinance.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Settings from the environment only
    pub fn from_env() -> Self {
        Self::resolve(None, None)
    }

    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        Self::resolve_with(data_dir, log_level, |key| std::env::var(key).ok())
    }

    /// Same as `resolve` with an injectable environment lookup
    pub fn resolve_with<F>(data_dir: Option<PathBuf>, log_level: Option<String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let data_dir = data_dir
            .or_else(|| env(DATA_DIR_ENV).filter(|s| !s.is_empty()).map(PathBuf::from))
            .unwrap_or(defaults.data_dir);

        let log_level = log_level
            .or_else(|| env(LOG_LEVEL_ENV).filter(|s| !s.is_empty()))
            .unwrap_or(defaults.log_level);

        Settings {
            data_dir,
            log_level,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Filter directive for this crate's events at the configured level
    pub fn log_filter(&self) -> String {
        format!("sfinance={}", self.log_level)
    }
}

/// Install the global tracing subscriber.
///
/// With `log_file` set, events are appended there instead of stderr (the TUI
/// owns the terminal). A second call is a no-op.
pub fn init_logging(settings: &Settings, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_new(settings.log_filter())
        .unwrap_or_else(|_| EnvFilter::new(format!("sfinance={}", DEFAULT_LOG_LEVEL)));

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve_with(None, None, no_env);

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.database_path(), PathBuf::from("data/expenses.db"));
        assert_eq!(settings.log_filter(), "sfinance=info");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let settings = Settings::resolve_with(None, None, |key| match key {
            DATA_DIR_ENV => Some("/tmp/sf".to_string()),
            LOG_LEVEL_ENV => Some("debug".to_string()),
            _ => None,
        });

        assert_eq!(settings.data_dir, PathBuf::from("/tmp/sf"));
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_explicit_values_win() {
        let settings = Settings::resolve_with(
            Some(PathBuf::from("mine")),
            Some("warn".to_string()),
            |_| Some("ignored".to_string()),
        );

        assert_eq!(settings.database_path(), PathBuf::from("mine/expenses.db"));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_empty_env_falls_back() {
        let settings = Settings::resolve_with(None, None, |_| Some(String::new()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_logging_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::resolve_with(Some(dir.path().to_path_buf()), None, no_env);

        init_logging(&settings, Some(&settings.log_path())).unwrap();

        assert!(settings.log_path().exists());
    }
}
