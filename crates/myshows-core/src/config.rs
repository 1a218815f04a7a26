use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::MyShowsError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub watchlist: WatchlistConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".into(),
            language: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    /// Database file name inside the data directory, or an absolute path.
    pub db_file: String,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            db_file: "myshows.db".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, MyShowsError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path. Keys present in the file override
    /// `config/default.toml`; everything else keeps the shipped value.
    pub fn load_from(path: &std::path::Path) -> Result<Self, MyShowsError> {
        let mut table = parse_table(DEFAULT_CONFIG)?;
        if path.exists() {
            let user_str = std::fs::read_to_string(path)?;
            merge_tables(&mut table, parse_table(&user_str)?);
        }
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| MyShowsError::Config(e.to_string()))
    }

    /// The defaults shipped in `config/default.toml`.
    pub fn builtin() -> Result<Self, MyShowsError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| MyShowsError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), MyShowsError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), MyShowsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MyShowsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the watchlist database file.
    pub fn db_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.watchlist.db_file);
        if file.is_absolute() {
            return file;
        }
        Self::project_dirs()
            .map(|d| d.data_dir().join(&file))
            .unwrap_or(file)
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path(&self) -> Result<PathBuf, MyShowsError> {
        let path = self.db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("gr", "blackswamp", "myshows")
    }
}

fn parse_table(s: &str) -> Result<toml::Table, MyShowsError> {
    s.parse::<toml::Table>()
        .map_err(|e| MyShowsError::Config(e.to_string()))
}

/// Overlay `user` onto `base`, descending into tables present in both.
fn merge_tables(base: &mut toml::Table, user: toml::Table) {
    for (key, value) in user {
        match value {
            toml::Value::Table(user_sub) => match base.get_mut(&key) {
                Some(toml::Value::Table(base_sub)) => merge_tables(base_sub, user_sub),
                _ => {
                    base.insert(key, toml::Value::Table(user_sub));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
