use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the snapshot path.
pub const DATA_PATH_ENV: &str = "PORTFOLIO_DATA_PATH";

/// Default location of the imported snapshot, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/portfolio_data.json";

/// Host-configurable settings for the analytics core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the JSON snapshot produced by the spreadsheet import.
    pub data_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl Settings {
    /// Defaults, with `PORTFOLIO_DATA_PATH` taking precedence when set and non-empty.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(path) = std::env::var_os(DATA_PATH_ENV).filter(|p| !p.is_empty()) {
            settings.data_path = PathBuf::from(path);
        }
        settings
    }
}
