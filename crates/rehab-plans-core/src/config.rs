//! Store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "REHAB_PLANS_DB_PATH";

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./rehab_plans.db";

/// Where the plan store keeps its data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file (created on first open)
    pub database_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => Self::new(path),
            None => Self::default(),
        }
    }
}
