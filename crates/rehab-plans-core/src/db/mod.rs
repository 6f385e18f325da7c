//! Database layer for the rehab plan store.

mod plans;
mod schema;

pub use schema::*;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::info;

use crate::config::StoreConfig;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
enum Location {
    File(PathBuf),
    /// Shared-cache in-memory database, alive while the anchor is open.
    Memory {
        uri: String,
        _anchor: Mutex<Connection>,
    },
}

/// Handle to the plan store.
///
/// Holds only the storage location. Every operation opens its own
/// connection, which is closed when the operation returns, on success and
/// on error alike.
#[derive(Debug)]
pub struct PlanStore {
    location: Location,
}

impl PlanStore {
    /// Open the store described by `config`, creating the schema if needed.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        Self::open_path(&config.database_path)
    }

    /// Open the store at `path`, creating the file and schema if needed.
    pub fn open_path<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let store = Self {
            location: Location::File(path.as_ref().to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create a private in-memory store (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:rehab-plans-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        );
        let anchor = Connection::open_with_flags(&uri, memory_flags())?;
        let store = Self {
            location: Location::Memory {
                uri,
                _anchor: Mutex::new(anchor),
            },
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the schema exists. Safe to call repeatedly.
    pub fn initialize(&self) -> DbResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!(location = %self.describe(), "plan store initialized");
        Ok(())
    }

    /// Acquire a connection scoped to the caller (for advanced queries).
    ///
    /// The connection closes when dropped.
    pub fn connect(&self) -> DbResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => Connection::open(path)?,
            Location::Memory { uri, .. } => Connection::open_with_flags(uri, memory_flags())?,
        };
        Ok(conn)
    }

    /// Human-readable storage location, for diagnostics.
    pub fn describe(&self) -> String {
        match &self.location {
            Location::File(path) => path.display().to_string(),
            Location::Memory { uri, .. } => uri.clone(),
        }
    }
}

fn memory_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
}
