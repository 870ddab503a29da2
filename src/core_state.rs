//! Transport-agnostic application state.
//!
//! `CoreState` is the single shared state behind both the REST API and the
//! HTML pages. It holds no connection: every request opens its own through
//! [`CoreState::open_db`], so concurrent requests never share a handle.

use std::path::{Path, PathBuf};

use crate::db;
use crate::integrity::DeletionPolicy;

pub struct CoreState {
    /// Database file, migrated once at startup.
    db_path: PathBuf,
    /// Safe-delete behavior shared by every delete handler.
    policy: DeletionPolicy,
}

impl CoreState {
    /// Open (creating and migrating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let db_path = db_path.into();
        db::open_database(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database ready");
        Ok(Self {
            db_path,
            policy: DeletionPolicy::default(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a database connection for one request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::connect(&self.db_path).map_err(CoreError::Database)
    }

    pub fn deletion_policy(&self) -> &DeletionPolicy {
        &self.policy
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
