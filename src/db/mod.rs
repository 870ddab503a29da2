pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::integrity::IntegrityViolation;
use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Referenced record does not exist: {0}")]
    InvalidReference(String),

    #[error("{0}")]
    ReferentialIntegrityViolation(IntegrityViolation),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    pub fn not_found(entity_type: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

/// Classify a failed INSERT/UPDATE.
///
/// Foreign-key failures mean the referenced parent is missing; every other
/// constraint failure (UNIQUE, CHECK, NOT NULL) is a conflict with stored data.
pub fn classify_write_error(err: rusqlite::Error) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            let detail = msg.clone().unwrap_or_else(|| e.to_string());
            if is_foreign_key_failure(&err) {
                DatabaseError::InvalidReference(detail)
            } else {
                DatabaseError::ConstraintViolation(detail)
            }
        }
        _ => DatabaseError::Sqlite(err),
    }
}

/// True for `SQLITE_CONSTRAINT_FOREIGNKEY`.
pub fn is_foreign_key_failure(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// True when the store refused to delete a referenced parent row.
///
/// An `ON DELETE RESTRICT` action fires during the statement and reports
/// `SQLITE_CONSTRAINT_TRIGGER`; a deferred check reports
/// `SQLITE_CONSTRAINT_FOREIGNKEY` instead.
pub fn is_delete_refusal(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER)
    )
}
