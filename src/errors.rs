//! Unified application error type.
//! db, config and cli return AppError so the binary reports failures
//! the same way everywhere. The remote seam has its own ServiceError
//! (see `service`), folded in here when it has to cross into the CLI.

use crate::service::ServiceError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid stored value for {field}: {value}")]
    InvalidStoredValue { field: &'static str, value: String },

    // ---------------------------
    // Attendance service
    // ---------------------------
    #[error("Attendance service error: {0}")]
    Service(#[from] ServiceError),

    #[error("No active attendance record")]
    NoActiveRecord,

    /// Failure surfaced by the tracker through its `error` observable.
    #[error("{0}")]
    Tracker(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
