//! Unified application error type.
//! All modules (db, core, api, cli) return AppError to keep the error
//! handling consistent and easy to manage.

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
    // Payload / parsing errors
    // ---------------------------
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid punch type: {0}")]
    InvalidPunchType(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Write pipeline
    // ---------------------------
    #[error("User not assigned to a store")]
    NoStoreAssigned,

    #[error("Too far from the store ({distance} m), allowed radius is {radius} m")]
    OutOfRange { distance: i64, radius: i64 },

    // ---------------------------
    // Lookup / access
    // ---------------------------
    #[error("Not found.")]
    NotFound,

    #[error("Authentication credentials were not provided or are invalid: {0}")]
    Unauthenticated(String),

    #[error("User {0} not found")]
    UnknownUser(i64),

    #[error("Store {0} not found")]
    UnknownStore(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
