//! Core error types for Daily Steps.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the goal tracker.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Operation partially applied: {0}")]
    PartialFailure(#[from] PartialFailure),

    #[error("Goal '{goal_id}' counter update lost {attempts} consecutive write races")]
    ConflictRetryExhausted { goal_id: String, attempts: u32 },

    #[error("No authenticated user")]
    Unauthenticated,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn goal_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: "Goal",
            id: id.into(),
        }
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: "Task",
            id: id.into(),
        }
    }

    /// True for both domain-level and storage-level "record missing" errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::Database(DatabaseError::NotFound(_))
        )
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Field '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// A multi-step operation failed after some of its writes were applied.
///
/// Callers use the variant to decide on compensation: a failed task batch
/// reports whether the goal row was rolled back, a failed counter update
/// means the goal should be reconciled.
#[derive(Error, Debug)]
pub enum PartialFailure {
    #[error(
        "generating {expected} tasks for goal '{goal_id}' failed (goal rolled back: {rolled_back}): {reason}"
    )]
    TaskGeneration {
        goal_id: String,
        expected: i32,
        rolled_back: bool,
        reason: String,
    },

    #[error("task '{task_id}' was updated but goal '{goal_id}' counter was not: {reason}")]
    GoalCounter {
        task_id: String,
        goal_id: String,
        reason: String,
    },
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
