//! Error types for the database client

use courtbook_common::ConflictKind;
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A stored value could not be turned back into a domain type
    #[error("Database decode error: {0}")]
    DecodeError(String),

    /// A write was rejected by one of the booking uniqueness rules
    #[error("Booking conflict: {0}")]
    Conflict(ConflictKind),
}

/// Returns true if the given SQLSTATE code represents a unique constraint violation
/// across popular backends (Postgres 23505, SQLite 2067, MySQL 1062).
pub fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "23505" | "2067" | "1062")
}

/// Returns true if the error is a unique constraint violation reported by the database.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation()
                || db
                    .code()
                    .map(|c| is_unique_violation_code(c.as_ref()))
                    .unwrap_or(false)
        }
        _ => false,
    }
}

/// Maps a unique violation on `bookings` to the rule it broke.
///
/// SQLite names the columns ("bookings.user_id, bookings.date"), Postgres
/// names the constraint ("uq_bookings_user_day").
pub fn classify_booking_violation(message: &str) -> ConflictKind {
    if message.contains("user_id") || message.contains("uq_bookings_user_day") {
        ConflictKind::AlreadyBookedThatDay
    } else {
        ConflictKind::SlotTaken
    }
}
