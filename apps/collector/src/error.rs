//! # API Error Type
//!
//! Unified error type for collector commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Collector                          │
//! │                                                                         │
//! │  Shell line ("pay 9 abc")                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Parse error? ────────── ApiError::unknown_command / validation ──┐    │
//! │       │                                                           │    │
//! │       ▼                                                           │    │
//! │  Passenger #9 missing? ─ ApiError::not_found ─────────────────────┤    │
//! │       │                                                           │    │
//! │       ▼                                                           │    │
//! │  Ledger ignored it? ──── Rejection → ApiError (REJECTED) ─────────┤    │
//! │       │                                                           ▼    │
//! │       ▼                                               shell prints     │
//! │  Success ──► response view ──► rendered text          "! message"      │
//! │                                                                         │
//! │  Storage errors only surface here when opening the database fails.     │
//! │  While running, the snapshot writer logs and swallows them.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fare_core::{CoreError, Rejection, ValidationError};
use fare_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from collector commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Passenger not found: #9"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Passenger number doesn't exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The ledger ignored the command (wrong trip state, bad amount)
    Rejected,

    /// Shell line didn't name a known command
    UnknownCommand,

    /// Storage could not be opened
    DatabaseError,

    /// Internal error (terminal I/O, task failure)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unknown command error.
    pub fn unknown_command(input: &str) -> Self {
        ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command '{}'. Type 'help' for a list.", input),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Encoding(e) => ApiError::internal(e.to_string()),
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// A ledger no-op, reported back to the operator.
impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::new(ErrorCode::Rejected, rejection.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(format!("terminal I/O failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fare_core::{Money, TripStatus};

    #[test]
    fn test_serializes_code_and_message() {
        let err = ApiError::not_found("Passenger", "#9");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Passenger not found: #9");
    }

    #[test]
    fn test_rejection_maps_to_rejected() {
        let err = ApiError::from(Rejection::NotActive(TripStatus::Summary));
        assert_eq!(err.code, ErrorCode::Rejected);

        let err = ApiError::from(Rejection::InvalidAmount(Money::zero()));
        assert_eq!(err.message, "amount must be positive, got 0");
    }

    #[test]
    fn test_validation_error_maps() {
        let err = ApiError::from(CoreError::from(ValidationError::MustBePositive {
            field: "fare".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "fare must be positive");
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }
}
