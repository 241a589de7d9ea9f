//! # Error Types
//!
//! Domain-specific error types for fare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fare-core errors (this file)                                          │
//! │  ├── CoreError        - Snapshot and domain errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fare-db errors (separate crate)                                       │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  collector errors (in app)                                             │
//! │  └── ApiError         - What the shell prints                          │
//! │                                                                         │
//! │  Ledger commands never return these: an invalid command is a no-op    │
//! │  reported through `Outcome::Ignored`.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A persisted snapshot does not match the expected record shape.
    ///
    /// ## When This Occurs
    /// - Stored JSON is truncated or hand-edited
    /// - A passenger carries a negative payment
    /// - An active trip has no fare
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// The trip could not be serialized.
    #[error("Snapshot encoding failed: {0}")]
    SnapshotEncoding(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidSnapshot error.
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        CoreError::InvalidSnapshot {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the entry helpers the front end calls before it issues a
/// ledger command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. letters in an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
