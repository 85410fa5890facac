//! Unified error types for `HabitForge`.
//!
//! Validation failures are modeled as dedicated recoverable variants that a UI
//! boundary can match on and render; each carries a human-readable message via
//! its `Display` impl. `InvalidGoalType` is the one invariant-violation
//! variant: a goal type string that survives to the period calculator without
//! parsing indicates a programming error upstream, not bad user input.

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// A goal type string that is not one of daily/weekly/monthly
    #[error("Invalid goal type '{value}'. Must be 'daily', 'weekly', or 'monthly'")]
    InvalidGoalType {
        /// The offending value
        value: String,
    },

    /// Habit name failed validation (empty, too long)
    #[error("Invalid habit name: {message}")]
    InvalidName {
        /// Description of the rule that was violated
        message: String,
    },

    /// Color is not a `#RRGGBB` hex code
    #[error("Color must be a valid hex color code (#RRGGBB), got '{value}'")]
    InvalidColor {
        /// The offending value
        value: String,
    },

    /// Goal count outside the allowed 1-100 range
    #[error("Goal count must be between 1 and 100, got {count}")]
    InvalidGoalCount {
        /// The offending count
        count: i32,
    },

    /// Another habit already uses this name (case-insensitive)
    #[error("A habit named '{name}' already exists")]
    DuplicateName {
        /// The duplicated name
        name: String,
    },

    /// No habit row for the given ID
    #[error("Habit with ID {id} not found")]
    HabitNotFound {
        /// The missing habit ID
        id: i64,
    },

    /// Attempted to log a completion against an archived habit
    #[error("Cannot log completions for archived habits")]
    HabitArchived {
        /// ID of the archived habit
        id: i64,
    },

    /// Completion amount was zero or negative
    #[error("Completion amount must be positive, got {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: i32,
    },

    /// Attempted to log a completion dated after today
    #[error("Cannot log completions for future dates")]
    FutureDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// No completion row to decrement for the given habit and date
    #[error("No completion found for habit {habit_id} on {date}")]
    CompletionNotFound {
        /// Habit the decrement targeted
        habit_id: i64,
        /// Date the decrement targeted
        date: NaiveDate,
    },

    /// A backup file that is missing required sections or unreadable
    #[error("Invalid backup: {message}")]
    InvalidBackup {
        /// Description of what failed validation
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error represents a user-recoverable validation failure,
    /// as opposed to an invariant violation or storage fault.
    ///
    /// UI boundaries use this to decide between showing the message inline
    /// and logging-and-aborting the operation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::InvalidColor { .. }
                | Self::InvalidGoalCount { .. }
                | Self::DuplicateName { .. }
                | Self::HabitNotFound { .. }
                | Self::HabitArchived { .. }
                | Self::InvalidAmount { .. }
                | Self::FutureDate { .. }
                | Self::CompletionNotFound { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
