//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (coop-core)              │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds categorization                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  .context("failed to seed holiday ...") ← Which record, which currency  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (API handler, onboarding, seed binary)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use coop_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID or currency code doesn't exist
    /// - Soft-deleted record
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate currency code or currency name
    /// - Same denomination name twice in one branch
    ///
    /// `field` lists the constrained columns as SQLite reports them. The
    /// offending value is not part of SQLite's message, so callers name the
    /// record through `ResultExt::context`.
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent currency, bank or branch
    /// - Deleting a currency still referenced by a RESTRICT foreign key
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Prerequisite data is missing.
    ///
    /// ## When This Occurs
    /// - Seeding bills/coins or holidays before any currency exists
    #[error("{0}")]
    PreconditionFailed(String),

    /// A lower-level error with a description of what was being attempted.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DbError>,
    },

    /// Outbox payload could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain error (invalid request, bad reference data).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
        }
    }

    /// The innermost error, past any `Context` layers.
    pub fn root(&self) -> &DbError {
        match self {
            DbError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.root(), DbError::UniqueViolation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), DbError::NotFound { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>[, <table>.<column>]"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<coop_core::ValidationError> for DbError {
    fn from(err: coop_core::ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Attaches a description of the failed step to an error.
///
/// ## Example
/// ```rust,ignore
/// repo.create_with_tx(&mut tx, &holiday)
///     .await
///     .with_context(|| format!("failed to seed holiday {}", holiday.name))?;
/// ```
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> DbResult<T>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> DbResult<T>;
}

impl<T, E: Into<DbError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> DbResult<T> {
        self.map_err(|err| DbError::Context {
            context: context.into(),
            source: Box::new(err.into()),
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> DbResult<T> {
        self.map_err(|err| DbError::Context {
            context: f(),
            source: Box::new(err.into()),
        })
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors reading `DbConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_and_root_unwraps() {
        let result: DbResult<()> = Err(DbError::duplicate("currencies.currency_code"));
        let err = result
            .context("failed to seed currency US Dollar")
            .context("seed run aborted")
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("seed run aborted: failed to seed currency US Dollar"));
        assert!(matches!(err.root(), DbError::UniqueViolation { .. }));
        assert_eq!(
            err.to_string(),
            "seed run aborted: failed to seed currency US Dollar: Duplicate currencies.currency_code"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("currency", "ZZZ");
        assert_eq!(err.to_string(), "currency not found: ZZZ");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_precondition_message() {
        let err = DbError::PreconditionFailed("no currencies found for holiday seeding".to_string());
        assert_eq!(err.to_string(), "no currencies found for holiday seeding");
    }
}
