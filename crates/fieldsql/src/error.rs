//! Error types for fieldsql

use thiserror::Error;

/// Result type alias for fieldsql operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for row mapping and query execution
///
/// Registration has no runtime failure: `#[derive(Schema)]` rejects anything
/// but a struct with named fields at compile time.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A column has no resolvable struct field for the given type
    #[error("field not found for column '{column}' on {type_name}")]
    FieldNotFound { type_name: String, column: String },

    /// A value could not be coerced to the expected Rust type
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// A row scan could not bind every requested column
    #[error("incomplete fields: resolved {resolved} of {expected} columns")]
    IncompleteFields { expected: usize, resolved: usize },

    /// The builder's preconditions failed, so there is no statement to run
    #[error("empty query")]
    EmptyQuery,

    /// No usable database connection
    #[error("no db connection")]
    NoConnection,

    /// No active transaction (never started, or already committed / rolled back)
    #[error("no active transaction")]
    NoTransaction,

    /// The read query has no row reader
    #[error("no row reader")]
    NoReader,

    /// The post-execution result check rejected the result
    #[error("result check failed (rows affected: {rows_affected})")]
    ResultCheckFailed { rows_affected: u64 },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A statement failed inside a transaction and the rollback failed as well
    #[error("{source} (rollback failed: {rollback})")]
    RollbackFailed {
        source: Box<OrmError>,
        rollback: Box<OrmError>,
    },

    /// Driver-level error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a field-not-found error for a column of `type_name`
    pub fn field_not_found(type_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::FieldNotFound {
            type_name: type_name.into(),
            column: column.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an empty query error
    pub fn is_empty_query(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a type mismatch error
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// The error that caused a rollback, looking through a failed rollback.
    pub fn root_cause(&self) -> &OrmError {
        match self {
            Self::RollbackFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("Expected one row, got none".to_string()),
            other => Self::Driver(other.to_string()),
        }
    }
}
