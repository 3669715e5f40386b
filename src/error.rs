//! Error types for the introspection and query layer.
//!
//! All errors are defined with `thiserror` and carry actionable messages so a
//! host application can surface them directly. "Not connected" is deliberately
//! not an error: per the engine contract it is a routine caller state signaled
//! through empty/absent return values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Boot-time failure to open or parse a database source. Fatal for the
    /// engine instance that produced it.
    #[error("Initialization failed: {message}")]
    Initialization { message: String },

    /// The backend rejected a rendered statement (syntax, missing table,
    /// type mismatch).
    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    /// A table or column name failed identifier validation before raw
    /// interpolation into SQL text.
    #[error("Invalid identifier: {name}")]
    InvalidIdentifier { name: String },

    /// A selected source failed the post-boot integrity check.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Create an initialization error.
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    /// Create a query execution error with optional SQL state.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The SQLSTATE code reported by the backend, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors into the engine taxonomy.
impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => EngineError::initialization(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                EngineError::query(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => EngineError::query("No rows returned", None),
            sqlx::Error::PoolTimedOut => {
                EngineError::query("Connection pool acquire timed out", None)
            }
            sqlx::Error::PoolClosed => EngineError::query("Connection pool is closed", None),
            sqlx::Error::Io(io_err) => EngineError::query(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => {
                EngineError::initialization(format!("TLS error: {}", tls_err))
            }
            sqlx::Error::Protocol(msg) => {
                EngineError::query(format!("Protocol error: {}", msg), None)
            }
            sqlx::Error::TypeNotFound { type_name } => {
                EngineError::query(format!("Type not found: {}", type_name), None)
            }
            sqlx::Error::ColumnNotFound(col) => {
                EngineError::query(format!("Column not found: {}", col), None)
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => EngineError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                EngineError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                EngineError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => EngineError::internal("Database worker crashed"),
            _ => EngineError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::initialization("bad database image");
        assert!(err.to_string().contains("Initialization failed"));
    }

    #[test]
    fn test_query_error_sql_state() {
        let err = EngineError::query("syntax error", Some("42601".to_string()));
        assert_eq!(err.sql_state(), Some("42601"));
        assert_eq!(EngineError::invalid_input("x").sql_state(), None);
    }

    #[test]
    fn test_invalid_identifier_names_offender() {
        let err = EngineError::invalid_identifier("users; DROP TABLE users");
        assert!(err.to_string().contains("users; DROP TABLE users"));
    }

    #[test]
    fn test_row_not_found_maps_to_query() {
        let err: EngineError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, EngineError::Query { .. }));
    }
}
