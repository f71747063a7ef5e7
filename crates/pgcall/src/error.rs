//! Error types for pgcall

use crate::ident::IdentKind;
use thiserror::Error;

/// Result type alias for pgcall operations
pub type CallResult<T> = Result<T, CallError>;

/// Error types for the query layer.
///
/// Every validation variant is raised before any SQL text is produced; no
/// partial statement is ever executed. Execution errors carry the failing SQL
/// and are surfaced as-is, never retried.
#[derive(Debug, Error)]
pub enum CallError {
    /// Malformed table/column name; never silently corrected
    #[error("Invalid SQL identifier ({kind}): {name}")]
    Identifier { name: String, kind: IdentKind },

    /// Rejected ORDER BY direction token
    #[error("Invalid ORDER BY direction: {0}")]
    OrderDirection(String),

    /// Rejected LIMIT policy token
    #[error("Invalid LIMIT policy: {0}")]
    Limit(String),

    /// Structurally invalid join descriptor
    #[error("Invalid join: {0}")]
    Join(String),

    /// Structurally invalid mutation descriptor
    #[error("Invalid mutation: {0}")]
    Mutation(String),

    /// Missing or malformed configuration value; fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection establishment failure; fatal, no retry
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement preparation/execution failure, with the failing SQL
    #[error("Execution error for `{sql}`: {source}")]
    Execution {
        sql: String,
        source: tokio_postgres::Error,
    },

    /// Result-cell normalization failure
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CallError {
    /// Create an identifier error
    pub fn identifier(name: impl Into<String>, kind: IdentKind) -> Self {
        Self::Identifier {
            name: name.into(),
            kind,
        }
    }

    /// Create an execution error for a specific statement
    pub fn execution(sql: impl Into<String>, source: tokio_postgres::Error) -> Self {
        Self::Execution {
            sql: sql.into(),
            source,
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a pre-execution validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Identifier { .. }
                | Self::OrderDirection(_)
                | Self::Limit(_)
                | Self::Join(_)
                | Self::Mutation(_)
        )
    }

    /// Check if this error is unrecoverable for the owning request
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Connection(_))
    }
}
