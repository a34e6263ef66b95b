//! Crate-level error types.
//!
//! Fatal conditions only: everything that can be contained at a per-column or
//! per-metric boundary lives in [`crate::analyzers::errors`] instead and is
//! surfaced through the report's diagnostics list.

use thiserror::Error;

/// Result type for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Errors that abort a profiling run.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No schema introspection strategy produced a usable column list.
    ///
    /// There is nothing to profile without a schema, so this is fatal for the
    /// whole run.
    #[error("schema unavailable for table '{table}': {reason}")]
    SchemaUnavailable { table: String, reason: String },

    /// A table or column name failed identifier validation before being
    /// embedded into generated SQL.
    #[error("invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    /// DataFusion query execution failed outside any recoverable boundary.
    #[error("query execution failed: {0}")]
    Query(#[from] datafusion::error::DataFusionError),

    /// Arrow-level failure while reading result batches.
    #[error("arrow computation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A background analysis task panicked or was cancelled.
    #[error("analysis task failed: {0}")]
    TaskJoin(String),

    /// Report serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProfileError {
    /// Creates a `SchemaUnavailable` error for the given table.
    pub fn schema_unavailable(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaUnavailable {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
