//! Error types for the analyzer layer.
//!
//! These are the recoverable failures: a single column or metric that cannot
//! be analyzed is contained at its boundary, recorded as a [`ColumnFailure`]
//! diagnostic, and never interrupts sibling computations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors that can occur while analyzing a single column or metric.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// DataFusion query execution error.
    #[error("query execution failed: {0}")]
    QueryExecution(#[from] datafusion::error::DataFusionError),

    /// Arrow computation error.
    #[error("arrow computation failed: {0}")]
    ArrowComputation(#[from] arrow::error::ArrowError),

    /// Result batch had an unexpected shape or cell type.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A required column is absent from the table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// No data available for analysis.
    #[error("no data available for analysis")]
    NoData,
}

impl AnalyzerError {
    /// Creates an invalid data error with the given message.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Creates a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }
}

/// A contained per-column or per-metric failure, collected alongside the
/// report instead of being silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFailure {
    /// The affected column, when the failure is column-scoped.
    pub column: Option<String>,
    /// Report section the failure belongs to (e.g. `column_summary`,
    /// `invalid_dates`, `condition_ratio`).
    pub section: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ColumnFailure {
    /// Failure scoped to one column of one section.
    pub fn for_column(
        column: impl Into<String>,
        section: impl Into<String>,
        error: &AnalyzerError,
    ) -> Self {
        Self {
            column: Some(column.into()),
            section: section.into(),
            reason: error.to_string(),
        }
    }

    /// Failure scoped to a whole section (e.g. a business metric).
    pub fn for_section(section: impl Into<String>, error: &AnalyzerError) -> Self {
        Self {
            column: None,
            section: section.into(),
            reason: error.to_string(),
        }
    }
}
