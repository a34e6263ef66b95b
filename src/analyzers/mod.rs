//! SQL-driven analyzers.
//!
//! Each submodule owns one family of report sections and computes it through
//! aggregation queries on a shared [`SessionContext`]. Analyzers never abort
//! the run for a single bad column or metric; they return what they could
//! compute plus [`ColumnFailure`] diagnostics for the rest.
//!
//! [`SessionContext`]: datafusion::prelude::SessionContext

pub mod batch;
pub mod business;
pub mod categorical;
pub mod errors;
pub mod numeric;
pub mod summary;

pub use business::{BusinessColumns, BusinessMetrics, GroupMetricRow};
pub use categorical::{
    BooleanColumn, CategoricalAnalysis, CategoricalFrequency, DateParseRecord, DominanceRecord,
    EntropyRecord,
};
pub use errors::{AnalyzerError, AnalyzerResult, ColumnFailure};
pub use numeric::{CorrelationMatrix, NumericStats};
pub use summary::ColumnSummary;

use crate::security::SqlIdent;

/// Validates and quotes an identifier for embedding in analyzer SQL.
pub(crate) fn quote_ident(ident: &str) -> AnalyzerResult<String> {
    SqlIdent::quote(ident)
        .map_err(|e| AnalyzerError::invalid_data(format!("bad identifier {ident:?}: {e}")))
}
