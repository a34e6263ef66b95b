//! Per-column count profiling.
//!
//! One aggregation per column computes total, distinct and null counts in a
//! single pass. Columns are profiled independently so a column whose type
//! does not support `COUNT(DISTINCT ...)` is skipped with a diagnostic while
//! its siblings proceed.

use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::errors::{AnalyzerError, AnalyzerResult, ColumnFailure};
use super::{batch, quote_ident};

/// Count summary for one column.
///
/// Invariants: `null_count <= total_count`, and `distinct_count >= 1`
/// whenever at least one non-null row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub total_count: u64,
    pub distinct_count: u64,
    pub null_count: u64,
}

impl ColumnSummary {
    /// Count of non-null rows.
    pub fn non_null_count(&self) -> u64 {
        self.total_count.saturating_sub(self.null_count)
    }

    /// Null percentage in `[0, 100]`; 0.0 for an empty table.
    pub fn null_percentage(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.null_count as f64 * 100.0 / self.total_count as f64
        }
    }

    /// Whether the column holds exactly one distinct non-null value.
    pub fn is_constant(&self) -> bool {
        self.distinct_count == 1
    }
}

/// Computes the count summary for a single column.
#[instrument(skip(ctx))]
pub async fn summarize_column(
    ctx: &SessionContext,
    table: &str,
    column: &str,
) -> AnalyzerResult<ColumnSummary> {
    let table_sql = quote_ident(table)?;
    let column_sql = quote_ident(column)?;

    let sql = format!(
        "SELECT \
            COUNT(*) AS total_count, \
            COUNT(DISTINCT {column_sql}) AS distinct_count, \
            COUNT(*) - COUNT({column_sql}) AS null_count \
         FROM {table_sql}"
    );

    let batches = ctx.sql(&sql).await?.collect().await?;
    let first = batches
        .iter()
        .find(|b| b.num_rows() > 0)
        .ok_or(AnalyzerError::NoData)?;

    let total_count = batch::scalar_i64(first, 0, "total_count")?.max(0) as u64;
    let distinct_count = batch::scalar_i64(first, 1, "distinct_count")?.max(0) as u64;
    let null_count = batch::scalar_i64(first, 2, "null_count")?.max(0) as u64;

    Ok(ColumnSummary {
        column: column.to_string(),
        total_count,
        distinct_count,
        null_count,
    })
}

/// Summarizes every column, optionally dispatching the per-column queries as
/// concurrent tasks on a cloned session context.
///
/// Failures are isolated per column: the returned summaries keep schema
/// order, and each skipped column contributes one diagnostic.
pub async fn summarize_columns(
    ctx: &SessionContext,
    table: &str,
    columns: &[String],
    parallel: bool,
) -> (Vec<ColumnSummary>, Vec<ColumnFailure>) {
    let mut summaries = Vec::with_capacity(columns.len());
    let mut failures = Vec::new();

    if parallel && columns.len() > 1 {
        // Dispatch in waves so wide tables do not flood the runtime.
        let cap = num_cpus::get().max(4);
        for chunk in columns.chunks(cap) {
            let mut handles = Vec::with_capacity(chunk.len());
            for column in chunk {
                let ctx = ctx.clone();
                let table = table.to_string();
                let column = column.clone();
                handles.push((
                    column.clone(),
                    tokio::spawn(async move { summarize_column(&ctx, &table, &column).await }),
                ));
            }
            for (column, handle) in handles {
                match handle.await {
                    Ok(Ok(summary)) => summaries.push(summary),
                    Ok(Err(e)) => {
                        warn!(column = %column, error = %e, "column summary failed, skipping");
                        failures.push(ColumnFailure::for_column(column, "column_summary", &e));
                    }
                    Err(join_err) => {
                        let e = AnalyzerError::invalid_data(format!("task join error: {join_err}"));
                        failures.push(ColumnFailure::for_column(column, "column_summary", &e));
                    }
                }
            }
        }
    } else {
        for column in columns {
            match summarize_column(ctx, table, column).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    warn!(column = %column, error = %e, "column summary failed, skipping");
                    failures.push(ColumnFailure::for_column(column.clone(), "column_summary", &e));
                }
            }
        }
    }

    (summaries, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_listings_context, create_table_with_nulls};

    #[tokio::test]
    async fn counts_add_up() {
        let ctx = create_table_with_nulls().await.unwrap();
        let summary = summarize_column(&ctx, "users_with_nulls", "name")
            .await
            .unwrap();

        assert_eq!(summary.total_count, 10);
        assert_eq!(summary.null_count, 3);
        assert_eq!(summary.non_null_count(), 7);
        assert!((summary.null_percentage() - 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn total_count_identical_across_columns() {
        let ctx = create_listings_context().await.unwrap();
        let columns: Vec<String> = ["id", "title", "price", "stock"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (summaries, failures) = summarize_columns(&ctx, "listings", &columns, true).await;
        assert!(failures.is_empty());
        assert_eq!(summaries.len(), columns.len());

        let total = summaries[0].total_count;
        for summary in &summaries {
            assert_eq!(summary.total_count, total);
            assert!(summary.null_count <= summary.total_count);
        }
    }

    #[tokio::test]
    async fn unknown_column_is_isolated() {
        let ctx = create_listings_context().await.unwrap();
        let columns = vec!["id".to_string(), "no_such_column".to_string()];

        let (summaries, failures) = summarize_columns(&ctx, "listings", &columns, false).await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].column.as_deref(), Some("no_such_column"));
        assert_eq!(failures[0].section, "column_summary");
    }
}
