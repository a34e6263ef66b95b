//! Numeric column analysis: descriptive statistics and pairwise correlation.

use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::errors::{AnalyzerResult, ColumnFailure};
use super::{batch, quote_ident};

/// Descriptive statistics for one numeric column.
///
/// Every field is `None` when the column has no non-null rows; `stddev` is
/// additionally `None` for a single-row column (sample standard deviation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub column: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

/// Pairwise Pearson correlation over the numeric columns.
///
/// `cells[i][j]` correlates `columns[i]` with `columns[j]`. The diagonal is
/// always `1.0`; a cell is `None` when the coefficient is undefined (fewer
/// than two paired rows, or zero variance on either side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Looks up the coefficient for a pair of columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.cells[i][j]
    }
}

/// Computes min/max/mean/stddev for each numeric column.
///
/// A single wide query covers all columns in one table scan; if that query
/// fails (for instance when one column's type rejects an aggregate), each
/// column is retried in isolation so the rest still report.
pub async fn numeric_statistics(
    ctx: &SessionContext,
    table: &str,
    columns: &[String],
) -> (Vec<NumericStats>, Vec<ColumnFailure>) {
    if columns.is_empty() {
        return (Vec::new(), Vec::new());
    }

    match wide_statistics(ctx, table, columns).await {
        Ok(stats) => (stats, Vec::new()),
        Err(wide_err) => {
            warn!(error = %wide_err, "wide numeric stats query failed, retrying per column");
            let mut stats = Vec::new();
            let mut failures = Vec::new();
            for column in columns {
                match wide_statistics(ctx, table, std::slice::from_ref(column)).await {
                    Ok(mut one) => stats.append(&mut one),
                    Err(e) => {
                        warn!(column = %column, error = %e, "numeric stats failed, skipping");
                        failures.push(ColumnFailure::for_column(
                            column.clone(),
                            "numeric_stats",
                            &e,
                        ));
                    }
                }
            }
            (stats, failures)
        }
    }
}

#[instrument(skip(ctx, columns))]
async fn wide_statistics(
    ctx: &SessionContext,
    table: &str,
    columns: &[String],
) -> AnalyzerResult<Vec<NumericStats>> {
    let table_sql = quote_ident(table)?;

    let mut projections = Vec::with_capacity(columns.len() * 4);
    for column in columns {
        let c = quote_ident(column)?;
        projections.push(format!("CAST(MIN({c}) AS DOUBLE)"));
        projections.push(format!("CAST(MAX({c}) AS DOUBLE)"));
        projections.push(format!("CAST(AVG({c}) AS DOUBLE)"));
        projections.push(format!("CAST(STDDEV({c}) AS DOUBLE)"));
    }
    let sql = format!("SELECT {} FROM {table_sql}", projections.join(", "));

    let batches = ctx.sql(&sql).await?.collect().await?;
    let first = batches.iter().find(|b| b.num_rows() > 0);

    let mut stats = Vec::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let cell = |offset: usize| -> AnalyzerResult<Option<f64>> {
            match first {
                Some(b) => batch::scalar_opt_f64(b, i * 4 + offset),
                None => Ok(None),
            }
        };
        stats.push(NumericStats {
            column: column.clone(),
            min: cell(0)?,
            max: cell(1)?,
            mean: cell(2)?,
            stddev: cell(3)?,
        });
    }
    Ok(stats)
}

/// Computes the pairwise Pearson correlation matrix.
///
/// Returns `None` only when no columns are given; a single numeric column
/// yields the 1x1 unit matrix. Each off-diagonal pair runs one sums query
/// over the rows where both sides are non-null; a failing pair leaves its
/// two symmetric cells as `None` with a diagnostic.
pub async fn correlation_matrix(
    ctx: &SessionContext,
    table: &str,
    columns: &[String],
) -> (Option<CorrelationMatrix>, Vec<ColumnFailure>) {
    if columns.is_empty() {
        return (None, Vec::new());
    }

    let n = columns.len();
    let mut cells = vec![vec![None; n]; n];
    let mut failures = Vec::new();

    for (i, row) in cells.iter_mut().enumerate() {
        row[i] = Some(1.0);
    }

    for i in 0..n {
        for j in (i + 1)..n {
            match pair_correlation(ctx, table, &columns[i], &columns[j]).await {
                Ok(r) => {
                    cells[i][j] = r;
                    cells[j][i] = r;
                }
                Err(e) => {
                    warn!(
                        left = %columns[i],
                        right = %columns[j],
                        error = %e,
                        "correlation pair failed, leaving cell empty"
                    );
                    failures.push(ColumnFailure::for_column(
                        format!("{}/{}", columns[i], columns[j]),
                        "correlation",
                        &e,
                    ));
                }
            }
        }
    }

    (
        Some(CorrelationMatrix {
            columns: columns.to_vec(),
            cells,
        }),
        failures,
    )
}

/// One Pearson coefficient from running sums, computed over the rows where
/// both columns are non-null.
async fn pair_correlation(
    ctx: &SessionContext,
    table: &str,
    left: &str,
    right: &str,
) -> AnalyzerResult<Option<f64>> {
    let table_sql = quote_ident(table)?;
    let x = quote_ident(left)?;
    let y = quote_ident(right)?;

    let sql = format!(
        "SELECT \
            COUNT(*), \
            SUM(CAST({x} AS DOUBLE)), \
            SUM(CAST({y} AS DOUBLE)), \
            SUM(CAST({x} AS DOUBLE) * CAST({y} AS DOUBLE)), \
            SUM(CAST({x} AS DOUBLE) * CAST({x} AS DOUBLE)), \
            SUM(CAST({y} AS DOUBLE) * CAST({y} AS DOUBLE)) \
         FROM {table_sql} WHERE {x} IS NOT NULL AND {y} IS NOT NULL"
    );

    let batches = ctx.sql(&sql).await?.collect().await?;
    let Some(first) = batches.iter().find(|b| b.num_rows() > 0) else {
        return Ok(None);
    };

    let count = batch::scalar_i64(first, 0, "count")?;
    if count < 2 {
        return Ok(None);
    }
    let n = count as f64;

    let (Some(sum_x), Some(sum_y), Some(sum_xy), Some(sum_xx), Some(sum_yy)) = (
        batch::scalar_opt_f64(first, 1)?,
        batch::scalar_opt_f64(first, 2)?,
        batch::scalar_opt_f64(first, 3)?,
        batch::scalar_opt_f64(first, 4)?,
        batch::scalar_opt_f64(first, 5)?,
    ) else {
        return Ok(None);
    };

    let var_x = n * sum_xx - sum_x * sum_x;
    let var_y = n * sum_yy - sum_y * sum_y;
    if var_x <= 0.0 || var_y <= 0.0 {
        // Zero variance on either side leaves the coefficient undefined.
        return Ok(None);
    }

    let r = (n * sum_xy - sum_x * sum_y) / (var_x * var_y).sqrt();
    Ok(Some(round_to(r.clamp(-1.0, 1.0), 2)))
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
