//! Categorical column analysis: frequency distributions, dominance, entropy,
//! boolean-likeness and date-parseability probes.
//!
//! Every metric here is derived from grouped value/frequency queries over the
//! non-null rows of a column. Values are cast to VARCHAR before grouping so
//! any column type can be analyzed. Ties in the top-N ranking are broken
//! deterministically by value order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::errors::{AnalyzerError, AnalyzerResult, ColumnFailure};
use super::summary::ColumnSummary;
use super::{batch, quote_ident};

/// Guard against `log2(0)` in the entropy sum.
const ENTROPY_EPSILON: f64 = 1e-9;

/// One row of a top-N frequency distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalFrequency {
    pub column: String,
    pub value: String,
    pub frequency: u64,
}

/// Emitted only when a single value's share of non-null rows reaches the
/// configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominanceRecord {
    pub column: String,
    /// Share of non-null rows held by the most frequent value, in `[0, 1]`.
    pub dominance_ratio: f64,
}

/// Shannon entropy of a column's non-null value distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyRecord {
    pub column: String,
    /// Entropy in bits, rounded to 3 decimals. 0 for a constant column.
    pub entropy_bits: f64,
}

/// A column whose distinct non-null values number one or two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanColumn {
    pub column: String,
    /// The literal value set, rendered as strings.
    pub values: Vec<String>,
}

/// A text column whose sampled values are only partially date-parseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateParseRecord {
    pub column: String,
    /// Fraction of sampled values that parsed, strictly between 0 and 1,
    /// rounded to 2 decimals.
    pub parse_ratio: f64,
}

/// Aggregated categorical analysis across a set of columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalAnalysis {
    pub distributions: Vec<CategoricalFrequency>,
    pub dominance: Vec<DominanceRecord>,
    pub entropy: Vec<EntropyRecord>,
}

/// Per-column outcome, merged into [`CategoricalAnalysis`] by the caller.
#[derive(Debug, Clone)]
pub struct ColumnDistribution {
    pub column: String,
    /// Full value/frequency pairs, frequency descending then value ascending.
    pub value_counts: Vec<(String, u64)>,
    /// Total non-null rows.
    pub non_null_total: u64,
}

impl ColumnDistribution {
    /// Shannon entropy in bits over the full distribution.
    ///
    /// Uses `-Σ p·log2(p + ε)` and clamps the result at zero so a constant
    /// column reports exactly 0.0 after rounding.
    pub fn entropy_bits(&self) -> Option<f64> {
        if self.non_null_total == 0 {
            return None;
        }
        let total = self.non_null_total as f64;
        let raw: f64 = self
            .value_counts
            .iter()
            .map(|(_, count)| {
                let p = *count as f64 / total;
                -p * (p + ENTROPY_EPSILON).log2()
            })
            .sum();
        Some(round_to(raw, 3).max(0.0))
    }

    /// Share of non-null rows held by the most frequent value.
    pub fn dominance_ratio(&self) -> Option<f64> {
        if self.non_null_total == 0 {
            return None;
        }
        self.value_counts
            .first()
            .map(|(_, top)| round_to(*top as f64 / self.non_null_total as f64, 3))
    }
}

/// Fetches the full ordered value distribution for one column.
#[instrument(skip(ctx))]
pub async fn column_distribution(
    ctx: &SessionContext,
    table: &str,
    column: &str,
) -> AnalyzerResult<ColumnDistribution> {
    let table_sql = quote_ident(table)?;
    let column_sql = quote_ident(column)?;

    let sql = format!(
        "SELECT CAST({column_sql} AS VARCHAR) AS value, COUNT(*) AS frequency \
         FROM {table_sql} \
         WHERE {column_sql} IS NOT NULL \
         GROUP BY CAST({column_sql} AS VARCHAR) \
         ORDER BY frequency DESC, value ASC"
    );

    let batches = ctx.sql(&sql).await?.collect().await?;

    let mut value_counts = Vec::new();
    let mut non_null_total = 0u64;
    for b in &batches {
        for row in 0..b.num_rows() {
            let value = batch::string_at(b.column(0).as_ref(), row, "value")?;
            let frequency = batch::i64_at(b.column(1).as_ref(), row, "frequency")?.max(0) as u64;
            non_null_total += frequency;
            value_counts.push((value, frequency));
        }
    }

    Ok(ColumnDistribution {
        column: column.to_string(),
        value_counts,
        non_null_total,
    })
}

/// Analyzes a set of (typically non-numeric) columns.
///
/// Each column runs independently; a failing column is skipped with a
/// diagnostic and does not affect its siblings.
pub async fn analyze_columns(
    ctx: &SessionContext,
    table: &str,
    columns: &[String],
    top_n: usize,
    dominance_threshold: f64,
    parallel: bool,
) -> (CategoricalAnalysis, Vec<ColumnFailure>) {
    let mut analysis = CategoricalAnalysis::default();
    let mut failures = Vec::new();

    let mut outcomes: Vec<(String, AnalyzerResult<ColumnDistribution>)> =
        Vec::with_capacity(columns.len());

    if parallel && columns.len() > 1 {
        // Same bounded-wave dispatch as the count summaries.
        let cap = num_cpus::get().max(4);
        for chunk in columns.chunks(cap) {
            let mut handles = Vec::with_capacity(chunk.len());
            for column in chunk {
                let ctx = ctx.clone();
                let table = table.to_string();
                let column = column.clone();
                handles.push((
                    column.clone(),
                    tokio::spawn(async move { column_distribution(&ctx, &table, &column).await }),
                ));
            }
            for (column, handle) in handles {
                let outcome = match handle.await {
                    Ok(result) => result,
                    Err(join_err) => Err(AnalyzerError::invalid_data(format!(
                        "task join error: {join_err}"
                    ))),
                };
                outcomes.push((column, outcome));
            }
        }
    } else {
        for column in columns {
            let outcome = column_distribution(ctx, table, column).await;
            outcomes.push((column.clone(), outcome));
        }
    }

    for (column, outcome) in outcomes {
        match outcome {
            Ok(distribution) => {
                for (value, frequency) in distribution.value_counts.iter().take(top_n) {
                    analysis.distributions.push(CategoricalFrequency {
                        column: column.clone(),
                        value: value.clone(),
                        frequency: *frequency,
                    });
                }
                if let Some(ratio) = distribution.dominance_ratio() {
                    if ratio >= dominance_threshold {
                        analysis.dominance.push(DominanceRecord {
                            column: column.clone(),
                            dominance_ratio: ratio,
                        });
                    }
                }
                if let Some(bits) = distribution.entropy_bits() {
                    analysis.entropy.push(EntropyRecord {
                        column: column.clone(),
                        entropy_bits: bits,
                    });
                }
            }
            Err(e) => {
                warn!(column = %column, error = %e, "categorical analysis failed, skipping");
                failures.push(ColumnFailure::for_column(column, "categorical", &e));
            }
        }
    }

    (analysis, failures)
}

/// Flags columns whose distinct non-null cardinality is one or two.
///
/// The probe reuses the already-computed count summaries and only fetches the
/// literal value set for the columns that qualify, regardless of declared
/// type.
pub async fn detect_boolean_columns(
    ctx: &SessionContext,
    table: &str,
    summaries: &[ColumnSummary],
) -> (Vec<BooleanColumn>, Vec<ColumnFailure>) {
    let mut booleans = Vec::new();
    let mut failures = Vec::new();

    for summary in summaries {
        if summary.non_null_count() == 0 || !(1..=2).contains(&summary.distinct_count) {
            continue;
        }
        match distinct_values(ctx, table, &summary.column).await {
            Ok(values) => booleans.push(BooleanColumn {
                column: summary.column.clone(),
                values,
            }),
            Err(e) => {
                warn!(column = %summary.column, error = %e, "boolean probe failed, skipping");
                failures.push(ColumnFailure::for_column(
                    summary.column.clone(),
                    "boolean_columns",
                    &e,
                ));
            }
        }
    }

    (booleans, failures)
}

async fn distinct_values(
    ctx: &SessionContext,
    table: &str,
    column: &str,
) -> AnalyzerResult<Vec<String>> {
    let table_sql = quote_ident(table)?;
    let column_sql = quote_ident(column)?;
    let sql = format!(
        "SELECT DISTINCT CAST({column_sql} AS VARCHAR) AS value \
         FROM {table_sql} WHERE {column_sql} IS NOT NULL ORDER BY value"
    );
    let batches = ctx.sql(&sql).await?.collect().await?;

    let mut values = Vec::new();
    for b in &batches {
        for row in 0..b.num_rows() {
            values.push(batch::string_at(b.column(0).as_ref(), row, "value")?);
        }
    }
    Ok(values)
}

/// Probes text columns for partially date-parseable content.
///
/// Samples up to `sample_size` non-null values per column and reports the
/// fraction that parse as dates, but only when that fraction is strictly
/// between 0 and 1: fully parseable and fully unparseable columns are not
/// "invalid dates".
pub async fn date_parse_ratios(
    ctx: &SessionContext,
    table: &str,
    text_columns: &[String],
    sample_size: usize,
) -> (Vec<DateParseRecord>, Vec<ColumnFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for column in text_columns {
        match sample_parse_ratio(ctx, table, column, sample_size).await {
            // The strict-range check runs on the raw ratio; rounding is for
            // output only, so a near-0 or near-1 column is still reported.
            Ok(Some(ratio)) if ratio > 0.0 && ratio < 1.0 => {
                records.push(DateParseRecord {
                    column: column.clone(),
                    parse_ratio: round_to(ratio, 2),
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(column = %column, error = %e, "date parse probe failed, skipping");
                failures.push(ColumnFailure::for_column(column.clone(), "invalid_dates", &e));
            }
        }
    }

    (records, failures)
}

async fn sample_parse_ratio(
    ctx: &SessionContext,
    table: &str,
    column: &str,
    sample_size: usize,
) -> AnalyzerResult<Option<f64>> {
    let table_sql = quote_ident(table)?;
    let column_sql = quote_ident(column)?;
    let sql = format!(
        "SELECT CAST({column_sql} AS VARCHAR) AS value \
         FROM {table_sql} WHERE {column_sql} IS NOT NULL LIMIT {sample_size}"
    );
    let batches = ctx.sql(&sql).await?.collect().await?;

    let mut sampled = 0usize;
    let mut parsed = 0usize;
    for b in &batches {
        for row in 0..b.num_rows() {
            if let Some(value) = batch::opt_string_at(b.column(0).as_ref(), row) {
                sampled += 1;
                if parses_as_date(&value) {
                    parsed += 1;
                }
            }
        }
    }

    if sampled == 0 {
        return Ok(None);
    }
    Ok(Some(parsed as f64 / sampled as f64))
}

/// Best-effort date parsing across the formats seen in marketplace exports.
fn parses_as_date(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    if DateTime::parse_from_rfc3339(trimmed).is_ok() {
        return true;
    }
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    if DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).is_ok())
    {
        return true;
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(trimmed, fmt).is_ok())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
