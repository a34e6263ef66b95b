//! Quality scoring and the consolidated per-column view.

use serde::{Deserialize, Serialize};

use crate::analyzers::ColumnSummary;
use crate::schema::classify::is_textual_type;
use crate::schema::{ColumnDescriptor, ColumnRole};

/// One row of the consolidated table.
///
/// Every schema column appears exactly once. Count fields are `None` when
/// the column's summary failed; the score is only computed over columns that
/// were actually summarized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedColumn {
    pub column: String,
    pub declared_type: String,
    pub role: ColumnRole,
    pub total_count: Option<u64>,
    pub distinct_count: Option<u64>,
    pub null_count: Option<u64>,
    pub null_percentage: Option<f64>,
    pub quality_score: Option<f64>,
}

/// Scores one summarized column.
///
/// Starts at 1.0 and deducts: 0.2 for any nulls, 0.5 for a single-valued
/// column, 0.1 for a textual column whose cardinality exceeds the threshold.
/// Floored at 0.0.
pub fn quality_score(
    summary: &ColumnSummary,
    declared_type: &str,
    high_cardinality_threshold: u64,
) -> f64 {
    let mut score: f64 = 1.0;
    if summary.null_count > 0 {
        score -= 0.2;
    }
    if summary.distinct_count == 1 {
        score -= 0.5;
    }
    if is_textual_type(declared_type) && summary.distinct_count > high_cardinality_threshold {
        score -= 0.1;
    }
    score.max(0.0)
}

/// Outer-joins the schema with the count summaries by column name.
pub fn consolidate(
    descriptors: &[ColumnDescriptor],
    summaries: &[ColumnSummary],
    high_cardinality_threshold: u64,
) -> Vec<ConsolidatedColumn> {
    descriptors
        .iter()
        .map(|d| {
            let summary = summaries.iter().find(|s| s.column == d.name);
            ConsolidatedColumn {
                column: d.name.clone(),
                declared_type: d.declared_type.clone(),
                role: d.role,
                total_count: summary.map(|s| s.total_count),
                distinct_count: summary.map(|s| s.distinct_count),
                null_count: summary.map(|s| s.null_count),
                null_percentage: summary.map(|s| s.null_percentage()),
                quality_score: summary
                    .map(|s| quality_score(s, &d.declared_type, high_cardinality_threshold)),
            }
        })
        .collect()
}
