//! The assembled profiling report.
//!
//! [`TableReport`] is one serializable structure keyed by section; every
//! section an analyzer could not produce is empty or `None`, with the reason
//! recorded under `diagnostics`. The report is plain data, ready for
//! `serde_json` and downstream rendering.

pub mod quality;

pub use quality::{consolidate, quality_score, ConsolidatedColumn};

use serde::{Deserialize, Serialize};

use crate::analyzers::{
    BooleanColumn, BusinessMetrics, CategoricalFrequency, ColumnFailure, ColumnSummary,
    CorrelationMatrix, DateParseRecord, DominanceRecord, EntropyRecord, NumericStats,
};
use crate::schema::{ColumnDescriptor, ColumnRole};

/// Table shape: row and column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: u64,
    pub columns: u64,
}

/// One entry of the `column_types` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeEntry {
    pub column: String,
    pub role: ColumnRole,
}

/// One entry of the `null_percentages` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullPercentage {
    pub column: String,
    /// In `[0, 100]`.
    pub null_percentage: f64,
}

/// The full profiling report for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub dimensions: Dimensions,
    /// Introspected columns in declaration order.
    pub schema: Vec<ColumnDescriptor>,
    pub column_types: Vec<ColumnTypeEntry>,
    pub column_summary: Vec<ColumnSummary>,
    /// Absent (not empty) when the table has no numeric columns.
    pub numeric_stats: Option<Vec<NumericStats>>,
    /// Names of columns holding exactly one distinct non-null value.
    pub constant_columns: Vec<String>,
    pub null_percentages: Vec<NullPercentage>,
    /// Top-N value frequencies for the non-numeric columns.
    pub categorical_distributions: Vec<CategoricalFrequency>,
    /// Only columns whose top value reaches the dominance threshold.
    pub dominance: Vec<DominanceRecord>,
    pub entropy: Vec<EntropyRecord>,
    pub boolean_columns: Vec<BooleanColumn>,
    /// Text columns with a partial date-parse ratio.
    pub invalid_dates: Vec<DateParseRecord>,
    /// Absent only when the table has no numeric columns; a single numeric
    /// column yields the 1x1 unit matrix.
    pub correlation: Option<CorrelationMatrix>,
    #[serde(flatten)]
    pub business: BusinessMetrics,
    /// Every schema column exactly once, outer-joined with its summary.
    pub consolidated: Vec<ConsolidatedColumn>,
    /// Contained per-column / per-metric failures, in occurrence order.
    pub diagnostics: Vec<ColumnFailure>,
}

impl TableReport {
    /// Convenience serialization to a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_report() -> TableReport {
        TableReport {
            table: "t".to_string(),
            dimensions: Dimensions { rows: 0, columns: 1 },
            schema: vec![ColumnDescriptor::new("id", "BIGINT")],
            column_types: vec![ColumnTypeEntry {
                column: "id".to_string(),
                role: ColumnRole::Id,
            }],
            column_summary: vec![],
            numeric_stats: None,
            constant_columns: vec![],
            null_percentages: vec![],
            categorical_distributions: vec![],
            dominance: vec![],
            entropy: vec![],
            boolean_columns: vec![],
            invalid_dates: vec![],
            correlation: None,
            business: BusinessMetrics::default(),
            consolidated: vec![],
            diagnostics: vec![],
        }
    }

    #[test]
    fn serializes_with_flattened_business_sections() {
        let value = minimal_report().to_json().unwrap();
        assert!(value.get("dimensions").is_some());
        assert!(value.get("consolidated").is_some());
        // Business metrics are report sections, not a nested object.
        assert!(value.get("variety_index").is_some());
        assert!(value.get("turnover_rate").is_some());
        assert!(value.get("business").is_none());
    }

    #[test]
    fn roundtrips_through_json() {
        let report = minimal_report();
        let text = serde_json::to_string(&report).unwrap();
        let back: TableReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.table, "t");
        assert_eq!(back.schema.len(), 1);
    }
}
