//! Table profiling orchestration.
//!
//! [`TableProfiler`] drives the full pipeline: schema introspection, the
//! per-column analyzers, business metrics, and final consolidation into a
//! [`TableReport`]. Only a missing schema or a failing dimension query aborts
//! the run; every other failure is contained and reported as a diagnostic.

use datafusion::prelude::*;
use tracing::{info, instrument};

use crate::analyzers::{business, categorical, numeric, summary};
use crate::analyzers::{BusinessColumns, BusinessMetrics, ColumnFailure};
use crate::error::Result;
use crate::report::{consolidate, ColumnTypeEntry, Dimensions, NullPercentage, TableReport};
use crate::schema::{ColumnDescriptor, SchemaIntrospector};

/// Profiles a registered table into a [`TableReport`].
///
/// Construct with [`TableProfiler::new`] for defaults or through
/// [`TableProfiler::builder`] to tune thresholds and the business column
/// mapping.
#[derive(Debug, Clone)]
pub struct TableProfiler {
    top_n: usize,
    dominance_threshold: f64,
    date_sample_size: usize,
    high_cardinality_threshold: u64,
    enable_parallel: bool,
    business_columns: Option<BusinessColumns>,
}

impl Default for TableProfiler {
    fn default() -> Self {
        Self {
            top_n: 10,
            dominance_threshold: 0.95,
            date_sample_size: 100,
            high_cardinality_threshold: 100,
            enable_parallel: true,
            business_columns: Some(BusinessColumns::default()),
        }
    }
}

impl TableProfiler {
    /// Creates a profiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder.
    pub fn builder() -> TableProfilerBuilder {
        TableProfilerBuilder::default()
    }

    /// Runs the full profiling pipeline against `table`.
    #[instrument(skip(self, ctx))]
    pub async fn profile(&self, ctx: &SessionContext, table: &str) -> Result<TableReport> {
        let schema = SchemaIntrospector::introspect(ctx, table).await?;
        let rows = ctx.table(table).await?.count().await? as u64;
        info!(table, rows, columns = schema.len(), "profiling table");

        let all_columns: Vec<String> = schema.iter().map(|d| d.name.clone()).collect();
        let numeric_columns: Vec<String> = schema
            .iter()
            .filter(|d| d.numeric_type())
            .map(|d| d.name.clone())
            .collect();
        let non_numeric_columns: Vec<String> = schema
            .iter()
            .filter(|d| !d.numeric_type())
            .map(|d| d.name.clone())
            .collect();
        let text_columns: Vec<String> = schema
            .iter()
            .filter(|d| d.textual_type())
            .map(|d| d.name.clone())
            .collect();

        let business_task = async {
            match &self.business_columns {
                Some(columns) => business::compute_business_metrics(ctx, table, columns).await,
                None => (BusinessMetrics::default(), Vec::new()),
            }
        };

        let (
            (summaries, summary_failures),
            (categorical_analysis, categorical_failures),
            (numeric_stats, numeric_failures),
            (correlation, correlation_failures),
            (invalid_dates, date_failures),
            (business_metrics, business_failures),
        ) = futures::join!(
            summary::summarize_columns(ctx, table, &all_columns, self.enable_parallel),
            categorical::analyze_columns(
                ctx,
                table,
                &non_numeric_columns,
                self.top_n,
                self.dominance_threshold,
                self.enable_parallel,
            ),
            numeric::numeric_statistics(ctx, table, &numeric_columns),
            numeric::correlation_matrix(ctx, table, &numeric_columns),
            categorical::date_parse_ratios(ctx, table, &text_columns, self.date_sample_size),
            business_task,
        );

        // Boolean-likeness reuses the distinct counts, so it runs after the
        // summaries rather than alongside them.
        let (boolean_columns, boolean_failures) =
            categorical::detect_boolean_columns(ctx, table, &summaries).await;

        let constant_columns: Vec<String> = summaries
            .iter()
            .filter(|s| s.is_constant() && s.non_null_count() > 0)
            .map(|s| s.column.clone())
            .collect();
        let null_percentages: Vec<NullPercentage> = summaries
            .iter()
            .map(|s| NullPercentage {
                column: s.column.clone(),
                null_percentage: s.null_percentage(),
            })
            .collect();

        let consolidated = consolidate(&schema, &summaries, self.high_cardinality_threshold);

        let mut diagnostics: Vec<ColumnFailure> = Vec::new();
        diagnostics.extend(summary_failures);
        diagnostics.extend(categorical_failures);
        diagnostics.extend(numeric_failures);
        diagnostics.extend(correlation_failures);
        diagnostics.extend(date_failures);
        diagnostics.extend(boolean_failures);
        diagnostics.extend(business_failures);
        if !diagnostics.is_empty() {
            info!(
                table,
                skipped = diagnostics.len(),
                "profiling completed with contained failures"
            );
        }

        Ok(TableReport {
            table: table.to_string(),
            dimensions: Dimensions {
                rows,
                columns: schema.len() as u64,
            },
            column_types: column_type_entries(&schema),
            schema,
            column_summary: summaries,
            numeric_stats: if numeric_columns.is_empty() {
                None
            } else {
                Some(numeric_stats)
            },
            constant_columns,
            null_percentages,
            categorical_distributions: categorical_analysis.distributions,
            dominance: categorical_analysis.dominance,
            entropy: categorical_analysis.entropy,
            boolean_columns,
            invalid_dates,
            correlation,
            business: business_metrics,
            consolidated,
            diagnostics,
        })
    }
}

fn column_type_entries(schema: &[ColumnDescriptor]) -> Vec<ColumnTypeEntry> {
    schema
        .iter()
        .map(|d| ColumnTypeEntry {
            column: d.name.clone(),
            role: d.role,
        })
        .collect()
}

/// Builder for [`TableProfiler`].
#[derive(Debug, Clone, Default)]
pub struct TableProfilerBuilder {
    profiler: TableProfiler,
}

impl TableProfilerBuilder {
    /// Number of top values kept per categorical distribution.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.profiler.top_n = top_n;
        self
    }

    /// Minimum top-value share for a dominance record, in `[0, 1]`.
    pub fn dominance_threshold(mut self, threshold: f64) -> Self {
        self.profiler.dominance_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Maximum values sampled per column for the date-parseability probe.
    pub fn date_sample_size(mut self, sample_size: usize) -> Self {
        self.profiler.date_sample_size = sample_size;
        self
    }

    /// Distinct-count threshold above which textual columns lose quality
    /// score.
    pub fn high_cardinality_threshold(mut self, threshold: u64) -> Self {
        self.profiler.high_cardinality_threshold = threshold;
        self
    }

    /// Toggles concurrent per-column analysis.
    pub fn enable_parallel(mut self, enabled: bool) -> Self {
        self.profiler.enable_parallel = enabled;
        self
    }

    /// Remaps the business metric columns.
    pub fn business_columns(mut self, columns: BusinessColumns) -> Self {
        self.profiler.business_columns = Some(columns);
        self
    }

    /// Disables the business metric sections entirely.
    pub fn skip_business_metrics(mut self) -> Self {
        self.profiler.business_columns = None;
        self
    }

    pub fn build(self) -> TableProfiler {
        self.profiler
    }
}
