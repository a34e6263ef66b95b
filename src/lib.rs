//! # Tablescope - Dataset Profiling for Rust
//!
//! Tablescope profiles an arbitrary tabular dataset exposed through a
//! DataFusion [`SessionContext`] and produces a structured, multi-facet
//! quality report: per-column counts, categorical distributions, entropy and
//! dominance measures, numeric statistics and correlation, and grouped
//! business ratios. The report is plain serializable data, ready for a
//! renderer, a dashboard, or a language-model prompt.
//!
//! The engine never assumes a schema. It introspects the table at runtime,
//! classifies each column from its declared type, and generates the
//! aggregation queries it needs. Malformed or surprising data (all-null
//! columns, unparseable dates, columns that reject an aggregate) is contained
//! per column: the affected section is skipped with a diagnostic and the rest
//! of the report is still produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tablescope::prelude::*;
//!
//! # async fn example() -> tablescope::Result<()> {
//! let ctx = SessionContext::new();
//! // ... register your table on the context ...
//!
//! let profiler = TableProfiler::builder()
//!     .top_n(10)
//!     .dominance_threshold(0.95)
//!     .build();
//!
//! let report = profiler.profile(&ctx, "listings").await?;
//!
//! for row in &report.consolidated {
//!     println!(
//!         "{}: quality {:?}, nulls {:?}",
//!         row.column, row.quality_score, row.null_percentage
//!     );
//! }
//! for failure in &report.diagnostics {
//!     eprintln!("skipped {:?} in {}: {}", failure.column, failure.section, failure.reason);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`schema`**: runtime introspection (a fallback chain of strategies) and
//!   declared-type classification into semantic column roles.
//! - **`analyzers`**: the metric computations, one family per module —
//!   count summaries, categorical distributions, numeric statistics and
//!   correlation, grouped business metrics.
//! - **`report`**: the assembled [`report::TableReport`], consolidation and
//!   quality scoring.
//! - **`profiler`**: the [`profiler::TableProfiler`] orchestrator.
//! - **`security`**: identifier validation and quoting for generated SQL.
//!
//! Loading data into the context (CSV registration, views), rendering the
//! report, and any downstream summarization are deliberately out of scope;
//! the caller owns the [`SessionContext`] and the report consumer owns the
//! presentation.
//!
//! [`SessionContext`]: datafusion::prelude::SessionContext

pub mod analyzers;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod profiler;
pub mod report;
pub mod schema;
pub mod security;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

pub use error::{ProfileError, Result};
pub use profiler::{TableProfiler, TableProfilerBuilder};
pub use report::TableReport;
