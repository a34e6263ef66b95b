//! Convenience re-exports for the common profiling workflow.
//!
//! ```rust,no_run
//! use tablescope::prelude::*;
//!
//! # async fn example() -> tablescope::Result<()> {
//! let ctx = SessionContext::new();
//! // ... register a table ...
//! let report = TableProfiler::new().profile(&ctx, "listings").await?;
//! println!("{}", serde_json::to_string_pretty(&report.to_json()?).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub use crate::analyzers::{BusinessColumns, ColumnFailure, ColumnSummary};
pub use crate::error::{ProfileError, Result};
pub use crate::profiler::{TableProfiler, TableProfilerBuilder};
pub use crate::report::{ConsolidatedColumn, TableReport};
pub use crate::schema::{ColumnDescriptor, ColumnRole, SchemaIntrospector};

pub use datafusion::prelude::SessionContext;
