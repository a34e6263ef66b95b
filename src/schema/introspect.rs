//! Multi-strategy schema introspection.

use arrow::array::{Array, LargeStringArray, StringArray, StringViewArray};
use arrow::record_batch::RecordBatch;
use datafusion::prelude::*;
use tracing::{debug, instrument, warn};

use super::ColumnDescriptor;
use crate::error::{ProfileError, Result};
use crate::security::SqlIdent;

/// Accepted aliases for the column-name field across introspection outputs.
const NAME_ALIASES: &[&str] = &["column_name", "name", "field"];
/// Accepted aliases for the declared-type field.
const TYPE_ALIASES: &[&str] = &["data_type", "type"];

/// Resolves a table's column names and declared types.
///
/// Three independent strategies are tried in order; the first one whose
/// result is non-empty and carries recognizable name/type fields wins:
///
/// 1. `DESCRIBE "table"` — the structured schema query.
/// 2. The catalog's table-provider Arrow schema.
/// 3. An `information_schema.columns` query (works only when the caller
///    enabled the information schema on the session).
///
/// Only when every strategy fails is the run aborted with
/// [`ProfileError::SchemaUnavailable`].
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Introspects `table`, returning its columns in declaration order.
    #[instrument(skip(ctx))]
    pub async fn introspect(ctx: &SessionContext, table: &str) -> Result<Vec<ColumnDescriptor>> {
        SqlIdent::validate(table)?;

        let mut failures: Vec<String> = Vec::new();

        match Self::via_describe(ctx, table).await {
            Ok(columns) if !columns.is_empty() => {
                debug!(table, strategy = "describe", columns = columns.len(), "schema resolved");
                return Ok(columns);
            }
            Ok(_) => failures.push("DESCRIBE returned no columns".to_string()),
            Err(e) => failures.push(format!("DESCRIBE failed: {e}")),
        }

        match Self::via_table_provider(ctx, table).await {
            Ok(columns) if !columns.is_empty() => {
                debug!(table, strategy = "table_provider", columns = columns.len(), "schema resolved");
                return Ok(columns);
            }
            Ok(_) => failures.push("table provider schema is empty".to_string()),
            Err(e) => failures.push(format!("table provider lookup failed: {e}")),
        }

        match Self::via_information_schema(ctx, table).await {
            Ok(columns) if !columns.is_empty() => {
                debug!(table, strategy = "information_schema", columns = columns.len(), "schema resolved");
                return Ok(columns);
            }
            Ok(_) => failures.push("information_schema returned no rows".to_string()),
            Err(e) => failures.push(format!("information_schema query failed: {e}")),
        }

        warn!(table, ?failures, "every schema introspection strategy failed");
        Err(ProfileError::schema_unavailable(table, failures.join("; ")))
    }

    async fn via_describe(ctx: &SessionContext, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let sql = format!("DESCRIBE {}", SqlIdent::quote(table)?);
        let batches = ctx.sql(&sql).await?.collect().await?;
        Self::descriptors_from_batches(&batches)
    }

    async fn via_table_provider(ctx: &SessionContext, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let provider = ctx.table_provider(table).await?;
        let schema = provider.schema();
        Ok(schema
            .fields()
            .iter()
            .map(|field| ColumnDescriptor::new(field.name(), field.data_type().to_string()))
            .collect())
    }

    async fn via_information_schema(
        ctx: &SessionContext,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = '{}' ORDER BY ordinal_position",
            SqlIdent::string_literal(table)
        );
        let batches = ctx.sql(&sql).await?.collect().await?;
        Self::descriptors_from_batches(&batches)
    }

    /// Extracts descriptors from a result set, locating the name/type columns
    /// under any of the known aliases.
    fn descriptors_from_batches(batches: &[RecordBatch]) -> Result<Vec<ColumnDescriptor>> {
        let Some(first) = batches.iter().find(|b| b.num_rows() > 0) else {
            return Ok(Vec::new());
        };

        let schema = first.schema();
        let find_index = |aliases: &[&str]| {
            schema
                .fields()
                .iter()
                .position(|f| aliases.contains(&f.name().to_ascii_lowercase().as_str()))
        };

        let (Some(name_idx), Some(type_idx)) = (find_index(NAME_ALIASES), find_index(TYPE_ALIASES))
        else {
            // Unrecognizable shape counts as an empty result so the caller
            // falls through to the next strategy.
            return Ok(Vec::new());
        };

        let mut columns = Vec::new();
        for batch in batches {
            for row in 0..batch.num_rows() {
                let name = string_cell(batch.column(name_idx).as_ref(), row);
                let declared = string_cell(batch.column(type_idx).as_ref(), row);
                if let (Some(name), Some(declared)) = (name, declared) {
                    columns.push(ColumnDescriptor::new(name, declared));
                }
            }
        }
        Ok(columns)
    }
}

/// Reads a string cell from any of the string array flavors DataFusion emits.
fn string_cell(array: &dyn Array, row: usize) -> Option<String> {
    if array.is_null(row) {
        return None;
    }
    if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<StringViewArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<LargeStringArray>() {
        Some(arr.value(row).to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_listings_context;

    #[tokio::test]
    async fn describe_and_provider_agree() {
        let ctx = create_listings_context().await.unwrap();

        let via_describe = SchemaIntrospector::via_describe(&ctx, "listings")
            .await
            .unwrap();
        let via_provider = SchemaIntrospector::via_table_provider(&ctx, "listings")
            .await
            .unwrap();

        let names = |cols: &[ColumnDescriptor]| {
            cols.iter().map(|c| c.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&via_describe), names(&via_provider));
        assert!(!via_describe.is_empty());
    }

    #[tokio::test]
    async fn missing_table_is_fatal() {
        let ctx = SessionContext::new();
        let err = SchemaIntrospector::introspect(&ctx, "no_such_table")
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::SchemaUnavailable { .. }));
    }

    #[tokio::test]
    async fn invalid_table_name_rejected_before_any_query() {
        let ctx = SessionContext::new();
        let err = SchemaIntrospector::introspect(&ctx, "t; DROP TABLE x")
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidIdentifier(_)));
    }
}
