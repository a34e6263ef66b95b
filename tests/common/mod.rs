//! Shared fixtures for the integration tests.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::error::Result as DataFusionResult;
use datafusion::prelude::*;

/// Three rows with one column per role family, registered as `sample`.
pub async fn sample_context() -> DataFusionResult<SessionContext> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["A", "A", "B"])),
            Arc::new(Float64Array::from(vec![10.0, 20.0, 30.0])),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("sample", Arc::new(table))?;
    Ok(ctx)
}

/// A marketplace listings table, registered as `listings`.
///
/// `TECHSTORE` sells only new items; `OUTLET` rows carry zero stock.
pub async fn listings_context() -> DataFusionResult<SessionContext> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("seller_nickname", DataType::Utf8, false),
        Field::new("category_id", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("stock", DataType::Int64, false),
        Field::new("condition", DataType::Utf8, false),
        Field::new("sold_quantity", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6, 7, 8])),
            Arc::new(StringArray::from(vec![
                "Smartphone X128",
                "Smartphone Y64",
                "Notebook Pro 15",
                "Sofa 3 Cuerpos",
                "Mesa Comedor",
                "Radio Vintage",
                "TV Tubo 21",
                "Silla Oficina",
            ])),
            Arc::new(StringArray::from(vec![
                "TECHSTORE",
                "TECHSTORE",
                "TECHSTORE",
                "MODAHOGAR",
                "MODAHOGAR",
                "OUTLET",
                "OUTLET",
                "MODAHOGAR",
            ])),
            Arc::new(StringArray::from(vec![
                "MLA1055", "MLA1055", "MLA1648", "MLA1574", "MLA1574", "MLA1000", "MLA1000",
                "MLA1574",
            ])),
            Arc::new(Float64Array::from(vec![
                999.99, 799.0, 1500.0, 450.0, 120.5, 35.0, 60.0, 80.0,
            ])),
            Arc::new(Int64Array::from(vec![10, 8, 4, 2, 6, 0, 0, 12])),
            Arc::new(StringArray::from(vec![
                "new", "new", "new", "new", "used", "used", "used", "new",
            ])),
            Arc::new(Int64Array::from(vec![5, 3, 1, 0, 4, 9, 7, 1])),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("listings", Arc::new(table))?;
    Ok(ctx)
}

/// A table with one entirely null column and one constant column, registered
/// as `degenerate`.
pub async fn degenerate_context() -> DataFusionResult<SessionContext> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("missing", DataType::Utf8, true),
        Field::new("fixed", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
            Arc::new(StringArray::from(vec![
                None::<&str>,
                None,
                None,
                None,
            ])),
            Arc::new(StringArray::from(vec!["same", "same", "same", "same"])),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("degenerate", Arc::new(table))?;
    Ok(ctx)
}
