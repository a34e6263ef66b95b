//! In-memory table fixtures shared by the unit tests.
//!
//! Each fixture registers one `MemTable` on a fresh `SessionContext`. The
//! data is small but deliberately shaped: known null counts, a seller with
//! only new listings, a seller whose stock sums to zero, and a heavily
//! skewed status column.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::error::Result as DataFusionResult;
use datafusion::prelude::*;

/// A small marketplace listings table, registered as `listings`.
///
/// Sellers: `TECHSTORE` (new items only), `MODAHOGAR` (mixed conditions),
/// `OUTLET` (every row has zero stock).
pub async fn create_listings_context() -> DataFusionResult<SessionContext> {
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
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10])),
            Arc::new(StringArray::from(vec![
                "Smartphone X128",
                "Smartphone Y64",
                "Notebook Pro 15",
                "Sofa 3 Cuerpos",
                "Sofa 2 Cuerpos",
                "Mesa Comedor",
                "Radio Vintage",
                "TV Tubo 21",
                "Camara Compacta",
                "Silla Oficina",
            ])),
            Arc::new(StringArray::from(vec![
                "TECHSTORE",
                "TECHSTORE",
                "TECHSTORE",
                "MODAHOGAR",
                "MODAHOGAR",
                "MODAHOGAR",
                "OUTLET",
                "OUTLET",
                "TECHSTORE",
                "MODAHOGAR",
            ])),
            Arc::new(StringArray::from(vec![
                "MLA1055", "MLA1055", "MLA1648", "MLA1574", "MLA1574", "MLA1574", "MLA1000",
                "MLA1000", "MLA1039", "MLA1574",
            ])),
            Arc::new(Float64Array::from(vec![
                999.99, 799.0, 1500.0, 450.0, 300.0, 120.5, 35.0, 60.0, 250.0, 80.0,
            ])),
            Arc::new(Int64Array::from(vec![10, 8, 4, 2, 3, 6, 0, 0, 5, 12])),
            Arc::new(StringArray::from(vec![
                "new", "new", "new", "new", "used", "used", "used", "used", "new", "new",
            ])),
            Arc::new(Int64Array::from(vec![5, 3, 1, 0, 2, 4, 9, 7, 2, 1])),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("listings", Arc::new(table))?;
    Ok(ctx)
}

/// Ten users with exactly three null names, registered as `users_with_nulls`.
pub async fn create_table_with_nulls() -> DataFusionResult<SessionContext> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10])),
            Arc::new(StringArray::from(vec![
                Some("ana"),
                Some("bruno"),
                None,
                Some("carla"),
                None,
                Some("diego"),
                Some("elena"),
                None,
                Some("fabio"),
                Some("gina"),
            ])),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("users_with_nulls", Arc::new(table))?;
    Ok(ctx)
}

/// One hundred rows registered as `skewed`: `status` is 97% a single value,
/// `category_id` alternates evenly between two values.
pub async fn create_skewed_context() -> DataFusionResult<SessionContext> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("status", DataType::Utf8, false),
        Field::new("category_id", DataType::Utf8, false),
    ]));

    let statuses: Vec<&str> = (0..100)
        .map(|i| if i < 97 { "active" } else { "paused" })
        .collect();
    let categories: Vec<&str> = (0..100)
        .map(|i| if i % 2 == 0 { "MLA1000" } else { "MLA2000" })
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(statuses)),
            Arc::new(StringArray::from(categories)),
        ],
    )?;

    let ctx = SessionContext::new();
    let table = MemTable::try_new(schema, vec![vec![batch]])?;
    ctx.register_table("skewed", Arc::new(table))?;
    Ok(ctx)
}
