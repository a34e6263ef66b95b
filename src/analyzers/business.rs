//! Grouped business-metric aggregations.
//!
//! Every metric is one `GROUP BY` aggregation over a configurable grouping
//! key (seller, store, brand). Metrics are independent: a missing column or
//! failing query voids that one metric with a diagnostic and leaves the rest
//! standing. Ratios guard their divisors with `CASE WHEN`, so a zero
//! denominator surfaces as SQL `NULL` rather than a fault.

use std::collections::BTreeMap;

use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::errors::{AnalyzerError, AnalyzerResult, ColumnFailure};
use super::{batch, quote_ident};

/// Column names the business metrics operate on.
///
/// Defaults match marketplace listing exports; any field can be remapped for
/// other datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessColumns {
    /// Grouping key for every metric.
    pub group_key: String,
    pub title: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub condition: String,
    pub sold: String,
}

impl Default for BusinessColumns {
    fn default() -> Self {
        Self {
            group_key: "seller_nickname".to_string(),
            title: "title".to_string(),
            price: "price".to_string(),
            stock: "stock".to_string(),
            category: "category_id".to_string(),
            condition: "condition".to_string(),
            sold: "sold_quantity".to_string(),
        }
    }
}

/// One group's row of a business metric.
///
/// `values` carries the headline ratio and its supporting counts under the
/// query's output names (e.g. `variety_index`, `total_listings`,
/// `distinct_titles`). A `None` value is an undefined ratio for that group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetricRow {
    pub group: String,
    pub values: BTreeMap<String, Option<f64>>,
}

/// All business metric sections. `None` means the metric could not be
/// computed at all (see the accompanying diagnostics).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub variety_index: Option<Vec<GroupMetricRow>>,
    pub price_dispersion: Option<Vec<GroupMetricRow>>,
    pub premium_share: Option<Vec<GroupMetricRow>>,
    pub category_density: Option<Vec<GroupMetricRow>>,
    pub stock_listing_ratio: Option<Vec<GroupMetricRow>>,
    pub condition_ratio: Option<Vec<GroupMetricRow>>,
    pub below_average_price: Option<Vec<GroupMetricRow>>,
    pub turnover_rate: Option<Vec<GroupMetricRow>>,
}

/// Computes every business metric for the table.
#[instrument(skip(ctx, columns))]
pub async fn compute_business_metrics(
    ctx: &SessionContext,
    table: &str,
    columns: &BusinessColumns,
) -> (BusinessMetrics, Vec<ColumnFailure>) {
    let mut metrics = BusinessMetrics::default();
    let mut failures = Vec::new();

    let globals = match price_globals(ctx, table, columns).await {
        Ok(globals) => Some(globals),
        Err(e) => {
            warn!(error = %e, "global price reference query failed");
            failures.push(ColumnFailure::for_section("price_globals", &e));
            None
        }
    };

    let specs: Vec<(&str, AnalyzerResult<String>)> = vec![
        ("variety_index", variety_index_sql(table, columns)),
        ("price_dispersion", price_dispersion_sql(table, columns)),
        (
            "premium_share",
            premium_share_sql(table, columns, globals.as_ref().and_then(|g| g.p75)),
        ),
        ("category_density", category_density_sql(table, columns)),
        (
            "stock_listing_ratio",
            stock_listing_ratio_sql(table, columns),
        ),
        ("condition_ratio", condition_ratio_sql(table, columns)),
        (
            "below_average_price",
            below_average_price_sql(table, columns, globals.as_ref().and_then(|g| g.mean)),
        ),
        ("turnover_rate", turnover_rate_sql(table, columns)),
    ];

    for (name, sql) in specs {
        let outcome = match sql {
            Ok(sql) => run_grouped(ctx, &sql).await,
            Err(e) => Err(e),
        };
        let slot = match name {
            "variety_index" => &mut metrics.variety_index,
            "price_dispersion" => &mut metrics.price_dispersion,
            "premium_share" => &mut metrics.premium_share,
            "category_density" => &mut metrics.category_density,
            "stock_listing_ratio" => &mut metrics.stock_listing_ratio,
            "condition_ratio" => &mut metrics.condition_ratio,
            "below_average_price" => &mut metrics.below_average_price,
            _ => &mut metrics.turnover_rate,
        };
        match outcome {
            Ok(rows) => *slot = Some(rows),
            Err(e) => {
                warn!(metric = name, error = %e, "business metric failed, skipping");
                failures.push(ColumnFailure::for_section(name, &e));
            }
        }
    }

    (metrics, failures)
}

/// Dataset-wide price reference values, computed once and substituted as
/// literals into the grouped queries.
#[derive(Debug, Clone, Copy)]
struct PriceGlobals {
    p75: Option<f64>,
    mean: Option<f64>,
}

async fn price_globals(
    ctx: &SessionContext,
    table: &str,
    columns: &BusinessColumns,
) -> AnalyzerResult<PriceGlobals> {
    let table_sql = quote_ident(table)?;
    let price = quote_ident(&columns.price)?;
    let sql = format!(
        "SELECT \
            approx_percentile_cont(CAST({price} AS DOUBLE), 0.75), \
            AVG(CAST({price} AS DOUBLE)) \
         FROM {table_sql}"
    );
    let batches = ctx.sql(&sql).await?.collect().await?;
    let Some(first) = batches.iter().find(|b| b.num_rows() > 0) else {
        return Ok(PriceGlobals {
            p75: None,
            mean: None,
        });
    };
    Ok(PriceGlobals {
        p75: batch::scalar_opt_f64(first, 0)?,
        mean: batch::scalar_opt_f64(first, 1)?,
    })
}

fn variety_index_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let title = quote_ident(&c.title)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            COUNT(DISTINCT {title}) AS distinct_titles, \
            CASE WHEN COUNT(*) = 0 THEN NULL \
                 ELSE CAST(COUNT(DISTINCT {title}) AS DOUBLE) / COUNT(*) END AS variety_index \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn price_dispersion_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let price = quote_ident(&c.price)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            AVG(CAST({price} AS DOUBLE)) AS avg_price, \
            STDDEV(CAST({price} AS DOUBLE)) AS price_dispersion \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn premium_share_sql(
    table: &str,
    c: &BusinessColumns,
    p75: Option<f64>,
) -> AnalyzerResult<String> {
    let Some(p75) = p75 else {
        return Err(AnalyzerError::invalid_data(
            "75th percentile price unavailable",
        ));
    };
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let price = quote_ident(&c.price)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            SUM(CASE WHEN CAST({price} AS DOUBLE) > {p75} THEN 1 ELSE 0 END) AS premium_listings, \
            CASE WHEN COUNT(*) = 0 THEN NULL \
                 ELSE CAST(SUM(CASE WHEN CAST({price} AS DOUBLE) > {p75} THEN 1 ELSE 0 END) AS DOUBLE) \
                      / COUNT(*) END AS premium_share \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn category_density_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let category = quote_ident(&c.category)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            COUNT(DISTINCT {category}) AS distinct_categories, \
            CASE WHEN COUNT(DISTINCT {category}) = 0 THEN NULL \
                 ELSE CAST(COUNT(*) AS DOUBLE) / COUNT(DISTINCT {category}) END AS category_density \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn stock_listing_ratio_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let stock = quote_ident(&c.stock)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            AVG(CAST({stock} AS DOUBLE)) AS avg_stock, \
            CASE WHEN COUNT(*) = 0 THEN NULL \
                 ELSE AVG(CAST({stock} AS DOUBLE)) / COUNT(*) END AS stock_listing_ratio \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn condition_ratio_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let condition = quote_ident(&c.condition)?;
    // Condition values arrive in mixed case depending on the export.
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            SUM(CASE WHEN LOWER({condition}) = 'new' THEN 1 ELSE 0 END) AS new_listings, \
            SUM(CASE WHEN LOWER({condition}) = 'used' THEN 1 ELSE 0 END) AS used_listings, \
            CASE WHEN SUM(CASE WHEN LOWER({condition}) = 'used' THEN 1 ELSE 0 END) = 0 THEN NULL \
                 ELSE CAST(SUM(CASE WHEN LOWER({condition}) = 'new' THEN 1 ELSE 0 END) AS DOUBLE) \
                      / SUM(CASE WHEN LOWER({condition}) = 'used' THEN 1 ELSE 0 END) END AS condition_ratio \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn below_average_price_sql(
    table: &str,
    c: &BusinessColumns,
    mean: Option<f64>,
) -> AnalyzerResult<String> {
    let Some(mean) = mean else {
        return Err(AnalyzerError::invalid_data("global average price unavailable"));
    };
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let price = quote_ident(&c.price)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            COUNT(*) AS total_listings, \
            SUM(CASE WHEN CAST({price} AS DOUBLE) < {mean} THEN 1 ELSE 0 END) AS below_average_listings, \
            CASE WHEN COUNT(*) = 0 THEN NULL \
                 ELSE CAST(SUM(CASE WHEN CAST({price} AS DOUBLE) < {mean} THEN 1 ELSE 0 END) AS DOUBLE) \
                      / COUNT(*) END AS below_average_price \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

fn turnover_rate_sql(table: &str, c: &BusinessColumns) -> AnalyzerResult<String> {
    let t = quote_ident(table)?;
    let g = quote_ident(&c.group_key)?;
    let sold = quote_ident(&c.sold)?;
    let stock = quote_ident(&c.stock)?;
    Ok(format!(
        "SELECT CAST({g} AS VARCHAR) AS grp, \
            SUM(CAST({sold} AS DOUBLE)) AS sold_total, \
            SUM(CAST({stock} AS DOUBLE)) AS stock_total, \
            CASE WHEN COALESCE(SUM(CAST({stock} AS DOUBLE)), 0) = 0 THEN NULL \
                 ELSE SUM(CAST({sold} AS DOUBLE)) / SUM(CAST({stock} AS DOUBLE)) END AS turnover_rate \
         FROM {t} WHERE {g} IS NOT NULL GROUP BY {g} ORDER BY grp"
    ))
}

/// Runs one grouped query and reshapes it into metric rows.
///
/// Column 0 is the group value; every other output column lands in `values`
/// under its query alias.
async fn run_grouped(ctx: &SessionContext, sql: &str) -> AnalyzerResult<Vec<GroupMetricRow>> {
    let batches = ctx.sql(sql).await?.collect().await?;

    let mut rows = Vec::new();
    for b in &batches {
        let schema = b.schema();
        for row in 0..b.num_rows() {
            let group = batch::string_at(b.column(0).as_ref(), row, "grp")?;
            let mut values = BTreeMap::new();
            for (idx, field) in schema.fields().iter().enumerate().skip(1) {
                values.insert(
                    field.name().clone(),
                    batch::opt_f64_at(b.column(idx).as_ref(), row)?,
                );
            }
            rows.push(GroupMetricRow { group, values });
        }
    }
    Ok(rows)
}
