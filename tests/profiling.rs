//! End-to-end profiling runs against in-memory tables.

mod common;

use tablescope::prelude::*;
use tablescope::schema::ColumnRole;

#[tokio::test]
async fn profiles_a_small_mixed_table() {
    let ctx = common::sample_context().await.unwrap();
    let profiler = TableProfiler::builder()
        .skip_business_metrics()
        .build();
    let report = profiler.profile(&ctx, "sample").await.unwrap();

    assert_eq!(report.dimensions.rows, 3);
    assert_eq!(report.dimensions.columns, 3);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    // Roles: id-like name, textual, numeric.
    let role = |name: &str| {
        report
            .column_types
            .iter()
            .find(|t| t.column == name)
            .unwrap()
            .role
    };
    assert_eq!(role("id"), ColumnRole::Id);
    assert_eq!(role("category"), ColumnRole::Categorical);
    assert_eq!(role("price"), ColumnRole::Numeric);

    // Entropy of {A: 2/3, B: 1/3} is 0.918 bits.
    let entropy = report
        .entropy
        .iter()
        .find(|e| e.column == "category")
        .unwrap();
    assert!((entropy.entropy_bits - 0.918).abs() < 1e-3);

    // 2/3 dominance stays below the 0.95 threshold.
    assert!(report.dominance.is_empty());

    // Numeric statistics cover both numeric-typed columns.
    let stats = report.numeric_stats.as_ref().unwrap();
    let price = stats.iter().find(|s| s.column == "price").unwrap();
    assert_eq!(price.min, Some(10.0));
    assert_eq!(price.max, Some(30.0));
    assert_eq!(price.mean, Some(20.0));
    assert_eq!(price.stddev, Some(10.0));

    // id and price move in lockstep in this fixture.
    let correlation = report.correlation.as_ref().unwrap();
    assert_eq!(correlation.get("id", "price"), Some(1.0));
    assert_eq!(correlation.get("price", "price"), Some(1.0));

    // Clean columns all score 1.0.
    assert_eq!(report.consolidated.len(), 3);
    for row in &report.consolidated {
        assert_eq!(row.quality_score, Some(1.0));
        assert_eq!(row.null_percentage, Some(0.0));
    }

    assert!(report.constant_columns.is_empty());
    assert!(report.invalid_dates.is_empty());

    // Two distinct values makes `category` boolean-like.
    let boolean = report
        .boolean_columns
        .iter()
        .find(|b| b.column == "category")
        .unwrap();
    assert_eq!(boolean.values, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn business_metrics_on_a_listings_table() {
    let ctx = common::listings_context().await.unwrap();
    let report = TableProfiler::new().profile(&ctx, "listings").await.unwrap();

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    // TECHSTORE: 3 listings, 3 distinct titles.
    let variety = report.business.variety_index.as_ref().unwrap();
    let techstore = variety.iter().find(|r| r.group == "TECHSTORE").unwrap();
    assert_eq!(techstore.values.get("variety_index"), Some(&Some(1.0)));
    assert_eq!(techstore.values.get("total_listings"), Some(&Some(3.0)));

    // No used TECHSTORE listings: ratio undefined, not infinity.
    let conditions = report.business.condition_ratio.as_ref().unwrap();
    let techstore = conditions.iter().find(|r| r.group == "TECHSTORE").unwrap();
    assert_eq!(techstore.values.get("condition_ratio"), Some(&None));

    // OUTLET stock sums to zero: turnover undefined.
    let turnover = report.business.turnover_rate.as_ref().unwrap();
    let outlet = turnover.iter().find(|r| r.group == "OUTLET").unwrap();
    assert_eq!(outlet.values.get("turnover_rate"), Some(&None));

    // Groups come back sorted for stable output.
    let groups: Vec<&str> = variety.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(groups, vec!["MODAHOGAR", "OUTLET", "TECHSTORE"]);
}

#[tokio::test]
async fn missing_business_columns_degrade_to_diagnostics() {
    // `sample` has a price column but none of the other business columns.
    let ctx = common::sample_context().await.unwrap();
    let report = TableProfiler::new().profile(&ctx, "sample").await.unwrap();

    assert!(report.business.variety_index.is_none());
    assert!(report.business.condition_ratio.is_none());
    assert!(report
        .diagnostics
        .iter()
        .any(|f| f.section == "variety_index"));
    assert!(report
        .diagnostics
        .iter()
        .any(|f| f.section == "turnover_rate"));

    // The rest of the report is unaffected.
    assert_eq!(report.consolidated.len(), 3);
    assert!(report.numeric_stats.is_some());
}

#[tokio::test]
async fn degenerate_columns_are_contained() {
    let ctx = common::degenerate_context().await.unwrap();
    let profiler = TableProfiler::builder()
        .skip_business_metrics()
        .build();
    let report = profiler.profile(&ctx, "degenerate").await.unwrap();

    // The all-null column: full null percentage, no entropy record, not
    // listed as constant.
    let missing = report
        .consolidated
        .iter()
        .find(|r| r.column == "missing")
        .unwrap();
    assert_eq!(missing.null_percentage, Some(100.0));
    assert!((missing.quality_score.unwrap() - 0.8).abs() < 1e-9);
    assert!(!report.entropy.iter().any(|e| e.column == "missing"));
    assert!(!report.constant_columns.contains(&"missing".to_string()));

    // One numeric column still gets a correlation matrix: the 1x1 diagonal.
    let correlation = report.correlation.as_ref().unwrap();
    assert_eq!(correlation.columns, vec!["id".to_string()]);
    assert_eq!(correlation.cells, vec![vec![Some(1.0)]]);

    // The constant column: zero entropy, full dominance, half score.
    assert_eq!(report.constant_columns, vec!["fixed".to_string()]);
    let entropy = report.entropy.iter().find(|e| e.column == "fixed").unwrap();
    assert_eq!(entropy.entropy_bits, 0.0);
    let dominance = report
        .dominance
        .iter()
        .find(|d| d.column == "fixed")
        .unwrap();
    assert_eq!(dominance.dominance_ratio, 1.0);
    let fixed = report
        .consolidated
        .iter()
        .find(|r| r.column == "fixed")
        .unwrap();
    assert!((fixed.quality_score.unwrap() - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn report_serializes_to_json_sections() {
    let ctx = common::listings_context().await.unwrap();
    let report = TableProfiler::new().profile(&ctx, "listings").await.unwrap();

    let value = report.to_json().unwrap();
    for section in [
        "dimensions",
        "schema",
        "column_types",
        "column_summary",
        "numeric_stats",
        "constant_columns",
        "null_percentages",
        "categorical_distributions",
        "dominance",
        "entropy",
        "boolean_columns",
        "invalid_dates",
        "correlation",
        "variety_index",
        "condition_ratio",
        "turnover_rate",
        "consolidated",
        "diagnostics",
    ] {
        assert!(value.get(section).is_some(), "missing section {section}");
    }
}

#[tokio::test]
async fn unknown_table_aborts_with_schema_error() {
    let ctx = SessionContext::new();
    let err = TableProfiler::new()
        .profile(&ctx, "nowhere")
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::SchemaUnavailable { .. }));
}

#[tokio::test]
async fn hostile_table_name_is_rejected() {
    let ctx = SessionContext::new();
    let err = TableProfiler::new()
        .profile(&ctx, "t; DROP TABLE users--")
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::InvalidIdentifier(_)));
}
