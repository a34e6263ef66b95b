//! Property tests for the pure metric computations.

use proptest::prelude::*;

use tablescope::analyzers::categorical::ColumnDistribution;
use tablescope::analyzers::ColumnSummary;
use tablescope::report::quality_score;

fn distribution(counts: Vec<u64>) -> ColumnDistribution {
    let total: u64 = counts.iter().sum();
    ColumnDistribution {
        column: "c".to_string(),
        value_counts: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| (format!("v{i}"), count))
            .collect(),
        non_null_total: total,
    }
}

proptest! {
    #[test]
    fn entropy_is_bounded_by_log2_of_cardinality(
        counts in prop::collection::vec(1u64..10_000, 1..64)
    ) {
        let k = counts.len() as f64;
        let dist = distribution(counts);
        let bits = dist.entropy_bits().unwrap();

        prop_assert!(bits >= 0.0);
        // log2(k) plus slack for the epsilon guard and 3-decimal rounding.
        prop_assert!(bits <= k.log2() + 1e-2);
    }

    #[test]
    fn dominance_is_a_valid_share(
        counts in prop::collection::vec(1u64..10_000, 1..64)
    ) {
        let dist = distribution(counts);
        let ratio = dist.dominance_ratio().unwrap();
        prop_assert!(ratio > 0.0);
        prop_assert!(ratio <= 1.0);
    }

    #[test]
    fn quality_score_stays_in_unit_interval(
        total in 0u64..1_000_000,
        distinct in 0u64..1_000_000,
        nulls in 0u64..1_000_000,
        textual in prop::bool::ANY,
        threshold in 1u64..10_000,
    ) {
        let summary = ColumnSummary {
            column: "c".to_string(),
            total_count: total,
            distinct_count: distinct,
            null_count: nulls.min(total),
        };
        let declared = if textual { "VARCHAR" } else { "BIGINT" };
        let score = quality_score(&summary, declared, threshold);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn null_percentage_is_scaled(
        total in 1u64..1_000_000,
        nulls in 0u64..1_000_000,
    ) {
        let summary = ColumnSummary {
            column: "c".to_string(),
            total_count: total,
            distinct_count: 1,
            null_count: nulls.min(total),
        };
        let pct = summary.null_percentage();
        prop_assert!((0.0..=100.0).contains(&pct));
    }
}
