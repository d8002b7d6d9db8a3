//! Deficiency alerting tests
//!
//! Covers the low-stock alert rules:
//! - an alert appears iff `threshold > 0 && available_stock <= threshold`
//! - alerts sort ascending by `available_stock` (most depleted first)

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{rank_deficiency_alerts, DeficiencyAlert, PurchaseLot};

fn lot(stock: i32, threshold: i32) -> PurchaseLot {
    PurchaseLot {
        id: Uuid::new_v4(),
        date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        name: "Sugar 1kg".to_string(),
        pcs: 50,
        unit_price: Decimal::from(700),
        total_amount: Decimal::from(35_000),
        available_stock: stock,
        stock_deficiency_threshold: threshold,
        created_at: chrono::Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn alert_at_or_below_threshold() {
        // Threshold 5: stock 3 alerts, stock 6 does not.
        assert!(lot(3, 5).is_deficient());
        assert!(!lot(6, 5).is_deficient());
    }

    #[test]
    fn alert_at_exact_threshold() {
        assert!(lot(5, 5).is_deficient());
    }

    #[test]
    fn zero_threshold_disables_alerting() {
        assert!(!lot(0, 0).is_deficient());
        assert!(!lot(100, 0).is_deficient());
    }

    #[test]
    fn exhausted_lot_alerts_when_threshold_set() {
        assert!(lot(0, 1).is_deficient());
    }

    #[test]
    fn alerts_order_most_depleted_first() {
        let alerts = vec![
            DeficiencyAlert { lot: lot(4, 5), pcs_sold: 46 },
            DeficiencyAlert { lot: lot(0, 5), pcs_sold: 50 },
            DeficiencyAlert { lot: lot(2, 5), pcs_sold: 48 },
        ];
        let ranked = rank_deficiency_alerts(alerts);
        let stocks: Vec<i32> = ranked.iter().map(|a| a.lot.available_stock).collect();
        assert_eq!(stocks, vec![0, 2, 4]);
    }

    /// `pcs_sold` is carried as its own recomputed figure; it is not
    /// required to agree with `pcs - available_stock`.
    #[test]
    fn pcs_sold_is_independent_of_stock_counter() {
        let alert = DeficiencyAlert { lot: lot(3, 5), pcs_sold: 99 };
        assert_ne!(alert.pcs_sold, (alert.lot.pcs - alert.lot.available_stock) as i64);
        assert!(alert.lot.is_deficient());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// The alert predicate is exactly
        /// `threshold > 0 && available_stock <= threshold`.
        #[test]
        fn alert_predicate_is_exact(stock in 0i32..=100, threshold in 0i32..=100) {
            let expected = threshold > 0 && stock <= threshold;
            prop_assert_eq!(lot(stock, threshold).is_deficient(), expected);
        }

        /// Ranking preserves every alert and orders them ascending by
        /// available stock.
        #[test]
        fn ranking_is_a_sorted_permutation(
            stocks in prop::collection::vec(0i32..=100, 0..20)
        ) {
            let alerts: Vec<DeficiencyAlert> = stocks
                .iter()
                .map(|&s| DeficiencyAlert { lot: lot(s, 100), pcs_sold: 0 })
                .collect();
            let count = alerts.len();
            let ranked = rank_deficiency_alerts(alerts);

            prop_assert_eq!(ranked.len(), count);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].lot.available_stock <= pair[1].lot.available_stock);
            }
        }
    }
}
