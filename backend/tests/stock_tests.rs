//! Stock consistency tests
//!
//! Covers the lot stock rules:
//! - available stock never goes negative
//! - a rejected sale performs no writes
//! - create/delete sequences conserve `initial_pcs - sum(active sale pcs)`
//! - two requests racing for the last unit produce exactly one winner

use proptest::prelude::*;

// ============================================================================
// Conditional-decrement model
// ============================================================================

/// The stock reservation rule as the database applies it: a single
/// conditional decrement that either lands fully or not at all.
fn try_reserve(available_stock: i32, pcs: i32) -> Result<i32, &'static str> {
    if pcs <= 0 {
        return Err("Unit count must be positive");
    }
    if available_stock >= pcs {
        Ok(available_stock - pcs)
    } else {
        Err("Insufficient stock")
    }
}

/// Stock restore on sale deletion
fn release(available_stock: i32, pcs: i32) -> i32 {
    available_stock + pcs
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn reserve_within_stock_succeeds() {
        assert_eq!(try_reserve(10, 3), Ok(7));
        assert_eq!(try_reserve(10, 10), Ok(0));
    }

    #[test]
    fn reserve_beyond_stock_fails_without_effect() {
        let stock = 5;
        let result = try_reserve(stock, 6);
        assert!(result.is_err());
        // The failed reservation left the counter untouched.
        assert_eq!(stock, 5);
    }

    #[test]
    fn reserve_rejects_non_positive_counts() {
        assert!(try_reserve(10, 0).is_err());
        assert!(try_reserve(10, -1).is_err());
    }

    #[test]
    fn delete_restores_exactly_what_was_sold() {
        let after_sale = try_reserve(10, 4).unwrap();
        assert_eq!(release(after_sale, 4), 10);
    }

    #[test]
    fn last_unit_has_exactly_one_winner() {
        // Two requests for the final unit resolve in sequence against the
        // authoritative counter; the conditional update admits only one.
        let stock = 1;
        let first = try_reserve(stock, 1);
        assert_eq!(first, Ok(0));
        let second = try_reserve(first.unwrap(), 1);
        assert!(second.is_err());
    }

    #[test]
    fn exhausted_lot_rejects_any_sale() {
        assert!(try_reserve(0, 1).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        Sell(i32),
        DeleteSale(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i32..=20).prop_map(Op::Sell),
            (0usize..16).prop_map(Op::DeleteSale),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Stock never goes negative and always equals
        /// `initial_pcs - sum(active sale pcs)` across any sequence of
        /// sale creations and deletions against one lot.
        #[test]
        fn stock_is_conserved(
            initial_pcs in 1i32..=100,
            ops in prop::collection::vec(op_strategy(), 1..40)
        ) {
            let mut stock = initial_pcs;
            let mut active_sales: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Sell(pcs) => {
                        match try_reserve(stock, pcs) {
                            Ok(next) => {
                                stock = next;
                                active_sales.push(pcs);
                            }
                            Err(_) => {
                                // Rejection must mean the request could not
                                // be covered, and must not move the counter.
                                prop_assert!(pcs > stock);
                            }
                        }
                    }
                    Op::DeleteSale(idx) => {
                        if !active_sales.is_empty() {
                            let pcs = active_sales.remove(idx % active_sales.len());
                            stock = release(stock, pcs);
                        }
                    }
                }

                prop_assert!(stock >= 0);
                let sold: i32 = active_sales.iter().sum();
                prop_assert_eq!(stock, initial_pcs - sold);
            }
        }

        /// A reservation for more than the available stock always fails.
        #[test]
        fn oversell_always_rejected(stock in 0i32..=50, extra in 1i32..=50) {
            prop_assert!(try_reserve(stock, stock + extra).is_err());
        }

        /// Draining a lot one unit at a time admits exactly `stock` sales.
        #[test]
        fn unit_sales_admit_exactly_stock_winners(stock in 0i32..=40) {
            let mut current = stock;
            let mut winners = 0;
            for _ in 0..(stock + 10) {
                if let Ok(next) = try_reserve(current, 1) {
                    current = next;
                    winners += 1;
                }
            }
            prop_assert_eq!(winners, stock);
            prop_assert_eq!(current, 0);
        }
    }
}
