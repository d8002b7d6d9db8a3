//! Debt balance consistency tests
//!
//! Covers the repayment rules:
//! - `balance_owed + amount_payable_now == total_price` after every
//!   create/update/delete of a repayment
//! - a repayment larger than the outstanding balance is rejected
//! - deleting a repayment exactly reverses its creation
//! - the asymmetric zero floor on `amount_payable_now` during deletion
//! - derived debt state transitions

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::{
    apply_repayment, receipt_number, reverse_repayment, revise_repayment, Debt, DebtBalances,
    DebtState,
};

fn balances(owed: i64, payable: i64) -> DebtBalances {
    DebtBalances {
        balance_owed: Decimal::from(owed),
        amount_payable_now: Decimal::from(payable),
    }
}

fn debt_with(total: i64, owed: i64, payable: i64) -> Debt {
    Debt {
        id: uuid::Uuid::new_v4(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        name: "Cement 50kg".to_string(),
        pcs: 4,
        unit_price: Decimal::from(total / 4),
        total_price: Decimal::from(total),
        amount_payable_now: Decimal::from(payable),
        balance_owed: Decimal::from(owed),
        client_name: Some("A. Client".to_string()),
        client_phone: None,
        seller_name: None,
        created_at: chrono::Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn repayment_moves_amount_across() {
        // Debt of 1000, repay 400: balance drops to 600.
        let after = apply_repayment(balances(1000, 0), Decimal::from(400)).unwrap();
        assert_eq!(after, balances(600, 400));
    }

    #[test]
    fn repayment_over_balance_is_rejected() {
        let start = balances(600, 400);
        assert!(apply_repayment(start, Decimal::from(601)).is_err());
        // Paying off the exact balance is allowed.
        let settled = apply_repayment(start, Decimal::from(600)).unwrap();
        assert_eq!(settled, balances(0, 1000));
    }

    #[test]
    fn non_positive_repayments_are_rejected() {
        assert!(apply_repayment(balances(500, 0), Decimal::ZERO).is_err());
        assert!(apply_repayment(balances(500, 0), Decimal::from(-10)).is_err());
        assert!(revise_repayment(balances(500, 0), Decimal::from(100), Decimal::ZERO).is_err());
    }

    #[test]
    fn delete_exactly_reverses_create() {
        // Debt with total_price=1000: repay 400 -> balance 600; delete the
        // repayment -> balance back to 1000.
        let start = balances(1000, 0);
        let after_create = apply_repayment(start, Decimal::from(400)).unwrap();
        assert_eq!(after_create.balance_owed, Decimal::from(600));
        let after_delete = reverse_repayment(after_create, Decimal::from(400));
        assert_eq!(after_delete, start);
    }

    #[test]
    fn revise_shifts_by_difference_both_ways() {
        let start = balances(600, 400);
        let smaller = revise_repayment(start, Decimal::from(400), Decimal::from(150)).unwrap();
        assert_eq!(smaller, balances(850, 150));
        let larger = revise_repayment(start, Decimal::from(400), Decimal::from(1000)).unwrap();
        assert_eq!(larger, balances(0, 1000));
    }

    #[test]
    fn revise_cannot_drive_balance_negative() {
        assert!(revise_repayment(balances(100, 900), Decimal::from(400), Decimal::from(501)).is_err());
    }

    /// Deleting a repayment floors `amount_payable_now` at zero while
    /// `balance_owed` is restored without a floor. The asymmetry is
    /// intentional, recorded behavior.
    #[test]
    fn delete_floors_amount_payable_at_zero() {
        // A debt revised after partial collection can hold less in
        // amount_payable_now than the repayment being deleted.
        let skewed = balances(700, 100);
        let after = reverse_repayment(skewed, Decimal::from(300));
        assert_eq!(after.amount_payable_now, Decimal::ZERO);
        assert_eq!(after.balance_owed, Decimal::from(1000));
    }

    #[test]
    fn receipt_numbers_zero_pad_to_six() {
        assert_eq!(receipt_number(7), "REPAY-000007");
        assert_eq!(receipt_number(123456), "REPAY-123456");
    }

    #[test]
    fn debt_state_is_derived_from_balance() {
        assert_eq!(debt_with(1000, 1000, 0).state(), DebtState::Open);
        assert_eq!(debt_with(1000, 400, 600).state(), DebtState::PartiallyPaid);
        assert_eq!(debt_with(1000, 0, 1000).state(), DebtState::Settled);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=2000).prop_map(Decimal::from)
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(Decimal),
        Revise(usize, Decimal),
        Delete(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            amount_strategy().prop_map(Op::Create),
            ((0usize..8), amount_strategy()).prop_map(|(i, a)| Op::Revise(i, a)),
            (0usize..8).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// `balance_owed + amount_payable_now == total_price` holds after
        /// every accepted repayment create/revise/delete, and the balance
        /// never goes negative.
        #[test]
        fn invariant_across_repayment_history(
            total in 100i64..=5000,
            ops in prop::collection::vec(op_strategy(), 1..30)
        ) {
            let total_price = Decimal::from(total);
            let mut state = DebtBalances {
                balance_owed: total_price,
                amount_payable_now: Decimal::ZERO,
            };
            let mut repayments: Vec<Decimal> = Vec::new();

            for op in ops {
                match op {
                    Op::Create(amount) => {
                        if let Ok(next) = apply_repayment(state, amount) {
                            state = next;
                            repayments.push(amount);
                        }
                    }
                    Op::Revise(idx, new_amount) => {
                        if !repayments.is_empty() {
                            let idx = idx % repayments.len();
                            let old = repayments[idx];
                            if let Ok(next) = revise_repayment(state, old, new_amount) {
                                state = next;
                                repayments[idx] = new_amount;
                            }
                        }
                    }
                    Op::Delete(idx) => {
                        if !repayments.is_empty() {
                            let amount = repayments.remove(idx % repayments.len());
                            state = reverse_repayment(state, amount);
                        }
                    }
                }

                prop_assert!(state.balance_owed >= Decimal::ZERO);
                prop_assert_eq!(state.balance_owed + state.amount_payable_now, total_price);
            }

            // Cumulative accepted repayments never exceed the original total.
            let collected: Decimal = repayments.iter().copied().sum();
            prop_assert!(collected <= total_price);
        }

        /// Any repayment above the outstanding balance is rejected and
        /// leaves the balances untouched.
        #[test]
        fn over_balance_always_rejected(
            owed in 0i64..=1000,
            payable in 0i64..=1000,
            excess in 1i64..=1000
        ) {
            let state = balances(owed, payable);
            let result = apply_repayment(state, Decimal::from(owed + excess));
            prop_assert!(result.is_err());
        }

        /// Delete is the exact inverse of create for any accepted amount.
        #[test]
        fn delete_is_inverse_of_create(total in 1i64..=5000, amount in 1i64..=5000) {
            let start = DebtBalances {
                balance_owed: Decimal::from(total),
                amount_payable_now: Decimal::ZERO,
            };
            if let Ok(applied) = apply_repayment(start, Decimal::from(amount)) {
                prop_assert_eq!(reverse_repayment(applied, Decimal::from(amount)), start);
            }
        }
    }
}
