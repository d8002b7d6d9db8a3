//! Credit sale (debt) models and repayment balance math
//!
//! The balance transitions live here as pure functions so the service layer
//! and the test suite run the same arithmetic. Invariant maintained by every
//! transition: `balance_owed + amount_payable_now == total_price` (up to the
//! documented floor on repayment deletion).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A credit sale. Consumes stock like an income record, and additionally
/// carries an outstanding balance paid down through repayments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    /// `pcs * unit_price`, fixed at write time
    pub total_price: Decimal,
    /// Amount collected so far (down payment plus repayments)
    pub amount_payable_now: Decimal,
    /// Outstanding amount, never negative
    pub balance_owed: Decimal,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derived debt state; nothing is persisted for this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DebtState {
    Open,
    PartiallyPaid,
    Settled,
}

impl Debt {
    pub fn state(&self) -> DebtState {
        if self.balance_owed.is_zero() {
            DebtState::Settled
        } else if self.balance_owed < self.total_price {
            DebtState::PartiallyPaid
        } else {
            DebtState::Open
        }
    }
}

/// One repayment against a debt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRepayment {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub receipt_number: String,
    pub created_at: DateTime<Utc>,
}

/// Balances of a debt as a value pair, before or after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtBalances {
    pub balance_owed: Decimal,
    pub amount_payable_now: Decimal,
}

/// Format a repayment receipt number from its sequence value
pub fn receipt_number(seq: i64) -> String {
    format!("REPAY-{:06}", seq)
}

/// Apply a new repayment: `balance_owed -= amount`,
/// `amount_payable_now += amount`. Rejects amounts exceeding the
/// outstanding balance.
pub fn apply_repayment(balances: DebtBalances, amount: Decimal) -> Result<DebtBalances, &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Repayment amount must be positive");
    }
    if amount > balances.balance_owed {
        return Err("Repayment exceeds outstanding balance");
    }
    Ok(DebtBalances {
        balance_owed: balances.balance_owed - amount,
        amount_payable_now: balances.amount_payable_now + amount,
    })
}

/// Revise an existing repayment from `old_amount` to `new_amount`,
/// shifting the balances by the difference. Rejects revisions that would
/// drive `balance_owed` negative.
pub fn revise_repayment(
    balances: DebtBalances,
    old_amount: Decimal,
    new_amount: Decimal,
) -> Result<DebtBalances, &'static str> {
    if new_amount <= Decimal::ZERO {
        return Err("Repayment amount must be positive");
    }
    let diff = new_amount - old_amount;
    if diff > balances.balance_owed {
        return Err("Revision would drive the balance negative");
    }
    Ok(DebtBalances {
        balance_owed: balances.balance_owed - diff,
        amount_payable_now: balances.amount_payable_now + diff,
    })
}

/// Reverse a deleted repayment: `balance_owed += amount`,
/// `amount_payable_now = max(0, amount_payable_now - amount)`.
///
/// The floor applies to `amount_payable_now` only; `balance_owed` is
/// restored without one. That asymmetry is long-standing recorded behavior
/// and is kept as is.
pub fn reverse_repayment(balances: DebtBalances, amount: Decimal) -> DebtBalances {
    DebtBalances {
        balance_owed: balances.balance_owed + amount,
        amount_payable_now: (balances.amount_payable_now - amount).max(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(owed: i64, payable: i64) -> DebtBalances {
        DebtBalances {
            balance_owed: Decimal::from(owed),
            amount_payable_now: Decimal::from(payable),
        }
    }

    #[test]
    fn apply_moves_amount_between_sides() {
        let after = apply_repayment(balances(1000, 0), Decimal::from(400)).unwrap();
        assert_eq!(after, balances(600, 400));
    }

    #[test]
    fn apply_rejects_over_balance() {
        assert!(apply_repayment(balances(300, 700), Decimal::from(301)).is_err());
        assert!(apply_repayment(balances(300, 700), Decimal::from(300)).is_ok());
    }

    #[test]
    fn revise_applies_signed_difference() {
        let after = revise_repayment(balances(600, 400), Decimal::from(400), Decimal::from(250)).unwrap();
        assert_eq!(after, balances(750, 250));

        let after = revise_repayment(balances(600, 400), Decimal::from(400), Decimal::from(900)).unwrap();
        assert_eq!(after, balances(100, 900));
    }

    #[test]
    fn revise_rejects_negative_result() {
        assert!(revise_repayment(balances(100, 900), Decimal::from(400), Decimal::from(600)).is_err());
    }

    #[test]
    fn reverse_undoes_apply() {
        let start = balances(1000, 0);
        let applied = apply_repayment(start, Decimal::from(400)).unwrap();
        assert_eq!(reverse_repayment(applied, Decimal::from(400)), start);
    }

    #[test]
    fn receipt_numbers_are_zero_padded() {
        assert_eq!(receipt_number(1), "REPAY-000001");
        assert_eq!(receipt_number(42), "REPAY-000042");
        assert_eq!(receipt_number(1_000_000), "REPAY-1000000");
    }
}
