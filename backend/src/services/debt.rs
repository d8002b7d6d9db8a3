//! Credit sale (debt) service and repayment handling
//!
//! Debts consume stock like income records and additionally carry an
//! outstanding balance. Every repayment operation locks the parent debt
//! row and applies the pure balance transitions from `shared::models`, so
//! `balance_owed + amount_payable_now == total_price` holds across any
//! create/update/delete history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::income::{parse_date_field, validate_sale_fields, SaleFilter};
use crate::services::stock;
use shared::models::{
    apply_repayment, receipt_number, reverse_repayment, revise_repayment, Debt, DebtBalances,
    DebtRepayment,
};
use shared::validation;

/// Debt service for credit sales and their repayments
#[derive(Clone)]
pub struct DebtService {
    db: PgPool,
}

/// Input for recording a credit sale
#[derive(Debug, Deserialize)]
pub struct CreateDebtInput {
    pub date: String,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    /// Down payment collected at the counter
    pub amount_payable_now: Option<Decimal>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
}

/// Input for updating a credit sale.
///
/// `balance_owed` is recomputed from the new total and the amount already
/// collected; stock is not re-adjusted when `pcs` changes.
#[derive(Debug, Deserialize)]
pub struct UpdateDebtInput {
    pub date: Option<String>,
    pub name: Option<String>,
    pub pcs: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
}

/// Input for recording a repayment
#[derive(Debug, Deserialize)]
pub struct CreateRepaymentInput {
    pub payment_date: String,
    pub amount: Decimal,
}

/// Input for revising a repayment
#[derive(Debug, Deserialize)]
pub struct UpdateRepaymentInput {
    pub payment_date: Option<String>,
    pub amount: Option<Decimal>,
}

/// Row for debt queries
#[derive(Debug, FromRow)]
struct DebtRow {
    id: Uuid,
    date: chrono::NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_price: Decimal,
    amount_payable_now: Decimal,
    balance_owed: Decimal,
    client_name: Option<String>,
    client_phone: Option<String>,
    seller_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DebtRow> for Debt {
    fn from(r: DebtRow) -> Self {
        Debt {
            id: r.id,
            date: r.date,
            name: r.name,
            pcs: r.pcs,
            unit_price: r.unit_price,
            total_price: r.total_price,
            amount_payable_now: r.amount_payable_now,
            balance_owed: r.balance_owed,
            client_name: r.client_name,
            client_phone: r.client_phone,
            seller_name: r.seller_name,
            created_at: r.created_at,
        }
    }
}

/// Row for repayment queries
#[derive(Debug, FromRow)]
struct RepaymentRow {
    id: Uuid,
    debt_id: Uuid,
    payment_date: chrono::NaiveDate,
    amount: Decimal,
    receipt_number: String,
    created_at: DateTime<Utc>,
}

impl From<RepaymentRow> for DebtRepayment {
    fn from(r: RepaymentRow) -> Self {
        DebtRepayment {
            id: r.id,
            debt_id: r.debt_id,
            payment_date: r.payment_date,
            amount: r.amount,
            receipt_number: r.receipt_number,
            created_at: r.created_at,
        }
    }
}

const DEBT_COLUMNS: &str = "id, date, name, pcs, unit_price, total_price, amount_payable_now, \
                            balance_owed, client_name, client_phone, seller_name, created_at";

const REPAYMENT_COLUMNS: &str = "id, debt_id, payment_date, amount, receipt_number, created_at";

impl DebtService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a credit sale, consuming stock from the matching lot
    pub async fn create(&self, input: CreateDebtInput) -> AppResult<Debt> {
        let date = parse_date_field(&input.date, "date")?;
        validate_sale_fields(&input.name, input.pcs, input.unit_price)?;

        let name = input.name.trim().to_string();
        let total_price = input.unit_price * Decimal::from(input.pcs);
        let amount_payable_now = input.amount_payable_now.unwrap_or(Decimal::ZERO);

        validation::validate_down_payment(amount_payable_now, total_price).map_err(|msg| {
            AppError::Validation {
                field: "amount_payable_now".to_string(),
                message: msg.to_string(),
            }
        })?;

        let balance_owed = total_price - amount_payable_now;

        let mut tx = self.db.begin().await?;

        stock::reserve_stock(&mut *tx, &name, input.pcs).await?;

        let row = sqlx::query_as::<_, DebtRow>(&format!(
            r#"
            INSERT INTO debts (date, name, pcs, unit_price, total_price, amount_payable_now, balance_owed, client_name, client_phone, seller_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {DEBT_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(&name)
        .bind(input.pcs)
        .bind(input.unit_price)
        .bind(total_price)
        .bind(amount_payable_now)
        .bind(balance_owed)
        .bind(&input.client_name)
        .bind(&input.client_phone)
        .bind(&input.seller_name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get a debt by id
    pub async fn get(&self, id: Uuid) -> AppResult<Debt> {
        let row = sqlx::query_as::<_, DebtRow>(&format!(
            "SELECT {DEBT_COLUMNS} FROM debts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        Ok(row.into())
    }

    /// List debts, optionally limited to a date range
    pub async fn list(&self, filter: &SaleFilter) -> AppResult<Vec<Debt>> {
        let start = match &filter.start_date {
            Some(s) => Some(parse_date_field(s, "start_date")?),
            None => None,
        };
        let end = match &filter.end_date {
            Some(s) => Some(parse_date_field(s, "end_date")?),
            None => None,
        };

        let rows = sqlx::query_as::<_, DebtRow>(&format!(
            r#"
            SELECT {DEBT_COLUMNS} FROM debts
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a debt. Recomputes `total_price` and `balance_owed`; rejects
    /// an update that would owe less than has already been collected.
    pub async fn update(&self, id: Uuid, input: UpdateDebtInput) -> AppResult<Debt> {
        let mut tx = self.db.begin().await?;

        let existing: Debt = sqlx::query_as::<_, DebtRow>(&format!(
            "SELECT {DEBT_COLUMNS} FROM debts WHERE id = $1 FOR UPDATE",
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?
        .into();

        let date = match &input.date {
            Some(s) => parse_date_field(s, "date")?,
            None => existing.date,
        };
        let name = input.name.unwrap_or(existing.name);
        let pcs = input.pcs.unwrap_or(existing.pcs);
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        validate_sale_fields(&name, pcs, unit_price)?;

        let total_price = unit_price * Decimal::from(pcs);
        let balance_owed = total_price - existing.amount_payable_now;
        if balance_owed < Decimal::ZERO {
            return Err(AppError::NegativeBalance);
        }

        let row = sqlx::query_as::<_, DebtRow>(&format!(
            r#"
            UPDATE debts
            SET date = $1, name = $2, pcs = $3, unit_price = $4, total_price = $5,
                balance_owed = $6,
                client_name = COALESCE($7, client_name),
                client_phone = COALESCE($8, client_phone),
                seller_name = COALESCE($9, seller_name)
            WHERE id = $10
            RETURNING {DEBT_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(name.trim())
        .bind(pcs)
        .bind(unit_price)
        .bind(total_price)
        .bind(balance_owed)
        .bind(&input.client_name)
        .bind(&input.client_phone)
        .bind(&input.seller_name)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a debt, restoring its stock. Repayments cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let sale = sqlx::query_as::<_, (String, i32)>(
            "SELECT name, pcs FROM debts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        sqlx::query("DELETE FROM debts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        stock::release_stock(&mut *tx, &sale.0, sale.1).await?;

        tx.commit().await?;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Repayments
    // ------------------------------------------------------------------

    /// Record a repayment against a debt.
    ///
    /// Assigns `receipt_number` from the repayment sequence and moves
    /// `amount` from `balance_owed` to `amount_payable_now`.
    pub async fn create_repayment(
        &self,
        debt_id: Uuid,
        input: CreateRepaymentInput,
    ) -> AppResult<DebtRepayment> {
        let payment_date = parse_date_field(&input.payment_date, "payment_date")?;
        validation::validate_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let balances = Self::lock_debt_balances(&mut tx, debt_id).await?;
        let next = apply_repayment(balances, input.amount).map_err(|_| AppError::ExceedsBalance {
            requested: input.amount,
            balance: balances.balance_owed,
        })?;
        Self::write_debt_balances(&mut tx, debt_id, next).await?;

        let (repayment_id, receipt_seq) = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            INSERT INTO debt_repayments (debt_id, payment_date, amount)
            VALUES ($1, $2, $3)
            RETURNING id, receipt_seq
            "#,
        )
        .bind(debt_id)
        .bind(payment_date)
        .bind(input.amount)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, RepaymentRow>(&format!(
            r#"
            UPDATE debt_repayments
            SET receipt_number = $1
            WHERE id = $2
            RETURNING {REPAYMENT_COLUMNS}
            "#,
        ))
        .bind(receipt_number(receipt_seq))
        .bind(repayment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// List repayments for a debt, oldest first
    pub async fn list_repayments(&self, debt_id: Uuid) -> AppResult<Vec<DebtRepayment>> {
        // Distinguish "no repayments" from "no such debt"
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM debts WHERE id = $1)",
        )
        .bind(debt_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Debt".to_string()));
        }

        let rows = sqlx::query_as::<_, RepaymentRow>(&format!(
            r#"
            SELECT {REPAYMENT_COLUMNS} FROM debt_repayments
            WHERE debt_id = $1
            ORDER BY payment_date ASC, created_at ASC
            "#,
        ))
        .bind(debt_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Revise a repayment, shifting the debt balances by the difference
    pub async fn update_repayment(
        &self,
        id: Uuid,
        input: UpdateRepaymentInput,
    ) -> AppResult<DebtRepayment> {
        let mut tx = self.db.begin().await?;

        let existing: DebtRepayment = sqlx::query_as::<_, RepaymentRow>(&format!(
            "SELECT {REPAYMENT_COLUMNS} FROM debt_repayments WHERE id = $1 FOR UPDATE",
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Repayment".to_string()))?
        .into();

        let payment_date = match &input.payment_date {
            Some(s) => parse_date_field(s, "payment_date")?,
            None => existing.payment_date,
        };
        let new_amount = input.amount.unwrap_or(existing.amount);
        validation::validate_amount(new_amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;

        let balances = Self::lock_debt_balances(&mut tx, existing.debt_id).await?;
        let next = revise_repayment(balances, existing.amount, new_amount)
            .map_err(|_| AppError::NegativeBalance)?;
        Self::write_debt_balances(&mut tx, existing.debt_id, next).await?;

        let row = sqlx::query_as::<_, RepaymentRow>(&format!(
            r#"
            UPDATE debt_repayments
            SET payment_date = $1, amount = $2
            WHERE id = $3
            RETURNING {REPAYMENT_COLUMNS}
            "#,
        ))
        .bind(payment_date)
        .bind(new_amount)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a repayment, reversing its effect on the debt balances
    pub async fn delete_repayment(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT debt_id, amount FROM debt_repayments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Repayment".to_string()))?;

        let balances = Self::lock_debt_balances(&mut tx, existing.0).await?;
        let next = reverse_repayment(balances, existing.1);
        Self::write_debt_balances(&mut tx, existing.0, next).await?;

        sqlx::query("DELETE FROM debt_repayments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Lock the parent debt row and read its balances
    async fn lock_debt_balances(
        tx: &mut Transaction<'_, Postgres>,
        debt_id: Uuid,
    ) -> AppResult<DebtBalances> {
        let row = sqlx::query_as::<_, (Decimal, Decimal)>(
            "SELECT balance_owed, amount_payable_now FROM debts WHERE id = $1 FOR UPDATE",
        )
        .bind(debt_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        Ok(DebtBalances {
            balance_owed: row.0,
            amount_payable_now: row.1,
        })
    }

    async fn write_debt_balances(
        tx: &mut Transaction<'_, Postgres>,
        debt_id: Uuid,
        balances: DebtBalances,
    ) -> AppResult<()> {
        sqlx::query("UPDATE debts SET balance_owed = $1, amount_payable_now = $2 WHERE id = $3")
            .bind(balances.balance_owed)
            .bind(balances.amount_payable_now)
            .bind(debt_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
