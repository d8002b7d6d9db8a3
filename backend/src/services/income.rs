//! Cash sale (income) service
//!
//! Creating an income record reserves stock from the matching purchase
//! lot in the same transaction as the insert; deleting one restores it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::stock;
use shared::models::Income;
use shared::validation;

/// Income service for cash sale records
#[derive(Clone)]
pub struct IncomeService {
    db: PgPool,
}

/// Input for recording a cash sale
#[derive(Debug, Deserialize)]
pub struct CreateIncomeInput {
    pub date: String,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
    pub signatures: Option<String>,
}

/// Input for updating a cash sale.
///
/// Stock is not re-adjusted when `pcs` changes; only the monetary total is
/// recomputed at the update write.
#[derive(Debug, Deserialize)]
pub struct UpdateIncomeInput {
    pub date: Option<String>,
    pub name: Option<String>,
    pub pcs: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
    pub signatures: Option<String>,
}

/// Query filter for listing sales
#[derive(Debug, Deserialize, Default)]
pub struct SaleFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Row for income queries
#[derive(Debug, FromRow)]
struct IncomeRow {
    id: Uuid,
    date: chrono::NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_price: Decimal,
    client_name: Option<String>,
    client_phone: Option<String>,
    seller_name: Option<String>,
    signatures: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<IncomeRow> for Income {
    fn from(r: IncomeRow) -> Self {
        Income {
            id: r.id,
            date: r.date,
            name: r.name,
            pcs: r.pcs,
            unit_price: r.unit_price,
            total_price: r.total_price,
            client_name: r.client_name,
            client_phone: r.client_phone,
            seller_name: r.seller_name,
            signatures: r.signatures,
            created_at: r.created_at,
        }
    }
}

const INCOME_COLUMNS: &str = "id, date, name, pcs, unit_price, total_price, client_name, \
                              client_phone, seller_name, signatures, created_at";

pub(crate) fn validate_sale_fields(name: &str, pcs: i32, unit_price: Decimal) -> AppResult<()> {
    validation::validate_name(name).map_err(|msg| AppError::Validation {
        field: "name".to_string(),
        message: msg.to_string(),
    })?;
    validation::validate_pcs(pcs).map_err(|msg| AppError::Validation {
        field: "pcs".to_string(),
        message: msg.to_string(),
    })?;
    validation::validate_price(unit_price).map_err(|msg| AppError::Validation {
        field: "unit_price".to_string(),
        message: msg.to_string(),
    })?;
    Ok(())
}

pub(crate) fn parse_date_field(value: &str, field: &str) -> AppResult<chrono::NaiveDate> {
    validation::parse_day(value).map_err(|msg| AppError::Validation {
        field: field.to_string(),
        message: msg.to_string(),
    })
}

impl IncomeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a cash sale, consuming stock from the matching lot.
    ///
    /// The stock check and decrement are one conditional update inside the
    /// same transaction as the insert: either both land or neither does.
    pub async fn create(&self, input: CreateIncomeInput) -> AppResult<Income> {
        let date = parse_date_field(&input.date, "date")?;
        validate_sale_fields(&input.name, input.pcs, input.unit_price)?;

        let name = input.name.trim().to_string();
        let total_price = input.unit_price * Decimal::from(input.pcs);

        let mut tx = self.db.begin().await?;

        stock::reserve_stock(&mut *tx, &name, input.pcs).await?;

        let row = sqlx::query_as::<_, IncomeRow>(&format!(
            r#"
            INSERT INTO income (date, name, pcs, unit_price, total_price, client_name, client_phone, seller_name, signatures)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {INCOME_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(&name)
        .bind(input.pcs)
        .bind(input.unit_price)
        .bind(total_price)
        .bind(&input.client_name)
        .bind(&input.client_phone)
        .bind(&input.seller_name)
        .bind(&input.signatures)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get an income record by id
    pub async fn get(&self, id: Uuid) -> AppResult<Income> {
        let row = sqlx::query_as::<_, IncomeRow>(&format!(
            "SELECT {INCOME_COLUMNS} FROM income WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Income".to_string()))?;

        Ok(row.into())
    }

    /// List income records, optionally limited to a date range
    pub async fn list(&self, filter: &SaleFilter) -> AppResult<Vec<Income>> {
        let start = match &filter.start_date {
            Some(s) => Some(parse_date_field(s, "start_date")?),
            None => None,
        };
        let end = match &filter.end_date {
            Some(s) => Some(parse_date_field(s, "end_date")?),
            None => None,
        };

        let rows = sqlx::query_as::<_, IncomeRow>(&format!(
            r#"
            SELECT {INCOME_COLUMNS} FROM income
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

    /// Update an income record. No compensating stock adjustment is made.
    pub async fn update(&self, id: Uuid, input: UpdateIncomeInput) -> AppResult<Income> {
        let existing = self.get(id).await?;

        let date = match &input.date {
            Some(s) => parse_date_field(s, "date")?,
            None => existing.date,
        };
        let name = input.name.unwrap_or(existing.name);
        let pcs = input.pcs.unwrap_or(existing.pcs);
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        validate_sale_fields(&name, pcs, unit_price)?;

        let total_price = unit_price * Decimal::from(pcs);

        let row = sqlx::query_as::<_, IncomeRow>(&format!(
            r#"
            UPDATE income
            SET date = $1, name = $2, pcs = $3, unit_price = $4, total_price = $5,
                client_name = COALESCE($6, client_name),
                client_phone = COALESCE($7, client_phone),
                seller_name = COALESCE($8, seller_name),
                signatures = COALESCE($9, signatures)
            WHERE id = $10
            RETURNING {INCOME_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(name.trim())
        .bind(pcs)
        .bind(unit_price)
        .bind(total_price)
        .bind(&input.client_name)
        .bind(&input.client_phone)
        .bind(&input.seller_name)
        .bind(&input.signatures)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete an income record, restoring its stock to the matching lot
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let sale = sqlx::query_as::<_, (String, i32)>(
            "SELECT name, pcs FROM income WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Income".to_string()))?;

        sqlx::query("DELETE FROM income WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        stock::release_stock(&mut *tx, &sale.0, sale.1).await?;

        tx.commit().await?;

        Ok(())
    }
}
