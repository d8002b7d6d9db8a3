//! Expense service: plain bookkeeping rows with no stock side effects

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::income::{parse_date_field, SaleFilter};
use shared::models::Expense;
use shared::validation;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseInput {
    pub date: String,
    pub name: String,
    pub amount: Decimal,
    pub notes: Option<String>,
}

/// Input for updating an expense
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseInput {
    pub date: Option<String>,
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
}

/// Row for expense queries
#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: Uuid,
    date: chrono::NaiveDate,
    name: String,
    amount: Decimal,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(r: ExpenseRow) -> Self {
        Expense {
            id: r.id,
            date: r.date,
            name: r.name,
            amount: r.amount,
            notes: r.notes,
            created_at: r.created_at,
        }
    }
}

fn validate_expense_fields(name: &str, amount: Decimal) -> AppResult<()> {
    validation::validate_name(name).map_err(|msg| AppError::Validation {
        field: "name".to_string(),
        message: msg.to_string(),
    })?;
    validation::validate_amount(amount).map_err(|msg| AppError::Validation {
        field: "amount".to_string(),
        message: msg.to_string(),
    })?;
    Ok(())
}

impl ExpenseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an expense
    pub async fn create(&self, input: CreateExpenseInput) -> AppResult<Expense> {
        let date = parse_date_field(&input.date, "date")?;
        validate_expense_fields(&input.name, input.amount)?;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            INSERT INTO expenses (date, name, amount, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, name, amount, notes, created_at
            "#,
        )
        .bind(date)
        .bind(input.name.trim())
        .bind(input.amount)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get an expense by id
    pub async fn get(&self, id: Uuid) -> AppResult<Expense> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, date, name, amount, notes, created_at FROM expenses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(row.into())
    }

    /// List expenses, optionally limited to a date range
    pub async fn list(&self, filter: &SaleFilter) -> AppResult<Vec<Expense>> {
        let start = match &filter.start_date {
            Some(s) => Some(parse_date_field(s, "start_date")?),
            None => None,
        };
        let end = match &filter.end_date {
            Some(s) => Some(parse_date_field(s, "end_date")?),
            None => None,
        };

        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, date, name, amount, notes, created_at FROM expenses
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update an expense
    pub async fn update(&self, id: Uuid, input: UpdateExpenseInput) -> AppResult<Expense> {
        let existing = self.get(id).await?;

        let date = match &input.date {
            Some(s) => parse_date_field(s, "date")?,
            None => existing.date,
        };
        let name = input.name.unwrap_or(existing.name);
        let amount = input.amount.unwrap_or(existing.amount);
        validate_expense_fields(&name, amount)?;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            UPDATE expenses
            SET date = $1, name = $2, amount = $3, notes = COALESCE($4, notes)
            WHERE id = $5
            RETURNING id, date, name, amount, notes, created_at
            "#,
        )
        .bind(date)
        .bind(name.trim())
        .bind(amount)
        .bind(&input.notes)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete an expense
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }
}
