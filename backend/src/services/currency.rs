//! Currency service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Currency;

/// Currency service
#[derive(Clone)]
pub struct CurrencyService {
    db: PgPool,
}

/// Input for adding a currency
#[derive(Debug, Deserialize)]
pub struct CreateCurrencyInput {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Row for currency queries
#[derive(Debug, FromRow)]
struct CurrencyRow {
    id: Uuid,
    code: String,
    name: String,
    symbol: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<CurrencyRow> for Currency {
    fn from(r: CurrencyRow) -> Self {
        Currency {
            id: r.id,
            code: r.code,
            name: r.name,
            symbol: r.symbol,
            is_default: r.is_default,
            created_at: r.created_at,
        }
    }
}

impl CurrencyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List currencies, default first
    pub async fn list(&self) -> AppResult<Vec<Currency>> {
        let rows = sqlx::query_as::<_, CurrencyRow>(
            r#"
            SELECT id, code, name, symbol, is_default, created_at
            FROM currencies
            ORDER BY is_default DESC, code ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a currency
    pub async fn create(&self, input: CreateCurrencyInput) -> AppResult<Currency> {
        let code = input.code.trim().to_uppercase();
        if code.is_empty() || code.len() > 8 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Currency code must be 1-8 alphanumeric characters".to_string(),
            });
        }
        if input.name.trim().is_empty() || input.symbol.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Currency name and symbol are required".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM currencies WHERE code = $1")
            .bind(&code)
            .fetch_one(&self.db)
            .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("currency code".to_string()));
        }

        let row = sqlx::query_as::<_, CurrencyRow>(
            r#"
            INSERT INTO currencies (code, name, symbol)
            VALUES ($1, $2, $3)
            RETURNING id, code, name, symbol, is_default, created_at
            "#,
        )
        .bind(&code)
        .bind(input.name.trim())
        .bind(input.symbol.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Make a currency the default. Exactly one currency is the default,
    /// so the previous one is cleared in the same transaction.
    pub async fn set_default(&self, id: Uuid) -> AppResult<Currency> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE currencies SET is_default = FALSE WHERE is_default = TRUE")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, CurrencyRow>(
            r#"
            UPDATE currencies
            SET is_default = TRUE
            WHERE id = $1
            RETURNING id, code, name, symbol, is_default, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Currency".to_string()))?;

        // Keep the storefront profile pointing at the new default
        sqlx::query("UPDATE shop_profile SET currency_code = $1, updated_at = NOW() WHERE id = 1")
            .bind(&row.code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Remove a currency. The default currency cannot be removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let is_default =
            sqlx::query_scalar::<_, bool>("SELECT is_default FROM currencies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Currency".to_string()))?;

        if is_default {
            return Err(AppError::ValidationError(
                "Cannot delete the default currency".to_string(),
            ));
        }

        sqlx::query("DELETE FROM currencies WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
