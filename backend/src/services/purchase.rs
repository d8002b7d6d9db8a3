//! Purchase lot service: inventory lots and deficiency alerting

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{rank_deficiency_alerts, DeficiencyAlert, PurchaseLot};
use shared::validation;

/// Purchase service for managing inventory lots
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Input for recording a purchase lot
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub date: String,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    pub stock_deficiency_threshold: Option<i32>,
}

/// Input for updating a purchase lot
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseInput {
    pub date: Option<String>,
    pub name: Option<String>,
    pub pcs: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub stock_deficiency_threshold: Option<i32>,
}

/// Row for lot queries
#[derive(Debug, FromRow)]
struct PurchaseLotRow {
    id: Uuid,
    date: chrono::NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_amount: Decimal,
    available_stock: i32,
    stock_deficiency_threshold: i32,
    created_at: DateTime<Utc>,
}

/// Row for deficiency alert queries
#[derive(Debug, FromRow)]
struct DeficiencyAlertRow {
    id: Uuid,
    date: chrono::NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_amount: Decimal,
    available_stock: i32,
    stock_deficiency_threshold: i32,
    created_at: DateTime<Utc>,
    pcs_sold: i64,
}

impl From<PurchaseLotRow> for PurchaseLot {
    fn from(r: PurchaseLotRow) -> Self {
        PurchaseLot {
            id: r.id,
            date: r.date,
            name: r.name,
            pcs: r.pcs,
            unit_price: r.unit_price,
            total_amount: r.total_amount,
            available_stock: r.available_stock,
            stock_deficiency_threshold: r.stock_deficiency_threshold,
            created_at: r.created_at,
        }
    }
}

const LOT_COLUMNS: &str = "id, date, name, pcs, unit_price, total_amount, available_stock, \
                           stock_deficiency_threshold, created_at";

impl PurchaseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a new purchase lot. `available_stock` starts equal to `pcs`.
    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<PurchaseLot> {
        let date = validation::parse_day(&input.date).map_err(|msg| AppError::Validation {
            field: "date".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_pcs(input.pcs).map_err(|msg| AppError::Validation {
            field: "pcs".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_price(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;

        let threshold = input.stock_deficiency_threshold.unwrap_or(0);
        if threshold < 0 {
            return Err(AppError::Validation {
                field: "stock_deficiency_threshold".to_string(),
                message: "Threshold cannot be negative".to_string(),
            });
        }

        let total_amount = input.unit_price * Decimal::from(input.pcs);

        let row = sqlx::query_as::<_, PurchaseLotRow>(&format!(
            r#"
            INSERT INTO purchases (date, name, pcs, unit_price, total_amount, available_stock, stock_deficiency_threshold)
            VALUES ($1, $2, $3, $4, $5, $3, $6)
            RETURNING {LOT_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(input.name.trim())
        .bind(input.pcs)
        .bind(input.unit_price)
        .bind(total_amount)
        .bind(threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a purchase lot by id
    pub async fn get(&self, id: Uuid) -> AppResult<PurchaseLot> {
        let row = sqlx::query_as::<_, PurchaseLotRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM purchases WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Ok(row.into())
    }

    /// List purchase lots, newest first
    pub async fn list(&self) -> AppResult<Vec<PurchaseLot>> {
        let rows = sqlx::query_as::<_, PurchaseLotRow>(&format!(
            "SELECT {LOT_COLUMNS} FROM purchases ORDER BY created_at DESC, id DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a purchase lot.
    ///
    /// Changing `pcs` shifts `available_stock` by the same delta so the
    /// unsold remainder stays consistent; a shift that would leave
    /// negative stock is rejected before any write.
    pub async fn update(&self, id: Uuid, input: UpdatePurchaseInput) -> AppResult<PurchaseLot> {
        let existing = self.get(id).await?;

        let date = match &input.date {
            Some(s) => validation::parse_day(s).map_err(|msg| AppError::Validation {
                field: "date".to_string(),
                message: msg.to_string(),
            })?,
            None => existing.date,
        };
        let name = input.name.unwrap_or(existing.name);
        validation::validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        let pcs = input.pcs.unwrap_or(existing.pcs);
        validation::validate_pcs(pcs).map_err(|msg| AppError::Validation {
            field: "pcs".to_string(),
            message: msg.to_string(),
        })?;
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        validation::validate_price(unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;
        let threshold = input
            .stock_deficiency_threshold
            .unwrap_or(existing.stock_deficiency_threshold);
        if threshold < 0 {
            return Err(AppError::Validation {
                field: "stock_deficiency_threshold".to_string(),
                message: "Threshold cannot be negative".to_string(),
            });
        }

        let stock_delta = pcs - existing.pcs;
        if existing.available_stock + stock_delta < 0 {
            return Err(AppError::Validation {
                field: "pcs".to_string(),
                message: format!(
                    "Cannot shrink lot below sold quantity ({} units already sold)",
                    existing.pcs - existing.available_stock
                ),
            });
        }

        let total_amount = unit_price * Decimal::from(pcs);

        let row = sqlx::query_as::<_, PurchaseLotRow>(&format!(
            r#"
            UPDATE purchases
            SET date = $1, name = $2, pcs = $3, unit_price = $4, total_amount = $5,
                available_stock = available_stock + $6, stock_deficiency_threshold = $7
            WHERE id = $8
            RETURNING {LOT_COLUMNS}
            "#,
        ))
        .bind(date)
        .bind(name.trim())
        .bind(pcs)
        .bind(unit_price)
        .bind(total_amount)
        .bind(stock_delta)
        .bind(threshold)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a purchase lot
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        Ok(())
    }

    /// Get low-stock alerts, most depleted first.
    ///
    /// `pcs_sold` is recomputed from the sale tables by item name rather
    /// than derived from `available_stock`.
    pub async fn deficiency_alerts(&self) -> AppResult<Vec<DeficiencyAlert>> {
        let rows = sqlx::query_as::<_, DeficiencyAlertRow>(
            r#"
            SELECT p.id, p.date, p.name, p.pcs, p.unit_price, p.total_amount,
                   p.available_stock, p.stock_deficiency_threshold, p.created_at,
                   COALESCE((SELECT SUM(i.pcs) FROM income i WHERE i.name = p.name), 0)
                 + COALESCE((SELECT SUM(d.pcs) FROM debts d WHERE d.name = p.name), 0) AS pcs_sold
            FROM purchases p
            WHERE p.stock_deficiency_threshold > 0
              AND p.available_stock <= p.stock_deficiency_threshold
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let alerts = rows
            .into_iter()
            .map(|r| DeficiencyAlert {
                pcs_sold: r.pcs_sold,
                lot: PurchaseLot {
                    id: r.id,
                    date: r.date,
                    name: r.name,
                    pcs: r.pcs,
                    unit_price: r.unit_price,
                    total_amount: r.total_amount,
                    available_stock: r.available_stock,
                    stock_deficiency_threshold: r.stock_deficiency_threshold,
                    created_at: r.created_at,
                },
            })
            .collect();

        Ok(rank_deficiency_alerts(alerts))
    }
}
