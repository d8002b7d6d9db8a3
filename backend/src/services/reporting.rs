//! Reporting service: gain/loss aggregation and CSV export

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{compute_gain_loss, GainLossReport, PurchaseLot, SaleRecord};
use shared::types::SaleKind;
use shared::validation;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Report filter parameters
#[derive(Debug, Deserialize, Default)]
pub struct ReportFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Row for merged sale queries
#[derive(Debug, FromRow)]
struct SaleRow {
    date: NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_price: Option<Decimal>,
}

/// Row for cost-basis lot queries
#[derive(Debug, FromRow)]
struct CostLotRow {
    id: Uuid,
    date: NaiveDate,
    name: String,
    pcs: i32,
    unit_price: Decimal,
    total_amount: Decimal,
    available_stock: i32,
    stock_deficiency_threshold: i32,
    created_at: DateTime<Utc>,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the gain/loss report for an inclusive date range.
    ///
    /// Lots are fetched unfiltered in insertion order: cost basis per sale
    /// is the first lot with a matching name, not necessarily the lot the
    /// stock engine deducted from.
    pub async fn gain_loss(&self, filter: &ReportFilter) -> AppResult<GainLossReport> {
        let range = validation::parse_range(
            filter.start_date.as_deref(),
            filter.end_date.as_deref(),
        )
        .map_err(|msg| AppError::Validation {
            field: "start_date".to_string(),
            message: msg.to_string(),
        })?;

        let lot_rows = sqlx::query_as::<_, CostLotRow>(
            r#"
            SELECT id, date, name, pcs, unit_price, total_amount, available_stock,
                   stock_deficiency_threshold, created_at
            FROM purchases
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let lots: Vec<PurchaseLot> = lot_rows
            .into_iter()
            .map(|r| PurchaseLot {
                id: r.id,
                date: r.date,
                name: r.name,
                pcs: r.pcs,
                unit_price: r.unit_price,
                total_amount: r.total_amount,
                available_stock: r.available_stock,
                stock_deficiency_threshold: r.stock_deficiency_threshold,
                created_at: r.created_at,
            })
            .collect();

        let income_rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT date, name, pcs, unit_price, total_price
            FROM income
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let debt_rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT date, name, pcs, unit_price, total_price
            FROM debts
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let sales: Vec<SaleRecord> = income_rows
            .into_iter()
            .map(|r| (SaleKind::Income, r))
            .chain(debt_rows.into_iter().map(|r| (SaleKind::Debt, r)))
            .map(|(source, r)| SaleRecord {
                source,
                date: r.date,
                name: r.name,
                pcs: r.pcs,
                unit_price: r.unit_price,
                total_price: r.total_price,
            })
            .collect();

        Ok(compute_gain_loss(&lots, sales, range.start, range.end))
    }

    /// Render the gain/loss rows as CSV
    pub fn export_to_csv(report: &GainLossReport) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "source",
                "date",
                "name",
                "pcs",
                "unit_price",
                "cost_unit_price",
                "total_cost",
                "total_sale",
                "gain_loss",
            ])
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;

        for row in &report.rows {
            writer
                .write_record([
                    row.source.as_str().to_string(),
                    row.date.to_string(),
                    row.name.clone(),
                    row.pcs.to_string(),
                    row.unit_price.to_string(),
                    row.cost_unit_price.to_string(),
                    row.total_cost.to_string(),
                    row.total_sale.to_string(),
                    row.gain_loss.to_string(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;

        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
    }
}
