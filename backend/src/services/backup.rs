//! Backup and restore service
//!
//! Exports the whole ledger as one JSON document with a SHA-256 checksum
//! over the data section. Restore verifies the checksum and replaces the
//! ledger tables in a single transaction, preserving row ids.

use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::currency::CurrencyService;
use crate::services::debt::DebtService;
use crate::services::expense::ExpenseService;
use crate::services::income::{IncomeService, SaleFilter};
use crate::services::purchase::PurchaseService;
use crate::services::shop::ShopService;
use chrono::{DateTime, Utc};
use shared::models::{
    BackupData, BackupDocument, DebtRepayment, BACKUP_FORMAT_VERSION,
};
use uuid::Uuid;

/// Backup service
#[derive(Clone)]
pub struct BackupService {
    db: PgPool,
}

/// Counts reported after a restore
#[derive(Debug, Serialize)]
pub struct RestoreSummary {
    pub currencies: usize,
    pub purchases: usize,
    pub income: usize,
    pub debts: usize,
    pub debt_repayments: usize,
    pub expenses: usize,
}

/// Row for repayment export queries
#[derive(Debug, sqlx::FromRow)]
struct RepaymentExportRow {
    id: Uuid,
    debt_id: Uuid,
    payment_date: chrono::NaiveDate,
    amount: rust_decimal::Decimal,
    receipt_number: String,
    created_at: DateTime<Utc>,
}

impl BackupService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Export the ledger as a checksummed JSON document
    pub async fn export(&self) -> AppResult<BackupDocument> {
        let everything = SaleFilter::default();

        let data = BackupData {
            shop_profile: Some(ShopService::new(self.db.clone()).get().await?),
            currencies: CurrencyService::new(self.db.clone()).list().await?,
            purchases: PurchaseService::new(self.db.clone()).list().await?,
            income: IncomeService::new(self.db.clone()).list(&everything).await?,
            debts: DebtService::new(self.db.clone()).list(&everything).await?,
            debt_repayments: self.all_repayments().await?,
            expenses: ExpenseService::new(self.db.clone()).list(&everything).await?,
        };

        Ok(BackupDocument {
            format_version: BACKUP_FORMAT_VERSION,
            exported_at: Utc::now(),
            checksum: Self::checksum(&data)?,
            data,
        })
    }

    /// Restore a previously exported document, replacing the ledger
    pub async fn restore(&self, document: BackupDocument) -> AppResult<RestoreSummary> {
        if document.format_version != BACKUP_FORMAT_VERSION {
            return Err(AppError::ValidationError(format!(
                "Unsupported backup format version {}",
                document.format_version
            )));
        }

        let expected = Self::checksum(&document.data)?;
        if !expected.eq_ignore_ascii_case(&document.checksum) {
            return Err(AppError::ValidationError(
                "Backup checksum mismatch; file is corrupt or was edited".to_string(),
            ));
        }

        let data = document.data;
        let mut tx = self.db.begin().await?;

        // Replace in dependency order
        sqlx::query("DELETE FROM debt_repayments").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM debts").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM income").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM purchases").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM expenses").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM currencies").execute(&mut *tx).await?;

        for currency in &data.currencies {
            sqlx::query(
                r#"
                INSERT INTO currencies (id, code, name, symbol, is_default, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(currency.id)
            .bind(&currency.code)
            .bind(&currency.name)
            .bind(&currency.symbol)
            .bind(currency.is_default)
            .bind(currency.created_at)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(profile) = &data.shop_profile {
            sqlx::query(
                r#"
                UPDATE shop_profile
                SET shop_name = $1, logo = $2, receipt_header = $3, receipt_footer = $4,
                    currency_code = $5, phone = $6, address = $7, updated_at = NOW()
                WHERE id = 1
                "#,
            )
            .bind(&profile.shop_name)
            .bind(&profile.logo)
            .bind(&profile.receipt_header)
            .bind(&profile.receipt_footer)
            .bind(&profile.currency_code)
            .bind(&profile.phone)
            .bind(&profile.address)
            .execute(&mut *tx)
            .await?;
        }

        for lot in &data.purchases {
            sqlx::query(
                r#"
                INSERT INTO purchases (id, date, name, pcs, unit_price, total_amount,
                                       available_stock, stock_deficiency_threshold, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(lot.id)
            .bind(lot.date)
            .bind(&lot.name)
            .bind(lot.pcs)
            .bind(lot.unit_price)
            .bind(lot.total_amount)
            .bind(lot.available_stock)
            .bind(lot.stock_deficiency_threshold)
            .bind(lot.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for sale in &data.income {
            sqlx::query(
                r#"
                INSERT INTO income (id, date, name, pcs, unit_price, total_price,
                                    client_name, client_phone, seller_name, signatures, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(sale.id)
            .bind(sale.date)
            .bind(&sale.name)
            .bind(sale.pcs)
            .bind(sale.unit_price)
            .bind(sale.total_price)
            .bind(&sale.client_name)
            .bind(&sale.client_phone)
            .bind(&sale.seller_name)
            .bind(&sale.signatures)
            .bind(sale.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for debt in &data.debts {
            sqlx::query(
                r#"
                INSERT INTO debts (id, date, name, pcs, unit_price, total_price,
                                   amount_payable_now, balance_owed,
                                   client_name, client_phone, seller_name, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(debt.id)
            .bind(debt.date)
            .bind(&debt.name)
            .bind(debt.pcs)
            .bind(debt.unit_price)
            .bind(debt.total_price)
            .bind(debt.amount_payable_now)
            .bind(debt.balance_owed)
            .bind(&debt.client_name)
            .bind(&debt.client_phone)
            .bind(&debt.seller_name)
            .bind(debt.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for repayment in &data.debt_repayments {
            sqlx::query(
                r#"
                INSERT INTO debt_repayments (id, debt_id, payment_date, amount,
                                             receipt_number, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(repayment.id)
            .bind(repayment.debt_id)
            .bind(repayment.payment_date)
            .bind(repayment.amount)
            .bind(&repayment.receipt_number)
            .bind(repayment.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for expense in &data.expenses {
            sqlx::query(
                r#"
                INSERT INTO expenses (id, date, name, amount, notes, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(expense.id)
            .bind(expense.date)
            .bind(&expense.name)
            .bind(expense.amount)
            .bind(&expense.notes)
            .bind(expense.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(RestoreSummary {
            currencies: data.currencies.len(),
            purchases: data.purchases.len(),
            income: data.income.len(),
            debts: data.debts.len(),
            debt_repayments: data.debt_repayments.len(),
            expenses: data.expenses.len(),
        })
    }

    /// SHA-256 hex digest of the serialized data section
    fn checksum(data: &BackupData) -> AppResult<String> {
        let bytes = serde_json::to_vec(data)
            .map_err(|e| AppError::StorageError(format!("Backup serialization failed: {}", e)))?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    async fn all_repayments(&self) -> AppResult<Vec<DebtRepayment>> {
        let rows = sqlx::query_as::<_, RepaymentExportRow>(
            r#"
            SELECT id, debt_id, payment_date, amount, receipt_number, created_at
            FROM debt_repayments
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DebtRepayment {
                id: r.id,
                debt_id: r.debt_id,
                payment_date: r.payment_date,
                amount: r.amount,
                receipt_number: r.receipt_number,
                created_at: r.created_at,
            })
            .collect())
    }
}
