//! Backup document models
//!
//! The backup is one self-contained JSON document. `checksum` is a SHA-256
//! hex digest over the serialized `data` section; restore verifies it
//! before touching the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Currency, Debt, DebtRepayment, Expense, Income, PurchaseLot, ShopProfile};

/// Format version written into every export. Bumped when the data section
/// changes shape.
pub const BACKUP_FORMAT_VERSION: u32 = 1;

/// The full backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    /// SHA-256 hex digest of the serialized `data` section
    pub checksum: String,
    pub data: BackupData,
}

/// Everything the backup carries. User accounts are deliberately absent so
/// a restore can never lock the operator out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupData {
    pub shop_profile: Option<ShopProfile>,
    pub currencies: Vec<Currency>,
    pub purchases: Vec<PurchaseLot>,
    pub income: Vec<Income>,
    pub debts: Vec<Debt>,
    pub debt_repayments: Vec<DebtRepayment>,
    pub expenses: Vec<Expense>,
}
