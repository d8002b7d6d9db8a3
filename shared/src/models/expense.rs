//! Expense models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shop expense. Plain bookkeeping row with no stock side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
