//! Cash sale (income) models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cash sale. Creating one consumes stock from the most recently
/// created purchase lot with the same item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    /// `pcs * unit_price`, fixed at write time
    pub total_price: Decimal,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub seller_name: Option<String>,
    pub signatures: Option<String>,
    pub created_at: DateTime<Utc>,
}
