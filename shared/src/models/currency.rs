//! Currency models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A currency the shop can price and report in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: Uuid,
    /// ISO 4217 style code, e.g. "XAF", "USD"
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// Exactly one currency is the default at any time
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
