//! Storefront profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single-row storefront profile: what prints on receipts and what the
/// frontend shows in its header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopProfile {
    pub shop_name: String,
    /// Logo image as a base64 payload, if one has been uploaded
    pub logo: Option<String>,
    pub receipt_header: Option<String>,
    pub receipt_footer: Option<String>,
    pub currency_code: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub updated_at: DateTime<Utc>,
}
