//! Storefront profile service
//!
//! The profile is a single settings row: shop name, logo, receipt text,
//! and the display currency.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::models::ShopProfile;

/// Decoded logo payloads above this are rejected
const MAX_LOGO_BYTES: usize = 512 * 1024;

/// Shop profile service
#[derive(Clone)]
pub struct ShopService {
    db: PgPool,
}

/// Input for updating the storefront profile
#[derive(Debug, Deserialize)]
pub struct UpdateShopProfileInput {
    pub shop_name: Option<String>,
    /// Base64 logo payload; an empty string clears the logo
    pub logo: Option<String>,
    pub receipt_header: Option<String>,
    pub receipt_footer: Option<String>,
    pub currency_code: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Row for profile queries
#[derive(Debug, FromRow)]
struct ShopProfileRow {
    shop_name: String,
    logo: Option<String>,
    receipt_header: Option<String>,
    receipt_footer: Option<String>,
    currency_code: String,
    phone: Option<String>,
    address: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ShopProfileRow> for ShopProfile {
    fn from(r: ShopProfileRow) -> Self {
        ShopProfile {
            shop_name: r.shop_name,
            logo: r.logo,
            receipt_header: r.receipt_header,
            receipt_footer: r.receipt_footer,
            currency_code: r.currency_code,
            phone: r.phone,
            address: r.address,
            updated_at: r.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str =
    "shop_name, logo, receipt_header, receipt_footer, currency_code, phone, address, updated_at";

impl ShopService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the storefront profile
    pub async fn get(&self) -> AppResult<ShopProfile> {
        let row = sqlx::query_as::<_, ShopProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM shop_profile WHERE id = 1",
        ))
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update the storefront profile
    pub async fn update(&self, input: UpdateShopProfileInput) -> AppResult<ShopProfile> {
        if let Some(name) = &input.shop_name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "shop_name".to_string(),
                    message: "Shop name cannot be empty".to_string(),
                });
            }
        }

        // Logo arrives as base64; decode to validate it and cap its size.
        // An explicit empty string clears the stored logo.
        let mut clear_logo = false;
        if let Some(logo) = &input.logo {
            if logo.is_empty() {
                clear_logo = true;
            } else {
                let decoded = BASE64.decode(logo).map_err(|_| AppError::Validation {
                    field: "logo".to_string(),
                    message: "Logo must be valid base64".to_string(),
                })?;
                if decoded.len() > MAX_LOGO_BYTES {
                    return Err(AppError::Validation {
                        field: "logo".to_string(),
                        message: format!("Logo exceeds {} KB", MAX_LOGO_BYTES / 1024),
                    });
                }
            }
        }

        if let Some(code) = &input.currency_code {
            let known =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM currencies WHERE code = $1)")
                    .bind(code)
                    .fetch_one(&self.db)
                    .await?;
            if !known {
                return Err(AppError::Validation {
                    field: "currency_code".to_string(),
                    message: format!("Unknown currency '{}'", code),
                });
            }
        }

        let row = sqlx::query_as::<_, ShopProfileRow>(&format!(
            r#"
            UPDATE shop_profile
            SET shop_name = COALESCE($1, shop_name),
                logo = CASE WHEN $2 THEN NULL ELSE COALESCE($3, logo) END,
                receipt_header = COALESCE($4, receipt_header),
                receipt_footer = COALESCE($5, receipt_footer),
                currency_code = COALESCE($6, currency_code),
                phone = COALESCE($7, phone),
                address = COALESCE($8, address),
                updated_at = NOW()
            WHERE id = 1
            RETURNING {PROFILE_COLUMNS}
            "#,
        ))
        .bind(input.shop_name.as_deref().map(str::trim))
        .bind(clear_logo)
        .bind(if clear_logo { None } else { input.logo.clone() })
        .bind(&input.receipt_header)
        .bind(&input.receipt_footer)
        .bind(&input.currency_code)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
