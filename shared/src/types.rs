//! Common types used across the backend

use serde::{Deserialize, Serialize};

/// Which sale surface a record came through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaleKind {
    /// Cash sale, paid in full at the counter
    Income,
    /// Credit sale carrying an outstanding balance
    Debt,
}

impl SaleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleKind::Income => "income",
            SaleKind::Debt => "debt",
        }
    }
}

/// Account roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Owner,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(UserRole::Owner),
            "staff" => Some(UserRole::Staff),
            _ => None,
        }
    }
}

/// Date range for report queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
