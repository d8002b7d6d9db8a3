//! Purchase lot models and deficiency alerting

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One purchase batch tracked with its own stock counter.
///
/// `available_stock` starts equal to `pcs` and moves only through the
/// stock engine: down when a sale referencing the same `name` is created,
/// back up when such a sale is deleted. It never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    /// Units purchased into this lot
    pub pcs: i32,
    pub unit_price: Decimal,
    /// `pcs * unit_price`, fixed at write time
    pub total_amount: Decimal,
    pub available_stock: i32,
    /// Alert when `available_stock` falls to this level; 0 disables
    pub stock_deficiency_threshold: i32,
    pub created_at: DateTime<Utc>,
}

impl PurchaseLot {
    /// Whether this lot should raise a low-stock alert
    pub fn is_deficient(&self) -> bool {
        self.stock_deficiency_threshold > 0 && self.available_stock <= self.stock_deficiency_threshold
    }
}

/// A low-stock alert row.
///
/// `pcs_sold` is recomputed from the sale tables rather than derived from
/// `available_stock`, so the two can disagree when stock was adjusted
/// outside the sale lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficiencyAlert {
    pub lot: PurchaseLot,
    pub pcs_sold: i64,
}

/// Order alerts most-depleted first (ascending `available_stock`)
pub fn rank_deficiency_alerts(mut alerts: Vec<DeficiencyAlert>) -> Vec<DeficiencyAlert> {
    alerts.sort_by_key(|a| a.lot.available_stock);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn lot(stock: i32, threshold: i32) -> PurchaseLot {
        PurchaseLot {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            name: "Sugar 1kg".to_string(),
            pcs: 50,
            unit_price: Decimal::from_str("700").unwrap(),
            total_amount: Decimal::from_str("35000").unwrap(),
            available_stock: stock,
            stock_deficiency_threshold: threshold,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deficient_at_or_below_threshold() {
        assert!(lot(3, 5).is_deficient());
        assert!(lot(5, 5).is_deficient());
        assert!(!lot(6, 5).is_deficient());
    }

    #[test]
    fn zero_threshold_never_alerts() {
        assert!(!lot(0, 0).is_deficient());
    }

    #[test]
    fn alerts_rank_most_depleted_first() {
        let alerts = vec![
            DeficiencyAlert { lot: lot(4, 5), pcs_sold: 46 },
            DeficiencyAlert { lot: lot(1, 5), pcs_sold: 49 },
            DeficiencyAlert { lot: lot(2, 5), pcs_sold: 48 },
        ];
        let ranked = rank_deficiency_alerts(alerts);
        let stocks: Vec<i32> = ranked.iter().map(|a| a.lot.available_stock).collect();
        assert_eq!(stocks, vec![1, 2, 4]);
    }
}
