//! Gain/loss aggregation over sales and purchase lots

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PurchaseLot;
use crate::types::SaleKind;

/// One sale row fed into the aggregator, already merged from the income
/// and debt tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub source: SaleKind,
    pub date: NaiveDate,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    /// Fixed at write time; older or restored rows may lack it, in which
    /// case `unit_price * pcs` stands in.
    pub total_price: Option<Decimal>,
}

/// Per-sale gain/loss row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GainLossRow {
    pub source: SaleKind,
    pub date: NaiveDate,
    pub name: String,
    pub pcs: i32,
    pub unit_price: Decimal,
    pub cost_unit_price: Decimal,
    pub total_cost: Decimal,
    pub total_sale: Decimal,
    pub gain_loss: Decimal,
}

/// Aggregate totals across the report range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GainLossTotals {
    pub total_cost: Decimal,
    pub total_sale: Decimal,
    pub gain_loss: Decimal,
}

/// Full gain/loss report for a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GainLossReport {
    pub rows: Vec<GainLossRow>,
    pub totals: GainLossTotals,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Compute the gain/loss report.
///
/// Cost basis per sale is the unit price of the first lot in `lots` whose
/// name matches exactly (insertion order, all lots unfiltered by date), or
/// zero when no lot matches. This is deliberately not the lot the stock
/// engine deducted from; the mismatch when a name is repurchased is
/// recorded behavior.
///
/// Rows are sorted by date ascending with a stable sort, so same-day rows
/// keep their input order.
pub fn compute_gain_loss(
    lots: &[PurchaseLot],
    mut sales: Vec<SaleRecord>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> GainLossReport {
    sales.sort_by_key(|s| s.date);

    let mut totals = GainLossTotals::default();
    let rows: Vec<GainLossRow> = sales
        .into_iter()
        .map(|sale| {
            let cost_unit_price = lots
                .iter()
                .find(|lot| lot.name == sale.name)
                .map(|lot| lot.unit_price)
                .unwrap_or(Decimal::ZERO);
            let pcs = Decimal::from(sale.pcs);
            let total_cost = cost_unit_price * pcs;
            let total_sale = sale.total_price.unwrap_or(sale.unit_price * pcs);
            let gain_loss = total_sale - total_cost;

            totals.total_cost += total_cost;
            totals.total_sale += total_sale;
            totals.gain_loss += gain_loss;

            GainLossRow {
                source: sale.source,
                date: sale.date,
                name: sale.name,
                pcs: sale.pcs,
                unit_price: sale.unit_price,
                cost_unit_price,
                total_cost,
                total_sale,
                gain_loss,
            }
        })
        .collect();

    GainLossReport {
        rows,
        totals,
        start_date,
        end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn lot(name: &str, unit_price: i64) -> PurchaseLot {
        PurchaseLot {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            name: name.to_string(),
            pcs: 100,
            unit_price: Decimal::from(unit_price),
            total_amount: Decimal::from(unit_price * 100),
            available_stock: 100,
            stock_deficiency_threshold: 0,
            created_at: Utc::now(),
        }
    }

    fn sale(name: &str, pcs: i32, unit_price: i64, day: u32) -> SaleRecord {
        SaleRecord {
            source: SaleKind::Income,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            name: name.to_string(),
            pcs,
            unit_price: Decimal::from(unit_price),
            total_price: Some(Decimal::from(unit_price * pcs as i64)),
        }
    }

    #[test]
    fn row_arithmetic() {
        let report = compute_gain_loss(
            &[lot("Soap", 10)],
            vec![sale("Soap", 3, 15, 1)],
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        let row = &report.rows[0];
        assert_eq!(row.total_cost, Decimal::from(30));
        assert_eq!(row.total_sale, Decimal::from(45));
        assert_eq!(row.gain_loss, Decimal::from(15));
    }

    #[test]
    fn first_matching_lot_wins_cost_basis() {
        // Two lots share the name; insertion order decides the cost basis.
        let lots = vec![lot("Soap", 10), lot("Soap", 12)];
        let report = compute_gain_loss(
            &lots,
            vec![sale("Soap", 2, 15, 1)],
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        assert_eq!(report.rows[0].cost_unit_price, Decimal::from(10));
    }

    #[test]
    fn unmatched_sale_costs_zero() {
        let report = compute_gain_loss(
            &[],
            vec![sale("Soap", 2, 15, 1)],
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        assert_eq!(report.rows[0].total_cost, Decimal::ZERO);
        assert_eq!(report.rows[0].gain_loss, Decimal::from(30));
    }

    #[test]
    fn totals_sum_rows() {
        let report = compute_gain_loss(
            &[lot("Soap", 10), lot("Rice", 500)],
            vec![sale("Soap", 3, 15, 2), sale("Rice", 1, 650, 1)],
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        );
        let cost: Decimal = report.rows.iter().map(|r| r.total_cost).sum();
        let sale_sum: Decimal = report.rows.iter().map(|r| r.total_sale).sum();
        let gain: Decimal = report.rows.iter().map(|r| r.gain_loss).sum();
        assert_eq!(report.totals.total_cost, cost);
        assert_eq!(report.totals.total_sale, sale_sum);
        assert_eq!(report.totals.gain_loss, gain);
        // Sorted ascending by date: Rice (day 1) first.
        assert_eq!(report.rows[0].name, "Rice");
    }
}
