//! Stock consistency engine
//!
//! Every sale (income or debt) consumes stock from the most recently
//! created purchase lot carrying the same item name, and restores it on
//! deletion. Both operations run inside the caller's transaction so the
//! sale write and the stock adjustment commit or roll back together.
//!
//! The decrement is a single conditional update; `available_stock` can
//! never go negative and two concurrent sales cannot both win the last
//! unit.

use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Reserve `pcs` units of `name` against the most recent matching lot.
///
/// Returns the lot id the stock was taken from. Fails with `NotFound` when
/// no lot carries the name, and `InsufficientStock` when the lot cannot
/// cover the request; neither failure leaves a write behind.
pub async fn reserve_stock(conn: &mut PgConnection, name: &str, pcs: i32) -> AppResult<Uuid> {
    let lot = sqlx::query(
        r#"
        SELECT id, available_stock
        FROM purchases
        WHERE name = $1
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

    let lot_id: Uuid = lot.get("id");
    let available: i32 = lot.get("available_stock");

    let result = sqlx::query(
        r#"
        UPDATE purchases
        SET available_stock = available_stock - $1
        WHERE id = $2 AND available_stock >= $1
        "#,
    )
    .bind(pcs)
    .bind(lot_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::InsufficientStock {
            name: name.to_string(),
            requested: pcs,
            available,
        });
    }

    Ok(lot_id)
}

/// Return `pcs` units of `name` to the most recent matching lot.
///
/// Deleting a sale whose lot has since disappeared skips the restore
/// silently; the sale delete itself still goes through.
pub async fn release_stock(conn: &mut PgConnection, name: &str, pcs: i32) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE purchases
        SET available_stock = available_stock + $1
        WHERE id = (
            SELECT id FROM purchases
            WHERE name = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(pcs)
    .bind(name)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(item = name, pcs, "no matching lot; stock restore skipped");
    }

    Ok(())
}
