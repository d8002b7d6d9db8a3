//! HTTP handlers for purchase lot endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase::{CreatePurchaseInput, PurchaseService, UpdatePurchaseInput};
use crate::AppState;
use crate::models::{DeficiencyAlert, PurchaseLot};

/// Record a purchase lot
pub async fn create_purchase(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<Json<PurchaseLot>> {
    let service = PurchaseService::new(state.db);
    let lot = service.create(input).await?;
    Ok(Json(lot))
}

/// List purchase lots
pub async fn list_purchases(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseLot>>> {
    let service = PurchaseService::new(state.db);
    let lots = service.list().await?;
    Ok(Json(lots))
}

/// Get a purchase lot
pub async fn get_purchase(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<PurchaseLot>> {
    let service = PurchaseService::new(state.db);
    let lot = service.get(purchase_id).await?;
    Ok(Json(lot))
}

/// Update a purchase lot
pub async fn update_purchase(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<PurchaseLot>> {
    let service = PurchaseService::new(state.db);
    let lot = service.update(purchase_id, input).await?;
    Ok(Json(lot))
}

/// Delete a purchase lot
pub async fn delete_purchase(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PurchaseService::new(state.db);
    service.delete(purchase_id).await?;
    Ok(Json(()))
}

/// Get low-stock alerts, most depleted first
pub async fn get_deficiency_alerts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<DeficiencyAlert>>> {
    let service = PurchaseService::new(state.db);
    let alerts = service.deficiency_alerts().await?;
    Ok(Json(alerts))
}
