//! HTTP handlers for cash sale (income) endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::income::{CreateIncomeInput, IncomeService, SaleFilter, UpdateIncomeInput};
use crate::AppState;
use crate::models::Income;

/// Record a cash sale
pub async fn create_income(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateIncomeInput>,
) -> AppResult<Json<Income>> {
    let service = IncomeService::new(state.db);
    let income = service.create(input).await?;
    Ok(Json(income))
}

/// List cash sales, optionally limited to a date range
pub async fn list_income(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<Income>>> {
    let service = IncomeService::new(state.db);
    let records = service.list(&filter).await?;
    Ok(Json(records))
}

/// Get a cash sale
pub async fn get_income(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(income_id): Path<Uuid>,
) -> AppResult<Json<Income>> {
    let service = IncomeService::new(state.db);
    let income = service.get(income_id).await?;
    Ok(Json(income))
}

/// Update a cash sale
pub async fn update_income(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(income_id): Path<Uuid>,
    Json(input): Json<UpdateIncomeInput>,
) -> AppResult<Json<Income>> {
    let service = IncomeService::new(state.db);
    let income = service.update(income_id, input).await?;
    Ok(Json(income))
}

/// Delete a cash sale, restoring its stock
pub async fn delete_income(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(income_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = IncomeService::new(state.db);
    service.delete(income_id).await?;
    Ok(Json(()))
}
