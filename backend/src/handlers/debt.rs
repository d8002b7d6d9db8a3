//! HTTP handlers for credit sale (debt) and repayment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::debt::{
    CreateDebtInput, CreateRepaymentInput, DebtService, UpdateDebtInput, UpdateRepaymentInput,
};
use crate::services::income::SaleFilter;
use crate::AppState;
use crate::models::{Debt, DebtRepayment, DebtState};

/// Debt response with its derived state
#[derive(Debug, serde::Serialize)]
pub struct DebtResponse {
    #[serde(flatten)]
    pub debt: Debt,
    pub state: DebtState,
}

impl From<Debt> for DebtResponse {
    fn from(debt: Debt) -> Self {
        let state = debt.state();
        DebtResponse { debt, state }
    }
}

/// Record a credit sale
pub async fn create_debt(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateDebtInput>,
) -> AppResult<Json<DebtResponse>> {
    let service = DebtService::new(state.db);
    let debt = service.create(input).await?;
    Ok(Json(debt.into()))
}

/// List credit sales, optionally limited to a date range
pub async fn list_debts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<DebtResponse>>> {
    let service = DebtService::new(state.db);
    let debts = service.list(&filter).await?;
    Ok(Json(debts.into_iter().map(Into::into).collect()))
}

/// Get a credit sale
pub async fn get_debt(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
) -> AppResult<Json<DebtResponse>> {
    let service = DebtService::new(state.db);
    let debt = service.get(debt_id).await?;
    Ok(Json(debt.into()))
}

/// Update a credit sale
pub async fn update_debt(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
    Json(input): Json<UpdateDebtInput>,
) -> AppResult<Json<DebtResponse>> {
    let service = DebtService::new(state.db);
    let debt = service.update(debt_id, input).await?;
    Ok(Json(debt.into()))
}

/// Delete a credit sale, restoring its stock
pub async fn delete_debt(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = DebtService::new(state.db);
    service.delete(debt_id).await?;
    Ok(Json(()))
}

/// Record a repayment against a debt
pub async fn create_repayment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
    Json(input): Json<CreateRepaymentInput>,
) -> AppResult<Json<DebtRepayment>> {
    let service = DebtService::new(state.db);
    let repayment = service.create_repayment(debt_id, input).await?;
    Ok(Json(repayment))
}

/// List repayments for a debt
pub async fn list_repayments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
) -> AppResult<Json<Vec<DebtRepayment>>> {
    let service = DebtService::new(state.db);
    let repayments = service.list_repayments(debt_id).await?;
    Ok(Json(repayments))
}

/// Revise a repayment
pub async fn update_repayment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(repayment_id): Path<Uuid>,
    Json(input): Json<UpdateRepaymentInput>,
) -> AppResult<Json<DebtRepayment>> {
    let service = DebtService::new(state.db);
    let repayment = service.update_repayment(repayment_id, input).await?;
    Ok(Json(repayment))
}

/// Delete a repayment, reversing its effect on the debt
pub async fn delete_repayment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(repayment_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = DebtService::new(state.db);
    service.delete_repayment(repayment_id).await?;
    Ok(Json(()))
}
