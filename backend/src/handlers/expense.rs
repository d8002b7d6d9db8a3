//! HTTP handlers for expense endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::expense::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
use crate::services::income::SaleFilter;
use crate::AppState;
use crate::models::Expense;

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.create(input).await?;
    Ok(Json(expense))
}

/// List expenses, optionally limited to a date range
pub async fn list_expenses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service.list(&filter).await?;
    Ok(Json(expenses))
}

/// Get an expense
pub async fn get_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.get(expense_id).await?;
    Ok(Json(expense))
}

/// Update an expense
pub async fn update_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<UpdateExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.update(expense_id, input).await?;
    Ok(Json(expense))
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExpenseService::new(state.db);
    service.delete(expense_id).await?;
    Ok(Json(()))
}
