//! HTTP handlers for currency endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::currency::{CreateCurrencyInput, CurrencyService};
use crate::AppState;
use crate::models::Currency;

/// List currencies
pub async fn list_currencies(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Currency>>> {
    let service = CurrencyService::new(state.db);
    let currencies = service.list().await?;
    Ok(Json(currencies))
}

/// Add a currency
pub async fn create_currency(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateCurrencyInput>,
) -> AppResult<Json<Currency>> {
    let service = CurrencyService::new(state.db);
    let currency = service.create(input).await?;
    Ok(Json(currency))
}

/// Make a currency the default
pub async fn set_default_currency(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(currency_id): Path<Uuid>,
) -> AppResult<Json<Currency>> {
    let service = CurrencyService::new(state.db);
    let currency = service.set_default(currency_id).await?;
    Ok(Json(currency))
}

/// Remove a currency
pub async fn delete_currency(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(currency_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CurrencyService::new(state.db);
    service.delete(currency_id).await?;
    Ok(Json(()))
}
