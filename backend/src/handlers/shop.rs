//! HTTP handlers for storefront profile endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::shop::{ShopService, UpdateShopProfileInput};
use crate::AppState;
use crate::models::ShopProfile;

/// Get the storefront profile
pub async fn get_shop_profile(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<ShopProfile>> {
    let service = ShopService::new(state.db);
    let profile = service.get().await?;
    Ok(Json(profile))
}

/// Update the storefront profile
pub async fn update_shop_profile(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<UpdateShopProfileInput>,
) -> AppResult<Json<ShopProfile>> {
    let service = ShopService::new(state.db);
    let profile = service.update(input).await?;
    Ok(Json(profile))
}
