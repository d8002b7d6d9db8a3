//! Route definitions for the Shopbook backend

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - purchase lots and stock alerts
        .nest("/purchases", purchase_routes())
        // Protected routes - cash sales
        .nest("/income", income_routes())
        // Protected routes - credit sales and repayments
        .nest("/debts", debt_routes())
        // Protected routes - expenses
        .nest("/expenses", expense_routes())
        // Protected routes - currencies
        .nest("/currencies", currency_routes())
        // Protected routes - storefront profile
        .nest("/shop", shop_routes())
        // Protected routes - reporting
        .nest("/reports", reporting_routes())
        // Protected routes - backup and restore
        .nest("/backup", backup_routes())
}

/// Authentication routes (register/login/refresh public, profile protected)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(
            Router::new()
                .route("/me", get(handlers::me))
                .route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Purchase lot routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route("/deficiency-alerts", get(handlers::get_deficiency_alerts))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Cash sale routes (protected)
fn income_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_income).post(handlers::create_income))
        .route(
            "/:income_id",
            get(handlers::get_income)
                .put(handlers::update_income)
                .delete(handlers::delete_income),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Credit sale and repayment routes (protected)
fn debt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_debts).post(handlers::create_debt))
        .route(
            "/:debt_id",
            get(handlers::get_debt)
                .put(handlers::update_debt)
                .delete(handlers::delete_debt),
        )
        .route(
            "/:debt_id/repayments",
            get(handlers::list_repayments).post(handlers::create_repayment),
        )
        .route(
            "/repayments/:repayment_id",
            put(handlers::update_repayment).delete(handlers::delete_repayment),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Expense routes (protected)
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_expenses).post(handlers::create_expense))
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Currency routes (protected)
fn currency_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_currencies).post(handlers::create_currency))
        .route("/:currency_id/default", post(handlers::set_default_currency))
        .route("/:currency_id", delete(handlers::delete_currency))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Storefront profile routes (protected)
fn shop_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::get_shop_profile).put(handlers::update_shop_profile),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/gain-loss", get(handlers::get_gain_loss))
        .route("/gain-loss/export", get(handlers::export_gain_loss_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Backup routes (protected, owner only)
fn backup_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::export_backup).post(handlers::restore_backup))
        .route_layer(middleware::from_fn(auth_middleware))
}
