//! HTTP layer - axum routes over the core services.
//!
//! Handlers only extract request data, call into `core` and wrap the result in the
//! `{"message": ...}` envelope from [`response`].

/// `/api/accounttypes`
pub mod account_types;
/// `/api/accounts`
pub mod accounts;
/// Message envelope, error mapping and extractors
pub mod response;
/// `/api/transactions`
pub mod transactions;

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use response::{ApiResult, success};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Arc<DatabaseConnection>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/accounttypes",
            get(account_types::list).post(account_types::create),
        )
        .route(
            "/api/accounts",
            get(accounts::list)
                .post(accounts::create)
                .put(accounts::update)
                .delete(accounts::remove),
        )
        .route("/api/accounts/balances", get(accounts::balances))
        .route(
            "/api/accounts/balances-by-group",
            post(accounts::balances_by_group),
        )
        .route(
            "/api/transactions",
            get(transactions::list)
                .post(transactions::add)
                .put(transactions::categorize)
                .patch(transactions::update_many)
                .delete(transactions::remove),
        )
        .route("/api/transactions/:id", put(transactions::update_one))
        .route("/api/transactions/:id/matches", get(transactions::matches))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> ApiResult {
    state.db.ping().await.map_err(crate::errors::Error::from)?;

    Ok(success(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
