//! `/api/transactions` handlers.
//!
//! The collection endpoints are batch operations: they always answer 200 and list
//! per-item failures in the message. The single-transaction endpoints report errors
//! through the status code like the rest of the API.

use super::{
    AppState,
    response::{ApiError, ApiResult, JsonBody, QueryParams, UrlPath, batch, success},
};
use crate::core::{
    matching::{self, DEFAULT_DAY_THRESHOLD},
    parse::parse_id_list,
    transaction::{self, CategorizeFilter, TransactionUpdate},
};
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

/// Query string of the listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    account_ids: Option<String>,
    categorize_type: Option<String>,
}

/// Body of the add, categorize and update batch requests.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    transactions: Vec<Value>,
}

/// Body of a single update.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    transaction: TransactionUpdate,
}

/// Body of a batch delete.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    transaction_ids: Vec<Value>,
}

/// Query string of a match lookup.
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    day_threshold: Option<i64>,
    uncategorized_only: Option<bool>,
}

/// `GET /api/transactions?account_ids=1,2&categorize_type=`
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult {
    let raw_ids = query
        .account_ids
        .ok_or_else(|| ApiError::BadRequest("URL is missing account_ids values.".to_string()))?;

    let account_ids = parse_id_list(&raw_ids)?;
    if account_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "No account_ids found in the request.".to_string(),
        ));
    }

    let filter = CategorizeFilter::parse(query.categorize_type.as_deref());
    let transactions =
        transaction::get_transactions_by_account(&state.db, &account_ids, filter).await?;

    Ok(success(json!({ "transactions": transactions })))
}

/// `POST /api/transactions`
#[tracing::instrument(skip(state, request))]
pub async fn add(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BatchRequest>,
) -> ApiResult {
    let outcome = transaction::add_transactions(&state.db, request.transactions).await;
    Ok(batch(&outcome))
}

/// `PUT /api/transactions`
#[tracing::instrument(skip(state, request))]
pub async fn categorize(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BatchRequest>,
) -> ApiResult {
    let outcome = transaction::categorize_transactions(&state.db, request.transactions).await;
    Ok(batch(&outcome))
}

/// `PATCH /api/transactions`
#[tracing::instrument(skip(state, request))]
pub async fn update_many(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BatchRequest>,
) -> ApiResult {
    let outcome = transaction::update_transactions(&state.db, request.transactions).await;
    Ok(batch(&outcome))
}

/// `PUT /api/transactions/{id}`
#[tracing::instrument(skip(state))]
pub async fn update_one(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
    JsonBody(request): JsonBody<UpdateRequest>,
) -> ApiResult {
    let updated = transaction::update_transaction(&state.db, id, request.transaction).await?;
    Ok(success(json!({ "transaction": updated })))
}

/// `DELETE /api/transactions`
#[tracing::instrument(skip(state, request))]
pub async fn remove(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteRequest>,
) -> ApiResult {
    let outcome = transaction::remove_transactions(&state.db, &request.transaction_ids).await;
    Ok(batch(&outcome))
}

/// `GET /api/transactions/{id}/matches?day_threshold=&uncategorized_only=`
#[tracing::instrument(skip(state))]
pub async fn matches(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<i64>,
    QueryParams(query): QueryParams<MatchQuery>,
) -> ApiResult {
    let matches = matching::find_matching_transactions(
        state.db.as_ref(),
        id,
        query.day_threshold.unwrap_or(DEFAULT_DAY_THRESHOLD),
        query.uncategorized_only.unwrap_or(false),
    )
    .await?;

    Ok(success(json!({ "matches": matches })))
}
