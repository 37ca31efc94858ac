//! `/api/accounttypes` handlers.

use super::{
    AppState,
    response::{ApiError, ApiResult, JsonBody, QueryParams, success},
};
use crate::core::account_type;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

/// Query string of the listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    group: Option<String>,
}

/// Body of a create request.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    group: Option<String>,
}

/// `GET /api/accounttypes?group=`
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult {
    let account_types = account_type::get_account_types(&state.db, query.group.as_deref()).await?;
    Ok(success(json!({ "account_types": account_types })))
}

/// `POST /api/accounttypes`
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateRequest>,
) -> ApiResult {
    let name = request
        .name
        .ok_or_else(|| ApiError::BadRequest("Please include a name in the request.".to_string()))?;

    let created = account_type::create_account_type(
        state.db.as_ref(),
        &name,
        request.group.as_deref(),
    )
    .await?;

    Ok(success(json!({
        "account_type_id": created.id,
        "account_type": created,
    })))
}
