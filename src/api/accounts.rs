//! `/api/accounts` handlers.

use super::{
    AppState,
    response::{ApiError, ApiResult, JsonBody, QueryParams, success},
};
use crate::{
    core::{
        account::{self, AccountTypeFilter, AccountUpdate, NewAccount},
        balance::BalanceWindow,
        parse::{self, parse_date, parse_id_list},
        report,
    },
    errors::Error,
};
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

/// Query string of the account listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    account_type: Option<String>,
    balance_start_date: Option<String>,
    balance_end_date: Option<String>,
}

/// `editedAccount` of an update request.
#[derive(Debug, Deserialize)]
pub struct EditedAccount {
    #[serde(deserialize_with = "parse::flexible_i64")]
    id: i64,
    #[serde(flatten)]
    update: AccountUpdate,
}

/// Body of an update request.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "editedAccount")]
    edited_account: Option<EditedAccount>,
}

/// Query string of a delete request.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    id: Option<String>,
}

/// Query string of a balances request.
#[derive(Debug, Deserialize)]
pub struct BalancesQuery {
    account_ids: Option<String>,
}

/// Body of a group report request.
#[derive(Debug, Deserialize)]
pub struct GroupReportRequest {
    #[serde(default, rename = "accountGroups")]
    account_groups: Vec<String>,
    #[serde(default, rename = "dateRanges")]
    date_ranges: Vec<String>,
}

/// `GET /api/accounts?account_type=&balance_start_date=&balance_end_date=`
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult {
    let start = query.balance_start_date.as_deref().map(parse_date).transpose()?;
    let end = query.balance_end_date.as_deref().map(parse_date).transpose()?;

    let filter = AccountTypeFilter::parse(query.account_type.as_deref());
    let accounts =
        account::get_accounts_by_type(&state.db, &filter, BalanceWindow::from_dates(start, end))
            .await?;

    Ok(success(json!({ "accounts": accounts })))
}

/// `POST /api/accounts`
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(new_account): JsonBody<NewAccount>,
) -> ApiResult {
    let created = account::create_account(&state.db, new_account).await?;

    Ok(success(json!({
        "account_id": created.id,
        "account_name": created.name,
    })))
}

/// `PUT /api/accounts`
#[tracing::instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateRequest>,
) -> ApiResult {
    let edited = request.edited_account.ok_or_else(|| {
        ApiError::BadRequest("No field for 'editedAccount' found within the request body.".to_string())
    })?;

    let updated = account::update_account(&state.db, edited.id, edited.update).await?;
    Ok(success(json!({ "account": updated })))
}

/// `DELETE /api/accounts?id=`
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> ApiResult {
    let raw = query.id.ok_or_else(|| {
        ApiError::BadRequest("No field for 'id' found within the request url.".to_string())
    })?;
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::validation(format!("invalid integer id: '{raw}'")))?;

    account::delete_account(&state.db, id).await?;
    Ok(success(json!({})))
}

/// `GET /api/accounts/balances?account_ids=1,2`
#[tracing::instrument(skip(state))]
pub async fn balances(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BalancesQuery>,
) -> ApiResult {
    let ids = parse_id_list(query.account_ids.as_deref().unwrap_or_default())?;
    let balances = account::account_balances(&state.db, &ids).await?;

    Ok(success(json!({ "balances": balances })))
}

/// `POST /api/accounts/balances-by-group`
#[tracing::instrument(skip(state))]
pub async fn balances_by_group(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<GroupReportRequest>,
) -> ApiResult {
    let report =
        report::account_net_changes_by_group(&state.db, &request.account_groups, &request.date_ranges)
            .await?;

    Ok(success(json!({
        "dates": report.dates,
        "groups": report.groups,
    })))
}
