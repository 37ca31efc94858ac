//! Response envelope, error mapping and extractors shared by all handlers.
//!
//! Every response body is a JSON object with a `message` key: `"SUCCESS"` on success,
//! the error text otherwise. Extractor rejections (bad JSON, bad query strings, bad
//! path segments) are rendered in the same envelope with status 400.

use crate::{
    core::batch::{BatchOutcome, SUCCESS},
    errors::Error,
};
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A service call failed
    #[error(transparent)]
    Core(#[from] Error),

    /// The request itself is missing something or could not be read
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Core(
                Error::Validation { .. }
                | Error::InvalidAmount { .. }
                | Error::Payload(_)
                | Error::Date(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Core(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::debug!("Rejected request ({}): {}", status, message);
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Handler result; the success body defaults to the JSON envelope.
pub type ApiResult<T = Json<Value>> = Result<T, ApiError>;

/// `axum::Json` with rejections rendered in the message envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` with rejections rendered in the message envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// `axum::extract::Path` with rejections rendered in the message envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct UrlPath<T>(pub T);

/// Adds `"message": "SUCCESS"` to a JSON object body.
pub fn success(mut body: Value) -> Json<Value> {
    if let Value::Object(fields) = &mut body {
        fields.insert("message".to_string(), Value::from(SUCCESS));
    }
    Json(body)
}

/// Batch endpoints answer 200 either way; the message lists any failed items.
pub fn batch(outcome: &BatchOutcome) -> Json<Value> {
    Json(json!({
        "message": outcome.message(),
        "transaction_ids": outcome.succeeded,
    }))
}
