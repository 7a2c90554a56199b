//! HTTP error taxonomy. Handlers return `Result<_, ApiError>`; the body is
//! always `{"error": "<message>"}`.

use axum::extract::rejection::QueryRejection;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

pub const INTERNAL_MESSAGE: &str = "Erro interno do servidor";
pub const UNAUTHORIZED_MESSAGE: &str = "Não autorizado";
pub const INVALID_QUERY_MESSAGE: &str = "Parâmetros de consulta inválidos";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Duplicate(what) => ApiError::Conflict(what),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", e.body_text());
        ApiError::Validation(INVALID_QUERY_MESSAGE.to_string())
    }
}

/// `Query` that rejects with a JSON [`ApiError`] body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!(status = %status, error = ?err, "Server error in API handler");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
