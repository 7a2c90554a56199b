//! `/api/favorites` handlers. Every route takes a [`Session`] first, so an
//! anonymous caller is rejected before the body is read.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::auth::Session;
use crate::db::{self, favorites};
use crate::error::ApiError;

const MISSING_FIELDS: &str = "Dados obrigatórios em falta";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub content_id: Option<Value>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub year: Option<Value>,
    pub rating: Option<Value>,
}

/// Clients send ids, years and ratings either as strings or as numbers.
fn scalar_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl AddFavoriteRequest {
    fn into_new_favorite(self) -> Result<favorites::NewFavorite, ApiError> {
        let (Some(content_id), Some(content_type), Some(title)) = (
            scalar_text(&self.content_id),
            text(&self.content_type),
            text(&self.title),
        ) else {
            return Err(ApiError::Validation(MISSING_FIELDS.into()));
        };
        Ok(favorites::NewFavorite {
            content_id,
            content_type,
            title,
            poster: text(&self.poster),
            year: scalar_text(&self.year),
            rating: scalar_text(&self.rating),
        })
    }
}

/// GET /api/favorites
pub async fn list(session: Session, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let conn = db::get_conn(&state.db)?;
    let favorites = favorites::list_favorites(&conn, session.user_id())?;
    Ok(Json(json!({ "favorites": favorites })))
}

/// POST /api/favorites
pub async fn add(
    session: Session,
    State(state): State<AppState>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::Validation(MISSING_FIELDS.into()))?;
    let new = req.into_new_favorite()?;

    let conn = db::get_conn(&state.db)?;
    let favorite = favorites::add_favorite(&conn, session.user_id(), new)?;
    info!(
        "User {} added {} '{}' to favorites",
        session.user_id(),
        favorite.content_id,
        favorite.title
    );
    Ok(Json(json!({ "favorite": favorite })))
}

/// DELETE /api/favorites/:id
pub async fn remove(
    session: Session,
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let conn = db::get_conn(&state.db)?;
    let deleted = favorites::remove_favorite(&conn, session.user_id(), content_id.trim())?;
    info!(
        "User {} removed {} from favorites",
        session.user_id(),
        deleted.content_id
    );
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
