//! Catalog aggregation and the `/api/content/*` handlers.
//!
//! Upstream failures never reach the client: every catalog call that fails
//! is logged and answered with an empty result.

use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::{ApiError, ApiQuery};
use crate::models::{ContentItem, ContentPage, ContentType, EpisodeSummary, MediaKind, SeasonSummary};
use crate::player::{PlayerOptions, PlayerUrlBuilder};
use crate::superflix::{IdType, ListCategory, ListParams, SortOrder};
use crate::tmdb::{TimeWindow, TmdbApi};

const UNAVAILABLE_MESSAGE: &str = "Conteúdo indisponível";

#[derive(Clone)]
pub struct Catalog {
    tmdb: Arc<dyn TmdbApi>,
}

impl Catalog {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self { tmdb }
    }

    pub async fn trending(&self, kind: MediaKind, window: TimeWindow) -> Vec<ContentItem> {
        self.tmdb
            .trending(kind, window)
            .await
            .unwrap_or_else(|e| degraded("trending", e))
    }

    pub async fn popular(&self, kind: MediaKind) -> Vec<ContentItem> {
        self.tmdb
            .popular(kind)
            .await
            .unwrap_or_else(|e| degraded("popular", e))
    }

    pub async fn discover(&self, kind: MediaKind, page: u32, genre: Option<u32>) -> ContentPage {
        match self.tmdb.discover(kind, page, genre).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Upstream discover failed, returning empty page: {:#}", e);
                ContentPage::empty()
            }
        }
    }

    pub async fn search(&self, query: &str, kind: Option<MediaKind>) -> Vec<ContentItem> {
        self.tmdb
            .search(query, kind)
            .await
            .unwrap_or_else(|e| degraded("search", e))
    }

    pub async fn details(&self, id: &str, kind: MediaKind) -> Option<ContentItem> {
        self.tmdb
            .details(id, kind)
            .await
            .map_err(|e| warn!("Upstream details failed for {} {}: {:#}", kind, id, e))
            .ok()
    }

    pub async fn imdb_id(&self, tmdb_id: &str, kind: MediaKind) -> Option<String> {
        match self.tmdb.imdb_id(tmdb_id, kind).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Upstream external ids failed for {} {}: {:#}", kind, tmdb_id, e);
                None
            }
        }
    }

    pub async fn seasons(&self, tv_id: &str) -> Vec<SeasonSummary> {
        self.tmdb
            .seasons(tv_id)
            .await
            .unwrap_or_else(|e| degraded("seasons", e))
    }

    pub async fn episodes(&self, tv_id: &str, season: u32) -> Vec<EpisodeSummary> {
        self.tmdb
            .episodes(tv_id, season)
            .await
            .unwrap_or_else(|e| degraded("episodes", e))
    }
}

fn degraded<T>(operation: &str, e: anyhow::Error) -> Vec<T> {
    warn!("Upstream {} failed, returning empty list: {:#}", operation, e);
    Vec::new()
}

/// Missing `type` means movies; anything unrecognized yields no kind.
fn kind_or_movie(raw: Option<&str>) -> Option<MediaKind> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(MediaKind::Movie),
        Some(s) => s.parse().ok(),
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct KindQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImdbQuery {
    pub tmdb_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesQuery {
    pub tmdb_id: Option<String>,
    pub season: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub id_type: Option<String>,
    pub order: Option<String>,
}

/// Parse a lowercase query value into one of the provider's enums.
fn provider_value<T: DeserializeOwned>(raw: &Option<String>) -> Option<T> {
    let raw = non_empty(raw)?.to_lowercase();
    serde_json::from_value(Value::String(raw)).ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub id: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    #[serde(default)]
    pub branded: bool,
}

/// GET /api/content/popular
pub async fn popular(State(state): State<AppState>, ApiQuery(q): ApiQuery<KindQuery>) -> Json<Value> {
    let contents = match kind_or_movie(q.kind.as_deref()) {
        Some(kind) => state.catalog.popular(kind).await,
        None => Vec::new(),
    };
    Json(json!({ "contents": contents }))
}

/// GET /api/content/trending
pub async fn trending(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<TrendingQuery>,
) -> Json<Value> {
    let window = q
        .time
        .as_deref()
        .and_then(TimeWindow::parse)
        .unwrap_or_default();
    let contents = match kind_or_movie(q.kind.as_deref()) {
        Some(kind) => state.catalog.trending(kind, window).await,
        None => Vec::new(),
    };
    Json(json!({ "contents": contents }))
}

/// GET /api/content/discover
pub async fn discover(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<DiscoverQuery>,
) -> Json<ContentPage> {
    let page = q
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let genre = q.genre.as_deref().and_then(|g| g.trim().parse::<u32>().ok());
    let result = match kind_or_movie(q.kind.as_deref()) {
        Some(kind) => state.catalog.discover(kind, page, genre).await,
        None => ContentPage::empty(),
    };
    Json(result)
}

/// GET /api/content/search
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let query = non_empty(&q.q)
        .ok_or_else(|| ApiError::Validation("Query de busca é obrigatório".into()))?;
    let kind = non_empty(&q.kind).and_then(|k| k.parse::<MediaKind>().ok());
    debug!(query = %query, kind = ?kind, "Searching catalog");
    let contents = state.catalog.search(query, kind).await;
    Ok(Json(json!({ "contents": contents })))
}

/// GET /api/content/imdb
pub async fn imdb(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ImdbQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(tmdb_id), Some(kind)) = (
        non_empty(&q.tmdb_id),
        non_empty(&q.kind).and_then(|k| k.parse::<MediaKind>().ok()),
    ) else {
        return Err(ApiError::Validation("TMDb ID e tipo são obrigatórios".into()));
    };
    let imdb_id = state.catalog.imdb_id(tmdb_id, kind).await;
    Ok(Json(json!({ "imdbId": imdb_id })))
}

/// GET /api/content/details
pub async fn details(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<DetailsQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(id), Some(kind)) = (non_empty(&q.id), kind_or_movie(q.kind.as_deref())) else {
        return Err(ApiError::Validation("ID e tipo são obrigatórios".into()));
    };
    let content = state.catalog.details(id, kind).await;
    Ok(Json(json!({ "content": content })))
}

/// GET /api/content/seasons
pub async fn seasons(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<EpisodesQuery>,
) -> Result<Json<Value>, ApiError> {
    let tmdb_id =
        non_empty(&q.tmdb_id).ok_or_else(|| ApiError::Validation("TMDb ID é obrigatório".into()))?;
    let seasons = state.catalog.seasons(tmdb_id).await;
    Ok(Json(json!({ "seasons": seasons })))
}

/// GET /api/content/episodes
pub async fn episodes(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<EpisodesQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(tmdb_id), Some(season)) = (non_empty(&q.tmdb_id), q.season) else {
        return Err(ApiError::Validation(
            "TMDb ID e temporada são obrigatórios".into(),
        ));
    };
    let episodes = state.catalog.episodes(tmdb_id, season).await;
    Ok(Json(json!({ "episodes": episodes })))
}

/// GET /api/content/list
pub async fn provider_list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Json<Value> {
    // Missing category means movies; an unknown one lists nothing.
    let category = match non_empty(&q.category) {
        None => Some(ListCategory::Movie),
        Some(_) => provider_value::<ListCategory>(&q.category),
    };
    let Some(category) = category else {
        return Json(json!({ "ids": [] }));
    };
    let params = ListParams {
        category,
        id_type: provider_value::<IdType>(&q.id_type).unwrap_or_default(),
        order: provider_value::<SortOrder>(&q.order).unwrap_or_default(),
    };
    let ids = state
        .superflix
        .content_list(params)
        .await
        .unwrap_or_else(|e| degraded("provider list", e));
    Json(json!({ "ids": ids }))
}

/// GET /api/calendar
pub async fn calendar(State(state): State<AppState>) -> Json<Value> {
    let data = state
        .superflix
        .calendar()
        .await
        .unwrap_or_else(|e| degraded("calendar", e));
    Json(json!({ "success": true, "data": data }))
}

/// GET /api/player
///
/// Movies play by IMDb id; when only the TMDb id is known it is translated
/// first. Series play by TMDb id, season and episode.
pub async fn player(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<PlayerQuery>,
) -> Result<Json<Value>, ApiError> {
    let content_type = non_empty(&q.kind)
        .map(|k| k.parse::<ContentType>())
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?
        .unwrap_or(ContentType::Movie);

    let id = match content_type {
        ContentType::Movie => match non_empty(&q.imdb_id) {
            Some(imdb) => Some(imdb.to_string()),
            None => match non_empty(&q.tmdb_id).or(non_empty(&q.id)) {
                Some(tmdb_id) => state.catalog.imdb_id(tmdb_id, MediaKind::Movie).await,
                None => None,
            },
        },
        ContentType::Series | ContentType::Anime => {
            non_empty(&q.tmdb_id).or(non_empty(&q.id)).map(str::to_string)
        }
    };
    let id = id.ok_or_else(|| ApiError::NotFound(UNAVAILABLE_MESSAGE.into()))?;

    let url = state
        .player
        .player_url(&id, content_type, q.season, q.episode)
        .map_err(|e| {
            debug!("Cannot build player url: {}", e);
            ApiError::NotFound(UNAVAILABLE_MESSAGE.into())
        })?;
    let url = if q.branded {
        PlayerUrlBuilder::with_options(url, &PlayerOptions::branded())
    } else {
        url
    };
    Ok(Json(json!({ "url": url })))
}
