use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use streamflix::app::{build_router, AppState};
use streamflix::config::Config;
use streamflix::db::{self, favorites};
use streamflix::models::{
    ContentItem, ContentPage, ContentType, EpisodeSummary, MediaKind, SeasonSummary,
};
use streamflix::superflix::{CalendarItem, ListParams, ReleaseStatus, SuperflixApi};
use streamflix::tmdb::{TimeWindow, TmdbApi};
use tower::util::ServiceExt;

fn item(id: &str, title: &str, kind: MediaKind) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        title: title.to_string(),
        content_type: kind.content_type(),
        poster: None,
        backdrop: None,
        year: Some("1972".to_string()),
        rating: Some("8.7".to_string()),
        overview: None,
        genres: Vec::new(),
        runtime: None,
        seasons: None,
        episodes: None,
        cast: Vec::new(),
        director: None,
        imdb_id: None,
        tmdb_id: Some(id.to_string()),
    }
}

struct FakeTmdb;

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn trending(&self, kind: MediaKind, _window: TimeWindow) -> anyhow::Result<Vec<ContentItem>> {
        Ok(vec![item("238", "O Poderoso Chefão", kind)])
    }
    async fn popular(&self, kind: MediaKind) -> anyhow::Result<Vec<ContentItem>> {
        Ok(vec![
            item("238", "O Poderoso Chefão", kind),
            item("424", "A Lista de Schindler", kind),
        ])
    }
    async fn discover(
        &self,
        kind: MediaKind,
        page: u32,
        _genre: Option<u32>,
    ) -> anyhow::Result<ContentPage> {
        Ok(ContentPage {
            results: vec![item("238", "O Poderoso Chefão", kind)],
            page,
            total_pages: 5,
            total_results: 100,
        })
    }
    async fn search(&self, query: &str, _kind: Option<MediaKind>) -> anyhow::Result<Vec<ContentItem>> {
        Ok(vec![item("1", query, MediaKind::Movie)])
    }
    async fn details(&self, id: &str, kind: MediaKind) -> anyhow::Result<ContentItem> {
        Ok(item(id, "Detalhe", kind))
    }
    async fn imdb_id(&self, id: &str, _kind: MediaKind) -> anyhow::Result<Option<String>> {
        Ok(match id {
            "238" => Some("tt0068646".to_string()),
            _ => None,
        })
    }
    async fn seasons(&self, _tv_id: &str) -> anyhow::Result<Vec<SeasonSummary>> {
        Ok(vec![SeasonSummary {
            season_number: 1,
            name: "Temporada 1".to_string(),
            episode_count: 10,
            air_date: None,
            poster: None,
            overview: None,
        }])
    }
    async fn episodes(&self, _tv_id: &str, season: u32) -> anyhow::Result<Vec<EpisodeSummary>> {
        Ok(vec![EpisodeSummary {
            episode_number: 1,
            season_number: season,
            name: "Episódio 1".to_string(),
            overview: None,
            still: None,
            runtime: Some(60),
            air_date: None,
        }])
    }
}

struct FailingTmdb;

#[async_trait::async_trait]
impl TmdbApi for FailingTmdb {
    async fn trending(&self, _: MediaKind, _: TimeWindow) -> anyhow::Result<Vec<ContentItem>> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn popular(&self, _: MediaKind) -> anyhow::Result<Vec<ContentItem>> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn discover(&self, _: MediaKind, _: u32, _: Option<u32>) -> anyhow::Result<ContentPage> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn search(&self, _: &str, _: Option<MediaKind>) -> anyhow::Result<Vec<ContentItem>> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn details(&self, _: &str, _: MediaKind) -> anyhow::Result<ContentItem> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn imdb_id(&self, _: &str, _: MediaKind) -> anyhow::Result<Option<String>> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn seasons(&self, _: &str) -> anyhow::Result<Vec<SeasonSummary>> {
        Err(anyhow::anyhow!("upstream down"))
    }
    async fn episodes(&self, _: &str, _: u32) -> anyhow::Result<Vec<EpisodeSummary>> {
        Err(anyhow::anyhow!("upstream down"))
    }
}

struct FakeSuperflix {
    fail: bool,
}

#[async_trait::async_trait]
impl SuperflixApi for FakeSuperflix {
    async fn content_list(&self, _params: ListParams) -> anyhow::Result<Vec<String>> {
        if self.fail {
            return Err(anyhow::anyhow!("superflix down"));
        }
        Ok(vec!["238".to_string(), "424".to_string()])
    }
    async fn calendar(&self) -> anyhow::Result<Vec<CalendarItem>> {
        if self.fail {
            return Err(anyhow::anyhow!("superflix down"));
        }
        Ok(vec![CalendarItem {
            title: "Arcane".to_string(),
            episode_title: Some("Piloto".to_string()),
            episode_number: Some(1),
            season_number: Some(2),
            air_date: Some("2024-11-09".to_string()),
            poster_path: None,
            backdrop_path: None,
            tmdb_id: Some("94605".to_string()),
            imdb_id: None,
            status: Some(ReleaseStatus::Hoje),
        }])
    }
}

fn test_config() -> Config {
    Config {
        tmdb_api_key: "test-key".to_string(),
        session_secret: "test-session-secret".to_string(),
        password_cost: 4,
        ..Config::default()
    }
}

fn state_with(tmdb: Arc<dyn TmdbApi>, superflix: Arc<dyn SuperflixApi>) -> AppState {
    let pool = db::init_memory_pool().unwrap();
    AppState::new(test_config(), pool, tmdb, superflix)
}

fn test_state() -> AppState {
    state_with(Arc::new(FakeTmdb), Arc::new(FakeSuperflix { fail: false }))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn delete_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn signed_in(app: &Router, email: &str) -> String {
    let (status, _, _) = send(
        app,
        post_json(
            "/api/signup",
            json!({
                "firstName": "John",
                "lastName": "Doe",
                "email": email,
                "password": "johndoe123"
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        app,
        post_json(
            "/api/auth/signin",
            json!({ "email": email, "password": "johndoe123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn godfather() -> Value {
    json!({
        "contentId": "238",
        "contentType": "movie",
        "title": "The Godfather",
        "poster": "https://image.tmdb.org/t/p/w500/godfather.jpg",
        "year": "1972",
        "rating": "9.2"
    })
}

#[tokio::test]
async fn signup_signin_and_session_cookie() {
    let app = build_router(test_state());
    let (status, _, body) = send(
        &app,
        post_json(
            "/api/signup",
            json!({
                "firstName": "John",
                "lastName": "Doe",
                "email": "John@Doe.com",
                "password": "johndoe123"
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "john@doe.com");
    assert_eq!(body["user"]["name"], "John Doe");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/signup",
            json!({
                "firstName": "Other",
                "lastName": "Person",
                "email": "john@doe.com",
                "password": "another123"
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Já existe uma conta com este e-mail");

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/auth/signin",
            json!({ "email": "john@doe.com", "password": "wrong-password" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Credenciais inválidas");

    let (status, headers, body) = send(
        &app,
        post_json(
            "/api/auth/signin",
            json!({ "email": "john@doe.com", "password": "johndoe123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("streamflix.session-token="));
    assert!(cookie.contains("HttpOnly"));
    let token = body["token"].as_str().unwrap();
    assert!(cookie.contains(token));

    let pair = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/api/auth/session")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "john@doe.com");
    assert_eq!(body["user"]["firstName"], "John");

    let (_, _, body) = send(&app, get("/api/auth/session")).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn signup_validates_fields() {
    let app = build_router(test_state());
    let cases = [
        (json!({ "email": "a@b.c", "password": "123456" }), "Por favor, preencha todos os campos"),
        (
            json!({ "firstName": "A", "lastName": "B", "email": "invalid", "password": "123456" }),
            "E-mail inválido",
        ),
        (
            json!({ "firstName": "A", "lastName": "B", "email": "a@b.c", "password": "123" }),
            "A senha deve ter pelo menos 6 caracteres",
        ),
    ];
    for (payload, message) in cases {
        let (status, _, body) = send(&app, post_json("/api/signup", payload, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn duplicate_favorite_is_a_conflict_and_stores_one_row() {
    let state = test_state();
    let pool = state.db.clone();
    let app = build_router(state);
    let token = signed_in(&app, "john@doe.com").await;

    let (status, _, body) = send(&app, post_json("/api/favorites", godfather(), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorite"]["contentId"], "238");
    assert_eq!(body["favorite"]["title"], "The Godfather");

    let (status, _, body) = send(&app, post_json("/api/favorites", godfather(), Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], favorites::DUPLICATE_MESSAGE);

    let (status, _, body) = send(&app, get_with_token("/api/favorites", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"].as_array().unwrap().len(), 1);

    let conn = db::get_conn(&pool).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn favorites_are_listed_newest_first_and_removed_by_content_id() {
    let app = build_router(test_state());
    let token = signed_in(&app, "john@doe.com").await;

    send(&app, post_json("/api/favorites", godfather(), Some(&token))).await;
    let schindler = json!({
        "contentId": 424,
        "contentType": "movie",
        "title": "Schindler's List",
        "year": 1993
    });
    let (status, _, _) = send(&app, post_json("/api/favorites", schindler, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = send(&app, get_with_token("/api/favorites", &token)).await;
    let ids: Vec<&str> = body["favorites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["contentId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["424", "238"]);

    let (status, _, body) = send(&app, delete_with_token("/api/favorites/238", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"]["title"], "The Godfather");

    let (_, _, body) = send(&app, get_with_token("/api/favorites", &token)).await;
    assert_eq!(body["favorites"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn removing_missing_favorite_is_an_error() {
    let app = build_router(test_state());
    let token = signed_in(&app, "john@doe.com").await;
    let (status, _, body) = send(&app, delete_with_token("/api/favorites/999", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], favorites::MISSING_MESSAGE);
}

#[tokio::test]
async fn favorites_of_one_user_are_invisible_to_another() {
    let app = build_router(test_state());
    let john = signed_in(&app, "john@doe.com").await;
    let jane = signed_in(&app, "jane@doe.com").await;

    send(&app, post_json("/api/favorites", godfather(), Some(&john))).await;
    let (_, _, body) = send(&app, get_with_token("/api/favorites", &jane)).await;
    assert_eq!(body["favorites"], json!([]));
    let (status, _, _) = send(&app, delete_with_token("/api/favorites/238", &jane)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_favorite_requires_fields() {
    let app = build_router(test_state());
    let token = signed_in(&app, "john@doe.com").await;
    let (status, _, body) = send(
        &app,
        post_json("/api/favorites", json!({ "contentId": "238" }), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dados obrigatórios em falta");
}

#[tokio::test]
async fn favorites_without_session_are_unauthorized() {
    let app = build_router(test_state());

    let (status, _, body) = send(&app, get("/api/favorites")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("favorites").is_none());

    let garbage = Request::builder()
        .method("POST")
        .uri("/api/favorites")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, _) = send(&app, garbage).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, delete_with_token("/api/favorites/238", "forged.token.value")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upstream_failure_degrades_to_empty_results() {
    let app = build_router(state_with(
        Arc::new(FailingTmdb),
        Arc::new(FakeSuperflix { fail: true }),
    ));

    let (status, _, body) = send(&app, get("/api/content/popular?type=movie")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contents"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/trending?type=tv&time=day")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contents"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/discover?type=movie&page=3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["total_results"], 0);

    let (status, _, body) = send(&app, get("/api/content/imdb?tmdbId=238&type=movie")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imdbId"], Value::Null);

    let (status, _, body) = send(&app, get("/api/content/search?q=matrix")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contents"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/details?id=238&type=movie")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "content": null }));

    let (status, _, body) = send(&app, get("/api/content/seasons?tmdbId=1399")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seasons"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/episodes?tmdbId=1399&season=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["episodes"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/list?category=movie")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!([]));

    let (status, _, body) = send(&app, get("/api/calendar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": [] }));
}

#[tokio::test]
async fn malformed_query_values_get_json_errors() {
    let app = build_router(test_state());

    let (status, _, body) = send(&app, get("/api/content/episodes?tmdbId=1399&season=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parâmetros de consulta inválidos");

    let (status, _, body) = send(
        &app,
        get("/api/player?type=series&tmdbId=1399&season=1&episode=-2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parâmetros de consulta inválidos");

    let (status, _, body) = send(&app, get("/api/content/list?category=foo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!([]));

    let (status, _, body) = send(&app, get("/api/content/list?category=Movie&order=sideways")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!(["238", "424"]));
}

#[tokio::test]
async fn catalog_endpoints_return_mapped_content() {
    let app = build_router(test_state());

    let (_, _, body) = send(&app, get("/api/content/popular?type=tv")).await;
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["type"], "series");

    let (_, _, body) = send(&app, get("/api/content/discover?type=movie&page=2&genre=28")).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 5);

    let (_, _, body) = send(&app, get("/api/content/discover?type=anime")).await;
    assert_eq!(body["results"], json!([]));

    let (_, _, body) = send(&app, get("/api/content/popular?type=unknown")).await;
    assert_eq!(body["contents"], json!([]));

    let (_, _, body) = send(&app, get("/api/content/imdb?tmdbId=238&type=movie")).await;
    assert_eq!(body["imdbId"], "tt0068646");

    let (_, _, body) = send(&app, get("/api/content/episodes?tmdbId=1399&season=2")).await;
    assert_eq!(body["episodes"][0]["seasonNumber"], 2);

    let (_, _, body) = send(&app, get("/api/content/list?category=serie&type=imdb&order=desc")).await;
    assert_eq!(body["ids"], json!(["238", "424"]));

    let (_, _, body) = send(&app, get("/api/calendar")).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["status"], "Hoje");
}

#[tokio::test]
async fn search_requires_query() {
    let app = build_router(test_state());
    let (status, _, body) = send(&app, get("/api/content/search?type=movie")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query de busca é obrigatório");

    let (status, _, body) = send(&app, get("/api/content/search?q=matrix")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contents"][0]["title"], "matrix");
}

#[tokio::test]
async fn imdb_lookup_requires_id_and_type() {
    let app = build_router(test_state());
    let (status, _, body) = send(&app, get("/api/content/imdb?tmdbId=238")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "TMDb ID e tipo são obrigatórios");
}

#[tokio::test]
async fn player_urls_follow_embed_patterns() {
    let app = build_router(test_state());

    let (status, _, body) = send(&app, get("/api/player?type=movie&imdbId=tt0111161")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://playerflixapi.com/filme/tt0111161");

    let (_, _, body) = send(&app, get("/api/player?type=movie&tmdbId=238")).await;
    assert_eq!(body["url"], "https://playerflixapi.com/filme/tt0068646");

    let (_, _, body) = send(
        &app,
        get("/api/player?type=series&tmdbId=1399&season=1&episode=1&branded=true"),
    )
    .await;
    assert_eq!(
        body["url"],
        "https://playerflixapi.com/serie/1399/1/1#color:E50914&noLink"
    );

    let (status, _, body) = send(&app, get("/api/player?type=movie&tmdbId=777")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Conteúdo indisponível");

    let (status, _, _) = send(&app, get("/api/player?type=series&tmdbId=1399")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_pages_redirect_to_signin() {
    let app = build_router(test_state());

    let (status, headers, _) = send(&app, get("/my-list")).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "/auth/signin?callbackUrl=%2Fmy-list"
    );

    let (status, _, _) = send(&app, get("/auth/signin")).await;
    assert_eq!(status, StatusCode::OK);

    let token = signed_in(&app, "john@doe.com").await;
    let (status, _, _) = send(&app, get_with_token("/my-list", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, _) = send(&app, get_with_token("/auth/signin", &token)).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn signout_clears_cookie() {
    let app = build_router(test_state());
    let token = signed_in(&app, "john@doe.com").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signout")
        .header(header::COOKIE, format!("streamflix.session-token={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("streamflix.session-token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(test_state());
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[test]
fn content_type_parses_player_kinds() {
    assert_eq!("anime".parse::<ContentType>().unwrap(), ContentType::Anime);
}
