use crate::auth;
use crate::config::Config;
use crate::content::{self, Catalog};
use crate::db::{self, DbPool};
use crate::favorites;
use crate::pages;
use crate::player::PlayerUrlBuilder;
use crate::session::SessionSigner;
use crate::superflix::{SuperflixApi, SuperflixClient};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

const MAX_BODY_BYTES: usize = 1024 * 1024; // 1MB safety cap
const UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DbPool,
    pub catalog: Catalog,
    pub superflix: Arc<dyn SuperflixApi>,
    pub player: PlayerUrlBuilder,
    pub sessions: SessionSigner,
}

impl AppState {
    pub fn new(
        config: Config,
        db: DbPool,
        tmdb: Arc<dyn TmdbApi>,
        superflix: Arc<dyn SuperflixApi>,
    ) -> Self {
        let player = PlayerUrlBuilder::new(config.player_base_url.clone());
        let sessions = SessionSigner::new(&config.session_secret, config.session_max_age_days);
        Self {
            config: Arc::new(config),
            db,
            catalog: Catalog::new(tmdb),
            superflix,
            player,
            sessions,
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let db = db::init_pool(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;

    let http = Client::builder()
        .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(http.clone(), &config));
    let superflix: Arc<dyn SuperflixApi> = Arc::new(SuperflixClient::new(http, &config));
    info!(
        "Upstreams: tmdb {}, superflix {}, player {}",
        config.tmdb_base_url, config.superflix_base_url, config.player_base_url
    );

    let addr = config.bind_addr;
    let state = AppState::new(config, db, tmdb, superflix);
    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let protected_pages = Router::new()
        .route("/", get(pages::shell))
        .route("/movies", get(pages::shell))
        .route("/series", get(pages::shell))
        .route("/my-list", get(pages::shell))
        .route("/search", get(pages::shell))
        .route("/lancamentos", get(pages::shell))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_page_session,
        ));

    let auth_pages = Router::new()
        .route("/auth/signin", get(pages::shell))
        .route("/auth/signup", get(pages::shell))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::redirect_if_signed_in,
        ));

    let api = Router::new()
        .route("/api/content/popular", get(content::popular))
        .route("/api/content/trending", get(content::trending))
        .route("/api/content/discover", get(content::discover))
        .route("/api/content/search", get(content::search))
        .route("/api/content/imdb", get(content::imdb))
        .route("/api/content/details", get(content::details))
        .route("/api/content/seasons", get(content::seasons))
        .route("/api/content/episodes", get(content::episodes))
        .route("/api/content/list", get(content::provider_list))
        .route("/api/calendar", get(content::calendar))
        .route("/api/player", get(content::player))
        .route("/api/favorites", get(favorites::list).post(favorites::add))
        .route("/api/favorites/:id", delete(favorites::remove))
        .route("/api/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/signout", post(auth::signout))
        .route("/api/auth/session", get(auth::current_session));

    Router::new()
        .merge(protected_pages)
        .merge(auth_pages)
        .merge(api)
        .route("/auth/error", get(pages::shell))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
