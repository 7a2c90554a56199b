use anyhow::Context;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use headers::authorization::Bearer;
use headers::{Authorization, HeaderMapExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::db::{self, users};
use crate::error::ApiError;
use crate::models::User;
use crate::session::SessionClaims;

pub const SESSION_COOKIE: &str = "streamflix.session-token";
pub const SIGNIN_PATH: &str = "/auth/signin";
const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

/// Authenticated caller, taken from a bearer token or the session cookie.
#[derive(Debug, Clone)]
pub struct Session(pub SessionClaims);

impl Session {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        match state.sessions.verify(&token) {
            Ok(claims) => Ok(Session(claims)),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                Err(ApiError::unauthorized())
            }
        }
    }
}

/// `Authorization: Bearer` wins over the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

fn valid_session(state: &AppState, headers: &HeaderMap) -> Option<SessionClaims> {
    session_token(headers).and_then(|t| state.sessions.verify(&t).ok())
}

/// Page guard: without a valid session the browser goes to the sign-in page,
/// carrying the original location as `callbackUrl`.
pub async fn require_page_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if valid_session(&state, request.headers()).is_some() {
        return next.run(request).await;
    }
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!("{}?callbackUrl={}", SIGNIN_PATH, urlencoding::encode(target));
    Redirect::temporary(&location).into_response()
}

/// Signed-in visitors skip the sign-in and sign-up pages.
pub async fn redirect_if_signed_in(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if valid_session(&state, request.headers()).is_some() {
        return Redirect::temporary("/").into_response();
    }
    next.run(request).await
}

pub async fn hash_password(password: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("bcrypt hash failed")
}

pub async fn verify_password(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        required(&req.first_name),
        required(&req.last_name),
        required(&req.email),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Por favor, preencha todos os campos".into(),
        ));
    };
    if !email.contains('@') {
        return Err(ApiError::Validation("E-mail inválido".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "A senha deve ter pelo menos 6 caracteres".into(),
        ));
    }

    let password_hash = hash_password(password.to_string(), state.config.password_cost).await?;

    let conn = db::get_conn(&state.db)?;
    let user = users::create_user(
        &conn,
        users::NewUser {
            email,
            password_hash: &password_hash,
            first_name: Some(first_name),
            last_name: Some(last_name),
        },
    )
    .map_err(|e| match e {
        db::StoreError::Duplicate(_) => {
            ApiError::Conflict("Já existe uma conta com este e-mail".into())
        }
        other => other.into(),
    })?;
    drop(conn);

    info!("Created account for {}", user.email);
    Ok(Json(json!({ "user": user })))
}

/// POST /api/auth/signin
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let (Some(email), Some(password)) = (required(&req.email), req.password.clone()) else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    let user: Option<User> = {
        let conn = db::get_conn(&state.db)?;
        users::get_user_by_email(&conn, email)?
    };
    let Some(user) = user else {
        warn!("Sign-in for unknown account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };
    if !verify_password(password, user.password_hash.clone()).await {
        warn!("Sign-in with wrong password for {}", user.email);
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let (token, claims) = state
        .sessions
        .issue(&user)
        .context("failed to sign session token")?;
    let cookie = session_cookie(
        token.clone(),
        claims.exp,
        state.sessions.max_age_secs(),
        state.config.secure_cookies,
    );
    info!("User {} signed in", user.email);

    let body = json!({
        "user": user,
        "token": token,
        "expires": claims.expires_at(),
    });
    Ok((jar.add(cookie), Json(body)))
}

/// POST /api/auth/signout
pub async fn signout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(json!({ "success": true })))
}

/// GET /api/auth/session
pub async fn current_session(session: Option<Session>) -> Json<serde_json::Value> {
    match session {
        Some(Session(claims)) => Json(json!({
            "user": {
                "id": claims.sub,
                "email": claims.email,
                "name": claims.name,
                "firstName": claims.first_name,
                "lastName": claims.last_name,
            },
            "expires": claims.expires_at(),
        })),
        None => Json(json!({})),
    }
}

fn session_cookie(token: String, expires_at: i64, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs));
    if let Ok(expires) = time::OffsetDateTime::from_unix_timestamp(expires_at) {
        cookie = cookie.expires(expires);
    }
    cookie.build()
}
