use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_PLAYER_BASE: &str = "https://playerflixapi.com";
pub const DEFAULT_SUPERFLIX_BASE: &str = "https://superflixapi.asia";
const DEV_SESSION_SECRET: &str = "fallback-secret-for-development-only";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub session_secret: String,
    pub session_max_age_days: i64,
    pub secure_cookies: bool,
    pub player_base_url: String,
    pub superflix_base_url: String,
    pub password_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_path: "streamflix.db".to_string(),
            tmdb_api_key: String::new(),
            tmdb_base_url: DEFAULT_TMDB_BASE.to_string(),
            tmdb_language: "pt-BR".to_string(),
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_max_age_days: 30,
            secure_cookies: false,
            player_base_url: DEFAULT_PLAYER_BASE.to_string(),
            superflix_base_url: DEFAULT_SUPERFLIX_BASE.to_string(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let tmdb_api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: TMDB_API_KEY"))?;

        let session_secret = match env::var("SESSION_SECRET").ok().filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("SESSION_SECRET is not set. Using fallback for development only.");
                defaults.session_secret.clone()
            }
        };

        let config = Self {
            bind_addr: parse_var("BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            tmdb_api_key,
            tmdb_base_url: trimmed_url("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            tmdb_language: env::var("TMDB_LANGUAGE").unwrap_or(defaults.tmdb_language),
            session_secret,
            session_max_age_days: positive_days(
                "SESSION_MAX_AGE_DAYS",
                parse_var("SESSION_MAX_AGE_DAYS")?.unwrap_or(defaults.session_max_age_days),
            )?,
            secure_cookies: parse_var("SECURE_COOKIES")?.unwrap_or(defaults.secure_cookies),
            player_base_url: trimmed_url("PLAYER_BASE_URL").unwrap_or(defaults.player_base_url),
            superflix_base_url: trimmed_url("SUPERFLIX_BASE_URL")
                .unwrap_or(defaults.superflix_base_url),
            password_cost: parse_var("PASSWORD_COST")?.unwrap_or(defaults.password_cost),
        };
        info!(
            "Configuration loaded (bind {}, database {})",
            config.bind_addr, config.database_path
        );
        Ok(config)
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        _ => Ok(None),
    }
}

fn positive_days(key: &str, days: i64) -> Result<i64> {
    if days <= 0 {
        anyhow::bail!("Invalid value for {}: '{}' (must be at least 1 day)", key, days);
    }
    Ok(days)
}

fn trimmed_url(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}
