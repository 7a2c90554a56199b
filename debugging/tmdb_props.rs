//! Fetch a movie or TV show from TMDB and print the mapped catalog record.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- tv <tmdb_id> [season_number]
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reqwest::Client;
use serde_json::json;
use std::env;
use streamflix::config::Config;
use streamflix::models::MediaKind;
use streamflix::tmdb::{TmdbApi, TmdbClient};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let kind: MediaKind = args
        .next()
        .context("usage: tmdb_props <movie|tv> <tmdb_id> [season]")?
        .parse()?;
    let id = args.next().context("missing tmdb id")?;
    let season: Option<u32> = args
        .next()
        .map(|s| s.parse().context("season must be a number"))
        .transpose()?;

    let config = Config::from_env()?;
    let tmdb = TmdbClient::new(Client::new(), &config);

    let content = tmdb.details(&id, kind).await?;
    let mut output = json!({ "content": content });
    if kind == MediaKind::Tv {
        output["seasons"] = serde_json::to_value(tmdb.seasons(&id).await?)?;
        if let Some(season) = season {
            output["episodes"] = serde_json::to_value(tmdb.episodes(&id, season).await?)?;
        }
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
