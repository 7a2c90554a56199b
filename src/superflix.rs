//! Superflix catalog endpoints: the release calendar and the list of ids the
//! embed provider can play.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListCategory {
    Movie,
    Serie,
    Anime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    #[default]
    Tmdb,
    Imdb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub category: ListCategory,
    pub id_type: IdType,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseStatus {
    Atualizado,
    Hoje,
    Futuro,
    Atrasado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub title: String,
    #[serde(default)]
    pub episode_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub episode_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tmdb_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<ReleaseStatus>,
}

#[async_trait]
pub trait SuperflixApi: Send + Sync {
    async fn content_list(&self, params: ListParams) -> Result<Vec<String>>;
    async fn calendar(&self) -> Result<Vec<CalendarItem>>;
}

#[derive(Debug, Clone)]
pub struct SuperflixClient {
    client: Client,
    base_url: String,
}

impl SuperflixClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.superflix_base_url.clone(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("request failed")?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", url, status, text));
        }
        serde_json::from_str(&text).context("JSON parse failed")
    }
}

#[async_trait]
impl SuperflixApi for SuperflixClient {
    async fn content_list(&self, params: ListParams) -> Result<Vec<String>> {
        let url = format!(
            "{}/lista?category={}&type={}&format=json&order={}",
            self.base_url,
            enum_value(&params.category),
            enum_value(&params.id_type),
            enum_value(&params.order)
        );
        let ids: Vec<serde_json::Value> = self.get_json(&url).await?;
        Ok(ids.into_iter().filter_map(value_to_string).collect())
    }

    async fn calendar(&self) -> Result<Vec<CalendarItem>> {
        let url = format!("{}/calendario.php", self.base_url);
        self.get_json(&url).await
    }
}

fn enum_value<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The calendar feed mixes numbers and strings for ids.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.and_then(value_to_string))
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ReleaseStatus>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
