use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::Config;
use crate::models::{ContentItem, ContentPage, EpisodeSummary, MediaKind, SeasonSummary};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const CAST_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "day" => Some(TimeWindow::Day),
            "week" => Some(TimeWindow::Week),
            _ => None,
        }
    }

    fn as_path(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Raw TMDb calls, already mapped to catalog records. Every method is one
/// upstream request and propagates failures; degrading to empty results is
/// the caller's decision.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending(&self, kind: MediaKind, window: TimeWindow) -> Result<Vec<ContentItem>>;
    async fn popular(&self, kind: MediaKind) -> Result<Vec<ContentItem>>;
    async fn discover(&self, kind: MediaKind, page: u32, genre: Option<u32>)
        -> Result<ContentPage>;
    async fn search(&self, query: &str, kind: Option<MediaKind>) -> Result<Vec<ContentItem>>;
    async fn details(&self, id: &str, kind: MediaKind) -> Result<ContentItem>;
    async fn imdb_id(&self, id: &str, kind: MediaKind) -> Result<Option<String>>;
    async fn seasons(&self, tv_id: &str) -> Result<Vec<SeasonSummary>>;
    async fn episodes(&self, tv_id: &str, season: u32) -> Result<Vec<EpisodeSummary>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.tmdb_api_key.clone(),
            base_url: config.tmdb_base_url.clone(),
            language: config.tmdb_language.clone(),
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
            // The key travels in the query string; keep it out of errors.
            let path = url.split('?').next().unwrap_or(url);
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }

    async fn list(&self, url: &str, kind: MediaKind) -> Result<Vec<ContentItem>> {
        let data: ListResponse = self.get_json(url).await?;
        Ok(data
            .results
            .iter()
            .map(|item| convert_to_content_item(item, kind))
            .collect())
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trending(&self, kind: MediaKind, window: TimeWindow) -> Result<Vec<ContentItem>> {
        let url = format!(
            "{}/trending/{}/{}?api_key={}",
            self.base_url,
            kind.as_path(),
            window.as_path(),
            self.api_key
        );
        self.list(&url, kind).await
    }

    async fn popular(&self, kind: MediaKind) -> Result<Vec<ContentItem>> {
        let url = format!(
            "{}/{}/popular?api_key={}",
            self.base_url,
            kind.as_path(),
            self.api_key
        );
        self.list(&url, kind).await
    }

    async fn discover(
        &self,
        kind: MediaKind,
        page: u32,
        genre: Option<u32>,
    ) -> Result<ContentPage> {
        let mut url = format!(
            "{}/discover/{}?api_key={}&language={}&sort_by=popularity.desc&page={}&include_adult=false",
            self.base_url,
            kind.as_path(),
            self.api_key,
            urlencoding::encode(&self.language),
            page.max(1)
        );
        if kind == MediaKind::Movie {
            url.push_str("&include_video=false");
        }
        if let Some(genre) = genre {
            url.push_str(&format!("&with_genres={genre}"));
        }
        let data: ListResponse = self.get_json(&url).await?;
        Ok(ContentPage {
            results: data
                .results
                .iter()
                .map(|item| convert_to_content_item(item, kind))
                .collect(),
            page: data.page.unwrap_or(1),
            total_pages: data.total_pages.unwrap_or(1),
            total_results: data.total_results.unwrap_or(0),
        })
    }

    async fn search(&self, query: &str, kind: Option<MediaKind>) -> Result<Vec<ContentItem>> {
        let endpoint = match kind {
            Some(k) => format!("search/{}", k.as_path()),
            None => "search/multi".to_string(),
        };
        let url = format!(
            "{}/{}?api_key={}&query={}",
            self.base_url,
            endpoint,
            self.api_key,
            urlencoding::encode(query)
        );
        let data: ListResponse = self.get_json(&url).await?;
        Ok(data
            .results
            .iter()
            .filter_map(|item| search_item_kind(item, kind).map(|k| convert_to_content_item(item, k)))
            .collect())
    }

    async fn details(&self, id: &str, kind: MediaKind) -> Result<ContentItem> {
        let url = format!(
            "{}/{}/{}?api_key={}&language={}&append_to_response=credits,videos,external_ids",
            self.base_url,
            kind.as_path(),
            urlencoding::encode(id),
            self.api_key,
            urlencoding::encode(&self.language)
        );
        let data: DetailResponse = self.get_json(&url).await?;
        Ok(convert_details(&data, kind))
    }

    async fn imdb_id(&self, id: &str, kind: MediaKind) -> Result<Option<String>> {
        let url = format!(
            "{}/{}/{}/external_ids?api_key={}",
            self.base_url,
            kind.as_path(),
            urlencoding::encode(id),
            self.api_key
        );
        let data: ExternalIds = self.get_json(&url).await?;
        Ok(data.imdb_id.filter(|s| !s.is_empty()))
    }

    async fn seasons(&self, tv_id: &str) -> Result<Vec<SeasonSummary>> {
        let url = format!(
            "{}/tv/{}?api_key={}&language={}",
            self.base_url,
            urlencoding::encode(tv_id),
            self.api_key,
            urlencoding::encode(&self.language)
        );
        let data: ShowSeasons = self.get_json(&url).await?;
        Ok(convert_seasons(data.seasons))
    }

    async fn episodes(&self, tv_id: &str, season: u32) -> Result<Vec<EpisodeSummary>> {
        let url = format!(
            "{}/tv/{}/season/{}?api_key={}&language={}",
            self.base_url,
            urlencoding::encode(tv_id),
            season,
            self.api_key,
            urlencoding::encode(&self.language)
        );
        let data: SeasonDetail = self.get_json(&url).await?;
        Ok(data
            .episodes
            .into_iter()
            .map(|e| EpisodeSummary {
                episode_number: e.episode_number,
                season_number: e.season_number.unwrap_or(season),
                name: e.name.unwrap_or_default(),
                overview: e.overview.filter(|s| !s.is_empty()),
                still: e.still_path.as_deref().map(|p| image_url(p, "w300")),
                runtime: e.runtime,
                air_date: e.air_date.filter(|s| !s.is_empty()),
            })
            .collect())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TmdbItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Vec<u32>,
    pub genres: Option<Vec<Genre>>,
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListResponse {
    results: Vec<TmdbItem>,
    page: Option<u32>,
    total_pages: Option<u32>,
    total_results: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Credits {
    cast: Vec<CastMember>,
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    job: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Creator {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(flatten)]
    item: TmdbItem,
    #[serde(default)]
    credits: Credits,
    #[serde(default)]
    external_ids: ExternalIds,
    #[serde(default)]
    created_by: Vec<Creator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShowSeasons {
    seasons: Vec<SeasonEntry>,
}

#[derive(Debug, Deserialize)]
struct SeasonEntry {
    season_number: u32,
    name: Option<String>,
    #[serde(default)]
    episode_count: u32,
    air_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeasonDetail {
    episodes: Vec<EpisodeEntry>,
}

#[derive(Debug, Deserialize)]
struct EpisodeEntry {
    episode_number: u32,
    season_number: Option<u32>,
    name: Option<String>,
    overview: Option<String>,
    still_path: Option<String>,
    runtime: Option<u32>,
    air_date: Option<String>,
}

pub fn image_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE}/{size}{path}")
}

/// Map a TMDb list or detail record onto the catalog shape.
pub fn convert_to_content_item(item: &TmdbItem, kind: MediaKind) -> ContentItem {
    let is_movie = kind == MediaKind::Movie || item.title.is_some();
    let (title, release_date) = if is_movie {
        (item.title.as_deref(), item.release_date.as_deref())
    } else {
        (item.name.as_deref(), item.first_air_date.as_deref())
    };
    let genres = match &item.genres {
        Some(list) if !list.is_empty() => list.iter().map(|g| g.name.clone()).collect(),
        _ => genre_names(&item.genre_ids),
    };

    ContentItem {
        id: item.id.to_string(),
        title: title.or(item.name.as_deref()).unwrap_or_default().to_string(),
        content_type: kind.content_type(),
        poster: item.poster_path.as_deref().map(|p| image_url(p, "w500")),
        backdrop: item.backdrop_path.as_deref().map(|p| image_url(p, "original")),
        year: release_date.and_then(extract_year),
        rating: format_rating(item.vote_average),
        overview: item.overview.clone().filter(|s| !s.is_empty()),
        genres,
        runtime: if is_movie { item.runtime } else { None },
        seasons: if is_movie { None } else { item.number_of_seasons },
        episodes: if is_movie { None } else { item.number_of_episodes },
        cast: Vec::new(),
        director: None,
        imdb_id: None,
        tmdb_id: Some(item.id.to_string()),
    }
}

fn convert_details(data: &DetailResponse, kind: MediaKind) -> ContentItem {
    let mut content = convert_to_content_item(&data.item, kind);
    content.cast = top_names(&data.credits.cast, CAST_LIMIT);
    content.director = match kind {
        MediaKind::Movie => data
            .credits
            .crew
            .iter()
            .find(|c| matches!(c.job.as_deref(), Some("Director")))
            .map(|c| c.name.clone()),
        MediaKind::Tv => {
            let creators: Vec<&str> = data.created_by.iter().map(|c| c.name.as_str()).collect();
            (!creators.is_empty()).then(|| creators.join(", "))
        }
    };
    content.imdb_id = data.external_ids.imdb_id.clone().filter(|s| !s.is_empty());
    content
}

fn convert_seasons(seasons: Vec<SeasonEntry>) -> Vec<SeasonSummary> {
    seasons
        .into_iter()
        .filter(|s| s.season_number > 0)
        .map(|s| SeasonSummary {
            season_number: s.season_number,
            name: s
                .name
                .unwrap_or_else(|| format!("Temporada {}", s.season_number)),
            episode_count: s.episode_count,
            air_date: s.air_date.filter(|d| !d.is_empty()),
            poster: s.poster_path.as_deref().map(|p| image_url(p, "w300")),
            overview: s.overview.filter(|o| !o.is_empty()),
        })
        .collect()
}

/// Kind of a search hit. Multi search tags records with `media_type`;
/// people are not content and are dropped.
fn search_item_kind(item: &TmdbItem, requested: Option<MediaKind>) -> Option<MediaKind> {
    match item.media_type.as_deref() {
        Some("movie") => Some(MediaKind::Movie),
        Some("tv") => Some(MediaKind::Tv),
        Some(_) => None,
        None => Some(requested.unwrap_or(if item.title.is_some() {
            MediaKind::Movie
        } else {
            MediaKind::Tv
        })),
    }
}

fn top_names(list: &[CastMember], max: usize) -> Vec<String> {
    list.iter().take(max).map(|c| c.name.clone()).collect()
}

fn extract_year(date: &str) -> Option<String> {
    let year = date.split('-').next()?.trim();
    (year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())).then(|| year.to_string())
}

fn format_rating(vote_average: Option<f64>) -> Option<String> {
    vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("{:.1}", v))
}

static GENRES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (99, "Documentary"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
        (10402, "Music"),
        (9648, "Mystery"),
        (10749, "Romance"),
        (878, "Science Fiction"),
        (10770, "TV Movie"),
        (53, "Thriller"),
        (10752, "War"),
        (37, "Western"),
        (10759, "Action & Adventure"),
        (10762, "Kids"),
        (10763, "News"),
        (10764, "Reality"),
        (10765, "Sci-Fi & Fantasy"),
        (10766, "Soap"),
        (10767, "Talk"),
        (10768, "War & Politics"),
    ])
});

fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| GENRES.get(id))
        .map(|name| name.to_string())
        .collect()
}
