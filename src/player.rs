//! Embed player URLs. Movies are addressed by IMDb id, series by TMDb id
//! plus season and episode.

use thiserror::Error;

use crate::models::ContentType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("missing content identifier")]
    MissingId,
    #[error("season and episode are required for series")]
    MissingEpisode,
}

/// Player customization flags, rendered as the URL fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerOptions {
    pub no_ep_list: bool,
    pub color: Option<String>,
    pub no_link: bool,
    pub transparent: bool,
    pub no_background: bool,
}

impl PlayerOptions {
    /// Red accent, no outbound link.
    pub fn branded() -> Self {
        Self {
            no_link: true,
            color: Some("E50914".to_string()),
            ..Self::default()
        }
    }

    pub fn fragment(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if self.no_ep_list {
            params.push("noEpList".to_string());
        }
        if let Some(color) = self.color.as_deref().filter(|c| !c.is_empty()) {
            params.push(format!("color:{}", color.trim_start_matches('#')));
        }
        if self.no_link {
            params.push("noLink".to_string());
        }
        if self.transparent {
            params.push("transparent".to_string());
        }
        if self.no_background {
            params.push("noBackground".to_string());
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("#{}", params.join("&"))
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerUrlBuilder {
    base_url: String,
}

impl PlayerUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn movie_url(&self, imdb_id: &str) -> String {
        format!("{}/filme/{}", self.base_url, imdb_id)
    }

    pub fn series_url(&self, tmdb_id: &str, season: u32, episode: u32) -> String {
        format!("{}/serie/{}/{}/{}", self.base_url, tmdb_id, season, episode)
    }

    /// Movies ignore `season`/`episode`; series and anime need both.
    pub fn player_url(
        &self,
        id: &str,
        content_type: ContentType,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<String, PlayerError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PlayerError::MissingId);
        }
        match content_type {
            ContentType::Movie => Ok(self.movie_url(id)),
            ContentType::Series | ContentType::Anime => match (season, episode) {
                (Some(s), Some(e)) if s > 0 && e > 0 => Ok(self.series_url(id, s, e)),
                _ => Err(PlayerError::MissingEpisode),
            },
        }
    }

    pub fn with_options(url: String, options: &PlayerOptions) -> String {
        url + &options.fragment()
    }
}
