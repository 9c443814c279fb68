use ebook_sync_media::{MediaUrlOrigin, TrackToggles};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    /// Build the URL origin for job media from the `[api]` and `[media]`
    /// sections.
    pub fn media_origin(&self) -> ebook_sync_media::Result<MediaUrlOrigin> {
        let token = self.api.token();
        match self.media.origin {
            OriginKind::Library => MediaUrlOrigin::library(&self.api.base_url, token),
            OriginKind::Storage => MediaUrlOrigin::storage(
                &self.api.base_url,
                token,
                self.media.storage_base_url.as_deref(),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the ebook-tools API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token appended to media URLs as `access_token`
    #[serde(default)]
    pub access_token: Option<String>,
}

impl ApiConfig {
    /// The access token, with blank values treated as absent.
    pub fn token(&self) -> Option<String> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
        }
    }
}

/// Where a job's media is served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// Permanent library (`/api/library/media/{job}/file/...`)
    Library,
    /// Job working storage (`/storage/jobs/{job}/...`)
    #[default]
    Storage,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub origin: OriginKind,

    /// Override for the storage base: a URL or an absolute directory
    #[serde(default)]
    pub storage_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_enabled")]
    pub original_enabled: bool,

    #[serde(default = "default_enabled")]
    pub translation_enabled: bool,
}

impl PlaybackConfig {
    pub fn toggles(&self) -> TrackToggles {
        TrackToggles::new(self.original_enabled, self.translation_enabled)
    }
}

fn default_enabled() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            original_enabled: true,
            translation_enabled: true,
        }
    }
}
