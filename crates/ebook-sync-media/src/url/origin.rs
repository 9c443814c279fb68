//! API shapes that media references are resolved against.

use std::path::Path;

use url::Url;

use super::join::{encode_path, is_dot_segment, join_encoded, join_path, safe_segments};
use crate::error::{Error, Result};

/// Which API shape applies to a job's media references.
///
/// Both variants carry the API base URL and an optional access token. The
/// storage variant also carries the resolver for job working storage.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaUrlOrigin {
    /// Job outputs moved into the permanent library
    /// (`/api/library/media/{job_id}/file/...`).
    Library {
        api_base: Url,
        access_token: Option<String>,
    },
    /// Job outputs still in working storage (`/storage/jobs/{job_id}/...` or
    /// a configured override base).
    Storage {
        api_base: Url,
        access_token: Option<String>,
        resolver: StorageResolver,
    },
}

impl MediaUrlOrigin {
    /// Build a library origin.
    pub fn library(api_base: &str, access_token: Option<String>) -> Result<Self> {
        Ok(Self::Library {
            api_base: parse_api_base(api_base)?,
            access_token: normalize_token(access_token),
        })
    }

    /// Build a storage origin, optionally with an override storage base (a URL
    /// or an absolute filesystem path).
    pub fn storage(
        api_base: &str,
        access_token: Option<String>,
        storage_base: Option<&str>,
    ) -> Result<Self> {
        let api_base = parse_api_base(api_base)?;
        let resolver = StorageResolver::new(&api_base, storage_base)?;
        Ok(Self::Storage {
            api_base,
            access_token: normalize_token(access_token),
            resolver,
        })
    }

    /// The API base URL.
    pub fn api_base(&self) -> &Url {
        match self {
            Self::Library { api_base, .. } | Self::Storage { api_base, .. } => api_base,
        }
    }

    /// The configured access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Library { access_token, .. } | Self::Storage { access_token, .. } => {
                access_token.as_deref()
            }
        }
    }

    /// Short name of the variant, for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Library { .. } => "library",
            Self::Storage { .. } => "storage",
        }
    }
}

/// Builds URLs into a job's working storage.
///
/// The base defaults to `{api_base}/storage/jobs/` and may be overridden with
/// another URL or with a local directory (served as a `file://` URL).
#[derive(Debug, Clone, PartialEq)]
pub struct StorageResolver {
    base: Url,
}

impl StorageResolver {
    /// Create a resolver, validating the override once up front.
    pub fn new(api_base: &Url, override_base: Option<&str>) -> Result<Self> {
        let override_base = override_base.map(str::trim).filter(|s| !s.is_empty());

        let base = match override_base {
            Some(raw) => parse_storage_base(raw)?,
            None => join_path(api_base, "storage/jobs").ok_or_else(|| {
                Error::invalid_base_url(api_base.as_str(), "cannot derive storage base")
            })?,
        };

        tracing::debug!(base = %base, "Storage resolver configured");
        Ok(Self { base })
    }

    /// The storage base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Whether the base points at the local filesystem.
    pub fn is_local(&self) -> bool {
        self.base.scheme() == "file"
    }

    /// Join job id and job-relative path onto the storage base.
    ///
    /// Stray slashes and `.` segments are dropped. An empty job id or path, a
    /// dot-segment job id, or any `..` in the path yields `None`.
    pub fn build(&self, job_id: &str, path: &str) -> Option<Url> {
        let job_id = job_id.trim().trim_matches('/');
        if job_id.is_empty() || is_dot_segment(job_id) {
            return None;
        }
        let path = path.replace('\\', "/");
        let segments = safe_segments(path.trim())?;
        if segments.is_empty() {
            return None;
        }

        let suffix = format!(
            "{}/{}",
            urlencoding::encode(job_id),
            encode_path(&segments.join("/"))
        );
        join_encoded(&self.base, &suffix)
    }
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::invalid_base_url(raw, e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(Error::invalid_base_url(raw, "URL cannot carry a path"));
    }
    Ok(url)
}

fn parse_storage_base(raw: &str) -> Result<Url> {
    let normalized = raw.replace('\\', "/");
    if let Some(url) = super::parse_absolute(&normalized) {
        if url.cannot_be_a_base() {
            return Err(Error::invalid_base_url(raw, "URL cannot carry a path"));
        }
        return Ok(url);
    }

    let path = Path::new(raw);
    if path.is_absolute() {
        return Url::from_directory_path(path)
            .map_err(|_| Error::invalid_base_url(raw, "not a usable directory path"));
    }

    Err(Error::invalid_base_url(
        raw,
        "expected an absolute URL or an absolute filesystem path",
    ))
}

fn normalize_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
