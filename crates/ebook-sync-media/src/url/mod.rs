//! Media URL resolution.
//!
//! Turns whatever reference the backend handed out (absolute URL, `/api/...`
//! path, `/storage/...` path, bare relative path, or a legacy path containing
//! `/media/` or `/metadata/`) into one fetch-ready URL for a job.
//!
//! Resolution is pure string work: nothing here checks that the target exists.

mod anchor;
mod join;
mod origin;

pub use anchor::{library_api_path, library_file_path, relative_anchor, storage_relative_path};
pub use join::{
    encode_path, encode_segment, is_dot_segment, is_percent_encoded, join_encoded, join_path,
    safe_segments,
};
pub use origin::{MediaUrlOrigin, StorageResolver};

use ebook_sync_common::paths::{normalize_separators, split_query};
use ebook_sync_common::JobId;
use url::Url;

use anchor::LIBRARY_API_PREFIX;
use join::apply_tail;

/// Query parameter carrying the access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Resolve a raw media reference for `job_id` against `origin`.
///
/// Returns `None` for blank input or when no URL can be built.
pub fn resolve_media_url(raw: Option<&str>, job_id: &JobId, origin: &MediaUrlOrigin) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = normalize_separators(trimmed);

    let resolved = match parse_absolute(&normalized) {
        Some(url) => resolve_absolute(url, job_id, origin),
        None => resolve_relative(&normalized, job_id, origin),
    };

    match &resolved {
        Some(url) => tracing::trace!(raw = trimmed, %url, origin = origin.kind(), "Resolved media reference"),
        None => tracing::trace!(raw = trimmed, origin = origin.kind(), "Media reference unresolvable"),
    }
    resolved.map(String::from)
}

/// Canonical library URL for a job-relative file path:
/// `{api_base}/api/library/media/{job_id}/file/{path}`, each segment encoded.
///
/// Returns `None` for an empty path or one that climbs out with `..`.
pub fn library_media_url(api_base: &Url, job_id: &JobId, relative: &str) -> Option<Url> {
    if is_dot_segment(job_id.as_str()) {
        return None;
    }
    let segments: Vec<String> = safe_segments(library_file_path(relative))?
        .into_iter()
        .map(encode_segment)
        .collect();
    if segments.is_empty() {
        return None;
    }

    let suffix = format!(
        "api/library/media/{}/file/{}",
        urlencoding::encode(job_id.as_str()),
        segments.join("/")
    );
    join_encoded(api_base, &suffix)
}

/// Append the access token as a query parameter.
///
/// Only `http`/`https` URLs get a token, only when one is configured, and only
/// if the URL does not already carry `access_token`, so repeated calls leave
/// the URL unchanged.
pub fn append_access_token(mut url: Url, token: Option<&str>) -> Url {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return url;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return url;
    }
    if url.query_pairs().any(|(key, _)| key == ACCESS_TOKEN_PARAM) {
        return url;
    }
    url.query_pairs_mut().append_pair(ACCESS_TOKEN_PARAM, token);
    url
}

/// Parse `raw` as an absolute URL with a real scheme.
///
/// Single-letter schemes (Windows drive letters) and `host:port/path` style
/// strings are not treated as absolute.
pub(crate) fn parse_absolute(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    let scheme_len = url.scheme().len();
    if scheme_len < 2 {
        return None;
    }
    let hierarchical = raw.get(scheme_len..).is_some_and(|rest| rest.starts_with("://"));
    if hierarchical || matches!(url.scheme(), "data" | "blob") {
        Some(url)
    } else {
        None
    }
}

fn resolve_absolute(url: Url, job_id: &JobId, origin: &MediaUrlOrigin) -> Option<Url> {
    match origin {
        MediaUrlOrigin::Library {
            api_base,
            access_token,
        } => {
            if url.cannot_be_a_base() || url.path().contains(LIBRARY_API_PREFIX) {
                return Some(append_access_token(url, access_token.as_deref()));
            }
            if let Some(relative) = relative_anchor(url.path()) {
                if let Some(rebuilt) = library_media_url(api_base, job_id, relative) {
                    return Some(append_access_token(rebuilt, access_token.as_deref()));
                }
            }
            Some(append_access_token(url, access_token.as_deref()))
        }
        MediaUrlOrigin::Storage {
            access_token,
            resolver,
            ..
        } => {
            if resolver.is_local() {
                if let Some(local) = storage_relative_path(url.path(), job_id.as_str())
                    .and_then(|relative| resolver.build(job_id.as_str(), relative))
                {
                    return Some(local);
                }
            }
            Some(append_access_token(url, access_token.as_deref()))
        }
    }
}

fn resolve_relative(raw: &str, job_id: &JobId, origin: &MediaUrlOrigin) -> Option<Url> {
    let (path, tail) = split_query(raw);
    if path.trim_matches('/').is_empty() {
        return None;
    }

    match origin {
        MediaUrlOrigin::Library {
            api_base,
            access_token,
        } => {
            let token = access_token.as_deref();
            if let Some(api_path) = library_api_path(path) {
                let url = join_path(api_base, api_path)?;
                return Some(append_access_token(apply_tail(url, tail), token));
            }
            if path.contains("/storage/") || path.contains("/api/") {
                let relative = relative_anchor(path)
                    .or_else(|| storage_relative_path(path, job_id.as_str()));
                let url = match relative {
                    Some(relative) => library_media_url(api_base, job_id, relative)?,
                    None => join_path(api_base, path)?,
                };
                return Some(append_access_token(apply_tail(url, tail), token));
            }
            let relative = relative_anchor(path).unwrap_or(path);
            let url = library_media_url(api_base, job_id, relative)?;
            Some(append_access_token(apply_tail(url, tail), token))
        }
        MediaUrlOrigin::Storage {
            api_base,
            access_token,
            resolver,
        } => {
            let token = access_token.as_deref();
            if path.starts_with("/api/") || path.starts_with("/storage/") {
                let url = match storage_relative_path(path, job_id.as_str()) {
                    Some(relative) => resolver.build(job_id.as_str(), relative)?,
                    None => join_path(api_base, path)?,
                };
                return Some(append_access_token(apply_tail(url, tail), token));
            }
            let relative = relative_anchor(path).unwrap_or(path);
            let url = resolver.build(job_id.as_str(), relative)?;
            Some(append_access_token(apply_tail(url, tail), token))
        }
    }
}
