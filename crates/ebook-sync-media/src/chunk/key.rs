//! Chunk identity keys and metadata locations.

use ebook_sync_common::JobId;

use super::Chunk;
use crate::url::{resolve_media_url, MediaUrlOrigin};

/// Stable identity key for caching and de-duplicating chunk fetches.
///
/// Priority: `chunk_id`, `range_fragment`, `metadata_path`, `metadata_url`,
/// then a synthetic `"{start|na}-{end|na}"` when either bound is known.
/// `None` means the chunk cannot be identified and must not be cached.
pub fn resolve_chunk_key(chunk: &Chunk) -> Option<String> {
    let named = [
        &chunk.chunk_id,
        &chunk.range_fragment,
        &chunk.metadata_path,
        &chunk.metadata_url,
    ]
    .into_iter()
    .flatten()
    .map(|s| s.trim())
    .find(|s| !s.is_empty());

    if let Some(key) = named {
        return Some(key.to_string());
    }

    if chunk.start_sentence.is_none() && chunk.end_sentence.is_none() {
        return None;
    }
    let bound = |value: Option<i64>| value.map_or_else(|| "na".to_string(), |v| v.to_string());
    Some(format!(
        "{}-{}",
        bound(chunk.start_sentence),
        bound(chunk.end_sentence)
    ))
}

/// Fetch URL for a chunk's metadata document.
///
/// The first non-blank of `metadata_url` and `metadata_path` is resolved with
/// [`resolve_media_url`]. If that reference does not resolve the result is
/// `None`; the other field is not consulted.
pub fn resolve_chunk_metadata_url(
    chunk: &Chunk,
    job_id: &JobId,
    origin: &MediaUrlOrigin,
) -> Option<String> {
    let reference = [&chunk.metadata_url, &chunk.metadata_path]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.trim().is_empty());
    resolve_media_url(reference, job_id, origin)
}
