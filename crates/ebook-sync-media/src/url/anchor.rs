//! Locating the job-relative part of a backend path.
//!
//! Older backend versions returned filesystem-ish paths such as
//! `/var/lib/ebook-tools/storage/jobs/42/media/ch1.mp3`. The part that matters
//! starts at the first `media/` or `metadata/` directory.

const ANCHORS: [&str; 2] = ["/media/", "/metadata/"];

/// Prefix the API uses for library-hosted files.
pub const LIBRARY_API_PREFIX: &str = "/api/library/";

/// Path of a file relative to the job root, starting at the first anchor
/// directory (`media/...` or `metadata/...`).
///
/// A path that begins with the anchor directory itself (`media/ch1.mp3`) is
/// matched as well. Returns `None` if no anchor is present or nothing follows it.
pub fn relative_anchor(path: &str) -> Option<&str> {
    let start = ANCHORS
        .iter()
        .filter_map(|anchor| {
            if path.starts_with(&anchor[1..]) {
                Some(0)
            } else {
                path.find(anchor).map(|pos| pos + 1)
            }
        })
        .min()?;

    let relative = &path[start..];
    let after_dir = relative.find('/').map(|pos| &relative[pos + 1..])?;
    if after_dir.trim_matches('/').is_empty() {
        return None;
    }
    Some(relative.trim_end_matches('/'))
}

/// The `api/library/...` part of a path, with or without a leading slash and
/// behind any prefix the API base adds (`/ebook/api/library/...`).
pub fn library_api_path(path: &str) -> Option<&str> {
    let bare = &LIBRARY_API_PREFIX[1..];
    let trimmed = path.trim_start_matches('/');
    if trimmed.starts_with(bare) {
        return Some(trimmed);
    }
    path.find(LIBRARY_API_PREFIX).map(|pos| &path[pos + 1..])
}

/// Path below `/storage/jobs/{job_id}/`, matching the job id either literally
/// or percent-encoded.
pub fn storage_relative_path<'a>(path: &'a str, job_id: &str) -> Option<&'a str> {
    let literal = format!("/storage/jobs/{job_id}/");
    let encoded = format!("/storage/jobs/{}/", urlencoding::encode(job_id));

    [literal, encoded].iter().find_map(|prefix| {
        let pos = path.find(prefix.as_str())?;
        let rest = path[pos + prefix.len()..].trim_matches('/');
        (!rest.is_empty()).then_some(rest)
    })
}

/// Map a job-relative path onto the library file endpoint.
///
/// The library serves the contents of a job's `media/` directory at the root
/// of `/file/`, while other directories keep their name.
pub fn library_file_path(relative: &str) -> &str {
    let relative = relative.trim_matches('/');
    relative.strip_prefix("media/").unwrap_or(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_anchor_media() {
        assert_eq!(relative_anchor("/storage/jobs/42/media/ch1.mp3"), Some("media/ch1.mp3"));
        assert_eq!(relative_anchor("media/ch1.mp3"), Some("media/ch1.mp3"));
        assert_eq!(relative_anchor("/x/y/media/sub/ch1.mp3/"), Some("media/sub/ch1.mp3"));
    }

    #[test]
    fn test_relative_anchor_metadata() {
        assert_eq!(
            relative_anchor("/storage/jobs/42/metadata/chunk_0001.json"),
            Some("metadata/chunk_0001.json")
        );
        assert_eq!(relative_anchor("metadata/chunk.json"), Some("metadata/chunk.json"));
    }

    #[test]
    fn test_relative_anchor_earliest_wins() {
        assert_eq!(
            relative_anchor("/jobs/1/metadata/media/x.json"),
            Some("metadata/media/x.json")
        );
    }

    #[test]
    fn test_relative_anchor_none() {
        assert_eq!(relative_anchor("/storage/jobs/42/ch1.mp3"), None);
        assert_eq!(relative_anchor("/storage/jobs/42/media/"), None);
        assert_eq!(relative_anchor("multimedia/ch1.mp3"), None);
        assert_eq!(relative_anchor(""), None);
    }

    #[test]
    fn test_library_api_path() {
        let canonical = "api/library/media/42/file/ch1.mp3";
        assert_eq!(library_api_path("/api/library/media/42/file/ch1.mp3"), Some(canonical));
        assert_eq!(library_api_path(canonical), Some(canonical));
        assert_eq!(
            library_api_path("/ebook/api/library/media/42/file/ch1.mp3"),
            Some(canonical)
        );
        assert_eq!(library_api_path("/storage/jobs/42/media/ch1.mp3"), None);
        assert_eq!(library_api_path("media/api/libraryx/a.mp3"), None);
    }

    #[test]
    fn test_storage_relative_path() {
        assert_eq!(
            storage_relative_path("/storage/jobs/42/media/ch1.mp3", "42"),
            Some("media/ch1.mp3")
        );
        assert_eq!(
            storage_relative_path("/storage/jobs/book%201/media/ch1.mp3", "book 1"),
            Some("media/ch1.mp3")
        );
        assert_eq!(storage_relative_path("/storage/jobs/43/media/ch1.mp3", "42"), None);
        assert_eq!(storage_relative_path("/storage/jobs/42/", "42"), None);
    }

    #[test]
    fn test_library_file_path() {
        assert_eq!(library_file_path("media/ch1.mp3"), "ch1.mp3");
        assert_eq!(library_file_path("/metadata/chunk.json"), "metadata/chunk.json");
        assert_eq!(library_file_path("ch1.mp3"), "ch1.mp3");
    }
}
