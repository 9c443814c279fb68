//! Path utilities for raw URL/path strings returned by the backend.
//!
//! The backend hands out absolute URLs, API paths, storage paths and bare
//! relative paths, sometimes with Windows separators or a query string. These
//! helpers work on the string form so they apply to all of them alike.

use crate::types::SubtitleFormat;

/// Replace Windows path separators with forward slashes.
///
/// # Examples
///
/// ```
/// use ebook_sync_common::paths::normalize_separators;
///
/// assert_eq!(normalize_separators(r"media\ch1.mp3"), "media/ch1.mp3");
/// ```
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Split a raw reference into its path part and its `?query#fragment` tail.
///
/// # Examples
///
/// ```
/// use ebook_sync_common::paths::split_query;
///
/// assert_eq!(split_query("a/b.mp3?v=2#t=3"), ("a/b.mp3", "?v=2#t=3"));
/// assert_eq!(split_query("a/b.mp3"), ("a/b.mp3", ""));
/// ```
pub fn split_query(raw: &str) -> (&str, &str) {
    match raw.find(|c| c == '?' || c == '#') {
        Some(pos) => raw.split_at(pos),
        None => (raw, ""),
    }
}

/// Last path segment of a raw reference, ignoring any query string.
pub fn file_name(raw: &str) -> Option<&str> {
    let (path, _) = split_query(raw);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Extension of the last path segment, without the dot.
///
/// Hidden-file style names (`.ass`) have no extension.
///
/// # Examples
///
/// ```
/// use ebook_sync_common::paths::file_extension;
///
/// assert_eq!(file_extension("https://h/x/ch1.mp4?access_token=t"), Some("mp4"));
/// assert_eq!(file_extension("media/readme"), None);
/// ```
pub fn file_extension(raw: &str) -> Option<&str> {
    let name = file_name(raw)?;
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) => Some(&name[pos + 1..]).filter(|ext| !ext.is_empty()),
    }
}

/// Swap the extension of the last path segment, dropping any query string.
///
/// Returns `None` when the reference has no extension to replace.
///
/// # Examples
///
/// ```
/// use ebook_sync_common::paths::replace_extension;
///
/// assert_eq!(
///     replace_extension("/storage/jobs/1/media/ch.mp4?access_token=x", "srt").as_deref(),
///     Some("/storage/jobs/1/media/ch.srt")
/// );
/// assert_eq!(replace_extension("media/ch", "srt"), None);
/// ```
pub fn replace_extension(raw: &str, extension: &str) -> Option<String> {
    let (path, _) = split_query(raw);
    let ext = file_extension(path)?;
    let base = &path[..path.len() - ext.len()];
    Some(format!("{base}{}", extension.trim_start_matches('.')))
}

/// Subtitle format implied by the reference's extension.
///
/// # Examples
///
/// ```
/// use ebook_sync_common::paths::subtitle_format;
/// use ebook_sync_common::SubtitleFormat;
///
/// assert_eq!(subtitle_format("subs/ch1.ASS"), SubtitleFormat::Ass);
/// assert_eq!(subtitle_format("media/ch1.mp4"), SubtitleFormat::Unknown);
/// ```
pub fn subtitle_format(raw: &str) -> SubtitleFormat {
    file_extension(raw)
        .map(SubtitleFormat::from_extension)
        .unwrap_or(SubtitleFormat::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("x?y"), ("x", "?y"));
        assert_eq!(split_query("x#y"), ("x", "#y"));
        assert_eq!(split_query(""), ("", ""));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("a/b/c.mp3"), Some("c.mp3"));
        assert_eq!(file_name("c.mp3?x=/y"), Some("c.mp3"));
        assert_eq!(file_name("a/b/"), None);
        assert_eq!(file_name(""), None);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("ch1.mp3"), Some("mp3"));
        assert_eq!(file_extension("a.b/ch1"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("movie.en.srt"), Some("srt"));
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn test_replace_extension() {
        assert_eq!(replace_extension("a/b.mp4", ".vtt").as_deref(), Some("a/b.vtt"));
        assert_eq!(
            replace_extension("https://h/a/b.mp4#t=1", "ass").as_deref(),
            Some("https://h/a/b.ass")
        );
        assert_eq!(replace_extension("https://h/a/", "ass"), None);
    }

    #[test]
    fn test_subtitle_detection() {
        assert_eq!(subtitle_format("x.srt"), SubtitleFormat::Srt);
        assert_eq!(subtitle_format("x.vtt?access_token=1"), SubtitleFormat::Vtt);
        assert_eq!(subtitle_format("transcript.txt"), SubtitleFormat::Text);
        assert!(!subtitle_format("x.mp4").is_known());
        assert!(!subtitle_format("x").is_known());
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(r"\storage\jobs\1\a.mp3"), "/storage/jobs/1/a.mp3");
    }
}
