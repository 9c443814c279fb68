//! Joining path suffixes onto base URLs.
//!
//! Suffixes arrive either already percent-encoded (`my%20file.mp3`) or literal
//! (`my file.mp3`, `100%.mp3`). [`is_percent_encoded`] decides which case applies
//! by scanning for well-formed `%XX` escapes. It is a best-effort normalization,
//! not a validator: a literal name that happens to contain `%41` is taken as
//! encoded.

use std::borrow::Cow;

use url::Url;

/// Whether `s` contains at least one `%` escape and every `%` starts a
/// well-formed `%XX` sequence.
pub fn is_percent_encoded(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut seen = false;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return false;
            }
            seen = true;
            i += 3;
        } else {
            i += 1;
        }
    }
    seen
}

/// Percent-encode one path segment, decoding any existing escapes first so
/// that already-encoded input is not encoded twice.
pub fn encode_segment(segment: &str) -> String {
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    urlencoding::encode(&decoded).into_owned()
}

/// Whether a path segment is `.` or `..`, literally or percent-encoded.
pub fn is_dot_segment(segment: &str) -> bool {
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    matches!(decoded.as_ref(), "." | "..")
}

/// Non-empty segments of a relative path, with `.` segments dropped.
///
/// Returns `None` if any segment is `..` (literal or percent-encoded): the
/// joined URL must stay below the directory it is joined onto.
pub fn safe_segments(path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
        match decoded.as_ref() {
            "." => {}
            ".." => return None,
            _ => segments.push(segment),
        }
    }
    Some(segments)
}

/// Encode a `/`-separated path unless it is already percent-encoded.
pub fn encode_path(path: &str) -> String {
    if is_percent_encoded(path) {
        path.to_string()
    } else {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Append `suffix` to the path of `base`, choosing the encoded or literal
/// treatment via [`is_percent_encoded`].
///
/// Returns `None` when the suffix is empty, climbs out with `..`, or `base`
/// cannot carry a path.
pub fn join_path(base: &Url, suffix: &str) -> Option<Url> {
    let segments = safe_segments(suffix)?;
    if segments.is_empty() {
        return None;
    }
    join_encoded(base, &encode_path(&segments.join("/")))
}

/// Append an already-encoded suffix to the path of `base`.
///
/// Handles base paths that are empty, `/`, or end in `/`. The base query and
/// fragment are dropped.
pub fn join_encoded(base: &Url, encoded: &str) -> Option<Url> {
    if base.cannot_be_a_base() {
        return None;
    }
    let encoded = encoded.trim_matches('/');
    if encoded.is_empty() {
        return None;
    }
    let prefix = base.path().trim_end_matches('/');

    let mut url = base.clone();
    url.set_path(&format!("{prefix}/{encoded}"));
    url.set_query(None);
    url.set_fragment(None);
    Some(url)
}

/// Carry a raw `?query#fragment` tail over onto a resolved URL.
pub fn apply_tail(mut url: Url, tail: &str) -> Url {
    let (query, fragment) = match tail.find('#') {
        Some(pos) => (&tail[..pos], Some(&tail[pos + 1..])),
        None => (tail, None),
    };
    let query = query.trim_start_matches('?');
    if !query.is_empty() {
        url.set_query(Some(query));
    }
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        url.set_fragment(Some(fragment));
    }
    url
}
