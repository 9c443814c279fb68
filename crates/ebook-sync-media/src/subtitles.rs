//! Subtitle track selection for video chunks.
//!
//! Subtitle entries come from a pool shared by every chunk of a job. For one
//! video chunk the resolver keeps the entries that belong to it (same range
//! fragment, chunk id, or base id), ranks them, and de-duplicates by URL.
//! With no match it guesses sibling files next to the video (`.ass`, `.vtt`,
//! `.srt`), and failing that returns every subtitle in the pool.

use std::collections::HashSet;
use std::fmt;

use ebook_sync_common::paths::{file_name, replace_extension, subtitle_format};
use ebook_sync_common::{JobId, SubtitleFormat};
use serde::{Deserialize, Serialize};

use crate::chunk::lenient;
use crate::url::{resolve_media_url, MediaUrlOrigin};

/// A video chunk to find subtitles for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoChunk {
    #[serde(default, alias = "chunkId", deserialize_with = "lenient::opt_string")]
    pub chunk_id: Option<String>,

    #[serde(default, alias = "rangeFragment", deserialize_with = "lenient::opt_string")]
    pub range_fragment: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub path: Option<String>,

    /// Grouping key; derived from name/url when absent.
    #[serde(default, alias = "baseId", deserialize_with = "lenient::opt_string")]
    pub base_id: Option<String>,
}

impl VideoChunk {
    /// Raw video reference: `url`, else `path`.
    pub fn reference(&self) -> Option<&str> {
        self.url.as_deref().or(self.path.as_deref())
    }

    /// Explicit base id, or one derived from the name or reference.
    pub fn base_id(&self) -> Option<String> {
        self.base_id
            .clone()
            .or_else(|| self.name.as_deref().and_then(derive_base_id))
            .or_else(|| self.reference().and_then(derive_base_id))
    }
}

/// A subtitle/caption entry from the job's file listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCandidate {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub path: Option<String>,

    /// Declared format; the extension is used when absent.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub format: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub language: Option<String>,

    #[serde(default, alias = "chunkId", deserialize_with = "lenient::opt_string")]
    pub chunk_id: Option<String>,

    #[serde(default, alias = "rangeFragment", deserialize_with = "lenient::opt_string")]
    pub range_fragment: Option<String>,

    #[serde(default, alias = "baseId", deserialize_with = "lenient::opt_string")]
    pub base_id: Option<String>,
}

impl SubtitleCandidate {
    /// Raw reference: `url`, else `path`.
    pub fn reference(&self) -> Option<&str> {
        self.url.as_deref().or(self.path.as_deref())
    }

    /// Declared format, else the format implied by reference or name.
    pub fn subtitle_format(&self) -> SubtitleFormat {
        if let Some(declared) = self.format.as_deref() {
            let format = SubtitleFormat::from_extension(declared);
            if format.is_known() {
                return format;
            }
        }
        [self.reference(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(subtitle_format)
            .find(|format| format.is_known())
            .unwrap_or(SubtitleFormat::Unknown)
    }

    /// Explicit base id, or one derived from the name or reference.
    pub fn base_id(&self) -> Option<String> {
        self.base_id
            .clone()
            .or_else(|| self.name.as_deref().and_then(derive_base_id))
            .or_else(|| self.reference().and_then(derive_base_id))
    }
}

/// How a track was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    /// Pool entry associated with the chunk.
    Matched,
    /// Guessed from the video file name; may not exist.
    Sibling,
    /// Pool entry not associated with the chunk.
    Fallback,
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Matched => "matched",
            Self::Sibling => "sibling",
            Self::Fallback => "fallback",
        })
    }
}

/// A resolved subtitle track, ready to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
    pub format: SubtitleFormat,
    pub source: TrackSource,
    pub name: Option<String>,
    pub language: Option<String>,
}

/// Grouping key from a file name or URL: the last path segment up to its
/// first dot, lowercased (`Chapter_01.en.vtt` and `chapter_01.mp4` share
/// `chapter_01`).
pub fn derive_base_id(raw: &str) -> Option<String> {
    let name = file_name(raw.trim())?;
    let stem = name.split('.').next().unwrap_or(name).trim();
    (!stem.is_empty()).then(|| stem.to_lowercase())
}

/// Match quality for an optional identifier, lower is better:
/// 0 exact, 1 both present but different, 2 neither present,
/// 3 only one side present.
// TODO: a mismatch currently outranks "neither present"; confirm this
// ordering with product before changing it.
pub fn four_way_score(chunk_value: Option<&str>, entry_value: Option<&str>) -> u8 {
    match (chunk_value, entry_value) {
        (Some(chunk), Some(entry)) if chunk == entry => 0,
        (Some(_), Some(_)) => 1,
        (None, None) => 2,
        _ => 3,
    }
}

/// Base id match quality, lower is better: 0 exact, 1 unknown, 2 mismatch.
pub fn base_id_score(chunk_base: Option<&str>, entry_base: Option<&str>) -> u8 {
    match (chunk_base, entry_base) {
        (Some(chunk), Some(entry)) if chunk == entry => 0,
        (Some(_), Some(_)) => 2,
        _ => 1,
    }
}

/// Whether a pool entry belongs to the video chunk.
pub fn matches_chunk(video: &VideoChunk, entry: &SubtitleCandidate) -> bool {
    same(video.range_fragment.as_deref(), entry.range_fragment.as_deref())
        || same(video.chunk_id.as_deref(), entry.chunk_id.as_deref())
        || same(video.base_id().as_deref(), entry.base_id().as_deref())
}

fn same(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Ranked, fetch-ready subtitle tracks for one video chunk.
///
/// Sibling candidates are returned without checking that the files exist.
pub fn resolve_subtitle_tracks(
    video: &VideoChunk,
    pool: &[SubtitleCandidate],
    job_id: &JobId,
    origin: &MediaUrlOrigin,
) -> Vec<SubtitleTrack> {
    let video_base = video.base_id();

    let mut matched: Vec<(_, &SubtitleCandidate)> = pool
        .iter()
        .filter(|entry| matches_chunk(video, entry))
        .map(|entry| {
            let rank = (
                entry.subtitle_format().priority(),
                four_way_score(video.range_fragment.as_deref(), entry.range_fragment.as_deref()),
                four_way_score(video.chunk_id.as_deref(), entry.chunk_id.as_deref()),
                base_id_score(video_base.as_deref(), entry.base_id().as_deref()),
            );
            (rank, entry)
        })
        .collect();

    if !matched.is_empty() {
        matched.sort_by_key(|(rank, _)| *rank);
        let tracks = dedupe(
            matched
                .into_iter()
                .filter_map(|(_, entry)| pool_track(entry, TrackSource::Matched, job_id, origin)),
        );
        if !tracks.is_empty() {
            return tracks;
        }
    }

    let siblings = sibling_tracks(video, job_id, origin);
    if !siblings.is_empty() {
        tracing::debug!(count = siblings.len(), "Using sibling subtitle candidates");
        return siblings;
    }

    let mut fallback: Vec<&SubtitleCandidate> = pool
        .iter()
        .filter(|entry| entry.subtitle_format().is_known())
        .collect();
    fallback.sort_by_key(|entry| entry.subtitle_format().priority());
    dedupe(
        fallback
            .into_iter()
            .filter_map(|entry| pool_track(entry, TrackSource::Fallback, job_id, origin)),
    )
}

/// Subtitle files guessed next to the video, in `.ass`, `.vtt`, `.srt` order.
pub fn sibling_tracks(video: &VideoChunk, job_id: &JobId, origin: &MediaUrlOrigin) -> Vec<SubtitleTrack> {
    let Some(reference) = video.reference() else {
        return Vec::new();
    };
    dedupe(SubtitleFormat::SIBLINGS.into_iter().filter_map(|format| {
        let raw = replace_extension(reference, format.extension()?)?;
        let url = resolve_media_url(Some(&raw), job_id, origin)?;
        Some(SubtitleTrack {
            url,
            format,
            source: TrackSource::Sibling,
            name: file_name(&raw).map(String::from),
            language: None,
        })
    }))
}

fn pool_track(
    entry: &SubtitleCandidate,
    source: TrackSource,
    job_id: &JobId,
    origin: &MediaUrlOrigin,
) -> Option<SubtitleTrack> {
    let url = resolve_media_url(entry.reference(), job_id, origin)?;
    Some(SubtitleTrack {
        url,
        format: entry.subtitle_format(),
        source,
        name: entry.name.clone(),
        language: entry.language.clone(),
    })
}

fn dedupe(tracks: impl Iterator<Item = SubtitleTrack>) -> Vec<SubtitleTrack> {
    let mut seen = HashSet::new();
    tracks.filter(|track| seen.insert(track.url.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> MediaUrlOrigin {
        MediaUrlOrigin::storage("https://api.example.com", None, None).unwrap()
    }

    fn job() -> JobId {
        JobId::parse("42").unwrap()
    }

    fn entry(url: &str) -> SubtitleCandidate {
        SubtitleCandidate {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    fn urls(tracks: &[SubtitleTrack]) -> Vec<&str> {
        tracks.iter().map(|t| t.url.as_str()).collect()
    }

    #[test]
    fn test_four_way_score() {
        assert_eq!(four_way_score(Some("a"), Some("a")), 0);
        assert_eq!(four_way_score(Some("a"), Some("b")), 1);
        assert_eq!(four_way_score(None, None), 2);
        assert_eq!(four_way_score(None, Some("b")), 3);
        assert_eq!(four_way_score(Some("a"), None), 3);
    }

    #[test]
    fn test_base_id_score() {
        assert_eq!(base_id_score(Some("a"), Some("a")), 0);
        assert_eq!(base_id_score(None, Some("a")), 1);
        assert_eq!(base_id_score(Some("a"), None), 1);
        assert_eq!(base_id_score(Some("a"), Some("b")), 2);
    }

    #[test]
    fn test_derive_base_id() {
        assert_eq!(derive_base_id("media/Chapter_01.en.vtt").as_deref(), Some("chapter_01"));
        assert_eq!(derive_base_id("https://h/x/chapter_01.mp4?t=1").as_deref(), Some("chapter_01"));
        assert_eq!(derive_base_id("media/"), None);
        assert_eq!(derive_base_id(".ass"), None);
    }

    #[test]
    fn test_matched_tracks_ranked_by_format_then_exactness() {
        let video = VideoChunk {
            range_fragment: Some("00-10".into()),
            chunk_id: Some("c0".into()),
            url: Some("media/ch_00-10.mp4".into()),
            ..Default::default()
        };
        let pool = vec![
            SubtitleCandidate {
                range_fragment: Some("00-10".into()),
                ..entry("subs/ch_00-10.srt")
            },
            SubtitleCandidate {
                chunk_id: Some("c0".into()),
                range_fragment: Some("00-11".into()),
                ..entry("subs/other.vtt")
            },
            SubtitleCandidate {
                range_fragment: Some("00-10".into()),
                ..entry("subs/ch_00-10.vtt")
            },
            SubtitleCandidate {
                range_fragment: Some("10-20".into()),
                ..entry("subs/ch_10-20.ass")
            },
        ];

        let tracks = resolve_subtitle_tracks(&video, &pool, &job(), &origin());
        assert_eq!(
            urls(&tracks),
            vec![
                "https://api.example.com/storage/jobs/42/subs/ch_00-10.vtt",
                "https://api.example.com/storage/jobs/42/subs/other.vtt",
                "https://api.example.com/storage/jobs/42/subs/ch_00-10.srt",
            ]
        );
        assert!(tracks.iter().all(|t| t.source == TrackSource::Matched));
        assert_eq!(tracks[0].format, SubtitleFormat::Vtt);
    }

    #[test]
    fn test_matched_tracks_deduplicated() {
        let video = VideoChunk {
            chunk_id: Some("c0".into()),
            ..Default::default()
        };
        let pool = vec![
            SubtitleCandidate {
                chunk_id: Some("c0".into()),
                ..entry("media/a.vtt")
            },
            SubtitleCandidate {
                chunk_id: Some("c0".into()),
                path: Some("/storage/jobs/42/media/a.vtt".into()),
                ..Default::default()
            },
        ];
        let tracks = resolve_subtitle_tracks(&video, &pool, &job(), &origin());
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_base_id_match() {
        let video = VideoChunk {
            name: Some("Chapter_02.mp4".into()),
            url: Some("media/Chapter_02.mp4".into()),
            ..Default::default()
        };
        let pool = vec![entry("media/chapter_01.en.vtt"), entry("media/chapter_02.en.vtt")];
        let tracks = resolve_subtitle_tracks(&video, &pool, &job(), &origin());
        assert_eq!(
            urls(&tracks),
            vec!["https://api.example.com/storage/jobs/42/media/chapter_02.en.vtt"]
        );
    }

    #[test]
    fn test_no_match_uses_siblings() {
        let video = VideoChunk {
            range_fragment: Some("00-10".into()),
            url: Some("media/ch_00-10.mp4".into()),
            ..Default::default()
        };
        let pool = vec![SubtitleCandidate {
            range_fragment: Some("10-20".into()),
            ..entry("subs/ch_10-20.vtt")
        }];

        let tracks = resolve_subtitle_tracks(&video, &pool, &job(), &origin());
        assert_eq!(
            urls(&tracks),
            vec![
                "https://api.example.com/storage/jobs/42/media/ch_00-10.ass",
                "https://api.example.com/storage/jobs/42/media/ch_00-10.vtt",
                "https://api.example.com/storage/jobs/42/media/ch_00-10.srt",
            ]
        );
        assert!(tracks.iter().all(|t| t.source == TrackSource::Sibling));
    }

    #[test]
    fn test_job_wide_fallback() {
        let video = VideoChunk {
            range_fragment: Some("00-10".into()),
            ..Default::default()
        };
        let pool = vec![
            entry("subs/b.srt"),
            entry("media/poster.jpg"),
            entry("subs/a.ass"),
            entry("subs/b.srt"),
        ];

        let tracks = resolve_subtitle_tracks(&video, &pool, &job(), &origin());
        assert_eq!(
            urls(&tracks),
            vec![
                "https://api.example.com/storage/jobs/42/subs/a.ass",
                "https://api.example.com/storage/jobs/42/subs/b.srt",
            ]
        );
        assert!(tracks.iter().all(|t| t.source == TrackSource::Fallback));
    }

    #[test]
    fn test_declared_format_wins() {
        let candidate = SubtitleCandidate {
            format: Some("webvtt".into()),
            ..entry("subs/captions")
        };
        assert_eq!(candidate.subtitle_format(), SubtitleFormat::Vtt);
        assert_eq!(entry("subs/x.unknown").subtitle_format(), SubtitleFormat::Unknown);
    }
}
