//! Chunks: units of pre-rendered media covering a contiguous sentence range.
//!
//! A [`Chunk`] is decoded from a backend listing and never mutated afterwards;
//! a newer listing replaces the whole list.

mod audio;
mod key;
pub(crate) mod lenient;

pub use audio::{resolve_chunk_audio_url, select_audio_reference, TrackToggles};
pub use key::{resolve_chunk_key, resolve_chunk_metadata_url};

use std::collections::BTreeMap;

use ebook_sync_common::TrackRole;
use serde::{Deserialize, Serialize};

/// A unit of pre-generated audio/text/video covering a sentence range.
///
/// At least one of `chunk_id`, `range_fragment`, `metadata_path`,
/// `metadata_url` or the sentence bounds is expected. Chunks without any of
/// them cannot be keyed, indexed or fetched and are skipped by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default, alias = "chunkId", deserialize_with = "lenient::opt_string")]
    pub chunk_id: Option<String>,

    #[serde(default, alias = "rangeFragment", deserialize_with = "lenient::opt_string")]
    pub range_fragment: Option<String>,

    /// Relative metadata location.
    #[serde(default, alias = "metadataPath", deserialize_with = "lenient::opt_string")]
    pub metadata_path: Option<String>,

    /// Possibly absolute metadata location; preferred over `metadata_path`.
    #[serde(default, alias = "metadataUrl", deserialize_with = "lenient::opt_string")]
    pub metadata_url: Option<String>,

    /// First sentence number covered (inclusive).
    #[serde(default, alias = "startSentence", deserialize_with = "lenient::opt_i64")]
    pub start_sentence: Option<i64>,

    /// Last sentence number covered (inclusive).
    #[serde(default, alias = "endSentence", deserialize_with = "lenient::opt_i64")]
    pub end_sentence: Option<i64>,

    #[serde(default, alias = "sentenceCount", deserialize_with = "lenient::opt_i64")]
    pub sentence_count: Option<i64>,

    /// Eagerly loaded sentences, when the listing inlines them.
    #[serde(default)]
    pub sentences: Option<Vec<ChunkSentence>>,

    /// Track-map key (any historical spelling) to track metadata. A `null`
    /// entry means the track is unavailable.
    #[serde(
        default,
        alias = "audioTracks",
        deserialize_with = "lenient::null_as_default"
    )]
    pub audio_tracks: BTreeMap<String, Option<AudioTrackMetadata>>,
}

impl Chunk {
    /// Inclusive sentence bounds.
    ///
    /// A missing end is inferred from `sentence_count` when the start is known.
    /// Returns `None` unless both bounds are known and `end >= start`.
    pub fn sentence_bounds(&self) -> Option<(i64, i64)> {
        let start = self.start_sentence?;
        let end = match self.end_sentence {
            Some(end) => end,
            None => {
                let count = self.sentence_count?;
                start.checked_add(count)?.checked_sub(1)?
            }
        };
        (end >= start).then_some((start, end))
    }

    /// Whether the chunk carries anything to key or index it by.
    pub fn is_identifiable(&self) -> bool {
        self.chunk_id.is_some()
            || self.range_fragment.is_some()
            || self.metadata_path.is_some()
            || self.metadata_url.is_some()
            || self.start_sentence.is_some()
            || self.end_sentence.is_some()
            || self.sentences.is_some()
    }

    /// Track metadata for a role.
    ///
    /// Keys are classified with [`TrackRole::from_key`]; when several keys map
    /// to the role, the earliest spelling in [`TrackRole::keys`] wins. `null`
    /// entries and tracks without a reference are skipped.
    pub fn audio_track(&self, role: TrackRole) -> Option<&AudioTrackMetadata> {
        self.audio_tracks
            .iter()
            .filter(|(key, _)| TrackRole::from_key(key) == Some(role))
            .filter_map(|(key, track)| {
                let track = track.as_ref().filter(|t| t.reference().is_some())?;
                let key = key.trim().to_ascii_lowercase();
                let rank = role.keys().iter().position(|k| *k == key)?;
                Some((rank, track))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, track)| track)
    }
}

/// One sentence inlined in a chunk listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkSentence {
    #[serde(default, alias = "sentenceNumber", deserialize_with = "lenient::opt_i64")]
    pub sentence_number: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub text: Option<String>,
}

impl ChunkSentence {
    /// Sentence with only a number, as used in tests and synthetic listings.
    pub fn numbered(sentence_number: i64) -> Self {
        Self {
            sentence_number: Some(sentence_number),
            text: None,
        }
    }
}

/// One audio rendition of a chunk.
///
/// Listings carry either an object with `url`/`path` or just a path string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrackRepr")]
pub struct AudioTrackMetadata {
    pub url: Option<String>,
    pub path: Option<String>,
}

impl AudioTrackMetadata {
    /// Track given by URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            path: None,
        }
    }

    /// Track given by relative path.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            url: None,
            path: Some(path.into()),
        }
    }

    /// Raw reference: `url` if non-blank, else `path`.
    pub fn reference(&self) -> Option<&str> {
        [self.url.as_deref(), self.path.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackRepr {
    Bare(String),
    Full {
        #[serde(default, deserialize_with = "lenient::opt_string")]
        url: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_string")]
        path: Option<String>,
    },
}

impl From<TrackRepr> for AudioTrackMetadata {
    fn from(repr: TrackRepr) -> Self {
        match repr {
            TrackRepr::Bare(path) => Self {
                url: None,
                path: Some(path),
            },
            TrackRepr::Full { url, path } => Self { url, path },
        }
    }
}
