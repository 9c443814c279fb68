//! ebook-sync-media: chunk lookup, sentence indexing, and media URL resolution.
//!
//! A job's narration is pre-rendered as chunks, each covering a contiguous
//! range of sentence numbers. This crate answers the questions a player asks
//! while following along:
//!
//! - `url` - turn any backend reference into one fetch-ready URL
//! - `chunk` - chunk keys, metadata locations, and audio track selection
//! - `sentence_index` - which chunk holds sentence N
//! - `subtitles` - ranked subtitle tracks for a video chunk
//! - `listing` - decoding the backend's media listing
//! - `session` - per-playback state with atomic chunk list replacement
//!
//! Everything here is synchronous and side-effect free apart from logging;
//! fetching is left to the caller.
//!
//! # Examples
//!
//! ```
//! use ebook_sync_common::JobId;
//! use ebook_sync_media::url::{resolve_media_url, MediaUrlOrigin};
//!
//! let origin = MediaUrlOrigin::library("https://api.example.com", Some("t".into())).unwrap();
//! let job = JobId::parse("42").unwrap();
//!
//! assert_eq!(
//!     resolve_media_url(Some("media/ch1.mp3"), &job, &origin).as_deref(),
//!     Some("https://api.example.com/api/library/media/42/file/ch1.mp3?access_token=t")
//! );
//! ```

pub mod chunk;
pub mod error;
pub mod listing;
pub mod sentence_index;
pub mod session;
pub mod subtitles;
pub mod url;

pub use crate::url::{resolve_media_url, MediaUrlOrigin};
pub use chunk::{AudioTrackMetadata, Chunk, ChunkSentence, TrackToggles};
pub use error::{Error, Result};
pub use listing::JobMediaListing;
pub use sentence_index::{SentenceChunkEntry, SentenceChunkIndex};
pub use session::{ChunkSnapshot, PlaybackSession};
pub use subtitles::{SubtitleCandidate, SubtitleTrack, TrackSource, VideoChunk};
