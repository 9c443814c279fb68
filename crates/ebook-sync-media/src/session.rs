//! Per-playback state: the current chunk list, its index, and the listener's
//! track toggles.

use std::sync::Arc;

use ebook_sync_common::JobId;
use parking_lot::RwLock;

use crate::chunk::{
    resolve_chunk_audio_url, resolve_chunk_key, resolve_chunk_metadata_url, Chunk, TrackToggles,
};
use crate::sentence_index::{SentenceChunkEntry, SentenceChunkIndex};
use crate::subtitles::{resolve_subtitle_tracks, SubtitleCandidate, SubtitleTrack, VideoChunk};
use crate::url::MediaUrlOrigin;

/// A chunk list together with the index built for it.
#[derive(Debug, Default)]
pub struct ChunkSnapshot {
    pub chunks: Vec<Chunk>,
    pub index: SentenceChunkIndex,
}

impl ChunkSnapshot {
    /// Build the index for `chunks`.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let index = SentenceChunkIndex::build(&chunks);
        Self { chunks, index }
    }

    /// Index entry and chunk for a sentence.
    pub fn locate(&self, sentence_number: f64) -> Option<(SentenceChunkEntry, &Chunk)> {
        let entry = self.index.lookup(sentence_number)?;
        let chunk = self.chunks.get(entry.chunk_index)?;
        Some((entry, chunk))
    }
}

/// One playback session over a job's media.
///
/// Chunk lists are swapped whole: readers keep the snapshot they took, and a
/// replacement is indexed before it becomes visible.
pub struct PlaybackSession {
    job_id: JobId,
    origin: MediaUrlOrigin,
    toggles: RwLock<TrackToggles>,
    current: RwLock<Arc<ChunkSnapshot>>,
}

impl PlaybackSession {
    pub fn new(job_id: JobId, origin: MediaUrlOrigin, toggles: TrackToggles) -> Self {
        Self {
            job_id,
            origin,
            toggles: RwLock::new(toggles),
            current: RwLock::new(Arc::new(ChunkSnapshot::default())),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn origin(&self) -> &MediaUrlOrigin {
        &self.origin
    }

    /// Install a new chunk list.
    pub fn replace_chunks(&self, chunks: Vec<Chunk>) {
        let snapshot = Arc::new(ChunkSnapshot::new(chunks));
        tracing::debug!(
            job_id = %self.job_id,
            chunks = snapshot.chunks.len(),
            "Replacing chunk list"
        );
        *self.current.write() = snapshot;
    }

    /// The current chunk list and index.
    pub fn snapshot(&self) -> Arc<ChunkSnapshot> {
        self.current.read().clone()
    }

    pub fn toggles(&self) -> TrackToggles {
        *self.toggles.read()
    }

    pub fn set_toggles(&self, toggles: TrackToggles) {
        *self.toggles.write() = toggles;
    }

    /// Index entry and a copy of the chunk that holds a sentence.
    pub fn locate(&self, sentence_number: f64) -> Option<(SentenceChunkEntry, Chunk)> {
        let snapshot = self.snapshot();
        snapshot
            .locate(sentence_number)
            .map(|(entry, chunk)| (entry, chunk.clone()))
    }

    /// Metadata URL of the chunk holding a sentence.
    pub fn metadata_url_for_sentence(&self, sentence_number: f64) -> Option<String> {
        let snapshot = self.snapshot();
        let (_, chunk) = snapshot.locate(sentence_number)?;
        resolve_chunk_metadata_url(chunk, &self.job_id, &self.origin)
    }

    /// Audio URL of the chunk holding a sentence, for the current toggles.
    pub fn audio_url_for_sentence(&self, sentence_number: f64) -> Option<String> {
        let snapshot = self.snapshot();
        let (_, chunk) = snapshot.locate(sentence_number)?;
        resolve_chunk_audio_url(chunk, &self.job_id, &self.origin, self.toggles())
    }

    /// Ranked subtitle tracks for a video chunk.
    pub fn subtitle_tracks(
        &self,
        video: &VideoChunk,
        pool: &[SubtitleCandidate],
    ) -> Vec<SubtitleTrack> {
        resolve_subtitle_tracks(video, pool, &self.job_id, &self.origin)
    }

    /// Whether reaching `sentence_number` means loading a different chunk
    /// than the one keyed `current_key`.
    ///
    /// Returns `false` for sentences no chunk covers, since there is nothing
    /// to switch to.
    pub fn needs_switch(&self, current_key: Option<&str>, sentence_number: f64) -> bool {
        let snapshot = self.snapshot();
        let Some((entry, chunk)) = snapshot.locate(sentence_number) else {
            return false;
        };
        let target = entry.chunk_key.or_else(|| resolve_chunk_key(chunk));
        match (current_key, target.as_deref()) {
            (Some(current), Some(target)) => current != target,
            _ => true,
        }
    }
}
