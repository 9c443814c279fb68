//! Picking one playback URL out of a chunk's audio tracks.

use ebook_sync_common::{JobId, TrackRole};
use serde::{Deserialize, Serialize};

use super::Chunk;
use crate::url::{resolve_media_url, MediaUrlOrigin};

/// Which narration tracks the listener has switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackToggles {
    pub original: bool,
    pub translation: bool,
}

impl TrackToggles {
    pub fn new(original: bool, translation: bool) -> Self {
        Self {
            original,
            translation,
        }
    }
}

impl Default for TrackToggles {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Raw reference of the best track for the given toggles.
///
/// Order: translation, original, combined-for-translation,
/// combined-for-original. With both toggles off, any track is taken
/// (translation, original, combined). The first track with a raw reference
/// wins, whether or not it later resolves.
pub fn select_audio_reference(chunk: &Chunk, toggles: TrackToggles) -> Option<(TrackRole, &str)> {
    let reference = |role: TrackRole| {
        chunk
            .audio_track(role)
            .and_then(|track| track.reference())
            .map(|raw| (role, raw))
    };

    if !toggles.original && !toggles.translation {
        return [TrackRole::Translation, TrackRole::Original, TrackRole::Combined]
            .into_iter()
            .find_map(reference);
    }

    [
        (toggles.translation, TrackRole::Translation),
        (toggles.original, TrackRole::Original),
        (toggles.translation, TrackRole::Combined),
        (toggles.original, TrackRole::Combined),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .find_map(|(_, role)| reference(role))
}

/// Fetch-ready URL of the chunk audio to play, or `None` if no track applies.
pub fn resolve_chunk_audio_url(
    chunk: &Chunk,
    job_id: &JobId,
    origin: &MediaUrlOrigin,
    toggles: TrackToggles,
) -> Option<String> {
    let (role, raw) = select_audio_reference(chunk, toggles)?;
    tracing::trace!(%role, raw, "Selected audio track");
    resolve_media_url(Some(raw), job_id, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::AudioTrackMetadata;

    fn chunk(tracks: &[(&str, &str)]) -> Chunk {
        let mut chunk = Chunk::default();
        for (key, url) in tracks {
            chunk
                .audio_tracks
                .insert(key.to_string(), Some(AudioTrackMetadata::with_url(*url)));
        }
        chunk
    }

    fn pick(chunk: &Chunk, original: bool, translation: bool) -> Option<&str> {
        select_audio_reference(chunk, TrackToggles::new(original, translation)).map(|(_, raw)| raw)
    }

    #[test]
    fn test_translation_preferred() {
        let c = chunk(&[("orig", "o.mp3"), ("translation", "t.mp3"), ("combined", "c.mp3")]);
        assert_eq!(pick(&c, false, true), Some("t.mp3"));
        assert_eq!(pick(&c, true, true), Some("t.mp3"));
        assert_eq!(pick(&c, true, false), Some("o.mp3"));
    }

    #[test]
    fn test_translation_key_variant() {
        let c = chunk(&[("orig", "o.mp3"), ("trans", "t2.mp3"), ("combined", "c.mp3")]);
        assert_eq!(pick(&c, false, true), Some("t2.mp3"));
    }

    #[test]
    fn test_combined_fallback() {
        let c = chunk(&[("orig", "o.mp3"), ("orig_trans", "c.mp3")]);
        assert_eq!(pick(&c, false, true), Some("c.mp3"));
        assert_eq!(pick(&c, true, true), Some("o.mp3"));

        let c = chunk(&[("mix", "c.mp3")]);
        assert_eq!(pick(&c, true, false), Some("c.mp3"));
    }

    #[test]
    fn test_enabled_roles_only() {
        let c = chunk(&[("translation", "t.mp3")]);
        assert_eq!(pick(&c, true, false), None);
    }

    #[test]
    fn test_nothing_enabled_picks_anything() {
        let c = chunk(&[("orig", "o.mp3"), ("combined", "c.mp3")]);
        assert_eq!(pick(&c, false, false), Some("o.mp3"));

        let c = chunk(&[("combined", "c.mp3")]);
        assert_eq!(pick(&c, false, false), Some("c.mp3"));

        assert_eq!(pick(&Chunk::default(), false, false), None);
    }

    #[test]
    fn test_resolve_audio_url() {
        let origin = MediaUrlOrigin::library("https://api.example.com", None).unwrap();
        let job = JobId::parse("42").unwrap();
        let mut c = Chunk::default();
        c.audio_tracks.insert("orig".into(), None);
        c.audio_tracks
            .insert("original".into(), Some(AudioTrackMetadata::with_path("media/o.mp3")));

        assert_eq!(
            resolve_chunk_audio_url(&c, &job, &origin, TrackToggles::new(true, false)).as_deref(),
            Some("https://api.example.com/api/library/media/42/file/o.mp3")
        );
        assert_eq!(
            resolve_chunk_audio_url(&c, &job, &origin, TrackToggles::new(false, true)),
            None
        );
    }
}
