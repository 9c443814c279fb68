//! Core type definitions for audio tracks and subtitle formats.
//!
//! The backend has renamed audio track keys and subtitle formats several times;
//! these enums fold every known spelling into one variant so the resolvers can
//! match on roles instead of strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an audio rendition attached to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackRole {
    /// Narration in the source language.
    Original,
    /// Narration of the translation.
    Translation,
    /// Original and translation mixed into one file.
    Combined,
}

impl TrackRole {
    /// Keys the backend has used for this role, in lookup order.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Original => &["orig", "original"],
            Self::Translation => &["translation", "trans"],
            Self::Combined => &["orig_trans", "combined", "mix"],
        }
    }

    /// Map a track-map key (any historical spelling) to its role.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        [Self::Original, Self::Translation, Self::Combined]
            .into_iter()
            .find(|role| role.keys().contains(&key.as_str()))
    }
}

impl fmt::Display for TrackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Translation => write!(f, "translation"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// Format of a subtitle/caption file.
///
/// Variants are declared in preference order, so the derived `Ord` sorts the
/// preferred format first and [`SubtitleFormat::Unknown`] last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// Advanced SubStation Alpha (`.ass`, `.ssa`).
    Ass,
    /// WebVTT (`.vtt`).
    Vtt,
    /// SubRip (`.srt`).
    Srt,
    /// Plain text transcript (`.txt`).
    Text,
    /// Anything else.
    Unknown,
}

impl SubtitleFormat {
    /// Formats in preference order, excluding [`SubtitleFormat::Unknown`].
    pub const PREFERENCE: [SubtitleFormat; 4] = [Self::Ass, Self::Vtt, Self::Srt, Self::Text];

    /// Formats that are synthesized next to a video file, in priority order.
    pub const SIBLINGS: [SubtitleFormat; 3] = [Self::Ass, Self::Vtt, Self::Srt];

    /// Position in the preference list; unknown formats sort last.
    pub fn priority(self) -> usize {
        Self::PREFERENCE
            .iter()
            .position(|f| *f == self)
            .unwrap_or(Self::PREFERENCE.len())
    }

    /// Detect the format from a file extension or a declared format name.
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ass" | "ssa" => Self::Ass,
            "vtt" | "webvtt" => Self::Vtt,
            "srt" | "subrip" => Self::Srt,
            "txt" | "text" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Canonical file extension, if the format has one.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Ass => Some("ass"),
            Self::Vtt => Some("vtt"),
            Self::Srt => Some("srt"),
            Self::Text => Some("txt"),
            Self::Unknown => None,
        }
    }

    /// Whether this format is a recognised subtitle/caption format.
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ass => write!(f, "ass"),
            Self::Vtt => write!(f, "vtt"),
            Self::Srt => write!(f, "srt"),
            Self::Text => write!(f, "text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
