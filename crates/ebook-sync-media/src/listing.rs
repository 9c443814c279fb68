//! Decoding of the backend's per-job media listing.

use std::path::Path;

use ebook_sync_common::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chunk::{lenient, Chunk};
use crate::error::{Error, Result};
use crate::subtitles::{SubtitleCandidate, VideoChunk};

/// Everything the backend lists for one job's media.
///
/// A bare JSON array is accepted as a chunk list with no videos or
/// subtitles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMediaListing {
    #[serde(default, alias = "jobId", deserialize_with = "lenient::opt_string")]
    pub job_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub chunks: Vec<Chunk>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub videos: Vec<VideoChunk>,

    #[serde(
        default,
        alias = "captions",
        deserialize_with = "lenient::null_as_default"
    )]
    pub subtitles: Vec<SubtitleCandidate>,
}

impl JobMediaListing {
    /// Decode a listing from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let listing = match value {
            Value::Array(_) => Self {
                chunks: serde_json::from_value(value)?,
                ..Default::default()
            },
            Value::Object(_) => serde_json::from_value(value)?,
            other => {
                return Err(Error::Listing(format!(
                    "expected an object or array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let skipped = listing.chunks.iter().filter(|c| !c.is_identifiable()).count();
        if skipped > 0 {
            tracing::warn!(skipped, "Listing contains chunks without any identity");
        }
        tracing::debug!(
            chunks = listing.chunks.len(),
            videos = listing.videos.len(),
            subtitles = listing.subtitles.len(),
            "Decoded media listing"
        );
        Ok(listing)
    }

    /// Read and decode a listing file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(ebook_sync_common::Error::from)?;
        Self::from_json(&json)
    }

    /// The listing's job id, if it carries a usable one.
    pub fn job_id(&self) -> Option<JobId> {
        self.job_id.as_deref().and_then(|raw| JobId::parse(raw).ok())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
