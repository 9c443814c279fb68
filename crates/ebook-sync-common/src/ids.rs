//! Typed ID wrappers.
//!
//! Backend job identifiers are opaque strings (not UUIDs), so [`JobId`] wraps a
//! trimmed, non-empty `String` to keep it from being confused with chunk keys,
//! range fragments, or other free-form strings flowing through the resolvers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a backend processing job (one book, subtitle file, or video).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Parse a job id, trimming surrounding whitespace and slashes.
    ///
    /// Returns [`Error::InvalidInput`] when nothing is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::invalid_input("job id is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for JobId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_parse_trims() {
        let id = JobId::parse("  /job-42/ ").unwrap();
        assert_eq!(id.as_str(), "job-42");
        assert_eq!(id.to_string(), "job-42");
    }

    #[test]
    fn test_job_id_rejects_blank() {
        assert!(JobId::parse("").is_err());
        assert!(JobId::parse("   ").is_err());
        assert!(JobId::parse("//").is_err());
    }

    #[test]
    fn test_job_id_from_str() {
        let id: JobId = "abc".parse().unwrap();
        assert_eq!(id.as_ref(), "abc");
    }

    #[test]
    fn test_job_id_serde_transparent() {
        let id = JobId::parse("42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""42""#);

        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
