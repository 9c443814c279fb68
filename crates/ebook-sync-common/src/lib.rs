//! ebook-sync-common: Shared types, IDs, and utilities.
//!
//! This crate provides the vocabulary shared by the ebook-sync crates:
//!
//! - **Typed IDs**: [`JobId`] wraps the opaque backend job identifier
//! - **Core Types**: audio track roles and subtitle formats, including the
//!   historical key/extension spellings the backend has used
//! - **Path Utilities**: extension detection and replacement on raw URL/path strings
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use ebook_sync_common::{JobId, SubtitleFormat, TrackRole};
//! use ebook_sync_common::paths::replace_extension;
//!
//! let job = JobId::parse("42").unwrap();
//! assert_eq!(job.as_str(), "42");
//!
//! assert_eq!(TrackRole::from_key("trans"), Some(TrackRole::Translation));
//! assert_eq!(SubtitleFormat::from_extension("VTT"), SubtitleFormat::Vtt);
//!
//! assert_eq!(
//!     replace_extension("media/ch1.mp4", "vtt").as_deref(),
//!     Some("media/ch1.vtt")
//! );
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
