//! ebook-sync - playback sync tooling for ebook-tools jobs
//!
//! This library crate exposes configuration loading for the CLI and for
//! integration testing. The sync logic itself lives in `ebook-sync-media`.

pub mod config;
