use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ebook-sync")]
#[command(author, version, about = "Inspect ebook-tools media: resolve URLs, index chunks, pick subtitles")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Access token (overrides the configured one)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a raw media reference to a fetch-ready URL
    Resolve {
        /// URL or path as returned by the backend
        #[arg(required = true)]
        raw: String,

        /// Job the reference belongs to
        #[arg(short, long)]
        job: String,
    },

    /// List chunks with their keys, metadata URLs and audio URLs
    Chunks {
        /// Media listing JSON file
        #[arg(required = true)]
        listing: PathBuf,

        /// Job id (defaults to the listing's job_id)
        #[arg(short, long)]
        job: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the chunk that holds a sentence
    Lookup {
        /// Media listing JSON file
        #[arg(required = true)]
        listing: PathBuf,

        /// Sentence number
        #[arg(required = true, allow_negative_numbers = true)]
        sentence: f64,

        /// Job id (defaults to the listing's job_id)
        #[arg(short, long)]
        job: Option<String>,
    },

    /// Show ranked subtitle tracks for video chunks
    Subtitles {
        /// Media listing JSON file
        #[arg(required = true)]
        listing: PathBuf,

        /// Only this video (position in the listing's videos)
        #[arg(long)]
        video: Option<usize>,

        /// Job id (defaults to the listing's job_id)
        #[arg(short, long)]
        job: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
