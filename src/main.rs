mod cli;

use ebook_sync::config::{self, Config};
use ebook_sync_common::JobId;
use ebook_sync_media::chunk::{resolve_chunk_audio_url, resolve_chunk_key, resolve_chunk_metadata_url};
use ebook_sync_media::{resolve_media_url, JobMediaListing, PlaybackSession};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ebook_sync=trace,ebook_sync_media=trace,ebook_sync_common=debug".to_string()
        } else {
            "ebook_sync=info,ebook_sync_media=warn".to_string()
        }
    });

    // Logs go to stderr so command output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { raw, job } => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            resolve(&config, &raw, &job)
        }
        Commands::Chunks { listing, job, json } => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            list_chunks(&config, &listing, job.as_deref(), json)
        }
        Commands::Lookup {
            listing,
            sentence,
            job,
        } => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            lookup(&config, &listing, sentence, job.as_deref())
        }
        Commands::Subtitles {
            listing,
            video,
            job,
        } => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            subtitles(&config, &listing, video, job.as_deref())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("ebook-sync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, token: Option<String>) -> Result<Config> {
    let mut config = config::load_config_or_default(path)?;
    if token.is_some() {
        config.api.access_token = token;
    }
    Ok(config)
}

fn resolve(config: &Config, raw: &str, job: &str) -> Result<()> {
    let origin = config.media_origin()?;
    let job_id = JobId::parse(job)?;

    match resolve_media_url(Some(raw), &job_id, &origin) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => anyhow::bail!("Could not resolve {:?} for job {}", raw, job_id),
    }
}

/// Listing file, job id, and a session with the listing's chunks installed.
fn open_session(
    config: &Config,
    listing_path: &Path,
    job: Option<&str>,
) -> Result<(JobMediaListing, PlaybackSession)> {
    let listing = JobMediaListing::from_path(listing_path)
        .with_context(|| format!("Failed to load listing: {:?}", listing_path))?;

    let job_id = match job {
        Some(job) => JobId::parse(job)?,
        None => listing
            .job_id()
            .context("No job id: pass --job or add job_id to the listing")?,
    };

    let session = PlaybackSession::new(job_id, config.media_origin()?, config.playback.toggles());
    session.replace_chunks(listing.chunks.clone());
    Ok((listing, session))
}

#[derive(Serialize)]
struct ChunkRow {
    index: usize,
    key: Option<String>,
    start_sentence: Option<i64>,
    end_sentence: Option<i64>,
    metadata_url: Option<String>,
    audio_url: Option<String>,
    skipped: bool,
}

fn list_chunks(config: &Config, listing_path: &Path, job: Option<&str>, json: bool) -> Result<()> {
    let (_, session) = open_session(config, listing_path, job)?;
    let snapshot = session.snapshot();
    let (job_id, origin) = (session.job_id(), session.origin());

    let rows: Vec<ChunkRow> = snapshot
        .chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let bounds = chunk.sentence_bounds();
            let skipped = !chunk.is_identifiable();
            ChunkRow {
                index,
                key: resolve_chunk_key(chunk),
                start_sentence: bounds.map(|(start, _)| start).or(chunk.start_sentence),
                end_sentence: bounds.map(|(_, end)| end).or(chunk.end_sentence),
                metadata_url: resolve_chunk_metadata_url(chunk, job_id, origin),
                audio_url: resolve_chunk_audio_url(chunk, job_id, origin, session.toggles()),
                skipped,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Job: {} ({} origin)", job_id, origin.kind());
    println!("Chunks: {}", rows.len());
    for row in &rows {
        if row.skipped {
            println!("  [{}] skipped (no key, bounds or sentences)", row.index);
            continue;
        }
        let range = match (row.start_sentence, row.end_sentence) {
            (Some(start), Some(end)) => format!("{}-{}", start, end),
            _ => "?".to_string(),
        };
        println!(
            "  [{}] {} sentences {}",
            row.index,
            row.key.as_deref().unwrap_or("-"),
            range
        );
        println!("      metadata: {}", row.metadata_url.as_deref().unwrap_or("-"));
        println!("      audio:    {}", row.audio_url.as_deref().unwrap_or("-"));
    }

    Ok(())
}

fn lookup(config: &Config, listing_path: &Path, sentence: f64, job: Option<&str>) -> Result<()> {
    let (_, session) = open_session(config, listing_path, job)?;

    let (entry, _) = session
        .locate(sentence)
        .with_context(|| format!("No chunk holds sentence {}", sentence))?;

    println!("Sentence: {}", sentence);
    println!("Chunk: {}", entry.chunk_index);
    println!("Key: {}", entry.chunk_key.as_deref().unwrap_or("-"));
    match (entry.local_index, entry.total) {
        (Some(local), Some(total)) => println!("Position: {} of {}", local + 1, total),
        _ => println!("Position: by range"),
    }
    if let Some(url) = session.metadata_url_for_sentence(sentence) {
        println!("Metadata: {}", url);
    }
    if let Some(url) = session.audio_url_for_sentence(sentence) {
        println!("Audio: {}", url);
    }

    Ok(())
}

fn subtitles(
    config: &Config,
    listing_path: &Path,
    video: Option<usize>,
    job: Option<&str>,
) -> Result<()> {
    let (listing, session) = open_session(config, listing_path, job)?;

    let selected: Vec<usize> = match video {
        Some(i) if i < listing.videos.len() => vec![i],
        Some(i) => anyhow::bail!(
            "Video {} out of range (listing has {} videos)",
            i,
            listing.videos.len()
        ),
        None => (0..listing.videos.len()).collect(),
    };

    if selected.is_empty() {
        println!("No videos in listing");
        return Ok(());
    }

    for i in selected {
        let video = &listing.videos[i];
        println!("[{}] {}", i, video.reference().unwrap_or("-"));
        let tracks = session.subtitle_tracks(video, &listing.subtitles);
        if tracks.is_empty() {
            println!("    no subtitle tracks");
        }
        for track in tracks {
            println!("    {:<8} {:<7} {}", track.source, track.format.to_string(), track.url);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            let origin = config.media_origin()?;
            println!("✓ Configuration is valid");
            println!("  API: {}", origin.api_base());
            println!("  Origin: {}", origin.kind());
            println!("  Access token: {}", if origin.access_token().is_some() { "set" } else { "none" });
            println!(
                "  Playback: original={} translation={}",
                config.playback.original_enabled, config.playback.translation_enabled
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  API: {}", config.api.base_url);
        }
    }

    Ok(())
}
