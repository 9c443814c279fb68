//! Benchmarks for sentence lookup and media URL resolution
//!
//! Lookup runs on every playback tick, so it is measured across chunk list
//! sizes for both range-only and inlined-sentence listings.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ebook_sync_common::JobId;
use ebook_sync_media::sentence_index::{build_sentence_chunk_index, lookup_sentence};
use ebook_sync_media::{resolve_media_url, Chunk, ChunkSentence, MediaUrlOrigin};

/// Chunks of 10 sentences each, with bounds only
fn ranged_chunks(count: i64) -> Vec<Chunk> {
    (0..count)
        .map(|i| Chunk {
            chunk_id: Some(format!("chunk_{:04}", i)),
            start_sentence: Some(i * 10 + 1),
            end_sentence: Some(i * 10 + 10),
            ..Default::default()
        })
        .collect()
}

/// Chunks of 10 sentences each, with sentences inlined
fn inlined_chunks(count: i64) -> Vec<Chunk> {
    (0..count)
        .map(|i| Chunk {
            chunk_id: Some(format!("chunk_{:04}", i)),
            sentences: Some((1..=10).map(|n| ChunkSentence::numbered(i * 10 + n)).collect()),
            ..Default::default()
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for count in [10, 100, 1000] {
        let ranged = ranged_chunks(count);
        group.bench_with_input(BenchmarkId::new("ranged", count), &ranged, |b, chunks| {
            b.iter(|| build_sentence_chunk_index(black_box(chunks)));
        });

        let inlined = inlined_chunks(count);
        group.bench_with_input(BenchmarkId::new("inlined", count), &inlined, |b, chunks| {
            b.iter(|| build_sentence_chunk_index(black_box(chunks)));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for count in [10, 100, 1000] {
        let index = build_sentence_chunk_index(&ranged_chunks(count));
        let middle = (count * 5) as f64;
        group.bench_with_input(BenchmarkId::new("ranged", count), &index, |b, index| {
            b.iter(|| lookup_sentence(black_box(index), black_box(middle)));
        });

        let index = build_sentence_chunk_index(&inlined_chunks(count));
        group.bench_with_input(BenchmarkId::new("inlined", count), &index, |b, index| {
            b.iter(|| lookup_sentence(black_box(index), black_box(middle)));
        });
    }

    let index = build_sentence_chunk_index(&ranged_chunks(1000));
    group.bench_function("miss", |b| {
        b.iter(|| lookup_sentence(black_box(&index), black_box(50_000.0)));
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_media_url");
    let job = JobId::parse("42").unwrap();
    let library = MediaUrlOrigin::library("https://api.example.com", Some("tok".into())).unwrap();
    let storage = MediaUrlOrigin::storage("https://api.example.com", Some("tok".into()), None).unwrap();

    let inputs = [
        ("relative", "media/chunk_0001.mp3"),
        ("storage_path", "/storage/jobs/42/media/chunk 0001.mp3"),
        ("absolute", "https://cdn.example.com/jobs/42/media/chunk_0001.mp3"),
    ];

    for (name, raw) in inputs {
        group.bench_function(format!("library/{}", name), |b| {
            b.iter(|| resolve_media_url(black_box(Some(raw)), &job, &library));
        });
        group.bench_function(format!("storage/{}", name), |b| {
            b.iter(|| resolve_media_url(black_box(Some(raw)), &job, &storage));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_lookup, bench_resolve);
criterion_main!(benches);
