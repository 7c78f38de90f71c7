//! Benchmarks for marquee-parser.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use marquee_parser::{parse_episode, parse_movie};

const MOVIE_SAMPLES: &[&str] = &[
    "The.Matrix.1999.1080p.BluRay.x264-GROUP",
    "Heat (1995)",
    "Blade_Runner_2049_2017_2160p",
    "Comedian Title Special 2021",
    "Free Solo",
];

const EPISODE_SAMPLES: &[&str] = &[
    "Breaking.Bad.S01E01.720p.BluRay.x264-DEMAND",
    "Show.Name.S01E02.WEBRip",
    "show name s1e2 Pilot",
    "Stranger.Things.S04E09.Chapter.Nine.The.Piggyback.2160p.NF.WEB-DL",
    "Show - S03E04 - Pilot Redux",
];

fn bench_parse_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_single");

    group.bench_function("scene_movie", |b| {
        b.iter(|| parse_movie(black_box("The.Matrix.1999.1080p.BluRay.x264-GROUP")))
    });

    group.bench_function("folder_movie", |b| b.iter(|| parse_movie(black_box("Heat (1995)"))));

    group.bench_function("scene_episode", |b| {
        b.iter(|| parse_episode(black_box("Breaking.Bad.S01E01.720p.BluRay.x264-DEMAND")))
    });

    group.bench_function("not_an_episode", |b| {
        b.iter(|| parse_episode(black_box("Show.Name.Featurette")))
    });

    group.finish();
}

fn bench_parse_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_batch");

    for (name, samples) in [("movies", MOVIE_SAMPLES), ("episodes", EPISODE_SAMPLES)] {
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::new("names", name), samples, |b, samples| {
            b.iter(|| {
                for s in samples.iter() {
                    if name == "movies" {
                        black_box(parse_movie(black_box(s)));
                    } else {
                        black_box(parse_episode(black_box(s)));
                    }
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_single, bench_parse_batch);
criterion_main!(benches);
