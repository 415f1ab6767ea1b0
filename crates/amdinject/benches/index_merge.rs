// index_merge.rs - Benchmarks for project indexing, block parsing, and merging
//
// Run with: cargo bench --bench index_merge --features test-support
// Compare baselines: cargo bench --bench index_merge --features test-support -- --baseline before

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

use amdinject::config::AmdConfig;
use amdinject::dependency::{
    merge, sort_by_path, DependencyBlock, DependencyEntry, MergeMode, ProjectFileIndex,
};
use amdinject::test_utils::fixture_workspace::{
    create_fixture_workspace, fixture_listing, module_path, FixtureConfig,
};

const PROJECT_ROOT: &str = "/project";

// ---------------------------------------------------------------------------
// Benchmark: Building the project file index
//
// Measures subtree filtering and candidate grouping for a synthetic listing.
// No filesystem access; the listing is generated in memory.
// ---------------------------------------------------------------------------

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    let amd = AmdConfig::default();

    let configs: &[(&str, FixtureConfig)] = &[
        ("small_10", FixtureConfig::small()),
        ("medium_100", FixtureConfig::medium()),
        ("large_1000", FixtureConfig::large()),
    ];

    for (label, config) in configs {
        let files = fixture_listing(Path::new(PROJECT_ROOT), config);
        group.bench_with_input(BenchmarkId::new("build", *label), &files, |b, files| {
            b.iter(|| {
                black_box(ProjectFileIndex::build(
                    black_box(files),
                    amd.subtree_filter(),
                    &amd.extension,
                ))
            })
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: Parsing, merging, and sorting real fixture blocks
//
// Uses the largest module written by the fixture generator so the block
// carries `dependencies_per_module` entries.
// ---------------------------------------------------------------------------

fn bench_block_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_operations");
    group.sample_size(50);

    let config = FixtureConfig::large();
    let workspace = create_fixture_workspace(&config);
    let last = config.module_count - 1;
    let text = std::fs::read_to_string(workspace.path().join(module_path(last, &config)))
        .expect("Failed to read fixture module");

    group.bench_function("parse", |b| {
        b.iter(|| black_box(DependencyBlock::parse(black_box(&text)).unwrap()))
    });

    let block = DependencyBlock::parse(&text).unwrap();
    let incoming: Vec<DependencyEntry> = (0..20)
        .map(|i| DependencyEntry::new(format!("extra/Extra{}", i), format!("Extra{}", i)))
        .collect();

    group.bench_function("merge_incremental", |b| {
        b.iter(|| black_box(merge(&block, black_box(&incoming), MergeMode::Incremental)))
    });

    group.bench_function("merge_replace_all", |b| {
        b.iter(|| black_box(merge(&block, black_box(&incoming), MergeMode::ReplaceAll)))
    });

    let merged = merge(&block, &incoming, MergeMode::Incremental);
    group.bench_function("sort_by_path", |b| {
        b.iter(|| black_box(sort_by_path(black_box(&merged))))
    });

    group.bench_function("render", |b| {
        b.iter(|| {
            black_box(merged.render_paths());
            black_box(merged.render_names(70));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_block_operations);
criterion_main!(benches);
