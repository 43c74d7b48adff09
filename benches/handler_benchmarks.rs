//! Criterion benchmarks for condensed_log

use chrono::Utc;
use condensed_log::core::sprintf;
use condensed_log::prelude::*;
use condensed_log::BufferPool;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

fn handler(level: Level) -> TextHandler {
    TextHandler::builder()
        .time_pattern("%H:%M:%S%.4f")
        .level(level)
        .output(std::io::sink())
        .build()
        .expect("Failed to build handler")
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let root = handler(Level::TRACE);
    let nested = root.with_group("http").with_group("server");
    let now = Utc::now();

    let plain = Record::new(Level::INFO, "Hello, world!").with_time(now);
    group.bench_function("plain", |b| {
        b.iter(|| black_box(root.format(black_box(&plain), &[])));
    });

    let with_attrs = Record::new(Level::INFO, "request served")
        .with_time(now)
        .with_attrs([
            Attr::new("method", "GET"),
            Attr::new("path", "/index.html"),
            Attr::new("status", 200),
            Attr::new("elapsed", 1.25),
        ]);
    group.bench_function("scalar_attrs", |b| {
        b.iter(|| black_box(root.format(black_box(&with_attrs), &[])));
    });

    let with_groups = Record::new(Level::WARN, "slow query")
        .with_time(now)
        .with_attrs([
            Attr::new("table", "users"),
            Attr::group(
                "db",
                [
                    Attr::group("pool", [Attr::new("idle", 0)]),
                    Attr::new("query", "select * from users"),
                ],
            ),
        ]);
    group.bench_function("nested_groups", |b| {
        b.iter(|| black_box(nested.format(black_box(&with_groups), &[])));
    });

    let promoted = Record::new(Level::INFO, "connected")
        .with_time(now)
        .with_attr(Attr::group("peer", [Attr::group("addr", [Attr::new("port", 443)])]));
    group.bench_function("promoted_path", |b| {
        b.iter(|| black_box(nested.format(black_box(&promoted), &[])));
    });

    let formatted = Record::new(Level::INFO, "%s took %.2fms (%d rows)").with_time(now);
    group.bench_function("deferred_format", |b| {
        b.iter(|| {
            black_box(root.format(
                black_box(&formatted),
                &["query".into(), 12.345.into(), 42.into()],
            ))
        });
    });

    group.finish();
}

// ============================================================================
// Logger Benchmarks
// ============================================================================

fn bench_logger(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new(handler(Level::INFO)).with_group("bench");

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("info_attrs", |b| {
        b.iter(|| {
            logger.info_attrs(
                black_box("Info message"),
                [Attr::new("user", "alice"), Attr::new("id", 7)],
            )
        });
    });

    group.bench_function("infof", |b| {
        b.iter(|| logger.infof(black_box("processed %d items"), &[100.into()]));
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::new(handler(Level::WARN));

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("Filtered message")));
    });

    group.bench_function("filtered_out_format", |b| {
        b.iter(|| logger.debugf(black_box("value %v"), &[black_box(42).into()]));
    });

    group.bench_function("enabled_check", |b| {
        b.iter(|| black_box(logger.enabled(black_box(Level::INFO))));
    });

    group.finish();
}

// ============================================================================
// Building Block Benchmarks
// ============================================================================

fn bench_building_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("building_blocks");
    group.throughput(Throughput::Elements(1));

    let pool = Arc::new(BufferPool::new());
    group.bench_function("pool_acquire_release", |b| {
        b.iter(|| {
            let mut buf = pool.acquire();
            buf.push_str(black_box("line"));
        });
    });

    group.bench_function("sprintf", |b| {
        b.iter(|| {
            black_box(sprintf(
                black_box("%-8s|%5d|%x|%q"),
                &["name".into(), 42.into(), 255.into(), "quoted value".into()],
            ))
        });
    });

    group.bench_function("quote_if_needed", |b| {
        b.iter(|| black_box(condensed_log::core::quote_if_needed(black_box("needs quoting"))));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_render,
    bench_logger,
    bench_level_filtering,
    bench_building_blocks
);

criterion_main!(benches);
