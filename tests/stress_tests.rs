//! Stress tests for concurrent use of handlers and the buffer pool
//!
//! These tests verify:
//! - Lines from many threads are never interleaved or lost
//! - Pooled buffers are never handed to two holders at once
//! - Level changes are visible across derived loggers under load
//! - Metrics stay consistent under concurrent writes

use condensed_log::prelude::*;
use condensed_log::writers::MemoryWriter;
use condensed_log::BufferPool;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn silent_time(builder: HandlerBuilder) -> HandlerBuilder {
    builder.time_format(TimestampFormat::Omit).level(Level::TRACE)
}

/// Every record from every thread arrives as exactly one intact line
#[test]
fn test_concurrent_logging_keeps_lines_whole() {
    let sink = Arc::new(MemoryWriter::new());
    let handler = silent_time(TextHandler::builder())
        .level_output(sink.clone())
        .build()
        .expect("Failed to build handler");
    let logger = Logger::new(handler);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with_group(format!("worker{}", t));
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    logger.info_attrs("tick", [Attr::new("i", i), Attr::new("t", t)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), lines.len(), "duplicate or merged lines");

    for t in 0..THREADS {
        let prefix = format!("info  worker{}: tick : ", t);
        let count = lines.iter().filter(|l| l.starts_with(&prefix)).count();
        assert_eq!(count, PER_THREAD, "worker {} lost lines", t);
    }
    assert_eq!(
        logger.handler().metrics().records_written(),
        (THREADS * PER_THREAD) as u64
    );
}

/// Lines written through a shared file sink are not torn
#[test]
fn test_concurrent_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");

    let handler = silent_time(TextHandler::builder())
        .level_output(FileWriter::new(&log_file).expect("Failed to create file writer"))
        .build()
        .expect("Failed to build handler");
    let logger = Logger::new(handler);

    thread::scope(|s| {
        for t in 0..THREADS {
            let logger = &logger;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    logger.warnf("thread %d message %d", &[t.into(), i.into()]);
                }
            });
        }
    });
    logger.flush().expect("Failed to flush");

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in lines {
        assert!(
            line.starts_with("warn  thread ") && line.contains(" message "),
            "torn line: {:?}",
            line
        );
    }
}

/// A buffer is never held by two threads at the same time
#[test]
fn test_pool_never_double_hands_out() {
    let pool = Arc::new(BufferPool::with_max_idle(4));
    let in_use = Arc::new(parking_lot::Mutex::new(HashSet::new()));
    let collisions = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = Arc::clone(&pool);
            let in_use = Arc::clone(&in_use);
            let collisions = Arc::clone(&collisions);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let mut buf = pool.acquire();
                    if !buf.is_empty() {
                        collisions.fetch_add(1, Ordering::Relaxed);
                    }
                    buf.push_str(&format!("{}-{}", t, i));
                    let ptr = buf.as_str().as_ptr() as usize;

                    if !in_use.lock().insert(ptr) {
                        collisions.fetch_add(1, Ordering::Relaxed);
                    }
                    thread::yield_now();
                    assert_eq!(buf.as_str(), format!("{}-{}", t, i));
                    in_use.lock().remove(&ptr);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(collisions.load(Ordering::Relaxed), 0);
    assert!(pool.idle() <= 4);

    let stats = pool.stats();
    assert_eq!(
        stats.created() + stats.reused(),
        (THREADS * PER_THREAD) as u64
    );
    assert_eq!(
        stats.returned() + stats.discarded(),
        (THREADS * PER_THREAD) as u64
    );
}

/// Raising the shared level from one thread silences the whole tree
#[test]
fn test_concurrent_level_changes() {
    let sink = Arc::new(MemoryWriter::new());
    let handler = silent_time(TextHandler::builder())
        .level_output(sink.clone())
        .build()
        .expect("Failed to build handler");
    let root = Logger::new(handler);
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = root.with([Attr::new("t", t)]);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.debugf("step %d", &[i.into()]);
                }
                barrier.wait();
                // Level is ERROR from here on.
                barrier.wait();
                for i in 0..PER_THREAD {
                    logger.debugf("after %d", &[i.into()]);
                }
            })
        })
        .collect();

    barrier.wait();
    root.set_level(Level::ERROR);
    barrier.wait();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    assert!(lines.iter().all(|l| l.starts_with("debug step ")));
    assert!(!root.enabled(Level::WARN));
}

/// Failures from a flaky sink are all counted
#[test]
fn test_concurrent_failures_are_counted() {
    struct Flaky {
        calls: AtomicUsize,
    }
    impl LevelWriter for Flaky {
        fn write(&self, _level: Level, line: &[u8]) -> std::io::Result<usize> {
            if self.calls.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
                Ok(line.len())
            } else {
                Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "flaky"))
            }
        }
    }

    let handler = silent_time(TextHandler::builder())
        .level_output(Flaky {
            calls: AtomicUsize::new(0),
        })
        .build()
        .expect("Failed to build handler");
    let logger = Logger::new(handler);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    logger.error("maybe");
                }
            });
        }
    });

    let metrics = logger.handler().metrics();
    let total = (THREADS * PER_THREAD) as u64;
    assert_eq!(metrics.records_written() + metrics.write_failures(), total);
    assert_eq!(metrics.write_failures(), total / 2);
    assert!((metrics.failure_rate() - 50.0).abs() < f64::EPSILON);
}
