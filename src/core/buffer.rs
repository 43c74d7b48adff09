//! Reusable text buffers for rendering log lines
//!
//! Rendering a record borrows a [`Buffer`] from a [`BufferPool`] for the duration
//! of one call. The pool keeps its idle buffers in a lock-free crossbeam queue, so
//! concurrent callers never block each other on acquire or release.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// Starting capacity of a freshly allocated buffer. Log lines rarely exceed 300 bytes.
pub const INITIAL_CAPACITY: usize = 512;

/// Buffers that grew beyond this capacity are dropped instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 1024;

/// Default number of idle buffers the pool retains.
pub const DEFAULT_MAX_IDLE: usize = 64;

/// A growable text buffer. Everything written to it is UTF-8.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buffer {
    text: String,
}

impl Buffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Shortens the buffer to `len` bytes; `len` must sit on a char boundary.
    pub fn truncate(&mut self, len: usize) {
        self.text.truncate(len);
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Write for Buffer {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.text.push(c);
        Ok(())
    }
}

/// Counters describing how well the pool amortizes allocations.
#[derive(Debug, Default)]
pub struct PoolStats {
    created: AtomicU64,
    reused: AtomicU64,
    returned: AtomicU64,
    discarded: AtomicU64,
}

impl PoolStats {
    /// Buffers allocated because no idle buffer was available
    #[inline]
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    /// Acquisitions served by an idle buffer
    #[inline]
    pub fn reused(&self) -> u64 {
        self.reused.load(Ordering::Relaxed)
    }

    /// Buffers handed back into the idle queue
    #[inline]
    pub fn returned(&self) -> u64 {
        self.returned.load(Ordering::Relaxed)
    }

    /// Buffers dropped on release, either oversized or because the idle queue was full
    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }
}

/// A pool of reusable [`Buffer`]s, safe to share between threads.
///
/// # Example
///
/// ```
/// use condensed_log::core::BufferPool;
///
/// let pool = BufferPool::new();
/// {
///     let mut buf = pool.acquire();
///     buf.push_str("hello");
/// } // returned to the pool here
/// assert_eq!(pool.acquire().len(), 0);
/// assert_eq!(pool.stats().reused(), 1);
/// ```
#[derive(Debug)]
pub struct BufferPool {
    idle_tx: Sender<Buffer>,
    idle_rx: Receiver<Buffer>,
    stats: PoolStats,
}

impl BufferPool {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create a pool that keeps at most `max_idle` idle buffers.
    #[must_use]
    pub fn with_max_idle(max_idle: usize) -> Self {
        let (idle_tx, idle_rx) = bounded(max_idle.max(1));
        Self {
            idle_tx,
            idle_rx,
            stats: PoolStats::default(),
        }
    }

    /// Take an empty buffer out of the pool, allocating one if none is idle.
    ///
    /// The buffer goes back to the pool when the returned guard is dropped.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = match self.idle_rx.try_recv() {
            Ok(buf) => {
                self.stats.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            Err(_) => {
                self.stats.created.fetch_add(1, Ordering::Relaxed);
                Buffer::with_capacity(INITIAL_CAPACITY)
            }
        };
        PooledBuffer {
            pool: self,
            buf: Some(buf),
        }
    }

    /// Return a buffer to the pool. Buffers whose capacity exceeds
    /// [`MAX_POOLED_CAPACITY`] are dropped so one oversized record cannot pin
    /// memory for the lifetime of the pool.
    pub fn release(&self, mut buf: Buffer) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            self.stats.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        buf.clear();
        match self.idle_tx.try_send(buf) {
            Ok(()) => {
                self.stats.returned.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.stats.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.idle_rx.len()
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffer on loan from a [`BufferPool`]; released when dropped.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Option<Buffer>,
}

impl PooledBuffer<'_> {
    /// Keep the buffer instead of returning it to the pool.
    #[must_use]
    pub fn detach(mut self) -> Buffer {
        self.buf.take().unwrap_or_default()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        // Only `detach` and `drop` take the buffer, and both consume the guard.
        self.buf.as_ref().expect("pooled buffer present until drop")
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        self.buf.as_mut().expect("pooled buffer present until drop")
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
