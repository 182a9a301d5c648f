//! Bounded-then-overflow byte staging.
//!
//! [`ByteSink`] decouples the encoder's production rate from the consumer's
//! drain rate. Writes never block: bytes land in a fixed-capacity primary
//! region while there is headroom, and any excess is appended to an
//! unbounded FIFO queue of overflow chunks. While the queue holds anything,
//! every subsequent write joins it too; the primary is only reused once the
//! backlog has drained, so delivery order always matches write order. The
//! primary region bounds steady-state memory; the overflow absorbs bursts
//! when the engine runs ahead of a momentarily idle consumer. If the
//! consumer stalls forever the overflow grows without bound, which is the
//! accepted tradeoff for never blocking and never dropping data.
//!
//! Draining is strictly FIFO: the primary region first, then overflow
//! chunks in creation order. The concatenation of drained bytes is always
//! exactly the concatenation of written bytes.
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::ByteSink;
//!
//! let mut sink = ByteSink::new(4);
//! sink.write(b"hello world");
//! assert_eq!(sink.headroom(), 0);
//!
//! let mut out = Vec::new();
//! loop {
//!     let chunk = sink.drain(3);
//!     if chunk.is_empty() {
//!         break;
//!     }
//!     out.extend_from_slice(&chunk);
//! }
//! assert_eq!(out, b"hello world");
//! ```

use bytes::Bytes;
use std::collections::VecDeque;

/// A non-blocking byte buffer with a fixed primary region and an unbounded
/// overflow queue.
///
/// The primary region carries a write cursor and a read cursor; both reset
/// to zero whenever the region empties. Overflow chunks are immutable
/// [`Bytes`] and are promoted in creation order once the primary region is
/// drained.
#[derive(Debug)]
pub struct ByteSink {
    primary: Box<[u8]>,
    write_pos: usize,
    read_pos: usize,
    overflow: VecDeque<Bytes>,
    overflow_len: usize,
    total_written: u64,
}

impl ByteSink {
    /// Creates a sink with the given primary capacity in bytes.
    ///
    /// A capacity of zero is rounded up to one byte so the headroom check
    /// can ever pass.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        ByteSink {
            primary: vec![0; capacity.max(1)].into_boxed_slice(),
            write_pos: 0,
            read_pos: 0,
            overflow: VecDeque::new(),
            overflow_len: 0,
            total_written: 0,
        }
    }

    /// Returns the remaining primary capacity in bytes.
    ///
    /// The traversal engine consults this between tokens; zero headroom is
    /// its suspension signal. Reports zero while overflow chunks are
    /// queued, even when the primary region itself has emptied: new bytes
    /// must join the backlog rather than jump ahead of it through the
    /// primary, and the engine must suspend rather than keep producing
    /// into a pending backlog.
    #[inline]
    #[must_use]
    pub fn headroom(&self) -> usize {
        if !self.overflow.is_empty() {
            return 0;
        }
        self.primary.len() - self.write_pos
    }

    /// Returns the number of bytes currently buffered, primary plus
    /// overflow.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> usize {
        (self.write_pos - self.read_pos) + self.overflow_len
    }

    /// Returns `true` if no bytes are buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffered() == 0
    }

    /// Returns the total number of bytes ever written to this sink.
    #[inline]
    #[must_use]
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Writes bytes without ever blocking.
    ///
    /// Whatever fits in the primary headroom is copied there; the excess
    /// becomes a new overflow chunk. While a backlog is pending the
    /// headroom is zero, so everything goes to the overflow queue and
    /// drained bytes stay in write order.
    pub fn write(&mut self, bytes: &[u8]) {
        let room = self.headroom().min(bytes.len());
        if room > 0 {
            self.primary[self.write_pos..self.write_pos + room].copy_from_slice(&bytes[..room]);
            self.write_pos += room;
        }
        if room < bytes.len() {
            let rest = &bytes[room..];
            self.overflow.push_back(Bytes::copy_from_slice(rest));
            self.overflow_len += rest.len();
        }
        self.total_written += bytes.len() as u64;
    }

    /// Writes a single byte without ever blocking.
    pub fn write_byte(&mut self, byte: u8) {
        if self.headroom() > 0 {
            self.primary[self.write_pos] = byte;
            self.write_pos += 1;
            self.total_written += 1;
        } else {
            self.write(&[byte]);
        }
    }

    /// Removes and returns up to `max` buffered bytes as one chunk.
    ///
    /// The primary region drains first; once it empties, overflow chunks
    /// are promoted in creation order, splitting a chunk when it is larger
    /// than the remaining request. Returns an empty chunk when nothing is
    /// buffered. Chunk boundaries carry no meaning; callers loop until
    /// satisfied or empty.
    pub fn drain(&mut self, max: usize) -> Bytes {
        if max == 0 {
            return Bytes::new();
        }
        if self.read_pos < self.write_pos {
            let n = max.min(self.write_pos - self.read_pos);
            let chunk = Bytes::copy_from_slice(&self.primary[self.read_pos..self.read_pos + n]);
            self.read_pos += n;
            if self.read_pos == self.write_pos {
                // Empty region: reset cursors so the primary can be
                // reused once the backlog clears.
                self.read_pos = 0;
                self.write_pos = 0;
            }
            return chunk;
        }
        match self.overflow.pop_front() {
            Some(mut chunk) => {
                if chunk.len() <= max {
                    self.overflow_len -= chunk.len();
                    chunk
                } else {
                    let head = chunk.split_to(max);
                    self.overflow.push_front(chunk);
                    self.overflow_len -= max;
                    head
                }
            }
            None => Bytes::new(),
        }
    }

    /// Discards all buffered bytes, primary and overflow.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.overflow.clear();
        self.overflow_len = 0;
    }
}
