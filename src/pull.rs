//! Demand-driven byte delivery.
//!
//! [`ChunkPuller`] translates a downstream consumer's "give me more bytes"
//! requests into engine resumptions. Each [`on_demand`](ChunkPuller::on_demand)
//! call resumes the encoder until the sink buffers at least the requested
//! amount or the walk finishes, then drains and hands back the ready
//! chunks in serialization order. Chunk boundaries carry no meaning.
//!
//! Demands may arrive from different threads over the puller's lifetime,
//! but never concurrently: an overlapping demand is a protocol violation
//! and is reported as an error rather than blocked or silently serialized,
//! because interleaved mutation of the frame stack and sink cursors would
//! corrupt the encode. Completion is signaled exactly once, after the
//! engine is done and every buffered byte has been handed out.
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::{value, ChunkPuller, Encoder, WireFormat};
//!
//! let tree = value!({"a": 1, "b": [true, null]});
//! let encoder = Encoder::new(&tree, WireFormat::Text, 8).unwrap();
//! let puller = ChunkPuller::new(encoder);
//!
//! let mut out = Vec::new();
//! loop {
//!     let pulled = puller.on_demand(3).unwrap();
//!     for chunk in &pulled.chunks {
//!         out.extend_from_slice(chunk);
//!     }
//!     if pulled.done {
//!         break;
//!     }
//! }
//! assert_eq!(out, br#"{"a":1,"b":[true,null]}"#);
//! ```

use crate::engine::{Encoder, EngineState};
use crate::{Error, Result};
use bytes::Bytes;
use std::sync::{Mutex, TryLockError};

/// Chunks delivered by one demand, plus the one-shot completion flag.
#[derive(Debug)]
pub struct Pulled {
    /// Ready chunks in strict serialization order; may be empty.
    pub chunks: Vec<Bytes>,
    /// `true` exactly once: on the demand that hands out the final byte.
    pub done: bool,
}

impl Pulled {
    /// Total bytes across the delivered chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    /// Returns `true` if no bytes were delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(Bytes::is_empty)
    }
}

/// The pull adapter over one [`Encoder`].
///
/// Shareable across threads (`&self` methods) under the single-active-
/// caller discipline: concurrent demands surface as
/// [`Error::ProtocolViolation`].
#[derive(Debug)]
pub struct ChunkPuller<'a> {
    inner: Mutex<PullState<'a>>,
}

#[derive(Debug)]
struct PullState<'a> {
    encoder: Encoder<'a>,
    completed: bool,
}

impl<'a> ChunkPuller<'a> {
    /// Wraps an encoder for demand-driven consumption.
    #[must_use]
    pub fn new(encoder: Encoder<'a>) -> Self {
        ChunkPuller {
            inner: Mutex::new(PullState {
                encoder,
                completed: false,
            }),
        }
    }

    /// Requests up to `n` bytes.
    ///
    /// Resumes the engine as needed until the sink holds at least `n`
    /// bytes or the walk finishes, then drains up to `n` bytes. A request
    /// of zero bytes resumes nothing and delivers nothing.
    ///
    /// # Errors
    ///
    /// [`Error::ProtocolViolation`] for an overlapping demand or a demand
    /// after completion, failure, or cancellation. Encoding failures
    /// propagate as their own error kinds and leave the engine failed.
    pub fn on_demand(&self, n: usize) -> Result<Pulled> {
        let mut state = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                return Err(Error::protocol("overlapping demand on one encoder instance"))
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        if state.completed {
            return Err(Error::protocol("demand after completion"));
        }
        match state.encoder.state() {
            EngineState::Failed => return Err(Error::protocol("demand after failure")),
            EngineState::Cancelled => {
                return Err(Error::protocol("demand after cancellation"))
            }
            EngineState::Running | EngineState::Suspended | EngineState::Done => {}
        }
        while state.encoder.buffered() < n && state.encoder.state() != EngineState::Done {
            let shortfall = n - state.encoder.buffered();
            state.encoder.resume(shortfall)?;
        }
        let mut chunks = Vec::new();
        let mut remaining = n;
        while remaining > 0 {
            let chunk = state.encoder.drain(remaining);
            if chunk.is_empty() {
                break;
            }
            remaining -= chunk.len();
            chunks.push(chunk);
        }
        let done =
            state.encoder.state() == EngineState::Done && state.encoder.buffered() == 0;
        if done {
            state.completed = true;
        }
        Ok(Pulled { chunks, done })
    }

    /// Aborts the encode: the engine transitions to its cancelled state and
    /// buffered bytes are discarded. Idempotent; cancelling a finished or
    /// already cancelled puller is a no-op.
    ///
    /// Unlike demands, cancellation waits for an in-flight demand on
    /// another thread to finish rather than reporting a violation.
    pub fn cancel(&self) {
        let mut state = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.encoder.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Encoder, Value, WireFormat};

    fn pull_all(puller: &ChunkPuller<'_>, n: usize) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let pulled = puller.on_demand(n).unwrap();
            for chunk in &pulled.chunks {
                out.extend_from_slice(chunk);
            }
            if pulled.done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_pull_in_small_demands() {
        let tree = value!({"a": 1, "b": [true, null, "x"]});
        let encoder = Encoder::new(&tree, WireFormat::Text, 4).unwrap();
        let puller = ChunkPuller::new(encoder);
        assert_eq!(pull_all(&puller, 2), br#"{"a":1,"b":[true,null,"x"]}"#);
    }

    #[test]
    fn test_completion_signaled_once() {
        let tree = value!({});
        let encoder = Encoder::new(&tree, WireFormat::Text, 64).unwrap();
        let puller = ChunkPuller::new(encoder);

        let pulled = puller.on_demand(64).unwrap();
        assert!(pulled.done);
        assert_eq!(pulled.len(), 2);

        let err = puller.on_demand(1).unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_cancel_idempotent_and_terminal() {
        let tree = value!({"a": [1, 2, 3, 4, 5]});
        let encoder = Encoder::new(&tree, WireFormat::Text, 2).unwrap();
        let puller = ChunkPuller::new(encoder);

        let _ = puller.on_demand(3).unwrap();
        puller.cancel();
        puller.cancel();

        let err = puller.on_demand(1).unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_zero_demand_is_observation_only() {
        let tree = value!({"a": 1});
        let encoder = Encoder::new(&tree, WireFormat::Text, 64).unwrap();
        let puller = ChunkPuller::new(encoder);

        let pulled = puller.on_demand(0).unwrap();
        assert!(pulled.is_empty());
        assert!(!pulled.done);

        // The full document is still delivered afterwards.
        assert_eq!(pull_all(&puller, 64), br#"{"a":1}"#);
    }

    #[test]
    fn test_failure_surfaces_once_then_violation() {
        let tree = Value::Array(vec![Value::Bytes(vec![1])]);
        let encoder = Encoder::new(&tree, WireFormat::Text, 64).unwrap();
        let puller = ChunkPuller::new(encoder);

        let err = puller.on_demand(8).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));

        let err = puller.on_demand(8).unwrap_err();
        assert!(err.is_protocol_violation());
    }
}
