//! # pullwire
//!
//! A pull-based streaming encoder for hierarchical values.
//!
//! ## What is pullwire?
//!
//! pullwire serializes an in-memory tree of nested maps, lists and scalars
//! into a byte stream that a downstream consumer pulls incrementally: the
//! producer serializes exactly enough of the tree to satisfy each request
//! and never blocks the calling thread. This decouples serialization speed
//! from I/O speed, so transports with their own flow control can drive the
//! encoder at whatever cadence they like.
//!
//! Ordinary recursive traversal cannot be paused mid-call between demand
//! events, so the engine reifies the traversal state as an explicit frame
//! stack it suspends and resumes at token boundaries. Produced bytes stage
//! in a fixed-capacity primary buffer with an unbounded overflow queue, so
//! production and consumption rates can differ safely.
//!
//! ## Key Features
//!
//! - **Pull-based**: bytes are produced only in response to explicit
//!   downstream demand
//! - **Resumable**: traversal suspends and resumes at token boundaries
//!   with no token re-emitted or skipped
//! - **Two wire formats**: a JSON-shaped text variant and a tagged-binary
//!   variant with varint lengths and symbol-table key compaction
//! - **Deterministic**: the same tree always yields the same bytes,
//!   whatever the buffer capacity or demand cadence
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pullwire = "0.1"
//! ```
//!
//! ### One-shot encoding
//!
//! ```rust
//! use pullwire::{encode_to_vec, value, WireFormat};
//!
//! let tree = value!({
//!     "name": "Alice",
//!     "tags": ["admin", "user"]
//! });
//!
//! let text = encode_to_vec(&tree, WireFormat::Text).unwrap();
//! assert_eq!(text, br#"{"name":"Alice","tags":["admin","user"]}"#);
//! ```
//!
//! ### Demand-driven streaming
//!
//! ```rust
//! use pullwire::{value, ChunkPuller, Encoder, WireFormat};
//!
//! let tree = value!({"a": 1, "b": [true, null, "x"]});
//! let encoder = Encoder::new(&tree, WireFormat::Text, 16).unwrap();
//! let puller = ChunkPuller::new(encoder);
//!
//! let mut out = Vec::new();
//! loop {
//!     // The transport asks for a few bytes at a time.
//!     let pulled = puller.on_demand(5).unwrap();
//!     for chunk in &pulled.chunks {
//!         out.extend_from_slice(chunk);
//!     }
//!     if pulled.done {
//!         break;
//!     }
//! }
//! assert_eq!(out, br#"{"a":1,"b":[true,null,"x"]}"#);
//! ```
//!
//! ### Binary format with a symbol table
//!
//! ```rust
//! use pullwire::{encode_to_vec_with, value, SymbolTable, WireFormat};
//! use std::sync::Arc;
//!
//! let symbols = Arc::new(SymbolTable::from_pairs([("a", 5)]));
//! let tree = value!({"a": 1});
//!
//! let bytes =
//!     encode_to_vec_with(&tree, WireFormat::Binary, 4096, Some(symbols)).unwrap();
//! // The key "a" went out as identifier 5, not as a literal string.
//! assert_eq!(bytes[1], pullwire::format::tag::KEY_ID);
//! assert_eq!(bytes[2], 5);
//! ```
//!
//! ## Guarantees
//!
//! - Map entries are emitted in insertion order; on the wire a map is an
//!   alternating key/value sequence between the shared container
//!   start/end markers
//! - Bytes are delivered downstream strictly in serialization order;
//!   chunk boundaries carry no meaning
//! - Completion is signaled exactly once, after the last byte is handed
//!   out; cancellation is immediate, terminal and idempotent
//! - A partially delivered document after a mid-stream failure is not
//!   guaranteed to be decodable; bytes already delivered stay delivered

pub mod engine;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod pull;
pub mod ser;
pub mod sink;
pub mod symbol;
pub mod value;

pub use engine::{Encoder, EngineState, Progress, Status};
pub use error::{Error, Result};
pub use format::WireFormat;
pub use map::Map;
pub use pull::{ChunkPuller, Pulled};
pub use ser::ValueSerializer;
pub use sink::ByteSink;
pub use symbol::SymbolTable;
pub use value::Value;

use serde::Serialize;
use std::io;
use std::sync::Arc;

/// Default primary buffer capacity for the convenience entry points.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Encodes a value tree to a `Vec<u8>` in one unconstrained run.
///
/// # Examples
///
/// ```rust
/// use pullwire::{encode_to_vec, value, WireFormat};
///
/// let tree = value!({"x": 1});
/// let bytes = encode_to_vec(&tree, WireFormat::Text).unwrap();
/// assert_eq!(bytes, br#"{"x":1}"#);
/// ```
///
/// # Errors
///
/// Returns an error if the root is a bare scalar or the tree contains a
/// scalar the format cannot encode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_vec(root: &Value, format: WireFormat) -> Result<Vec<u8>> {
    encode_to_vec_with(root, format, DEFAULT_BUFFER_CAPACITY, None)
}

/// Encodes a value tree to a `Vec<u8>` with an explicit buffer capacity
/// and optional symbol table.
///
/// The output is byte-for-byte identical for every capacity; the capacity
/// only changes how often the engine suspends internally.
///
/// # Errors
///
/// Returns an error if the root is a bare scalar or the tree contains a
/// scalar the format cannot encode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_vec_with(
    root: &Value,
    format: WireFormat,
    capacity: usize,
    symbols: Option<Arc<SymbolTable>>,
) -> Result<Vec<u8>> {
    let mut encoder = match symbols {
        Some(table) => Encoder::with_symbols(root, format, capacity, table)?,
        None => Encoder::new(root, format, capacity)?,
    };
    let mut out = Vec::new();
    loop {
        let progress = encoder.resume(usize::MAX)?;
        loop {
            let chunk = encoder.drain(usize::MAX);
            if chunk.is_empty() {
                break;
            }
            out.extend_from_slice(&chunk);
        }
        if progress.status == Status::Done {
            break;
        }
    }
    Ok(out)
}

/// Encodes a value tree into an [`io::Write`] target.
///
/// Write failures surface as [`Error::SinkIo`] and abort the encode.
///
/// # Examples
///
/// ```rust
/// use pullwire::{encode_to_writer, value, WireFormat};
///
/// let tree = value!({"x": 1});
/// let mut buffer = Vec::new();
/// encode_to_writer(&mut buffer, &tree, WireFormat::Text).unwrap();
/// assert_eq!(buffer, br#"{"x":1}"#);
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or the writer refuses bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_writer<W>(mut writer: W, root: &Value, format: WireFormat) -> Result<()>
where
    W: io::Write,
{
    let mut encoder = Encoder::new(root, format, DEFAULT_BUFFER_CAPACITY)?;
    loop {
        let progress = encoder.resume(usize::MAX)?;
        loop {
            let chunk = encoder.drain(usize::MAX);
            if chunk.is_empty() {
                break;
            }
            writer
                .write_all(&chunk)
                .map_err(|e| Error::sink_io(e.to_string()))?;
        }
        if progress.status == Status::Done {
            break;
        }
    }
    Ok(())
}

/// Converts any `T: Serialize` to a [`Value`] tree.
///
/// Useful as the front door when the data starts life as ordinary Rust
/// types rather than hand-built trees.
///
/// # Examples
///
/// ```rust
/// use pullwire::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error for types the value model cannot represent (enum
/// variants with payloads, out-of-range `u64`).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}
