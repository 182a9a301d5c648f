//! The resumable traversal engine.
//!
//! Ordinary recursive traversal cannot be paused mid-call when the
//! consumer is not ready for more bytes, so [`Encoder`] replaces the native
//! call stack with an explicit frame stack it owns and mutates directly.
//! Each [`Frame`] records an open container, an iteration cursor, and (for
//! maps) a phase tag; stack depth always equals the current nesting depth.
//!
//! Each [`Encoder::resume`] call advances the walk token by token and
//! checks the byte budget and sink headroom only *between* tokens. A token
//! is emitted in full or not at all, so a suspended engine always holds a
//! structurally valid prefix of the target serialization, and a later
//! `resume` continues from the exact pending frame and phase: no token is
//! re-emitted, none is skipped.
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::{value, Encoder, Status, WireFormat};
//!
//! let tree = value!({"a": 1});
//! let mut encoder = Encoder::new(&tree, WireFormat::Text, 4096).unwrap();
//!
//! let progress = encoder.resume(usize::MAX).unwrap();
//! assert_eq!(progress.status, Status::Done);
//!
//! let chunk = encoder.drain(usize::MAX);
//! assert_eq!(&chunk[..], br#"{"a":1}"#);
//! ```

use crate::format::{FormatWriter, WireFormat};
use crate::sink::ByteSink;
use crate::symbol::SymbolTable;
use crate::{Error, Map, Result, Value};
use bytes::Bytes;
use std::sync::Arc;

/// Outcome of a successful [`Encoder::resume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The walk is suspended with more of the tree still to emit.
    MorePending,
    /// The whole tree has been emitted; buffered bytes may remain to drain.
    Done,
}

/// Lifecycle state of an encoder instance.
///
/// `Done`, `Failed` and `Cancelled` are terminal and irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Suspended,
    Done,
    Failed,
    Cancelled,
}

impl EngineState {
    /// Returns `true` for the irreversible states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineState::Done | EngineState::Failed | EngineState::Cancelled
        )
    }
}

/// Bytes produced and resulting status of one `resume` call.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub bytes_produced: usize,
    pub status: Status,
}

/// Traversal phase of an open map frame.
///
/// Lists only alternate between emitting the next element and closing, so
/// they track no phase beyond their cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapPhase {
    Key,
    Value,
    Close,
}

/// One stack entry: an open container and where the walk stands inside it.
///
/// Frames borrow the container they traverse and are owned exclusively by
/// the engine's stack.
#[derive(Debug)]
enum Frame<'a> {
    Map {
        entries: &'a Map,
        cursor: usize,
        phase: MapPhase,
    },
    List {
        items: &'a [Value],
        cursor: usize,
    },
}

/// What the inspected top frame asks the engine to do next.
enum Action<'a> {
    /// Phase transition only; no token this step.
    None,
    Key(&'a str),
    Enter(&'a Value),
    CloseMap,
    CloseList,
}

/// The explicit-stack, suspendable depth-first encoder over a value tree.
///
/// Created per encode session, bound to a root map or list. Drive it
/// directly with [`resume`](Encoder::resume) and
/// [`drain`](Encoder::drain), or wrap it in a
/// [`ChunkPuller`](crate::ChunkPuller) for the demand-driven interface.
#[derive(Debug)]
pub struct Encoder<'a> {
    root: &'a Value,
    started: bool,
    stack: Vec<Frame<'a>>,
    writer: FormatWriter,
    sink: ByteSink,
    state: EngineState,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder over `root` with the given wire format and
    /// primary buffer capacity, without a symbol table (every key falls
    /// back to its literal form in the binary variant).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the root is a bare scalar;
    /// only maps and lists are valid roots.
    pub fn new(root: &'a Value, format: WireFormat, capacity: usize) -> Result<Self> {
        Self::build(root, format, capacity, None)
    }

    /// Creates an encoder that resolves map keys through `symbols`.
    ///
    /// The table is read-only and may be shared across concurrent encode
    /// sessions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the root is a bare scalar.
    pub fn with_symbols(
        root: &'a Value,
        format: WireFormat,
        capacity: usize,
        symbols: Arc<SymbolTable>,
    ) -> Result<Self> {
        Self::build(root, format, capacity, Some(symbols))
    }

    fn build(
        root: &'a Value,
        format: WireFormat,
        capacity: usize,
        symbols: Option<Arc<SymbolTable>>,
    ) -> Result<Self> {
        if !root.is_container() {
            return Err(Error::malformed(format!(
                "root must be a map or list, got {}",
                root.kind()
            )));
        }
        Ok(Encoder {
            root,
            started: false,
            stack: Vec::new(),
            writer: FormatWriter::new(format, symbols),
            sink: ByteSink::new(capacity),
            state: EngineState::Running,
        })
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Returns the number of bytes buffered in the sink and not yet
    /// drained.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.sink.buffered()
    }

    /// Removes and returns up to `max` buffered bytes; see
    /// [`ByteSink::drain`](crate::ByteSink::drain).
    pub fn drain(&mut self, max: usize) -> Bytes {
        self.sink.drain(max)
    }

    /// Advances the walk until at least `byte_budget` bytes have been
    /// produced, the sink's primary headroom is exhausted, or the tree is
    /// fully emitted, whichever comes first.
    ///
    /// Suspension happens only at token boundaries; a single token may
    /// overshoot the budget or spill into the overflow queue because
    /// tokens are atomic.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] if the active format cannot encode a
    /// scalar in the tree; the engine then transitions to `Failed` and
    /// releases its resources. [`Error::ProtocolViolation`] if called
    /// after `Done`, `Failed` or `Cancelled`.
    pub fn resume(&mut self, byte_budget: usize) -> Result<Progress> {
        match self.state {
            EngineState::Done => return Err(Error::protocol("resume after completion")),
            EngineState::Failed => return Err(Error::protocol("resume after failure")),
            EngineState::Cancelled => {
                return Err(Error::protocol("resume after cancellation"))
            }
            EngineState::Running | EngineState::Suspended => {}
        }
        self.state = EngineState::Running;
        let start = self.sink.total_written();
        loop {
            if let Err(e) = self.step() {
                self.state = EngineState::Failed;
                self.stack.clear();
                self.sink.clear();
                return Err(e);
            }
            let bytes_produced = (self.sink.total_written() - start) as usize;
            if self.started && self.stack.is_empty() {
                self.state = EngineState::Done;
                return Ok(Progress {
                    bytes_produced,
                    status: Status::Done,
                });
            }
            if bytes_produced >= byte_budget || self.sink.headroom() == 0 {
                self.state = EngineState::Suspended;
                return Ok(Progress {
                    bytes_produced,
                    status: Status::MorePending,
                });
            }
        }
    }

    /// Aborts the walk, discards buffered bytes and releases the frame
    /// stack. Idempotent: cancelling an already terminal encoder is a
    /// no-op.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = EngineState::Cancelled;
        self.stack.clear();
        self.sink.clear();
    }

    /// Performs one traversal step, emitting at most one token.
    fn step(&mut self) -> Result<()> {
        if !self.started {
            self.started = true;
            return self.enter(self.root);
        }
        // Inspect the top frame and advance its cursor/phase first; the
        // extracted references outlive the stack borrow because frames
        // borrow the tree, not the engine.
        let action: Action<'a> = match self.stack.last_mut() {
            None => return Ok(()),
            Some(Frame::Map {
                entries,
                cursor,
                phase,
            }) => {
                // Copy the container reference out so the extracted key or
                // value borrows the tree, not the stack entry.
                let entries: &'a Map = *entries;
                match *phase {
                    MapPhase::Key => match entries.get_index(*cursor) {
                        Some((key, _)) => {
                            *phase = MapPhase::Value;
                            Action::Key(key.as_str())
                        }
                        None => {
                            *phase = MapPhase::Close;
                            Action::None
                        }
                    },
                    MapPhase::Value => {
                        let index = *cursor;
                        *cursor += 1;
                        *phase = MapPhase::Key;
                        match entries.get_index(index) {
                            Some((_, value)) => Action::Enter(value),
                            // Unreachable under the phase discipline.
                            None => Action::None,
                        }
                    }
                    MapPhase::Close => Action::CloseMap,
                }
            }
            Some(Frame::List { items, cursor }) => {
                let items: &'a [Value] = *items;
                if *cursor < items.len() {
                    let index = *cursor;
                    *cursor += 1;
                    Action::Enter(&items[index])
                } else {
                    Action::CloseList
                }
            }
        };
        match action {
            Action::None => Ok(()),
            Action::Key(name) => self.writer.key(&mut self.sink, name),
            Action::Enter(value) => self.enter(value),
            Action::CloseMap => {
                self.writer.map_end(&mut self.sink)?;
                self.stack.pop();
                Ok(())
            }
            Action::CloseList => {
                self.writer.list_end(&mut self.sink)?;
                self.stack.pop();
                Ok(())
            }
        }
    }

    /// Emits the token for one value: a scalar in full, or a container
    /// start plus a new frame.
    fn enter(&mut self, value: &'a Value) -> Result<()> {
        match value {
            Value::Object(entries) => {
                self.writer.map_start(&mut self.sink)?;
                self.stack.push(Frame::Map {
                    entries,
                    cursor: 0,
                    phase: MapPhase::Key,
                });
                Ok(())
            }
            Value::Array(items) => {
                self.writer.list_start(&mut self.sink)?;
                self.stack.push(Frame::List { items, cursor: 0 });
                Ok(())
            }
            Value::Null => self.writer.null(&mut self.sink),
            Value::Bool(v) => self.writer.bool(&mut self.sink, *v),
            Value::Int32(v) => self.writer.int32(&mut self.sink, *v),
            Value::Int64(v) => self.writer.int64(&mut self.sink, *v),
            Value::Float32(v) => self.writer.float32(&mut self.sink, *v),
            Value::Float64(v) => self.writer.float64(&mut self.sink, *v),
            Value::String(v) => self.writer.string(&mut self.sink, v),
            Value::Bytes(v) => self.writer.bytes(&mut self.sink, v),
        }
    }
}
