//! Error types for streaming encoding.
//!
//! All fatal conditions funnel into one [`Error`] enum. A fatal error moves
//! the encoder into its `Failed` state and is surfaced to the consumer
//! exactly once as a terminal event; nothing in this crate retries
//! internally.
//!
//! ## Error Categories
//!
//! - **Malformed input**: the value tree contains something the active wire
//!   format cannot encode, or the root is a bare scalar
//! - **Sink I/O**: a downstream writer refused produced bytes
//! - **Protocol violations**: caller misuse of a single encoder instance
//!   (overlapping demands, demand after a terminal state)
//!
//! An unresolved symbol-table name is deliberately *not* an error; the
//! binary format falls back to the literal key string.
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::{encode_to_vec, Error, Value, WireFormat};
//!
//! // A bare scalar is not a valid root.
//! let result = encode_to_vec(&Value::Int32(7), WireFormat::Text);
//! assert!(matches!(result, Err(Error::MalformedInput(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all fatal conditions the encoder can surface.
///
/// Every variant is terminal for the encode session it occurs in.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The value tree cannot be encoded by the active wire format, or the
    /// root is neither a map nor a list.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A downstream writer could not accept produced bytes.
    #[error("sink I/O failure: {0}")]
    SinkIo(String),

    /// Caller misuse of a single encoder instance: an overlapping demand,
    /// or a demand after completion, failure, or cancellation.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A Rust type the serde bridge cannot represent as a value tree.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Generic message (serde custom errors).
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a malformed-input error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pullwire::Error;
    ///
    /// let err = Error::malformed("root must be a map or list");
    /// assert!(err.to_string().contains("malformed input"));
    /// ```
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// Creates a sink I/O error from a downstream write failure.
    pub fn sink_io(msg: impl Into<String>) -> Self {
        Error::SinkIo(msg.into())
    }

    /// Creates a protocol-violation error signalling caller misuse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pullwire::Error;
    ///
    /// let err = Error::protocol("demand after completion");
    /// assert!(err.to_string().contains("protocol violation"));
    /// ```
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::ProtocolViolation(msg.into())
    }

    /// Creates an unsupported-type error for the serde bridge.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Returns `true` if this error signals caller misuse rather than bad
    /// data or a failed sink.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Error::ProtocolViolation(_))
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
