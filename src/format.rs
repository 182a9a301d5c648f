//! Wire-format variants.
//!
//! The encoder emits a token stream (container start/end, key, scalar) and
//! a format variant decides how each token looks on the wire. Exactly two
//! variants exist and they are selected once at construction, so dispatch
//! is a closed enum rather than a trait object.
//!
//! ## Text variant
//!
//! JSON-shaped output: `{`/`}` and `[`/`]` delimiters, quoted and escaped
//! keys and strings, `true`/`false`/`null` literals, decimal numbers. Two
//! scalar kinds have no self-describing textual form and are rejected with
//! a malformed-input error: raw bytes and non-finite floats.
//!
//! ## Tagged-binary variant
//!
//! Every token starts with a tag byte from [`tag`]. Lengths and
//! identifiers are varints: 7 payload bits per byte, least-significant
//! group first, continuation bit set on every byte except the last. Signed
//! integers are zigzag-mapped before varint encoding; floats are their
//! IEEE bits, little-endian. A key whose name resolves in the symbol table
//! is a varint identifier; an unresolved key is a length-prefixed literal
//! string. Maps and lists share one start/end tag pair: a map is flattened
//! to alternating key and value tokens, so a decoder tells the two apart
//! only by context.
//!
//! | tag | token | payload |
//! |-----|-------|---------|
//! | `0x01` | container start | none |
//! | `0x02` | container end | none |
//! | `0x03` | key, symbol id | varint id |
//! | `0x04` | key, literal | varint length + UTF-8 bytes |
//! | `0x05` | null | none |
//! | `0x06` | bool | one byte, 0 or 1 |
//! | `0x07` | int32 | zigzag varint |
//! | `0x08` | int64 | zigzag varint |
//! | `0x09` | float32 | 4 bytes, little-endian |
//! | `0x0A` | float64 | 8 bytes, little-endian |
//! | `0x0B` | string | varint length + UTF-8 bytes |
//! | `0x0C` | bytes | varint length + raw bytes |
//!
//! Both variants are deterministic: the same tree and the same symbol
//! resolutions always yield the same byte sequence, whatever the sink
//! capacity or drain cadence. All writer state lives in the variant itself
//! and advances only at token boundaries, which is what makes suspension
//! between tokens safe.

use crate::sink::ByteSink;
use crate::symbol::SymbolTable;
use crate::{Error, Result};
use std::sync::Arc;

/// Tag bytes for the tagged-binary variant.
pub mod tag {
    /// Container start; shared by maps and lists.
    pub const START: u8 = 0x01;
    /// Container end; shared by maps and lists.
    pub const END: u8 = 0x02;
    /// Map key resolved through the symbol table; payload is a varint id.
    pub const KEY_ID: u8 = 0x03;
    /// Map key as a literal; payload is a varint length plus UTF-8 bytes.
    pub const KEY_LITERAL: u8 = 0x04;
    /// Null scalar; no payload.
    pub const NULL: u8 = 0x05;
    /// Boolean scalar; payload is one byte, 0 or 1.
    pub const BOOL: u8 = 0x06;
    /// Signed 32-bit integer; payload is a zigzag varint.
    pub const INT32: u8 = 0x07;
    /// Signed 64-bit integer; payload is a zigzag varint.
    pub const INT64: u8 = 0x08;
    /// 32-bit float; payload is 4 little-endian IEEE bytes.
    pub const FLOAT32: u8 = 0x09;
    /// 64-bit float; payload is 8 little-endian IEEE bytes.
    pub const FLOAT64: u8 = 0x0A;
    /// UTF-8 string; payload is a varint length plus bytes.
    pub const STRING: u8 = 0x0B;
    /// Raw byte sequence; payload is a varint length plus bytes.
    pub const BYTES: u8 = 0x0C;
}

/// Which wire format an encoder produces.
///
/// Chosen once at construction; there is no per-token dispatch beyond this
/// closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// JSON-shaped textual output.
    Text,
    /// Tag-prefixed binary output with symbol-table key compaction.
    Binary,
}

/// Writes an unsigned varint: 7 bits per byte, least-significant group
/// first, continuation bit (0x80) on every byte except the last.
pub(crate) fn write_varint(sink: &mut ByteSink, mut v: u64) {
    while v >= 0x80 {
        sink.write_byte((v as u8 & 0x7F) | 0x80);
        v >>= 7;
    }
    sink.write_byte(v as u8);
}

/// Zigzag-maps a signed 32-bit integer so small magnitudes stay small.
#[inline]
pub(crate) fn zigzag32(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

/// Zigzag-maps a signed 64-bit integer so small magnitudes stay small.
#[inline]
pub(crate) fn zigzag64(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// The closed set of format variants behind one token contract.
///
/// Every method emits exactly one complete token into the sink. Variant
/// state (the text writer's delimiter stack) mutates only here, so a token
/// is produced in full or not at all.
#[derive(Debug)]
pub(crate) enum FormatWriter {
    Text(TextWriter),
    Binary(BinaryWriter),
}

impl FormatWriter {
    pub(crate) fn new(format: WireFormat, symbols: Option<Arc<SymbolTable>>) -> Self {
        match format {
            WireFormat::Text => FormatWriter::Text(TextWriter::new()),
            WireFormat::Binary => FormatWriter::Binary(BinaryWriter::new(
                symbols.unwrap_or_else(|| Arc::new(SymbolTable::empty())),
            )),
        }
    }

    pub(crate) fn map_start(&mut self, sink: &mut ByteSink) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.container_start(sink, b'{'),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::START);
                Ok(())
            }
        }
    }

    pub(crate) fn map_end(&mut self, sink: &mut ByteSink) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.container_end(sink, b'}'),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::END);
                Ok(())
            }
        }
    }

    pub(crate) fn list_start(&mut self, sink: &mut ByteSink) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.container_start(sink, b'['),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::START);
                Ok(())
            }
        }
    }

    pub(crate) fn list_end(&mut self, sink: &mut ByteSink) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.container_end(sink, b']'),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::END);
                Ok(())
            }
        }
    }

    pub(crate) fn key(&mut self, sink: &mut ByteSink, name: &str) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.key(sink, name),
            FormatWriter::Binary(w) => w.key(sink, name),
        }
    }

    pub(crate) fn null(&mut self, sink: &mut ByteSink) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.literal(sink, b"null"),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::NULL);
                Ok(())
            }
        }
    }

    pub(crate) fn bool(&mut self, sink: &mut ByteSink, v: bool) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.literal(sink, if v { b"true" } else { b"false" }),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::BOOL);
                sink.write_byte(u8::from(v));
                Ok(())
            }
        }
    }

    pub(crate) fn int32(&mut self, sink: &mut ByteSink, v: i32) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.literal(sink, itoa_buf(i64::from(v)).as_bytes()),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::INT32);
                write_varint(sink, u64::from(zigzag32(v)));
                Ok(())
            }
        }
    }

    pub(crate) fn int64(&mut self, sink: &mut ByteSink, v: i64) -> Result<()> {
        match self {
            FormatWriter::Text(w) => w.literal(sink, itoa_buf(v).as_bytes()),
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::INT64);
                write_varint(sink, zigzag64(v));
                Ok(())
            }
        }
    }

    pub(crate) fn float32(&mut self, sink: &mut ByteSink, v: f32) -> Result<()> {
        match self {
            FormatWriter::Text(w) => {
                if !v.is_finite() {
                    return Err(Error::malformed(
                        "non-finite float has no text rendering",
                    ));
                }
                w.literal(sink, ftoa_f32(v).as_bytes())
            }
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::FLOAT32);
                sink.write(&v.to_le_bytes());
                Ok(())
            }
        }
    }

    pub(crate) fn float64(&mut self, sink: &mut ByteSink, v: f64) -> Result<()> {
        match self {
            FormatWriter::Text(w) => {
                if !v.is_finite() {
                    return Err(Error::malformed(
                        "non-finite float has no text rendering",
                    ));
                }
                w.literal(sink, ftoa_f64(v).as_bytes())
            }
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::FLOAT64);
                sink.write(&v.to_le_bytes());
                Ok(())
            }
        }
    }

    pub(crate) fn string(&mut self, sink: &mut ByteSink, v: &str) -> Result<()> {
        match self {
            FormatWriter::Text(w) => {
                w.pre_item(sink);
                write_escaped(sink, v);
                Ok(())
            }
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::STRING);
                write_varint(sink, v.len() as u64);
                sink.write(v.as_bytes());
                Ok(())
            }
        }
    }

    pub(crate) fn bytes(&mut self, sink: &mut ByteSink, v: &[u8]) -> Result<()> {
        match self {
            FormatWriter::Text(_) => {
                Err(Error::malformed("bytes scalar has no text rendering"))
            }
            FormatWriter::Binary(_) => {
                sink.write_byte(tag::BYTES);
                write_varint(sink, v.len() as u64);
                sink.write(v);
                Ok(())
            }
        }
    }
}

/// Delimiter state for the text variant.
///
/// One flag per open container records whether its first item was already
/// emitted, which decides comma placement. A key suppresses the separator
/// before its value.
#[derive(Debug)]
pub(crate) struct TextWriter {
    wrote_item: Vec<bool>,
    after_key: bool,
}

impl TextWriter {
    fn new() -> Self {
        TextWriter {
            wrote_item: Vec::new(),
            after_key: false,
        }
    }

    fn pre_item(&mut self, sink: &mut ByteSink) {
        if self.after_key {
            self.after_key = false;
            return;
        }
        if let Some(top) = self.wrote_item.last_mut() {
            if *top {
                sink.write_byte(b',');
            } else {
                *top = true;
            }
        }
    }

    fn container_start(&mut self, sink: &mut ByteSink, open: u8) -> Result<()> {
        self.pre_item(sink);
        sink.write_byte(open);
        self.wrote_item.push(false);
        Ok(())
    }

    fn container_end(&mut self, sink: &mut ByteSink, close: u8) -> Result<()> {
        self.wrote_item.pop();
        sink.write_byte(close);
        Ok(())
    }

    fn key(&mut self, sink: &mut ByteSink, name: &str) -> Result<()> {
        self.pre_item(sink);
        write_escaped(sink, name);
        sink.write_byte(b':');
        self.after_key = true;
        Ok(())
    }

    fn literal(&mut self, sink: &mut ByteSink, bytes: &[u8]) -> Result<()> {
        self.pre_item(sink);
        sink.write(bytes);
        Ok(())
    }
}

/// Symbol-table lookup state for the binary variant.
#[derive(Debug)]
pub(crate) struct BinaryWriter {
    symbols: Arc<SymbolTable>,
}

impl BinaryWriter {
    fn new(symbols: Arc<SymbolTable>) -> Self {
        BinaryWriter { symbols }
    }

    fn key(&mut self, sink: &mut ByteSink, name: &str) -> Result<()> {
        match self.symbols.lookup_id(name) {
            Some(id) => {
                sink.write_byte(tag::KEY_ID);
                write_varint(sink, u64::from(id));
            }
            None => {
                // Literal-name fallback; never an error.
                sink.write_byte(tag::KEY_LITERAL);
                write_varint(sink, name.len() as u64);
                sink.write(name.as_bytes());
            }
        }
        Ok(())
    }
}

/// Writes a quoted, escaped string in the usual JSON style.
fn write_escaped(sink: &mut ByteSink, s: &str) {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    sink.write(out.as_bytes());
}

fn itoa_buf(v: i64) -> String {
    v.to_string()
}

fn ftoa_f32(v: f32) -> String {
    with_fraction(v.to_string())
}

fn ftoa_f64(v: f64) -> String {
    with_fraction(v.to_string())
}

/// Keeps the output a valid JSON number: whole floats get a fraction.
fn with_fraction(s: String) -> String {
    if s.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        s
    } else {
        format!("{}.0", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_bytes(f: impl FnOnce(&mut ByteSink)) -> Vec<u8> {
        let mut sink = ByteSink::new(1024);
        f(&mut sink);
        let mut out = Vec::new();
        loop {
            let chunk = sink.drain(usize::MAX);
            if chunk.is_empty() {
                break;
            }
            out.extend_from_slice(&chunk);
        }
        out
    }

    #[test]
    fn test_varint_single_byte() {
        assert_eq!(sink_bytes(|s| write_varint(s, 0)), vec![0x00]);
        assert_eq!(sink_bytes(|s| write_varint(s, 1)), vec![0x01]);
        assert_eq!(sink_bytes(|s| write_varint(s, 127)), vec![0x7F]);
    }

    #[test]
    fn test_varint_multi_byte() {
        assert_eq!(sink_bytes(|s| write_varint(s, 128)), vec![0x80, 0x01]);
        assert_eq!(sink_bytes(|s| write_varint(s, 300)), vec![0xAC, 0x02]);
        assert_eq!(
            sink_bytes(|s| write_varint(s, u64::MAX)),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag32(0), 0);
        assert_eq!(zigzag32(-1), 1);
        assert_eq!(zigzag32(1), 2);
        assert_eq!(zigzag32(i32::MIN), u32::MAX);
        assert_eq!(zigzag64(-2), 3);
        assert_eq!(zigzag64(i64::MAX), u64::MAX - 1);
    }

    #[test]
    fn test_text_delimiters() {
        let mut w = FormatWriter::new(WireFormat::Text, None);
        let out = sink_bytes(|s| {
            w.map_start(s).unwrap();
            w.key(s, "a").unwrap();
            w.int32(s, 1).unwrap();
            w.key(s, "b").unwrap();
            w.list_start(s).unwrap();
            w.bool(s, true).unwrap();
            w.null(s).unwrap();
            w.list_end(s).unwrap();
            w.map_end(s).unwrap();
        });
        assert_eq!(out, br#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn test_text_string_escaping() {
        let mut w = FormatWriter::new(WireFormat::Text, None);
        let out = sink_bytes(|s| w.string(s, "a\"b\\c\nd").unwrap());
        assert_eq!(out, br#""a\"b\\c\nd""#);
    }

    #[test]
    fn test_text_rejects_bytes() {
        let mut w = FormatWriter::new(WireFormat::Text, None);
        let mut sink = ByteSink::new(64);
        assert!(w.bytes(&mut sink, &[1, 2]).is_err());
    }

    #[test]
    fn test_text_rejects_non_finite_floats() {
        let mut w = FormatWriter::new(WireFormat::Text, None);
        let mut sink = ByteSink::new(64);
        assert!(w.float64(&mut sink, f64::NAN).is_err());
        assert!(w.float32(&mut sink, f32::INFINITY).is_err());
    }

    #[test]
    fn test_text_whole_floats_keep_fraction() {
        let mut w = FormatWriter::new(WireFormat::Text, None);
        let out = sink_bytes(|s| w.float64(s, 2.0).unwrap());
        assert_eq!(out, b"2.0");
    }

    #[test]
    fn test_binary_key_substitution() {
        let symbols = Arc::new(SymbolTable::from_pairs([("a", 5u32)]));
        let mut w = FormatWriter::new(WireFormat::Binary, Some(symbols));
        let out = sink_bytes(|s| w.key(s, "a").unwrap());
        assert_eq!(out, vec![tag::KEY_ID, 5]);
    }

    #[test]
    fn test_binary_key_literal_fallback() {
        let mut w = FormatWriter::new(WireFormat::Binary, None);
        let out = sink_bytes(|s| w.key(s, "c").unwrap());
        assert_eq!(out, vec![tag::KEY_LITERAL, 1, b'c']);
    }

    #[test]
    fn test_binary_scalar_tags() {
        let mut w = FormatWriter::new(WireFormat::Binary, None);
        let out = sink_bytes(|s| {
            w.null(s).unwrap();
            w.bool(s, true).unwrap();
            w.int32(s, -1).unwrap();
            w.string(s, "x").unwrap();
            w.bytes(s, &[0xFF]).unwrap();
        });
        assert_eq!(
            out,
            vec![
                tag::NULL,
                tag::BOOL,
                1,
                tag::INT32,
                1, // zigzag(-1)
                tag::STRING,
                1,
                b'x',
                tag::BYTES,
                1,
                0xFF,
            ]
        );
    }

    #[test]
    fn test_binary_float_bits() {
        let mut w = FormatWriter::new(WireFormat::Binary, None);
        let out = sink_bytes(|s| w.float64(s, 1.5).unwrap());
        let mut expected = vec![tag::FLOAT64];
        expected.extend_from_slice(&1.5f64.to_le_bytes());
        assert_eq!(out, expected);
    }
}
