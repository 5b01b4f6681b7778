//! Stack-only streaming JSON emitter.
//!
//! Mirrors the original C emitter's design: no buffering of the output
//! document and no heap allocation anywhere in the write path. Nesting state
//! lives in a caller-supplied `&mut [Frame]`, exactly like [`crate::Token`]
//! storage is caller-supplied to the parser; bytes go out one at a time
//! through a writer closure instead of a C function pointer plus opaque
//! `uintptr_t` argument.
//!
//! Every emission method takes `&mut self` and returns `&mut Self` for
//! chaining, mirroring the C original's pointer-return chaining idiom. EMIT
//! does not validate that the caller's call sequence produces well-formed
//! JSON: opening past frame capacity and closing past the root are both
//! clamped to a no-op rather than rejected, and `key` never checks that the
//! current frame is actually an object expecting one. The caller is trusted
//! to sequence calls correctly, the same trust the C original places in its
//! callers.

use std::fmt::Write as _;

use crate::JsonError;

/// One level of emitter nesting: how many items have been written into the
/// currently open object or array, and which punctuation rule applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    item_count: usize,
    is_object: bool,
}

/// A stack-only, non-allocating JSON writer.
///
/// `frames` bounds the maximum nesting depth the emitter can reach: index 0
/// is the root frame (the top-level value's own punctuation state), and
/// deeper indices are used as containers open. Opening a container past
/// `frames.len() - 1` clamps rather than growing or erroring — the container
/// opener is still emitted, but no new frame is pushed and `curr_level`
/// stays put. Every byte produced is handed to `writer` as it is written —
/// there is no internal output buffer.
pub struct Emitter<'a, W> {
    frames: &'a mut [Frame],
    depth: usize,
    writer: W,
}

impl<'a, W> Emitter<'a, W>
where
    W: FnMut(u8),
{
    /// `frames` must be non-empty: index 0 is always the root frame.
    pub fn new(frames: &'a mut [Frame], writer: W) -> Self {
        debug_assert!(!frames.is_empty(), "Emitter needs at least one frame slot");
        let mut emitter = Self {
            frames,
            depth: 0,
            writer,
        };
        emitter.reset();
        emitter
    }

    /// Return the emitter to its just-constructed state: `curr_level` back
    /// to 0 and the root frame cleared, so one `Emitter`/frame buffer can be
    /// reused across independent documents without reallocating either.
    pub fn reset(&mut self) -> &mut Self {
        self.depth = 0;
        self.frames[0] = Frame::default();
        self
    }

    /// Current nesting depth: 0 at the top level, 1 inside the outermost
    /// container, and so on.
    pub fn curr_level(&self) -> usize {
        self.depth
    }

    /// Number of items written so far into the current frame (root frame at
    /// the top level, counting both keys and values).
    pub fn item_count(&self) -> usize {
        self.current_frame().item_count
    }

    fn write_byte(&mut self, byte: u8) {
        (self.writer)(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    fn current_frame(&self) -> &Frame {
        &self.frames[self.depth]
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.depth]
    }

    /// Emit the comma or colon preceding the next item, per the current
    /// frame's punctuation rule: nothing before the first item in a frame,
    /// `,` between array elements and between object pairs, `:` between an
    /// object key and its value.
    fn punctuate(&mut self) {
        let frame = *self.current_frame();
        if frame.item_count == 0 {
            return;
        }
        if frame.is_object {
            if frame.item_count % 2 == 0 {
                self.write_byte(b',');
            } else {
                self.write_byte(b':');
            }
        } else {
            self.write_byte(b',');
        }
    }

    fn record_item(&mut self) {
        self.current_frame_mut().item_count += 1;
    }

    /// Punctuate and count one value about to be written, whatever it is.
    fn begin_value(&mut self) {
        self.punctuate();
        self.record_item();
    }

    /// Push a new frame for a just-opened container. Clamped: if already at
    /// capacity, `curr_level` simply stays where it is and the nested
    /// content that follows is folded into the frame that's already open.
    fn push_frame(&mut self, is_object: bool) {
        if self.depth < self.frames.len() - 1 {
            self.depth += 1;
            self.frames[self.depth] = Frame {
                item_count: 0,
                is_object,
            };
        }
    }

    /// Pop one frame for a just-closed container. No-op if already at the
    /// root; does not check that the closer matches the opener.
    fn pop_frame(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn object_open(&mut self) -> &mut Self {
        self.begin_value();
        self.write_byte(b'{');
        self.push_frame(true);
        self
    }

    pub fn object_close(&mut self) -> &mut Self {
        self.write_byte(b'}');
        self.pop_frame();
        self
    }

    pub fn array_open(&mut self) -> &mut Self {
        self.begin_value();
        self.write_byte(b'[');
        self.push_frame(false);
        self
    }

    pub fn array_close(&mut self) -> &mut Self {
        self.write_byte(b']');
        self.pop_frame();
        self
    }

    /// Write a string value, JSON-escaping control characters, `"` and `\`.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.begin_value();
        self.write_escaped(value.as_bytes());
        self
    }

    /// Write a string value from raw bytes, for callers without a validated
    /// `&str` on hand. Bytes are escaped the same way as [`Emitter::string`];
    /// the caller is responsible for the result being valid UTF-8 JSON text.
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.begin_value();
        self.write_escaped(value);
        self
    }

    fn write_escaped(&mut self, bytes: &[u8]) {
        self.write_byte(b'"');
        for &b in bytes {
            match b {
                b'"' => self.write_bytes(b"\\\""),
                b'\\' => self.write_bytes(b"\\\\"),
                0x08 => self.write_bytes(b"\\b"),
                0x0c => self.write_bytes(b"\\f"),
                b'\n' => self.write_bytes(b"\\n"),
                b'\r' => self.write_bytes(b"\\r"),
                b'\t' => self.write_bytes(b"\\t"),
                0x00..=0x1f => {
                    let mut buf = StackBuf::new();
                    write!(buf, "\\u{:04x}", b).unwrap();
                    self.write_bytes(buf.as_bytes());
                }
                _ => self.write_byte(b),
            }
        }
        self.write_byte(b'"');
    }

    /// Write a number value. When `value` round-trips exactly through an
    /// `i64` cast, it is emitted in decimal integer form (no `.`); otherwise
    /// it is emitted in decimal floating-point form.
    pub fn number(&mut self, value: f64) -> &mut Self {
        self.begin_value();
        let mut buf = StackBuf::new();
        if value.is_finite() && value as i64 as f64 == value {
            write!(buf, "{}", value as i64).unwrap();
        } else {
            write!(buf, "{}", value).unwrap();
        }
        self.write_bytes(buf.as_bytes());
        self
    }

    /// Write an integer value.
    pub fn integer(&mut self, value: i64) -> &mut Self {
        self.begin_value();
        let mut buf = StackBuf::new();
        write!(buf, "{}", value).unwrap();
        self.write_bytes(buf.as_bytes());
        self
    }

    pub fn bool_value(&mut self, value: bool) -> &mut Self {
        self.begin_value();
        self.write_bytes(if value { b"true" } else { b"false" });
        self
    }

    pub fn true_value(&mut self) -> &mut Self {
        self.bool_value(true)
    }

    pub fn false_value(&mut self) -> &mut Self {
        self.bool_value(false)
    }

    pub fn null_value(&mut self) -> &mut Self {
        self.begin_value();
        self.write_bytes(b"null");
        self
    }

    /// Write `raw` through verbatim, unescaped and unquoted, as a value.
    /// The caller must ensure `raw` is itself valid JSON; this is an escape
    /// hatch for pre-serialized fragments, not a general value writer.
    pub fn literal(&mut self, raw: &str) -> &mut Self {
        self.begin_value();
        self.write_bytes(raw.as_bytes());
        self
    }

    /// Write `name` as an object key, i.e. just a string value. Nothing
    /// checks that the current frame is actually an object expecting a key
    /// here — the punctuation rule only looks right if the caller alternates
    /// key and value calls, which is on the caller to get right.
    pub fn key(&mut self, name: &str) -> &mut Self {
        self.string(name)
    }

    pub fn key_string(&mut self, name: &str, value: &str) -> &mut Self {
        self.key(name).string(value)
    }

    pub fn key_bytes(&mut self, name: &str, value: &[u8]) -> &mut Self {
        self.key(name).bytes(value)
    }

    pub fn key_number(&mut self, name: &str, value: f64) -> &mut Self {
        self.key(name).number(value)
    }

    pub fn key_integer(&mut self, name: &str, value: i64) -> &mut Self {
        self.key(name).integer(value)
    }

    pub fn key_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.key(name).bool_value(value)
    }

    pub fn key_true(&mut self, name: &str) -> &mut Self {
        self.key(name).true_value()
    }

    pub fn key_false(&mut self, name: &str) -> &mut Self {
        self.key(name).false_value()
    }

    pub fn key_null(&mut self, name: &str) -> &mut Self {
        self.key(name).null_value()
    }

    pub fn key_literal(&mut self, name: &str, raw: &str) -> &mut Self {
        self.key(name).literal(raw)
    }

    pub fn key_object_open(&mut self, name: &str) -> &mut Self {
        self.key(name).object_open()
    }

    pub fn key_array_open(&mut self, name: &str) -> &mut Self {
        self.key(name).array_open()
    }

    /// Confirm the document is well-formed: every opened object or array
    /// has been closed. Call this after the top-level value is complete.
    pub fn finish(&self) -> Result<(), JsonError> {
        if self.depth == 0 {
            Ok(())
        } else {
            Err(JsonError::Incomplete)
        }
    }
}

/// A fixed-capacity [`std::fmt::Write`] sink used to format numbers without
/// a heap allocation; 32 bytes comfortably fits any `i64` or `f64` decimal
/// rendering Rust's `Display` impls produce for the values this crate
/// formats. Writes past capacity are truncated rather than failing, the same
/// graceful-degradation behavior `snprintf` gives the original C emitter's
/// fixed stack buffers.
struct StackBuf {
    buf: [u8; 32],
    len: usize,
}

impl StackBuf {
    fn new() -> Self {
        Self {
            buf: [0; 32],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl std::fmt::Write for StackBuf {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let remaining = self.buf.len() - self.len;
        let take = remaining.min(s.len());
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}
