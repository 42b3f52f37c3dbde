//! BION reader: a single-pass streaming state machine.
//!
//! [`BionReader::process`] consumes one whole stream and pushes every
//! decoded token into a caller-supplied [`BionEvents`] receiver — the only
//! output channel. Two pieces of state drive all decisions:
//!
//! - the **open-structure stack**: on a struct-end byte it picks which close
//!   callback fires, and when it is already empty the byte is the footer
//!   (end of stream, not an error — see below); after any value, its top
//!   says whether the next token is a name (object) or another value.
//! - a **bounded scratch buffer** for names and strings; a token that
//!   outgrows it is a `ValueTooLong` error, never a silent truncation.
//!
//! The reader is not reentrant and not resumable mid-stream; cancellation
//! is simply not calling `process` again. Partial input is acceptable only
//! at a structural boundary (EOF is checked by `peek` before each token).
//!
//! Note the deliberate overload: a struct-end byte with nothing open is
//! treated as a legitimate footer even though it could equally be a stream
//! that closed one structure too many. This matches the wire producers we
//! interoperate with and is kept as-is.

use crate::bion::tag::{
    self, decode_std_type, StdType, ARRAY_BEGIN, FIXED_ARRAY_BEGIN, OBJECT_BEGIN, STRING_TAG,
    STRUCT_END,
};
use crate::error::{BionError, BionResult};
use crate::value::Kind;
use crate::varint::read_uvarint;
use std::io::{self, Read};

/// Default cap on a single name/string token.
pub const DEFAULT_MAX_TOKEN: usize = 64 * 1024;

/// Input capability the reader consumes: exact reads plus one-byte lookahead.
pub trait BionInput {
    /// Fill `buf` completely or fail with `UnexpectedEof` carrying the
    /// number of missing bytes.
    fn read_exact(&mut self, buf: &mut [u8]) -> BionResult<()>;

    /// Next byte without consuming it; `None` at end of input.
    fn peek(&mut self) -> BionResult<Option<u8>>;
}

/// Input over an in-memory slice, optionally bounded to a prefix.
pub struct SliceInput<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SliceInput { data, pos: 0 }
    }

    /// Read only the first `limit` bytes of `data`. A zero limit or one
    /// past the available bytes is a configuration error.
    pub fn with_limit(data: &'a [u8], limit: usize) -> BionResult<Self> {
        if limit == 0 || limit > data.len() {
            return Err(BionError::InvalidLimit {
                limit,
                available: data.len(),
            });
        }
        Ok(SliceInput {
            data: &data[..limit],
            pos: 0,
        })
    }
}

impl BionInput for SliceInput<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> BionResult<()> {
        let available = self.data.len() - self.pos;
        if buf.len() > available {
            self.pos = self.data.len();
            return Err(BionError::UnexpectedEof {
                needed: buf.len() - available,
            });
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();
        Ok(())
    }

    fn peek(&mut self) -> BionResult<Option<u8>> {
        Ok(self.data.get(self.pos).copied())
    }
}

/// Input adapter over any [`io::Read`], with a one-byte peek buffer.
pub struct StreamInput<R: Read> {
    inner: R,
    peeked: Option<u8>,
}

impl<R: Read> StreamInput<R> {
    pub fn new(inner: R) -> Self {
        StreamInput {
            inner,
            peeked: None,
        }
    }
}

impl<R: Read> BionInput for StreamInput<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> BionResult<()> {
        let mut filled = 0;
        if let Some(b) = self.peeked.take() {
            if let Some(slot) = buf.first_mut() {
                *slot = b;
                filled = 1;
            }
        }
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(BionError::UnexpectedEof {
                        needed: buf.len() - filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(BionError::Io(e)),
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> BionResult<Option<u8>> {
        if self.peeked.is_none() {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => {
                        self.peeked = Some(byte[0]);
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(BionError::Io(e)),
                }
            }
        }
        Ok(self.peeked)
    }
}

/// Event receiver: the reader's only output channel. Tree-builders (or any
/// other consumer) implement the callbacks they care about; every default
/// is a no-op so a consumer can stay minimal.
pub trait BionEvents {
    fn on_header(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_footer(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_object_begin(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_object_end(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_array_begin(&mut self) -> BionResult<()> {
        Ok(())
    }
    /// Fixed-type arrays announce their element kind and count up front;
    /// by default they look like a plain array.
    fn on_fixed_array_begin(&mut self, kind: Kind, count: usize) -> BionResult<()> {
        let _ = (kind, count);
        self.on_array_begin()
    }
    fn on_array_end(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_key(&mut self, name: &str) -> BionResult<()> {
        let _ = name;
        Ok(())
    }
    fn on_null(&mut self) -> BionResult<()> {
        Ok(())
    }
    fn on_bool(&mut self, v: bool) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_byte(&mut self, v: u8) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_i32(&mut self, v: i32) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_u32(&mut self, v: u32) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_i64(&mut self, v: i64) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_u64(&mut self, v: u64) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_f32(&mut self, v: f32) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_f64(&mut self, v: f64) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_extended(&mut self, v: f64) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
    fn on_string(&mut self, v: &str) -> BionResult<()> {
        let _ = v;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// Streaming decoder over a [`BionInput`].
pub struct BionReader<I: BionInput> {
    input: I,
    stack: Vec<Scope>,
    scratch: Vec<u8>,
    max_token: usize,
}

impl<I: BionInput> BionReader<I> {
    pub fn new(input: I) -> Self {
        Self::with_max_token(input, DEFAULT_MAX_TOKEN)
    }

    /// Reader with a custom cap on name/string token length.
    pub fn with_max_token(input: I, max_token: usize) -> Self {
        BionReader {
            input,
            stack: Vec::new(),
            scratch: Vec::new(),
            max_token,
        }
    }

    /// Decode one stream, start to finish, firing events as tokens complete.
    ///
    /// Ends cleanly at the footer byte or at end of input on a structural
    /// boundary. An unmatched struct-end byte is the footer by definition
    /// here; the reader cannot tell it apart from a stream that closed one
    /// structure too many (see the module docs).
    pub fn process<E: BionEvents>(&mut self, events: &mut E) -> BionResult<()> {
        self.stack.clear();

        let mut magic = [0u8; 2];
        self.input.read_exact(&mut magic)?;
        if magic != tag::MAGIC {
            return Err(BionError::BadMagic { found: magic });
        }
        events.on_header()?;

        loop {
            let Some(next) = self.input.peek()? else {
                // end of input at a token boundary: acceptable
                return Ok(());
            };

            if self.stack.last() == Some(&Scope::Object) {
                // inside an object the next token is a name — unless it is
                // the close byte, which cannot be an (empty) name because
                // empty names do not exist on the wire
                if next == STRUCT_END {
                    self.read_byte()?;
                    self.stack.pop();
                    events.on_object_end()?;
                    continue;
                }
                let name = self.read_cstring()?;
                events.on_key(&name)?;
            }

            if !self.read_token(events)? {
                return Ok(());
            }
        }
    }

    /// Read one value or structural token. Returns false once the footer
    /// has been consumed.
    fn read_token<E: BionEvents>(&mut self, events: &mut E) -> BionResult<bool> {
        let b = self.read_byte()?;
        match b {
            STRUCT_END => match self.stack.pop() {
                Some(Scope::Object) => events.on_object_end()?,
                Some(Scope::Array) => events.on_array_end()?,
                None => {
                    events.on_footer()?;
                    return Ok(false);
                }
            },
            OBJECT_BEGIN => {
                self.stack.push(Scope::Object);
                events.on_object_begin()?;
            }
            ARRAY_BEGIN => {
                self.stack.push(Scope::Array);
                events.on_array_begin()?;
            }
            FIXED_ARRAY_BEGIN => self.read_fixed_array(events)?,
            STRING_TAG => {
                let s = self.read_cstring()?;
                events.on_string(&s)?;
            }
            other => {
                let st = decode_std_type(other)?;
                self.dispatch_std_value(st, events)?;
            }
        }
        Ok(true)
    }

    /// Fixed-type array subroutine: varint count, one element type-tag,
    /// then exactly `count` tag-free fixed-size elements.
    fn read_fixed_array<E: BionEvents>(&mut self, events: &mut E) -> BionResult<()> {
        let count = read_uvarint(&mut self.input)? as usize;
        let type_byte = self.read_byte()?;
        let st = decode_std_type(type_byte)?;
        // zero-payload element kinds would make the count meaningless (and
        // unbounded); no writer produces them
        if st.payload_len() == 0 {
            return Err(BionError::UnknownKind(type_byte));
        }
        events.on_fixed_array_begin(element_kind(st), count)?;
        for _ in 0..count {
            self.dispatch_std_value(st, events)?;
        }
        events.on_array_end()
    }

    /// Read the payload for a decoded type-tag and fire the typed event.
    fn dispatch_std_value<E: BionEvents>(
        &mut self,
        st: StdType,
        events: &mut E,
    ) -> BionResult<()> {
        match st {
            StdType::Null => events.on_null(),
            StdType::BoolFalse => events.on_bool(false),
            StdType::BoolTrue => events.on_bool(true),
            StdType::BoolPayload => {
                let b = self.read_byte()?;
                events.on_bool(b != 0)
            }
            StdType::Int { size } => {
                let v = self.read_int_le(size)?;
                if size == 8 {
                    events.on_i64(v)
                } else {
                    events.on_i32(v as i32)
                }
            }
            StdType::UInt { size } => {
                let v = self.read_uint_le(size)?;
                match size {
                    1 => events.on_byte(v as u8),
                    8 => events.on_u64(v),
                    _ => events.on_u32(v as u32),
                }
            }
            StdType::Float { size } => match size {
                4 => {
                    let mut buf = [0u8; 4];
                    self.input.read_exact(&mut buf)?;
                    events.on_f32(f32::from_le_bytes(buf))
                }
                8 => {
                    let mut buf = [0u8; 8];
                    self.input.read_exact(&mut buf)?;
                    events.on_f64(f64::from_le_bytes(buf))
                }
                _ => {
                    let mut buf = [0u8; 10];
                    self.input.read_exact(&mut buf)?;
                    events.on_extended(tag::extended_bits_to_f64(buf))
                }
            },
        }
    }

    fn read_byte(&mut self) -> BionResult<u8> {
        let mut byte = [0u8; 1];
        self.input.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Little-endian signed integer of 1, 2, 4 or 8 bytes, sign-extended.
    fn read_int_le(&mut self, size: usize) -> BionResult<i64> {
        let mut buf = [0u8; 8];
        self.input.read_exact(&mut buf[..size])?;
        let unsigned = u64::from_le_bytes(buf);
        let shift = 64 - 8 * size as u32;
        Ok(((unsigned << shift) as i64) >> shift)
    }

    /// Little-endian unsigned integer of 1, 2, 4 or 8 bytes.
    fn read_uint_le(&mut self, size: usize) -> BionResult<u64> {
        let mut buf = [0u8; 8];
        self.input.read_exact(&mut buf[..size])?;
        Ok(u64::from_le_bytes(buf))
    }

    /// NUL-terminated token into the scratch buffer. Overruns of the token
    /// cap error out instead of truncating.
    fn read_cstring(&mut self) -> BionResult<String> {
        self.scratch.clear();
        loop {
            let b = self.read_byte()?;
            if b == 0 {
                break;
            }
            if self.scratch.len() >= self.max_token {
                return Err(BionError::ValueTooLong {
                    max: self.max_token,
                });
            }
            self.scratch.push(b);
        }
        std::str::from_utf8(&self.scratch)
            .map(str::to_string)
            .map_err(|_| BionError::InvalidUtf8)
    }
}

/// The Node-level element kind a fixed-array type-tag announces.
fn element_kind(st: StdType) -> Kind {
    match st {
        StdType::Null => Kind::Null,
        StdType::BoolFalse | StdType::BoolTrue | StdType::BoolPayload => Kind::Bool,
        StdType::Int { size: 8 } => Kind::Int64,
        StdType::Int { .. } => Kind::Int32,
        StdType::UInt { size: 1 } => Kind::Byte,
        StdType::UInt { size: 8 } => Kind::UInt64,
        StdType::UInt { .. } => Kind::UInt32,
        StdType::Float { size: 4 } => Kind::Float32,
        StdType::Float { size: 10 } => Kind::Extended,
        StdType::Float { .. } => Kind::Float64,
    }
}
