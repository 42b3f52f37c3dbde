//! BION writer: direct byte-for-byte emission of wire tokens.
//!
//! The writer holds no state between calls; every method is one token's
//! bytes pushed straight into the sink, so independent writers over
//! independent sinks are trivially reusable. Sequencing rules (names only
//! inside objects, matching begin/end pairs) are the caller's job — the
//! structure-visitor adapter enforces them for tree walks.

use crate::bion::tag::{
    self, fixed_elem_tag, ARRAY_BEGIN, FIXED_ARRAY_BEGIN, MAGIC, OBJECT_BEGIN, STRING_TAG,
    STRUCT_END,
};
use crate::error::{BionError, BionResult};
use crate::value::Kind;
use crate::varint::{uvarint_len, write_uvarint};
use std::io::{self, Write};

/// Token encoder over an abstract byte sink.
pub struct BionWriter<W: Write> {
    sink: W,
}

impl<W: Write> BionWriter<W> {
    pub fn new(sink: W) -> Self {
        BionWriter { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn put(&mut self, bytes: &[u8]) -> BionResult<()> {
        self.sink.write_all(bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::WriteZero {
                BionError::OutputOverflow
            } else {
                BionError::Io(e)
            }
        })
    }

    // ── structural tokens ──────────────────────────────────────────────

    /// Two magic bytes opening a stream.
    pub fn write_header(&mut self) -> BionResult<()> {
        self.put(&MAGIC)
    }

    /// One zero byte closing a stream. Bit-identical to a struct-end; the
    /// reader tells them apart by its open-structure stack alone.
    pub fn write_footer(&mut self) -> BionResult<()> {
        self.put(&[STRUCT_END])
    }

    pub fn write_object_begin(&mut self) -> BionResult<()> {
        self.put(&[OBJECT_BEGIN])
    }

    pub fn write_object_end(&mut self) -> BionResult<()> {
        self.put(&[STRUCT_END])
    }

    pub fn write_array_begin(&mut self) -> BionResult<()> {
        self.put(&[ARRAY_BEGIN])
    }

    pub fn write_array_end(&mut self) -> BionResult<()> {
        self.put(&[STRUCT_END])
    }

    /// Fixed-type array opener: instruction byte plus the varint element
    /// count. The caller follows up with exactly one [`BionWriter::write_type`]
    /// and then count tag-free `*_data` elements.
    pub fn write_fixed_array_begin(&mut self, count: usize) -> BionResult<()> {
        self.put(&[FIXED_ARRAY_BEGIN])?;
        let mut buf = Vec::with_capacity(uvarint_len(count as u64));
        write_uvarint(&mut buf, count as u64);
        self.put(&buf)
    }

    /// Element name: raw bytes plus a NUL terminator, no type tag. The name
    /// must not be empty or contain NUL — either would be read back as a
    /// structural byte.
    pub fn write_element_name(&mut self, name: &str) -> BionResult<()> {
        self.put(name.as_bytes())?;
        self.put(&[0])
    }

    // ── tagged values ──────────────────────────────────────────────────

    pub fn write_null(&mut self) -> BionResult<()> {
        self.put(&[tag::TAG_NULL])
    }

    /// Booleans spend no payload bytes: the tag itself says true or false.
    pub fn write_bool(&mut self, v: bool) -> BionResult<()> {
        self.put(&[if v { tag::TAG_TRUE } else { tag::TAG_FALSE }])
    }

    pub fn write_byte(&mut self, v: u8) -> BionResult<()> {
        self.put(&[tag::TAG_BYTE])?;
        self.write_byte_data(v)
    }

    pub fn write_i32(&mut self, v: i32) -> BionResult<()> {
        self.put(&[tag::TAG_INT32])?;
        self.write_i32_data(v)
    }

    pub fn write_u32(&mut self, v: u32) -> BionResult<()> {
        self.put(&[tag::TAG_UINT32])?;
        self.write_u32_data(v)
    }

    pub fn write_i64(&mut self, v: i64) -> BionResult<()> {
        self.put(&[tag::TAG_INT64])?;
        self.write_i64_data(v)
    }

    pub fn write_u64(&mut self, v: u64) -> BionResult<()> {
        self.put(&[tag::TAG_UINT64])?;
        self.write_u64_data(v)
    }

    pub fn write_f32(&mut self, v: f32) -> BionResult<()> {
        self.put(&[tag::TAG_FLOAT32])?;
        self.write_f32_data(v)
    }

    pub fn write_f64(&mut self, v: f64) -> BionResult<()> {
        self.put(&[tag::TAG_FLOAT64])?;
        self.write_f64_data(v)
    }

    pub fn write_extended(&mut self, v: f64) -> BionResult<()> {
        self.put(&[tag::TAG_EXTENDED])?;
        self.write_extended_data(v)
    }

    /// Strings skip the packed nibble scheme entirely: the reserved tag byte
    /// followed by raw NUL-terminated bytes.
    pub fn write_str(&mut self, v: &str) -> BionResult<()> {
        self.put(&[STRING_TAG])?;
        self.put(v.as_bytes())?;
        self.put(&[0])
    }

    // ── fixed-type array pieces ────────────────────────────────────────

    /// The single element type-tag of a fixed-type array.
    pub fn write_type(&mut self, kind: Kind) -> BionResult<()> {
        let (tag_byte, _) = fixed_elem_tag(kind).ok_or(BionError::Unserializable {
            kind: kind.name(),
        })?;
        self.put(&[tag_byte])
    }

    pub fn write_bool_data(&mut self, v: bool) -> BionResult<()> {
        self.put(&[u8::from(v)])
    }

    pub fn write_byte_data(&mut self, v: u8) -> BionResult<()> {
        self.put(&[v])
    }

    pub fn write_i32_data(&mut self, v: i32) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_u32_data(&mut self, v: u32) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_i64_data(&mut self, v: i64) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_u64_data(&mut self, v: u64) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_f32_data(&mut self, v: f32) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_f64_data(&mut self, v: f64) -> BionResult<()> {
        self.put(&v.to_le_bytes())
    }

    pub fn write_extended_data(&mut self, v: f64) -> BionResult<()> {
        self.put(&tag::f64_to_extended_bits(v))
    }
}

/// Fixed-capacity in-memory sink. Once full, further writes report zero
/// progress, which surfaces as [`BionError::OutputOverflow`] at the writer.
pub struct BoundedSink {
    buf: Vec<u8>,
    capacity: usize,
}

impl BoundedSink {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        BoundedSink {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for BoundedSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.buf.len();
        let n = bytes.len().min(room);
        self.buf.extend_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
