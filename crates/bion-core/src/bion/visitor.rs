//! Structure-visitor adapter: tree producer in, BION writer out.
//!
//! [`TreeSink`] is the abstract tree-producer capability — anything that can
//! walk a tree calls begin/end-map, begin/end-array, key and typed-value
//! methods on it. [`StructWriter`] implements that capability over a
//! [`BionWriter`], which is the seam that lets a Node tree (or any other
//! tree) become BION without the codec depending on the tree type.
//!
//! The one decision the adapter owns: `begin_array_of(kind, len)` with a
//! positive length and a fixed-size scalar kind opens a fixed-type array
//! (count + one element type-tag) and remembers, on a stack, that element
//! writes until the matching `end_array` go through the tag-free data
//! calls. Everything else falls back to a generic array where each element
//! carries its own tag.

use crate::bion::tag::fixed_elem_tag;
use crate::bion::writer::BionWriter;
use crate::error::{BionError, BionResult};
use crate::value::Kind;
use std::io::Write;

/// Tree-producer capability: the calls a tree walker makes.
pub trait TreeSink {
    fn begin_map(&mut self) -> BionResult<()>;
    fn end_map(&mut self) -> BionResult<()>;
    fn begin_array(&mut self) -> BionResult<()>;
    /// Typed array opener; by default the type hint is dropped.
    fn begin_array_of(&mut self, kind: Kind, len: usize) -> BionResult<()> {
        let _ = (kind, len);
        self.begin_array()
    }
    fn end_array(&mut self) -> BionResult<()>;
    fn key(&mut self, name: &str) -> BionResult<()>;
    fn value_null(&mut self) -> BionResult<()>;
    fn value_bool(&mut self, v: bool) -> BionResult<()>;
    fn value_byte(&mut self, v: u8) -> BionResult<()>;
    fn value_i32(&mut self, v: i32) -> BionResult<()>;
    fn value_u32(&mut self, v: u32) -> BionResult<()>;
    fn value_i64(&mut self, v: i64) -> BionResult<()>;
    fn value_u64(&mut self, v: u64) -> BionResult<()>;
    fn value_f32(&mut self, v: f32) -> BionResult<()>;
    fn value_f64(&mut self, v: f64) -> BionResult<()>;
    fn value_extended(&mut self, v: f64) -> BionResult<()>;
    fn value_datetime(&mut self, secs: f64) -> BionResult<()>;
    fn value_str(&mut self, v: &str) -> BionResult<()>;
}

/// TreeSink over a BION writer.
pub struct StructWriter<W: Write> {
    writer: BionWriter<W>,
    /// One entry per open structure; `Some(kind)` marks a fixed-type array
    /// whose elements must arrive tag-free and of that kind.
    open: Vec<Option<Kind>>,
}

impl<W: Write> StructWriter<W> {
    pub fn new(sink: W) -> Self {
        StructWriter {
            writer: BionWriter::new(sink),
            open: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub fn write_header(&mut self) -> BionResult<()> {
        self.writer.write_header()
    }

    pub fn write_footer(&mut self) -> BionResult<()> {
        self.writer.write_footer()
    }

    fn fixed_kind(&self) -> Option<Kind> {
        self.open.last().copied().flatten()
    }

    /// Inside a fixed-type array only the declared kind may be written;
    /// outside one, anything goes (tagged form).
    fn expect_fixed(&self, found: Kind) -> BionResult<Option<Kind>> {
        match self.fixed_kind() {
            None => Ok(None),
            Some(k) if k == found => Ok(Some(k)),
            Some(k) => Err(BionError::FixedTypeMismatch {
                expected: k.name(),
                found: found.name(),
            }),
        }
    }

    fn guard_structure(&self, what: &'static str) -> BionResult<()> {
        match self.fixed_kind() {
            Some(k) => Err(BionError::FixedTypeMismatch {
                expected: k.name(),
                found: what,
            }),
            None => Ok(()),
        }
    }
}

impl<W: Write> TreeSink for StructWriter<W> {
    fn begin_map(&mut self) -> BionResult<()> {
        self.guard_structure("object")?;
        self.writer.write_object_begin()?;
        self.open.push(None);
        Ok(())
    }

    fn end_map(&mut self) -> BionResult<()> {
        self.open.pop();
        self.writer.write_object_end()
    }

    fn begin_array(&mut self) -> BionResult<()> {
        self.guard_structure("array")?;
        self.writer.write_array_begin()?;
        self.open.push(None);
        Ok(())
    }

    fn begin_array_of(&mut self, kind: Kind, len: usize) -> BionResult<()> {
        self.guard_structure("array")?;
        if len > 0 && fixed_elem_tag(kind).is_some() {
            self.writer.write_fixed_array_begin(len)?;
            self.writer.write_type(kind)?;
            self.open.push(Some(kind));
        } else {
            // empty or not fixed-size encodable: generic self-describing array
            self.writer.write_array_begin()?;
            self.open.push(None);
        }
        Ok(())
    }

    fn end_array(&mut self) -> BionResult<()> {
        match self.open.pop() {
            // a fixed-type array is delimited by its count, not an end byte
            Some(Some(_)) => Ok(()),
            _ => self.writer.write_array_end(),
        }
    }

    fn key(&mut self, name: &str) -> BionResult<()> {
        self.writer.write_element_name(name)
    }

    fn value_null(&mut self) -> BionResult<()> {
        self.guard_structure("null")?;
        self.writer.write_null()
    }

    fn value_bool(&mut self, v: bool) -> BionResult<()> {
        match self.expect_fixed(Kind::Bool)? {
            Some(_) => self.writer.write_bool_data(v),
            None => self.writer.write_bool(v),
        }
    }

    fn value_byte(&mut self, v: u8) -> BionResult<()> {
        match self.expect_fixed(Kind::Byte)? {
            Some(_) => self.writer.write_byte_data(v),
            None => self.writer.write_byte(v),
        }
    }

    fn value_i32(&mut self, v: i32) -> BionResult<()> {
        match self.expect_fixed(Kind::Int32)? {
            Some(_) => self.writer.write_i32_data(v),
            None => self.writer.write_i32(v),
        }
    }

    fn value_u32(&mut self, v: u32) -> BionResult<()> {
        match self.expect_fixed(Kind::UInt32)? {
            Some(_) => self.writer.write_u32_data(v),
            None => self.writer.write_u32(v),
        }
    }

    fn value_i64(&mut self, v: i64) -> BionResult<()> {
        match self.expect_fixed(Kind::Int64)? {
            Some(_) => self.writer.write_i64_data(v),
            None => self.writer.write_i64(v),
        }
    }

    fn value_u64(&mut self, v: u64) -> BionResult<()> {
        match self.expect_fixed(Kind::UInt64)? {
            Some(_) => self.writer.write_u64_data(v),
            None => self.writer.write_u64(v),
        }
    }

    fn value_f32(&mut self, v: f32) -> BionResult<()> {
        match self.expect_fixed(Kind::Float32)? {
            Some(_) => self.writer.write_f32_data(v),
            None => self.writer.write_f32(v),
        }
    }

    fn value_f64(&mut self, v: f64) -> BionResult<()> {
        match self.expect_fixed(Kind::Float64)? {
            Some(_) => self.writer.write_f64_data(v),
            None => self.writer.write_f64(v),
        }
    }

    fn value_extended(&mut self, v: f64) -> BionResult<()> {
        match self.expect_fixed(Kind::Extended)? {
            Some(_) => self.writer.write_extended_data(v),
            None => self.writer.write_extended(v),
        }
    }

    /// Timestamps have no wire kind of their own; they travel as f64.
    fn value_datetime(&mut self, secs: f64) -> BionResult<()> {
        match self.expect_fixed(Kind::DateTime)? {
            Some(_) => self.writer.write_f64_data(secs),
            None => self.writer.write_f64(secs),
        }
    }

    fn value_str(&mut self, v: &str) -> BionResult<()> {
        self.guard_structure("string")?;
        self.writer.write_str(v)
    }
}
