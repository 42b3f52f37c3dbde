//! Scalar values: the leaf subset of the Node data model.
//!
//! A [`Value`] carries exactly one scalar at a time, tagged by [`Kind`].
//! Reading through a mismatched tag does not fail; it performs a lossy
//! conversion (numeric truncation, string parsing, first-character boolean).
//! The single hard error is reading any typed value out of [`Value::Null`].
//!
//! All conversions live in one exhaustive match per target kind, so the
//! compiler proves the table covers the closed set of tags.

use crate::error::{NodeError, NodeResult};
use chrono::{DateTime as ChronoDateTime, SecondsFormat, Utc};

/// Type tag for scalar values, plus [`Kind::Node`] which only ever appears
/// as the declared element kind of a heterogeneous array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Byte,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// Extended-precision float; 10 bytes on the wire, held as f64 in memory.
    Extended,
    /// Calendar timestamp as fractional Unix seconds.
    DateTime,
    Str,
    /// Opaque machine word. Never serialized.
    Handle,
    /// Array-element kind meaning "each element is a full Node".
    Node,
}

impl Kind {
    /// Type name for error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Byte => "byte",
            Kind::Int32 => "int32",
            Kind::UInt32 => "uint32",
            Kind::Int64 => "int64",
            Kind::UInt64 => "uint64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Extended => "extended",
            Kind::DateTime => "datetime",
            Kind::Str => "string",
            Kind::Handle => "handle",
            Kind::Node => "node",
        }
    }

    /// True for the kinds that order and compare as numbers.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Kind::Byte
                | Kind::Int32
                | Kind::UInt32
                | Kind::Int64
                | Kind::UInt64
                | Kind::Float32
                | Kind::Float64
                | Kind::Extended
                | Kind::DateTime
        )
    }
}

/// A dynamically-typed scalar. See the module docs for conversion rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(u8),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Extended(f64),
    DateTime(f64),
    Str(String),
    Handle(u64),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// The active type tag.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Byte(_) => Kind::Byte,
            Value::Int32(_) => Kind::Int32,
            Value::UInt32(_) => Kind::UInt32,
            Value::Int64(_) => Kind::Int64,
            Value::UInt64(_) => Kind::UInt64,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Extended(_) => Kind::Extended,
            Value::DateTime(_) => Kind::DateTime,
            Value::Str(_) => Kind::Str,
            Value::Handle(_) => Kind::Handle,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // ── typed getters (lossy on tag mismatch, error only on null) ──────

    pub fn as_bool(&self) -> NodeResult<bool> {
        self.check_not_null()?;
        Ok(self.truthy())
    }

    pub fn as_byte(&self) -> NodeResult<u8> {
        self.check_not_null()?;
        Ok(self.to_u64_lossy() as u8)
    }

    pub fn as_i32(&self) -> NodeResult<i32> {
        self.check_not_null()?;
        Ok(self.to_i64_lossy() as i32)
    }

    pub fn as_u32(&self) -> NodeResult<u32> {
        self.check_not_null()?;
        Ok(self.to_u64_lossy() as u32)
    }

    pub fn as_i64(&self) -> NodeResult<i64> {
        self.check_not_null()?;
        Ok(self.to_i64_lossy())
    }

    pub fn as_u64(&self) -> NodeResult<u64> {
        self.check_not_null()?;
        Ok(self.to_u64_lossy())
    }

    pub fn as_f32(&self) -> NodeResult<f32> {
        self.check_not_null()?;
        Ok(self.to_f64_lossy() as f32)
    }

    pub fn as_f64(&self) -> NodeResult<f64> {
        self.check_not_null()?;
        Ok(self.to_f64_lossy())
    }

    /// Extended-precision read; in memory this is an f64.
    pub fn as_extended(&self) -> NodeResult<f64> {
        self.check_not_null()?;
        Ok(self.to_f64_lossy())
    }

    /// Timestamp read, in fractional Unix seconds. Strings are parsed as
    /// RFC 3339; an unparseable string reads as 0.
    pub fn as_datetime(&self) -> NodeResult<f64> {
        self.check_not_null()?;
        match self {
            Value::Str(s) => Ok(rfc3339_to_secs(s).unwrap_or(0.0)),
            other => Ok(other.to_f64_lossy()),
        }
    }

    /// String read; non-string tags render through their canonical text form.
    pub fn as_string(&self) -> NodeResult<String> {
        self.check_not_null()?;
        Ok(self.render())
    }

    /// Borrowing accessor for string values only; other tags report the
    /// mismatch instead of allocating a converted copy.
    pub fn as_str(&self) -> NodeResult<&str> {
        match self {
            Value::Null => Err(NodeError::NullAccess),
            Value::Str(s) => Ok(s),
            other => Err(NodeError::WrongKind {
                expected: Kind::Str.name(),
                found: other.kind().name(),
            }),
        }
    }

    pub fn as_handle(&self) -> NodeResult<u64> {
        match self {
            Value::Null => Err(NodeError::NullAccess),
            Value::Handle(h) => Ok(*h),
            Value::UInt64(u) => Ok(*u),
            other => Err(NodeError::Unconvertible {
                from: other.kind().name(),
                to: Kind::Handle.name(),
            }),
        }
    }

    // ── conversion ─────────────────────────────────────────────────────

    /// Produce this value re-tagged as `target`, applying the lossy
    /// conversion rules. Converting null to anything but null is an error.
    pub fn coerce(&self, target: Kind) -> NodeResult<Value> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        if target == Kind::Null {
            return Ok(Value::Null);
        }
        self.check_not_null()?;
        Ok(match target {
            Kind::Bool => Value::Bool(self.truthy()),
            Kind::Byte => Value::Byte(self.to_u64_lossy() as u8),
            Kind::Int32 => Value::Int32(self.to_i64_lossy() as i32),
            Kind::UInt32 => Value::UInt32(self.to_u64_lossy() as u32),
            Kind::Int64 => Value::Int64(self.to_i64_lossy()),
            Kind::UInt64 => Value::UInt64(self.to_u64_lossy()),
            Kind::Float32 => Value::Float32(self.to_f64_lossy() as f32),
            Kind::Float64 => Value::Float64(self.to_f64_lossy()),
            Kind::Extended => Value::Extended(self.to_f64_lossy()),
            Kind::DateTime => Value::DateTime(self.as_datetime()?),
            Kind::Str => Value::Str(self.render()),
            Kind::Handle => Value::Handle(self.as_handle()?),
            Kind::Null | Kind::Node => {
                return Err(NodeError::Unconvertible {
                    from: self.kind().name(),
                    to: target.name(),
                })
            }
        })
    }

    /// In-place lossy retag.
    pub fn convert_to(&mut self, target: Kind) -> NodeResult<()> {
        *self = self.coerce(target)?;
        Ok(())
    }

    /// Structural equality across tags: identical tags compare directly,
    /// numeric tags compare as numbers, everything else falls back to
    /// comparing the string rendition of both sides.
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        if self.kind() == other.kind() {
            return self == other;
        }
        if self.is_null() || other.is_null() {
            return false;
        }
        let (a, b) = (self.kind(), other.kind());
        if a.is_numeric() && b.is_numeric() {
            return match (self.integer_repr(), other.integer_repr()) {
                (Some(x), Some(y)) => x == y,
                _ => self.to_f64_lossy() == other.to_f64_lossy(),
            };
        }
        self.render() == other.render()
    }

    /// Canonical text form, used for string conversion and as the equality
    /// fallback.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Byte(v) => v.to_string(),
            Value::Int32(v) => v.to_string(),
            Value::UInt32(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::UInt64(v) => v.to_string(),
            Value::Float32(v) => v.to_string(),
            Value::Float64(v) | Value::Extended(v) => v.to_string(),
            Value::DateTime(secs) => datetime_to_rfc3339(*secs),
            Value::Str(s) => s.clone(),
            Value::Handle(h) => format!("{h:#x}"),
        }
    }

    // ── internal lossy views ───────────────────────────────────────────

    fn check_not_null(&self) -> NodeResult<()> {
        if self.is_null() {
            Err(NodeError::NullAccess)
        } else {
            Ok(())
        }
    }

    /// Boolean reading: numbers are true when nonzero; strings use the
    /// first character (`T`, `t`, `1` mean true).
    fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Byte(v) => *v != 0,
            Value::Int32(v) => *v != 0,
            Value::UInt32(v) => *v != 0,
            Value::Int64(v) => *v != 0,
            Value::UInt64(v) => *v != 0,
            Value::Float32(v) => *v != 0.0,
            Value::Float64(v) | Value::Extended(v) | Value::DateTime(v) => *v != 0.0,
            Value::Str(s) => matches!(s.chars().next(), Some('T' | 't' | '1')),
            Value::Handle(h) => *h != 0,
        }
    }

    fn to_i64_lossy(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => i64::from(*b),
            Value::Byte(v) => i64::from(*v),
            Value::Int32(v) => i64::from(*v),
            Value::UInt32(v) => i64::from(*v),
            Value::Int64(v) => *v,
            Value::UInt64(v) => *v as i64,
            Value::Float32(v) => *v as i64,
            Value::Float64(v) | Value::Extended(v) | Value::DateTime(v) => *v as i64,
            Value::Str(s) => parse_i64(s),
            Value::Handle(h) => *h as i64,
        }
    }

    fn to_u64_lossy(&self) -> u64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => u64::from(*b),
            Value::Byte(v) => u64::from(*v),
            Value::Int32(v) => *v as u64,
            Value::UInt32(v) => u64::from(*v),
            Value::Int64(v) => *v as u64,
            Value::UInt64(v) => *v,
            Value::Float32(v) => *v as u64,
            Value::Float64(v) | Value::Extended(v) | Value::DateTime(v) => *v as u64,
            Value::Str(s) => parse_i64(s) as u64,
            Value::Handle(h) => *h,
        }
    }

    pub(crate) fn to_f64_lossy(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Byte(v) => f64::from(*v),
            Value::Int32(v) => f64::from(*v),
            Value::UInt32(v) => f64::from(*v),
            Value::Int64(v) => *v as f64,
            Value::UInt64(v) => *v as f64,
            Value::Float32(v) => f64::from(*v),
            Value::Float64(v) | Value::Extended(v) | Value::DateTime(v) => *v,
            Value::Str(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Handle(h) => *h as f64,
        }
    }

    /// Exact signed-128 view for integer-tagged values; None for floats.
    pub(crate) fn integer_repr(&self) -> Option<i128> {
        match self {
            Value::Byte(v) => Some(i128::from(*v)),
            Value::Int32(v) => Some(i128::from(*v)),
            Value::UInt32(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }
}

// ── setters via From ───────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}
impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}
impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl Value {
    /// Timestamp constructor (fractional Unix seconds).
    #[must_use]
    pub fn datetime(secs: f64) -> Self {
        Value::DateTime(secs)
    }

    /// Extended-precision constructor.
    #[must_use]
    pub fn extended(v: f64) -> Self {
        Value::Extended(v)
    }

    /// Opaque handle constructor.
    #[must_use]
    pub fn handle(h: u64) -> Self {
        Value::Handle(h)
    }
}

/// Integer parse with float fallback; unparseable text reads as zero.
fn parse_i64(s: &str) -> i64 {
    let t = s.trim();
    if let Ok(v) = t.parse::<i64>() {
        return v;
    }
    t.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Render fractional Unix seconds as RFC 3339 (UTC). Out-of-range values
/// fall back to the plain number.
pub(crate) fn datetime_to_rfc3339(secs: f64) -> String {
    if !secs.is_finite() {
        return secs.to_string();
    }
    let mut whole = secs.div_euclid(1.0) as i64;
    let mut nanos = (secs.rem_euclid(1.0) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        whole += 1;
        nanos = 0;
    }
    match ChronoDateTime::<Utc>::from_timestamp(whole, nanos) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        None => secs.to_string(),
    }
}

/// Parse an RFC 3339 timestamp into fractional Unix seconds.
pub(crate) fn rfc3339_to_secs(s: &str) -> Option<f64> {
    let dt = ChronoDateTime::parse_from_rfc3339(s.trim()).ok()?;
    Some(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_access_is_an_error() {
        assert_eq!(Value::Null.as_i32(), Err(NodeError::NullAccess));
        assert_eq!(Value::Null.as_string(), Err(NodeError::NullAccess));
        assert_eq!(Value::Null.as_bool(), Err(NodeError::NullAccess));
    }

    #[test]
    fn numeric_narrowing_truncates() {
        assert_eq!(Value::Float64(3.9).as_i32().unwrap(), 3);
        assert_eq!(Value::Int64(0x1_0000_0001).as_i32().unwrap(), 1);
        assert_eq!(Value::Int32(-1).as_u32().unwrap(), u32::MAX);
    }

    #[test]
    fn string_parses_to_numbers() {
        assert_eq!(Value::from(" 42 ").as_i64().unwrap(), 42);
        assert_eq!(Value::from("3.75").as_f64().unwrap(), 3.75);
        assert_eq!(Value::from("3.75").as_i64().unwrap(), 3);
        assert_eq!(Value::from("not a number").as_i64().unwrap(), 0);
    }

    #[test]
    fn bool_from_first_character() {
        assert!(Value::from("True").as_bool().unwrap());
        assert!(Value::from("t").as_bool().unwrap());
        assert!(Value::from("1 of them").as_bool().unwrap());
        assert!(!Value::from("false").as_bool().unwrap());
        assert!(!Value::from("yes").as_bool().unwrap());
    }

    #[test]
    fn convert_in_place_retags() {
        let mut v = Value::from("12");
        v.convert_to(Kind::Int32).unwrap();
        assert_eq!(v, Value::Int32(12));
        v.convert_to(Kind::Str).unwrap();
        assert_eq!(v, Value::Str("12".to_string()));
    }

    #[test]
    fn convert_null_fails_except_to_null() {
        assert_eq!(
            Value::Null.coerce(Kind::Int32),
            Err(NodeError::NullAccess)
        );
        assert_eq!(Value::Null.coerce(Kind::Null).unwrap(), Value::Null);
    }

    #[test]
    fn loose_eq_compares_across_numeric_tags() {
        assert!(Value::Int32(5).loose_eq(&Value::Int64(5)));
        assert!(Value::Byte(5).loose_eq(&Value::Float64(5.0)));
        assert!(!Value::Int32(5).loose_eq(&Value::Int64(6)));
        // u64 values above i64::MAX must not alias negative i64s
        assert!(!Value::UInt64(u64::MAX).loose_eq(&Value::Int64(-1)));
    }

    #[test]
    fn loose_eq_string_fallback() {
        assert!(Value::from("true").loose_eq(&Value::Bool(true)));
        assert!(Value::from("5").loose_eq(&Value::Int32(5)));
        assert!(!Value::from("05").loose_eq(&Value::Int32(5)));
    }

    #[test]
    fn datetime_string_roundtrip() {
        let secs = 1_700_000_000.5;
        let rendered = Value::DateTime(secs).render();
        let parsed = Value::Str(rendered).as_datetime().unwrap();
        assert!((parsed - secs).abs() < 1e-6);
    }

    #[test]
    fn handle_only_converts_from_addresses() {
        assert_eq!(Value::handle(0xdead).as_handle().unwrap(), 0xdead);
        assert_eq!(Value::UInt64(7).as_handle().unwrap(), 7);
        assert!(Value::from("7").as_handle().is_err());
    }
}
