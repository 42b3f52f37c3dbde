//! Element storage strategies for Array nodes.
//!
//! An Array is homogeneous: its element kind is recorded once, at the array
//! level. Scalar kinds are stored packed in a native vector (no per-element
//! boxing); the element kind [`Kind::Node`] switches to a vector of full
//! nodes, which is how heterogeneous arrays are expressed.
//!
//! Changing the element kind of a packed array is a re-materialization: the
//! storage is replaced, not retagged in place.

use crate::error::{NodeError, NodeResult};
use crate::node::Node;
use crate::value::{Kind, Value};

/// Backing storage for an Array node, one variant per element kind.
#[derive(Debug, Clone)]
pub enum ArrayData {
    Bool(Vec<bool>),
    Byte(Vec<u8>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    DateTime(Vec<f64>),
    Str(Vec<String>),
    /// Heterogeneous elements: each one is a full Node.
    Nodes(Vec<Node>),
}

impl ArrayData {
    /// Empty storage for the given element kind. Extended-precision elements
    /// pack as f64 in memory (they widen again on the wire). Null and handle
    /// elements have no array form.
    pub fn new(kind: Kind) -> NodeResult<Self> {
        Ok(match kind {
            Kind::Bool => ArrayData::Bool(Vec::new()),
            Kind::Byte => ArrayData::Byte(Vec::new()),
            Kind::Int32 => ArrayData::Int32(Vec::new()),
            Kind::UInt32 => ArrayData::UInt32(Vec::new()),
            Kind::Int64 => ArrayData::Int64(Vec::new()),
            Kind::UInt64 => ArrayData::UInt64(Vec::new()),
            Kind::Float32 => ArrayData::Float32(Vec::new()),
            Kind::Float64 | Kind::Extended => ArrayData::Float64(Vec::new()),
            Kind::DateTime => ArrayData::DateTime(Vec::new()),
            Kind::Str => ArrayData::Str(Vec::new()),
            Kind::Node => ArrayData::Nodes(Vec::new()),
            Kind::Null | Kind::Handle => {
                return Err(NodeError::Unconvertible {
                    from: kind.name(),
                    to: "array element",
                })
            }
        })
    }

    /// The declared element kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            ArrayData::Bool(_) => Kind::Bool,
            ArrayData::Byte(_) => Kind::Byte,
            ArrayData::Int32(_) => Kind::Int32,
            ArrayData::UInt32(_) => Kind::UInt32,
            ArrayData::Int64(_) => Kind::Int64,
            ArrayData::UInt64(_) => Kind::UInt64,
            ArrayData::Float32(_) => Kind::Float32,
            ArrayData::Float64(_) => Kind::Float64,
            ArrayData::DateTime(_) => Kind::DateTime,
            ArrayData::Str(_) => Kind::Str,
            ArrayData::Nodes(_) => Kind::Node,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::Byte(v) => v.len(),
            ArrayData::Int32(v) => v.len(),
            ArrayData::UInt32(v) => v.len(),
            ArrayData::Int64(v) => v.len(),
            ArrayData::UInt64(v) => v.len(),
            ArrayData::Float32(v) => v.len(),
            ArrayData::Float64(v) => v.len(),
            ArrayData::DateTime(v) => v.len(),
            ArrayData::Str(v) => v.len(),
            ArrayData::Nodes(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_pos(&self, pos: usize) -> NodeResult<()> {
        if pos >= self.len() {
            Err(NodeError::OutOfBounds {
                index: pos,
                len: self.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Boxed element read. Node-backed elements must be scalars to read this
    /// way; containers are reached through [`ArrayData::node_at`].
    pub fn value_at(&self, pos: usize) -> NodeResult<Value> {
        self.check_pos(pos)?;
        Ok(match self {
            ArrayData::Bool(v) => Value::Bool(v[pos]),
            ArrayData::Byte(v) => Value::Byte(v[pos]),
            ArrayData::Int32(v) => Value::Int32(v[pos]),
            ArrayData::UInt32(v) => Value::UInt32(v[pos]),
            ArrayData::Int64(v) => Value::Int64(v[pos]),
            ArrayData::UInt64(v) => Value::UInt64(v[pos]),
            ArrayData::Float32(v) => Value::Float32(v[pos]),
            ArrayData::Float64(v) => Value::Float64(v[pos]),
            ArrayData::DateTime(v) => Value::DateTime(v[pos]),
            ArrayData::Str(v) => Value::Str(v[pos].clone()),
            ArrayData::Nodes(v) => return v[pos].value().cloned(),
        })
    }

    /// Element as a node reference; only node-backed arrays can hand one out.
    pub fn node_at(&self, pos: usize) -> NodeResult<&Node> {
        self.check_pos(pos)?;
        match self {
            ArrayData::Nodes(v) => Ok(&v[pos]),
            other => Err(NodeError::WrongKind {
                expected: Kind::Node.name(),
                found: other.kind().name(),
            }),
        }
    }

    pub fn node_at_mut(&mut self, pos: usize) -> NodeResult<&mut Node> {
        self.check_pos(pos)?;
        match self {
            ArrayData::Nodes(v) => Ok(&mut v[pos]),
            other => Err(NodeError::WrongKind {
                expected: Kind::Node.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// Overwrite an element, coercing the value to the element kind.
    pub fn set_value(&mut self, pos: usize, value: &Value) -> NodeResult<()> {
        self.check_pos(pos)?;
        match self {
            ArrayData::Bool(v) => v[pos] = value.as_bool()?,
            ArrayData::Byte(v) => v[pos] = value.as_byte()?,
            ArrayData::Int32(v) => v[pos] = value.as_i32()?,
            ArrayData::UInt32(v) => v[pos] = value.as_u32()?,
            ArrayData::Int64(v) => v[pos] = value.as_i64()?,
            ArrayData::UInt64(v) => v[pos] = value.as_u64()?,
            ArrayData::Float32(v) => v[pos] = value.as_f32()?,
            ArrayData::Float64(v) => v[pos] = value.as_f64()?,
            ArrayData::DateTime(v) => v[pos] = value.as_datetime()?,
            ArrayData::Str(v) => v[pos] = value.as_string()?,
            ArrayData::Nodes(v) => v[pos] = Node::Scalar(value.clone()),
        }
        Ok(())
    }

    /// Append an element, coercing the value to the element kind.
    pub fn push_value(&mut self, value: &Value) -> NodeResult<()> {
        match self {
            ArrayData::Bool(v) => v.push(value.as_bool()?),
            ArrayData::Byte(v) => v.push(value.as_byte()?),
            ArrayData::Int32(v) => v.push(value.as_i32()?),
            ArrayData::UInt32(v) => v.push(value.as_u32()?),
            ArrayData::Int64(v) => v.push(value.as_i64()?),
            ArrayData::UInt64(v) => v.push(value.as_u64()?),
            ArrayData::Float32(v) => v.push(value.as_f32()?),
            ArrayData::Float64(v) => v.push(value.as_f64()?),
            ArrayData::DateTime(v) => v.push(value.as_datetime()?),
            ArrayData::Str(v) => v.push(value.as_string()?),
            ArrayData::Nodes(v) => v.push(Node::Scalar(value.clone())),
        }
        Ok(())
    }

    /// Insert an element at a position (`pos == len` appends).
    pub fn insert_value(&mut self, pos: usize, value: &Value) -> NodeResult<()> {
        let len = self.len();
        if pos > len {
            return Err(NodeError::OutOfBounds { index: pos, len });
        }
        match self {
            ArrayData::Bool(v) => v.insert(pos, value.as_bool()?),
            ArrayData::Byte(v) => v.insert(pos, value.as_byte()?),
            ArrayData::Int32(v) => v.insert(pos, value.as_i32()?),
            ArrayData::UInt32(v) => v.insert(pos, value.as_u32()?),
            ArrayData::Int64(v) => v.insert(pos, value.as_i64()?),
            ArrayData::UInt64(v) => v.insert(pos, value.as_u64()?),
            ArrayData::Float32(v) => v.insert(pos, value.as_f32()?),
            ArrayData::Float64(v) => v.insert(pos, value.as_f64()?),
            ArrayData::DateTime(v) => v.insert(pos, value.as_datetime()?),
            ArrayData::Str(v) => v.insert(pos, value.as_string()?),
            ArrayData::Nodes(v) => v.insert(pos, Node::Scalar(value.clone())),
        }
        Ok(())
    }

    /// Append a full node; only node-backed arrays accept one.
    pub fn push_node(&mut self, node: Node) -> NodeResult<()> {
        match self {
            ArrayData::Nodes(v) => {
                v.push(node);
                Ok(())
            }
            other => Err(NodeError::WrongKind {
                expected: Kind::Node.name(),
                found: other.kind().name(),
            }),
        }
    }

    pub fn erase_at(&mut self, pos: usize) -> NodeResult<()> {
        self.check_pos(pos)?;
        match self {
            ArrayData::Bool(v) => {
                v.remove(pos);
            }
            ArrayData::Byte(v) => {
                v.remove(pos);
            }
            ArrayData::Int32(v) => {
                v.remove(pos);
            }
            ArrayData::UInt32(v) => {
                v.remove(pos);
            }
            ArrayData::Int64(v) => {
                v.remove(pos);
            }
            ArrayData::UInt64(v) => {
                v.remove(pos);
            }
            ArrayData::Float32(v) => {
                v.remove(pos);
            }
            ArrayData::Float64(v) => {
                v.remove(pos);
            }
            ArrayData::DateTime(v) => {
                v.remove(pos);
            }
            ArrayData::Str(v) => {
                v.remove(pos);
            }
            ArrayData::Nodes(v) => {
                v.remove(pos);
            }
        }
        Ok(())
    }

    /// Native ascending sort, POD element kinds only. The packed vectors
    /// sort without boxing a single element; string and node arrays have no
    /// direct `<` here and refuse.
    pub fn sort(&mut self) -> NodeResult<()> {
        match self {
            ArrayData::Bool(v) => v.sort_unstable(),
            ArrayData::Byte(v) => v.sort_unstable(),
            ArrayData::Int32(v) => v.sort_unstable(),
            ArrayData::UInt32(v) => v.sort_unstable(),
            ArrayData::Int64(v) => v.sort_unstable(),
            ArrayData::UInt64(v) => v.sort_unstable(),
            ArrayData::Float32(v) => v.sort_unstable_by(f32::total_cmp),
            ArrayData::Float64(v) | ArrayData::DateTime(v) => v.sort_unstable_by(f64::total_cmp),
            ArrayData::Str(_) | ArrayData::Nodes(_) => {
                return Err(NodeError::NotSortable {
                    kind: self.kind().name(),
                })
            }
        }
        Ok(())
    }

    /// Linear scan for the first element structurally equal to `value`.
    /// Container elements in a node-backed array never match a scalar.
    #[must_use]
    pub fn index_of_value(&self, value: &Value) -> Option<usize> {
        (0..self.len()).find(|&i| match self.value_at(i) {
            Ok(v) => v.loose_eq(value),
            Err(_) => false,
        })
    }

    /// Array elements carry no names, in either strategy; by-name lookup
    /// always misses.
    #[must_use]
    pub fn find_by_name(&self, _name: &str) -> Option<usize> {
        None
    }

    /// Re-materialize the storage for a new element kind. Existing elements
    /// are dropped; a packed vector cannot be retagged in place.
    pub fn set_kind(&mut self, kind: Kind) -> NodeResult<()> {
        *self = ArrayData::new(kind)?;
        Ok(())
    }
}
