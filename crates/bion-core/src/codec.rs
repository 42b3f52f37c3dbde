//! Node ⇄ BION bridge: the tree walker and the tree builder.
//!
//! Both sides go through the codec's abstract seams: the walker drives any
//! [`TreeSink`] (usually a [`StructWriter`]), and [`NodeBuilder`] implements
//! the reader's [`BionEvents`] receiver. [`encode`] and [`decode`] wrap the
//! whole pipeline for the common in-memory case.
//!
//! Wire-shape decisions made here:
//! - packed arrays with elements travel as fixed-type arrays; node-backed
//!   and string arrays fall back to generic self-describing arrays
//! - list-style Parents travel as generic arrays (their children have no
//!   names, and an empty name on the wire would read as a struct-end byte)
//! - timestamps travel as f64; handles do not travel at all

use crate::array::ArrayData;
use crate::bion::reader::{BionEvents, BionReader, SliceInput};
use crate::bion::visitor::{StructWriter, TreeSink};
use crate::container::Container;
use crate::error::{BionError, BionResult};
use crate::node::Node;
use crate::value::{Kind, Value};

impl Node {
    /// Walk this tree into any [`TreeSink`].
    pub fn stream_to<S: TreeSink>(&self, sink: &mut S) -> BionResult<()> {
        stream_node(self, sink)
    }
}

fn stream_node<S: TreeSink>(node: &Node, sink: &mut S) -> BionResult<()> {
    match node {
        Node::Scalar(v) => stream_value(v, sink),
        Node::Parent(c) if c.is_map() => {
            sink.begin_map()?;
            for i in 0..c.len() {
                sink.key(c.name_at(i).unwrap_or(""))?;
                stream_node(c.at(i)?, sink)?;
            }
            sink.end_map()
        }
        Node::Parent(c) => {
            sink.begin_array()?;
            for i in 0..c.len() {
                stream_node(c.at(i)?, sink)?;
            }
            sink.end_array()
        }
        Node::Array(a) => stream_array(a, sink),
    }
}

fn stream_array<S: TreeSink>(a: &ArrayData, sink: &mut S) -> BionResult<()> {
    sink.begin_array_of(a.kind(), a.len())?;
    match a {
        ArrayData::Bool(v) => {
            for &x in v {
                sink.value_bool(x)?;
            }
        }
        ArrayData::Byte(v) => {
            for &x in v {
                sink.value_byte(x)?;
            }
        }
        ArrayData::Int32(v) => {
            for &x in v {
                sink.value_i32(x)?;
            }
        }
        ArrayData::UInt32(v) => {
            for &x in v {
                sink.value_u32(x)?;
            }
        }
        ArrayData::Int64(v) => {
            for &x in v {
                sink.value_i64(x)?;
            }
        }
        ArrayData::UInt64(v) => {
            for &x in v {
                sink.value_u64(x)?;
            }
        }
        ArrayData::Float32(v) => {
            for &x in v {
                sink.value_f32(x)?;
            }
        }
        ArrayData::Float64(v) => {
            for &x in v {
                sink.value_f64(x)?;
            }
        }
        ArrayData::DateTime(v) => {
            for &x in v {
                sink.value_datetime(x)?;
            }
        }
        ArrayData::Str(v) => {
            for x in v {
                sink.value_str(x)?;
            }
        }
        ArrayData::Nodes(v) => {
            for child in v {
                stream_node(child, sink)?;
            }
        }
    }
    sink.end_array()
}

fn stream_value<S: TreeSink>(v: &Value, sink: &mut S) -> BionResult<()> {
    match v {
        Value::Null => sink.value_null(),
        Value::Bool(b) => sink.value_bool(*b),
        Value::Byte(x) => sink.value_byte(*x),
        Value::Int32(x) => sink.value_i32(*x),
        Value::UInt32(x) => sink.value_u32(*x),
        Value::Int64(x) => sink.value_i64(*x),
        Value::UInt64(x) => sink.value_u64(*x),
        Value::Float32(x) => sink.value_f32(*x),
        Value::Float64(x) => sink.value_f64(*x),
        Value::Extended(x) => sink.value_extended(*x),
        Value::DateTime(x) => sink.value_datetime(*x),
        Value::Str(s) => sink.value_str(s),
        Value::Handle(_) => Err(BionError::Unserializable {
            kind: Kind::Handle.name(),
        }),
    }
}

/// Event receiver that re-materializes a Node tree.
///
/// Objects become map-style Parents; generic arrays become node-backed
/// arrays; fixed-type arrays become packed arrays of the announced kind.
/// The first completed top-level value is the result; an empty stream
/// yields null.
#[derive(Default)]
pub struct NodeBuilder {
    roots: Vec<Node>,
    stack: Vec<Frame>,
    /// Key waiting for the value that follows it. Containers capture it
    /// into their frame at begin time, since their children's keys reuse
    /// this slot while the container is still open.
    pending_name: Option<String>,
}

struct Frame {
    name: Option<String>,
    shape: Shape,
}

enum Shape {
    Object(Container),
    Array(ArrayData),
}

impl NodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        NodeBuilder::default()
    }

    /// The built tree.
    #[must_use]
    pub fn finish(mut self) -> Node {
        if self.roots.is_empty() {
            Node::null()
        } else {
            self.roots.swap_remove(0)
        }
    }

    fn attach(&mut self, name: Option<String>, node: Node) -> BionResult<()> {
        match self.stack.last_mut() {
            Some(Frame {
                shape: Shape::Object(c),
                ..
            }) => {
                c.append(&name.unwrap_or_default(), node);
                Ok(())
            }
            Some(Frame {
                shape: Shape::Array(a),
                ..
            }) => match a {
                ArrayData::Nodes(_) => {
                    a.push_node(node)?;
                    Ok(())
                }
                packed => {
                    packed.push_value(node.value()?)?;
                    Ok(())
                }
            },
            None => {
                self.roots.push(node);
                Ok(())
            }
        }
    }

    fn attach_value(&mut self, v: Value) -> BionResult<()> {
        let name = self.pending_name.take();
        self.attach(name, Node::Scalar(v))
    }

    fn close_frame(&mut self) -> BionResult<()> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let node = match frame.shape {
            Shape::Object(c) => Node::Parent(c),
            Shape::Array(a) => Node::Array(a),
        };
        self.attach(frame.name, node)
    }
}

impl BionEvents for NodeBuilder {
    fn on_object_begin(&mut self) -> BionResult<()> {
        self.stack.push(Frame {
            name: self.pending_name.take(),
            shape: Shape::Object(Container::new_map()),
        });
        Ok(())
    }

    fn on_object_end(&mut self) -> BionResult<()> {
        self.close_frame()
    }

    fn on_array_begin(&mut self) -> BionResult<()> {
        self.stack.push(Frame {
            name: self.pending_name.take(),
            shape: Shape::Array(ArrayData::new(Kind::Node)?),
        });
        Ok(())
    }

    fn on_fixed_array_begin(&mut self, kind: Kind, count: usize) -> BionResult<()> {
        let _ = count;
        // zero-length element kinds have no packed storage; box them
        let storage = ArrayData::new(kind).or_else(|_| ArrayData::new(Kind::Node))?;
        self.stack.push(Frame {
            name: self.pending_name.take(),
            shape: Shape::Array(storage),
        });
        Ok(())
    }

    fn on_array_end(&mut self) -> BionResult<()> {
        self.close_frame()
    }

    fn on_key(&mut self, name: &str) -> BionResult<()> {
        self.pending_name = Some(name.to_string());
        Ok(())
    }

    fn on_null(&mut self) -> BionResult<()> {
        self.attach_value(Value::Null)
    }

    fn on_bool(&mut self, v: bool) -> BionResult<()> {
        self.attach_value(Value::Bool(v))
    }

    fn on_byte(&mut self, v: u8) -> BionResult<()> {
        self.attach_value(Value::Byte(v))
    }

    fn on_i32(&mut self, v: i32) -> BionResult<()> {
        self.attach_value(Value::Int32(v))
    }

    fn on_u32(&mut self, v: u32) -> BionResult<()> {
        self.attach_value(Value::UInt32(v))
    }

    fn on_i64(&mut self, v: i64) -> BionResult<()> {
        self.attach_value(Value::Int64(v))
    }

    fn on_u64(&mut self, v: u64) -> BionResult<()> {
        self.attach_value(Value::UInt64(v))
    }

    fn on_f32(&mut self, v: f32) -> BionResult<()> {
        self.attach_value(Value::Float32(v))
    }

    fn on_f64(&mut self, v: f64) -> BionResult<()> {
        self.attach_value(Value::Float64(v))
    }

    fn on_extended(&mut self, v: f64) -> BionResult<()> {
        self.attach_value(Value::Extended(v))
    }

    fn on_string(&mut self, v: &str) -> BionResult<()> {
        self.attach_value(Value::Str(v.to_string()))
    }
}

/// Encode a tree into a complete in-memory BION stream (header + footer).
pub fn encode(node: &Node) -> BionResult<Vec<u8>> {
    let mut sink = StructWriter::new(Vec::new());
    sink.write_header()?;
    node.stream_to(&mut sink)?;
    sink.write_footer()?;
    Ok(sink.into_inner())
}

/// Decode a complete in-memory BION stream back into a tree.
pub fn decode(bytes: &[u8]) -> BionResult<Node> {
    let mut reader = BionReader::new(SliceInput::new(bytes));
    let mut builder = NodeBuilder::new();
    reader.process(&mut builder)?;
    Ok(builder.finish())
}
