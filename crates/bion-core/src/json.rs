//! Thin JSON adapter over `serde_json`.
//!
//! JSON parsing and generation are the external library's job; this module
//! only maps `serde_json::Value` to and from [`Node`] through Node's public
//! operations. Objects keep their insertion order (`preserve_order`).
//! Uniform primitive arrays land in packed storage; mixed arrays become
//! node-backed.

use crate::error::{BionError, BionResult};
use crate::node::Node;
use crate::value::{Kind, Value};
use serde_json::{Map, Number, Value as JsonValue};

/// Parse a JSON document into a Node tree.
pub fn from_json(text: &str) -> BionResult<Node> {
    let parsed: JsonValue = serde_json::from_str(text)?;
    json_to_node(&parsed)
}

/// Render a Node tree as a compact JSON document.
///
/// Non-finite floats render as null; handles have no JSON form and error.
/// Duplicate names in a map-style Parent collapse to the last occurrence,
/// as JSON objects cannot express them.
pub fn to_json(node: &Node) -> BionResult<String> {
    Ok(serde_json::to_string(&node_to_json(node)?)?)
}

fn json_to_node(v: &JsonValue) -> BionResult<Node> {
    Ok(match v {
        JsonValue::Null => Node::null(),
        JsonValue::Bool(b) => Node::scalar(*b),
        JsonValue::Number(n) => Node::Scalar(number_to_value(n)),
        JsonValue::String(s) => Node::scalar(s.as_str()),
        JsonValue::Array(items) => {
            let mut node = Node::null();
            match uniform_kind(items) {
                Some(kind) => {
                    let arr = node.set_as_array(kind)?;
                    for item in items {
                        match item {
                            JsonValue::Bool(b) => arr.push_value(&Value::Bool(*b))?,
                            JsonValue::Number(n) => arr.push_value(&number_to_value(n))?,
                            JsonValue::String(s) => {
                                arr.push_value(&Value::Str(s.clone()))?
                            }
                            _ => {}
                        }
                    }
                }
                None => {
                    let arr = node.set_as_array(Kind::Node)?;
                    for item in items {
                        arr.push_node(json_to_node(item)?)?;
                    }
                }
            }
            node
        }
        JsonValue::Object(map) => {
            let mut node = Node::null();
            let parent = node.set_as_parent();
            for (key, child) in map {
                parent.append(key, json_to_node(child)?);
            }
            node
        }
    })
}

/// Packed element kind for an all-primitive uniform array, if any.
fn uniform_kind(items: &[JsonValue]) -> Option<Kind> {
    if items.is_empty() {
        return None;
    }
    if items.iter().all(|v| matches!(v, JsonValue::Bool(_))) {
        return Some(Kind::Bool);
    }
    if items
        .iter()
        .all(|v| matches!(v, JsonValue::Number(n) if n.as_i64().is_some()))
    {
        return Some(Kind::Int64);
    }
    if items.iter().all(|v| matches!(v, JsonValue::Number(_))) {
        return Some(Kind::Float64);
    }
    if items.iter().all(|v| matches!(v, JsonValue::String(_))) {
        return Some(Kind::Str);
    }
    None
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int64(i)
    } else if let Some(u) = n.as_u64() {
        Value::UInt64(u)
    } else {
        Value::Float64(n.as_f64().unwrap_or(0.0))
    }
}

fn node_to_json(node: &Node) -> BionResult<JsonValue> {
    Ok(match node {
        Node::Scalar(v) => value_to_json(v)?,
        Node::Parent(c) if c.is_map() => {
            let mut map = Map::new();
            for i in 0..c.len() {
                let name = c.name_at(i).unwrap_or("").to_string();
                map.insert(name, node_to_json(c.at(i)?)?);
            }
            JsonValue::Object(map)
        }
        Node::Parent(c) => {
            let mut items = Vec::with_capacity(c.len());
            for i in 0..c.len() {
                items.push(node_to_json(c.at(i)?)?);
            }
            JsonValue::Array(items)
        }
        Node::Array(a) => {
            let mut items = Vec::with_capacity(a.len());
            for i in 0..a.len() {
                match a.node_at(i) {
                    Ok(child) => items.push(node_to_json(child)?),
                    Err(_) => items.push(value_to_json(&a.value_at(i)?)?),
                }
            }
            JsonValue::Array(items)
        }
    })
}

fn value_to_json(v: &Value) -> BionResult<JsonValue> {
    Ok(match v {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Byte(x) => JsonValue::Number(Number::from(u64::from(*x))),
        Value::Int32(x) => JsonValue::Number(Number::from(i64::from(*x))),
        Value::UInt32(x) => JsonValue::Number(Number::from(u64::from(*x))),
        Value::Int64(x) => JsonValue::Number(Number::from(*x)),
        Value::UInt64(x) => JsonValue::Number(Number::from(*x)),
        Value::Float32(x) => float_to_json(f64::from(*x)),
        Value::Float64(x) | Value::Extended(x) | Value::DateTime(x) => float_to_json(*x),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Handle(_) => {
            return Err(BionError::Unserializable {
                kind: Kind::Handle.name(),
            })
        }
    })
}

/// NaN and infinities are not representable in JSON; they become null.
fn float_to_json(x: f64) -> JsonValue {
    Number::from_f64(x).map_or(JsonValue::Null, JsonValue::Number)
}
