//! The Node tree value.
//!
//! A [`Node`] is a [`Value`] extended with two container shapes: Parent
//! (named/positional children behind a [`Container`] strategy) and Array
//! (homogeneous elements behind an [`ArrayData`] strategy). Exactly one of
//! scalar, Parent, Array is active at a time; the container-forming
//! operations replace whatever was there before.
//!
//! Nodes own their subtree exclusively: cloning is a deep structural copy,
//! [`Node::take`] moves the backing storage out and leaves null behind, and
//! there are no shared or back references. The tree is a tree, not a graph.

use crate::array::ArrayData;
use crate::container::Container;
use crate::error::{NodeError, NodeResult};
use crate::value::{Kind, Value};

/// A dynamically-typed tree value: scalar, Parent, or Array.
#[derive(Debug, Clone)]
pub enum Node {
    Scalar(Value),
    Parent(Container),
    Array(ArrayData),
}

impl Default for Node {
    fn default() -> Self {
        Node::Scalar(Value::Null)
    }
}

impl Node {
    /// A fresh null node.
    #[must_use]
    pub fn null() -> Self {
        Node::default()
    }

    /// Scalar constructor.
    #[must_use]
    pub fn scalar(v: impl Into<Value>) -> Self {
        Node::Scalar(v.into())
    }

    /// Shape name for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(v) => v.kind().name(),
            Node::Parent(_) => "parent",
            Node::Array(_) => "array",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Value::Null))
    }

    #[must_use]
    pub fn is_parent(&self) -> bool {
        matches!(self, Node::Parent(_))
    }

    /// True for a Parent whose strategy supports name lookup.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Node::Parent(c) if c.is_map())
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    /// Children or elements held, zero for scalars.
    #[must_use]
    pub fn child_count(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Parent(c) => c.len(),
            Node::Array(a) => a.len(),
        }
    }

    // ── scalar access ──────────────────────────────────────────────────

    /// The scalar payload; Parent and Array nodes have none.
    pub fn value(&self) -> NodeResult<&Value> {
        match self {
            Node::Scalar(v) => Ok(v),
            other => Err(NodeError::WrongKind {
                expected: "scalar",
                found: other.kind_name(),
            }),
        }
    }

    pub fn value_mut(&mut self) -> NodeResult<&mut Value> {
        match self {
            Node::Scalar(v) => Ok(v),
            other => Err(NodeError::WrongKind {
                expected: "scalar",
                found: other.kind_name(),
            }),
        }
    }

    pub fn as_bool(&self) -> NodeResult<bool> {
        self.value()?.as_bool()
    }
    pub fn as_byte(&self) -> NodeResult<u8> {
        self.value()?.as_byte()
    }
    pub fn as_i32(&self) -> NodeResult<i32> {
        self.value()?.as_i32()
    }
    pub fn as_u32(&self) -> NodeResult<u32> {
        self.value()?.as_u32()
    }
    pub fn as_i64(&self) -> NodeResult<i64> {
        self.value()?.as_i64()
    }
    pub fn as_u64(&self) -> NodeResult<u64> {
        self.value()?.as_u64()
    }
    pub fn as_f32(&self) -> NodeResult<f32> {
        self.value()?.as_f32()
    }
    pub fn as_f64(&self) -> NodeResult<f64> {
        self.value()?.as_f64()
    }
    pub fn as_datetime(&self) -> NodeResult<f64> {
        self.value()?.as_datetime()
    }
    pub fn as_string(&self) -> NodeResult<String> {
        self.value()?.as_string()
    }

    /// Replace this node with a scalar.
    pub fn set(&mut self, v: impl Into<Value>) {
        *self = Node::Scalar(v.into());
    }

    /// Reset to null, dropping any subtree.
    pub fn set_null(&mut self) {
        *self = Node::default();
    }

    // ── container forming ──────────────────────────────────────────────

    /// Become (or stay) a map-style Parent and expose its container.
    /// A prior scalar, array, or list-style backing is replaced.
    pub fn set_as_parent(&mut self) -> &mut Container {
        if !matches!(self, Node::Parent(c) if c.is_map()) {
            *self = Node::Parent(Container::new_map());
        }
        match self {
            Node::Parent(c) => c,
            _ => unreachable!(),
        }
    }

    /// Become (or stay) a list-style Parent and expose its container.
    pub fn set_as_list(&mut self) -> &mut Container {
        if !matches!(self, Node::Parent(c) if !c.is_map()) {
            *self = Node::Parent(Container::new_list());
        }
        match self {
            Node::Parent(c) => c,
            _ => unreachable!(),
        }
    }

    /// Become an Array of the given element kind and expose its storage.
    /// An existing array of the same kind is kept as-is; anything else is
    /// re-materialized empty.
    pub fn set_as_array(&mut self, kind: Kind) -> NodeResult<&mut ArrayData> {
        if !matches!(self, Node::Array(a) if a.kind() == kind) {
            *self = Node::Array(ArrayData::new(kind)?);
        }
        match self {
            Node::Array(a) => Ok(a),
            _ => unreachable!(),
        }
    }

    /// Move the value and subtree out, leaving null behind.
    pub fn take(&mut self) -> Node {
        std::mem::take(self)
    }

    // ── container access ───────────────────────────────────────────────

    pub fn parent(&self) -> NodeResult<&Container> {
        match self {
            Node::Parent(c) => Ok(c),
            other => Err(NodeError::NotAParent {
                found: other.kind_name(),
            }),
        }
    }

    pub fn parent_mut(&mut self) -> NodeResult<&mut Container> {
        match self {
            Node::Parent(c) => Ok(c),
            other => Err(NodeError::NotAParent {
                found: other.kind_name(),
            }),
        }
    }

    pub fn array(&self) -> NodeResult<&ArrayData> {
        match self {
            Node::Array(a) => Ok(a),
            other => Err(NodeError::NotAnArray {
                found: other.kind_name(),
            }),
        }
    }

    pub fn array_mut(&mut self) -> NodeResult<&mut ArrayData> {
        match self {
            Node::Array(a) => Ok(a),
            other => Err(NodeError::NotAnArray {
                found: other.kind_name(),
            }),
        }
    }

    /// First child with this name (map-style Parents only).
    pub fn child(&self, name: &str) -> NodeResult<&Node> {
        self.parent()?.get_by_name(name)
    }

    pub fn child_mut(&mut self, name: &str) -> NodeResult<&mut Node> {
        self.parent_mut()?.get_by_name_mut(name)
    }

    /// Child at a position (Parents only; array elements are values).
    pub fn child_at(&self, pos: usize) -> NodeResult<&Node> {
        self.parent()?.at(pos)
    }

    // ── structural equality ────────────────────────────────────────────

    /// Equality over shape and content, ignoring which container strategy
    /// backs a Parent: a list-style Parent equals a map-style Parent whose
    /// names are all empty, and equals a node-backed Array with equal
    /// elements. Scalars compare loosely (numeric tags by number, otherwise
    /// by string rendition).
    #[must_use]
    pub fn structural_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Scalar(a), Node::Scalar(b)) => a.loose_eq(b),
            (Node::Parent(a), Node::Parent(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                (0..a.len()).all(|i| {
                    let (Ok(x), Ok(y)) = (a.at(i), b.at(i)) else {
                        return false;
                    };
                    a.name_at(i).unwrap_or("") == b.name_at(i).unwrap_or("")
                        && x.structural_eq(y)
                })
            }
            (Node::Parent(p), Node::Array(ArrayData::Nodes(elems)))
            | (Node::Array(ArrayData::Nodes(elems)), Node::Parent(p)) => {
                // Positional-only parents and heterogeneous arrays hold the
                // same information; treat them as interchangeable.
                if p.is_map() || p.len() != elems.len() {
                    return false;
                }
                elems
                    .iter()
                    .enumerate()
                    .all(|(i, e)| matches!(p.at(i), Ok(c) if c.structural_eq(e)))
            }
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len() && (0..a.len()).all(|i| array_elem_eq(a, b, i))
            }
            _ => false,
        }
    }
}

/// Pairwise array element comparison across strategies: node-backed pairs
/// recurse, everything else compares boxed scalar values.
fn array_elem_eq(a: &ArrayData, b: &ArrayData, i: usize) -> bool {
    if let (ArrayData::Nodes(xs), ArrayData::Nodes(ys)) = (a, b) {
        return xs[i].structural_eq(&ys[i]);
    }
    match (a.value_at(i), b.value_at(i)) {
        (Ok(x), Ok(y)) => x.loose_eq(&y),
        _ => false,
    }
}

/// `==` on nodes is structural equality; see [`Node::structural_eq`].
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        let n = Node::default();
        assert!(n.is_null());
        assert_eq!(n.child_count(), 0);
        assert!(matches!(n.as_i32(), Err(NodeError::NullAccess)));
    }

    #[test]
    fn container_forming_replaces_prior_value() {
        let mut n = Node::scalar(42i32);
        n.set_as_parent().append("a", Node::scalar(1i32));
        assert!(n.is_map());
        assert_eq!(n.child("a").unwrap().as_i32().unwrap(), 1);

        // forming again keeps existing children
        n.set_as_parent().append("b", Node::scalar(2i32));
        assert_eq!(n.child_count(), 2);

        // forming a different shape replaces
        n.set_as_array(Kind::Int32).unwrap();
        assert!(n.is_array());
        assert_eq!(n.child_count(), 0);
    }

    #[test]
    fn wrong_shape_operations_error() {
        let n = Node::scalar(1i32);
        assert!(matches!(n.parent(), Err(NodeError::NotAParent { .. })));
        assert!(matches!(n.array(), Err(NodeError::NotAnArray { .. })));

        let mut p = Node::default();
        p.set_as_parent();
        assert!(matches!(p.as_i32(), Err(NodeError::WrongKind { .. })));
    }

    #[test]
    fn take_moves_subtree_and_resets_source() {
        let mut n = Node::default();
        n.set_as_parent().append("a", Node::scalar(1i32));
        let moved = n.take();
        assert!(n.is_null());
        assert_eq!(moved.child("a").unwrap().as_i32().unwrap(), 1);
    }

    #[test]
    fn clone_is_deep() {
        let mut n = Node::default();
        n.set_as_parent().append("a", Node::scalar(1i32));
        let mut copy = n.clone();
        copy.child_mut("a").unwrap().set(99i32);
        assert_eq!(n.child("a").unwrap().as_i32().unwrap(), 1);
        assert_eq!(copy.child("a").unwrap().as_i32().unwrap(), 99);
    }

    #[test]
    fn structural_eq_ignores_container_strategy() {
        let mut list = Node::default();
        {
            let c = list.set_as_list();
            c.append("", Node::scalar(1i32));
            c.append("", Node::scalar("x"));
        }
        let mut arr = Node::default();
        {
            let a = arr.set_as_array(Kind::Node).unwrap();
            a.push_node(Node::scalar(1i32)).unwrap();
            a.push_node(Node::scalar("x")).unwrap();
        }
        assert_eq!(list, arr);

        let mut map = Node::default();
        map.set_as_parent().append("k", Node::scalar(1i32));
        assert_ne!(list, map);
    }

    #[test]
    fn structural_eq_compares_packed_and_node_arrays() {
        let mut packed = Node::default();
        {
            let a = packed.set_as_array(Kind::Int32).unwrap();
            a.push_value(&Value::Int32(1)).unwrap();
            a.push_value(&Value::Int32(2)).unwrap();
        }
        let mut boxed = Node::default();
        {
            let a = boxed.set_as_array(Kind::Node).unwrap();
            a.push_node(Node::scalar(1i64)).unwrap();
            a.push_node(Node::scalar(2i64)).unwrap();
        }
        assert_eq!(packed, boxed);
    }
}
