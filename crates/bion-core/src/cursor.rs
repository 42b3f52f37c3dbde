//! The iteration bridge: one cursor over all four backing representations.
//!
//! A [`Cursor`] binds to exactly one Parent or Array node and hides whether
//! the children live in a list, a name-indexed map, a packed scalar vector,
//! or a node vector. The generic algorithms below — [`find_value`],
//! [`binary_search`], [`sort_node`], [`visit`] — are written once against
//! this surface. Sorting stays unboxed where the backing already is: a
//! packed array sorts through its native vector, and only the node-backed
//! shapes fall back to swap-based comparison sorting.

use crate::array::ArrayData;
use crate::container::Container;
use crate::error::{NodeError, NodeResult};
use crate::node::Node;
use crate::value::Value;
use std::cmp::Ordering;

/// Read cursor over the children/elements of one node.
pub struct Cursor<'a> {
    rep: Rep<'a>,
    pos: usize,
}

enum Rep<'a> {
    Parent(&'a Container),
    Array(&'a ArrayData),
}

impl<'a> Cursor<'a> {
    /// Bind to a Parent or Array node; scalars have nothing to iterate.
    pub fn new(node: &'a Node) -> NodeResult<Self> {
        match node {
            Node::Parent(c) => Ok(Cursor {
                rep: Rep::Parent(c),
                pos: 0,
            }),
            Node::Array(a) => Ok(Cursor {
                rep: Rep::Array(a),
                pos: 0,
            }),
            other => Err(NodeError::NotAContainer {
                found: other.kind_name(),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.rep {
            Rep::Parent(c) => c.len(),
            Rep::Array(a) => a.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) -> NodeResult<()> {
        if pos >= self.len() {
            return Err(NodeError::OutOfBounds {
                index: pos,
                len: self.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Step forward; false once past the last position.
    pub fn advance(&mut self) -> bool {
        if self.pos + 1 < self.len() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Step backward; false at position zero.
    pub fn retreat(&mut self) -> bool {
        if self.pos > 0 {
            self.pos -= 1;
            true
        } else {
            false
        }
    }

    /// Name at the current position, when the backing carries names.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        match &self.rep {
            Rep::Parent(c) => c.name_at(self.pos),
            Rep::Array(_) => None,
        }
    }

    /// Boxed scalar at the current position. Packed elements are boxed on
    /// the way out; node-backed elements must be scalars.
    pub fn value(&self) -> NodeResult<Value> {
        match &self.rep {
            Rep::Parent(c) => c.at(self.pos)?.value().cloned(),
            Rep::Array(a) => a.value_at(self.pos),
        }
    }

    /// True when the backing can hand out node references (parents and
    /// node-backed arrays); packed vectors cannot.
    #[must_use]
    pub fn is_node_backed(&self) -> bool {
        match &self.rep {
            Rep::Parent(_) => true,
            Rep::Array(a) => matches!(a, ArrayData::Nodes(_)),
        }
    }

    /// Node reference at the current position, for node-backed shapes.
    #[must_use]
    pub fn node(&self) -> Option<&'a Node> {
        match &self.rep {
            Rep::Parent(c) => c.at(self.pos).ok(),
            Rep::Array(a) => a.node_at(self.pos).ok(),
        }
    }
}

/// Total order over scalar values: numeric tags compare as numbers (exact
/// for integer pairs), strings lexicographically, and mixed tags fall back
/// to their string renditions — the same fallback loose equality uses.
#[must_use]
pub fn value_order(a: &Value, b: &Value) -> Ordering {
    if a.kind().is_numeric() && b.kind().is_numeric() {
        if let (Some(x), Some(y)) = (a.integer_repr(), b.integer_repr()) {
            return x.cmp(&y);
        }
        return a.to_f64_lossy().total_cmp(&b.to_f64_lossy());
    }
    if let (Value::Str(x), Value::Str(y)) = (a, b) {
        return x.cmp(y);
    }
    if let (Value::Bool(x), Value::Bool(y)) = (a, b) {
        return x.cmp(y);
    }
    a.render().cmp(&b.render())
}

/// Linear scan for the first position whose value equals `target`.
pub fn find_value(node: &Node, target: &Value) -> NodeResult<Option<usize>> {
    let mut cur = Cursor::new(node)?;
    if cur.is_empty() {
        return Ok(None);
    }
    loop {
        if let Ok(v) = cur.value() {
            if v.loose_eq(target) {
                return Ok(Some(cur.pos()));
            }
        }
        if !cur.advance() {
            return Ok(None);
        }
    }
}

/// Binary search over a container sorted by [`value_order`]. Returns the
/// position of one matching element, or None.
pub fn binary_search(node: &Node, target: &Value) -> NodeResult<Option<usize>> {
    let mut cur = Cursor::new(node)?;
    let mut lo = 0usize;
    let mut hi = cur.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        cur.set_pos(mid)?;
        let v = cur.value()?;
        match value_order(&v, target) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(Some(mid)),
        }
    }
    Ok(None)
}

/// Ascending in-place sort of a node's children/elements.
///
/// Packed arrays go straight to their native vector sort; string arrays and
/// all-scalar node-backed shapes use comparison sorting via [`value_order`].
/// A node-backed shape holding a non-scalar child refuses.
pub fn sort_node(node: &mut Node) -> NodeResult<()> {
    match node {
        Node::Array(a) => match a {
            ArrayData::Str(v) => {
                v.sort_unstable();
                Ok(())
            }
            ArrayData::Nodes(v) => sort_nodes(v),
            packed => packed.sort(),
        },
        Node::Parent(c) => sort_parent(c),
        other => Err(NodeError::NotAContainer {
            found: other.kind_name(),
        }),
    }
}

fn sort_nodes(v: &mut [Node]) -> NodeResult<()> {
    for n in v.iter() {
        n.value().map_err(|_| NodeError::NotSortable { kind: "node" })?;
    }
    v.sort_by(|a, b| match (a.value(), b.value()) {
        (Ok(x), Ok(y)) => value_order(x, y),
        _ => Ordering::Equal,
    });
    Ok(())
}

/// Swap-based selection sort keeping name/child pairs together. The
/// container's own swap maintains the name index, so no extra bookkeeping
/// is needed here.
fn sort_parent(c: &mut Container) -> NodeResult<()> {
    let len = c.len();
    let mut keys = Vec::with_capacity(len);
    for i in 0..len {
        let v = c
            .at(i)?
            .value()
            .map_err(|_| NodeError::NotSortable { kind: "node" })?;
        keys.push(v.clone());
    }
    for i in 0..len {
        let mut min = i;
        for j in i + 1..len {
            if value_order(&keys[j], &keys[min]) == Ordering::Less {
                min = j;
            }
        }
        if min != i {
            c.swap(i, min)?;
            keys.swap(i, min);
        }
    }
    Ok(())
}

/// Depth-first traversal. The callback sees every node in the tree with its
/// depth and name (when its parent carries names); packed array elements are
/// boxed into transient scalar nodes for the visit.
pub fn visit<F: FnMut(usize, Option<&str>, &Node)>(node: &Node, f: &mut F) {
    visit_inner(node, None, 0, f);
}

fn visit_inner<F: FnMut(usize, Option<&str>, &Node)>(
    node: &Node,
    name: Option<&str>,
    depth: usize,
    f: &mut F,
) {
    f(depth, name, node);
    match node {
        Node::Parent(c) => {
            for (child_name, child) in c.iter() {
                visit_inner(child, child_name, depth + 1, f);
            }
        }
        Node::Array(ArrayData::Nodes(v)) => {
            for child in v {
                visit_inner(child, None, depth + 1, f);
            }
        }
        Node::Array(packed) => {
            for i in 0..packed.len() {
                if let Ok(v) = packed.value_at(i) {
                    let boxed = Node::Scalar(v);
                    f(depth + 1, None, &boxed);
                }
            }
        }
        Node::Scalar(_) => {}
    }
}
