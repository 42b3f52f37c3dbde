//! Child storage strategies for Parent nodes.
//!
//! A Parent is backed by one of two strategies: an append-only positional
//! [`Container::List`], or a name-indexed [`Container::Map`] that keeps the
//! entry vector and the name→first-position index in lockstep across every
//! mutation. Which strategy backs a given Parent is a runtime property, not
//! part of the node's type tag; callers that only use positions never notice
//! the difference.
//!
//! Names need not be unique. Every by-name operation resolves to the first
//! matching position.

use crate::error::{NodeError, NodeResult};
use crate::node::Node;
use std::collections::HashMap;

/// One of the two Parent backing strategies.
#[derive(Debug, Clone)]
pub enum Container {
    /// Positional children without names; by-name lookups always miss.
    List(Vec<Node>),
    /// Ordered named children with a by-name index.
    Map(MapChildren),
}

/// Entry vector plus name index for the map strategy.
///
/// Invariant: `index[name]` is the smallest position whose entry carries
/// `name`, for every name present in `entries`.
#[derive(Debug, Clone, Default)]
pub struct MapChildren {
    entries: Vec<(String, Node)>,
    index: HashMap<String, usize>,
}

impl Container {
    #[must_use]
    pub fn new_list() -> Self {
        Container::List(Vec::new())
    }

    #[must_use]
    pub fn new_map() -> Self {
        Container::Map(MapChildren::default())
    }

    /// True when the backing strategy supports name lookup.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Container::Map(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Container::List(items) => items.len(),
            Container::Map(m) => m.entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, pos: usize) -> NodeResult<&Node> {
        match self {
            Container::List(items) => items.get(pos),
            Container::Map(m) => m.entries.get(pos).map(|(_, n)| n),
        }
        .ok_or(NodeError::OutOfBounds {
            index: pos,
            len: self.len(),
        })
    }

    pub fn at_mut(&mut self, pos: usize) -> NodeResult<&mut Node> {
        let len = self.len();
        match self {
            Container::List(items) => items.get_mut(pos),
            Container::Map(m) => m.entries.get_mut(pos).map(|(_, n)| n),
        }
        .ok_or(NodeError::OutOfBounds { index: pos, len })
    }

    /// Name at a position; the list strategy has none.
    #[must_use]
    pub fn name_at(&self, pos: usize) -> Option<&str> {
        match self {
            Container::List(_) => None,
            Container::Map(m) => m.entries.get(pos).map(|(name, _)| name.as_str()),
        }
    }

    /// First position carrying `name`; always `None` for the list strategy.
    #[must_use]
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        match self {
            Container::List(_) => None,
            Container::Map(m) => m.index.get(name).copied(),
        }
    }

    /// First child named `name`, or `None` (never an error).
    #[must_use]
    pub fn peek_by_name(&self, name: &str) -> Option<&Node> {
        let pos = self.index_of_name(name)?;
        self.at(pos).ok()
    }

    pub fn get_by_name(&self, name: &str) -> NodeResult<&Node> {
        self.peek_by_name(name).ok_or_else(|| NodeError::NameNotFound {
            name: name.to_string(),
        })
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> NodeResult<&mut Node> {
        let pos = self.index_of_name(name).ok_or_else(|| NodeError::NameNotFound {
            name: name.to_string(),
        })?;
        self.at_mut(pos)
    }

    /// Linear scan for the first child structurally equal to `node`.
    #[must_use]
    pub fn index_of_value(&self, node: &Node) -> Option<usize> {
        (0..self.len()).find(|&i| match self.at(i) {
            Ok(child) => child.structural_eq(node),
            Err(_) => false,
        })
    }

    /// By-name append. The list strategy has no names and just appends.
    pub fn append(&mut self, name: &str, node: Node) {
        match self {
            Container::List(items) => items.push(node),
            Container::Map(m) => {
                m.entries.push((name.to_string(), node));
                let pos = m.entries.len() - 1;
                m.index.entry(name.to_string()).or_insert(pos);
            }
        }
    }

    pub fn insert_front(&mut self, node: Node) {
        match self {
            Container::List(items) => items.insert(0, node),
            Container::Map(m) => {
                m.entries.insert(0, (String::new(), node));
                m.rebuild_index();
            }
        }
    }

    /// Positional insert; map entries inserted this way carry an empty name.
    pub fn insert_at(&mut self, pos: usize, node: Node) -> NodeResult<()> {
        let len = self.len();
        if pos > len {
            return Err(NodeError::OutOfBounds { index: pos, len });
        }
        match self {
            Container::List(items) => items.insert(pos, node),
            Container::Map(m) => {
                m.entries.insert(pos, (String::new(), node));
                m.rebuild_index();
            }
        }
        Ok(())
    }

    pub fn erase_at(&mut self, pos: usize) -> NodeResult<Node> {
        let len = self.len();
        if pos >= len {
            return Err(NodeError::OutOfBounds { index: pos, len });
        }
        Ok(match self {
            Container::List(items) => items.remove(pos),
            Container::Map(m) => {
                let (_, node) = m.entries.remove(pos);
                m.rebuild_index();
                node
            }
        })
    }

    /// Erase the first child carrying `name`.
    pub fn erase_by_name(&mut self, name: &str) -> NodeResult<Node> {
        let pos = self.index_of_name(name).ok_or_else(|| NodeError::NameNotFound {
            name: name.to_string(),
        })?;
        self.erase_at(pos)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> NodeResult<()> {
        let len = self.len();
        if a >= len {
            return Err(NodeError::OutOfBounds { index: a, len });
        }
        if b >= len {
            return Err(NodeError::OutOfBounds { index: b, len });
        }
        match self {
            Container::List(items) => items.swap(a, b),
            Container::Map(m) => {
                m.entries.swap(a, b);
                m.rebuild_index();
            }
        }
        Ok(())
    }

    /// Change the name at `pos`. The list strategy has no names to change,
    /// so this only bounds-checks there.
    pub fn rename(&mut self, pos: usize, name: &str) -> NodeResult<()> {
        let len = self.len();
        if pos >= len {
            return Err(NodeError::OutOfBounds { index: pos, len });
        }
        if let Container::Map(m) = self {
            m.entries[pos].0 = name.to_string();
            m.rebuild_index();
        }
        Ok(())
    }

    /// Children in position order, paired with their names when present.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &Node)> {
        (0..self.len()).filter_map(move |i| self.at(i).ok().map(|n| (self.name_at(i), n)))
    }
}

impl MapChildren {
    /// Recompute the name→first-position index from the entry vector.
    /// Structural edits (insert, erase, swap, rename) shift positions, so
    /// the whole index is rebuilt rather than patched.
    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, (name, _)) in self.entries.iter().enumerate() {
            self.index.entry(name.clone()).or_insert(pos);
        }
    }
}
