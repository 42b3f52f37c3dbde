//! # bion-core
//!
//! A dynamically-typed, JSON-like tree value — **Node** — and **BION**, a
//! compact self-describing binary wire format for persisting and streaming
//! it.
//!
//! A Node is a scalar [`Value`], a Parent (named or positional children
//! behind one of two container strategies), or a homogeneous Array (packed
//! native vectors, or a node vector for mixed elements). Generic algorithms
//! — search, sort, traversal — run over one [`cursor::Cursor`] abstraction
//! regardless of which backing a node uses.
//!
//! ## Quick start
//!
//! ```rust
//! use bion_core::{decode, encode, Kind, Node};
//!
//! let mut tree = Node::null();
//! let root = tree.set_as_parent();
//! root.append("name", Node::scalar("Alice"));
//! let mut scores = Node::null();
//! let arr = scores.set_as_array(Kind::Int32).unwrap();
//! for s in [95, 87, 92] {
//!     arr.push_value(&bion_core::Value::Int32(s)).unwrap();
//! }
//! root.append("scores", scores);
//!
//! let bytes = encode(&tree).unwrap();
//! let back = decode(&bytes).unwrap();
//! assert_eq!(tree, back);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — scalar values with lossy tag conversion
//! - [`node`] — the tree value and its lifecycle
//! - [`container`] / [`array`] — the two Parent and two Array strategies
//! - [`cursor`] — the iteration bridge and generic algorithms
//! - [`bion`] — the wire format: tag bytes, writer, reader, visitor adapter
//! - [`codec`] — Node ⇄ BION bridge ([`encode`] / [`decode`])
//! - [`json`] — thin adapter over the external JSON codec
//! - [`error`] — error types
//!
//! Single-threaded by design: a Node and its subtree are not safe for
//! concurrent mutation without external locking. The BION writer is
//! stateless and freely reusable; the reader holds transient state for the
//! duration of one `process` call and is not reentrant.

pub mod array;
pub mod bion;
pub mod codec;
pub mod container;
pub mod cursor;
pub mod error;
pub mod json;
pub mod node;
pub mod value;

mod varint;

pub use array::ArrayData;
pub use codec::{decode, encode, NodeBuilder};
pub use container::Container;
pub use cursor::Cursor;
pub use error::{BionError, BionResult, NodeError, NodeResult};
pub use node::Node;
pub use value::{Kind, Value};
