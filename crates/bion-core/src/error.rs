//! Error types for Node tree operations and the BION codec.

use thiserror::Error;

/// Errors raised by Node, Value, container and array operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    /// A typed accessor was called on a null value.
    #[error("typed access on a null value")]
    NullAccess,

    /// A position was outside the container/array bounds.
    #[error("index {index} out of bounds (len={len})")]
    OutOfBounds { index: usize, len: usize },

    /// A by-name lookup found no matching child.
    #[error("no child named {name:?}")]
    NameNotFound { name: String },

    /// A Parent-only operation was called on a non-parent node.
    #[error("not a parent: node is {found}")]
    NotAParent { found: &'static str },

    /// A container operation (parent or array) was called on a scalar node.
    #[error("not a container: node is {found}")]
    NotAContainer { found: &'static str },

    /// An Array-only operation was called on a non-array node.
    #[error("not an array: node is {found}")]
    NotAnArray { found: &'static str },

    /// A value of one kind was required where another was found.
    #[error("expected {expected} value, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    /// No lossy conversion exists between the two kinds.
    #[error("cannot convert {from} to {to}")]
    Unconvertible {
        from: &'static str,
        to: &'static str,
    },

    /// Native sort was requested on an array whose elements have no `<`.
    #[error("{kind} array does not support native sort")]
    NotSortable { kind: &'static str },
}

/// Errors raised while encoding or decoding a BION stream.
#[derive(Error, Debug)]
pub enum BionError {
    /// The stream did not start with the `0x21 0x23` magic bytes.
    #[error("invalid header magic: {found:02x?}")]
    BadMagic { found: [u8; 2] },

    /// The input ended before an expected token completed.
    #[error("input ended early: {needed} more byte(s) expected")]
    UnexpectedEof { needed: usize },

    /// The kind nibble of a tag byte matched no known value kind.
    #[error("unknown value kind in tag byte {0:#04x}")]
    UnknownKind(u8),

    /// The size nibble was outside the defined range for its kind.
    #[error("invalid size code {code} for {kind} value")]
    BadSizeCode { kind: &'static str, code: u8 },

    /// A name or string token exceeded the reader's scratch buffer.
    #[error("value too long: token exceeds the {max}-byte limit")]
    ValueTooLong { max: usize },

    /// A varint ran past its maximum encoded width.
    #[error("varint too long")]
    VarintOverflow,

    /// A name or string token held invalid UTF-8.
    #[error("invalid UTF-8 in string token")]
    InvalidUtf8,

    /// A bounded output sink ran out of room.
    #[error("bounded output sink overflow")]
    OutputOverflow,

    /// A bounded input was configured with an unusable length limit.
    #[error("invalid stream length limit {limit} (input has {available} bytes)")]
    InvalidLimit { limit: usize, available: usize },

    /// The value kind has no wire representation.
    #[error("cannot serialize {kind} value")]
    Unserializable { kind: &'static str },

    /// An element written inside a fixed-type array did not match the
    /// declared element kind.
    #[error("fixed-type array expects {expected} elements, got {found}")]
    FixedTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An underlying sink or source failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The external JSON codec rejected its input (JSON adapter only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A tree-level error surfaced while building or walking a Node.
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Convenience alias for tree-level operations.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

/// Convenience alias for codec-level operations.
pub type BionResult<T> = std::result::Result<T, BionError>;
