//! Property-Based Roundtrip Tests for the BION codec
//!
//! Uses the `proptest` crate to generate random Node trees and verify that
//! `decode(encode(tree))` reproduces a structurally equal tree. This catches
//! edge cases that hand-written tests might miss.
//!
//! Strategies generate:
//! - Random scalars across every serializable kind (NaN excluded: it never
//!   compares equal to itself; handles excluded: they have no wire form)
//! - Random map parents (unique-prefix-free keys not required; duplicates
//!   are legal and preserved in order)
//! - Random packed arrays per element kind
//! - Random node-backed arrays and list parents (which travel as arrays)
//! - Nesting up to 3 levels

use bion_core::{decode, encode, Kind, Node, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating Node trees
// ============================================================================

/// Generate a wire-legal object key (non-empty, no NUL).
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_.]{0,12}").unwrap()
}

/// Generate a finite f64 (NaN never roundtrips as equal).
fn arb_finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("must be finite", |f| f.is_finite())
}

fn arb_finite_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("must be finite", |f| f.is_finite())
}

/// Generate a random serializable scalar.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<u8>().prop_map(Value::Byte),
        any::<i32>().prop_map(Value::Int32),
        any::<u32>().prop_map(Value::UInt32),
        any::<i64>().prop_map(Value::Int64),
        any::<u64>().prop_map(Value::UInt64),
        arb_finite_f32().prop_map(Value::Float32),
        arb_finite_f64().prop_map(Value::Float64),
        arb_finite_f64().prop_map(Value::Extended),
        "[a-zA-Z0-9 _.:,-]{0,24}".prop_map(Value::Str),
    ]
}

/// Generate a packed array of one random element kind.
fn arb_packed_array() -> impl Strategy<Value = Node> {
    prop_oneof![
        prop::collection::vec(any::<bool>(), 0..8).prop_map(|v| packed(Kind::Bool, v
            .into_iter()
            .map(Value::Bool)
            .collect())),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|v| packed(Kind::Byte, v
            .into_iter()
            .map(Value::Byte)
            .collect())),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(|v| packed(Kind::Int32, v
            .into_iter()
            .map(Value::Int32)
            .collect())),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(|v| packed(Kind::Int64, v
            .into_iter()
            .map(Value::Int64)
            .collect())),
        prop::collection::vec(any::<u64>(), 0..8).prop_map(|v| packed(Kind::UInt64, v
            .into_iter()
            .map(Value::UInt64)
            .collect())),
        prop::collection::vec(arb_finite_f64(), 0..8).prop_map(|v| packed(
            Kind::Float64,
            v.into_iter().map(Value::Float64).collect()
        )),
        prop::collection::vec("[a-z]{0,8}", 0..6).prop_map(|v| packed(
            Kind::Str,
            v.into_iter().map(Value::Str).collect()
        )),
    ]
}

fn packed(kind: Kind, values: Vec<Value>) -> Node {
    let mut node = Node::null();
    let arr = node.set_as_array(kind).expect("packable kind");
    for v in &values {
        arr.push_value(v).expect("coercible element");
    }
    node
}

/// Generate a Node tree with limited nesting (recursive).
fn arb_node(depth: u32) -> BoxedStrategy<Node> {
    if depth == 0 {
        return prop_oneof![
            arb_scalar().prop_map(Node::Scalar),
            arb_packed_array(),
        ]
        .boxed();
    }
    prop_oneof![
        3 => arb_scalar().prop_map(Node::Scalar),
        1 => arb_packed_array(),
        2 => prop::collection::vec((arb_key(), arb_node(depth - 1)), 0..5).prop_map(|pairs| {
            let mut node = Node::null();
            let parent = node.set_as_parent();
            for (k, child) in pairs {
                parent.append(&k, child);
            }
            node
        }),
        1 => prop::collection::vec(arb_node(depth - 1), 0..5).prop_map(|children| {
            let mut node = Node::null();
            let arr = node.set_as_array(Kind::Node).expect("node arrays always form");
            for child in children {
                arr.push_node(child).expect("node array accepts nodes");
            }
            node
        }),
        1 => prop::collection::vec(arb_node(depth - 1), 0..4).prop_map(|children| {
            let mut node = Node::null();
            let list = node.set_as_list();
            for child in children {
                list.append("", child);
            }
            node
        }),
    ]
    .boxed()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(400))]

    /// Core roundtrip property: decode(encode(tree)) == tree structurally.
    #[test]
    fn roundtrip_preserves_tree(tree in arb_node(3)) {
        let bytes = encode(&tree).expect("encode must not fail");
        let back = decode(&bytes).expect("decode must not fail");
        prop_assert!(
            tree.structural_eq(&back),
            "Roundtrip failed!\n  tree: {:?}\n  bytes: {:02x?}\n  back: {:?}",
            tree,
            bytes,
            back
        );
    }

    /// Every stream is framed by the magic bytes and the footer byte.
    #[test]
    fn stream_framing_is_invariant(tree in arb_node(2)) {
        let bytes = encode(&tree).expect("encode must not fail");
        prop_assert_eq!(&bytes[..2], &[0x21u8, 0x23][..]);
        prop_assert_eq!(*bytes.last().expect("nonempty"), 0x00u8);
    }

    /// Scalars roundtrip with their exact tag (no silent widening on the wire).
    #[test]
    fn scalar_tags_survive(v in arb_scalar()) {
        let tree = Node::Scalar(v.clone());
        let back = decode(&encode(&tree).expect("encode")).expect("decode");
        let got = back.value().expect("scalar expected").clone();
        prop_assert_eq!(got.kind(), v.kind());
        prop_assert!(got.loose_eq(&v), "value changed: {:?} -> {:?}", v, got);
    }

    /// A packed array roundtrips into a packed array of the same kind when
    /// it has elements (empty arrays lose their declared kind on the wire).
    #[test]
    fn packed_arrays_stay_packed(node in arb_packed_array()) {
        let back = decode(&encode(&node).expect("encode")).expect("decode");
        let orig = node.array().expect("array");
        if !orig.is_empty() && orig.kind() != Kind::Str {
            prop_assert_eq!(back.array().expect("array back").kind(), orig.kind());
        }
        prop_assert!(node.structural_eq(&back));
    }

    /// Decoding never panics on arbitrary bytes (errors are fine).
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode(&bytes);
    }
}
