use bion_core::value::Value;
use bion_core::{decode, encode, Kind, Node};

/// Assert that encode → decode reproduces a structurally equal tree.
fn assert_roundtrip(tree: &Node) {
    let bytes = encode(tree).expect("encode failed");
    let back = decode(&bytes).expect("decode failed");
    assert_eq!(
        tree, &back,
        "Roundtrip failed:\n  bytes: {bytes:02x?}\n  back:  {back:?}"
    );
}

fn map_of(entries: &[(&str, Node)]) -> Node {
    let mut node = Node::null();
    let parent = node.set_as_parent();
    for (name, child) in entries {
        parent.append(name, child.clone());
    }
    node
}

fn packed<T: Copy>(kind: Kind, values: &[T]) -> Node
where
    Value: From<T>,
{
    let mut node = Node::null();
    let arr = node.set_as_array(kind).unwrap();
    for &v in values {
        arr.push_value(&Value::from(v)).unwrap();
    }
    node
}

// ============================================================================
// Scalar Roundtrips
// ============================================================================

#[test]
fn roundtrip_null() {
    assert_roundtrip(&Node::null());
}

#[test]
fn roundtrip_bools() {
    assert_roundtrip(&Node::scalar(true));
    assert_roundtrip(&Node::scalar(false));
}

#[test]
fn roundtrip_every_numeric_kind() {
    assert_roundtrip(&Node::scalar(0xFFu8));
    assert_roundtrip(&Node::scalar(-42i32));
    assert_roundtrip(&Node::scalar(42u32));
    assert_roundtrip(&Node::scalar(i64::MIN));
    assert_roundtrip(&Node::scalar(u64::MAX));
    assert_roundtrip(&Node::scalar(1.5f32));
    assert_roundtrip(&Node::scalar(3.14f64));
}

#[test]
fn roundtrip_extended_precision() {
    assert_roundtrip(&Node::Scalar(Value::extended(3.14)));
    assert_roundtrip(&Node::Scalar(Value::extended(-2.5e300)));
}

#[test]
fn roundtrip_strings() {
    assert_roundtrip(&Node::scalar(""));
    assert_roundtrip(&Node::scalar("hello"));
    assert_roundtrip(&Node::scalar("caf\u{00e9} \u{4f60}\u{597d}"));
}

#[test]
fn roundtrip_datetime_reads_back_as_double() {
    // the wire has no datetime kind; the value survives as f64
    let tree = Node::Scalar(Value::datetime(1_700_000_000.25));
    let back = decode(&encode(&tree).unwrap()).unwrap();
    assert_eq!(back.value().unwrap().kind(), Kind::Float64);
    assert_eq!(tree, back);
}

#[test]
fn handle_does_not_serialize() {
    let tree = Node::Scalar(Value::handle(0xdead));
    assert!(encode(&tree).is_err());
}

// ============================================================================
// Parent Roundtrips
// ============================================================================

#[test]
fn roundtrip_flat_map() {
    assert_roundtrip(&map_of(&[
        ("name", Node::scalar("Alice")),
        ("age", Node::scalar(30i32)),
        ("active", Node::scalar(true)),
        ("note", Node::null()),
    ]));
}

#[test]
fn roundtrip_empty_map() {
    let mut node = Node::null();
    node.set_as_parent();
    assert_roundtrip(&node);
}

#[test]
fn roundtrip_nested_maps() {
    assert_roundtrip(&map_of(&[(
        "server",
        map_of(&[
            ("host", Node::scalar("localhost")),
            ("port", Node::scalar(8080u32)),
        ]),
    )]));
}

#[test]
fn roundtrip_duplicate_names() {
    assert_roundtrip(&map_of(&[
        ("x", Node::scalar(1i32)),
        ("x", Node::scalar(2i32)),
    ]));
}

#[test]
fn roundtrip_list_parent_travels_as_array() {
    let mut list = Node::null();
    {
        let c = list.set_as_list();
        c.append("", Node::scalar(1i32));
        c.append("", Node::scalar("two"));
    }
    // list children have no wire names; they come back as a node array,
    // which is structurally equal
    assert_roundtrip(&list);
    let back = decode(&encode(&list).unwrap()).unwrap();
    assert!(back.is_array());
}

// ============================================================================
// Array Roundtrips
// ============================================================================

#[test]
fn roundtrip_packed_arrays_of_every_kind() {
    assert_roundtrip(&packed(Kind::Byte, &[1u8, 2, 255]));
    assert_roundtrip(&packed(Kind::Int32, &[-1i32, 0, i32::MAX]));
    assert_roundtrip(&packed(Kind::UInt32, &[0u32, u32::MAX]));
    assert_roundtrip(&packed(Kind::Int64, &[i64::MIN, 7]));
    assert_roundtrip(&packed(Kind::UInt64, &[u64::MAX, 0]));
    assert_roundtrip(&packed(Kind::Float32, &[1.5f32, -0.25]));
    assert_roundtrip(&packed(Kind::Float64, &[3.14f64, -2.71]));
    assert_roundtrip(&packed(Kind::Bool, &[true, false, true]));
}

#[test]
fn roundtrip_string_array() {
    let mut node = Node::null();
    {
        let arr = node.set_as_array(Kind::Str).unwrap();
        for s in ["red", "", "blue"] {
            arr.push_value(&Value::from(s)).unwrap();
        }
    }
    assert_roundtrip(&node);
}

#[test]
fn roundtrip_empty_array() {
    let mut node = Node::null();
    node.set_as_array(Kind::Int32).unwrap();
    assert_roundtrip(&node);
}

#[test]
fn roundtrip_heterogeneous_array() {
    let mut node = Node::null();
    {
        let arr = node.set_as_array(Kind::Node).unwrap();
        arr.push_node(Node::scalar("hello")).unwrap();
        arr.push_node(Node::scalar(42i32)).unwrap();
        arr.push_node(Node::null()).unwrap();
        arr.push_node(map_of(&[("k", Node::scalar(true))])).unwrap();
        arr.push_node(packed(Kind::Int32, &[1i32, 2])).unwrap();
    }
    assert_roundtrip(&node);
}

#[test]
fn roundtrip_deeply_mixed_tree() {
    assert_roundtrip(&map_of(&[
        ("name", Node::scalar("project")),
        (
            "config",
            map_of(&[
                ("debug", Node::scalar(true)),
                ("port", Node::scalar(3000i32)),
                ("weights", packed(Kind::Float64, &[0.1f64, 0.9])),
            ]),
        ),
        ("tags", {
            let mut t = Node::null();
            let arr = t.set_as_array(Kind::Str).unwrap();
            arr.push_value(&Value::from("web")).unwrap();
            arr.push_value(&Value::from("api")).unwrap();
            t
        }),
    ]));
}

// ============================================================================
// Wire-Level Properties
// ============================================================================

#[test]
fn stream_is_framed_by_magic_and_footer() {
    let bytes = encode(&Node::scalar(1i32)).unwrap();
    assert_eq!(&bytes[..2], &[0x21, 0x23]);
    assert_eq!(*bytes.last().unwrap(), 0x00);
}

#[test]
fn zero_length_scalars_take_one_byte() {
    // header (2) + one tag byte + footer (1)
    assert_eq!(encode(&Node::null()).unwrap().len(), 4);
    assert_eq!(encode(&Node::scalar(true)).unwrap().len(), 4);
    assert_eq!(encode(&Node::scalar(false)).unwrap().len(), 4);
}

#[test]
fn fixed_array_size_is_exact() {
    // array portion = instruction + varint(count) + type tag + N * elem size
    for n in [1usize, 127, 128, 300] {
        let values: Vec<i32> = (0..n as i32).collect();
        let bytes = encode(&packed(Kind::Int32, &values)).unwrap();
        let varint_len = if n < 128 { 1 } else { 2 };
        let expected = 2 + 1 + varint_len + 1 + n * 4 + 1;
        assert_eq!(bytes.len(), expected, "count {n}");
    }
}

#[test]
fn fixed_array_elements_are_byte_identical() {
    let bytes = encode(&packed(Kind::Int32, &[0x01020304i32])).unwrap();
    // header, fixed-array begin, count 1, int32 type tag, then the LE payload
    assert_eq!(
        bytes,
        vec![0x21, 0x23, 0x06, 0x01, 0x31, 0x04, 0x03, 0x02, 0x01, 0x00]
    );
}
