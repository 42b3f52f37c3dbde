use bion_core::cursor::{binary_search, find_value, sort_node, visit};
use bion_core::{Kind, Node, NodeError, Value};

fn sample_map() -> Node {
    let mut n = Node::null();
    let c = n.set_as_parent();
    c.append("alpha", Node::scalar(3i32));
    c.append("beta", Node::scalar(1i32));
    c.append("gamma", Node::scalar(2i32));
    n
}

// ============================================================================
// Container invariants
// ============================================================================

/// Every position's name must resolve back to itself through the index
/// (unique names), after any mutation sequence.
fn assert_lockstep(node: &Node) {
    let c = node.parent().expect("parent expected");
    for i in 0..c.len() {
        let name = c.name_at(i).expect("map children carry names");
        assert_eq!(
            c.index_of_name(name),
            Some(i),
            "index out of lockstep for {name:?} at {i}"
        );
    }
}

#[test]
fn mutation_sequences_keep_lookups_consistent() {
    let mut node = sample_map();
    assert_lockstep(&node);

    let c = node.parent_mut().unwrap();
    c.insert_front(Node::scalar(0i32));
    c.rename(0, "zero").unwrap();
    c.swap(1, 3).unwrap();
    c.erase_by_name("beta").unwrap();
    c.append("delta", Node::scalar(4i32));
    c.insert_at(2, Node::scalar(9i32)).unwrap();
    c.rename(2, "mid").unwrap();
    assert_lockstep(&node);
}

#[test]
fn erase_and_rename_by_position_and_name() {
    let mut node = sample_map();
    let c = node.parent_mut().unwrap();

    let removed = c.erase_at(0).unwrap();
    assert_eq!(removed.as_i32().unwrap(), 3);
    assert_eq!(c.index_of_name("alpha"), None);
    assert_eq!(c.index_of_name("beta"), Some(0));

    c.rename(0, "bravo").unwrap();
    assert_eq!(c.get_by_name("bravo").unwrap().as_i32().unwrap(), 1);
    assert!(matches!(
        c.erase_by_name("beta"),
        Err(NodeError::NameNotFound { .. })
    ));
}

#[test]
fn out_of_bounds_positions_error() {
    let mut node = sample_map();
    let c = node.parent_mut().unwrap();
    assert!(matches!(c.at(10), Err(NodeError::OutOfBounds { .. })));
    assert!(matches!(
        c.swap(0, 10),
        Err(NodeError::OutOfBounds { index: 10, .. })
    ));
    assert!(matches!(
        c.rename(10, "x"),
        Err(NodeError::OutOfBounds { .. })
    ));
}

// ============================================================================
// Generic algorithms over the bridge
// ============================================================================

#[test]
fn find_works_on_parents_and_arrays_alike() {
    let map = sample_map();
    assert_eq!(find_value(&map, &Value::Int32(2)).unwrap(), Some(2));

    let mut arr = Node::null();
    {
        let a = arr.set_as_array(Kind::Float64).unwrap();
        for x in [0.5f64, 1.5, 2.5] {
            a.push_value(&Value::Float64(x)).unwrap();
        }
    }
    assert_eq!(find_value(&arr, &Value::Float64(1.5)).unwrap(), Some(1));
    // cross-tag probe matches numerically
    assert_eq!(find_value(&arr, &Value::Int32(2)).unwrap(), None);
}

#[test]
fn sort_then_binary_search() {
    let mut node = Node::null();
    {
        let a = node.set_as_array(Kind::Int64).unwrap();
        for x in [42i64, -7, 300, 0, 12] {
            a.push_value(&Value::Int64(x)).unwrap();
        }
    }
    sort_node(&mut node).unwrap();

    let a = node.array().unwrap();
    assert_eq!(a.value_at(0).unwrap(), Value::Int64(-7));
    assert_eq!(a.value_at(4).unwrap(), Value::Int64(300));

    for probe in [-7i64, 0, 12, 42, 300] {
        assert!(
            binary_search(&node, &Value::Int64(probe)).unwrap().is_some(),
            "probe {probe} not found"
        );
    }
    assert_eq!(binary_search(&node, &Value::Int64(1)).unwrap(), None);
}

#[test]
fn sort_parent_keeps_names_attached() {
    let mut node = sample_map();
    sort_node(&mut node).unwrap();
    let c = node.parent().unwrap();
    // values 1,2,3 now ascending; names moved with them
    assert_eq!(c.name_at(0), Some("beta"));
    assert_eq!(c.name_at(1), Some("gamma"));
    assert_eq!(c.name_at(2), Some("alpha"));
    assert_lockstep(&node);
}

#[test]
fn visit_reports_names_and_depths() {
    let mut root = Node::null();
    {
        let c = root.set_as_parent();
        c.append("a", Node::scalar(1i32));
        let mut sub = Node::null();
        sub.set_as_parent().append("b", Node::scalar(2i32));
        c.append("sub", sub);
    }
    let mut lines = Vec::new();
    visit(&root, &mut |depth, name, node| {
        lines.push(format!("{depth} {} {}", name.unwrap_or("-"), node.kind_name()));
    });
    assert_eq!(
        lines,
        vec![
            "0 - parent",
            "1 a int32",
            "1 sub parent",
            "2 b int32",
        ]
    );
}

// ============================================================================
// Array element-kind discipline
// ============================================================================

#[test]
fn array_kind_is_declared_once() {
    let mut node = Node::null();
    let a = node.set_as_array(Kind::Byte).unwrap();
    a.push_value(&Value::Int64(300)).unwrap(); // truncates to the element kind
    assert_eq!(a.value_at(0).unwrap(), Value::Byte(44));
    assert_eq!(a.kind(), Kind::Byte);
}

#[test]
fn heterogeneous_arrays_need_node_kind() {
    let mut node = Node::null();
    let a = node.set_as_array(Kind::Node).unwrap();
    a.push_node(Node::scalar(1i32)).unwrap();
    let mut sub = Node::null();
    sub.set_as_parent().append("x", Node::null());
    a.push_node(sub).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a.kind(), Kind::Node);
    // scalar view of a container element is a kind error, not a panic
    assert!(matches!(a.value_at(1), Err(NodeError::WrongKind { .. })));
}
