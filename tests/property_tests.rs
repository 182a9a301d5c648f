//! Property-based tests for the cadence-independence guarantee: for any
//! tree, any primary buffer capacity and any demand-size sequence, the
//! delivered bytes concatenate to exactly the unconstrained encoding.

use proptest::prelude::*;
use pullwire::{encode_to_vec, value, ChunkPuller, Encoder, Map, Value, WireFormat};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        "[a-z \"\\\\]{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..12).prop_map(Value::Bytes),
    ]
}

/// Scalars every format can encode: no bytes, no floats.
fn arb_text_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        "[a-z \"\\\\]{0,12}".prop_map(Value::String),
    ]
}

fn object_from_pairs(pairs: Vec<(String, Value)>) -> Value {
    let mut map = Map::new();
    for (key, val) in pairs {
        map.insert(key, val);
    }
    Value::Object(map)
}

fn arb_container(scalar: impl Strategy<Value = Value> + 'static) -> BoxedStrategy<Value> {
    let node = scalar
        .prop_recursive(4, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..5)
                    .prop_map(object_from_pairs),
            ]
        })
        .boxed();
    // Roots must be containers, so wrap the generated nodes once more.
    prop_oneof![
        prop::collection::vec(node.clone(), 0..5).prop_map(Value::Array),
        prop::collection::vec(("[a-z]{1,6}", node), 0..5).prop_map(object_from_pairs),
    ]
    .boxed()
}

fn pull_with_cadence(
    tree: &Value,
    format: WireFormat,
    capacity: usize,
    demands: &[usize],
) -> Vec<u8> {
    let encoder = Encoder::new(tree, format, capacity).unwrap();
    let puller = ChunkPuller::new(encoder);
    let mut out = Vec::new();
    let mut turn = 0;
    loop {
        let n = demands[turn % demands.len()];
        turn += 1;
        let pulled = puller.on_demand(n).unwrap();
        for chunk in &pulled.chunks {
            out.extend_from_slice(chunk);
        }
        if pulled.done {
            break;
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_binary_cadence_independence(
        tree in arb_container(arb_scalar()),
        capacity in 1usize..48,
        demands in prop::collection::vec(1usize..24, 1..6),
    ) {
        let reference = encode_to_vec(&tree, WireFormat::Binary).unwrap();
        let pulled = pull_with_cadence(&tree, WireFormat::Binary, capacity, &demands);
        prop_assert_eq!(pulled, reference);
    }

    #[test]
    fn prop_text_cadence_independence(
        tree in arb_container(arb_text_scalar()),
        capacity in 1usize..48,
        demands in prop::collection::vec(1usize..24, 1..6),
    ) {
        let reference = encode_to_vec(&tree, WireFormat::Text).unwrap();
        let pulled = pull_with_cadence(&tree, WireFormat::Text, capacity, &demands);
        prop_assert_eq!(pulled, reference);
    }

    #[test]
    fn prop_text_output_is_valid_json(
        tree in arb_container(arb_text_scalar()),
    ) {
        let out = encode_to_vec(&tree, WireFormat::Text).unwrap();
        let parsed: std::result::Result<serde_json::Value, _> =
            serde_json::from_slice(&out);
        prop_assert!(parsed.is_ok(), "not valid JSON: {:?}", String::from_utf8_lossy(&out));
    }

    #[test]
    fn prop_forced_per_token_suspension_is_byte_identical(
        tree in arb_container(arb_scalar()),
    ) {
        let reference = encode_to_vec(&tree, WireFormat::Binary).unwrap();
        let pulled = pull_with_cadence(&tree, WireFormat::Binary, 1, &[1]);
        prop_assert_eq!(pulled, reference);
    }
}

#[test]
fn test_known_tree_json_equivalence() {
    // Spot-check the text variant against serde_json's own rendering.
    let tree = value!({"a": 1, "b": [true, null, "x"], "c": {"d": "e"}});
    let out = encode_to_vec(&tree, WireFormat::Text).unwrap();
    let ours: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let expected: serde_json::Value =
        serde_json::json!({"a": 1, "b": [true, null, "x"], "c": {"d": "e"}});
    assert_eq!(ours, expected);
}
