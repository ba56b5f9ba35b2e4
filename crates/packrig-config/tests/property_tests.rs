//! Property tests for the structural merge.

use packrig_config::merge::merge;
use proptest::prelude::*;
use serde_json::Value;

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![Just(Value::Null), scalar_strategy()];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,3}", value_strategy(), 0..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

proptest! {
    #[test]
    fn merge_is_idempotent(a in value_strategy(), b in value_strategy()) {
        let once = merge(&a, &b);
        prop_assert_eq!(merge(&once, &b), once);
    }

    #[test]
    fn null_base_yields_defaults(b in value_strategy()) {
        prop_assert_eq!(merge(&Value::Null, &b), b);
    }

    #[test]
    fn scalar_base_wins_outright(a in scalar_strategy(), b in value_strategy()) {
        prop_assert_eq!(merge(&a, &b), a);
    }

    #[test]
    fn merged_object_covers_both_key_sets(a in object_strategy(), b in object_strategy()) {
        let merged = merge(&a, &b);
        let merged_map = merged.as_object().unwrap();
        for key in a.as_object().unwrap().keys() {
            prop_assert!(merged_map.contains_key(key));
        }
        for key in b.as_object().unwrap().keys() {
            prop_assert!(merged_map.contains_key(key));
        }
    }
}
