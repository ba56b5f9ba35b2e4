//! Deep structural merge used for config and option normalization.
//!
//! Both inputs of the top-level transform go through the same rule: the
//! caller-supplied value is merged over freshly built defaults, then the
//! merged value is deserialized back into the typed model.

use serde_json::Value;

/// Merge `base` over `defaults`, returning a new value.
///
/// For each key present in both operands: if both values are objects, merge
/// recursively; otherwise the base value wins. Keys only one operand carries
/// are kept as-is. Arrays are replaced wholesale, never merged element-wise.
/// Null behaves like an absent value, so `merge(Null, defaults)` is the
/// defaults. Neither input is mutated.
///
/// The operation is idempotent: `merge(merge(a, b), b) == merge(a, b)`.
pub fn merge(base: &Value, defaults: &Value) -> Value {
    match (base, defaults) {
        (Value::Object(base_map), Value::Object(default_map)) => {
            let mut out = serde_json::Map::with_capacity(base_map.len() + default_map.len());
            for (key, default_value) in default_map {
                let merged = match base_map.get(key) {
                    Some(base_value) => merge(base_value, default_value),
                    None => default_value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            for (key, base_value) in base_map {
                if !out.contains_key(key) {
                    out.insert(key.clone(), base_value.clone());
                }
            }
            Value::Object(out)
        }
        (Value::Null, defaults) => defaults.clone(),
        (base, _) => base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_wins_on_scalar_conflict() {
        let merged = merge(&json!({ "debug": true }), &json!({ "debug": false }));
        assert_eq!(merged, json!({ "debug": true }));
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let merged = merge(&json!({ "a": 1 }), &json!({ "b": 2 }));
        assert_eq!(merged, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let base = json!({ "output": { "path": "build" } });
        let defaults = json!({ "output": { "path": "dist", "pathinfo": false } });
        assert_eq!(
            merge(&base, &defaults),
            json!({ "output": { "path": "build", "pathinfo": false } })
        );
    }

    #[test]
    fn arrays_are_replaced_not_merged() {
        let base = json!({ "extensions": [".js"] });
        let defaults = json!({ "extensions": ["", ".web.js", ".js"] });
        assert_eq!(merge(&base, &defaults), json!({ "extensions": [".js"] }));
    }

    #[test]
    fn null_base_acts_as_empty() {
        let defaults = json!({ "style": "css" });
        assert_eq!(merge(&Value::Null, &defaults), defaults);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = json!({ "x": { "y": 1 }, "z": [1, 2] });
        let b = json!({ "x": { "y": 2, "w": 3 }, "q": true });
        let once = merge(&a, &b);
        assert_eq!(merge(&once, &b), once);
    }
}
