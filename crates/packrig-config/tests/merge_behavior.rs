//! Tests for the structural merge and value-level normalization.

use packrig_config::merge::merge;
use packrig_config::{synthesize, BaseConfig, BuildOptions};
use serde_json::json;

#[test]
fn merge_of_merge_is_stable() {
    let base = json!({
        "output": { "path": "build", "library": "app" },
        "resolve": { "extensions": [".ts", ".js"] }
    });
    let defaults = json!({
        "module": { "loaders": [] },
        "resolve": { "extensions": ["", ".webpack.js", ".web.js", ".js"] },
        "output": {}
    });

    let once = merge(&base, &defaults);
    assert_eq!(merge(&once, &defaults), once);
}

#[test]
fn base_wins_at_overlapping_keys() {
    let merged = merge(
        &json!({ "output": { "path": "build" } }),
        &json!({ "output": { "path": "dist", "pathinfo": false } }),
    );
    assert_eq!(merged["output"]["path"], json!("build"));
    assert_eq!(merged["output"]["pathinfo"], json!(false));
}

#[test]
fn inputs_are_not_mutated() {
    let base = json!({ "a": { "b": 1 } });
    let defaults = json!({ "a": { "c": 2 } });
    let base_before = base.clone();
    let defaults_before = defaults.clone();

    let _ = merge(&base, &defaults);

    assert_eq!(base, base_before);
    assert_eq!(defaults, defaults_before);
}

#[test]
fn base_config_keeps_unknown_subtrees() {
    let base = BaseConfig::from_value(&json!({
        "entry": { "main": "./app.js", "admin": "./admin.js" },
        "externals": ["react"]
    }))
    .unwrap();

    assert_eq!(base.rest["entry"]["admin"], json!("./admin.js"));
    assert_eq!(base.rest["externals"], json!(["react"]));
}

#[test]
fn options_unknown_keys_are_ignored() {
    let options = BuildOptions::from_value(&json!({ "styel": "less" })).unwrap();
    assert_eq!(options, BuildOptions::default());
}

#[test]
fn normalization_is_stable_across_calls() {
    // Fresh defaults per call: a previous synthesis must not leak state
    // into the next one.
    let first = synthesize(&json!({}), &json!({ "style": "less", "hot": true })).unwrap();
    let second = synthesize(&json!({}), &json!({})).unwrap();
    let third = synthesize(&json!({}), &json!({ "style": "less", "hot": true })).unwrap();

    assert_eq!(first, third);
    assert!(second
        .module
        .loaders
        .iter()
        .all(|rule| rule.test.as_str() != "\\.less$"));
}

#[test]
fn null_inputs_behave_as_empty() {
    let from_null = synthesize(&json!(null), &json!(null)).unwrap();
    let from_empty = synthesize(&json!({}), &json!({})).unwrap();
    assert_eq!(from_null, from_empty);
}
