//! Deferred stats-reporting behavior.

use packrig_config::{synthesize, ConfigError, PluginSpec, StatsReport};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn synthesis_never_writes() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("stats.json");

    let config = synthesize(&json!({}), &json!({ "stats": &path })).unwrap();

    assert!(!path.exists());
    assert!(config
        .plugins
        .iter()
        .any(|plugin| matches!(plugin, PluginSpec::StatsReport { .. })));
}

#[test]
fn handler_writes_filtered_document_on_completion() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("stats.json");

    let config = synthesize(&json!({}), &json!({ "stats": &path })).unwrap();
    let report = config.stats_report().expect("stats handler");
    assert_eq!(report.path(), path);

    report
        .on_build_done(&json!({
            "hash": "0123abcd",
            "modules": [
                { "name": "./src/app.js", "size": 420 },
                { "name": "~/node-libs-browser/mock/empty.js", "size": 1 }
            ],
            "chunks": [
                { "id": 0, "modules": [{ "identifier": "x/node-libs-browser/y.js" }] }
            ]
        }))
        .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["hash"], json!("0123abcd"));
    assert_eq!(written["modules"].as_array().unwrap().len(), 1);
    assert_eq!(written["modules"][0]["name"], json!("./src/app.js"));
    assert!(written["chunks"][0]["modules"].as_array().unwrap().is_empty());
}

#[test]
fn no_stats_option_means_no_handler() {
    let config = synthesize(&json!({}), &json!({})).unwrap();
    assert!(config.stats_report().is_none());
}

#[test]
fn unwritable_path_surfaces_as_io_error_at_completion() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("missing-subdir").join("stats.json");

    let report = StatsReport::new(path);
    let err = report.on_build_done(&json!({})).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
