//! Deferred build-statistics reporting.
//!
//! Synthesis only records *that* a report should happen (a `stats-report`
//! plugin descriptor). The host registers the [`StatsReport`] handler
//! against its build-completion event; computing the report document and
//! persisting it are separate steps so the former stays pure.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

// Module entries matching this are platform shims injected by the host,
// not application code.
const SHIM_EXCLUDE_PATTERN: &str = "node-libs-browser";

fn shim_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SHIM_EXCLUDE_PATTERN).expect("fixed pattern compiles"))
}

/// Completion handler that persists the build-statistics document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    path: PathBuf,
}

impl StatsReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shape the raw stats document for the report: per-chunk module detail
    /// is kept verbatim, module entries matching the shim exclusion are
    /// dropped. Pure; no I/O.
    pub fn render(raw: &Value) -> Value {
        let mut doc = raw.clone();
        strip_shim_modules(&mut doc);
        doc
    }

    /// Write an already rendered document to the report path.
    pub fn persist(&self, doc: &Value) -> Result<()> {
        debug!(path = %self.path.display(), "writing build stats");
        fs::write(&self.path, doc.to_string())?;
        Ok(())
    }

    /// Completion-event entry point for the host: render, then persist.
    /// An unwritable path surfaces here, at completion time.
    pub fn on_build_done(&self, raw: &Value) -> Result<()> {
        self.persist(&Self::render(raw))
    }
}

fn strip_shim_modules(doc: &mut Value) {
    let Value::Object(map) = doc else { return };
    if let Some(Value::Array(modules)) = map.get_mut("modules") {
        modules.retain(|module| !is_shim(module));
    }
    if let Some(Value::Array(chunks)) = map.get_mut("chunks") {
        for chunk in chunks {
            strip_shim_modules(chunk);
        }
    }
}

fn is_shim(module: &Value) -> bool {
    ["name", "identifier"].iter().any(|key| {
        module
            .get(*key)
            .and_then(Value::as_str)
            .is_some_and(|text| shim_pattern().is_match(text))
    })
}
