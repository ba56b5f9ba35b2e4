//! Build-time plugin descriptors.
//!
//! Synthesis decides which plugin kinds the host should instantiate, in
//! what order, with what constructor parameters. The descriptors are plain
//! data; the host owns construction and execution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One plugin the host must instantiate.
///
/// Relative order is part of the contract: the occurrence-order optimizer
/// always comes first, feature-gated plugins follow in derivation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum PluginSpec {
    /// Ordering optimizer; always the first entry.
    #[serde(rename_all = "camelCase")]
    OccurrenceOrder { prefer_entry: bool },

    /// Moves stylesheet output into a separate artifact named `filename`.
    ExtractText { filename: String },

    /// Splits code shared across entry points into a dedicated chunk.
    #[serde(rename_all = "camelCase")]
    CommonsChunk {
        name: String,
        filename: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_chunks: Option<u32>,
    },

    /// Injects compile-time constants into bundled code.
    Define {
        definitions: IndexMap<String, Value>,
    },

    /// Retrieves/emits a version map to `outputFile`.
    #[serde(rename_all = "camelCase")]
    VersionRetrieval { output_file: String },

    /// Writes the completion-time statistics document to `path`.
    ///
    /// Deferred: see [`crate::stats::StatsReport`]. Synthesis itself never
    /// touches the filesystem.
    StatsReport { path: PathBuf },
}
