//! Base and synthesized build-configuration trees.
//!
//! `BaseConfig` is what the caller hands in; `BuildConfig` is what the
//! bundler host consumes. Both carry passthrough maps so fields this
//! library does not interpret (entry points, externals, target, ...)
//! survive the round-trip untouched.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::loaders::LoaderRule;
use crate::merge::merge;
use crate::plugins::PluginSpec;
use crate::stats::StatsReport;

/// Fields this library does not interpret pass through untouched.
pub type Passthrough = Map<String, Value>;

/// The `module` subtree: caller rules first, derived rules appended after,
/// so caller rules take match precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub loaders: Vec<LoaderRule>,

    #[serde(flatten)]
    pub rest: Passthrough,
}

/// The `resolve` subtree. Extension order is match precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub extensions: Vec<String>,

    #[serde(flatten)]
    pub rest: Passthrough,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: ["", ".webpack.js", ".web.js", ".js"]
                .map(String::from)
                .to_vec(),
            rest: Passthrough::new(),
        }
    }
}

/// The `output` subtree: naming templates and emit locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,

    pub pathinfo: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    #[serde(flatten)]
    pub rest: Passthrough,
}

/// Source-map/introspection mode.
///
/// `Off` serializes as `false`, the shape the bundler host expects for a
/// disabled devtool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Devtool {
    #[default]
    Off,
    Mode(String),
}

impl Serialize for Devtool {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Devtool::Off => serializer.serialize_bool(false),
            Devtool::Mode(mode) => serializer.serialize_str(mode),
        }
    }
}

impl<'de> Deserialize<'de> for Devtool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null | Value::Bool(false) => Ok(Devtool::Off),
            Value::String(mode) => Ok(Devtool::Mode(mode)),
            other => Err(D::Error::custom(format!(
                "expected false or a devtool mode string, got {other}"
            ))),
        }
    }
}

/// Caller-owned base configuration, merged over built-in defaults before
/// derivation. Plugins, devtool, debug, and watch are not part of the base
/// tree: synthesis rewrites them unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    pub module: ModuleConfig,
    pub resolve: ResolveConfig,
    pub output: OutputConfig,

    #[serde(flatten)]
    pub rest: Passthrough,
}

impl BaseConfig {
    /// Merge a caller-supplied config value over the built-in defaults and
    /// retype. Defaults are built fresh per call; the input is not mutated.
    pub fn from_value(value: &Value) -> Result<Self> {
        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        let merged = merge(value, &defaults);
        serde_json::from_value(merged).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// A fully assembled configuration, consumable directly by the bundler
/// host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub module: ModuleConfig,
    pub resolve: ResolveConfig,
    pub output: OutputConfig,
    pub plugins: Vec<PluginSpec>,
    pub devtool: Devtool,
    pub debug: bool,

    /// Present (and `true`) only when watch mode was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,

    #[serde(flatten)]
    pub rest: Passthrough,

    /// Loader packages the derived chains require, in first-use order.
    /// A dry diagnostic for the caller; not part of the serialized config.
    #[serde(skip)]
    pub required_loaders: Vec<&'static str>,
}

impl BuildConfig {
    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// The deferred stats-report handler, when `stats` was requested.
    ///
    /// The host registers this against its build-completion event; nothing
    /// is written until [`StatsReport::on_build_done`] runs.
    pub fn stats_report(&self) -> Option<StatsReport> {
        self.plugins.iter().find_map(|plugin| match plugin {
            PluginSpec::StatsReport { path } => Some(StatsReport::new(path.clone())),
            _ => None,
        })
    }
}
