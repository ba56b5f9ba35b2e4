//! Synthesis options and their normalized forms.
//!
//! Options arrive as loosely typed values (booleans, strings, arrays,
//! mappings) and are resolved into tagged unions once, during
//! normalization. Nothing downstream inspects runtime types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::merge::merge;

/// High-level feature toggles driving the synthesis.
///
/// Unset knobs behave exactly like their documented defaults; the struct is
/// never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    /// Output directory for emitted artifacts.
    pub path: Option<PathBuf>,

    /// Public URL prefix for emitted artifacts.
    pub public_path: Option<String>,

    /// Autoprefixer step for the style chain.
    pub autoprefixer: Autoprefixer,

    /// Split code shared across entry points into a commons chunk.
    pub commons_chunk: bool,

    /// Minimum number of chunks a module must appear in to be pulled into
    /// the commons chunk.
    pub commons_chunk_min: Option<u32>,

    /// Extract stylesheets into a separate artifact instead of inlining
    /// them in the script bundle.
    #[serde(rename = "extractCSS")]
    pub extract_css: bool,

    /// Accepted for interface compatibility; the extraction adapter
    /// currently pins `publicPath` to `""`.
    #[serde(rename = "extractCSSPublicPath")]
    pub extract_css_public_path: String,

    /// Debug mode: verbose path info and source maps.
    pub debug: bool,

    /// Source-map mode used when `debug` is on ("eval", "source-map", ...).
    pub devtool: String,

    /// Fingerprint every emitted artifact name for cache busting.
    pub long_term_caching: bool,

    /// Stylesheet pipeline selection.
    pub style: StylePipeline,

    /// Emit a version map to this path.
    #[serde(deserialize_with = "lenient_string")]
    pub version_map: Option<String>,

    /// Log which loader packages the synthesized config requires.
    pub verbose: bool,

    /// JSX support: `.jsx` resolution and the JSX transform chain.
    pub react: bool,

    /// Prefix the JSX chain with the hot-reload loader.
    pub hot: bool,

    /// Rebuild on change.
    pub watch: bool,

    /// Write the build-statistics document to this path on completion.
    #[serde(deserialize_with = "lenient_path")]
    pub stats: Option<PathBuf>,

    /// Compile-time constants injected into bundled code, in declaration
    /// order.
    #[serde(deserialize_with = "lenient_flags")]
    pub feature_flags: Option<IndexMap<String, Value>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            path: None,
            public_path: None,
            autoprefixer: Autoprefixer::default(),
            commons_chunk: false,
            commons_chunk_min: None,
            extract_css: false,
            extract_css_public_path: String::new(),
            debug: false,
            devtool: "eval".to_string(),
            long_term_caching: false,
            style: StylePipeline::Css,
            version_map: None,
            verbose: false,
            react: true,
            hot: false,
            watch: false,
            stats: None,
            feature_flags: None,
        }
    }
}

impl BuildOptions {
    /// Normalize a caller-supplied options value: merge it over the built-in
    /// defaults, then retype. Defaults are built fresh per call.
    ///
    /// # Example
    ///
    /// ```
    /// use packrig_config::BuildOptions;
    /// use serde_json::json;
    ///
    /// let options = BuildOptions::from_value(&json!({ "commonsChunk": true })).unwrap();
    /// assert!(options.commons_chunk);
    /// assert!(options.react); // default
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::InvalidOptions(e.to_string()))?;
        let merged = merge(value, &defaults);
        serde_json::from_value(merged).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }
}

// `stats` and `versionMap` take a "string or nothing" contract: any
// non-string value means off.
fn lenient_path<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_str().map(PathBuf::from))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_str().map(String::from))
}

// `featureFlags` must be a mapping; anything else means no injection.
fn lenient_flags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<IndexMap<String, Value>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(map.into_iter().collect())),
        _ => Ok(None),
    }
}

/// Autoprefixer request, resolved once at the option boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Autoprefixer {
    /// Plain on/off toggle; no browser list is passed to the loader.
    Toggle(bool),
    /// Single browserslist query, passed as `browsers=<query>`.
    Browsers(String),
    /// Query list, passed as a JSON-encoded `browsers` array.
    BrowserList(Vec<String>),
}

impl<'de> Deserialize<'de> for Autoprefixer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(enabled) => Autoprefixer::Toggle(enabled),
            Value::Null => Autoprefixer::Toggle(false),
            Value::String(query) => Autoprefixer::Browsers(query),
            Value::Array(items) => Autoprefixer::BrowserList(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect(),
            ),
            // Any other truthy value enables the step without parameters.
            _ => Autoprefixer::Toggle(true),
        })
    }
}

impl Default for Autoprefixer {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

impl Autoprefixer {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Toggle(false))
    }

    /// Query string for the autoprefixer invocation, if one is needed.
    pub fn query(&self) -> Option<String> {
        match self {
            Self::Toggle(_) => None,
            Self::Browsers(query) => Some(format!("browsers={query}")),
            Self::BrowserList(list) => {
                Some(serde_json::json!({ "browsers": list }).to_string())
            }
        }
    }
}

/// Stylesheet pipeline selection.
///
/// Unrecognized `style` values resolve to [`StylePipeline::None`] at the
/// deserialization boundary: no style rule and no style plugin, as an
/// explicit outcome rather than a silent fall-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StylePipeline {
    #[default]
    Css,
    Less,
    None,
}

impl StylePipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePipeline::Css => "css",
            StylePipeline::Less => "less",
            StylePipeline::None => "none",
        }
    }
}

impl Serialize for StylePipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StylePipeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(match text.as_str() {
            "css" => StylePipeline::Css,
            "less" => StylePipeline::Less,
            _ => StylePipeline::None,
        })
    }
}
