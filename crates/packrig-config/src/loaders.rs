//! Loader registry, invocation chains, and module rules.
//!
//! A synthesized config references loaders by name; the packages backing
//! those names are tracked in a [`LoaderManifest`] so hosts can be told what
//! to install. Nothing here checks that a loader actually exists.

use std::fmt;

use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A named loader and the package that provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderDef {
    pub name: &'static str,
    pub package: &'static str,
}

pub const STYLE: LoaderDef = LoaderDef {
    name: "style",
    package: "style-loader",
};
pub const CSS: LoaderDef = LoaderDef {
    name: "css",
    package: "css-loader",
};
pub const LESS: LoaderDef = LoaderDef {
    name: "less",
    package: "less-loader",
};
pub const AUTOPREFIXER: LoaderDef = LoaderDef {
    name: "autoprefixer",
    package: "autoprefixer-loader",
};
pub const JSX: LoaderDef = LoaderDef {
    name: "jsx",
    package: "jsx-loader",
};
pub const REACT_HOT: LoaderDef = LoaderDef {
    name: "react-hot",
    package: "react-hot-loader",
};

/// Records which loader packages the derived chains rely on.
///
/// One manifest lives for one synthesis pass; there is no process-wide
/// registry to leak state between calls.
#[derive(Debug, Clone, Default)]
pub struct LoaderManifest {
    required: Vec<&'static str>,
}

impl LoaderManifest {
    /// Record a use of `def` and hand back an invocation of it.
    pub fn invoke(&mut self, def: LoaderDef) -> LoaderInvocation {
        if !self.required.contains(&def.package) {
            self.required.push(def.package);
        }
        LoaderInvocation::named(def.name)
    }

    /// Packages required by every invocation recorded so far, in first-use
    /// order.
    pub fn packages(&self) -> &[&'static str] {
        &self.required
    }
}

/// One named transform step in a chain, with an optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderInvocation {
    pub name: String,
    pub query: Option<String>,
}

impl LoaderInvocation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: None,
        }
    }

    /// Append a bare flag query (`name?flag`).
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.query = Some(flag.to_string());
        self
    }

    /// Append a preformatted query (`name?key=value` or `name?{json}`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Parse the `name` / `name?query` shorthand.
    pub fn parse(text: &str) -> Self {
        match text.split_once('?') {
            Some((name, query)) => Self {
                name: name.to_string(),
                query: Some(query.to_string()),
            },
            None => Self::named(text),
        }
    }
}

impl fmt::Display for LoaderInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.name, query),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Anchored suffix pattern selecting the files a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilePattern(String);

impl FilePattern {
    /// Pattern matching files with the given extension (without the dot).
    pub fn suffix(ext: &str) -> Self {
        Self(format!("\\.{ext}$"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `filename` is selected by this pattern. Invalid patterns
    /// select nothing.
    pub fn matches(&self, filename: &str) -> bool {
        Regex::new(&self.0).map(|re| re.is_match(filename)).unwrap_or(false)
    }
}

/// The transform chain of a rule.
///
/// Chains apply right to left: the first invocation in the list lands first
/// in the serialized string and receives the previous tool's output last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderChain {
    /// Inline chain, serialized to the `a!b?query` shorthand.
    Chain(Vec<LoaderInvocation>),
    /// Extraction adapter: the chain output becomes a separate artifact,
    /// `fallback` handles whatever the adapter leaves inline.
    Extract {
        fallback: LoaderInvocation,
        chain: Vec<LoaderInvocation>,
        public_path: String,
    },
}

impl LoaderChain {
    /// The chained invocations joined in apply order (`a!b!c`), excluding
    /// the extract fallback.
    pub fn chain_string(&self) -> String {
        let chain = match self {
            LoaderChain::Chain(chain) => chain,
            LoaderChain::Extract { chain, .. } => chain,
        };
        join_chain(chain)
    }
}

fn join_chain(chain: &[LoaderInvocation]) -> String {
    chain
        .iter()
        .map(LoaderInvocation::to_string)
        .collect::<Vec<_>>()
        .join("!")
}

fn parse_chain(text: &str) -> Vec<LoaderInvocation> {
    text.split('!')
        .filter(|part| !part.is_empty())
        .map(LoaderInvocation::parse)
        .collect()
}

// Serialized form mirrors what the bundler host consumes: a chain is the
// shorthand string, the extraction adapter is a tagged object.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRepr {
    fallback: String,
    loader: String,
    public_path: String,
}

impl Serialize for LoaderChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LoaderChain::Chain(chain) => serializer.serialize_str(&join_chain(chain)),
            LoaderChain::Extract {
                fallback,
                chain,
                public_path,
            } => {
                use serde::ser::SerializeMap;

                let repr = ExtractRepr {
                    fallback: fallback.to_string(),
                    loader: join_chain(chain),
                    public_path: public_path.clone(),
                };
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("extract", &repr)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for LoaderChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(LoaderChain::Chain(parse_chain(&text))),
            Value::Object(map) => {
                let inner = map
                    .get("extract")
                    .cloned()
                    .ok_or_else(|| D::Error::custom("expected a loader string or an extract object"))?;
                let repr: ExtractRepr =
                    serde_json::from_value(inner).map_err(D::Error::custom)?;
                Ok(LoaderChain::Extract {
                    fallback: LoaderInvocation::parse(&repr.fallback),
                    chain: parse_chain(&repr.loader),
                    public_path: repr.public_path,
                })
            }
            other => Err(D::Error::custom(format!(
                "expected a loader string or an extract object, got {other}"
            ))),
        }
    }
}

/// A (file pattern, transform chain) pair.
///
/// Caller-supplied rules keep any extra fields they carry (`include`,
/// `exclude`, ...) in `rest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderRule {
    pub test: FilePattern,
    pub loader: LoaderChain,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl LoaderRule {
    pub fn new(test: FilePattern, loader: LoaderChain) -> Self {
        Self {
            test,
            loader,
            rest: Map::new(),
        }
    }
}
