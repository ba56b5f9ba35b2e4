//! The option-to-configuration derivation pipeline.
//!
//! A sequence of option-gated steps, each appending to the rule list, the
//! plugin list, or the output naming. Steps are independent except that
//! naming is derived first: several later steps embed the templates it
//! produces.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::{BaseConfig, BuildConfig, Devtool};
use crate::error::Result;
use crate::loaders::{
    self, FilePattern, LoaderChain, LoaderManifest, LoaderRule,
};
use crate::naming::NamingScheme;
use crate::options::{BuildOptions, StylePipeline};
use crate::plugins::PluginSpec;

// Top-level keys synthesis rewrites unconditionally; caller-supplied values
// under them never pass through.
const RESERVED: &[&str] = &["plugins", "devtool", "debug", "watch"];

/// Synthesize a complete build configuration from a base config value and
/// an options value.
///
/// Both inputs are normalized (merged over fresh defaults, then retyped)
/// before the derivation pipeline runs; neither is mutated. `Value::Null`
/// stands in for an absent input.
///
/// # Example
///
/// ```
/// use packrig_config::synthesize;
/// use serde_json::json;
///
/// let base = json!({ "entry": { "main": "./app.js" } });
/// let config = synthesize(&base, &json!({ "longTermCaching": true })).unwrap();
///
/// assert_eq!(config.output.filename.as_deref(), Some("[name].[chunkhash].js"));
/// assert_eq!(config.rest["entry"]["main"], json!("./app.js"));
/// ```
pub fn synthesize(base: &Value, options: &Value) -> Result<BuildConfig> {
    let base = BaseConfig::from_value(base)?;
    let options = BuildOptions::from_value(options)?;
    Ok(assemble(base, &options))
}

/// Run the derivation pipeline over already normalized inputs.
///
/// Infallible by construction: every branch below is a total function of
/// the normalized options.
pub fn assemble(base: BaseConfig, options: &BuildOptions) -> BuildConfig {
    let naming = NamingScheme::new(options.long_term_caching);
    let mut manifest = LoaderManifest::default();

    let BaseConfig {
        module,
        resolve,
        output,
        mut rest,
    } = base;
    for key in RESERVED {
        rest.shift_remove(*key);
    }
    let mut config = BuildConfig {
        module,
        resolve,
        output,
        rest,
        ..Default::default()
    };

    // Naming first: later steps embed these templates.
    config.output.filename = Some(naming.chunked("[name]", "js"));
    config.output.chunk_filename = Some(naming.chunked("section_[id]", "js"));
    if let Some(path) = &options.path {
        config.output.path = Some(path.clone());
    }
    if let Some(public_path) = &options.public_path {
        config.output.public_path = Some(public_path.clone());
    }

    let mut plugins = vec![PluginSpec::OccurrenceOrder { prefer_entry: true }];
    let mut derived_rules = Vec::new();

    derive_style(&mut plugins, &mut derived_rules, options, naming, &mut manifest);
    derive_debug(&mut config, options);
    derive_watch(&mut config, options);
    derive_react(&mut config, &mut derived_rules, options, &mut manifest);
    derive_commons_chunk(&mut plugins, options, naming);
    derive_stats(&mut plugins, options);
    derive_feature_flags(&mut plugins, options);
    derive_version_map(&mut plugins, options);

    config.plugins = plugins;
    // Caller rules stay first so they take match precedence.
    config.module.loaders.extend(derived_rules);
    config.required_loaders = manifest.packages().to_vec();

    if options.verbose {
        info!(
            loaders = ?config.required_loaders,
            "loader packages required by the synthesized config"
        );
    }

    config
}

fn derive_style(
    plugins: &mut Vec<PluginSpec>,
    rules: &mut Vec<LoaderRule>,
    options: &BuildOptions,
    naming: NamingScheme,
    manifest: &mut LoaderManifest,
) {
    let (pattern, mut chain) = match options.style {
        StylePipeline::Css => (FilePattern::suffix("css"), vec![manifest.invoke(loaders::CSS)]),
        StylePipeline::Less => (
            FilePattern::suffix("less"),
            vec![manifest.invoke(loaders::CSS), manifest.invoke(loaders::LESS)],
        ),
        StylePipeline::None => {
            debug!("no style pipeline requested");
            return;
        }
    };

    if options.autoprefixer.is_enabled() {
        let mut prefixer = manifest.invoke(loaders::AUTOPREFIXER);
        if let Some(query) = options.autoprefixer.query() {
            prefixer = prefixer.with_query(query);
        }
        // Directly after the css step, before any further preprocessing.
        chain.insert(1, prefixer);
    }

    let fallback = manifest.invoke(loaders::STYLE);
    if options.extract_css {
        plugins.push(PluginSpec::ExtractText {
            filename: naming.chunked("[name]", "css"),
        });
        rules.push(LoaderRule::new(
            pattern,
            LoaderChain::Extract {
                fallback,
                chain,
                public_path: String::new(),
            },
        ));
    } else {
        let mut inline = Vec::with_capacity(chain.len() + 1);
        inline.push(fallback);
        inline.extend(chain);
        rules.push(LoaderRule::new(pattern, LoaderChain::Chain(inline)));
    }
}

// Total override: debug=false forces pathinfo, debug, and devtool off no
// matter what else was supplied.
fn derive_debug(config: &mut BuildConfig, options: &BuildOptions) {
    if options.debug {
        config.output.pathinfo = true;
        config.debug = true;
        config.devtool = Devtool::Mode(options.devtool.clone());
    } else {
        config.output.pathinfo = false;
        config.debug = false;
        config.devtool = Devtool::Off;
    }
}

fn derive_watch(config: &mut BuildConfig, options: &BuildOptions) {
    // Absent, not false, when watch mode is off.
    if options.watch {
        config.watch = Some(true);
    }
}

fn derive_react(
    config: &mut BuildConfig,
    rules: &mut Vec<LoaderRule>,
    options: &BuildOptions,
    manifest: &mut LoaderManifest,
) {
    if !options.react {
        return;
    }

    config.resolve.extensions.push(".jsx".to_string());

    let mut chain = vec![manifest.invoke(loaders::JSX).with_flag("harmony")];
    if options.hot {
        chain.insert(0, manifest.invoke(loaders::REACT_HOT));
    }
    rules.push(LoaderRule::new(
        FilePattern::suffix("jsx"),
        LoaderChain::Chain(chain),
    ));
}

fn derive_commons_chunk(plugins: &mut Vec<PluginSpec>, options: &BuildOptions, naming: NamingScheme) {
    if !options.commons_chunk {
        return;
    }

    plugins.push(PluginSpec::CommonsChunk {
        name: "commons".to_string(),
        filename: naming.chunked("commons", "js"),
        min_chunks: options.commons_chunk_min,
    });
}

fn derive_stats(plugins: &mut Vec<PluginSpec>, options: &BuildOptions) {
    if let Some(path) = &options.stats {
        plugins.push(PluginSpec::StatsReport { path: path.clone() });
    }
}

fn derive_feature_flags(plugins: &mut Vec<PluginSpec>, options: &BuildOptions) {
    if let Some(flags) = &options.feature_flags {
        plugins.push(PluginSpec::Define {
            definitions: flags.clone(),
        });
    }
}

fn derive_version_map(plugins: &mut Vec<PluginSpec>, options: &BuildOptions) {
    if let Some(output_file) = &options.version_map {
        plugins.push(PluginSpec::VersionRetrieval {
            output_file: output_file.clone(),
        });
    }
}
