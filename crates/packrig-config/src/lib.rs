pub mod config;
pub mod error;
pub mod loaders;
pub mod merge;
pub mod naming;
pub mod options;
pub mod plugins;
pub mod stats;
mod synth;

// Re-export main types
pub use config::*;
pub use error::*;
pub use loaders::*;
pub use naming::NamingScheme;
pub use options::*;
pub use plugins::PluginSpec;
pub use stats::StatsReport;

// Re-export the top-level transform
pub use synth::{assemble, synthesize};
