//! Plugin metadata — the parsed contents of a plugin's `plugin.toml`.

mod definition;
mod strategy;

pub use definition::{
    PluginDefinition, PluginFile, PluginSettings, PluginsSection, ReleaseSettings,
};
pub use strategy::ResolutionStrategy;
