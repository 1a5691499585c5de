use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::config::Config;
use crate::error::PluginError;
use crate::plugins::plugin::Plugin;
use crate::plugins::types::json_processor::{self, JsonProcessorPlugin};

#[derive(Debug, Deserialize, Clone)]
pub struct PluginInstance {
    pub plugin_type: String, // The plugin type, e.g., "json-processor"
    #[serde(default)]
    pub options: Option<HashMap<String, Value>>, // Plugin-specific options
}

// Create a static empty HashMap to avoid the temporary value issue
static EMPTY_OPTIONS: Lazy<HashMap<String, Value>> = Lazy::new(HashMap::new);

impl PluginInstance {
    /// Builds the plugin this instance describes
    pub fn resolve_plugin(&self) -> Result<Arc<dyn Plugin>, PluginError> {
        let options = self.options.as_ref().unwrap_or(&EMPTY_OPTIONS);
        create_builtin_plugin(&self.plugin_type, options)
    }
}

/// Configured plugins, built once and keyed by id
pub static PLUGIN_REGISTRY: OnceCell<HashMap<String, Arc<dyn Plugin>>> = OnceCell::new();

/// Build every configured plugin instance. Preset files are read here and
/// never again for the life of the process.
pub fn build_plugins(config: &Config) -> Result<HashMap<String, Arc<dyn Plugin>>, PluginError> {
    config
        .plugins
        .iter()
        .map(|(id, instance)| -> Result<_, PluginError> {
            Ok((id.clone(), instance.resolve_plugin()?))
        })
        .collect()
}

pub fn initialise_plugin_registry(config: &Config) -> Result<(), PluginError> {
    if PLUGIN_REGISTRY.get().is_some() {
        return Err(PluginError::config("plugin registry can only be initialised once"));
    }
    let plugins = build_plugins(config)?;
    tracing::info!("Initialised {} configured plugin(s)", plugins.len());

    PLUGIN_REGISTRY
        .set(plugins)
        .map_err(|_| PluginError::config("plugin registry can only be initialised once"))
}

/// Resolves a configured plugin id, falling back to the built-in type names
pub fn resolve_plugin(name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
    match PLUGIN_REGISTRY.get().and_then(|registry| registry.get(name)) {
        Some(plugin) => Ok(Arc::clone(plugin)),
        None => create_builtin_plugin(name, &EMPTY_OPTIONS),
    }
}

/// Creates built-in plugin instances
pub fn create_builtin_plugin(
    plugin_type: &str,
    options: &HashMap<String, Value>,
) -> Result<Arc<dyn Plugin>, PluginError> {
    match plugin_type.to_lowercase().as_str() {
        "json-processor" | "json" => {
            let config = json_processor::parse_config(options).map_err(PluginError::Config)?;
            let plugin = JsonProcessorPlugin::new(config).map_err(PluginError::Config)?;
            Ok(Arc::new(plugin))
        }
        _ => Err(PluginError::UnknownPlugin(plugin_type.to_string())),
    }
}
