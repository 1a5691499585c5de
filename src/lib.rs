pub mod config;
pub mod error;
pub mod logging;
pub mod plugins;

pub use error::PluginError;

use crate::plugins::{registry, Params};

/// Resolve `plugin` by configured id or built-in type name and run `action`.
pub async fn run_action(plugin: &str, action: &str, params: &Params) -> Result<Params, PluginError> {
    let plugin = registry::resolve_plugin(plugin)?;
    tracing::info!("Running {}::{}", plugin.metadata().name, action);
    plugin.execute(action, params).await
}
