//! Error types for plugin resolution and action execution

use chorus_jsonpath::TransformError;
use thiserror::Error;

/// Error types that can occur while resolving or running a plugin action
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("Invalid '{name}' parameter: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Failed to parse JSON data: {0}")]
    InvalidData(String),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Plugin configuration error: {0}")]
    Config(String),
}

impl PluginError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether the caller supplied bad input, as opposed to a host/config problem
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PluginError::MissingParameter(_)
                | PluginError::InvalidParameter { .. }
                | PluginError::InvalidData(_)
                | PluginError::UnknownAction(_)
        )
    }
}
