use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::PluginError;

/// Inputs and outputs of a plugin action.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
    pub license: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InputSpec {
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl InputSpec {
    pub fn required(value_type: &str, description: &str) -> Self {
        Self {
            value_type: value_type.to_string(),
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn optional(value_type: &str, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(value_type, description)
        }
    }

    /// Value the action assumes when an optional input is omitted
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutputSpec {
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: String,
}

impl OutputSpec {
    pub fn new(value_type: &str, description: &str) -> Self {
        Self {
            value_type: value_type.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    pub inputs: BTreeMap<String, InputSpec>,
    pub outputs: BTreeMap<String, OutputSpec>,
}

/// Capability contract every plugin implements.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> Metadata;

    /// Every action this plugin can execute, with its input/output schema
    fn actions(&self) -> Vec<ActionSpec>;

    /// Validate parameters before execution
    fn validate(&self, _params: &Params) -> Result<(), PluginError> {
        // Default implementation - can be overridden
        Ok(())
    }

    /// Run `action` with `params`, returning its outputs.
    async fn execute(&self, action: &str, params: &Params) -> Result<Params, PluginError>;
}
