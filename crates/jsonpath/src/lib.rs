//! Path-addressable queries and reshaping over decoded JSON.
//!
//! Paths are dot-separated field names with optional bracketed array
//! indices (`items[0].title`). Resolution never fails: anything that does
//! not line up with the document is simply not found.

pub mod mutate;
pub mod path;
pub mod resolve;
pub mod transform;
pub mod validate;

pub use mutate::{set, set_with_policy, CollisionPolicy};
pub use path::{PathExpression, Segment};
pub use resolve::{query, query_str, Lookup};
pub use transform::{transform, transform_with_policy, MappingRules};
pub use validate::{decode, parse, validate, ParseOutcome, ValidationReport, MAX_DEPTH};

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to read mapping spec file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse mapping spec JSON: {0}")]
    SpecParse(#[from] serde_json::Error),
    #[error("Cannot write '{path}': '{key}' already holds a non-object value")]
    Collision { path: String, key: String },
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    /// Path to a JSON object of `source path -> destination path` rules
    pub spec_path: String,
    /// How to treat destination writes blocked by a non-object value
    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

/// A set of mapping rules bound to a collision policy.
#[derive(Debug, Clone)]
pub struct MappingTransformEngine {
    rules: MappingRules,
    policy: CollisionPolicy,
}

impl MappingTransformEngine {
    /// Create a new transform engine from a config
    pub fn new(config: TransformConfig) -> Result<Self, TransformError> {
        let spec_content = std::fs::read_to_string(&config.spec_path)?;
        let rules: MappingRules = serde_json::from_str(&spec_content)?;

        tracing::info!(
            "Loaded {} mapping rules from: {}",
            rules.len(),
            config.spec_path
        );

        Ok(Self {
            rules,
            policy: config.on_collision,
        })
    }

    /// Create a new transform engine from a spec path with the default policy
    pub fn from_spec_path<P: AsRef<Path>>(spec_path: P) -> Result<Self, TransformError> {
        let config = TransformConfig {
            spec_path: spec_path.as_ref().to_string_lossy().to_string(),
            on_collision: CollisionPolicy::default(),
        };
        Self::new(config)
    }

    pub fn from_rules(rules: MappingRules, policy: CollisionPolicy) -> Self {
        Self { rules, policy }
    }

    /// Apply the mapping rules to `input`, which is left untouched
    pub fn transform(&self, input: &Value) -> Result<Value, TransformError> {
        transform_with_policy(input, &self.rules, self.policy)
    }

    pub fn rules(&self) -> &MappingRules {
        &self.rules
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::NamedTempFile;

    fn write_spec(spec: &Value) -> NamedTempFile {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, serde_json::to_string_pretty(spec).unwrap()).unwrap();
        temp_file
    }

    #[test]
    fn test_engine_from_spec_file() {
        let temp_file = write_spec(&json!({
            "name": "data.name",
            "account.type": "data.account_type"
        }));

        let engine = MappingTransformEngine::from_spec_path(temp_file.path()).unwrap();
        assert_eq!(engine.rules().len(), 2);
        assert_eq!(engine.policy(), CollisionPolicy::Skip);

        let input = json!({
            "id": 1,
            "name": "John Smith",
            "account": {"id": 1000, "type": "Checking"}
        });

        let output = engine.transform(&input).unwrap();
        assert_eq!(
            output,
            json!({"data": {"name": "John Smith", "account_type": "Checking"}})
        );
    }

    #[test]
    fn test_config_policy_is_applied() {
        let temp_file = write_spec(&json!({"a": "out", "b": "out.inner"}));
        let config: TransformConfig = serde_json::from_value(json!({
            "spec_path": temp_file.path().to_string_lossy(),
            "on_collision": "reject"
        }))
        .unwrap();

        let engine = MappingTransformEngine::new(config).unwrap();
        let err = engine.transform(&json!({"a": 1, "b": 2})).unwrap_err();
        assert!(matches!(err, TransformError::Collision { .. }));
    }

    #[test]
    fn test_missing_spec_file() {
        let result = MappingTransformEngine::from_spec_path("/nonexistent/mappings.json");
        assert!(matches!(result, Err(TransformError::FileRead(_))));
    }

    #[test]
    fn test_non_string_destination_is_rejected() {
        let temp_file = write_spec(&json!({"a": 1}));
        let result = MappingTransformEngine::from_spec_path(temp_file.path());
        assert!(matches!(result, Err(TransformError::SpecParse(_))));
    }
}
