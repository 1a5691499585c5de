use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::mutate::{set_with_policy, CollisionPolicy};
use crate::path::PathExpression;
use crate::resolve::query;
use crate::TransformError;

/// Source path -> destination path. Rules are applied in source-path order.
pub type MappingRules = BTreeMap<String, String>;

/// Build a new object by relocating values from `data` according to
/// `mappings`. Rules whose source path is absent write nothing.
pub fn transform(data: &Value, mappings: &MappingRules) -> Value {
    // Skip never produces an error
    transform_with_policy(data, mappings, CollisionPolicy::Skip)
        .unwrap_or_else(|_| Value::Object(Map::new()))
}

pub fn transform_with_policy(
    data: &Value,
    mappings: &MappingRules,
    policy: CollisionPolicy,
) -> Result<Value, TransformError> {
    let mut result = Map::new();

    for (old_path, new_path) in mappings {
        let Some(value) = query(data, &PathExpression::parse(old_path)) else {
            tracing::debug!("Source path '{}' not found, skipping", old_path);
            continue;
        };
        set_with_policy(
            &mut result,
            &PathExpression::parse(new_path),
            value.clone(),
            policy,
        )?;
    }

    Ok(Value::Object(result))
}
