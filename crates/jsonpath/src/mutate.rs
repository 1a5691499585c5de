use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::path::PathExpression;
use crate::TransformError;

/// What to do when an intermediate key of a destination path already holds
/// a non-object value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Abandon the write silently.
    #[default]
    Skip,
    /// Replace the blocking value with a fresh object and keep going.
    Overwrite,
    /// Fail with [`TransformError::Collision`].
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "Unknown collision policy '{}', expected skip, overwrite or reject",
                other
            )),
        }
    }
}

/// Assign `value` at `path` inside `root`, creating intermediate objects.
/// Returns whether the value was written.
pub fn set(root: &mut Map<String, Value>, path: &PathExpression, value: Value) -> bool {
    // Skip never produces an error
    set_with_policy(root, path, value, CollisionPolicy::Skip).unwrap_or(false)
}

/// Like [`set`], with an explicit policy for non-object intermediates.
///
/// Each dot-separated part of the path is used as a literal key, so
/// `items[0]` on a destination names a key rather than an array slot.
/// The root path is a no-op.
pub fn set_with_policy(
    root: &mut Map<String, Value>,
    path: &PathExpression,
    value: Value,
    policy: CollisionPolicy,
) -> Result<bool, TransformError> {
    let keys = path.literal_keys();
    let Some((last, parents)) = keys.split_last() else {
        return Ok(false);
    };

    let mut current = root;
    for key in parents {
        let slot = current
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !slot.is_object() {
            match policy {
                CollisionPolicy::Skip => {
                    tracing::debug!("Abandoning write to '{}': '{}' is not an object", path, key);
                    return Ok(false);
                }
                CollisionPolicy::Overwrite => {
                    tracing::debug!("Replacing non-object '{}' while writing '{}'", key, path);
                    *slot = Value::Object(Map::new());
                }
                CollisionPolicy::Reject => {
                    return Err(TransformError::Collision {
                        path: path.to_string(),
                        key: (*key).to_string(),
                    });
                }
            }
        }

        current = match slot {
            Value::Object(map) => map,
            _ => return Ok(false),
        };
    }

    current.insert((*last).to_string(), value);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_json(root: &mut Map<String, Value>, path: &str, value: Value) -> bool {
        set(root, &PathExpression::parse(path), value)
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut root = Map::new();
        assert!(set_json(&mut root, "a.b.c", json!(1)));
        assert_eq!(Value::Object(root), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_descends_existing_objects() {
        let mut root = Map::new();
        set_json(&mut root, "user.first", json!("Ann"));
        set_json(&mut root, "user.last", json!("Lee"));
        assert_eq!(
            Value::Object(root),
            json!({"user": {"first": "Ann", "last": "Lee"}})
        );
    }

    #[test]
    fn test_set_overwrites_leaf() {
        let mut root = Map::new();
        set_json(&mut root, "a", json!({"nested": true}));
        set_json(&mut root, "a", json!(2));
        assert_eq!(Value::Object(root), json!({"a": 2}));
    }

    #[test]
    fn test_root_path_is_noop() {
        let mut root = Map::new();
        assert!(!set_json(&mut root, "", json!(1)));
        assert!(root.is_empty());
    }

    #[test]
    fn test_index_segments_are_literal_keys() {
        let mut root = Map::new();
        set_json(&mut root, "list[0].name", json!("x"));
        assert_eq!(Value::Object(root), json!({"list[0]": {"name": "x"}}));
    }

    #[test]
    fn test_collision_skip_abandons_write() {
        let mut root = Map::new();
        set_json(&mut root, "a", json!("scalar"));
        assert!(!set_json(&mut root, "a.b", json!(1)));
        assert_eq!(Value::Object(root), json!({"a": "scalar"}));
    }

    #[test]
    fn test_collision_overwrite_replaces_value() {
        let mut root = Map::new();
        root.insert("a".to_string(), json!([1, 2]));
        let written = set_with_policy(
            &mut root,
            &PathExpression::parse("a.b"),
            json!(1),
            CollisionPolicy::Overwrite,
        )
        .unwrap();
        assert!(written);
        assert_eq!(Value::Object(root), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_collision_reject_errors() {
        let mut root = Map::new();
        root.insert("a".to_string(), json!(5));
        let err = set_with_policy(
            &mut root,
            &PathExpression::parse("a.b.c"),
            json!(1),
            CollisionPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::Collision { ref key, .. } if key == "a"));
        assert_eq!(Value::Object(root), json!({"a": 5}));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Overwrite".parse::<CollisionPolicy>(), Ok(CollisionPolicy::Overwrite));
        assert!("merge".parse::<CollisionPolicy>().is_err());
    }
}
