use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{PathExpression, Segment};

/// Result of a boundary query: `result` is `Null` when nothing was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub result: Value,
    pub found: bool,
}

/// Walk `value` along `path`. Any structural mismatch (wrong container,
/// missing key, out-of-range or invalid index) yields `None`.
pub fn query<'a>(value: &'a Value, path: &PathExpression) -> Option<&'a Value> {
    let mut current = value;

    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name)?,
            (Segment::Index(n), Value::Array(items)) => items.get(*n)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Parse `path` and query `value`, returning the boundary record.
pub fn query_str(value: &Value, path: &str) -> Lookup {
    match query(value, &PathExpression::parse(path)) {
        Some(found) => Lookup {
            result: found.clone(),
            found: true,
        },
        None => Lookup {
            result: Value::Null,
            found: false,
        },
    }
}
