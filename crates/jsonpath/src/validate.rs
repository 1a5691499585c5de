use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::PathExpression;
use crate::resolve::query;

/// Outcome of decoding JSON text. Decode failures are reported here, not
/// raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub data: Option<Value>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Deepest array/object nesting [`decode`] accepts.
pub const MAX_DEPTH: usize = 10_000;

/// Decode JSON text into a [`Value`].
///
/// serde_json's own 128-level recursion limit is lifted; nesting up to
/// [`MAX_DEPTH`] is accepted, with the stack grown on the heap as needed.
/// Lone UTF-16 surrogate escapes (`"\ud800"`) are rejected because a
/// `Value` string must be valid UTF-8.
pub fn decode(json_text: &str) -> Result<Value, serde_json::Error> {
    let depth = nesting_depth(json_text);
    if depth > MAX_DEPTH {
        return Err(serde::de::Error::custom(format!(
            "nesting depth {} exceeds the maximum of {}",
            depth, MAX_DEPTH
        )));
    }

    let mut de = serde_json::Deserializer::from_str(json_text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Upper bound on bracket nesting, ignoring brackets inside strings.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for b in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

pub fn parse(json_text: &str) -> ParseOutcome {
    match decode(json_text) {
        Ok(data) => ParseOutcome {
            data: Some(data),
            valid: true,
            error: None,
        },
        Err(e) => ParseOutcome {
            data: None,
            valid: false,
            error: Some(e.to_string()),
        },
    }
}

/// Decode `json_text` and check that every path in `required_paths`
/// resolves. All paths are checked; every missing one is reported.
pub fn validate<S: AsRef<str>>(json_text: &str, required_paths: &[S]) -> ValidationReport {
    let data = match decode(json_text) {
        Ok(data) => data,
        Err(e) => {
            return ValidationReport {
                valid: false,
                errors: vec![format!("Invalid JSON: {}", e)],
            };
        }
    };

    let errors: Vec<String> = required_paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| query(&data, &PathExpression::parse(path)).is_none())
        .map(|path| format!("Required field missing: {}", path))
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
