use async_trait::async_trait;
use chorus_jsonpath::{CollisionPolicy, MappingRules, MappingTransformEngine, TransformConfig};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::error::PluginError;
use crate::plugins::plugin::{ActionSpec, InputSpec, Metadata, OutputSpec, Params, Plugin};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JsonProcessorConfig {
    /// Policy for destination writes blocked by a non-object value
    #[serde(default)]
    pub on_collision: CollisionPolicy,
    /// Mapping rules file used by `transform` when no `mappings` are passed
    #[serde(default)]
    pub mappings_path: Option<String>,
}

/// The closed set of actions the JSON processor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonAction {
    Parse,
    Query,
    Validate,
    Transform,
}

impl JsonAction {
    pub const ALL: [JsonAction; 4] = [
        JsonAction::Parse,
        JsonAction::Query,
        JsonAction::Validate,
        JsonAction::Transform,
    ];

    pub fn name(self) -> &'static str {
        match self {
            JsonAction::Parse => "parse",
            JsonAction::Query => "query",
            JsonAction::Validate => "validate",
            JsonAction::Transform => "transform",
        }
    }

    pub fn spec(self) -> ActionSpec {
        let (description, inputs, outputs) = match self {
            JsonAction::Parse => (
                "Parse JSON string into structured data",
                vec![("json", InputSpec::required("string", "JSON string to parse"))],
                vec![
                    ("data", OutputSpec::new("object", "Parsed JSON data")),
                    ("valid", OutputSpec::new("boolean", "Whether the JSON was valid")),
                    ("error", OutputSpec::new("string", "Parse error, when invalid")),
                ],
            ),
            JsonAction::Query => (
                "Query JSON data using simple path syntax",
                vec![
                    (
                        "data",
                        InputSpec::required("object", "JSON data to query (or JSON string)"),
                    ),
                    (
                        "path",
                        InputSpec::required(
                            "string",
                            "JSON path (e.g., 'user.name', 'items[0].title')",
                        ),
                    ),
                ],
                vec![
                    ("result", OutputSpec::new("object", "Query result")),
                    ("found", OutputSpec::new("boolean", "Whether the path was found")),
                    ("path", OutputSpec::new("string", "The queried path")),
                ],
            ),
            JsonAction::Validate => (
                "Validate JSON structure",
                vec![
                    ("json", InputSpec::required("string", "JSON string to validate")),
                    (
                        "required_fields",
                        InputSpec::optional("array", "List of required field paths")
                            .with_default(Value::Array(Vec::new())),
                    ),
                ],
                vec![
                    ("valid", OutputSpec::new("boolean", "Whether the JSON is valid")),
                    ("errors", OutputSpec::new("array", "Validation errors")),
                ],
            ),
            JsonAction::Transform => (
                "Transform JSON data",
                vec![
                    ("data", InputSpec::required("object", "JSON data to transform")),
                    (
                        "mappings",
                        InputSpec::required("object", "Field mappings (old_path: new_path)"),
                    ),
                ],
                vec![("result", OutputSpec::new("object", "Transformed data"))],
            ),
        };

        ActionSpec {
            name: self.name().to_string(),
            description: description.to_string(),
            inputs: into_map(inputs),
            outputs: into_map(outputs),
        }
    }
}

fn into_map<T>(entries: Vec<(&str, T)>) -> BTreeMap<String, T> {
    entries
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect()
}

impl FromStr for JsonAction {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonAction::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| PluginError::UnknownAction(s.to_string()))
    }
}

/// Parse, query, validate and reshape JSON documents.
#[derive(Default)]
pub struct JsonProcessorPlugin {
    policy: CollisionPolicy,
    preset: Option<MappingTransformEngine>,
}

impl JsonProcessorPlugin {
    pub fn new(config: JsonProcessorConfig) -> Result<Self, String> {
        let preset = match config.mappings_path {
            Some(spec_path) => {
                let engine = MappingTransformEngine::new(TransformConfig {
                    spec_path,
                    on_collision: config.on_collision,
                })
                .map_err(|e| format!("Failed to load preset mappings: {}", e))?;
                Some(engine)
            }
            None => None,
        };

        tracing::debug!(
            "JSON processor initialized (collisions: {:?}, preset mappings: {})",
            config.on_collision,
            preset.is_some()
        );
        Ok(Self {
            policy: config.on_collision,
            preset,
        })
    }

    fn execute_parse(&self, params: &Params) -> Result<Params, PluginError> {
        let json = require_str(params, "json")?;
        let outcome = chorus_jsonpath::parse(json);

        let mut out = Params::new();
        out.insert("data".into(), outcome.data.unwrap_or(Value::Null));
        out.insert("valid".into(), Value::Bool(outcome.valid));
        if let Some(error) = outcome.error {
            out.insert("error".into(), Value::String(error));
        }
        Ok(out)
    }

    fn execute_query(&self, params: &Params) -> Result<Params, PluginError> {
        let data = require(params, "data")?;
        let path = require_str(params, "path")?;

        // A string is taken to be undecoded JSON
        let decoded;
        let data = match data {
            Value::String(text) => {
                decoded = chorus_jsonpath::decode(text)
                    .map_err(|e| PluginError::InvalidData(e.to_string()))?;
                &decoded
            }
            other => other,
        };

        let lookup = chorus_jsonpath::query_str(data, path);

        let mut out = Params::new();
        out.insert("result".into(), lookup.result);
        out.insert("found".into(), Value::Bool(lookup.found));
        out.insert("path".into(), Value::String(path.to_string()));
        Ok(out)
    }

    fn execute_validate(&self, params: &Params) -> Result<Params, PluginError> {
        let json = require_str(params, "json")?;
        let required: Vec<&str> = params
            .get("required_fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let report = chorus_jsonpath::validate(json, required.as_slice());

        let mut out = Params::new();
        out.insert("valid".into(), Value::Bool(report.valid));
        out.insert(
            "errors".into(),
            Value::Array(report.errors.into_iter().map(Value::String).collect()),
        );
        Ok(out)
    }

    fn execute_transform(&self, params: &Params) -> Result<Params, PluginError> {
        let data = require(params, "data")?;

        // Explicit mappings win over the preset loaded from config
        let mappings = match (params.get("mappings"), &self.preset) {
            (Some(mappings), _) => mappings
                .as_object()
                .ok_or_else(|| PluginError::invalid("mappings", "expected an object"))?,
            (None, Some(engine)) => {
                let mut out = Params::new();
                out.insert("result".into(), engine.transform(data)?);
                return Ok(out);
            }
            (None, None) => return Err(PluginError::MissingParameter("mappings")),
        };

        let mut rules = MappingRules::new();
        for (old_path, new_path) in mappings {
            match new_path.as_str() {
                Some(new_path) => {
                    rules.insert(old_path.clone(), new_path.to_string());
                }
                None => tracing::debug!(
                    "Skipping mapping '{}': destination is not a string",
                    old_path
                ),
            }
        }

        let result = MappingTransformEngine::from_rules(rules, self.policy).transform(data)?;

        let mut out = Params::new();
        out.insert("result".into(), result);
        Ok(out)
    }
}

#[async_trait]
impl Plugin for JsonProcessorPlugin {
    fn metadata(&self) -> Metadata {
        Metadata {
            name: "json-processor".to_string(),
            version: "1.0.0".to_string(),
            description: "JSON parsing, manipulation, and validation".to_string(),
            author: "Chorus Team".to_string(),
            tags: ["json", "data", "parsing", "validation", "transform"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            license: "Apache-2.0".to_string(),
        }
    }

    fn actions(&self) -> Vec<ActionSpec> {
        let mut actions: Vec<ActionSpec> =
            JsonAction::ALL.into_iter().map(JsonAction::spec).collect();
        if self.preset.is_some() {
            for action in actions.iter_mut().filter(|a| a.name == "transform") {
                if let Some(input) = action.inputs.get_mut("mappings") {
                    input.required = false;
                }
            }
        }
        actions
    }

    /// Reject parameters whose type can never be accepted by any action
    fn validate(&self, params: &Params) -> Result<(), PluginError> {
        for name in ["json", "path"] {
            if params.get(name).is_some_and(|v| !v.is_string()) {
                return Err(PluginError::invalid(name, "expected a string"));
            }
        }
        if params.get("required_fields").is_some_and(|v| !v.is_array()) {
            return Err(PluginError::invalid("required_fields", "expected an array"));
        }
        if params.get("mappings").is_some_and(|v| !v.is_object()) {
            return Err(PluginError::invalid("mappings", "expected an object"));
        }
        Ok(())
    }

    async fn execute(&self, action: &str, params: &Params) -> Result<Params, PluginError> {
        let action: JsonAction = action.parse()?;
        self.validate(params)?;

        tracing::debug!("Executing json-processor action '{}'", action.name());

        match action {
            JsonAction::Parse => self.execute_parse(params),
            JsonAction::Query => self.execute_query(params),
            JsonAction::Validate => self.execute_validate(params),
            JsonAction::Transform => self.execute_transform(params),
        }
    }
}

fn require<'a>(params: &'a Params, name: &'static str) -> Result<&'a Value, PluginError> {
    params.get(name).ok_or(PluginError::MissingParameter(name))
}

fn require_str<'a>(params: &'a Params, name: &'static str) -> Result<&'a str, PluginError> {
    require(params, name)?
        .as_str()
        .ok_or_else(|| PluginError::invalid(name, "expected a string"))
}

/// Parse configuration from HashMap for the plugin registry
pub fn parse_config(options: &HashMap<String, Value>) -> Result<JsonProcessorConfig, String> {
    let on_collision = match options.get("on_collision") {
        None => CollisionPolicy::default(),
        Some(Value::String(s)) => s.parse()?,
        Some(_) => return Err("'on_collision' must be a string".to_string()),
    };

    let mappings_path = match options.get("mappings_path") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err("'mappings_path' must be a string".to_string()),
    };

    Ok(JsonProcessorConfig {
        on_collision,
        mappings_path,
    })
}
