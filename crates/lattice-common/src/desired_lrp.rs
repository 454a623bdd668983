use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::EnvironmentVariable;
use crate::error::Result;
use crate::routes::Routes;

/// Submission payload for a desired long-running process.
///
/// A fully defaulted instance acts as the template; callers overlay a
/// partial JSON document on a copy with [`DesiredLrpCreateRequest::overlay_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DesiredLrpCreateRequest {
    pub process_guid: String,
    pub name: String,

    /// Scheduling domain the process is registered under.
    pub domain: String,
    pub stack: String,
    pub root_fs: String,
    pub docker_image_path: String,
    pub start_command: String,
    pub start_args: Vec<String>,
    pub instances: u32,
    pub env: Vec<EnvironmentVariable>,

    /// Seconds.
    pub start_timeout: u32,
    pub disk_mb: u32,
    pub memory_mb: u32,
    pub cpu_weight: u32,
    pub privileged: bool,
    pub ports: Vec<u16>,
    pub routes: Routes,
    pub log_guid: String,
    pub log_source: String,
    pub annotation: String,
}

impl DesiredLrpCreateRequest {
    /// Returns a copy of `self` with every field present in `json` replaced.
    ///
    /// Keys match field names ignoring case, `_` and `-`, so `startCommand`
    /// and `start_command` address the same field. Nested objects merge
    /// field by field; arrays and scalars replace; `null` keeps the current
    /// value; unknown keys are ignored. `self` is never modified.
    pub fn overlay_json(&self, json: &str) -> Result<Self> {
        let patch: Value = serde_json::from_str(json)?;
        let patch = match patch {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let msg = format!(
                    "expected a JSON object for the LRP request, found {}",
                    json_kind(&other)
                );
                return Err(<serde_json::Error as serde::de::Error>::custom(msg).into());
            }
        };

        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(base) = &mut merged {
            overlay(base, patch);
        }
        Ok(serde_json::from_value(merged)?)
    }
}

fn overlay(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if value.is_null() {
            continue;
        }
        let target = canonical_key(base, &key);
        let nested = matches!(base.get(&target), Some(Value::Object(_))) && value.is_object();
        if nested {
            if let (Some(Value::Object(existing)), Value::Object(inner)) = (base.get_mut(&target), value) {
                overlay(existing, inner);
            }
        } else {
            base.insert(target, value);
        }
    }
}

fn canonical_key(object: &Map<String, Value>, key: &str) -> String {
    if object.contains_key(key) {
        return key.to_string();
    }
    let wanted = normalize_key(key);
    object
        .keys()
        .find(|candidate| normalize_key(candidate) == wanted)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
