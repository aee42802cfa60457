//! The per-field interpolation configuration bag.

use intarsia_error::{ConfigError, IntarsiaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How the prompt for a field is produced.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// One prompt per delta of the configured base field.
    Base,
    /// A single prompt rendered from the whole-entity token set.
    Token,
}

/// Which processing strategy executes the field's jobs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkerType {
    /// Synchronous, inside the triggering save.
    Direct,
    /// Deferred within the save lifecycle, drained at its end.
    Batch,
    /// Durable queue, consumed by a worker at a later time.
    Queue,
}

/// The configuration bag for one (bundle, field) combination.
///
/// Owned by the external configuration subsystem and read-only to the
/// pipeline; all keys are opaque except the ones interpreted here. For any
/// key `K` an optional `K_override` template may be present; the resolver
/// renders it against the entity at run time.
///
/// # Examples
///
/// ```
/// use intarsia_core::{InterpolationConfig, WorkerType};
/// use serde_json::json;
///
/// let mut config = InterpolationConfig::new("field_mail");
/// config.insert("rule", json!("email"));
/// config.insert("base_field", json!("body"));
/// config.insert("worker_type", json!("queue"));
/// assert_eq!(config.rule().unwrap(), "email");
/// assert_eq!(config.worker_type(), WorkerType::Queue);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    values: BTreeMap<String, Value>,
}

impl InterpolationConfig {
    /// Create a config bag for the named target field.
    pub fn new(field_name: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert("field_name".to_string(), Value::String(field_name.into()));
        Self { values }
    }

    /// Set a key. Builder-style chaining is intentional for test setup.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Raw value of a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of a key, when present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a key; accepts JSON bools and 0/1 numbers.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(n.as_i64()? != 0),
            _ => None,
        }
    }

    /// All keys in the bag.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The target field this configuration belongs to.
    pub fn field_name(&self) -> &str {
        self.get_str("field_name").unwrap_or_default()
    }

    /// The configured rule identifier.
    ///
    /// # Errors
    ///
    /// Missing `rule` on an enabled config is a configuration error.
    pub fn rule(&self) -> IntarsiaResult<&str> {
        self.get_str("rule").ok_or_else(|| {
            ConfigError::new(format!(
                "Missing required key 'rule' on field '{}'",
                self.field_name()
            ))
            .into()
        })
    }

    /// The configured source field name.
    ///
    /// # Errors
    ///
    /// Missing `base_field` on an enabled config is a configuration error.
    pub fn base_field(&self) -> IntarsiaResult<&str> {
        self.get_str("base_field").ok_or_else(|| {
            ConfigError::new(format!(
                "Missing required key 'base_field' on field '{}'",
                self.field_name()
            ))
            .into()
        })
    }

    /// Prompt production mode; absent or unknown values mean base mode.
    pub fn mode(&self) -> Mode {
        self.get_str("mode")
            .and_then(|m| m.parse().ok())
            .unwrap_or(Mode::Base)
    }

    /// Processing order; lower weights run first.
    pub fn weight(&self) -> i64 {
        self.get("weight").and_then(Value::as_i64).unwrap_or(0)
    }

    /// The configured processing strategy; defaults to direct.
    pub fn worker_type(&self) -> WorkerType {
        self.get_str("worker_type")
            .and_then(|w| w.parse().ok())
            .unwrap_or(WorkerType::Direct)
    }

    /// Whether a filled target field is regenerated when the source changes.
    pub fn edit_mode(&self) -> bool {
        self.get_bool("edit_mode").unwrap_or(false)
    }

    /// The prompt template for base mode.
    pub fn prompt(&self) -> Option<&str> {
        self.get_str("prompt")
    }

    /// The template for token mode.
    pub fn token_template(&self) -> Option<&str> {
        self.get_str("token")
    }
}
