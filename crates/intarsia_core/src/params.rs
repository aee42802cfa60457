//! Model parameters passed to the generation backend.

use crate::InterpolationConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Common sampling parameters for a generation call.
///
/// Defaults match the configuration UI defaults of the host platform.
///
/// # Examples
///
/// ```
/// use intarsia_core::GenerationParamsBuilder;
///
/// let params = GenerationParamsBuilder::default()
///     .temperature(0.2)
///     .max_tokens(256u32)
///     .build()
///     .unwrap();
/// assert_eq!(params.top_k, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(derive(Debug))]
pub struct GenerationParams {
    /// Sampling temperature.
    #[builder(default = "0.5")]
    pub temperature: f64,
    /// Maximum number of tokens to generate.
    #[builder(default = "1024")]
    pub max_tokens: u32,
    /// Nucleus sampling probability.
    #[builder(default = "1.0")]
    pub top_p: f64,
    /// Top-k sampling cutoff.
    #[builder(default = "50")]
    pub top_k: u32,
    /// Frequency penalty.
    #[builder(default = "0.0")]
    pub frequency_penalty: f64,
    /// Presence penalty.
    #[builder(default = "0.0")]
    pub presence_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParamsBuilder::default()
            .build()
            .unwrap_or(GenerationParams {
                temperature: 0.5,
                max_tokens: 1024,
                top_p: 1.0,
                top_k: 50,
                frequency_penalty: 0.0,
                presence_penalty: 0.0,
            })
    }
}

impl GenerationParams {
    /// Extract parameters from a config bag, using the `{prefix}_` keys the
    /// configuration subsystem writes (e.g. `openai_temperature`).
    /// Missing or malformed keys keep their defaults.
    pub fn from_config(prefix: &str, config: &InterpolationConfig) -> Self {
        let mut params = Self::default();
        let key = |name: &str| format!("{prefix}_{name}");
        if let Some(v) = config.get(&key("temperature")).and_then(Value::as_f64) {
            params.temperature = v;
        }
        if let Some(v) = config.get(&key("max_tokens")).and_then(Value::as_u64) {
            params.max_tokens = v as u32;
        }
        if let Some(v) = config.get(&key("top_p")).and_then(Value::as_f64) {
            params.top_p = v;
        }
        if let Some(v) = config.get(&key("top_k")).and_then(Value::as_u64) {
            params.top_k = v as u32;
        }
        if let Some(v) = config.get(&key("frequency_penalty")).and_then(Value::as_f64) {
            params.frequency_penalty = v;
        }
        if let Some(v) = config.get(&key("presence_penalty")).and_then(Value::as_f64) {
            params.presence_penalty = v;
        }
        params
    }
}
