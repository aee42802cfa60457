//! Orchestration of one interpolation job.

use crate::{PromptRenderer, ResponseNormalizer};
use intarsia_core::{Entity, FieldDefinition, GenerationParams, InterpolationConfig};
use intarsia_error::{IntarsiaResult, RuleNotFoundError};
use intarsia_interface::{GenerationClient, ValueMutator};
use intarsia_rules::RuleRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Runs one (entity, field, config) job end to end.
///
/// Resolve rule, render prompts, call the backend once per prompt,
/// normalize, verify, store. Verifier rejections are dropped silently; a
/// job that ends with no accepted values leaves the field untouched and is
/// not an error.
pub struct RuleRunner {
    registry: Arc<RuleRegistry>,
    client: Arc<dyn GenerationClient>,
    prompts: PromptRenderer,
    value_mutator: Option<Arc<dyn ValueMutator>>,
}

impl RuleRunner {
    /// Create a runner over a rule catalog and a generation backend.
    pub fn new(
        registry: Arc<RuleRegistry>,
        client: Arc<dyn GenerationClient>,
        prompts: PromptRenderer,
        value_mutator: Option<Arc<dyn ValueMutator>>,
    ) -> Self {
        Self {
            registry,
            client,
            prompts,
            value_mutator,
        }
    }

    /// The rule catalog this runner resolves against.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run one job, mutating the entity's target field on success.
    ///
    /// # Errors
    ///
    /// Fails with `RuleNotFoundError` when the configured rule id does not
    /// resolve, with `ConfigError` on an incomplete config, and propagates
    /// backend and storage failures.
    pub async fn run(
        &self,
        entity: &mut Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> IntarsiaResult<()> {
        let rule_id = config.rule()?;
        let rule = self.registry.find_rule(rule_id).ok_or_else(|| {
            RuleNotFoundError::new(format!("The rule could not be found: {}", field.kind()))
        })?;

        let prompts = self
            .prompts
            .render(rule.as_ref(), entity, field, config)
            .await?;
        if prompts.is_empty() {
            debug!(
                field = field.name(),
                rule = rule.id(),
                "no prompts rendered, leaving field untouched"
            );
            return Ok(());
        }

        let params = GenerationParams::from_config(self.client.provider_name(), config);
        let instruction = rule.format_instruction();
        let mut values: Vec<Value> = Vec::new();
        for prompt in prompts {
            let full = match &instruction {
                Some(suffix) => format!("{prompt}\n\n{suffix}"),
                None => prompt,
            };
            let raw = self.client.generate(&full, &params).await?;
            if instruction.is_some() {
                values.extend(ResponseNormalizer::normalize(&raw));
            } else {
                values.push(Value::String(raw));
            }
        }

        if let Some(mutator) = &self.value_mutator {
            values = mutator.mutate(entity, field, config, values);
        }
        values = rule.prepare_values(values, config);

        let mut accepted: Vec<Value> = values
            .into_iter()
            .filter(|value| rule.verify_value(entity, value, field))
            .collect();
        if field.cardinality() > 0 {
            accepted.truncate(field.cardinality() as usize);
        }
        if accepted.is_empty() {
            debug!(
                field = field.name(),
                rule = rule.id(),
                "no values survived verification"
            );
            return Ok(());
        }
        rule.store_values(entity, accepted, field).await?;
        Ok(())
    }
}
