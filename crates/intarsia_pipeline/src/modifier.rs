//! The save-time entry point.

use crate::{ConfigResolver, ProcessingStrategy};
use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, Mode, WorkerType};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{ConfigMutator, SaveContext, ScheduleDecision, ScheduleVerdict};
use intarsia_rules::RuleRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

fn values_empty(values: &[Value]) -> bool {
    values.is_empty()
        || values.iter().all(|v| match v {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            _ => false,
        })
}

/// Dispatches an entity save into the interpolation pipeline.
///
/// Invoked by the host's persistence lifecycle. Resolves the enabled
/// fields, decides per field whether regeneration is due, and hands each
/// due job to its configured strategy. A save carrying the suppress flag
/// is one of the pipeline's own re-saves and passes straight through.
pub struct EntityModifier {
    resolver: ConfigResolver,
    registry: Arc<RuleRegistry>,
    strategies: Vec<Arc<dyn ProcessingStrategy>>,
    config_mutator: Option<Arc<dyn ConfigMutator>>,
    schedule_decision: Option<Arc<dyn ScheduleDecision>>,
}

impl EntityModifier {
    /// Create the entry point.
    pub fn new(
        resolver: ConfigResolver,
        registry: Arc<RuleRegistry>,
        strategies: Vec<Arc<dyn ProcessingStrategy>>,
        config_mutator: Option<Arc<dyn ConfigMutator>>,
        schedule_decision: Option<Arc<dyn ScheduleDecision>>,
    ) -> Self {
        Self {
            resolver,
            registry,
            strategies,
            config_mutator,
            schedule_decision,
        }
    }

    /// Run the pipeline for one entity save.
    ///
    /// Returns whether any job was dispatched; the caller persists the
    /// (possibly mutated) entity afterwards.
    ///
    /// # Errors
    ///
    /// Fails on an incomplete interpolation config; per-job generation
    /// failures are handled inside the strategies and do not propagate.
    pub async fn save_entity(&self, entity: &mut Entity, ctx: &SaveContext) -> IntarsiaResult<bool> {
        if ctx.suppress_pipeline {
            return Ok(false);
        }
        let tasks = self.resolver.resolve_enabled(entity)?;
        if tasks.is_empty() {
            return Ok(false);
        }

        let mut jobs: Vec<(Arc<dyn ProcessingStrategy>, FieldDefinition, InterpolationConfig)> =
            Vec::new();
        for task in tasks {
            let mut config = task.config;
            if let Some(mutator) = &self.config_mutator {
                mutator.mutate(entity, &mut config);
            }
            let Some(strategy) = self.strategy_for(config.worker_type()) else {
                warn!(
                    field = task.field.name(),
                    worker = %config.worker_type(),
                    "no strategy registered, skipping field"
                );
                continue;
            };
            // Inserts only reach strategies built for import flows.
            if ctx.is_insert && strategy.as_import_capable().is_none() {
                continue;
            }
            if !self.should_process(entity, &task.field, &config) {
                debug!(field = task.field.name(), "field not due, skipping");
                continue;
            }
            jobs.push((strategy, task.field, config));
        }
        if jobs.is_empty() {
            return Ok(false);
        }

        let mut active: Vec<WorkerType> = Vec::new();
        for (strategy, _, _) in &jobs {
            if !active.contains(&strategy.id()) {
                active.push(strategy.id());
                strategy.pre_process(entity).await?;
            }
        }
        for (strategy, field, config) in &jobs {
            strategy.schedule(entity, field, config).await?;
        }
        for worker in active {
            if let Some(strategy) = self.strategy_for(worker) {
                strategy.post_process(entity).await?;
            }
        }
        Ok(true)
    }

    fn strategy_for(&self, worker: WorkerType) -> Option<Arc<dyn ProcessingStrategy>> {
        self.strategies
            .iter()
            .find(|strategy| strategy.id() == worker)
            .cloned()
            .or_else(|| {
                self.strategies
                    .iter()
                    .find(|strategy| strategy.id() == WorkerType::Direct)
                    .cloned()
            })
    }

    /// Whether a field is due for regeneration on this save.
    fn should_process(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> bool {
        if let Some(decision) = &self.schedule_decision {
            match decision.decide(entity, field, config) {
                ScheduleVerdict::ForceProcess => return true,
                ScheduleVerdict::ForceSkip => return false,
                ScheduleVerdict::Neutral => {}
            }
        }
        let target_empty = self.target_is_empty(entity, field, config);
        match config.mode() {
            // Token mode has no change tracking; a filled field stays as
            // it is.
            Mode::Token => target_empty,
            Mode::Base => {
                if target_empty {
                    return true;
                }
                if !config.edit_mode() {
                    return false;
                }
                match config.base_field() {
                    Ok(base) => entity.field_changed(base),
                    Err(_) => false,
                }
            }
        }
    }

    /// Emptiness of the target field, after the rule's own filtering of
    /// placeholder deltas.
    fn target_is_empty(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> bool {
        let values = entity.field(field.name()).to_vec();
        let values = match config.rule().ok().and_then(|id| self.registry.find_rule(id)) {
            Some(rule) => rule.check_if_empty(values),
            None => values,
        };
        values_empty(&values)
    }
}
