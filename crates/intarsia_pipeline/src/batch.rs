//! Deferred processing within one save lifecycle.

use crate::{ProcessingStrategy, RuleRunner};
use async_trait::async_trait;
use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, InterpolationStatus, WorkerType};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{EntityStore, Messenger, SaveContext};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Defers jobs until the end of the save lifecycle.
///
/// Jobs accumulate during `schedule` and drain at `post_process` in
/// insertion order. Each drained job reloads a fresh entity copy, runs the
/// rule runner, and re-saves with the pipeline suppressed so the re-save
/// does not recurse. The strategy is shared across saves, so deferred jobs
/// carry their entity key and the drain only takes the entries belonging to
/// the entity being post-processed; concurrent saves leave each other's
/// jobs untouched.
pub struct BatchStrategy {
    runner: Arc<RuleRunner>,
    store: Arc<dyn EntityStore>,
    messenger: Arc<dyn Messenger>,
    deferred: Mutex<Vec<DeferredJob>>,
}

struct DeferredJob {
    entity_type: String,
    entity_id: u64,
    field: FieldDefinition,
    config: InterpolationConfig,
}

impl BatchStrategy {
    /// Create the strategy.
    pub fn new(
        runner: Arc<RuleRunner>,
        store: Arc<dyn EntityStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            runner,
            store,
            messenger,
            deferred: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ProcessingStrategy for BatchStrategy {
    fn id(&self) -> WorkerType {
        WorkerType::Batch
    }

    async fn pre_process(&self, entity: &mut Entity) -> IntarsiaResult<()> {
        if entity.status().is_some() {
            entity.set_status(InterpolationStatus::Processing);
        }
        Ok(())
    }

    async fn schedule(
        &self,
        entity: &mut Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> IntarsiaResult<()> {
        self.deferred.lock().await.push(DeferredJob {
            entity_type: entity.entity_type().to_string(),
            entity_id: entity.id(),
            field: field.clone(),
            config: config.clone(),
        });
        Ok(())
    }

    async fn post_process(&self, entity: &mut Entity) -> IntarsiaResult<()> {
        let jobs: Vec<DeferredJob> = {
            let mut deferred = self.deferred.lock().await;
            let mut mine = Vec::new();
            let mut rest = Vec::new();
            for job in deferred.drain(..) {
                if job.entity_type == entity.entity_type() && job.entity_id == entity.id() {
                    mine.push(job);
                } else {
                    rest.push(job);
                }
            }
            *deferred = rest;
            mine
        };
        for DeferredJob { field, config, .. } in jobs {
            let fresh = self.store.load(entity.entity_type(), entity.id()).await?;
            // Until the triggering save lands, the in-memory entity is the
            // freshest copy there is.
            let mut working = fresh.unwrap_or_else(|| entity.clone());
            if let Err(error) = self.runner.run(&mut working, &field, &config).await {
                warn!(
                    entity_type = entity.entity_type(),
                    entity_id = entity.id(),
                    field = field.name(),
                    error = %error,
                    "batched interpolation failed"
                );
                self.messenger
                    .warn(&format!("Could not fill '{}': {error}", field.label()));
                continue;
            }
            self.store.save(&working, &SaveContext::suppressed()).await?;
            entity.set_field(field.name(), working.field(field.name()).to_vec());
        }
        if entity.status().is_some() {
            entity.set_status(InterpolationStatus::Finished);
        }
        Ok(())
    }
}
