//! Durable queue strategy and its worker.

use crate::{ImportCapable, ProcessingStrategy, RuleRunner};
use async_trait::async_trait;
use intarsia_core::{
    Entity, FieldDefinition, InterpolationConfig, InterpolationStatus, ProcessingJob, WorkerType,
};
use intarsia_error::{ConfigError, IntarsiaResult};
use intarsia_interface::{EntityStore, FieldCatalog, SaveContext, WorkQueue};
use std::sync::Arc;
use tracing::{info, warn};

/// Hands jobs to a durable queue and returns immediately.
///
/// The only strategy that runs after the triggering request has ended, and
/// the only import-capable one: freshly inserted entities get their fields
/// filled once a worker picks the jobs up.
pub struct QueueStrategy {
    queue: Arc<dyn WorkQueue>,
}

impl QueueStrategy {
    /// Create the strategy.
    pub fn new(queue: Arc<dyn WorkQueue>) -> Self {
        Self { queue }
    }
}

impl ImportCapable for QueueStrategy {}

#[async_trait]
impl ProcessingStrategy for QueueStrategy {
    fn id(&self) -> WorkerType {
        WorkerType::Queue
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
        let job = ProcessingJob::new(
            entity.entity_type(),
            entity.id(),
            field.name(),
            config.clone(),
        );
        self.queue.push(job).await
    }

    fn as_import_capable(&self) -> Option<&dyn ImportCapable> {
        Some(self)
    }
}

/// Consumes queued interpolation jobs.
///
/// Every job reloads a fresh entity copy before mutating anything; an
/// entity deleted since enqueue drops the job with a warning. Status flips
/// to finished only when the completed job was the last one pending for
/// its entity, and to failed on any error. Re-saves run with the pipeline
/// suppressed.
pub struct QueueWorker {
    queue: Arc<dyn WorkQueue>,
    store: Arc<dyn EntityStore>,
    catalog: Arc<dyn FieldCatalog>,
    runner: Arc<RuleRunner>,
}

impl QueueWorker {
    /// Create a worker.
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        store: Arc<dyn EntityStore>,
        catalog: Arc<dyn FieldCatalog>,
        runner: Arc<RuleRunner>,
    ) -> Self {
        Self {
            queue,
            store,
            catalog,
            runner,
        }
    }

    /// Claim and process jobs until the queue is drained.
    ///
    /// Returns the number of jobs consumed. Per-job failures mark the
    /// entity failed and do not stop the drain.
    pub async fn run_pending(&self) -> IntarsiaResult<usize> {
        let mut processed = 0;
        while let Some(job) = self.queue.claim().await? {
            self.process(job).await?;
            processed += 1;
        }
        Ok(processed)
    }

    /// Process one claimed job.
    pub async fn process(&self, job: ProcessingJob) -> IntarsiaResult<()> {
        info!(
            entity_type = %job.entity_type,
            entity_id = job.entity_id,
            field = %job.field_name,
            "processing interpolation job"
        );
        let Some(mut entity) = self.store.load(&job.entity_type, job.entity_id).await? else {
            warn!(
                entity_type = %job.entity_type,
                entity_id = job.entity_id,
                "entity no longer exists, dropping job"
            );
            self.queue.complete(&job).await?;
            return Ok(());
        };

        let field = self
            .catalog
            .field_definitions(&job.entity_type, entity.bundle())
            .into_iter()
            .find(|field| field.name() == job.field_name);
        let outcome = match field {
            Some(field) => {
                self.runner
                    .run(&mut entity, &field, &job.interpolator_config)
                    .await
            }
            None => Err(ConfigError::new(format!(
                "Field '{}' no longer exists on bundle '{}'",
                job.field_name,
                entity.bundle()
            ))
            .into()),
        };

        match outcome {
            Ok(()) => {
                let remaining = self.queue.complete(&job).await?;
                if entity.status().is_some() {
                    entity.set_status(if remaining == 0 {
                        InterpolationStatus::Finished
                    } else {
                        InterpolationStatus::Processing
                    });
                }
                self.store.save(&entity, &SaveContext::suppressed()).await?;
                info!(
                    entity_type = %job.entity_type,
                    entity_id = job.entity_id,
                    field = %job.field_name,
                    remaining,
                    "finished interpolation job"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    entity_type = %job.entity_type,
                    entity_id = job.entity_id,
                    field = %job.field_name,
                    error = %error,
                    "interpolation job failed"
                );
                self.queue.complete(&job).await?;
                // The runner may have half-touched the copy; mark the
                // failure on a fresh one.
                if let Some(mut fresh) = self.store.load(&job.entity_type, job.entity_id).await? {
                    if fresh.status().is_some() {
                        fresh.set_status(InterpolationStatus::Failed);
                        self.store.save(&fresh, &SaveContext::suppressed()).await?;
                    }
                }
                Ok(())
            }
        }
    }
}
