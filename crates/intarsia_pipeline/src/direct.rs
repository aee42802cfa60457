//! Synchronous processing strategy.

use crate::{ProcessingStrategy, RuleRunner};
use async_trait::async_trait;
use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, InterpolationStatus, WorkerType};
use intarsia_error::IntarsiaResult;
use intarsia_interface::Messenger;
use std::sync::Arc;
use tracing::warn;

/// Runs jobs inline within the triggering save.
///
/// A failing job warns the saving user and the log, then the save cycle
/// continues; one field's failure never blocks its siblings.
pub struct DirectStrategy {
    runner: Arc<RuleRunner>,
    messenger: Arc<dyn Messenger>,
}

impl DirectStrategy {
    /// Create the strategy.
    pub fn new(runner: Arc<RuleRunner>, messenger: Arc<dyn Messenger>) -> Self {
        Self { runner, messenger }
    }
}

#[async_trait]
impl ProcessingStrategy for DirectStrategy {
    fn id(&self) -> WorkerType {
        WorkerType::Direct
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
        if let Err(error) = self.runner.run(entity, field, config).await {
            warn!(
                entity_type = entity.entity_type(),
                entity_id = entity.id(),
                field = field.name(),
                error = %error,
                "direct interpolation failed"
            );
            self.messenger
                .warn(&format!("Could not fill '{}': {error}", field.label()));
        }
        Ok(())
    }

    async fn post_process(&self, entity: &mut Entity) -> IntarsiaResult<()> {
        if entity.status().is_some() {
            entity.set_status(InterpolationStatus::Finished);
        }
        Ok(())
    }
}
