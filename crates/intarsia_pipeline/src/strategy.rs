//! The processing strategy seam.

use async_trait::async_trait;
use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, WorkerType};
use intarsia_error::IntarsiaResult;

/// Marker capability for strategies that run during entity insert.
///
/// Import flows create entities whose fields should be filled after the
/// insert completes; only strategies carrying this capability are
/// dispatched on an insert save. Replaces reflective method probing with
/// an explicit interface.
pub trait ImportCapable: Send + Sync {}

/// Decides when a job's rule runner executes.
///
/// `pre_process` runs once before all of an entity's jobs for this
/// strategy, `post_process` once after; status transitions live in these
/// hooks. `schedule` is called per job and either runs it now, defers it
/// within the save lifecycle, or hands it to a durable queue.
#[async_trait]
pub trait ProcessingStrategy: Send + Sync {
    /// The worker type this strategy serves.
    fn id(&self) -> WorkerType;

    /// Hook before the first job of a save cycle.
    async fn pre_process(&self, _entity: &mut Entity) -> IntarsiaResult<()> {
        Ok(())
    }

    /// Schedule one job.
    async fn schedule(
        &self,
        entity: &mut Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> IntarsiaResult<()>;

    /// Hook after the last job of a save cycle.
    async fn post_process(&self, _entity: &mut Entity) -> IntarsiaResult<()> {
        Ok(())
    }

    /// The strategy's import capability, when it has one.
    fn as_import_capable(&self) -> Option<&dyn ImportCapable> {
        None
    }
}
