//! Entity persistence seam.

use async_trait::async_trait;
use intarsia_core::Entity;
use intarsia_error::IntarsiaResult;

/// Context passed along the save call path.
///
/// `suppress_pipeline` replaces the host's global re-entrancy toggle: the
/// pipeline's own re-saves carry `suppress_pipeline = true` so the save
/// hook does not recurse into interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveContext {
    /// Skip the interpolation pipeline for this save.
    pub suppress_pipeline: bool,
    /// Whether the save creates the entity.
    pub is_insert: bool,
}

impl SaveContext {
    /// Context for a pipeline-internal re-save.
    pub fn suppressed() -> Self {
        Self {
            suppress_pipeline: true,
            is_insert: false,
        }
    }

    /// Context for an insert save.
    pub fn insert() -> Self {
        Self {
            suppress_pipeline: false,
            is_insert: true,
        }
    }
}

/// Load and save entities.
///
/// Asynchronous workers never hold an entity across the enqueue gap; they
/// reload a fresh copy through this seam before mutating anything.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load a fresh copy of an entity, `None` when it no longer exists.
    async fn load(&self, entity_type: &str, id: u64) -> IntarsiaResult<Option<Entity>>;

    /// Persist an entity.
    async fn save(&self, entity: &Entity, ctx: &SaveContext) -> IntarsiaResult<()>;
}
