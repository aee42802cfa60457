//! Host templating subsystem seam.

use intarsia_core::Entity;

/// Renders host token templates against an entity.
///
/// Token mode and per-key config overrides are only reachable when a
/// resolver is injected; without one the pipeline falls back to static
/// configuration values.
pub trait TokenResolver: Send + Sync {
    /// Render a template against the entity.
    ///
    /// Returns `None` when nothing could be resolved; the caller falls back
    /// to the static value. Must not fail.
    fn replace(&self, template: &str, entity: &Entity) -> Option<String>;
}
