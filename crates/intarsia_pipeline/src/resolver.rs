//! Enabled-field discovery and effective config value resolution.

use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, Mode};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{FieldCatalog, TokenResolver};
use std::sync::Arc;

/// One unit of pipeline work: a field and its interpolation config.
#[derive(Debug, Clone)]
pub struct FieldTask {
    /// The target field.
    pub field: FieldDefinition,
    /// Its interpolation configuration.
    pub config: InterpolationConfig,
}

/// Discovers the enabled fields on an entity and resolves effective
/// configuration values.
///
/// For any config key `K` an optional `K_override` template may carry a
/// per-entity dynamic value; override resolution renders the template
/// through the host's token subsystem and never fails, falling back to the
/// static value.
pub struct ConfigResolver {
    catalog: Arc<dyn FieldCatalog>,
    tokens: Option<Arc<dyn TokenResolver>>,
}

impl ConfigResolver {
    /// Create a resolver over the host's field catalog.
    pub fn new(catalog: Arc<dyn FieldCatalog>, tokens: Option<Arc<dyn TokenResolver>>) -> Self {
        Self { catalog, tokens }
    }

    /// The enabled fields of an entity, sorted ascending by weight.
    ///
    /// The sort is stable, so equal weights keep catalog declaration order.
    ///
    /// # Errors
    ///
    /// A missing `rule`, or a missing `base_field` on a base-mode config,
    /// is a configuration error surfaced to the caller rather than a
    /// silently skipped field.
    pub fn resolve_enabled(&self, entity: &Entity) -> IntarsiaResult<Vec<FieldTask>> {
        let mut tasks = Vec::new();
        for field in self
            .catalog
            .field_definitions(entity.entity_type(), entity.bundle())
        {
            let Some(config) =
                self.catalog
                    .interpolation_config(entity.entity_type(), entity.bundle(), field.name())
            else {
                continue;
            };
            config.rule()?;
            if config.mode() == Mode::Base {
                config.base_field()?;
            }
            tasks.push(FieldTask { field, config });
        }
        tasks.sort_by_key(|task| task.config.weight());
        Ok(tasks)
    }

    /// The effective value of a config key for one entity.
    ///
    /// Returns the override-rendered value when a `{key}_override` template
    /// is present and renders non-empty; otherwise the static value, or the
    /// default when the key is absent.
    pub fn config_value(
        &self,
        key: &str,
        config: &InterpolationConfig,
        entity: &Entity,
        default: &str,
    ) -> String {
        let fallback = || {
            config
                .get_str(key)
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string())
        };
        let Some(resolver) = &self.tokens else {
            return fallback();
        };
        let Some(template) = config.get_str(&format!("{key}_override")) else {
            return fallback();
        };
        match resolver.replace(template, entity) {
            Some(rendered) if !rendered.trim().is_empty() => rendered,
            _ => fallback(),
        }
    }
}
