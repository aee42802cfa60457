//! Status field lifecycle on bundles.

use intarsia_core::InterpolationStatus;
use intarsia_interface::FieldCatalog;
use std::sync::Arc;
use tracing::info;

/// Keeps the per-bundle status field in step with the interpolation
/// settings.
///
/// The status field appears when the first field on a bundle gets an
/// interpolation config and disappears when the last one loses it. New
/// entities on a tracked bundle start out pending.
pub struct StatusTracker {
    catalog: Arc<dyn FieldCatalog>,
}

impl StatusTracker {
    /// Create a tracker over the host's field catalog.
    pub fn new(catalog: Arc<dyn FieldCatalog>) -> Self {
        Self { catalog }
    }

    /// Reconcile a bundle's status field after its settings changed.
    pub fn sync_bundle(&self, entity_type: &str, bundle: &str) {
        let enabled = self
            .catalog
            .field_definitions(entity_type, bundle)
            .iter()
            .any(|field| {
                self.catalog
                    .interpolation_config(entity_type, bundle, field.name())
                    .is_some()
            });
        let present = self.catalog.has_status_field(entity_type, bundle);
        if enabled && !present {
            info!(entity_type, bundle, "attaching interpolation status field");
            self.catalog.attach_status_field(entity_type, bundle);
        } else if !enabled && present {
            info!(entity_type, bundle, "removing interpolation status field");
            self.catalog.remove_status_field(entity_type, bundle);
        }
    }

    /// The starting status for a new entity, when its bundle is tracked.
    pub fn initial_status(&self, entity_type: &str, bundle: &str) -> Option<InterpolationStatus> {
        self.catalog
            .has_status_field(entity_type, bundle)
            .then_some(InterpolationStatus::Pending)
    }
}
