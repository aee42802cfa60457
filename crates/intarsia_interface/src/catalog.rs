//! Host field metadata seam.

use intarsia_core::{FieldDefinition, InterpolationConfig};

/// Read access to the host's field metadata and interpolation settings.
///
/// The interpolation configuration is owned by the external configuration
/// subsystem; the pipeline only reads it. The status-field bookkeeping is
/// the one mutation the pipeline performs, driven by the status tracker.
pub trait FieldCatalog: Send + Sync {
    /// Field definitions for a bundle, in declaration order.
    fn field_definitions(&self, entity_type: &str, bundle: &str) -> Vec<FieldDefinition>;

    /// The interpolation config for a field, `None` when interpolation is
    /// not enabled on it.
    fn interpolation_config(
        &self,
        entity_type: &str,
        bundle: &str,
        field_name: &str,
    ) -> Option<InterpolationConfig>;

    /// Whether the bundle carries the status field.
    fn has_status_field(&self, entity_type: &str, bundle: &str) -> bool;

    /// Attach the status field to a bundle.
    fn attach_status_field(&self, entity_type: &str, bundle: &str);

    /// Remove the status field from a bundle.
    fn remove_status_field(&self, entity_type: &str, bundle: &str);
}
