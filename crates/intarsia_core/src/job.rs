//! The durable queue job payload.

use crate::InterpolationConfig;
use serde::{Deserialize, Serialize};

/// One unit of deferred work: fill one field on one entity.
///
/// Serialized into the durable work queue; the schema must remain decodable
/// across process restarts, so only plain data is carried. The entity itself
/// is reloaded fresh by the consumer.
///
/// # Examples
///
/// ```
/// use intarsia_core::{InterpolationConfig, ProcessingJob};
///
/// let job = ProcessingJob::new("node", 42, "field_mail", InterpolationConfig::new("field_mail"));
/// let wire = serde_json::to_string(&job).unwrap();
/// let back: ProcessingJob = serde_json::from_str(&wire).unwrap();
/// assert_eq!(back.entity_id, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingJob {
    /// The entity type id.
    pub entity_type: String,
    /// The entity identifier.
    pub entity_id: u64,
    /// The target field name.
    pub field_name: String,
    /// Snapshot of the interpolation configuration at enqueue time.
    pub interpolator_config: InterpolationConfig,
}

impl ProcessingJob {
    /// Create a job for one (entity, field) pair.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: u64,
        field_name: impl Into<String>,
        interpolator_config: InterpolationConfig,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            field_name: field_name.into(),
            interpolator_config,
        }
    }

    /// The (entity type, id) pair this job belongs to.
    pub fn entity_key(&self) -> (&str, u64) {
        (&self.entity_type, self.entity_id)
    }
}
