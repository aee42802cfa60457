//! Content entity representation.

use crate::InterpolationStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A content-bearing entity with its field values.
///
/// Field values are ordered lists of JSON values, one entry per delta.
/// Scalar fields carry plain strings or numbers; compound fields carry
/// objects. The `original` snapshot holds the pre-save values and backs
/// edit-mode change detection.
///
/// # Examples
///
/// ```
/// use intarsia_core::Entity;
/// use serde_json::json;
///
/// let mut entity = Entity::new("node", 7, "article");
/// entity.set_field("body", vec![json!("Some long text")]);
/// assert!(!entity.field_is_empty("body"));
/// assert!(entity.field_is_empty("field_tags"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity type id (e.g. "node").
    entity_type: String,
    /// Numeric identifier.
    id: u64,
    /// The bundle within the entity type (e.g. "article").
    bundle: String,
    /// Field values keyed by field name, one entry per delta.
    fields: BTreeMap<String, Vec<Value>>,
    /// Pre-save snapshot of the field values, when available.
    original: Option<BTreeMap<String, Vec<Value>>>,
    /// Processing status, present when the bundle carries the status field.
    status: Option<InterpolationStatus>,
}

impl Entity {
    /// Create an empty entity.
    pub fn new(entity_type: impl Into<String>, id: u64, bundle: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
            bundle: bundle.into(),
            fields: BTreeMap::new(),
            original: None,
            status: None,
        }
    }

    /// The entity type id.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Numeric identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The bundle within the entity type.
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// All field values.
    pub fn fields(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.fields
    }

    /// Values of one field, empty when the field is absent.
    pub fn field(&self, name: &str) -> &[Value] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First delta of one field, if any.
    pub fn first_value(&self, name: &str) -> Option<&Value> {
        self.field(name).first()
    }

    /// Replace the values of one field.
    pub fn set_field(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.fields.insert(name.into(), values);
    }

    /// Whether the field has no value or only empty values.
    pub fn field_is_empty(&self, name: &str) -> bool {
        let values = self.field(name);
        values.is_empty()
            || values.iter().all(|v| match v {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(o) => o.is_empty(),
                _ => false,
            })
    }

    /// Take a pre-save snapshot of all field values.
    ///
    /// Called by the host before applying edits, so the pipeline can compare
    /// the saved values against what the save is about to write.
    pub fn snapshot_original(&mut self) {
        self.original = Some(self.fields.clone());
    }

    /// The pre-save values of a field, when a snapshot exists.
    pub fn original_field(&self, name: &str) -> Option<&[Value]> {
        self.original
            .as_ref()
            .and_then(|fields| fields.get(name))
            .map(Vec::as_slice)
    }

    /// Whether a field's current value differs structurally from the
    /// pre-save snapshot. Without a snapshot every field counts as changed.
    pub fn field_changed(&self, name: &str) -> bool {
        match self.original_field(name) {
            Some(original) => original != self.field(name),
            None => true,
        }
    }

    /// Processing status, when the bundle carries the status field.
    pub fn status(&self) -> Option<InterpolationStatus> {
        self.status
    }

    /// Set the processing status.
    pub fn set_status(&mut self, status: InterpolationStatus) {
        self.status = Some(status);
    }

    /// Remove the status field from the entity.
    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
