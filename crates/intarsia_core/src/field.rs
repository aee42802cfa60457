//! Field definitions and field kinds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported field types on content entities.
///
/// The string form matches the host platform's field type identifiers, so
/// rule target declarations and catalog data stay interchangeable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    /// Short plain text.
    Text,
    /// Long plain text.
    TextLong,
    /// Short formatted string.
    String,
    /// Long formatted string.
    StringLong,
    /// Formatted text with a summary element.
    TextWithSummary,
    /// E-mail address.
    Email,
    /// Telephone number.
    Telephone,
    /// Hyperlink with optional title.
    Link,
    /// Signed integer.
    Integer,
    /// Fixed-precision decimal.
    Decimal,
    /// Floating point number.
    Float,
    /// String selection from a configured list.
    ListString,
    /// Reference to another entity (target type in the field settings).
    EntityReference,
    /// Image with managed file storage.
    Image,
    /// Generic managed file.
    File,
    /// Arbitrary JSON blob.
    Json,
}

/// Storage-level settings for a field.
///
/// Only the settings the pipeline interprets are modeled; everything else
/// stays with the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSettings {
    /// Allowed key => label pairs for list fields.
    #[serde(default)]
    pub allowed_values: BTreeMap<String, String>,
    /// Lower numeric bound, when the storage declares one.
    #[serde(default)]
    pub min: Option<f64>,
    /// Upper numeric bound, when the storage declares one.
    #[serde(default)]
    pub max: Option<f64>,
    /// Whether a reference field may create missing targets.
    #[serde(default)]
    pub auto_create: bool,
    /// Bundle used when auto-creating reference targets.
    #[serde(default)]
    pub reference_bundle: Option<String>,
    /// Storage scheme for media fields (e.g. "public").
    #[serde(default)]
    pub uri_scheme: Option<String>,
    /// Directory for media fields, relative to the scheme root.
    #[serde(default)]
    pub file_directory: Option<String>,
}

/// Definition of one field on an entity bundle.
///
/// # Examples
///
/// ```
/// use intarsia_core::{FieldDefinitionBuilder, FieldKind};
///
/// let field = FieldDefinitionBuilder::default()
///     .name("field_mail")
///     .label("Contact mail")
///     .kind(FieldKind::Email)
///     .build()
///     .unwrap();
/// assert_eq!(field.cardinality(), -1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), derive(Debug))]
pub struct FieldDefinition {
    /// Machine name of the field.
    name: String,
    /// Human-readable label.
    label: String,
    /// The field type.
    kind: FieldKind,
    /// Reference target entity type, for reference fields.
    #[builder(default)]
    target: Option<String>,
    /// Maximum number of deltas; -1 means unlimited.
    #[builder(default = "-1")]
    cardinality: i32,
    /// Storage-level settings.
    #[builder(default)]
    settings: FieldSettings,
}

impl FieldDefinition {
    /// Machine name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The field type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Reference target entity type, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Maximum number of deltas; -1 means unlimited.
    pub fn cardinality(&self) -> i32 {
        self.cardinality
    }

    /// Storage-level settings.
    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// The `max_amount` prompt token: the cardinality, or empty when
    /// unlimited.
    pub fn max_amount(&self) -> String {
        if self.cardinality == -1 {
            String::new()
        } else {
            self.cardinality.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_round_trips_through_strings() {
        assert_eq!(FieldKind::TextLong.to_string(), "text_long");
        assert_eq!(
            "entity_reference".parse::<FieldKind>().unwrap(),
            FieldKind::EntityReference
        );
    }

    #[test]
    fn max_amount_is_empty_for_unlimited() {
        let field = FieldDefinitionBuilder::default()
            .name("field_tags")
            .label("Tags")
            .kind(FieldKind::EntityReference)
            .target(Some("taxonomy_term".to_string()))
            .build()
            .unwrap();
        assert_eq!(field.max_amount(), "");

        let capped = FieldDefinitionBuilder::default()
            .name("field_one")
            .label("One")
            .kind(FieldKind::Text)
            .cardinality(3)
            .build()
            .unwrap();
        assert_eq!(capped.max_amount(), "3");
    }
}
