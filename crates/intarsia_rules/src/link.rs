//! Link extraction rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind};
use intarsia_error::IntarsiaResult;
use intarsia_interface::FieldRule;
use serde_json::{json, Value};
use url::Url;

/// Extracts URLs from the source text and stores them as link values.
///
/// Candidates may arrive as bare strings or as `{uri, title}` objects; both
/// are persisted in the compound `{uri, title}` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkRule;

impl LinkRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self
    }

    fn uri_of(value: &Value) -> String {
        match value {
            Value::Object(map) => map
                .get("uri")
                .map(value_text)
                .unwrap_or_else(|| value_text(value)),
            other => value_text(other),
        }
    }
}

#[async_trait]
impl FieldRule for LinkRule {
    fn id(&self) -> &'static str {
        "link"
    }

    fn title(&self) -> &'static str {
        "Link Finder"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::Link
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"uri\": \"absolute url\", \"title\": \
             \"link title\"}]"
                .to_string(),
        )
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, _field: &FieldDefinition) -> bool {
        Url::parse(Self::uri_of(value).trim()).is_ok()
    }

    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        let links = values
            .into_iter()
            .map(|value| {
                let title = match &value {
                    Value::Object(map) => map.get("title").map(value_text).unwrap_or_default(),
                    _ => String::new(),
                };
                json!({ "uri": Self::uri_of(&value).trim(), "title": title })
            })
            .collect();
        entity.set_field(field.name(), links);
        Ok(())
    }
}
