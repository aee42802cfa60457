//! List option selection rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind, InterpolationConfig};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{FieldRule, TokenMap};
use serde_json::Value;

/// Picks entries from a list field's configured allowed values.
///
/// Candidates may arrive as either the stored key or the human label; both
/// verify, and persistence maps labels back to keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsRule;

impl OptionsRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self
    }

    fn key_of<'a>(field: &'a FieldDefinition, candidate: &str) -> Option<&'a str> {
        field
            .settings()
            .allowed_values
            .iter()
            .find(|(key, label)| key.as_str() == candidate || label.as_str() == candidate)
            .map(|(key, _)| key.as_str())
    }
}

#[async_trait]
impl FieldRule for OptionsRule {
    fn id(&self) -> &'static str {
        "options"
    }

    fn title(&self) -> &'static str {
        "Option Chooser"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::ListString
    }

    fn tokens(&self) -> TokenMap {
        let mut tokens = TokenMap::new();
        tokens.insert(
            "context".into(),
            "The cleaned text from the base field.".into(),
        );
        tokens.insert(
            "raw_context".into(),
            "The raw text from the base field. Can include markup.".into(),
        );
        tokens.insert(
            "max_amount".into(),
            "The max amount of entries to set. If unlimited this value will be empty.".into(),
        );
        tokens.insert(
            "options_comma".into(),
            "The option labels as a comma separated list.".into(),
        );
        tokens.insert(
            "options_nl".into(),
            "The option labels, one per line.".into(),
        );
        tokens.insert(
            "value_options_comma".into(),
            "The option keys as a comma separated list.".into(),
        );
        tokens.insert(
            "value_options_nl".into(),
            "The option keys, one per line.".into(),
        );
        tokens
    }

    fn generate_tokens(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
        delta: usize,
    ) -> IntarsiaResult<TokenMap> {
        let allowed = &field.settings().allowed_values;
        let labels: Vec<&str> = allowed.values().map(String::as_str).collect();
        let keys: Vec<&str> = allowed.keys().map(String::as_str).collect();
        let base_field = config.base_field()?;
        let raw = entity
            .field(base_field)
            .get(delta)
            .map(value_text)
            .unwrap_or_default();
        let mut tokens = TokenMap::new();
        tokens.insert("context".into(), intarsia_core::strip_tags(&raw));
        tokens.insert("raw_context".into(), raw);
        tokens.insert("max_amount".into(), field.max_amount());
        tokens.insert("options_comma".into(), labels.join(", "));
        tokens.insert("options_nl".into(), labels.join("\n"));
        tokens.insert("value_options_comma".into(), keys.join(", "));
        tokens.insert("value_options_nl".into(), keys.join("\n"));
        Ok(tokens)
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"one of the given \
             options\"}]"
                .to_string(),
        )
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, field: &FieldDefinition) -> bool {
        Self::key_of(field, value_text(value).trim()).is_some()
    }

    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        let keys = values
            .iter()
            .filter_map(|value| Self::key_of(field, value_text(value).trim()))
            .map(|key| Value::String(key.to_string()))
            .collect();
        entity.set_field(field.name(), keys);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intarsia_core::{FieldDefinitionBuilder, FieldSettings};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn field() -> FieldDefinition {
        let mut allowed = BTreeMap::new();
        allowed.insert("draft".to_string(), "Draft".to_string());
        allowed.insert("published".to_string(), "Published".to_string());
        FieldDefinitionBuilder::default()
            .name("field_state")
            .label("State")
            .kind(FieldKind::ListString)
            .settings(FieldSettings {
                allowed_values: allowed,
                ..FieldSettings::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn keys_and_labels_both_verify() {
        let rule = OptionsRule::new();
        let entity = Entity::new("node", 1, "article");
        assert!(rule.verify_value(&entity, &json!("draft"), &field()));
        assert!(rule.verify_value(&entity, &json!("Published"), &field()));
        assert!(!rule.verify_value(&entity, &json!("archived"), &field()));
    }

    #[tokio::test]
    async fn labels_store_as_keys() {
        let rule = OptionsRule::new();
        let mut entity = Entity::new("node", 1, "article");
        rule.store_values(&mut entity, vec![json!("Published"), json!("draft")], &field())
            .await
            .unwrap();
        assert_eq!(
            entity.field("field_state"),
            &[json!("published"), json!("draft")]
        );
    }

    #[test]
    fn option_tokens_render_both_separators() {
        let rule = OptionsRule::new();
        let mut entity = Entity::new("node", 1, "article");
        entity.set_field("body", vec![json!("text")]);
        let mut config = InterpolationConfig::new("field_state");
        config.insert("base_field", json!("body"));
        let tokens = rule.generate_tokens(&entity, &field(), &config, 0).unwrap();
        assert_eq!(tokens["options_comma"], "Draft, Published");
        assert_eq!(tokens["value_options_nl"], "draft\npublished");
    }
}
