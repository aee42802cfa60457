//! Taxonomy term reference rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind, InterpolationConfig};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{FieldRule, TermResolver};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Fills taxonomy term reference fields from generated category names.
///
/// Generated names resolve against the field's target vocabulary; the first
/// term with a matching name wins. Unknown names are created when the field
/// allows auto-creation, otherwise verification drops them.
pub struct TaxonomyRule {
    terms: Arc<dyn TermResolver>,
}

impl TaxonomyRule {
    /// Create the rule over a term resolver.
    pub fn new(terms: Arc<dyn TermResolver>) -> Self {
        Self { terms }
    }

    /// A rule over an empty in-memory store, for tests.
    #[doc(hidden)]
    pub fn default_for_tests() -> Self {
        Self::new(Arc::new(crate::MemoryTermStore::new()))
    }

    fn vocabulary(field: &FieldDefinition) -> &str {
        field.settings().reference_bundle.as_deref().unwrap_or("")
    }

    fn clean(text: &str, manipulation: &str) -> String {
        match manipulation {
            "lowercase" => text.to_lowercase(),
            "uppercase" => text.to_uppercase(),
            "first_char" => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
            _ => text.to_string(),
        }
    }
}

#[async_trait]
impl FieldRule for TaxonomyRule {
    fn id(&self) -> &'static str {
        "taxonomy"
    }

    fn title(&self) -> &'static str {
        "Taxonomy Categorizer"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::EntityReference
    }

    fn target(&self) -> Option<&'static str> {
        Some("taxonomy_term")
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"category name\"}]"
                .to_string(),
        )
    }

    fn prepare_values(&self, values: Vec<Value>, config: &InterpolationConfig) -> Vec<Value> {
        let Some(manipulation) = config.get_str("clean_up") else {
            return values;
        };
        values
            .into_iter()
            .map(|value| Value::String(Self::clean(&value_text(&value), manipulation)))
            .collect()
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, field: &FieldDefinition) -> bool {
        let name = value_text(value);
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if field.settings().auto_create && value.is_string() {
            return true;
        }
        self.terms.find(Self::vocabulary(field), name).is_some()
    }

    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        let vocabulary = Self::vocabulary(field);
        let mut references = Vec::with_capacity(values.len());
        for value in &values {
            let name = value_text(value);
            let name = name.trim().to_string();
            let id = match self.terms.find(vocabulary, &name) {
                Some(id) => id,
                None => {
                    debug!(vocabulary, term = %name, "creating taxonomy term");
                    self.terms.create(vocabulary, &name)?
                }
            };
            references.push(json!({ "target_id": id }));
        }
        entity.set_field(field.name(), references);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTermStore;
    use intarsia_core::{FieldDefinitionBuilder, FieldSettings};

    fn field(auto_create: bool) -> FieldDefinition {
        FieldDefinitionBuilder::default()
            .name("field_tags")
            .label("Tags")
            .kind(FieldKind::EntityReference)
            .target(Some("taxonomy_term".to_string()))
            .settings(FieldSettings {
                auto_create,
                reference_bundle: Some("tags".to_string()),
                ..FieldSettings::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn known_terms_verify_without_auto_create() {
        let store = Arc::new(MemoryTermStore::new());
        store.seed("tags", &["rust"]);
        let rule = TaxonomyRule::new(store);
        let entity = Entity::new("node", 1, "article");
        assert!(rule.verify_value(&entity, &json!("rust"), &field(false)));
        assert!(!rule.verify_value(&entity, &json!("haskell"), &field(false)));
    }

    #[test]
    fn auto_create_accepts_any_string() {
        let rule = TaxonomyRule::default_for_tests();
        let entity = Entity::new("node", 1, "article");
        assert!(rule.verify_value(&entity, &json!("anything"), &field(true)));
        assert!(!rule.verify_value(&entity, &json!(""), &field(true)));
    }

    #[test]
    fn clean_up_manipulations_apply_before_verification() {
        let rule = TaxonomyRule::default_for_tests();
        let mut config = InterpolationConfig::new("field_tags");
        config.insert("clean_up", json!("lowercase"));
        let prepared = rule.prepare_values(vec![json!("RUST")], &config);
        assert_eq!(prepared, vec![json!("rust")]);

        config.insert("clean_up", json!("first_char"));
        let prepared = rule.prepare_values(vec![json!("rust lang")], &config);
        assert_eq!(prepared, vec![json!("Rust lang")]);
    }

    #[tokio::test]
    async fn stores_matching_ids_and_creates_the_rest() {
        let store = Arc::new(MemoryTermStore::new());
        let ids = store.seed("tags", &["rust"]);
        let rule = TaxonomyRule::new(store.clone());
        let mut entity = Entity::new("node", 1, "article");
        rule.store_values(
            &mut entity,
            vec![json!("rust"), json!("tokio")],
            &field(true),
        )
        .await
        .unwrap();
        let stored = entity.field("field_tags");
        assert_eq!(stored[0]["target_id"], ids[0]);
        let created = store.find("tags", "tokio").unwrap();
        assert_eq!(stored[1]["target_id"], created);
    }
}
