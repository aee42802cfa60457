//! Builder wiring tests for the facade crate.

use async_trait::async_trait;
use intarsia::{
    Entity, FieldDefinitionBuilder, FieldKind, FieldSettings, GenerationClient, GenerationParams,
    IntarsiaResult, InterpolationConfig, Interpolator, MemoryEntityStore, MemoryFieldCatalog,
    MemoryTermStore, MemoryWorkQueue, SaveContext, TermResolver,
};
use serde_json::json;
use std::sync::Arc;

struct CannedClient(String);

#[async_trait]
impl GenerationClient for CannedClient {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> IntarsiaResult<String> {
        Ok(self.0.clone())
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-1"
    }
}

fn config(field_name: &str, rule: &str) -> InterpolationConfig {
    let mut config = InterpolationConfig::new(field_name);
    config.insert("rule", json!(rule));
    config.insert("base_field", json!("body"));
    config.insert("prompt", json!("Work on: {{ context }}"));
    config
}

#[tokio::test]
async fn built_pipeline_fills_fields_end_to_end() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    catalog.add_field(
        "node",
        "article",
        FieldDefinitionBuilder::default()
            .name("field_mail")
            .label("Mail")
            .kind(FieldKind::Email)
            .build()
            .unwrap(),
    );
    catalog.enable("node", "article", "field_mail", config("field_mail", "email"));

    let interpolator = Interpolator::builder(
        Arc::new(CannedClient(r#"[{"value":"hello@example.org"}]"#.into())),
        Arc::new(MemoryEntityStore::new()),
        Arc::new(MemoryWorkQueue::new()),
        catalog,
    )
    .with_default_rules()
    .build();

    let mut entity = Entity::new("node", 1, "article");
    entity.set_field("body", vec![json!("Contact hello@example.org today")]);
    let ran = interpolator
        .modifier()
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(entity.field("field_mail"), &[json!("hello@example.org")]);
}

#[tokio::test]
async fn taxonomy_rule_wires_through_the_builder() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    catalog.add_field(
        "node",
        "article",
        FieldDefinitionBuilder::default()
            .name("field_tags")
            .label("Tags")
            .kind(FieldKind::EntityReference)
            .target(Some("taxonomy_term".to_string()))
            .settings(FieldSettings {
                auto_create: true,
                reference_bundle: Some("tags".to_string()),
                ..FieldSettings::default()
            })
            .build()
            .unwrap(),
    );
    catalog.enable("node", "article", "field_tags", config("field_tags", "taxonomy"));

    let terms = Arc::new(MemoryTermStore::new());
    terms.seed("tags", &["rust"]);

    let interpolator = Interpolator::builder(
        Arc::new(CannedClient(
            r#"[{"value":"rust"},{"value":"pipelines"}]"#.into(),
        )),
        Arc::new(MemoryEntityStore::new()),
        Arc::new(MemoryWorkQueue::new()),
        catalog,
    )
    .with_taxonomy_rule(terms.clone())
    .build();

    let mut entity = Entity::new("node", 3, "article");
    entity.set_field("body", vec![json!("An essay about rust pipelines")]);
    interpolator
        .modifier()
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();

    let stored = entity.field("field_tags");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["target_id"], json!(terms.find("tags", "rust").unwrap()));
    assert!(terms.find("tags", "pipelines").is_some());
}
