//! End-to-end pipeline tests over in-memory backends and a mock client.

use async_trait::async_trait;
use intarsia_core::{
    Entity, FieldDefinition, FieldDefinitionBuilder, FieldKind, GenerationParams,
    InterpolationConfig, InterpolationStatus, ProcessingJob,
};
use intarsia_error::{IntarsiaResult, RequestError};
use intarsia_interface::{
    EntityStore, FieldCatalog, GenerationClient, SaveContext, TokenResolver, TracingMessenger,
    WorkQueue,
};
use intarsia_pipeline::{
    BatchStrategy, ConfigResolver, DirectStrategy, EntityModifier, MemoryEntityStore,
    MemoryFieldCatalog, MemoryWorkQueue, ProcessingStrategy, PromptRenderer, QueueStrategy,
    QueueWorker, RuleRunner, StatusTracker,
};
use intarsia_rules::{EmailRule, RuleRegistry};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct MockClient {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> IntarsiaResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-1"
    }
}

fn email_field(name: &str) -> FieldDefinition {
    FieldDefinitionBuilder::default()
        .name(name)
        .label("Mail")
        .kind(FieldKind::Email)
        .build()
        .unwrap()
}

fn email_config(field_name: &str, worker: &str) -> InterpolationConfig {
    let mut config = InterpolationConfig::new(field_name);
    config.insert("rule", json!("email"));
    config.insert("base_field", json!("body"));
    config.insert("prompt", json!("Find the address in: {{ context }}"));
    config.insert("worker_type", json!(worker));
    config
}

struct Harness {
    catalog: Arc<MemoryFieldCatalog>,
    store: Arc<MemoryEntityStore>,
    queue: Arc<MemoryWorkQueue>,
    client: Arc<MockClient>,
    modifier: EntityModifier,
    worker: QueueWorker,
}

fn harness(response: &str) -> Harness {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    let store = Arc::new(MemoryEntityStore::new());
    let queue = Arc::new(MemoryWorkQueue::new());
    let client = Arc::new(MockClient::new(response));

    let mut registry = RuleRegistry::new();
    registry.register(Arc::new(EmailRule::new()));
    let registry = Arc::new(registry);

    let runner = Arc::new(RuleRunner::new(
        registry.clone(),
        client.clone(),
        PromptRenderer::new(None),
        None,
    ));
    let messenger = Arc::new(TracingMessenger);
    let strategies: Vec<Arc<dyn ProcessingStrategy>> = vec![
        Arc::new(DirectStrategy::new(runner.clone(), messenger.clone())),
        Arc::new(BatchStrategy::new(
            runner.clone(),
            store.clone(),
            messenger,
        )),
        Arc::new(QueueStrategy::new(queue.clone())),
    ];
    let modifier = EntityModifier::new(
        ConfigResolver::new(catalog.clone(), None),
        registry,
        strategies,
        None,
        None,
    );
    let worker = QueueWorker::new(queue.clone(), store.clone(), catalog.clone(), runner);
    Harness {
        catalog,
        store,
        queue,
        client,
        modifier,
        worker,
    }
}

fn article(id: u64, body: &str) -> Entity {
    let mut entity = Entity::new("node", id, "article");
    entity.set_field("body", vec![json!(body)]);
    entity
}

#[tokio::test]
async fn direct_save_fills_an_empty_field() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "direct"));

    let mut entity = article(1, "Reach us at info@example.com for details.");
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(h.client.calls(), 1);
    assert_eq!(entity.field("field_mail"), &[json!("info@example.com")]);
}

#[tokio::test]
async fn filled_field_is_skipped_without_edit_mode() {
    let h = harness(r#"[{"value":"new@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "direct"));

    let mut entity = article(1, "text");
    entity.set_field("field_mail", vec![json!("old@example.com")]);
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(!ran);
    assert_eq!(h.client.calls(), 0);
    assert_eq!(entity.field("field_mail"), &[json!("old@example.com")]);
}

#[tokio::test]
async fn edit_mode_skips_when_the_source_is_unchanged() {
    let h = harness(r#"[{"value":"new@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    let mut config = email_config("field_mail", "direct");
    config.insert("edit_mode", json!(true));
    h.catalog.enable("node", "article", "field_mail", config);

    let mut entity = article(1, "text");
    entity.set_field("field_mail", vec![json!("old@example.com")]);
    entity.snapshot_original();
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(!ran);
    assert_eq!(h.client.calls(), 0);
}

#[tokio::test]
async fn edit_mode_regenerates_when_the_source_changed() {
    let h = harness(r#"[{"value":"new@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    let mut config = email_config("field_mail", "direct");
    config.insert("edit_mode", json!(true));
    h.catalog.enable("node", "article", "field_mail", config);

    let mut entity = article(1, "old text");
    entity.set_field("field_mail", vec![json!("old@example.com")]);
    entity.snapshot_original();
    entity.set_field("body", vec![json!("new text with new@example.com")]);
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(h.client.calls(), 1);
    assert_eq!(entity.field("field_mail"), &[json!("new@example.com")]);
}

#[tokio::test]
async fn suppressed_saves_bypass_the_pipeline() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "direct"));

    let mut entity = article(1, "text");
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::suppressed())
        .await
        .unwrap();
    assert!(!ran);
    assert_eq!(h.client.calls(), 0);
}

#[tokio::test]
async fn inserts_only_reach_import_capable_strategies() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "direct"));

    let mut entity = article(1, "text");
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::insert())
        .await
        .unwrap();
    assert!(!ran);
    assert_eq!(h.client.calls(), 0);

    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "queue"));
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::insert())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(h.queue.len().await, 1);
}

#[tokio::test]
async fn batch_jobs_drain_at_the_end_of_the_save() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "batch"));

    let mut entity = article(1, "text");
    h.store.insert(entity.clone());
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(entity.field("field_mail"), &[json!("info@example.com")]);
    let stored = h.store.load("node", 1).await.unwrap().unwrap();
    assert_eq!(stored.field("field_mail"), &[json!("info@example.com")]);
}

#[tokio::test]
async fn queue_status_stays_processing_until_the_last_job() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_a"));
    h.catalog.add_field("node", "article", email_field("field_b"));
    h.catalog
        .enable("node", "article", "field_a", email_config("field_a", "queue"));
    h.catalog
        .enable("node", "article", "field_b", email_config("field_b", "queue"));

    let mut entity = article(7, "text");
    entity.set_status(InterpolationStatus::Pending);
    let ran = h
        .modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(entity.status(), Some(InterpolationStatus::Processing));
    assert_eq!(h.queue.len().await, 2);
    h.store.insert(entity.clone());

    let first = h.queue.claim().await.unwrap().unwrap();
    h.worker.process(first).await.unwrap();
    let after_first = h.store.load("node", 7).await.unwrap().unwrap();
    assert_eq!(after_first.status(), Some(InterpolationStatus::Processing));

    let second = h.queue.claim().await.unwrap().unwrap();
    h.worker.process(second).await.unwrap();
    let after_second = h.store.load("node", 7).await.unwrap().unwrap();
    assert_eq!(after_second.status(), Some(InterpolationStatus::Finished));
    assert_eq!(after_second.field("field_a"), &[json!("info@example.com")]);
    assert_eq!(after_second.field("field_b"), &[json!("info@example.com")]);
}

#[tokio::test]
async fn batch_jobs_stay_with_their_own_entity() {
    let store = Arc::new(MemoryEntityStore::new());
    let client = Arc::new(MockClient::new(r#"[{"value":"a@example.com"}]"#));
    let mut registry = RuleRegistry::new();
    registry.register(Arc::new(EmailRule::new()));
    let runner = Arc::new(RuleRunner::new(
        Arc::new(registry),
        client.clone(),
        PromptRenderer::new(None),
        None,
    ));
    let strategy = BatchStrategy::new(runner, store.clone(), Arc::new(TracingMessenger));

    let field = email_field("field_mail");
    let config = email_config("field_mail", "batch");

    let mut first = article(1, "write to a@example.com");
    let mut second = article(2, "nothing of interest");
    store.insert(first.clone());
    store.insert(second.clone());

    strategy.schedule(&mut first, &field, &config).await.unwrap();

    // Another save's post hook runs in between; it must not consume
    // entity 1's deferred job or write into entity 2.
    strategy.post_process(&mut second).await.unwrap();
    assert_eq!(client.calls(), 0);
    assert!(second.field_is_empty("field_mail"));
    let stored_second = store.load("node", 2).await.unwrap().unwrap();
    assert!(stored_second.field_is_empty("field_mail"));

    strategy.post_process(&mut first).await.unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(first.field("field_mail"), &[json!("a@example.com")]);
    let stored_first = store.load("node", 1).await.unwrap().unwrap();
    assert_eq!(stored_first.field("field_mail"), &[json!("a@example.com")]);
}

struct FailingClient;

#[async_trait]
impl GenerationClient for FailingClient {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> IntarsiaResult<String> {
        Err(RequestError::new("backend unavailable"))?
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "failing-1"
    }
}

#[tokio::test]
async fn queue_worker_marks_the_entity_failed_on_error() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    let store = Arc::new(MemoryEntityStore::new());
    let queue = Arc::new(MemoryWorkQueue::new());
    catalog.add_field("node", "article", email_field("field_mail"));
    let mut registry = RuleRegistry::new();
    registry.register(Arc::new(EmailRule::new()));
    let runner = Arc::new(RuleRunner::new(
        Arc::new(registry),
        Arc::new(FailingClient),
        PromptRenderer::new(None),
        None,
    ));
    let worker = QueueWorker::new(queue.clone(), store.clone(), catalog.clone(), runner);

    let mut entity = article(5, "text");
    entity.set_status(InterpolationStatus::Processing);
    store.insert(entity);
    queue
        .push(ProcessingJob::new(
            "node",
            5,
            "field_mail",
            email_config("field_mail", "queue"),
        ))
        .await
        .unwrap();

    let drained = worker.run_pending().await.unwrap();
    assert_eq!(drained, 1);

    // The job is acknowledged, not retried, and the stored copy ends failed.
    assert!(queue.is_empty().await);
    assert_eq!(queue.pending_for_entity("node", 5).await, 0);
    let stored = store.load("node", 5).await.unwrap().unwrap();
    assert_eq!(stored.status(), Some(InterpolationStatus::Failed));
    assert!(stored.field_is_empty("field_mail"));
}

#[tokio::test]
async fn queue_worker_drops_jobs_for_deleted_entities() {
    let h = harness(r#"[{"value":"info@example.com"}]"#);
    h.catalog.add_field("node", "article", email_field("field_mail"));
    h.catalog
        .enable("node", "article", "field_mail", email_config("field_mail", "queue"));

    let mut entity = article(9, "text");
    h.modifier
        .save_entity(&mut entity, &SaveContext::default())
        .await
        .unwrap();
    // Never inserted into the store, so the worker sees a deleted entity.
    let drained = h.worker.run_pending().await.unwrap();
    assert_eq!(drained, 1);
    assert_eq!(h.client.calls(), 0);
    assert!(h.queue.is_empty().await);
}

#[tokio::test]
async fn missing_rule_errors_with_the_field_type() {
    let client = Arc::new(MockClient::new("unused"));
    let runner = RuleRunner::new(
        Arc::new(RuleRegistry::new()),
        client,
        PromptRenderer::new(None),
        None,
    );
    let mut entity = article(1, "text");
    let field = email_field("field_mail");
    let err = runner
        .run(&mut entity, &field, &email_config("field_mail", "direct"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("The rule could not be found: email"));
}

#[test]
fn enabled_configs_sort_by_weight_stable() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    for (name, weight) in [("field_a", 30), ("field_b", 10), ("field_c", 20)] {
        catalog.add_field("node", "article", email_field(name));
        let mut config = email_config(name, "direct");
        config.insert("weight", json!(weight));
        catalog.enable("node", "article", name, config);
    }
    let resolver = ConfigResolver::new(catalog, None);
    let entity = article(1, "text");
    let order: Vec<&str> = resolver
        .resolve_enabled(&entity)
        .unwrap()
        .iter()
        .map(|task| task.config.field_name())
        .map(|name| match name {
            "field_a" => "A",
            "field_b" => "B",
            _ => "C",
        })
        .collect();
    assert_eq!(order, vec!["B", "C", "A"]);
}

struct MapTokenResolver(HashMap<String, String>);

impl TokenResolver for MapTokenResolver {
    fn replace(&self, template: &str, _entity: &Entity) -> Option<String> {
        self.0.get(template).cloned()
    }
}

#[test]
fn config_overrides_render_through_the_token_subsystem() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    let mut tokens = HashMap::new();
    tokens.insert("[node:custom_prompt]".to_string(), "Dynamic prompt".to_string());
    tokens.insert("[node:empty]".to_string(), "  ".to_string());
    let resolver = ConfigResolver::new(catalog, Some(Arc::new(MapTokenResolver(tokens))));
    let entity = article(1, "text");

    let mut config = InterpolationConfig::new("field_mail");
    config.insert("prompt", json!("Static prompt"));
    config.insert("prompt_override", json!("[node:custom_prompt]"));
    assert_eq!(
        resolver.config_value("prompt", &config, &entity, ""),
        "Dynamic prompt"
    );

    // Override renders blank, fall back to the static value.
    config.insert("prompt_override", json!("[node:empty]"));
    assert_eq!(
        resolver.config_value("prompt", &config, &entity, ""),
        "Static prompt"
    );

    // Unresolvable override, same fallback.
    config.insert("prompt_override", json!("[node:unknown]"));
    assert_eq!(
        resolver.config_value("prompt", &config, &entity, ""),
        "Static prompt"
    );

    // No key at all, the default wins.
    let bare = InterpolationConfig::new("field_mail");
    assert_eq!(
        resolver.config_value("prompt", &bare, &entity, "fallback"),
        "fallback"
    );
}

#[test]
fn status_field_follows_the_enabled_set() {
    let catalog = Arc::new(MemoryFieldCatalog::new());
    catalog.add_field("node", "article", email_field("field_mail"));
    let tracker = StatusTracker::new(catalog.clone());

    tracker.sync_bundle("node", "article");
    assert!(!catalog.has_status_field("node", "article"));

    catalog.enable("node", "article", "field_mail", email_config("field_mail", "direct"));
    tracker.sync_bundle("node", "article");
    assert!(catalog.has_status_field("node", "article"));
    assert_eq!(
        tracker.initial_status("node", "article"),
        Some(InterpolationStatus::Pending)
    );

    catalog.disable("node", "article", "field_mail");
    tracker.sync_bundle("node", "article");
    assert!(!catalog.has_status_field("node", "article"));
    assert_eq!(tracker.initial_status("node", "article"), None);
}
