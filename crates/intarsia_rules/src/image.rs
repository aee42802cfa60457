//! Image download rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind};
use intarsia_error::IntarsiaResult;
use intarsia_interface::{FieldRule, MediaFetcher, MediaStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Fills image fields by downloading generated image URLs into managed
/// storage.
///
/// Downloads happen before any file is written, so a dead link aborts the
/// whole store without leaving stray files behind.
pub struct ImageRule {
    fetcher: Arc<dyn MediaFetcher>,
    storage: Arc<dyn MediaStorage>,
}

impl ImageRule {
    /// Create the rule over fetch and storage backends.
    pub fn new(fetcher: Arc<dyn MediaFetcher>, storage: Arc<dyn MediaStorage>) -> Self {
        Self { fetcher, storage }
    }

    fn file_name(url: &Url) -> String {
        url.path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .unwrap_or("image.png")
            .to_string()
    }

    fn directory(field: &FieldDefinition) -> String {
        field
            .settings()
            .file_directory
            .clone()
            .unwrap_or_else(|| "images".to_string())
    }
}

#[async_trait]
impl FieldRule for ImageRule {
    fn id(&self) -> &'static str {
        "image"
    }

    fn title(&self) -> &'static str {
        "Image Fetcher"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::Image
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"absolute image url\"}]"
                .to_string(),
        )
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, _field: &FieldDefinition) -> bool {
        match Url::parse(value_text(value).trim()) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }

    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        let mut downloads = Vec::with_capacity(values.len());
        for value in &values {
            let text = value_text(value);
            let url = text.trim().to_string();
            let bytes = self.fetcher.fetch(&url).await?;
            downloads.push((url, bytes));
        }
        let directory = Self::directory(field);
        let mut references = Vec::with_capacity(downloads.len());
        for (url, bytes) in downloads {
            let name = Url::parse(&url)
                .map(|u| Self::file_name(&u))
                .unwrap_or_else(|_| "image.png".to_string());
            let stored = self
                .storage
                .store(&format!("{directory}/{name}"), &bytes)
                .await?;
            info!(source = %url, path = %stored.path, "downloaded image");
            references.push(json!({ "target_id": stored.id }));
        }
        entity.set_field(field.name(), references);
        Ok(())
    }
}
