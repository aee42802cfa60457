//! Trait definition for the generation backend.

use async_trait::async_trait;
use intarsia_core::{Attachment, GenerationParams};
use intarsia_error::IntarsiaResult;

/// Core trait every generation backend must implement.
///
/// The pipeline treats the backend as an abstract capability: a prompt plus
/// parameters in, raw text out. Vendor specifics stay behind this seam.
///
/// Failures surface as `RequestError` (the call itself failed) or
/// `ResponseError` (the backend answered but produced nothing usable).
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate raw text for a prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> IntarsiaResult<String>;

    /// Generate raw text for a prompt with non-text attachments.
    ///
    /// The default delegates to [`GenerationClient::generate`], ignoring
    /// attachments; multimodal backends override this.
    async fn generate_structured(
        &self,
        prompt: &str,
        params: &GenerationParams,
        _attachments: &[Attachment],
    ) -> IntarsiaResult<String> {
        self.generate(prompt, params).await
    }

    /// Provider name (e.g. "openai", "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g. "gpt-4o-mini").
    fn model_name(&self) -> &str;
}
