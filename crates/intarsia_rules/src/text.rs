//! Simple text completion rule.

use async_trait::async_trait;
use intarsia_core::FieldKind;
use intarsia_interface::FieldRule;

/// Fills long text fields with the raw completion for each prompt.
///
/// No JSON coercion: the normalizer's raw-text fallback carries the
/// completion through as a single value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCompletionRule;

impl TextCompletionRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FieldRule for TextCompletionRule {
    fn id(&self) -> &'static str {
        "text_completion"
    }

    fn title(&self) -> &'static str {
        "Text Completion"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::TextLong
    }

    fn format_instruction(&self) -> Option<String> {
        None
    }
}
