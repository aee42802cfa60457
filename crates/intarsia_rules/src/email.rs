//! E-mail extraction rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind};
use intarsia_interface::FieldRule;
use regex::Regex;
use serde_json::Value;

/// Extracts e-mail addresses from the source text.
#[derive(Debug, Clone)]
pub struct EmailRule {
    pattern: Regex,
}

impl EmailRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self {
            // Intentionally permissive; the mail system does the strict check.
            pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"),
        }
    }
}

impl Default for EmailRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldRule for EmailRule {
    fn id(&self) -> &'static str {
        "email"
    }

    fn title(&self) -> &'static str {
        "E-mail Finder"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::Email
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"plain e-mail address\"}]"
                .to_string(),
        )
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, _field: &FieldDefinition) -> bool {
        self.pattern.is_match(value_text(value).trim())
    }
}
