//! Telephone number extraction rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind};
use intarsia_interface::FieldRule;
use regex::Regex;
use serde_json::Value;

/// Extracts international telephone numbers from the source text.
#[derive(Debug, Clone)]
pub struct TelephoneRule {
    pattern: Regex,
}

impl TelephoneRule {
    /// Create the rule.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\+\(?[0-9]{1,3}\)?[ ]?[0-9]{6,12}$")
                .expect("valid telephone pattern"),
        }
    }
}

impl Default for TelephoneRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldRule for TelephoneRule {
    fn id(&self) -> &'static str {
        "telephone"
    }

    fn title(&self) -> &'static str {
        "Telephone Finder"
    }

    fn applies_to(&self) -> FieldKind {
        FieldKind::Telephone
    }

    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"plain telephone number \
             with plus and country code\"}]"
                .to_string(),
        )
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, _field: &FieldDefinition) -> bool {
        self.pattern.is_match(value_text(value).trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intarsia_core::FieldDefinitionBuilder;
    use serde_json::json;

    fn field() -> FieldDefinition {
        FieldDefinitionBuilder::default()
            .name("field_phone")
            .label("Phone")
            .kind(FieldKind::Telephone)
            .build()
            .unwrap()
    }

    #[test]
    fn accepts_international_numbers() {
        let rule = TelephoneRule::new();
        let entity = Entity::new("node", 1, "article");
        assert!(rule.verify_value(&entity, &json!("+46701234567"), &field()));
        assert!(rule.verify_value(&entity, &json!("+(1) 5551234567"), &field()));
    }

    #[test]
    fn rejects_local_and_malformed_numbers() {
        let rule = TelephoneRule::new();
        let entity = Entity::new("node", 1, "article");
        assert!(!rule.verify_value(&entity, &json!("0701234567"), &field()));
        assert!(!rule.verify_value(&entity, &json!("+46 70-123 45 67"), &field()));
        assert!(!rule.verify_value(&entity, &json!("call me"), &field()));
    }
}
