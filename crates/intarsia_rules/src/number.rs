//! Numeric field rule.

use async_trait::async_trait;
use intarsia_core::{value_text, Entity, FieldDefinition, FieldKind};
use intarsia_error::IntarsiaResult;
use intarsia_interface::FieldRule;
use serde_json::{Number, Value};

/// Extracts a number for integer, decimal or float fields.
///
/// One rule type covers all three kinds; register one instance per kind.
/// Storage bounds from the field settings reject out-of-range candidates.
#[derive(Debug, Clone, Copy)]
pub struct NumberRule {
    kind: FieldKind,
}

impl NumberRule {
    /// Create a rule for one numeric field kind.
    pub fn new(kind: FieldKind) -> Self {
        Self { kind }
    }

    fn parse(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            _ => value_text(value).trim().parse().ok(),
        }
    }
}

#[async_trait]
impl FieldRule for NumberRule {
    fn id(&self) -> &'static str {
        match self.kind {
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            _ => "float",
        }
    }

    fn title(&self) -> &'static str {
        "Number Finder"
    }

    fn applies_to(&self) -> FieldKind {
        self.kind
    }

    fn format_instruction(&self) -> Option<String> {
        let shape = if self.kind == FieldKind::Integer {
            "integer value"
        } else {
            "decimal value"
        };
        Some(format!(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{{\"value\": \"{shape}\"}}]"
        ))
    }

    fn verify_value(&self, _entity: &Entity, value: &Value, field: &FieldDefinition) -> bool {
        let Some(number) = self.parse(value) else {
            return false;
        };
        if self.kind == FieldKind::Integer && number.fract() != 0.0 {
            return false;
        }
        let settings = field.settings();
        if settings.min.is_some_and(|min| number < min) {
            return false;
        }
        if settings.max.is_some_and(|max| number > max) {
            return false;
        }
        true
    }

    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        let numbers = values
            .iter()
            .filter_map(|value| self.parse(value))
            .filter_map(|number| {
                if self.kind == FieldKind::Integer {
                    Some(Value::Number(Number::from(number as i64)))
                } else {
                    Number::from_f64(number).map(Value::Number)
                }
            })
            .collect();
        entity.set_field(field.name(), numbers);
        Ok(())
    }
}
