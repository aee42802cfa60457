//! Trait definition for field generation rules.

use async_trait::async_trait;
use intarsia_core::{
    strip_tags, value_text, Entity, FieldDefinition, FieldKind, InterpolationConfig,
};
use intarsia_error::IntarsiaResult;
use serde_json::Value;
use std::collections::BTreeMap;

/// Token name => rendered value map used for prompt substitution.
pub type TokenMap = BTreeMap<String, String>;

/// A generation rule for one target field type.
///
/// Rules are registered once at process start and looked up by identifier
/// or by (field kind, reference target) pair. A rule supplies the
/// field-specific pieces of the pipeline: the prompt token map, the JSON
/// format instruction appended to prompts, candidate verification, and
/// persistence into the field's native representation.
///
/// Verification must be side-effect free and safe to call redundantly.
/// Persistence is all-or-nothing: a failing store must not leave the target
/// field partially written.
#[async_trait]
pub trait FieldRule: Send + Sync {
    /// Unique rule identifier.
    fn id(&self) -> &'static str;

    /// Human-readable title.
    fn title(&self) -> &'static str;

    /// The field kind this rule targets.
    fn applies_to(&self) -> FieldKind;

    /// Reference target this rule is restricted to, when the target kind is
    /// a reference. Rules without a declared target match any target.
    fn target(&self) -> Option<&'static str> {
        None
    }

    /// Whether the rule consumes a configured prompt template.
    ///
    /// Rules returning `false` supply their own prompts from non-text
    /// sources via [`FieldRule::extra_prompts`].
    fn needs_prompt(&self) -> bool {
        true
    }

    /// Whether the rule exposes advanced configuration.
    fn advanced_mode(&self) -> bool {
        true
    }

    /// Field kinds allowed as the source (base) field.
    fn allowed_inputs(&self) -> Vec<FieldKind> {
        vec![
            FieldKind::TextLong,
            FieldKind::Text,
            FieldKind::String,
            FieldKind::StringLong,
            FieldKind::TextWithSummary,
        ]
    }

    /// Declared prompt tokens: name => description.
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
        tokens
    }

    /// Whether the rule is usable for this entity and field.
    ///
    /// A [`crate::RuleGate`] hook can override the outcome in either
    /// direction during candidate lookup.
    fn is_allowed(&self, _entity: &Entity, _field: &FieldDefinition) -> bool {
        true
    }

    /// Filter the target field's values before the empty check.
    ///
    /// Rules for compound fields drop placeholder deltas here so a
    /// half-filled value still counts as empty.
    fn check_if_empty(&self, values: Vec<Value>) -> Vec<Value> {
        values
    }

    /// Build the token map for one delta of the source field.
    ///
    /// # Errors
    ///
    /// Fails when the config lacks a `base_field`.
    fn generate_tokens(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
        delta: usize,
    ) -> IntarsiaResult<TokenMap> {
        let base_field = config.base_field()?;
        let raw = entity
            .field(base_field)
            .get(delta)
            .map(value_text)
            .unwrap_or_default();
        let mut tokens = TokenMap::new();
        tokens.insert("context".into(), strip_tags(&raw));
        tokens.insert("raw_context".into(), raw);
        tokens.insert("max_amount".into(), field.max_amount());
        Ok(tokens)
    }

    /// Instruction appended to every prompt to coerce JSON output.
    ///
    /// `None` means the raw completion is stored as-is (simple text rules).
    fn format_instruction(&self) -> Option<String> {
        Some(
            "Do not include any explanations, only provide a RFC8259 compliant JSON response \
             following this format without deviation.\n[{\"value\": \"requested value\"}]"
                .to_string(),
        )
    }

    /// Prompts supplied by the rule itself when `needs_prompt` is `false`.
    async fn extra_prompts(
        &self,
        _entity: &Entity,
        _field: &FieldDefinition,
        _config: &InterpolationConfig,
    ) -> IntarsiaResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Rule-specific value preparation between normalization and
    /// verification (e.g. configured text manipulations on tags).
    fn prepare_values(&self, values: Vec<Value>, _config: &InterpolationConfig) -> Vec<Value> {
        values
    }

    /// Accept or reject one candidate value against the field's domain.
    ///
    /// Rejections are not errors; rejected candidates are dropped.
    fn verify_value(&self, _entity: &Entity, _value: &Value, _field: &FieldDefinition) -> bool {
        true
    }

    /// Persist accepted values into the entity's field representation.
    ///
    /// May have side effects beyond the target field (term creation, media
    /// download), but the target field itself is written atomically.
    async fn store_values(
        &self,
        entity: &mut Entity,
        values: Vec<Value>,
        field: &FieldDefinition,
    ) -> IntarsiaResult<()> {
        entity.set_field(field.name(), values);
        Ok(())
    }
}
