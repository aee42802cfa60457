//! Static catalog of registered field rules.

use intarsia_core::{Entity, FieldDefinition};
use intarsia_interface::{FieldRule, GateVerdict, RuleGate};
use std::sync::Arc;

/// Catalog of generation rules keyed by target field kind.
///
/// Built once at process start from explicit `register` calls; lookups are
/// a single pass over the catalog with no backend calls.
///
/// # Example
///
/// ```rust,ignore
/// use intarsia_rules::{EmailRule, RuleRegistry};
///
/// let mut registry = RuleRegistry::new();
/// registry.register(Arc::new(EmailRule::new()));
/// let rule = registry.find_rule("email").unwrap();
/// ```
pub struct RuleRegistry {
    rules: Vec<Arc<dyn FieldRule>>,
    gate: Option<Arc<dyn RuleGate>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            gate: None,
        }
    }

    /// Create a registry with a candidate gate hook.
    pub fn with_gate(gate: Arc<dyn RuleGate>) -> Self {
        Self {
            rules: Vec::new(),
            gate: Some(gate),
        }
    }

    /// Register a rule. Registration order is the candidate order.
    pub fn register(&mut self, rule: Arc<dyn FieldRule>) {
        self.rules.push(rule);
    }

    /// Install a candidate gate hook.
    pub fn set_gate(&mut self, gate: Arc<dyn RuleGate>) {
        self.gate = Some(gate);
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find a rule by identifier.
    pub fn find_rule(&self, id: &str) -> Option<Arc<dyn FieldRule>> {
        self.rules.iter().find(|rule| rule.id() == id).cloned()
    }

    /// Find the rules usable for a field, in registration order.
    ///
    /// A rule matches when its field kind equals the field's kind and,
    /// when the field declares a reference target, the rule either declares
    /// the same target or none at all. The gate hook can veto
    /// (`ForceHidden`, always wins) or force-include (`ForceVisible`) a
    /// candidate; otherwise the rule's own `is_allowed` decides.
    pub fn find_candidates(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
    ) -> Vec<Arc<dyn FieldRule>> {
        let mut candidates = Vec::new();
        for rule in &self.rules {
            if rule.applies_to() != field.kind() {
                continue;
            }
            if let (Some(field_target), Some(rule_target)) = (field.target(), rule.target()) {
                if field_target != rule_target {
                    continue;
                }
            }
            let verdict = self
                .gate
                .as_ref()
                .map(|gate| gate.decide(entity, field, rule.id()))
                .unwrap_or(GateVerdict::Neutral);
            match verdict {
                GateVerdict::ForceHidden => continue,
                GateVerdict::ForceVisible => candidates.push(rule.clone()),
                GateVerdict::Neutral => {
                    if rule.is_allowed(entity, field) {
                        candidates.push(rule.clone());
                    }
                }
            }
        }
        candidates
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmailRule, TaxonomyRule, TextCompletionRule};
    use intarsia_core::{FieldDefinitionBuilder, FieldKind};

    fn email_field() -> FieldDefinition {
        FieldDefinitionBuilder::default()
            .name("field_mail")
            .label("Mail")
            .kind(FieldKind::Email)
            .build()
            .unwrap()
    }

    fn reference_field(target: &str) -> FieldDefinition {
        FieldDefinitionBuilder::default()
            .name("field_ref")
            .label("Reference")
            .kind(FieldKind::EntityReference)
            .target(Some(target.to_string()))
            .build()
            .unwrap()
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(TextCompletionRule::new()));
        registry.register(Arc::new(EmailRule::new()));
        registry.register(Arc::new(TaxonomyRule::default_for_tests()));
        registry
    }

    #[test]
    fn candidates_match_on_field_kind() {
        let registry = registry();
        let entity = Entity::new("node", 1, "article");
        let candidates = registry.find_candidates(&entity, &email_field());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id(), "email");
    }

    #[test]
    fn reference_target_must_match_declared_target() {
        let registry = registry();
        let entity = Entity::new("node", 1, "article");

        let matching = registry.find_candidates(&entity, &reference_field("taxonomy_term"));
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id(), "taxonomy");

        let mismatched = registry.find_candidates(&entity, &reference_field("user"));
        assert!(mismatched.is_empty());
    }

    #[test]
    fn find_rule_by_id() {
        let registry = registry();
        assert!(registry.find_rule("email").is_some());
        assert!(registry.find_rule("no_such_rule").is_none());
    }

    struct HideEmail;
    impl RuleGate for HideEmail {
        fn decide(&self, _: &Entity, _: &FieldDefinition, rule_id: &str) -> GateVerdict {
            if rule_id == "email" {
                GateVerdict::ForceHidden
            } else {
                GateVerdict::Neutral
            }
        }
    }

    struct ShowEverything;
    impl RuleGate for ShowEverything {
        fn decide(&self, _: &Entity, _: &FieldDefinition, _: &str) -> GateVerdict {
            GateVerdict::ForceVisible
        }
    }

    #[test]
    fn force_hidden_vetoes_a_candidate() {
        let mut registry = RuleRegistry::with_gate(Arc::new(HideEmail));
        registry.register(Arc::new(EmailRule::new()));
        let entity = Entity::new("node", 1, "article");
        assert!(registry.find_candidates(&entity, &email_field()).is_empty());
    }

    struct NeverAllowedEmail(EmailRule);

    #[async_trait::async_trait]
    impl FieldRule for NeverAllowedEmail {
        fn id(&self) -> &'static str {
            self.0.id()
        }
        fn title(&self) -> &'static str {
            self.0.title()
        }
        fn applies_to(&self) -> FieldKind {
            self.0.applies_to()
        }
        fn is_allowed(&self, _: &Entity, _: &FieldDefinition) -> bool {
            false
        }
    }

    #[test]
    fn force_visible_overrides_the_rule_predicate() {
        let mut registry = RuleRegistry::with_gate(Arc::new(ShowEverything));
        registry.register(Arc::new(NeverAllowedEmail(EmailRule::new())));
        let entity = Entity::new("node", 1, "article");
        assert_eq!(registry.find_candidates(&entity, &email_field()).len(), 1);
    }
}
