//! Typed extension hooks.
//!
//! Collaborators influence the pipeline through explicit strategy objects
//! passed in at construction time, each with a typed input and output,
//! instead of mutable event dispatch.

use intarsia_core::{Entity, FieldDefinition, InterpolationConfig};
use serde_json::Value;

/// Three-valued decision over a rule candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateVerdict {
    /// Exclude the rule even if its own predicate accepts.
    ForceHidden,
    /// Include the rule even if its own predicate rejects.
    ForceVisible,
    /// Defer to the rule's own predicate.
    Neutral,
}

/// Veto or force-include rule candidates during lookup.
///
/// `ForceHidden` always wins over `ForceVisible`.
pub trait RuleGate: Send + Sync {
    /// Decide for one (entity, field, rule) combination.
    fn decide(&self, entity: &Entity, field: &FieldDefinition, rule_id: &str) -> GateVerdict;
}

/// Three-valued decision over whether a job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleVerdict {
    /// Run the job regardless of the normal decision.
    ForceProcess,
    /// Skip the job regardless of the normal decision.
    ForceSkip,
    /// Apply the normal mode-based decision.
    Neutral,
}

/// Override the "should this field be processed" decision.
pub trait ScheduleDecision: Send + Sync {
    /// Decide for one (entity, field, config) job.
    fn decide(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
    ) -> ScheduleVerdict;
}

/// Rewrite a field's configuration before dispatch.
pub trait ConfigMutator: Send + Sync {
    /// Mutate the config in place.
    fn mutate(&self, entity: &Entity, config: &mut InterpolationConfig);
}

/// Rewrite normalized values before verification.
pub trait ValueMutator: Send + Sync {
    /// Return the values to verify and store.
    fn mutate(
        &self,
        entity: &Entity,
        field: &FieldDefinition,
        config: &InterpolationConfig,
        values: Vec<Value>,
    ) -> Vec<Value>;
}

/// Surface user-visible warnings from the direct and batch strategies.
pub trait Messenger: Send + Sync {
    /// Show a warning to the saving user.
    fn warn(&self, message: &str);
}

/// Default messenger that routes warnings to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMessenger;

impl Messenger for TracingMessenger {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
