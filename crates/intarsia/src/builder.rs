//! Pipeline assembly.

use intarsia_core::FieldKind;
use intarsia_interface::{
    ConfigMutator, EntityStore, FieldCatalog, FieldRule, GenerationClient, MediaFetcher,
    MediaStorage, Messenger, RuleGate, ScheduleDecision, TermResolver, TokenResolver,
    TracingMessenger, ValueMutator, WorkQueue,
};
use intarsia_pipeline::{
    BatchStrategy, ConfigResolver, DirectStrategy, EntityModifier, ProcessingStrategy,
    PromptRenderer, QueueStrategy, QueueWorker, RuleRunner, StatusTracker,
};
use intarsia_rules::{
    EmailRule, ImageRule, LinkRule, NumberRule, OptionsRule, RuleRegistry, TaxonomyRule,
    TelephoneRule, TextCompletionRule,
};
use std::sync::Arc;

/// A fully wired interpolation pipeline.
///
/// Built once at startup via [`Interpolator::builder`]; the host's save
/// lifecycle calls [`EntityModifier::save_entity`] and a periodic tick
/// drives [`QueueWorker::run_pending`].
pub struct Interpolator {
    modifier: EntityModifier,
    worker: QueueWorker,
    status: StatusTracker,
}

impl Interpolator {
    /// Start building a pipeline over the four required backends.
    pub fn builder(
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn EntityStore>,
        queue: Arc<dyn WorkQueue>,
        catalog: Arc<dyn FieldCatalog>,
    ) -> InterpolatorBuilder {
        InterpolatorBuilder {
            client,
            store,
            queue,
            catalog,
            registry: RuleRegistry::new(),
            tokens: None,
            messenger: Arc::new(TracingMessenger),
            gate: None,
            config_mutator: None,
            value_mutator: None,
            schedule_decision: None,
        }
    }

    /// The save-time entry point.
    pub fn modifier(&self) -> &EntityModifier {
        &self.modifier
    }

    /// The queue consumer.
    pub fn worker(&self) -> &QueueWorker {
        &self.worker
    }

    /// The status field bookkeeper.
    pub fn status(&self) -> &StatusTracker {
        &self.status
    }
}

/// Wires the pipeline's collaborators together.
///
/// Rules, hooks and the host token subsystem are optional; the required
/// backends come in through [`Interpolator::builder`].
pub struct InterpolatorBuilder {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn EntityStore>,
    queue: Arc<dyn WorkQueue>,
    catalog: Arc<dyn FieldCatalog>,
    registry: RuleRegistry,
    tokens: Option<Arc<dyn TokenResolver>>,
    messenger: Arc<dyn Messenger>,
    gate: Option<Arc<dyn RuleGate>>,
    config_mutator: Option<Arc<dyn ConfigMutator>>,
    value_mutator: Option<Arc<dyn ValueMutator>>,
    schedule_decision: Option<Arc<dyn ScheduleDecision>>,
}

impl InterpolatorBuilder {
    /// Register one rule.
    pub fn register(mut self, rule: Arc<dyn FieldRule>) -> Self {
        self.registry.register(rule);
        self
    }

    /// Register the built-in rules that need no extra backends: text,
    /// e-mail, telephone, link, options, and the three numeric kinds.
    pub fn with_default_rules(self) -> Self {
        self.register(Arc::new(TextCompletionRule::new()))
            .register(Arc::new(EmailRule::new()))
            .register(Arc::new(TelephoneRule::new()))
            .register(Arc::new(LinkRule::new()))
            .register(Arc::new(OptionsRule::new()))
            .register(Arc::new(NumberRule::new(FieldKind::Integer)))
            .register(Arc::new(NumberRule::new(FieldKind::Decimal)))
            .register(Arc::new(NumberRule::new(FieldKind::Float)))
    }

    /// Register the taxonomy rule over a term resolver.
    pub fn with_taxonomy_rule(self, terms: Arc<dyn TermResolver>) -> Self {
        self.register(Arc::new(TaxonomyRule::new(terms)))
    }

    /// Register the image rule over media backends.
    pub fn with_image_rule(
        self,
        fetcher: Arc<dyn MediaFetcher>,
        storage: Arc<dyn MediaStorage>,
    ) -> Self {
        self.register(Arc::new(ImageRule::new(fetcher, storage)))
    }

    /// Use the host's token subsystem for token mode and config overrides.
    pub fn with_token_resolver(mut self, tokens: Arc<dyn TokenResolver>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Route user-visible warnings through a host messenger.
    pub fn with_messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = messenger;
        self
    }

    /// Let a collaborator veto or force rule candidates.
    pub fn with_rule_gate(mut self, gate: Arc<dyn RuleGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Let a collaborator rewrite configs before dispatch.
    pub fn with_config_mutator(mut self, mutator: Arc<dyn ConfigMutator>) -> Self {
        self.config_mutator = Some(mutator);
        self
    }

    /// Let a collaborator rewrite normalized values before verification.
    pub fn with_value_mutator(mut self, mutator: Arc<dyn ValueMutator>) -> Self {
        self.value_mutator = Some(mutator);
        self
    }

    /// Let a collaborator force-process or force-skip jobs.
    pub fn with_schedule_decision(mut self, decision: Arc<dyn ScheduleDecision>) -> Self {
        self.schedule_decision = Some(decision);
        self
    }

    /// Assemble the pipeline.
    pub fn build(self) -> Interpolator {
        let mut registry = self.registry;
        if let Some(gate) = self.gate {
            registry.set_gate(gate);
        }
        let registry = Arc::new(registry);

        let runner = Arc::new(RuleRunner::new(
            registry.clone(),
            self.client,
            PromptRenderer::new(self.tokens.clone()),
            self.value_mutator,
        ));
        let strategies: Vec<Arc<dyn ProcessingStrategy>> = vec![
            Arc::new(DirectStrategy::new(runner.clone(), self.messenger.clone())),
            Arc::new(BatchStrategy::new(
                runner.clone(),
                self.store.clone(),
                self.messenger,
            )),
            Arc::new(QueueStrategy::new(self.queue.clone())),
        ];
        let modifier = EntityModifier::new(
            ConfigResolver::new(self.catalog.clone(), self.tokens),
            registry,
            strategies,
            self.config_mutator,
            self.schedule_decision,
        );
        let worker = QueueWorker::new(self.queue, self.store, self.catalog.clone(), runner);
        let status = StatusTracker::new(self.catalog);
        Interpolator {
            modifier,
            worker,
            status,
        }
    }
}
