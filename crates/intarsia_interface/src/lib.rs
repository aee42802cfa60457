//! Trait definitions for the Intarsia field interpolation pipeline.
//!
//! All collaborators the pipeline depends on are expressed as traits here:
//! the generation backend, field rules, entity/media storage, the durable
//! work queue, the host's field catalog and templating subsystem, and the
//! typed extension hooks. Implementations are injected at construction
//! time; there are no ambient singletons.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod client;
mod hooks;
mod media;
mod rule;
mod store;
mod term;
mod token;
mod queue;

pub use catalog::FieldCatalog;
pub use client::GenerationClient;
pub use hooks::{
    ConfigMutator, GateVerdict, Messenger, RuleGate, ScheduleDecision, ScheduleVerdict,
    TracingMessenger, ValueMutator,
};
pub use media::{MediaFetcher, MediaStorage, StoredFile};
pub use rule::{FieldRule, TokenMap};
pub use store::{EntityStore, SaveContext};
pub use term::TermResolver;
pub use token::TokenResolver;
pub use queue::WorkQueue;
