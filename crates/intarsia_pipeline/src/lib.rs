//! The Intarsia field interpolation pipeline.
//!
//! Given an entity and a field, the pipeline resolves the applicable
//! generation rule, renders prompts from entity data, calls the generation
//! backend, normalizes the response into candidate values, verifies them
//! against the field's constraints and persists the survivors, all under
//! one of three execution strategies (direct, batch, queue) with a
//! per-entity processing status.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod direct;
mod memory;
mod modifier;
mod normalizer;
mod prompt;
mod queue;
mod resolver;
mod runner;
mod status;
mod strategy;

pub use batch::BatchStrategy;
pub use direct::DirectStrategy;
pub use memory::{MemoryEntityStore, MemoryFieldCatalog, MemoryWorkQueue};
pub use modifier::EntityModifier;
pub use normalizer::ResponseNormalizer;
pub use prompt::PromptRenderer;
pub use queue::{QueueStrategy, QueueWorker};
pub use resolver::{ConfigResolver, FieldTask};
pub use runner::RuleRunner;
pub use status::StatusTracker;
pub use strategy::{ImportCapable, ProcessingStrategy};
