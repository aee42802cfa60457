//! Intarsia - AI Field Interpolation Pipeline
//!
//! Intarsia auto-populates structured entity fields on a content platform
//! from the output of a generative AI backend. Given an entity and a field,
//! it resolves the applicable generation rule, renders a prompt from entity
//! data, calls the backend, normalizes the free-form response into typed
//! candidate values, verifies them against the field's constraints and
//! persists the survivors, under a synchronous, deferred or queued
//! execution strategy with per-entity status tracking.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use intarsia::{Interpolator, SaveContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let interpolator = Interpolator::builder(client, store, queue, catalog)
//!         .with_default_rules()
//!         .build();
//!
//!     let mut entity = load_entity();
//!     interpolator
//!         .modifier()
//!         .save_entity(&mut entity, &SaveContext::default())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Intarsia is organized as a workspace with focused crates:
//!
//! - `intarsia_core` - Core data types (Entity, FieldDefinition, etc.)
//! - `intarsia_interface` - Trait seams for backends and hooks
//! - `intarsia_error` - Error types
//! - `intarsia_rules` - Rule registry and the built-in rule set
//! - `intarsia_pipeline` - Resolver, renderer, normalizer, strategies
//!
//! This crate (`intarsia`) re-exports everything and wires a working
//! pipeline through [`InterpolatorBuilder`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;

pub use builder::{Interpolator, InterpolatorBuilder};

pub use intarsia_core::{
    init_telemetry, shutdown_telemetry, strip_tags, value_text, Attachment, Entity,
    FieldDefinition, FieldDefinitionBuilder, FieldKind, FieldSettings, GenerationParams,
    GenerationParamsBuilder, InterpolationConfig, InterpolationStatus, MediaSource, Mode,
    ProcessingJob, WorkerType, STATUS_FIELD_NAME,
};
pub use intarsia_error::{
    ConfigError, IntarsiaError, IntarsiaErrorKind, IntarsiaResult, QueueError, QueueErrorKind,
    RequestError, ResponseError, RuleNotFoundError, StorageError, StorageErrorKind,
};
pub use intarsia_interface::{
    ConfigMutator, EntityStore, FieldCatalog, FieldRule, GateVerdict, GenerationClient,
    MediaFetcher, MediaStorage, Messenger, RuleGate, SaveContext, ScheduleDecision,
    ScheduleVerdict, StoredFile, TermResolver, TokenMap, TokenResolver, TracingMessenger,
    ValueMutator, WorkQueue,
};
pub use intarsia_pipeline::{
    BatchStrategy, ConfigResolver, DirectStrategy, EntityModifier, FieldTask, ImportCapable,
    MemoryEntityStore, MemoryFieldCatalog, MemoryWorkQueue, ProcessingStrategy, PromptRenderer,
    QueueStrategy, QueueWorker, ResponseNormalizer, RuleRunner, StatusTracker,
};
pub use intarsia_rules::{
    EmailRule, HttpMediaFetcher, ImageRule, LinkRule, LocalMediaStorage, MemoryTermStore,
    NumberRule, OptionsRule, RuleRegistry, TaxonomyRule, TelephoneRule, TextCompletionRule,
};
