//! Core data types for the Intarsia field interpolation pipeline.
//!
//! This crate provides the foundation data types used across all Intarsia
//! interfaces: content entities, field definitions, the per-field
//! interpolation configuration bag, processing status, and the durable
//! queue job payload.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod field;
mod job;
mod media;
mod params;
mod status;
mod telemetry;
mod text;

pub use config::{InterpolationConfig, Mode, WorkerType};
pub use entity::Entity;
pub use field::{FieldDefinition, FieldDefinitionBuilder, FieldKind, FieldSettings};
pub use job::ProcessingJob;
pub use media::{Attachment, MediaSource};
pub use params::{GenerationParams, GenerationParamsBuilder};
pub use status::{InterpolationStatus, STATUS_FIELD_NAME};
pub use telemetry::{init_telemetry, shutdown_telemetry};
pub use text::{strip_tags, value_text};
