//! Per-entity processing status.

use serde::{Deserialize, Serialize};

/// Name of the single-value status field attached to bundles with at least
/// one interpolated field.
pub const STATUS_FIELD_NAME: &str = "interpolation_status";

/// Processing status of an entity that holds interpolated fields.
///
/// Transitions: `Pending` -> `Processing` (before the first rule runs) ->
/// `Finished` (all jobs for the entity complete) or `Failed` (a job errored
/// and the entity cannot be completed).
///
/// # Examples
///
/// ```
/// use intarsia_core::InterpolationStatus;
///
/// assert_eq!(InterpolationStatus::Processing.to_string(), "processing");
/// assert_eq!(
///     "failed".parse::<InterpolationStatus>().unwrap(),
///     InterpolationStatus::Failed
/// );
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InterpolationStatus {
    /// No job has run for the entity yet.
    Pending,
    /// At least one job is scheduled or running.
    Processing,
    /// A job errored and the entity could not be completed.
    Failed,
    /// All jobs for the entity completed.
    Finished,
}

impl Default for InterpolationStatus {
    fn default() -> Self {
        Self::Pending
    }
}
