//! Durable work queue seam.

use async_trait::async_trait;
use intarsia_core::ProcessingJob;
use intarsia_error::IntarsiaResult;

/// A durable, at-least-once, multi-producer/multi-consumer work queue.
///
/// Items are removed only after successful processing; a failed item is not
/// retried by the pipeline itself (retry policy belongs to the queue
/// runtime).
///
/// Implementations maintain a per-entity job counter transactionally with
/// push and complete, so the "last job for this entity" decision is a
/// single atomic read instead of a racy queue scan.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Enqueue a job and bump the entity's pending counter.
    async fn push(&self, job: ProcessingJob) -> IntarsiaResult<()>;

    /// Claim the next job, `None` when the queue is drained.
    ///
    /// A claimed job stays counted against its entity until completed.
    async fn claim(&self) -> IntarsiaResult<Option<ProcessingJob>>;

    /// Acknowledge a claimed job, successful or not.
    ///
    /// Returns the number of jobs still pending or claimed for the same
    /// entity; zero means the completed job was the last one.
    async fn complete(&self, job: &ProcessingJob) -> IntarsiaResult<usize>;

    /// Number of jobs pending or claimed for an entity.
    async fn pending_for_entity(&self, entity_type: &str, entity_id: u64) -> usize;

    /// Total number of unconsumed jobs.
    async fn len(&self) -> usize;

    /// Whether the queue holds no unconsumed jobs.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
