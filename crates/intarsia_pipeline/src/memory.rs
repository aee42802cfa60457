//! In-memory backend implementations.
//!
//! Single-process stand-ins for the host's entity storage, field catalog
//! and durable queue. The queue keeps jobs serialized, so the wire schema
//! is exercised on every push and claim.

use async_trait::async_trait;
use intarsia_core::{Entity, FieldDefinition, InterpolationConfig, ProcessingJob};
use intarsia_error::{IntarsiaResult, QueueError, QueueErrorKind};
use intarsia_interface::{EntityStore, FieldCatalog, SaveContext, WorkQueue};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, RwLock};

type EntityKey = (String, u64);

/// Thread-safe in-memory entity storage.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    entities: RwLock<HashMap<EntityKey, Entity>>,
}

impl MemoryEntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an entity into the store directly, outside the save path.
    pub fn insert(&self, entity: Entity) {
        let key = (entity.entity_type().to_string(), entity.id());
        self.entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entity);
    }

    /// Remove an entity, simulating a host-side delete.
    pub fn remove(&self, entity_type: &str, id: u64) {
        self.entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(entity_type.to_string(), id));
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn load(&self, entity_type: &str, id: u64) -> IntarsiaResult<Option<Entity>> {
        Ok(self
            .entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(entity_type.to_string(), id))
            .cloned())
    }

    async fn save(&self, entity: &Entity, _ctx: &SaveContext) -> IntarsiaResult<()> {
        self.insert(entity.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    items: VecDeque<String>,
    pending: HashMap<EntityKey, usize>,
}

/// In-memory work queue with a transactional per-entity job counter.
///
/// Jobs live in the queue serialized; the counter moves together with push
/// and complete under one lock, so "was this the last job for the entity"
/// is a plain read instead of a scan over the backlog.
#[derive(Debug, Default)]
pub struct MemoryWorkQueue {
    inner: Mutex<QueueInner>,
}

impl MemoryWorkQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkQueue for MemoryWorkQueue {
    async fn push(&self, job: ProcessingJob) -> IntarsiaResult<()> {
        let wire = serde_json::to_string(&job)
            .map_err(|e| QueueError::new(QueueErrorKind::Serialize(e.to_string())))?;
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let key = (job.entity_type.clone(), job.entity_id);
        *inner.pending.entry(key).or_insert(0) += 1;
        inner.items.push_back(wire);
        Ok(())
    }

    async fn claim(&self) -> IntarsiaResult<Option<ProcessingJob>> {
        let wire = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.items.pop_front()
        };
        match wire {
            Some(wire) => {
                let job = serde_json::from_str(&wire)
                    .map_err(|e| QueueError::new(QueueErrorKind::Deserialize(e.to_string())))?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    async fn complete(&self, job: &ProcessingJob) -> IntarsiaResult<usize> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let key = (job.entity_type.clone(), job.entity_id);
        let Some(count) = inner.pending.get_mut(&key) else {
            return Err(QueueError::new(QueueErrorKind::UnknownItem(
                job.entity_type.clone(),
                job.entity_id,
            ))
            .into());
        };
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            inner.pending.remove(&key);
        }
        Ok(remaining)
    }

    async fn pending_for_entity(&self, entity_type: &str, entity_id: u64) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending
            .get(&(entity_type.to_string(), entity_id))
            .copied()
            .unwrap_or(0)
    }

    async fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .len()
    }
}

type BundleKey = (String, String);

/// In-memory field catalog for tests and single-process hosts.
#[derive(Debug, Default)]
pub struct MemoryFieldCatalog {
    fields: RwLock<HashMap<BundleKey, Vec<FieldDefinition>>>,
    configs: RwLock<HashMap<(String, String, String), InterpolationConfig>>,
    status: RwLock<HashSet<BundleKey>>,
}

impl MemoryFieldCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field on a bundle.
    pub fn add_field(&self, entity_type: &str, bundle: &str, field: FieldDefinition) {
        self.fields
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry((entity_type.to_string(), bundle.to_string()))
            .or_default()
            .push(field);
    }

    /// Enable interpolation on a field.
    pub fn enable(
        &self,
        entity_type: &str,
        bundle: &str,
        field_name: &str,
        config: InterpolationConfig,
    ) {
        self.configs.write().unwrap_or_else(|e| e.into_inner()).insert(
            (
                entity_type.to_string(),
                bundle.to_string(),
                field_name.to_string(),
            ),
            config,
        );
    }

    /// Disable interpolation on a field.
    pub fn disable(&self, entity_type: &str, bundle: &str, field_name: &str) {
        self.configs.write().unwrap_or_else(|e| e.into_inner()).remove(&(
            entity_type.to_string(),
            bundle.to_string(),
            field_name.to_string(),
        ));
    }
}

impl FieldCatalog for MemoryFieldCatalog {
    fn field_definitions(&self, entity_type: &str, bundle: &str) -> Vec<FieldDefinition> {
        self.fields
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(entity_type.to_string(), bundle.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn interpolation_config(
        &self,
        entity_type: &str,
        bundle: &str,
        field_name: &str,
    ) -> Option<InterpolationConfig> {
        self.configs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(
                entity_type.to_string(),
                bundle.to_string(),
                field_name.to_string(),
            ))
            .cloned()
    }

    fn has_status_field(&self, entity_type: &str, bundle: &str) -> bool {
        self.status
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(entity_type.to_string(), bundle.to_string()))
    }

    fn attach_status_field(&self, entity_type: &str, bundle: &str) {
        self.status
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((entity_type.to_string(), bundle.to_string()));
    }

    fn remove_status_field(&self, entity_type: &str, bundle: &str) {
        self.status
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(entity_type.to_string(), bundle.to_string()));
    }
}
