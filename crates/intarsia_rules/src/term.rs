//! In-memory term resolver.

use intarsia_error::IntarsiaResult;
use intarsia_interface::TermResolver;
use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe in-memory vocabulary store.
///
/// Suitable for tests and single-process deployments; ids are assigned
/// sequentially per store.
#[derive(Debug, Default)]
pub struct MemoryTermStore {
    inner: Mutex<TermStoreInner>,
}

#[derive(Debug, Default)]
struct TermStoreInner {
    vocabularies: HashMap<String, Vec<(u64, String)>>,
    next_id: u64,
}

impl MemoryTermStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a vocabulary with term names, returning their ids.
    pub fn seed(&self, vocabulary: &str, names: &[&str]) -> Vec<u64> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let terms = inner.vocabularies.entry(vocabulary.to_string()).or_default();
        let start = terms.len();
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = start as u64 + ids.len() as u64 + 1;
            terms.push((id, name.to_string()));
            ids.push(id);
        }
        let max = terms.iter().map(|(id, _)| *id).max().unwrap_or(0);
        inner.next_id = inner.next_id.max(max);
        ids
    }
}

impl TermResolver for MemoryTermStore {
    fn list(&self, vocabulary: &str) -> Vec<(u64, String)> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .vocabularies
            .get(vocabulary)
            .cloned()
            .unwrap_or_default()
    }

    fn create(&self, vocabulary: &str, name: &str) -> IntarsiaResult<u64> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .vocabularies
            .entry(vocabulary.to_string())
            .or_default()
            .push((id, name.to_string()));
        Ok(id)
    }
}
