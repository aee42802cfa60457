//! Taxonomy term resolution seam.

use intarsia_error::IntarsiaResult;

/// Resolve free-text category names to taxonomy term ids.
///
/// Term metadata lives with the host; lookups are synchronous so
/// verification can consult them without side effects. Creation is the one
/// side-effectful operation and happens during persistence only.
pub trait TermResolver: Send + Sync {
    /// All (id, name) pairs of a vocabulary.
    fn list(&self, vocabulary: &str) -> Vec<(u64, String)>;

    /// The id of the first term matching a name, if any.
    fn find(&self, vocabulary: &str, name: &str) -> Option<u64> {
        self.list(vocabulary)
            .into_iter()
            .find(|(_, term)| term == name)
            .map(|(id, _)| id)
    }

    /// Create a term and return its id.
    fn create(&self, vocabulary: &str, name: &str) -> IntarsiaResult<u64>;
}
