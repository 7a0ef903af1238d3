use crate::url::normalize::index_alias;
use std::collections::HashSet;

/// Set of paths that have already been queued
///
/// The set only grows. It is the sole de-duplication authority for a crawl
/// and is owned by the scheduler, which mutates it between batches.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    paths: HashSet<String>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set seeded with the start path and its index alias
    ///
    /// A page that links back to `/docs/` or `/docs/index.html` will then never
    /// re-queue the root.
    pub fn seeded(start_path: &str) -> Self {
        let mut visited = Self::new();
        visited.insert(start_path);
        if let Some(alias) = index_alias(start_path) {
            visited.insert(&alias);
        }
        visited
    }

    /// Inserts a path, returning `true` if it was not present before
    pub fn insert(&mut self, path: &str) -> bool {
        if self.paths.contains(path) {
            return false;
        }
        self.paths.insert(path.to_string())
    }

    /// Returns whether the path has been seen
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
