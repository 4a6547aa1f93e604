//! Tree-wide configuration
//!
//! A configuration is fixed when a [`TreeBuilder`](crate::builder::TreeBuilder) is created
//! and shared by every arena it parses. Nodes never carry their own copy.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparator deciding sibling order in comparator mode.
pub type ModelComparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Immutable settings inherited by every node of a tree.
pub struct TreeConfig<T> {
    comparator: Option<ModelComparator<T>>,
}

impl<T> TreeConfig<T> {
    pub fn new() -> Self {
        Self { comparator: None }
    }

    /// Children are ordered by `compare` instead of by position.
    ///
    /// Positional insertion and manual reindexing are rejected under this mode.
    pub fn with_comparator<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            comparator: Some(Arc::new(compare)),
        }
    }

    pub fn comparator(&self) -> Option<&ModelComparator<T>> {
        self.comparator.as_ref()
    }

    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }
}

impl<T> Default for TreeConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: a derive would require `T: Clone`.
impl<T> Clone for TreeConfig<T> {
    fn clone(&self) -> Self {
        Self {
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> fmt::Debug for TreeConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeConfig")
            .field("comparator", &self.has_comparator())
            .finish()
    }
}
