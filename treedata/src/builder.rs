//! Tree builder turning nested models into arena trees.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::config::TreeConfig;
use crate::model::Model;
use crate::sort::merge_sort;

/// Constructs linked trees from nested [`Model`]s.
///
/// The builder's configuration is handed to every arena it creates.
pub struct TreeBuilder<T> {
    config: TreeConfig<T>,
}

impl<T> Default for TreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    pub fn with_config(config: TreeConfig<T>) -> Self {
        Self { config }
    }

    /// Builder whose trees keep children sorted by `compare`.
    pub fn with_comparator<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::with_config(TreeConfig::with_comparator(compare))
    }

    pub fn config(&self) -> &TreeConfig<T> {
        &self.config
    }

    /// Builds a new tree rooted at `model`.
    ///
    /// Children keep their model order, or are stably sorted when a comparator is set.
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, model: Model<T>) -> TreeArena<T> {
        let mut tree = TreeArena::with_config(self.config.clone());
        tree.parse(model);
        debug!(nodes = tree.len(), "parsed tree");
        tree
    }
}

/// Inserts `model` and all its descendants into `tree`, returning the new root.
pub(crate) fn build_subtree<T>(tree: &mut TreeArena<T>, model: Model<T>) -> NodeId {
    let comparator = tree.config().comparator().cloned();
    let order_children = |children: Vec<Model<T>>| match &comparator {
        Some(compare) => merge_sort(
            &|a: &Model<T>, b: &Model<T>| compare(&a.data, &b.data),
            children,
        ),
        None => children,
    };

    let Model { data, children } = model;
    let root = tree.insert_node(data, None);
    let mut stack: Vec<(Model<T>, NodeId)> = order_children(children)
        .into_iter()
        .rev()
        .map(|child| (child, root))
        .collect();

    // children are popped in order, so appending keeps their order
    while let Some((current, parent)) = stack.pop() {
        let Model { data, children } = current;
        let current_id = tree.insert_node(data, Some(parent));
        stack.extend(
            order_children(children)
                .into_iter()
                .rev()
                .map(|child| (child, current_id)),
        );
    }

    root
}
