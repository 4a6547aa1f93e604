use std::fmt;
use std::sync::atomic::{self, AtomicU64};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::builder;
use crate::config::TreeConfig;
use crate::errors::{TreeError, TreeResult};
use crate::model::Model;
use crate::sort::find_insert_index_by;
use crate::walk::{Walk, WalkStrategy};

/// Handle of a node inside a [`TreeArena`].
///
/// Handles are generational: once a node is removed its handle never resolves again,
/// even if the slot is reused. A handle only resolves in the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}v{}", slot, generation)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode<T> {
    /// Payload of the model fragment this node wraps
    pub data: T,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in sibling order
    pub children: Vec<NodeId>,
}

/// Arena-based tree structure owning every node of one tree context.
///
/// Besides the parsed root the arena may hold further independent roots: subtrees
/// that were dropped, parsed separately, or created as single nodes. Any of them can be
/// attached to another node with [`add_child`](Self::add_child).
///
/// The nested [`Model`] view is derived from the nodes on demand, so node order and model
/// order cannot drift apart.
#[derive(Debug)]
pub struct TreeArena<T> {
    id: u64,
    arena: Arena<TreeNode<T>>,
    root: Option<NodeId>,
    config: TreeConfig<T>,
}

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    pub fn with_config(config: TreeConfig<T>) -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed),
            arena: Arena::new(),
            root: None,
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig<T> {
        &self.config
    }

    /// Root of the tree the first parsed model belongs to.
    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|id| self.root_of(id))
    }

    /// Every independent root currently held by the arena.
    pub fn roots(&self) -> Vec<NodeId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| self.node_id(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn node_id(&self, index: Index) -> NodeId {
        NodeId {
            tree: self.id,
            index,
        }
    }

    // None for handles issued by another arena
    fn slot(&self, id: NodeId) -> Option<Index> {
        (id.tree == self.id).then_some(id.index)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|index| self.arena.contains(index))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.slot(id).and_then(|index| self.arena.get(index))
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.get_node(id).map(|node| NodeRef {
            tree: self,
            id,
            node,
        })
    }

    fn node(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.get_node(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode<T>> {
        let slot = self.slot(id);
        slot.and_then(|index| self.arena.get_mut(index))
            .ok_or(TreeError::UnknownNode(id))
    }

    pub fn data(&self, id: NodeId) -> TreeResult<&T> {
        self.node(id).map(|node| &node.data)
    }

    /// Mutable payload access.
    ///
    /// Under a comparator, siblings are not re-sorted after the payload changes.
    pub fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.node_mut(id).map(|node| &mut node.data)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        self.node(id).map(|node| node.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.node(id).map(|node| node.parent)
    }

    /// Parses `model` into this arena as a new independent root.
    ///
    /// The first model parsed into an arena becomes its [`root`](Self::root).
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&mut self, model: Model<T>) -> NodeId {
        let id = builder::build_subtree(self, model);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Creates a single-node tree holding `data`.
    #[instrument(level = "trace", skip_all)]
    pub fn create_node(&mut self, data: T) -> NodeId {
        self.insert_node(data, None)
    }

    /// Inserts a node appended to the children of `parent`.
    pub(crate) fn insert_node(&mut self, data: T, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let index = self.arena.insert(node);
        let node_id = self.node_id(index);

        if let Some(parent_id) = parent {
            if let Ok(parent) = self.node_mut(parent_id) {
                parent.children.push(node_id);
            }
        }

        node_id
    }

    // Single choke point for linking; callers validate first.
    fn attach(&mut self, parent: NodeId, child: NodeId, index: usize) -> TreeResult<NodeId> {
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.insert(index, child);
        debug!(%parent, %child, index, "attached child");
        Ok(child)
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.root_of(parent) == child {
            return Err(TreeError::CycleDetected(child));
        }
        Ok(())
    }

    /// Attaches the detached node `child` as the last child of `parent`.
    ///
    /// Under a comparator the child goes to the first position whose sibling compares
    /// greater, which keeps the siblings sorted.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<NodeId> {
        self.check_attachable(parent, child)?;

        let index = match self.config.comparator() {
            Some(compare) => {
                let child_data = &self.node(child)?.data;
                let siblings = self
                    .node(parent)?
                    .children
                    .iter()
                    .map(|&sibling| self.data(sibling))
                    .collect::<TreeResult<Vec<&T>>>()?;
                find_insert_index_by(siblings.as_slice(), |sibling| compare(*sibling, child_data))
            }
            None => self.node(parent)?.children.len(),
        };

        self.attach(parent, child, index)
    }

    /// Attaches the detached node `child` at `index` among the children of `parent`.
    ///
    /// `index` may equal the current child count, which appends.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child_at_index(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> TreeResult<NodeId> {
        if self.config.has_comparator() {
            return Err(TreeError::UnsupportedOperation(
                "cannot add a child at an index when using a comparator",
            ));
        }

        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(TreeError::InvalidIndex { index, len: len + 1 });
        }
        self.check_attachable(parent, child)?;

        self.attach(parent, child, index)
    }

    /// Moves `id` to `index` among its siblings; the other siblings keep their order.
    ///
    /// A root can only be "moved" to index 0, which does nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn set_index(&mut self, id: NodeId, index: usize) -> TreeResult<NodeId> {
        if self.config.has_comparator() {
            return Err(TreeError::UnsupportedOperation(
                "cannot set the node index when using a comparator",
            ));
        }

        let Some(parent) = self.node(id)?.parent else {
            return match index {
                0 => Ok(id),
                _ => Err(TreeError::RootIndex(index)),
            };
        };

        let siblings = &mut self.node_mut(parent)?.children;
        let len = siblings.len();
        if index >= len {
            return Err(TreeError::InvalidIndex { index, len });
        }

        let current = siblings
            .iter()
            .position(|&s| s == id)
            .ok_or_else(|| missing_from_parent(id, parent))?;
        let moved = siblings.remove(current);
        siblings.insert(index, moved);
        debug!(%id, from = current, to = index, "moved node");

        Ok(id)
    }

    /// Position of `id` among its siblings, 0 for a root.
    #[instrument(level = "trace", skip(self))]
    pub fn get_index(&self, id: NodeId) -> TreeResult<usize> {
        match self.node(id)?.parent {
            Some(parent) => self
                .node(parent)?
                .children
                .iter()
                .position(|&s| s == id)
                .ok_or_else(|| missing_from_parent(id, parent)),
            None => Ok(0),
        }
    }

    /// Nodes from the root down to `id`, both included.
    #[instrument(level = "trace", skip(self))]
    pub fn get_path(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut path = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            path.push(parent);
            current = self.node(parent)?;
        }
        path.reverse();
        Ok(path)
    }

    fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.get_node(current).and_then(|node| node.parent) {
            current = parent;
        }
        current
    }

    pub fn is_root(&self, id: NodeId) -> TreeResult<bool> {
        self.node(id).map(|node| node.parent.is_none())
    }

    pub fn has_children(&self, id: NodeId) -> TreeResult<bool> {
        self.node(id).map(|node| !node.children.is_empty())
    }

    /// Detaches `id` and its subtree from its parent; it becomes an independent root.
    ///
    /// Dropping a root does nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn drop_node(&mut self, id: NodeId) -> TreeResult<NodeId> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(id);
        };

        self.node_mut(parent)?.children.retain(|&s| s != id);
        self.node_mut(id)?.parent = None;
        debug!(%id, %parent, "dropped node");

        Ok(id)
    }

    /// Drops `id` and removes its whole subtree from the arena, handing back the model.
    #[instrument(level = "debug", skip(self))]
    pub fn take_model(&mut self, id: NodeId) -> TreeResult<Model<T>> {
        self.drop_node(id)?;
        let order = self.post_order_ids(id);

        let mut built: Vec<Model<T>> = Vec::new();
        for node_id in order {
            let node = self
                .arena
                .remove(node_id.index)
                .ok_or(TreeError::UnknownNode(node_id))?;
            let children = built.split_off(built.len() - node.children.len());
            built.push(Model {
                data: node.data,
                children,
            });
        }

        // the primary root may have been inside the removed subtree
        if self.root.is_some_and(|root| !self.contains(root)) {
            self.root = None;
        }
        built.pop().ok_or(TreeError::UnknownNode(id))
    }

    /// Nested model view of the subtree rooted at `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn to_model(&self, id: NodeId) -> TreeResult<Model<T>>
    where
        T: Clone,
    {
        self.node(id)?;

        let mut built: Vec<Model<T>> = Vec::new();
        for node in self.iter(id, WalkStrategy::Post) {
            let children = built.split_off(built.len() - node.node.children.len());
            built.push(Model {
                data: node.data().clone(),
                children,
            });
        }

        built.pop().ok_or(TreeError::UnknownNode(id))
    }

    fn post_order_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.iter(id, WalkStrategy::Post).map(|node| node.id()).collect()
    }

    /// Lazy traversal of the subtree rooted at `id`.
    ///
    /// An unknown `id` yields nothing.
    pub fn iter(&self, id: NodeId, strategy: WalkStrategy) -> Walk<'_, T> {
        Walk::new(self, id, strategy)
    }

    /// Calls `visitor` on `id` and its descendants in `strategy` order until it returns false.
    #[instrument(level = "trace", skip(self, visitor))]
    pub fn walk<F>(&self, id: NodeId, strategy: WalkStrategy, mut visitor: F) -> TreeResult<()>
    where
        F: FnMut(NodeRef<'_, T>) -> bool,
    {
        self.node(id)?;
        for node in self.iter(id, strategy) {
            if !visitor(node) {
                debug!(at = %node.id(), "walk halted by visitor");
                break;
            }
        }
        Ok(())
    }

    /// First node in `strategy` order matching `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn first<F>(
        &self,
        id: NodeId,
        strategy: WalkStrategy,
        mut predicate: F,
    ) -> TreeResult<Option<NodeId>>
    where
        F: FnMut(NodeRef<'_, T>) -> bool,
    {
        self.node(id)?;
        Ok(self
            .iter(id, strategy)
            .find(|node| predicate(*node))
            .map(|node| node.id()))
    }

    /// Every node in `strategy` order matching `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn all<F>(
        &self,
        id: NodeId,
        strategy: WalkStrategy,
        mut predicate: F,
    ) -> TreeResult<Vec<NodeId>>
    where
        F: FnMut(NodeRef<'_, T>) -> bool,
    {
        self.node(id)?;
        Ok(self
            .iter(id, strategy)
            .filter(|node| predicate(*node))
            .map(|node| node.id())
            .collect())
    }

    /// Number of levels in the subtree rooted at `id`, 1 for a leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        self.node(id)?;

        let mut max_depth = 0;
        let mut stack = vec![(id, 1)];
        while let Some((current, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(current) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        Ok(max_depth)
    }

    /// Collects all leaf nodes (nodes with no children) below `id`, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        self.all(id, WalkStrategy::Pre, |node| !node.has_children())
    }
}

fn missing_from_parent(id: NodeId, parent: NodeId) -> TreeError {
    TreeError::InternalError(format!("node {id} is not among the children of its parent {parent}"))
}

/// Read-only view of one node, handed to visitors and predicates.
pub struct NodeRef<'a, T> {
    tree: &'a TreeArena<T>,
    id: NodeId,
    node: &'a TreeNode<T>,
}

impl<'a, T> NodeRef<'a, T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a T {
        &self.node.data
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.node.parent.and_then(|parent| self.tree.get(parent))
    }

    pub fn child_ids(&self) -> &'a [NodeId] {
        &self.node.children
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let (tree, node) = (self.tree, self.node);
        node.children.iter().filter_map(move |&child| tree.get(child))
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.node.children.is_empty()
    }

    pub fn index(&self) -> TreeResult<usize> {
        self.tree.get_index(self.id)
    }

    pub fn path(&self) -> TreeResult<Vec<NodeId>> {
        self.tree.get_path(self.id)
    }

    pub fn depth(&self) -> TreeResult<usize> {
        self.tree.depth(self.id)
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", &self.node.data)
            .field("parent", &self.node.parent)
            .field("children", &self.node.children)
            .finish()
    }
}
