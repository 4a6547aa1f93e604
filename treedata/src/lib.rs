//! Navigable trees built from plain nested records.
//!
//! A [`Model`] (payload plus ordered children) is parsed by a [`TreeBuilder`] into a
//! [`TreeArena`]: every node knows its parent and its ordered children, and the tree
//! supports pre-order, post-order and breadth-first traversal, queries, positional or
//! comparator-ordered insertion, sibling reordering and subtree detachment.
//!
//! ```
//! use treedata::{Model, TreeBuilder, WalkStrategy};
//!
//! let tree = TreeBuilder::new().parse(
//!     Model::new(1).with_children([Model::new(11), Model::new(12)]),
//! );
//! let root = tree.root().unwrap();
//! let found = tree.first(root, WalkStrategy::Breadth, |n| *n.data() == 12).unwrap();
//! assert_eq!(tree.get_index(found.unwrap()).unwrap(), 1);
//! ```

pub mod arena;
pub mod builder;
pub mod config;
pub mod errors;
pub mod model;
pub mod sort;
pub mod tree_traits;
pub mod util;
pub mod walk;

pub use arena::{NodeId, NodeRef, TreeArena, TreeNode};
pub use builder::TreeBuilder;
pub use config::{ModelComparator, TreeConfig};
pub use errors::{TreeError, TreeResult};
pub use model::Model;
pub use sort::{find_insert_index, merge_sort, merge_sorted};
pub use tree_traits::TreeNodeConvert;
pub use walk::{Walk, WalkOptions, WalkStrategy};
