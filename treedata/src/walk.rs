//! Traversal orders over a node and its descendants.
//!
//! All strategies are iterative, so tree depth is bounded by memory rather than by the
//! call stack. Stopping a [`Walk`] early (a visitor returning false, `find`, `take_while`)
//! means no further node is produced: for breadth-first this includes nodes already queued.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::{NodeId, NodeRef, TreeArena};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkStrategy {
    /// Node first, then each child subtree in order
    #[default]
    Pre,
    /// Each child subtree in order, then the node
    Post,
    /// Level by level, left to right
    Breadth,
}

impl WalkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkStrategy::Pre => "pre",
            WalkStrategy::Post => "post",
            WalkStrategy::Breadth => "breadth",
        }
    }
}

impl fmt::Display for WalkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown walk strategy: {0} (expected pre, post or breadth)")]
pub struct ParseStrategyError(String);

impl FromStr for WalkStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" => Ok(WalkStrategy::Pre),
            "post" => Ok(WalkStrategy::Post),
            "breadth" => Ok(WalkStrategy::Breadth),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// Options accepted by traversal calls; `{ "strategy": "post" }` style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    pub strategy: WalkStrategy,
}

impl From<WalkOptions> for WalkStrategy {
    fn from(options: WalkOptions) -> Self {
        options.strategy
    }
}

/// Iterator over a subtree in the order of one [`WalkStrategy`].
pub enum Walk<'a, T> {
    Pre(PreOrderIterator<'a, T>),
    Post(PostOrderIterator<'a, T>),
    Breadth(BreadthFirstIterator<'a, T>),
}

impl<'a, T> Walk<'a, T> {
    pub(crate) fn new(tree: &'a TreeArena<T>, start: NodeId, strategy: WalkStrategy) -> Self {
        match strategy {
            WalkStrategy::Pre => Walk::Pre(PreOrderIterator::new(tree, start)),
            WalkStrategy::Post => Walk::Post(PostOrderIterator::new(tree, start)),
            WalkStrategy::Breadth => Walk::Breadth(BreadthFirstIterator::new(tree, start)),
        }
    }
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Walk::Pre(iter) => iter.next(),
            Walk::Post(iter) => iter.next(),
            Walk::Breadth(iter) => iter.next(),
        }
    }
}

pub struct PreOrderIterator<'a, T> {
    tree: &'a TreeArena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(tree: &'a TreeArena<T>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.child_ids().iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a TreeArena<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a TreeArena<T>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if expanded {
                    return Some(node);
                }
                self.stack.push((current, true));
                self.stack
                    .extend(node.child_ids().iter().rev().map(|&child| (child, false)));
            }
        }
        None
    }
}

pub struct BreadthFirstIterator<'a, T> {
    tree: &'a TreeArena<T>,
    queue: VecDeque<NodeId>,
}

impl<'a, T> BreadthFirstIterator<'a, T> {
    fn new(tree: &'a TreeArena<T>, start: NodeId) -> Self {
        Self {
            tree,
            queue: VecDeque::from([start]),
        }
    }
}

impl<'a, T> Iterator for BreadthFirstIterator<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.queue.pop_front() {
            if let Some(node) = self.tree.get(current) {
                self.queue.extend(node.child_ids());
                return Some(node);
            }
        }
        None
    }
}
